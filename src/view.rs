use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the four printable garment panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Front,
    Back,
    Left,
    Right,
}

impl View {
    pub const ALL: [View; 4] = [View::Front, View::Back, View::Left, View::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            View::Front => "front",
            View::Back => "back",
            View::Left => "left",
            View::Right => "right",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            View::Front => "Front",
            View::Back => "Back",
            View::Left => "Left",
            View::Right => "Right",
        }
    }

    fn slot(self) -> usize {
        match self {
            View::Front => 0,
            View::Back => 1,
            View::Left => 2,
            View::Right => 3,
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed four-slot map with one value per [`View`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewMap<T> {
    slots: [T; 4],
}

impl<T> ViewMap<T> {
    pub fn from_fn(mut f: impl FnMut(View) -> T) -> Self {
        Self {
            slots: View::ALL.map(&mut f),
        }
    }

    pub fn get(&self, view: View) -> &T {
        &self.slots[view.slot()]
    }

    pub fn get_mut(&mut self, view: View) -> &mut T {
        &mut self.slots[view.slot()]
    }

    /// Iterate in `Front, Back, Left, Right` order
    pub fn iter(&self) -> impl Iterator<Item = (View, &T)> {
        View::ALL.into_iter().zip(self.slots.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (View, &mut T)> {
        View::ALL.into_iter().zip(self.slots.iter_mut())
    }
}

impl<T> Index<View> for ViewMap<T> {
    type Output = T;

    fn index(&self, view: View) -> &T {
        self.get(view)
    }
}

impl<T> IndexMut<View> for ViewMap<T> {
    fn index_mut(&mut self, view: View) -> &mut T {
        self.get_mut(view)
    }
}
