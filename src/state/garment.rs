use egui::Color32;
use serde::{Deserialize, Serialize};

pub const DEFAULT_GARMENT_COLOR: &str = "aqua";

/// The fixed palette offered for the garment body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GarmentColor {
    Aqua,
    White,
    Black,
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Gray,
}

impl GarmentColor {
    pub const ALL: [GarmentColor; 9] = [
        GarmentColor::Aqua,
        GarmentColor::White,
        GarmentColor::Black,
        GarmentColor::Red,
        GarmentColor::Blue,
        GarmentColor::Green,
        GarmentColor::Yellow,
        GarmentColor::Purple,
        GarmentColor::Gray,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GarmentColor::Aqua => "aqua",
            GarmentColor::White => "white",
            GarmentColor::Black => "black",
            GarmentColor::Red => "red",
            GarmentColor::Blue => "blue",
            GarmentColor::Green => "green",
            GarmentColor::Yellow => "yellow",
            GarmentColor::Purple => "purple",
            GarmentColor::Gray => "gray",
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            GarmentColor::Aqua => "#5CE1E6",
            GarmentColor::White => "#FFFFFF",
            GarmentColor::Black => "#000000",
            GarmentColor::Red => "#FF3B30",
            GarmentColor::Blue => "#0A84FF",
            GarmentColor::Green => "#30D158",
            GarmentColor::Yellow => "#FFD60A",
            GarmentColor::Purple => "#BF5AF2",
            GarmentColor::Gray => "#8E8E93",
        }
    }

    pub fn color32(&self) -> Color32 {
        match self {
            GarmentColor::Aqua => Color32::from_rgb(0x5C, 0xE1, 0xE6),
            GarmentColor::White => Color32::from_rgb(0xFF, 0xFF, 0xFF),
            GarmentColor::Black => Color32::from_rgb(0x00, 0x00, 0x00),
            GarmentColor::Red => Color32::from_rgb(0xFF, 0x3B, 0x30),
            GarmentColor::Blue => Color32::from_rgb(0x0A, 0x84, 0xFF),
            GarmentColor::Green => Color32::from_rgb(0x30, 0xD1, 0x58),
            GarmentColor::Yellow => Color32::from_rgb(0xFF, 0xD6, 0x0A),
            GarmentColor::Purple => Color32::from_rgb(0xBF, 0x5A, 0xF2),
            GarmentColor::Gray => Color32::from_rgb(0x8E, 0x8E, 0x93),
        }
    }

    /// Case-insensitive lookup
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|color| color.name().eq_ignore_ascii_case(name))
    }

    /// Like [`GarmentColor::from_name`], falling back to white
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or(GarmentColor::White)
    }

    /// Label for menus, e.g. `"Aqua"`
    pub fn label(&self) -> String {
        let name = self.name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Garment-wide state shared by all four views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarmentState {
    color: String,
}

impl Default for GarmentState {
    fn default() -> Self {
        Self::new(DEFAULT_GARMENT_COLOR)
    }
}

impl GarmentState {
    pub fn new(color: &str) -> Self {
        Self {
            color: color.to_owned(),
        }
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn resolved(&self) -> GarmentColor {
        GarmentColor::resolve(&self.color)
    }

    /// Returns `true` if the name changed
    pub fn set_color(&mut self, name: &str) -> bool {
        if self.color == name {
            return false;
        }
        self.color = name.to_owned();
        true
    }
}
