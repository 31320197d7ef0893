use std::sync::Arc;

use egui::{Color32, Pos2};
use log::debug;

use crate::element::{Element, ElementPatch, TextStyle};
use crate::id_generator::ElementId;
use crate::view::{View, ViewMap};

/// Elements of one view in insertion order; later entries paint on top
pub type ViewCollection = Arc<Vec<Element>>;

/// The per-view element model.
///
/// All mutations go through `Arc::make_mut`, so a clone of a collection
/// obtained with [`DesignState::collection`] is never affected by later edits.
/// The selected id always mirrors the single `is_selected` element of the
/// active view.
#[derive(Debug, Clone, Default)]
pub struct DesignState {
    views: ViewMap<ViewCollection>,
    active_view: View,
    selected: Option<ElementId>,
}

impl DesignState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_view(&self) -> View {
        self.active_view
    }

    pub fn elements(&self, view: View) -> &[Element] {
        &self.views[view]
    }

    /// Shared handle on a view's collection as it is right now
    pub fn collection(&self, view: View) -> ViewCollection {
        Arc::clone(&self.views[view])
    }

    pub fn active_elements(&self) -> &[Element] {
        self.elements(self.active_view)
    }

    pub fn selected_id(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn selected_element(&self) -> Option<&Element> {
        let id = self.selected?;
        self.active_elements().iter().find(|e| e.id() == id)
    }

    /// Look an element up across all views
    pub fn find(&self, id: ElementId) -> Option<(View, &Element)> {
        self.views
            .iter()
            .find_map(|(view, elements)| elements.iter().find(|e| e.id() == id).map(|e| (view, e)))
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.find(id).is_some()
    }

    /// Whether `id` belongs to the active view
    pub fn is_active(&self, id: ElementId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.index_of(id).map(|index| &self.active_elements()[index])
    }

    pub fn element_count(&self) -> usize {
        self.views.iter().map(|(_, elements)| elements.len()).sum()
    }

    pub fn iter_all(&self) -> impl Iterator<Item = (View, &Element)> {
        self.views
            .iter()
            .flat_map(|(view, elements)| elements.iter().map(move |e| (view, e)))
    }

    pub fn add_text(
        &mut self,
        text: &str,
        font_size: f32,
        color: Color32,
        font_family: &str,
    ) -> ElementId {
        self.add_element(Element::text(text, TextStyle::new(font_size, color, font_family)))
    }

    pub fn add_image(&mut self, reference: &str) -> ElementId {
        self.add_element(Element::image(reference))
    }

    /// Append to the active view and make it the exclusive selection
    pub fn add_element(&mut self, mut element: Element) -> ElementId {
        let id = element.id();
        element.set_selected(true);

        let elements = Arc::make_mut(&mut self.views[self.active_view]);
        for other in elements.iter_mut() {
            other.set_selected(false);
        }
        elements.push(element);
        self.selected = Some(id);

        debug!("Added {} to {} ({} elements)", id, self.active_view, elements.len());
        id
    }

    /// Returns `false` for ids not in the active view or patches that change nothing
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        let Some(index) = self.index_of(id) else {
            debug!("update_element: {id} not in {}", self.active_view);
            return false;
        };
        Arc::make_mut(&mut self.views[self.active_view])[index].apply_patch(patch)
    }

    /// Clamps the new position to the printable area
    pub fn move_element(&mut self, id: ElementId, x: f32, y: f32) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let target = crate::element::clamp_position(Pos2::new(x, y));
        if self.active_elements()[index].position() == target {
            return false;
        }
        Arc::make_mut(&mut self.views[self.active_view])[index].set_position(Pos2::new(x, y))
    }

    pub fn set_scale(&mut self, id: ElementId, scale: f32) -> bool {
        self.update_element(id, &ElementPatch::new().scale(scale))
    }

    /// Exclusive selection; unknown ids leave the current selection alone
    pub fn select_element(&mut self, id: ElementId) -> bool {
        if self.index_of(id).is_none() {
            return false;
        }
        if self.selected == Some(id) {
            return true;
        }
        let elements = Arc::make_mut(&mut self.views[self.active_view]);
        for element in elements.iter_mut() {
            element.set_selected(element.id() == id);
        }
        self.selected = Some(id);
        true
    }

    pub fn deselect_all(&mut self) {
        Self::clear_flags(&mut self.views[self.active_view]);
        self.selected = None;
    }

    pub fn delete_element(&mut self, id: ElementId) -> Option<Element> {
        let index = self.index_of(id)?;
        let removed = Arc::make_mut(&mut self.views[self.active_view]).remove(index);
        if self.selected == Some(id) {
            self.selected = None;
        }
        debug!("Deleted {} from {}", id, self.active_view);
        Some(removed)
    }

    /// Deselects everything in the view being left, then activates `view`
    pub fn switch_view(&mut self, view: View) {
        self.deselect_all();
        if view != self.active_view {
            debug!("Switching view {} -> {}", self.active_view, view);
            self.active_view = view;
        }
    }

    /// Selection exclusivity and selected-id agreement across all views
    pub fn selection_is_consistent(&self) -> bool {
        let per_view_ok = self
            .views
            .iter()
            .all(|(_, elements)| elements.iter().filter(|e| e.is_selected()).count() <= 1);
        let flagged = self.active_elements().iter().find(|e| e.is_selected()).map(Element::id);
        let inactive_clear = self
            .views
            .iter()
            .filter(|(view, _)| *view != self.active_view)
            .all(|(_, elements)| elements.iter().all(|e| !e.is_selected()));
        per_view_ok && inactive_clear && flagged == self.selected
    }

    fn index_of(&self, id: ElementId) -> Option<usize> {
        self.active_elements().iter().position(|e| e.id() == id)
    }

    fn clear_flags(collection: &mut ViewCollection) {
        if collection.iter().any(Element::is_selected) {
            for element in Arc::make_mut(collection).iter_mut() {
                element.set_selected(false);
            }
        }
    }
}
