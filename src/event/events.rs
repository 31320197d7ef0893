use egui::Pos2;

use crate::id_generator::ElementId;
use crate::view::View;

/// Notifications broadcast after the design model changes
#[derive(Debug, Clone, PartialEq)]
pub enum DesignEvent {
    ElementAdded {
        view: View,
        element_id: ElementId,
    },
    ElementUpdated {
        view: View,
        element_id: ElementId,
    },
    ElementMoved {
        element_id: ElementId,
        position: Pos2,
    },
    ElementRemoved {
        view: View,
        element_id: ElementId,
    },
    SelectionChanged {
        view: View,
        selected: Option<ElementId>,
    },
    ViewSwitched {
        from: View,
        to: View,
    },
    ColorChanged {
        color: String,
    },
    DesignSaved {
        view: View,
        element_count: usize,
    },
}

impl DesignEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DesignEvent::ElementAdded { .. } => "element_added",
            DesignEvent::ElementUpdated { .. } => "element_updated",
            DesignEvent::ElementMoved { .. } => "element_moved",
            DesignEvent::ElementRemoved { .. } => "element_removed",
            DesignEvent::SelectionChanged { .. } => "selection_changed",
            DesignEvent::ViewSwitched { .. } => "view_switched",
            DesignEvent::ColorChanged { .. } => "color_changed",
            DesignEvent::DesignSaved { .. } => "design_saved",
        }
    }
}
