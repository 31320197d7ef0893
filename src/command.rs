use crate::element::ElementPatch;
use crate::id_generator::ElementId;
use crate::view::View;

/// Design mutations produced by tools and UI panels and executed by
/// [`crate::state::DesignContext::execute`]
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Select(ElementId),
    ClearSelection,
    Move {
        element_id: ElementId,
        x: f32,
        y: f32,
    },
    SetScale {
        element_id: ElementId,
        scale: f32,
    },
    Update {
        element_id: ElementId,
        patch: ElementPatch,
    },
    Delete(ElementId),
    SwitchView(View),
    SetColor(String),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Select(_) => "select",
            Command::ClearSelection => "clear_selection",
            Command::Move { .. } => "move",
            Command::SetScale { .. } => "set_scale",
            Command::Update { .. } => "update",
            Command::Delete(_) => "delete",
            Command::SwitchView(_) => "switch_view",
            Command::SetColor(_) => "set_color",
        }
    }

    /// The element this command targets, if any
    pub fn element_id(&self) -> Option<ElementId> {
        match self {
            Command::Select(id) | Command::Delete(id) => Some(*id),
            Command::Move { element_id, .. }
            | Command::SetScale { element_id, .. }
            | Command::Update { element_id, .. } => Some(*element_id),
            Command::ClearSelection | Command::SwitchView(_) | Command::SetColor(_) => None,
        }
    }
}
