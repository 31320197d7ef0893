use egui::Pos2;

use crate::command::Command;
use crate::geometry::HitTarget;
use crate::state::DesignState;

pub mod selection_tool;
pub mod text_toolbar;

pub use selection_tool::{ResizeModel, SelectionState, SelectionTool};
pub use text_toolbar::{ToolbarAction, apply_action, toolbar_for};

/// One pointer position in both coordinate spaces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Canvas percent coordinates
    pub percent: Pos2,
    /// Screen points
    pub screen: Pos2,
}

/// Tool trait defines the interface for canvas tools
pub trait Tool {
    fn name(&self) -> &'static str;

    /// Handle pointer press on the canvas.
    /// Return a Command to **begin** an action if applicable, or None.
    fn on_pointer_down(
        &mut self,
        target: HitTarget,
        sample: PointerSample,
        design: &DesignState,
    ) -> Option<Command>;

    /// Handle pointer movement while a gesture may be in progress
    fn on_pointer_move(&mut self, sample: PointerSample, design: &DesignState) -> Option<Command>;

    /// Handle pointer release; finishes any gesture
    fn on_pointer_up(&mut self, sample: PointerSample, design: &DesignState) -> Option<Command>;

    /// The pointer left the canvas
    fn on_pointer_leave(&mut self, _design: &DesignState) -> Option<Command> {
        self.cancel();
        None
    }

    /// Drop any in-flight gesture
    fn cancel(&mut self);

    fn is_active(&self) -> bool;
}
