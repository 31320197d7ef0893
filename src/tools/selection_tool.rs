use egui::{Pos2, Vec2};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::element::{clamp_position, clamp_scale};
use crate::geometry::HitTarget;
use crate::id_generator::ElementId;
use crate::state::DesignState;
use crate::tools::{PointerSample, Tool};
use crate::widgets::Corner;

/// Scale change per screen pixel of corner travel
pub const RESIZE_SENSITIVITY: f32 = 0.01;

/// How corner-handle motion maps to a new scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResizeModel {
    /// Pointer travel from the grab point, signed by the dominant axis
    Directional,
    /// Ratio of pointer-to-center distance over grab-to-center distance
    #[default]
    CenterDistance,
}

impl ResizeModel {
    pub fn scale(
        &self,
        corner: Corner,
        initial_scale: f32,
        grab: Pos2,
        anchor: Pos2,
        pointer: Pos2,
    ) -> f32 {
        match self {
            ResizeModel::Directional => directional_scale(corner, initial_scale, grab, pointer),
            ResizeModel::CenterDistance => {
                let grab_distance = grab.distance(anchor);
                if grab_distance < 1.0 {
                    return directional_scale(corner, initial_scale, grab, pointer);
                }
                clamp_scale(initial_scale * pointer.distance(anchor) / grab_distance)
            }
        }
    }
}

fn directional_scale(corner: Corner, initial_scale: f32, grab: Pos2, pointer: Pos2) -> f32 {
    let delta = pointer - grab;
    let along = if delta.x.abs() >= delta.y.abs() {
        delta.x * corner.x_growth()
    } else {
        delta.y * corner.y_growth()
    };
    let sign = if along >= 0.0 { 1.0 } else { -1.0 };
    clamp_scale(initial_scale + sign * delta.length() * RESIZE_SENSITIVITY)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Dragging {
        element_id: ElementId,
        /// Pointer minus element position, in percent
        offset: Vec2,
    },
    Resizing {
        element_id: ElementId,
        corner: Corner,
        initial_scale: f32,
        initial_pointer: Pos2,
        anchor: Pos2,
    },
}

impl SelectionState {
    pub fn name(&self) -> &'static str {
        match self {
            SelectionState::Idle => "Idle",
            SelectionState::Dragging { .. } => "Dragging",
            SelectionState::Resizing { .. } => "Resizing",
        }
    }

    pub fn element_id(&self) -> Option<ElementId> {
        match self {
            SelectionState::Idle => None,
            SelectionState::Dragging { element_id, .. }
            | SelectionState::Resizing { element_id, .. } => Some(*element_id),
        }
    }
}

/// Select, move and resize state machine for the 2D canvas
#[derive(Debug, Clone, Default)]
pub struct SelectionTool {
    state: SelectionState,
    resize_model: ResizeModel,
}

impl SelectionTool {
    pub fn new(resize_model: ResizeModel) -> Self {
        Self {
            state: SelectionState::Idle,
            resize_model,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn resize_model(&self) -> ResizeModel {
        self.resize_model
    }

    pub fn set_resize_model(&mut self, model: ResizeModel) {
        self.resize_model = model;
    }

    fn transition(&mut self, next: SelectionState) {
        debug!("SelectionTool: {} -> {}", self.state.name(), next.name());
        self.state = next;
    }

    fn begin_drag(
        &mut self,
        element_id: ElementId,
        sample: PointerSample,
        design: &DesignState,
    ) -> Option<Command> {
        let element = design.get(element_id)?;
        let offset = sample.percent - element.position();
        self.transition(SelectionState::Dragging { element_id, offset });
        Some(Command::Select(element_id))
    }
}

impl Tool for SelectionTool {
    fn name(&self) -> &'static str {
        "Selection"
    }

    fn on_pointer_down(
        &mut self,
        target: HitTarget,
        sample: PointerSample,
        design: &DesignState,
    ) -> Option<Command> {
        if self.is_active() {
            warn!(
                "Pointer down while {}; ending the previous gesture",
                self.state.name()
            );
            self.transition(SelectionState::Idle);
        }

        match target {
            HitTarget::Handle {
                element_id,
                corner,
                anchor,
            } if design.selected_id() == Some(element_id) => {
                let element = design.get(element_id)?;
                self.transition(SelectionState::Resizing {
                    element_id,
                    corner,
                    initial_scale: element.scale(),
                    initial_pointer: sample.screen,
                    anchor,
                });
                None
            }
            HitTarget::Handle { element_id, .. } | HitTarget::Element(element_id) => {
                self.begin_drag(element_id, sample, design)
            }
            HitTarget::Empty => Some(Command::ClearSelection),
        }
    }

    fn on_pointer_move(&mut self, sample: PointerSample, design: &DesignState) -> Option<Command> {
        if let Some(id) = self.state.element_id() {
            if !design.is_active(id) {
                debug!("SelectionTool: {id} disappeared mid-gesture");
                self.transition(SelectionState::Idle);
                return None;
            }
        }

        match &self.state {
            SelectionState::Idle => None,
            SelectionState::Dragging { element_id, offset } => {
                let target = clamp_position(sample.percent - *offset);
                Some(Command::Move {
                    element_id: *element_id,
                    x: target.x,
                    y: target.y,
                })
            }
            SelectionState::Resizing {
                element_id,
                corner,
                initial_scale,
                initial_pointer,
                anchor,
            } => {
                let scale = self.resize_model.scale(
                    *corner,
                    *initial_scale,
                    *initial_pointer,
                    *anchor,
                    sample.screen,
                );
                Some(Command::SetScale {
                    element_id: *element_id,
                    scale,
                })
            }
        }
    }

    fn on_pointer_up(&mut self, _sample: PointerSample, _design: &DesignState) -> Option<Command> {
        self.cancel();
        None
    }

    fn cancel(&mut self) {
        if self.is_active() {
            self.transition(SelectionState::Idle);
        }
    }

    fn is_active(&self) -> bool {
        !matches!(self.state, SelectionState::Idle)
    }
}
