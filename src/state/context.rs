//! The input boundary of the design engine.
//!
//! `DesignContext` owns the design model, the garment state and the canvas
//! tool. Every user action goes through it, so selection and view invariants
//! are enforced in one place and each successful mutation is broadcast on the
//! [`EventBus`].

use egui::Color32;
use log::{debug, info};

use super::{DesignSnapshot, DesignState, GarmentState};
use crate::command::Command;
use crate::config::DesignerConfig;
use crate::element::{Element, ElementPatch};
use crate::event::{DesignEvent, EventBus};
use crate::geometry::HitTarget;
use crate::id_generator::ElementId;
use crate::services::{CartSink, LogNotifier, Notifier};
use crate::tools::{PointerSample, SelectionTool, Tool};
use crate::view::View;

pub const EMPTY_TEXT_MESSAGE: &str = "Please enter some text first!";
pub const UPLOAD_MESSAGE: &str = "Design uploaded successfully!";
pub const TEMPLATE_MESSAGE: &str = "Template added to your design!";

/// Built-in design templates
pub const TEMPLATES: [&str; 4] = [
    "assets/template-1.png",
    "assets/template-2.png",
    "assets/template-3.png",
    "assets/template-4.png",
];

pub struct DesignContext {
    design: DesignState,
    garment: GarmentState,
    tool: SelectionTool,
    event_bus: EventBus,
    notifier: Box<dyn Notifier>,
    font_family: String,
}

impl std::fmt::Debug for DesignContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesignContext")
            .field("design", &self.design)
            .field("garment", &self.garment)
            .field("tool", &self.tool)
            .field("event_bus", &self.event_bus)
            .finish_non_exhaustive()
    }
}

impl Default for DesignContext {
    fn default() -> Self {
        Self::new(&DesignerConfig::default(), Box::new(LogNotifier))
    }
}

impl DesignContext {
    pub fn new(config: &DesignerConfig, notifier: Box<dyn Notifier>) -> Self {
        Self {
            design: DesignState::new(),
            garment: GarmentState::new(&config.initial_color),
            tool: SelectionTool::new(config.resize_model),
            event_bus: EventBus::new(),
            notifier,
            font_family: config.default_font_family.clone(),
        }
    }

    pub fn design(&self) -> &DesignState {
        &self.design
    }

    pub fn garment(&self) -> &GarmentState {
        &self.garment
    }

    pub fn tool(&self) -> &SelectionTool {
        &self.tool
    }

    pub fn tool_mut(&mut self) -> &mut SelectionTool {
        &mut self.tool
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn active_view(&self) -> View {
        self.design.active_view()
    }

    pub fn notifier(&mut self) -> &mut dyn Notifier {
        self.notifier.as_mut()
    }

    pub fn set_color(&mut self, name: &str) -> bool {
        let changed = self.garment.set_color(name);
        let label = crate::state::GarmentColor::from_name(name)
            .map_or_else(|| name.to_owned(), |color| color.label());
        self.notifier.success(&format!("Color changed to {label}"));
        if changed {
            info!("Garment color set to {name}");
            self.event_bus.emit(DesignEvent::ColorChanged {
                color: name.to_owned(),
            });
        }
        changed
    }

    /// Blank text is rejected with an error notification
    pub fn add_text(&mut self, text: &str, font_size: f32, color: Color32) -> Option<ElementId> {
        if text.trim().is_empty() {
            self.notifier.error(EMPTY_TEXT_MESSAGE);
            return None;
        }
        let family = self.font_family.clone();
        let id = self.design.add_text(text, font_size, color, &family);
        info!("Added text {id:?} to {}", self.active_view());
        self.notifier.success("Text added to design!");
        self.after_add(id);
        Some(id)
    }

    pub fn add_image(&mut self, reference: &str) -> ElementId {
        let id = self.design.add_image(reference);
        info!("Added image {id} ({reference}) to {}", self.active_view());
        self.after_add(id);
        id
    }

    /// An image the user uploaded or dropped
    pub fn upload_design(&mut self, reference: &str) -> ElementId {
        let id = self.add_image(reference);
        self.notifier.success(UPLOAD_MESSAGE);
        id
    }

    pub fn add_template(&mut self, reference: &str) -> ElementId {
        let id = self.add_image(reference);
        self.notifier.success(TEMPLATE_MESSAGE);
        id
    }

    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = self.design.add_element(element);
        self.after_add(id);
        id
    }

    fn after_add(&mut self, id: ElementId) {
        let view = self.active_view();
        self.event_bus.emit(DesignEvent::ElementAdded {
            view,
            element_id: id,
        });
        self.event_bus.emit(DesignEvent::SelectionChanged {
            view,
            selected: Some(id),
        });
    }

    pub fn select_element(&mut self, id: ElementId) -> bool {
        let before = self.design.selected_id();
        if !self.design.select_element(id) {
            return false;
        }
        if before != Some(id) {
            self.emit_selection();
        }
        true
    }

    pub fn deselect_all(&mut self) {
        let had_selection = self.design.selected_id().is_some();
        self.design.deselect_all();
        if had_selection {
            self.emit_selection();
        }
    }

    pub fn move_element(&mut self, id: ElementId, x: f32, y: f32) -> bool {
        if !self.design.move_element(id, x, y) {
            return false;
        }
        if let Some(element) = self.design.get(id) {
            self.event_bus.emit(DesignEvent::ElementMoved {
                element_id: id,
                position: element.position(),
            });
        }
        true
    }

    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        if !self.design.update_element(id, patch) {
            return false;
        }
        debug!("Updated {id} with {patch:?}");
        self.event_bus.emit(DesignEvent::ElementUpdated {
            view: self.active_view(),
            element_id: id,
        });
        true
    }

    pub fn delete_element(&mut self, id: ElementId) -> Option<Element> {
        let was_selected = self.design.selected_id() == Some(id);
        let removed = self.design.delete_element(id)?;
        if self.tool.state().element_id() == Some(id) {
            self.tool.cancel();
        }
        info!("Deleted {} {id}", removed.element_type());
        let view = self.active_view();
        self.event_bus.emit(DesignEvent::ElementRemoved {
            view,
            element_id: id,
        });
        if was_selected {
            self.emit_selection();
        }
        Some(removed)
    }

    /// Cancels any gesture, deselects the view being left, then activates `view`
    pub fn switch_view(&mut self, view: View) {
        self.tool.cancel();
        let from = self.active_view();
        let had_selection = self.design.selected_id().is_some();
        self.design.switch_view(view);
        if had_selection {
            self.event_bus.emit(DesignEvent::SelectionChanged {
                view: from,
                selected: None,
            });
        }
        if from != view {
            info!("Switched view {from} -> {view}");
            self.event_bus.emit(DesignEvent::ViewSwitched { from, to: view });
        }
    }

    /// A click that hit nothing clears the selection
    pub fn canvas_click(&mut self, target: HitTarget) {
        match target {
            HitTarget::Empty => self.deselect_all(),
            HitTarget::Element(id) | HitTarget::Handle { element_id: id, .. } => {
                self.select_element(id);
            }
        }
    }

    pub fn pointer_down(&mut self, target: HitTarget, sample: PointerSample) -> bool {
        let command = self.tool.on_pointer_down(target, sample, &self.design);
        command.is_some_and(|command| self.execute(command))
    }

    pub fn pointer_move(&mut self, sample: PointerSample) -> bool {
        let command = self.tool.on_pointer_move(sample, &self.design);
        command.is_some_and(|command| self.execute(command))
    }

    pub fn pointer_up(&mut self, sample: PointerSample) -> bool {
        let command = self.tool.on_pointer_up(sample, &self.design);
        command.is_some_and(|command| self.execute(command))
    }

    pub fn pointer_leave(&mut self) -> bool {
        let command = self.tool.on_pointer_leave(&self.design);
        command.is_some_and(|command| self.execute(command))
    }

    /// Returns `true` if the design changed
    pub fn execute(&mut self, command: Command) -> bool {
        debug!("Executing {}", command.name());
        match command {
            Command::Select(id) => self.select_element(id),
            Command::ClearSelection => {
                let had = self.design.selected_id().is_some();
                self.deselect_all();
                had
            }
            Command::Move { element_id, x, y } => self.move_element(element_id, x, y),
            Command::SetScale { element_id, scale } => {
                self.update_element(element_id, &ElementPatch::new().scale(scale))
            }
            Command::Update { element_id, patch } => self.update_element(element_id, &patch),
            Command::Delete(id) => self.delete_element(id).is_some(),
            Command::SwitchView(view) => {
                let changed = view != self.active_view() || self.design.selected_id().is_some();
                self.switch_view(view);
                changed
            }
            Command::SetColor(name) => self.set_color(&name),
        }
    }

    pub fn snapshot(&self, view: View) -> DesignSnapshot {
        DesignSnapshot::capture(&self.design, &self.garment, view)
    }

    /// Hands the active view's snapshot to the cart
    pub fn save_design(&mut self, cart: &mut dyn CartSink) -> DesignSnapshot {
        let snapshot = self.snapshot(self.active_view());
        info!(
            "Saving {} design with {} elements",
            snapshot.view,
            snapshot.elements.len()
        );
        self.event_bus.emit(DesignEvent::DesignSaved {
            view: snapshot.view,
            element_count: snapshot.elements.len(),
        });
        cart.add_design(snapshot.clone());
        self.notifier.success("Your design has been saved!");
        snapshot
    }

    fn emit_selection(&self) {
        self.event_bus.emit(DesignEvent::SelectionChanged {
            view: self.active_view(),
            selected: self.design.selected_id(),
        });
    }
}
