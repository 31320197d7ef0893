mod bus;
mod events;

use std::sync::Arc;

use parking_lot::Mutex;

pub use bus::EventBus;
pub use events::DesignEvent;

pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &DesignEvent);
}

/// Requests a repaint whenever the design changes
pub struct RepaintOnChange {
    ctx: egui::Context,
}

impl RepaintOnChange {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx }
    }
}

impl EventHandler for RepaintOnChange {
    fn handle_event(&mut self, _event: &DesignEvent) {
        self.ctx.request_repaint();
    }
}

/// Keeps every event it sees; the shared log can be read from outside the bus
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<DesignEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DesignEvent> {
        self.events.lock().clone()
    }

    pub fn take(&self) -> Vec<DesignEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EventHandler for EventRecorder {
    fn handle_event(&mut self, event: &DesignEvent) {
        self.events.lock().push(event.clone());
    }
}
