//! Collaborators injected into the design context and host.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::state::DesignSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    /// Host clock time after which the toast is hidden
    pub expires_at: f64,
}

/// User-facing notifications
pub trait Notifier {
    fn success(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// Writes notifications to the log
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn error(&mut self, message: &str) {
        log::warn!("{message}");
    }
}

/// Queues toasts for the UI; the host feeds it the current time each frame
#[derive(Debug, Clone, Default)]
pub struct ToastNotifier {
    toasts: Arc<Mutex<Vec<Toast>>>,
    now: Arc<Mutex<f64>>,
    lifetime: f64,
}

impl ToastNotifier {
    pub const DEFAULT_LIFETIME: f64 = 3.0;

    pub fn new() -> Self {
        Self {
            lifetime: Self::DEFAULT_LIFETIME,
            ..Default::default()
        }
    }

    /// Advance the clock and drop expired toasts
    pub fn tick(&self, now: f64) {
        *self.now.lock() = now;
        self.toasts.lock().retain(|toast| toast.expires_at > now);
    }

    pub fn visible(&self) -> Vec<Toast> {
        self.toasts.lock().clone()
    }

    fn push(&self, kind: ToastKind, message: &str) {
        let expires_at = *self.now.lock() + self.lifetime;
        self.toasts.lock().push(Toast {
            kind,
            message: message.to_owned(),
            expires_at,
        });
    }
}

impl Notifier for ToastNotifier {
    fn success(&mut self, message: &str) {
        log::info!("{message}");
        self.push(ToastKind::Success, message);
    }

    fn error(&mut self, message: &str) {
        log::warn!("{message}");
        self.push(ToastKind::Error, message);
    }
}

/// Receives designs when the user proceeds to checkout
pub trait CartSink {
    fn add_design(&mut self, snapshot: DesignSnapshot);
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCart {
    items: Arc<Mutex<Vec<DesignSnapshot>>>,
}

impl InMemoryCart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> Vec<DesignSnapshot> {
        self.items.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

impl CartSink for InMemoryCart {
    fn add_design(&mut self, snapshot: DesignSnapshot) {
        log::info!(
            "Cart received {} design with {} elements",
            snapshot.view,
            snapshot.elements.len()
        );
        self.items.lock().push(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_expire() {
        let mut notifier = ToastNotifier::new();
        notifier.tick(10.0);
        notifier.success("Saved");
        notifier.error("Oops");
        assert_eq!(notifier.visible().len(), 2);

        notifier.tick(12.0);
        assert_eq!(notifier.visible().len(), 2);
        notifier.tick(13.5);
        assert!(notifier.visible().is_empty());
    }

    #[test]
    fn test_clones_share_queue() {
        let mut notifier = ToastNotifier::new();
        let view = notifier.clone();
        notifier.error("Please enter some text first!");
        assert_eq!(view.visible()[0].kind, ToastKind::Error);
    }
}
