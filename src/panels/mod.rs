mod central_panel;
mod customization_panel;
mod preview_window;
mod toolbar;
mod view_selector;

pub use central_panel::central_panel;
pub use customization_panel::customization_panel;
pub use preview_window::{PREVIEW_HINT, preview_window};
pub use toolbar::{action_menu, text_toolbar};
pub use view_selector::view_selector;
