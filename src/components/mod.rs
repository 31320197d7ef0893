mod view_button;

pub use view_button::ViewButton;
