mod resize_handle;

pub use resize_handle::{Corner, HANDLE_FILL, ResizeHandle};
