pub mod hit_testing;

pub use hit_testing::{
    BoundsLookup, CANVAS_ASPECT, CanvasTransform, HANDLE_RADIUS, HitTarget, element_screen_rect,
    hit_test,
};
