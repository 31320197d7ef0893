use egui::{Pos2, Rect, Vec2};
use log::trace;

use crate::element::{Element, ElementKind, TextAlign};
use crate::id_generator::ElementId;
use crate::rasterizer::IMAGE_BASE_FRACTION;
use crate::state::DesignState;
use crate::widgets::Corner;

pub const HANDLE_RADIUS: f32 = 12.0;

/// Width over height of the printable canvas
pub const CANVAS_ASPECT: f32 = 3.0 / 4.0;

/// What lies under the pointer on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitTarget {
    /// A corner handle of the selected element; `anchor` is its screen-space center
    Handle {
        element_id: ElementId,
        corner: Corner,
        anchor: Pos2,
    },
    Element(ElementId),
    Empty,
}

/// Maps between screen points and canvas percent coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTransform {
    rect: Rect,
}

impl CanvasTransform {
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }

    /// Largest canvas of `CANVAS_ASPECT` centered inside `available`
    pub fn fit(available: Rect) -> Self {
        let size = available.size();
        let width = size.x.min(size.y * CANVAS_ASPECT);
        let height = width / CANVAS_ASPECT;
        Self::new(Rect::from_center_size(available.center(), Vec2::new(width, height)))
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn to_percent(&self, screen: Pos2) -> Pos2 {
        let size = self.rect.size();
        if size.x <= 0.0 || size.y <= 0.0 {
            return crate::element::CANVAS_CENTER;
        }
        let rel = screen - self.rect.min;
        Pos2::new(rel.x / size.x * 100.0, rel.y / size.y * 100.0)
    }

    pub fn to_screen(&self, percent: Pos2) -> Pos2 {
        let size = self.rect.size();
        self.rect.min + Vec2::new(percent.x / 100.0 * size.x, percent.y / 100.0 * size.y)
    }
}

/// Source of an element's raster content bounds, relative to the element position
pub trait BoundsLookup {
    fn content_bounds(&self, element: &Element) -> Option<Rect>;
}

/// No cached raster; always falls back to an estimate
impl BoundsLookup for () {
    fn content_bounds(&self, _element: &Element) -> Option<Rect> {
        None
    }
}

/// Rough content bounds used before an element has been rasterized, relative
/// to the element position. Images use the placeholder square.
pub fn estimated_content_bounds(element: &Element, buffer_size: u32) -> Rect {
    match element.kind() {
        ElementKind::Text(style) => {
            let size = style.scaled_size(element.scale());
            let chars = element.content().chars().count().max(1) as f32;
            let width = chars * size * 0.55;
            let height = size * 1.2;
            let min_x = match style.align {
                TextAlign::Left => 0.0,
                TextAlign::Center => -width / 2.0,
                TextAlign::Right => -width,
            };
            Rect::from_min_size(Pos2::new(min_x, -height / 2.0), Vec2::new(width, height))
        }
        ElementKind::Image => {
            let side = (buffer_size as f32 * IMAGE_BASE_FRACTION * element.scale()).round();
            Rect::from_center_size(Pos2::ZERO, Vec2::splat(side))
        }
    }
}

/// Screen rect covered by `element`, centered on the element position
pub fn element_screen_rect(
    element: &Element,
    transform: &CanvasTransform,
    lookup: &impl BoundsLookup,
    buffer_size: u32,
) -> Rect {
    let bounds = lookup
        .content_bounds(element)
        .unwrap_or_else(|| estimated_content_bounds(element, buffer_size));
    let center = transform.to_screen(element.position());
    bounds.translate(center.to_vec2())
}

/// Handles of the selected element win, then elements top-most first
pub fn hit_test(
    state: &DesignState,
    transform: &CanvasTransform,
    lookup: &impl BoundsLookup,
    buffer_size: u32,
    pos: Pos2,
) -> HitTarget {
    if let Some(selected) = state.selected_element() {
        let rect = element_screen_rect(selected, transform, lookup, buffer_size);
        if let Some(corner) = handle_at(rect, pos) {
            trace!("Hit handle {} of {}", corner.as_str(), selected.id());
            return HitTarget::Handle {
                element_id: selected.id(),
                corner,
                anchor: transform.to_screen(selected.position()),
            };
        }
    }

    state
        .active_elements()
        .iter()
        .rev()
        .find(|element| element_screen_rect(element, transform, lookup, buffer_size).contains(pos))
        .map_or(HitTarget::Empty, |element| HitTarget::Element(element.id()))
}

/// Corner of `rect` within `HANDLE_RADIUS` of `pos`, in top-left, top-right,
/// bottom-left, bottom-right order
pub fn handle_at(rect: Rect, pos: Pos2) -> Option<Corner> {
    Corner::ALL
        .into_iter()
        .find(|corner| pos.distance(corner.of(rect)) <= HANDLE_RADIUS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;

    fn canvas() -> CanvasTransform {
        CanvasTransform::new(Rect::from_min_size(Pos2::ZERO, Vec2::new(300.0, 400.0)))
    }

    #[test]
    fn test_percent_round_trip() {
        let transform = canvas();
        let screen = transform.to_screen(Pos2::new(25.0, 75.0));
        assert_eq!(screen, Pos2::new(75.0, 300.0));
        assert_eq!(transform.to_percent(screen), Pos2::new(25.0, 75.0));
    }

    #[test]
    fn test_fit_keeps_aspect() {
        let available = Rect::from_min_size(Pos2::ZERO, Vec2::new(1000.0, 400.0));
        let rect = CanvasTransform::fit(available).rect();
        assert!((rect.width() / rect.height() - CANVAS_ASPECT).abs() < 1e-5);
        assert_eq!(rect.center(), available.center());
    }

    #[test]
    fn test_hit_top_most_first() {
        let mut state = DesignState::default();
        let below = state.add_text("below", 24.0, Color32::BLACK, "Arial");
        let above = state.add_text("above", 24.0, Color32::BLACK, "Arial");
        state.deselect_all();

        let transform = canvas();
        let center = transform.to_screen(Pos2::new(50.0, 50.0));
        assert_eq!(hit_test(&state, &transform, &(), 256, center), HitTarget::Element(above));
        assert_ne!(HitTarget::Element(below), HitTarget::Element(above));
    }

    #[test]
    fn test_handles_only_for_selected() {
        let mut state = DesignState::default();
        let id = state.add_image("logo.png");
        let transform = canvas();
        let element = state.selected_element().cloned().unwrap();
        let rect = element_screen_rect(&element, &transform, &(), 256);

        match hit_test(&state, &transform, &(), 256, rect.right_bottom()) {
            HitTarget::Handle { element_id, corner, anchor } => {
                assert_eq!(element_id, id);
                assert_eq!(corner, Corner::BottomRight);
                assert_eq!(anchor, transform.to_screen(element.position()));
            }
            other => panic!("expected handle, got {other:?}"),
        }

        state.deselect_all();
        let inner = rect.right_bottom() - Vec2::splat(2.0);
        assert_eq!(hit_test(&state, &transform, &(), 256, inner), HitTarget::Element(id));
    }

    #[test]
    fn test_empty_canvas_beside_image_deselects() {
        let mut state = DesignState::default();
        let id = state.add_image("logo.png");
        let transform = canvas();

        let rect = element_screen_rect(state.get(id).unwrap(), &transform, &(), 256);
        assert_eq!(rect.size(), Vec2::splat(128.0));
        assert_eq!(rect.center(), transform.to_screen(Pos2::new(50.0, 50.0)));
        assert_eq!(hit_test(&state, &transform, &(), 256, Pos2::new(40.0, 60.0)), HitTarget::Empty);
    }

    #[test]
    fn test_miss_is_empty() {
        let state = DesignState::default();
        assert_eq!(hit_test(&state, &canvas(), &(), 256, Pos2::new(5.0, 5.0)), HitTarget::Empty);
    }
}
