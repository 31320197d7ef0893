use egui::{Color32, CursorIcon, Painter, Pos2, Rect, Stroke};

pub const HANDLE_FILL: Color32 = Color32::from_rgb(30, 120, 255);

/// Represents a corner of a selection box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Corner::TopLeft => "top-left",
            Corner::TopRight => "top-right",
            Corner::BottomLeft => "bottom-left",
            Corner::BottomRight => "bottom-right",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            Corner::TopLeft | Corner::BottomRight => CursorIcon::ResizeNwSe,
            Corner::TopRight | Corner::BottomLeft => CursorIcon::ResizeNeSw,
        }
    }

    /// Position of this corner on `rect`
    pub fn of(&self, rect: Rect) -> Pos2 {
        match self {
            Corner::TopLeft => rect.left_top(),
            Corner::TopRight => rect.right_top(),
            Corner::BottomLeft => rect.left_bottom(),
            Corner::BottomRight => rect.right_bottom(),
        }
    }

    /// `+1` when growing means moving right along x, `-1` for left corners
    pub fn x_growth(&self) -> f32 {
        match self {
            Corner::TopRight | Corner::BottomRight => 1.0,
            Corner::TopLeft | Corner::BottomLeft => -1.0,
        }
    }

    /// `+1` when growing means moving down along y, `-1` for top corners
    pub fn y_growth(&self) -> f32 {
        match self {
            Corner::BottomLeft | Corner::BottomRight => 1.0,
            Corner::TopLeft | Corner::TopRight => -1.0,
        }
    }
}

/// Corner handle drawn around the selected element
pub struct ResizeHandle {
    corner: Corner,
    position: Pos2,
    radius: f32,
}

impl ResizeHandle {
    pub fn new(corner: Corner, position: Pos2, radius: f32) -> Self {
        Self {
            corner,
            position,
            radius,
        }
    }

    /// One handle per corner of `rect`
    pub fn around(rect: Rect, radius: f32) -> [ResizeHandle; 4] {
        Corner::ALL.map(|corner| ResizeHandle::new(corner, corner.of(rect), radius))
    }

    pub fn corner(&self) -> Corner {
        self.corner
    }

    pub fn contains(&self, pos: Pos2) -> bool {
        pos.distance(self.position) <= self.radius
    }

    pub fn paint(&self, painter: &Painter, hovered: bool) {
        let radius = if hovered { self.radius * 0.75 } else { self.radius * 0.6 };
        painter.circle_filled(self.position, radius, HANDLE_FILL);
        painter.circle_stroke(self.position, radius, Stroke::new(1.0, Color32::WHITE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_around_places_handles_on_corners() {
        let rect = Rect::from_min_max(Pos2::new(10.0, 20.0), Pos2::new(110.0, 70.0));
        let handles = ResizeHandle::around(rect, 8.0);

        assert!(handles[0].contains(Pos2::new(12.0, 22.0)));
        assert_eq!(handles[3].corner(), Corner::BottomRight);
        assert!(handles[3].contains(Pos2::new(110.0, 70.0)));
        assert!(!handles[3].contains(Pos2::new(60.0, 45.0)));
    }
}
