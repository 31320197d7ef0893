use std::f32::consts::{FRAC_PI_2, PI};

use egui::Pos2;
use nalgebra::{Point3, Rotation3, Vector2, Vector3};

use crate::element::CANVAS_CENTER;
use crate::id_generator::ElementId;
use crate::state::DesignState;
use crate::view::View;

/// Half extents of the printable face in world units
pub const FACE_HALF_WIDTH: f32 = 1.2;
pub const FACE_HALF_HEIGHT: f32 = 1.5;
/// Side length of the quad each element is printed on
pub const DECAL_SIZE: f32 = 0.8;

/// Canvas percentages to face-local world units, +y up
pub fn face_local_offset(position: Pos2) -> Vector2<f32> {
    Vector2::new(
        (position.x - CANVAS_CENTER.x) / CANVAS_CENTER.x * FACE_HALF_WIDTH,
        (CANVAS_CENTER.y - position.y) / CANVAS_CENTER.y * FACE_HALF_HEIGHT,
    )
}

/// Where a view's face sits on the garment proxy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacePlacement {
    pub origin: Point3<f32>,
    /// Rotation about +y; the face's local +x reads left-to-right from outside
    pub yaw: f32,
}

impl FacePlacement {
    pub fn for_view(view: View) -> Self {
        let (origin, yaw) = match view {
            View::Front => (Point3::new(0.0, 0.0, 0.11), 0.0),
            View::Back => (Point3::new(0.0, 0.0, -0.11), PI),
            View::Left => (Point3::new(-1.51, 0.0, 0.0), -FRAC_PI_2),
            View::Right => (Point3::new(1.51, 0.0, 0.0), FRAC_PI_2),
        };
        Self { origin, yaw }
    }

    fn rotation(&self) -> Rotation3<f32> {
        Rotation3::from_axis_angle(&Vector3::y_axis(), self.yaw)
    }

    /// Face-local offset to a world point
    pub fn to_world(&self, local: Vector2<f32>) -> Point3<f32> {
        self.origin + self.rotation() * Vector3::new(local.x, local.y, 0.0)
    }

    /// Outward normal
    pub fn normal(&self) -> Vector3<f32> {
        self.rotation() * Vector3::z()
    }

    pub fn right(&self) -> Vector3<f32> {
        self.rotation() * Vector3::x()
    }
}

/// One element printed on the proxy
#[derive(Debug, Clone, PartialEq)]
pub struct Decal {
    pub element_id: ElementId,
    pub view: View,
    pub center: Point3<f32>,
    /// Top-left, top-right, bottom-right, bottom-left as seen from outside
    pub corners: [Point3<f32>; 4],
    pub normal: Vector3<f32>,
}

impl Decal {
    /// Texture coordinates matching `corners`
    pub const UVS: [Pos2; 4] = [
        Pos2::new(0.0, 0.0),
        Pos2::new(1.0, 0.0),
        Pos2::new(1.0, 1.0),
        Pos2::new(0.0, 1.0),
    ];

    pub fn new(element_id: ElementId, view: View, position: Pos2) -> Self {
        let face = FacePlacement::for_view(view);
        let offset = face_local_offset(position);
        let center = face.to_world(offset);
        Self {
            element_id,
            view,
            center,
            corners: quad_corners(&face, center, Vector2::new(DECAL_SIZE, DECAL_SIZE)),
            normal: face.normal(),
        }
    }

    /// Corners for a texture `extent` times the configured buffer size
    pub fn corners_for(&self, extent: Vector2<f32>) -> [Point3<f32>; 4] {
        let face = FacePlacement::for_view(self.view);
        quad_corners(&face, self.center, extent * DECAL_SIZE)
    }
}

fn quad_corners(face: &FacePlacement, center: Point3<f32>, size: Vector2<f32>) -> [Point3<f32>; 4] {
    let right = face.right() * (size.x / 2.0);
    let up = Vector3::y() * (size.y / 2.0);
    [
        center - right + up,
        center + right + up,
        center + right - up,
        center - right - up,
    ]
}

/// Decals for every element of every view, views in `View::ALL` order and
/// elements in insertion order within a view
pub fn project_design(design: &DesignState) -> Vec<Decal> {
    View::ALL
        .iter()
        .flat_map(|&view| {
            design
                .elements(view)
                .iter()
                .map(move |element| Decal::new(element.id(), view, element.position()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_face_local_offset() {
        let center = face_local_offset(Pos2::new(50.0, 50.0));
        assert!(center.norm() < EPS);

        let corner = face_local_offset(Pos2::new(100.0, 0.0));
        assert!((corner.x - 1.2).abs() < EPS);
        assert!((corner.y - 1.5).abs() < EPS);
    }

    #[test]
    fn test_normals_point_outward() {
        for view in View::ALL {
            let face = FacePlacement::for_view(view);
            let outward = face.origin.coords.normalize();
            assert!(face.normal().dot(&outward) > 0.99, "{view}");
        }
    }

    #[test]
    fn test_right_is_viewer_right() {
        // Seen from outside, right = forward x up with forward = -normal
        for view in View::ALL {
            let face = FacePlacement::for_view(view);
            let viewer_right = (-face.normal()).cross(&Vector3::y());
            assert!((face.right() - viewer_right).norm() < EPS, "{view}");
        }
    }

    #[test]
    fn test_decal_square_and_on_face() {
        let id = crate::id_generator::generate_id();
        let decal = Decal::new(id, View::Left, Pos2::new(30.0, 70.0));
        let top = decal.corners[1] - decal.corners[0];
        let side = decal.corners[3] - decal.corners[0];
        assert!((top.norm() - DECAL_SIZE).abs() < EPS);
        assert!((side.norm() - DECAL_SIZE).abs() < EPS);
        assert!(top.dot(&side).abs() < EPS);
        for corner in decal.corners {
            assert!((corner.x - -1.51).abs() < EPS);
        }
    }

    #[test]
    fn test_corners_follow_texture_extent() {
        let id = crate::id_generator::generate_id();
        let decal = Decal::new(id, View::Front, Pos2::new(50.0, 50.0));
        assert_eq!(decal.corners_for(Vector2::new(1.0, 1.0)), decal.corners);

        let wide = decal.corners_for(Vector2::new(3.0, 0.5));
        assert!(((wide[1] - wide[0]).norm() - 3.0 * DECAL_SIZE).abs() < EPS);
        assert!(((wide[3] - wide[0]).norm() - 0.5 * DECAL_SIZE).abs() < EPS);
    }

    #[test]
    fn test_project_design_covers_all_views() {
        let mut design = DesignState::new();
        let front = design.add_text("Front", 24.0, Color32::BLACK, "Arial");
        design.switch_view(View::Back);
        let back = design.add_image("back.png");

        let decals = project_design(&design);
        assert_eq!(decals.len(), 2);
        assert_eq!((decals[0].element_id, decals[0].view), (front, View::Front));
        assert_eq!((decals[1].element_id, decals[1].view), (back, View::Back));
    }
}
