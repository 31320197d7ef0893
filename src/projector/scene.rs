use std::cmp::Ordering;

use egui::epaint::{Mesh, Vertex};
use egui::{Color32, Pos2, Rect, Shape, TextureId, Vec2};
use nalgebra::{Point3, Vector2};

use super::camera::OrbitCamera;
use super::garment::{GarmentProxy, Quad, shade};
use super::placement::{Decal, FacePlacement};
use crate::id_generator::ElementId;
use crate::view::View;

/// Everything the preview needs for one frame
pub struct SceneInput<'a> {
    pub camera: &'a OrbitCamera,
    pub viewport: Rect,
    pub garment: &'a GarmentProxy,
    pub garment_color: Color32,
    pub decals: &'a [Decal],
}

/// A decal's texture and its size relative to the configured buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecalTexture {
    pub id: TextureId,
    pub extent: Vec2,
}

fn far_first(a: f32, b: f32) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

fn project_corners(
    camera: &OrbitCamera,
    corners: &[Point3<f32>; 4],
    viewport: Rect,
) -> Option<[Pos2; 4]> {
    let mut screen = [Pos2::ZERO; 4];
    for (out, corner) in screen.iter_mut().zip(corners) {
        *out = camera.project(corner, viewport)?.0;
    }
    Some(screen)
}

fn push_quad(mesh: &mut Mesh, screen: [Pos2; 4], uvs: [Pos2; 4], color: Color32) {
    let base = mesh.vertices.len() as u32;
    for (pos, uv) in screen.into_iter().zip(uvs) {
        mesh.vertices.push(Vertex { pos, uv, color });
    }
    mesh.add_triangle(base, base + 1, base + 2);
    mesh.add_triangle(base, base + 2, base + 3);
}

fn visible_garment_quads<'q>(input: &SceneInput<'q>) -> Vec<(&'q Quad, f32)> {
    let camera = input.camera;
    let eye = camera.eye();
    let mut visible: Vec<(&Quad, f32)> = input
        .garment
        .quads()
        .iter()
        .filter(|quad| camera.faces_camera(&quad.center(), &quad.normal))
        .map(|quad| (quad, (quad.center() - eye).norm()))
        .collect();
    visible.sort_by(|a, b| far_first(a.1, b.1));
    visible
}

/// Views sorted back to front for the current eye
fn face_order(camera: &OrbitCamera) -> Vec<View> {
    let eye = camera.eye();
    let mut views: Vec<(View, f32)> = View::ALL
        .iter()
        .map(|&view| (view, (FacePlacement::for_view(view).origin - eye).norm()))
        .collect();
    views.sort_by(|a, b| far_first(a.1, b.1));
    views.into_iter().map(|(view, _)| view).collect()
}

/// Decals in paint order: faces back to front, insertion order within a face,
/// decals facing away culled
pub fn visible_decals<'d>(camera: &OrbitCamera, decals: &'d [Decal]) -> Vec<&'d Decal> {
    face_order(camera)
        .into_iter()
        .flat_map(|view| decals.iter().filter(move |decal| decal.view == view))
        .filter(|decal| camera.faces_camera(&decal.center, &decal.normal))
        .collect()
}

/// Build the preview's shapes: one mesh for the garment, one per decal
pub fn build_scene(
    input: &SceneInput<'_>,
    texture_for: impl Fn(ElementId) -> Option<DecalTexture>,
) -> Vec<Shape> {
    let mut shapes = Vec::new();

    let mut garment = Mesh::default();
    let white_uv = egui::epaint::WHITE_UV;
    for (quad, _) in visible_garment_quads(input) {
        let Some(screen) = project_corners(input.camera, &quad.corners, input.viewport) else {
            continue;
        };
        push_quad(&mut garment, screen, [white_uv; 4], shade(input.garment_color, &quad.normal));
    }
    if !garment.is_empty() {
        shapes.push(Shape::mesh(garment));
    }

    for decal in visible_decals(input.camera, input.decals) {
        let Some(texture) = texture_for(decal.element_id) else {
            continue;
        };
        let corners = decal.corners_for(Vector2::new(texture.extent.x, texture.extent.y));
        let Some(screen) = project_corners(input.camera, &corners, input.viewport) else {
            continue;
        };
        let mut mesh = Mesh::with_texture(texture.id);
        push_quad(&mut mesh, screen, Decal::UVS, Color32::WHITE);
        shapes.push(Shape::mesh(mesh));
    }

    shapes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id_generator::generate_id;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn viewport() -> Rect {
        Rect::from_min_size(Pos2::ZERO, Vec2::new(400.0, 400.0))
    }

    fn decal(view: View) -> Decal {
        Decal::new(generate_id(), view, Pos2::new(50.0, 50.0))
    }

    #[test]
    fn test_front_camera_sees_front_decals_only() {
        let camera = OrbitCamera::default();
        let decals = [decal(View::Back), decal(View::Front), decal(View::Left)];
        let visible = visible_decals(&camera, &decals);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].view, View::Front);
    }

    #[test]
    fn test_decals_keep_insertion_order_within_face() {
        let mut camera = OrbitCamera::default();
        camera.azimuth = PI / 4.0;
        let decals = [decal(View::Front), decal(View::Right), decal(View::Front)];
        let visible = visible_decals(&camera, &decals);
        assert_eq!(visible.len(), 3);
        let fronts: Vec<_> = visible.iter().filter(|d| d.view == View::Front).collect();
        assert_eq!(fronts[0].element_id, decals[0].element_id);
        assert_eq!(fronts[1].element_id, decals[2].element_id);
    }

    #[test]
    fn test_scene_shapes() {
        let camera = OrbitCamera::default();
        let garment = GarmentProxy::new();
        let decals = [decal(View::Front), decal(View::Right)];
        let input = SceneInput {
            camera: &camera,
            viewport: viewport(),
            garment: &garment,
            garment_color: Color32::WHITE,
            decals: &decals,
        };
        let texture = DecalTexture {
            id: TextureId::Managed(1),
            extent: Vec2::splat(1.0),
        };
        let shapes = build_scene(&input, |_| Some(texture));
        // Garment mesh plus the front decal
        assert_eq!(shapes.len(), 2);

        let without_textures = build_scene(&input, |_| None);
        assert_eq!(without_textures.len(), 1);
    }

    #[test]
    fn test_right_face_sorted_last_from_right() {
        let mut camera = OrbitCamera::default();
        camera.azimuth = FRAC_PI_2;
        let order = face_order(&camera);
        assert_eq!(order.last(), Some(&View::Right));
        assert_eq!(order.first(), Some(&View::Left));
    }
}
