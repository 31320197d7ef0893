use egui::Color32;
use nalgebra::{Point3, Vector3};

const AMBIENT: f32 = 0.6;
const KEY_LIGHT: f32 = 0.4;

/// Direction towards the key light, upper front right
fn key_light_direction() -> Vector3<f32> {
    Vector3::new(0.4, 0.6, 1.0).normalize()
}

/// A flat quad of the garment proxy, corners counter-clockwise from outside
#[derive(Debug, Clone, PartialEq)]
pub struct Quad {
    pub corners: [Point3<f32>; 4],
    pub normal: Vector3<f32>,
}

impl Quad {
    pub fn center(&self) -> Point3<f32> {
        let sum = self
            .corners
            .iter()
            .fold(Vector3::zeros(), |acc, corner| acc + corner.coords);
        Point3::from(sum / 4.0)
    }
}

/// Axis-aligned box as six outward-facing quads
pub fn box_quads(center: Point3<f32>, size: Vector3<f32>) -> [Quad; 6] {
    let h = size / 2.0;
    let p = |x: f32, y: f32, z: f32| center + Vector3::new(x * h.x, y * h.y, z * h.z);
    let quad = |corners: [Point3<f32>; 4], normal: Vector3<f32>| Quad { corners, normal };

    [
        // +z
        quad(
            [p(-1.0, -1.0, 1.0), p(1.0, -1.0, 1.0), p(1.0, 1.0, 1.0), p(-1.0, 1.0, 1.0)],
            Vector3::z(),
        ),
        // -z
        quad(
            [p(1.0, -1.0, -1.0), p(-1.0, -1.0, -1.0), p(-1.0, 1.0, -1.0), p(1.0, 1.0, -1.0)],
            -Vector3::z(),
        ),
        // +x
        quad(
            [p(1.0, -1.0, 1.0), p(1.0, -1.0, -1.0), p(1.0, 1.0, -1.0), p(1.0, 1.0, 1.0)],
            Vector3::x(),
        ),
        // -x
        quad(
            [p(-1.0, -1.0, -1.0), p(-1.0, -1.0, 1.0), p(-1.0, 1.0, 1.0), p(-1.0, 1.0, -1.0)],
            -Vector3::x(),
        ),
        // +y
        quad(
            [p(-1.0, 1.0, 1.0), p(1.0, 1.0, 1.0), p(1.0, 1.0, -1.0), p(-1.0, 1.0, -1.0)],
            Vector3::y(),
        ),
        // -y
        quad(
            [p(-1.0, -1.0, -1.0), p(1.0, -1.0, -1.0), p(1.0, -1.0, 1.0), p(-1.0, -1.0, 1.0)],
            -Vector3::y(),
        ),
    ]
}

/// Body plus two sleeves
#[derive(Debug, Clone)]
pub struct GarmentProxy {
    quads: Vec<Quad>,
}

impl Default for GarmentProxy {
    fn default() -> Self {
        Self::new()
    }
}

impl GarmentProxy {
    pub const BODY_SIZE: [f32; 3] = [3.0, 4.0, 0.2];
    pub const SLEEVE_SIZE: [f32; 3] = [1.6, 2.0, 0.2];
    pub const SLEEVE_OFFSET: [f32; 3] = [2.2, 1.0, 0.0];

    pub fn new() -> Self {
        let [sx, sy, sz] = Self::SLEEVE_OFFSET;
        let body = box_quads(Point3::origin(), Vector3::from(Self::BODY_SIZE));
        let left = box_quads(Point3::new(-sx, sy, sz), Vector3::from(Self::SLEEVE_SIZE));
        let right = box_quads(Point3::new(sx, sy, sz), Vector3::from(Self::SLEEVE_SIZE));

        Self {
            quads: body.into_iter().chain(left).chain(right).collect(),
        }
    }

    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }
}

/// Lambert shading with a fixed ambient term
pub fn shade(base: Color32, normal: &Vector3<f32>) -> Color32 {
    let diffuse = normal.normalize().dot(&key_light_direction()).max(0.0);
    let intensity = (AMBIENT + KEY_LIGHT * diffuse).min(1.0);
    let channel = |c: u8| (c as f32 * intensity).round() as u8;
    Color32::from_rgb(channel(base.r()), channel(base.g()), channel(base.b()))
}
