use std::f32::consts::TAU;

use egui::{Pos2, Rect, Vec2};
use nalgebra::{Isometry3, Perspective3, Point3, Vector3};

use crate::config::CameraConfig;

/// Elevation limit in radians, keeps the up vector well defined
pub const MAX_ELEVATION: f32 = 1.4;
/// Scroll points per 5% zoom step
const ZOOM_STEP_POINTS: f32 = 50.0;
const ZOOM_STEP: f32 = 0.95;
const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

/// Orbits the origin; azimuth 0 looks at the front face from +z
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: Point3<f32>,
    pub distance: f32,
    /// radians
    pub azimuth: f32,
    /// radians
    pub elevation: f32,
    pub fov_y: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
    default_distance: f32,
    dragging: bool,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl OrbitCamera {
    pub fn from_config(config: &CameraConfig) -> Self {
        let min_distance = config.min_distance.min(config.max_distance);
        let max_distance = config.max_distance.max(config.min_distance);
        let distance = config.distance.clamp(min_distance, max_distance);
        Self {
            target: Point3::origin(),
            distance,
            azimuth: 0.0,
            elevation: 0.0,
            fov_y: config.fov_y_degrees.to_radians(),
            min_distance,
            max_distance,
            auto_rotate: config.auto_rotate,
            auto_rotate_speed: config.auto_rotate_speed,
            default_distance: distance,
            dragging: false,
        }
    }

    /// Pointer drag in points over a viewport `height` points tall
    pub fn orbit(&mut self, delta: Vec2, height: f32) {
        if height <= 0.0 {
            return;
        }
        self.azimuth -= TAU * delta.x / height;
        self.elevation =
            (self.elevation + TAU * delta.y / height).clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    /// Positive scroll zooms in
    pub fn zoom(&mut self, scroll: f32) {
        self.distance *= ZOOM_STEP.powf(scroll / ZOOM_STEP_POINTS);
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Advance auto-rotation; returns true if the camera moved
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.auto_rotate || self.dragging || dt <= 0.0 {
            return false;
        }
        self.azimuth = (self.azimuth + TAU / 60.0 * self.auto_rotate_speed * dt) % TAU;
        true
    }

    pub fn reset(&mut self) {
        self.distance = self.default_distance;
        self.azimuth = 0.0;
        self.elevation = 0.0;
        self.target = Point3::origin();
    }

    pub fn eye(&self) -> Point3<f32> {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        let offset = Vector3::new(cos_el * sin_az, sin_el, cos_el * cos_az) * self.distance;
        self.target + offset
    }

    pub fn view(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.eye(), &self.target, &Vector3::y())
    }

    pub fn projection(&self, aspect: f32) -> Perspective3<f32> {
        Perspective3::new(aspect.max(f32::EPSILON), self.fov_y, NEAR, FAR)
    }

    /// True when a surface at `point` with `normal` faces the eye
    pub fn faces_camera(&self, point: &Point3<f32>, normal: &Vector3<f32>) -> bool {
        normal.dot(&(self.eye() - point)) > 0.0
    }

    /// Screen position and view depth, `None` behind the near plane
    pub fn project(&self, point: &Point3<f32>, viewport: Rect) -> Option<(Pos2, f32)> {
        let in_view = self.view().transform_point(point);
        let depth = -in_view.z;
        if depth < NEAR {
            return None;
        }

        let ndc = self.projection(viewport.aspect_ratio()).project_point(&in_view);
        let center = viewport.center();
        let screen = Pos2::new(
            center.x + ndc.x * viewport.width() / 2.0,
            center.y - ndc.y * viewport.height() / 2.0,
        );
        Some((screen, depth))
    }
}
