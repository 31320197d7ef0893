use std::ops::RangeInclusive;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::element::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, hex_color};
use crate::state::DEFAULT_GARMENT_COLOR;
use crate::tools::ResizeModel;

/// 3D preview camera settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub fov_y_degrees: f32,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 8.0,
            min_distance: 5.0,
            max_distance: 15.0,
            fov_y_degrees: 45.0,
            auto_rotate: true,
            auto_rotate_speed: 1.0,
        }
    }
}

/// Host settings, persisted between runs with eframe storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct DesignerConfig {
    /// Side of the square raster buffer per element, in pixels
    pub texture_size: u32,
    pub texture_cache_size: usize,
    pub resize_model: ResizeModel,
    pub default_font_family: String,
    pub default_font_size: f32,
    pub font_size_min: f32,
    pub font_size_max: f32,
    #[serde(with = "hex_color")]
    pub default_text_color: Color32,
    pub camera: CameraConfig,
    pub initial_color: String,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            texture_size: 256,
            texture_cache_size: 128,
            resize_model: ResizeModel::default(),
            default_font_family: DEFAULT_FONT_FAMILY.to_owned(),
            default_font_size: DEFAULT_FONT_SIZE,
            font_size_min: 12.0,
            font_size_max: 72.0,
            default_text_color: Color32::BLACK,
            camera: CameraConfig::default(),
            initial_color: DEFAULT_GARMENT_COLOR.to_owned(),
        }
    }
}

impl DesignerConfig {
    pub fn font_size_range(&self) -> RangeInclusive<f32> {
        let min = self.font_size_min.min(self.font_size_max);
        min..=self.font_size_max.max(min)
    }

    /// Keep a font size picked in the UI within the allowed range
    pub fn clamp_font_size(&self, size: f32) -> f32 {
        let range = self.font_size_range();
        size.clamp(*range.start(), *range.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: DesignerConfig =
            serde_json::from_str(r#"{"texture_size": 512, "camera": {"distance": 10.0}}"#).unwrap();
        assert_eq!(config.texture_size, 512);
        assert_eq!(config.camera.distance, 10.0);
        assert_eq!(config.camera.max_distance, 15.0);
        assert_eq!(config.resize_model, ResizeModel::CenterDistance);
        assert_eq!(config.initial_color, "aqua");
    }

    #[test]
    fn test_font_size_clamp() {
        let config = DesignerConfig::default();
        assert_eq!(config.clamp_font_size(4.0), 12.0);
        assert_eq!(config.clamp_font_size(100.0), 72.0);
        assert_eq!(config.default_text_color, Color32::BLACK);
    }
}
