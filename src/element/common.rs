use egui::Pos2;

// Common constants for all element types
pub const MIN_SCALE: f32 = 0.5;
pub const MAX_SCALE: f32 = 3.0;
pub const DEFAULT_SCALE: f32 = 1.0;

/// Printable area on both axes, in percent of the canvas
pub const PRINTABLE_MIN: f32 = 10.0;
pub const PRINTABLE_MAX: f32 = 90.0;

pub const CANVAS_CENTER: Pos2 = Pos2::new(50.0, 50.0);
pub const MIN_FONT_SIZE: f32 = 1.0;

pub fn clamp_scale(scale: f32) -> f32 {
    if scale.is_nan() {
        return DEFAULT_SCALE;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// Keeps a percent position inside the printable area
pub fn clamp_position(pos: Pos2) -> Pos2 {
    let clamp_axis = |v: f32| {
        if v.is_nan() {
            CANVAS_CENTER.x
        } else {
            v.clamp(PRINTABLE_MIN, PRINTABLE_MAX)
        }
    };
    Pos2::new(clamp_axis(pos.x), clamp_axis(pos.y))
}

/// Serialize `Color32` as `#rrggbb` / `#rrggbbaa`
pub(crate) mod hex_color {
    use egui::Color32;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error> {
        let hex = if color.a() == 255 {
            format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
        } else {
            color.to_hex()
        };
        serializer.serialize_str(&hex)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color32, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Color32::from_hex(&hex)
            .map_err(|e| D::Error::custom(format!("invalid color {hex:?}: {e:?}")))
    }
}
