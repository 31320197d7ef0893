use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{DesignState, GarmentState};
use crate::element::Element;
use crate::util::time;
use crate::view::View;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to serialize design: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A value copy of one view handed to the cart; nothing tracks it afterwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSnapshot {
    pub color: String,
    pub view: View,
    pub elements: Vec<Element>,
    /// Seconds since the UNIX epoch
    pub saved_at: u64,
}

impl DesignSnapshot {
    pub fn capture(state: &DesignState, garment: &GarmentState, view: View) -> Self {
        Self {
            color: garment.color().to_owned(),
            view,
            elements: state.elements(view).to_vec(),
            saved_at: time::timestamp_secs(),
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;

    #[test]
    fn test_capture_is_a_copy() {
        let mut state = DesignState::new();
        let id = state.add_text("Hello", 24.0, Color32::BLACK, "Arial");
        let garment = GarmentState::new("red");

        let snapshot = DesignSnapshot::capture(&state, &garment, View::Front);
        state.move_element(id, 80.0, 80.0);

        assert_eq!(snapshot.color, "red");
        assert_eq!(snapshot.elements.len(), 1);
        assert_eq!(snapshot.elements[0].position().x, 50.0);
        assert!(snapshot.saved_at > 0);
    }

    #[test]
    fn test_json_round_trip() {
        let mut state = DesignState::new();
        state.add_text("Hello", 24.0, Color32::BLACK, "Arial");
        state.add_image("blob:1234");
        let snapshot = DesignSnapshot::capture(&state, &GarmentState::default(), View::Front);

        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"view\": \"front\""));
        let restored = DesignSnapshot::from_json(&json).unwrap();
        assert_eq!(restored, snapshot);
    }
}
