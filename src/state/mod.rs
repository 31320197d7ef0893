pub mod context;
mod design;
mod garment;
mod snapshot;

pub use context::DesignContext;
pub use design::{DesignState, ViewCollection};
pub use garment::{DEFAULT_GARMENT_COLOR, GarmentColor, GarmentState};
pub use snapshot::{DesignSnapshot, SnapshotError};
