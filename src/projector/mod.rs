//! Maps each view's elements onto a textured 3D garment proxy.
//!
//! World space is right-handed with +y up. The front face looks towards +z.

pub mod camera;
pub mod garment;
pub mod placement;
pub mod scene;

pub use camera::OrbitCamera;
pub use garment::{GarmentProxy, Quad, shade};
pub use placement::{DECAL_SIZE, Decal, FacePlacement, face_local_offset, project_design};
pub use scene::{DecalTexture, SceneInput, build_scene, visible_decals};
