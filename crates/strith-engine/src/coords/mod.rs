//! Viewport and transform math shared by the camera and meshes.
//!
//! Clip space convention: the final vertex position is
//! `global.transform * (mesh.transform * position + mesh.offset) + global.offset`.

mod transform;
mod viewport;

pub use transform::{radians_from_degrees, rotation, scale};
pub use viewport::Viewport;
