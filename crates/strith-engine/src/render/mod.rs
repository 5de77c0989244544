//! Renderable meshes.
//!
//! Convention:
//! - geometry is in clip units around the origin; the camera's global transform
//!   applies aspect correction
//! - every mesh binds its vertex buffer at `BufferIndex::VertexData` and its uniforms at
//!   `BufferIndex::MeshUniforms`; extra resources are attached as [`Binder`]s

mod binder;
mod mesh;
mod renderable;
mod uniforms;
mod vertex;

pub use binder::{Binder, TextureBinder};
pub use mesh::{Mesh, MeshError, DEFAULT_QUAD_SCALE};
pub use renderable::Renderable;
pub use uniforms::Uniforms;
pub use vertex::{quad_vertices, Vertex};
