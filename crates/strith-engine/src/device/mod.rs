//! wgpu backend.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue and configuring the window surface
//! - implementing the `gpu` traits on top of them
//! - loading named textures from disk

mod arena;
mod backend;
mod error;
mod gpu;
mod init;
mod surface;
mod texture;

pub use backend::{
    ShaderStage, WgpuBuffer, WgpuCommandBuffer, WgpuDevice, WgpuDrawable, WgpuEncoder,
    WgpuFunction, WgpuLibrary, WgpuPipeline, WgpuQueue,
};
pub use error::SurfaceErrorAction;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use texture::{TextureLoader, WgpuTexture};
