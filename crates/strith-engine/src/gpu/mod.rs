//! GPU abstraction the rendering layers are written against.
//!
//! The traits mirror the shape of a command-queue graphics API:
//! a device creates queues, shader libraries, pipelines and resources; a queue hands out
//! command buffers; a command buffer opens render encoders against a drawable, presents it
//! and commits. `crate::device` implements them on wgpu.
//!
//! Binding slots are fixed and shared with the shader (see [`BufferIndex`], [`TextureIndex`]).

mod error;
mod traits;
mod types;

pub use error::{BackendError, BackendResult};
pub use traits::{CommandBuffer, CommandQueue, GpuDevice, RenderEncoder, RenderView};
pub use types::{BufferIndex, PipelineDescriptor, ShaderSource, TextureIndex, Topology};
