use std::ops::Range;

use super::{BackendResult, BufferIndex, PipelineDescriptor, ShaderSource, TextureIndex, Topology};

/// Logical device: creates every long-lived GPU object.
///
/// Handles are cheap to clone; clones refer to the same device.
pub trait GpuDevice: Clone + Sized + 'static {
    type Queue: CommandQueue<Self> + 'static;
    type Library: 'static;
    type Function: Clone + 'static;
    type Pipeline: 'static;
    type Buffer: 'static;
    type Texture: 'static;
    type Encoder: RenderEncoder<Self>;

    /// Current frame's render target: drawable plus the pass description to render into it.
    type Drawable;

    fn make_command_queue(&self) -> BackendResult<Self::Queue>;

    fn make_library(&self, source: &ShaderSource) -> BackendResult<Self::Library>;

    fn make_function(&self, library: &Self::Library, name: &str) -> BackendResult<Self::Function>;

    fn make_pipeline_state(
        &self,
        descriptor: &PipelineDescriptor<Self::Function>,
    ) -> BackendResult<Self::Pipeline>;

    /// Allocates an immutable vertex buffer initialized with `contents`.
    fn make_vertex_buffer(&self, label: &str, contents: &[u8]) -> BackendResult<Self::Buffer>;

    /// Loads and decodes a named texture asset for sampling.
    fn load_texture(&self, name: &str) -> BackendResult<Self::Texture>;
}

pub trait CommandQueue<D: GpuDevice> {
    type CommandBuffer: CommandBuffer<D>;

    /// Returns `None` when no command buffer can be created this frame.
    fn make_command_buffer(&self) -> Option<Self::CommandBuffer>;
}

pub trait CommandBuffer<D: GpuDevice> {
    /// Opens a render encoder that draws into `drawable`.
    fn make_render_encoder(&mut self, drawable: &D::Drawable) -> Option<D::Encoder>;

    /// Finishes recording for `encoder`.
    fn end_encoding(&mut self, encoder: D::Encoder);

    /// Schedules `drawable` for presentation once this buffer is committed.
    fn present(&mut self, drawable: D::Drawable);

    /// Submits the recorded work. Never waits on the GPU.
    fn commit(self);
}

/// Records draw state and draw calls for one render pass.
pub trait RenderEncoder<D: GpuDevice> {
    fn set_label(&mut self, label: &str);

    fn set_pipeline(&mut self, pipeline: &D::Pipeline);

    fn set_vertex_buffer(&mut self, buffer: &D::Buffer, index: BufferIndex);

    /// Copies `bytes` into transient uniform storage and binds them at `index`.
    fn set_uniform_bytes(&mut self, bytes: &[u8], index: BufferIndex);

    fn set_fragment_texture(&mut self, texture: &D::Texture, index: TextureIndex);

    fn draw(&mut self, topology: Topology, vertices: Range<u32>);
}

/// Host view a camera is attached to.
pub trait RenderView {
    type Device: GpuDevice;

    /// Device backing the view, if one has been set up.
    fn device(&self) -> Option<&Self::Device>;

    fn color_format(&self) -> wgpu::TextureFormat;

    /// Drawable size in physical pixels.
    fn drawable_size(&self) -> (u32, u32);

    /// Acquires the render target for the current frame.
    fn current_drawable(&mut self) -> Option<<Self::Device as GpuDevice>::Drawable>;
}
