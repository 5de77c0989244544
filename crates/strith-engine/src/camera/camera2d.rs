use crate::coords::{rotation, scale, Viewport};
use crate::gpu::{
    BufferIndex, CommandBuffer, CommandQueue, GpuDevice, PipelineDescriptor, RenderEncoder,
    RenderView,
};
use crate::logging::Log;
use crate::render::{Renderable, Uniforms};

use super::{FrameError, FrameOutcome};

/// 2D camera bound to one device and pipeline.
///
/// Built by [`super::Camera2DFactory`]. Global uniforms are `rotation * aspect * 0.5`,
/// recomputed by [`Camera2D::update_uniforms`].
pub struct Camera2D<D: GpuDevice> {
    pub(super) name: String,
    pub(super) encoder_label: String,
    pub(super) device: D,
    pub(super) command_queue: D::Queue,
    pub(super) library: D::Library,
    pub(super) descriptor: PipelineDescriptor<D::Function>,
    pub(super) pipeline: D::Pipeline,
    pub(super) global_uniforms: Uniforms,
    pub(super) rotation: f32,
    pub(super) aspect: f32,
    pub(super) log: Log,
}

impl<D: GpuDevice> Camera2D<D> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn command_queue(&self) -> &D::Queue {
        &self.command_queue
    }

    pub fn library(&self) -> &D::Library {
        &self.library
    }

    pub fn descriptor(&self) -> &PipelineDescriptor<D::Function> {
        &self.descriptor
    }

    pub fn pipeline(&self) -> &D::Pipeline {
        &self.pipeline
    }

    pub fn global_uniforms(&self) -> &Uniforms {
        &self.global_uniforms
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, radians: f32) {
        self.rotation = radians;
    }

    /// Current `width / height` of the drawable.
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Records a new drawable size. Only the aspect ratio changes; a degenerate size
    /// keeps the previous aspect. Returns whether the aspect was updated.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        match Viewport::from_pixels(width, height).aspect() {
            Some(aspect) => {
                self.aspect = aspect;
                true
            }
            None => false,
        }
    }

    /// Recomputes the global transform from rotation and aspect.
    pub fn update_uniforms(&mut self) {
        let transform = rotation(self.rotation) * scale(1.0, self.aspect) * scale(0.5, 0.5);
        self.global_uniforms.set_transform(transform);
    }

    /// Encodes and submits one frame drawing `renderables` in order.
    ///
    /// Each step that can fail drops the frame: the failure is logged on the `RENDER` tag
    /// and nothing further is encoded. The camera stays usable for the next frame.
    pub fn render<V>(&self, view: &mut V, renderables: &[&dyn Renderable<D>]) -> FrameOutcome
    where
        V: RenderView<Device = D>,
    {
        let Some(mut command_buffer) = self.command_queue.make_command_buffer() else {
            return self.drop_frame(FrameError::CommandBuffer);
        };

        let Some(drawable) = view.current_drawable() else {
            return self.drop_frame(FrameError::RenderTarget);
        };

        let Some(mut encoder) = command_buffer.make_render_encoder(&drawable) else {
            return self.drop_frame(FrameError::Encoder);
        };

        encoder.set_label(&self.encoder_label);
        encoder.set_pipeline(&self.pipeline);
        encoder.set_uniform_bytes(self.global_uniforms.as_bytes(), BufferIndex::GlobalUniforms);

        for renderable in renderables {
            renderable.encode(&mut encoder);
        }

        command_buffer.end_encoding(encoder);
        command_buffer.present(drawable);
        command_buffer.commit();

        FrameOutcome::Presented
    }

    fn drop_frame(&self, err: FrameError) -> FrameOutcome {
        self.log.render_error(err);
        FrameOutcome::Dropped(err)
    }
}

impl<D: GpuDevice> std::fmt::Debug for Camera2D<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Camera2D")
            .field("name", &self.name)
            .field("rotation", &self.rotation)
            .field("aspect", &self.aspect)
            .finish_non_exhaustive()
    }
}
