use crate::gpu::GpuDevice;

/// Anything that can record itself into a render encoder.
pub trait Renderable<D: GpuDevice> {
    /// Binds the resources `render` needs.
    fn pre_render(&self, encoder: &mut D::Encoder);

    /// Issues draw calls.
    fn render(&self, encoder: &mut D::Encoder);

    /// Pre-render immediately followed by render.
    fn encode(&self, encoder: &mut D::Encoder) {
        self.pre_render(encoder);
        self.render(encoder);
    }
}
