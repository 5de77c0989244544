use crate::gpu::GpuDevice;
use crate::render::{Mesh, Renderable};
use crate::time::FrameTime;

use super::Scene;

type UpdateFn<D> = Box<dyn FnMut(&mut [Mesh<D>], &FrameTime)>;

/// Scene made of an ordered list of meshes.
///
/// Each mesh is pre-rendered then rendered before the next one starts, in insertion
/// order. An optional update closure animates the meshes.
pub struct MeshScene<D: GpuDevice> {
    meshes: Vec<Mesh<D>>,
    on_update: Option<UpdateFn<D>>,
}

impl<D: GpuDevice> MeshScene<D> {
    pub fn new() -> Self {
        Self {
            meshes: Vec::new(),
            on_update: None,
        }
    }

    pub fn with_mesh(mut self, mesh: Mesh<D>) -> Self {
        self.meshes.push(mesh);
        self
    }

    pub fn push(&mut self, mesh: Mesh<D>) {
        self.meshes.push(mesh);
    }

    /// Sets the closure run on every `update`, replacing any previous one.
    pub fn on_update(mut self, f: impl FnMut(&mut [Mesh<D>], &FrameTime) + 'static) -> Self {
        self.on_update = Some(Box::new(f));
        self
    }

    pub fn meshes(&self) -> &[Mesh<D>] {
        &self.meshes
    }

    pub fn meshes_mut(&mut self) -> &mut [Mesh<D>] {
        &mut self.meshes
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

impl<D: GpuDevice> Default for MeshScene<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: GpuDevice> Renderable<D> for MeshScene<D> {
    fn pre_render(&self, _encoder: &mut D::Encoder) {}

    fn render(&self, encoder: &mut D::Encoder) {
        for mesh in &self.meshes {
            mesh.encode(encoder);
        }
    }
}

impl<D: GpuDevice> Scene<D> for MeshScene<D> {
    fn update(&mut self, time: &FrameTime) {
        if let Some(f) = self.on_update.as_mut() {
            f(&mut self.meshes, time);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::gpu::{BufferIndex, CommandBuffer, CommandQueue, GpuDevice, Topology};
    use crate::logging::Log;
    use crate::render::Vertex;
    use crate::testing::{Call, RecordedDrawable, RecordingDevice};

    #[test]
    fn meshes_are_encoded_one_after_another() {
        let device = RecordingDevice::new();
        let (log, _) = Log::capture();
        let scene = MeshScene::new()
            .with_mesh(Mesh::quad(&device, &log, 0.5).unwrap())
            .with_mesh(
                Mesh::new(&device, &log, Topology::Point, vec![Vertex::new(0.0, 0.0)]).unwrap(),
            );

        let queue = device.make_command_queue().unwrap();
        let mut cb = queue.make_command_buffer().unwrap();
        let mut enc = cb.make_render_encoder(&RecordedDrawable).unwrap();
        device.clear_calls();

        scene.encode(&mut enc);

        let shape: Vec<&str> = device
            .calls()
            .iter()
            .map(|c| match c {
                Call::SetVertexBuffer { index: BufferIndex::VertexData, .. } => "vbo",
                Call::SetUniformBytes { index: BufferIndex::MeshUniforms, .. } => "uniforms",
                Call::Draw { .. } => "draw",
                _ => "other",
            })
            .collect();
        assert_eq!(shape, vec!["vbo", "uniforms", "draw", "vbo", "uniforms", "draw"]);
    }

    #[test]
    fn update_closure_sees_meshes_and_time() {
        let device = RecordingDevice::new();
        let (log, _) = Log::capture();
        let mut scene = MeshScene::new()
            .with_mesh(Mesh::quad(&device, &log, 0.5).unwrap())
            .on_update(|meshes, time| {
                for mesh in meshes {
                    mesh.set_offset(Vec2::new(time.elapsed, 0.0));
                }
            });

        scene.update(&FrameTime::fixed(0.25, 2));

        assert_eq!(scene.meshes()[0].uniforms().offset(), Vec2::new(0.5, 0.0));
    }

    #[test]
    fn update_without_closure_is_a_no_op() {
        let mut scene = MeshScene::<RecordingDevice>::new();
        scene.update(&FrameTime::fixed(0.016, 0));
        assert!(scene.is_empty());
    }
}
