//! Frame orchestration: scene update, uniform refresh, one encoded frame.

use crate::camera::{Camera2D, FrameOutcome};
use crate::gpu::{GpuDevice, RenderView};
use crate::logging::Log;
use crate::scene::{Scene, SceneOwner, SceneSlot};
use crate::time::{FrameClock, FrameTime};

/// Drives one camera and the scene attached to it.
pub struct Renderer<D: GpuDevice> {
    camera: Camera2D<D>,
    scene: SceneSlot<D>,
    clock: FrameClock,
    log: Log,
}

impl<D: GpuDevice> Renderer<D> {
    pub fn new(camera: Camera2D<D>, log: Log) -> Self {
        Self {
            camera,
            scene: SceneSlot::new(log.clone()),
            clock: FrameClock::new(),
            log,
        }
    }

    pub fn camera(&self) -> &Camera2D<D> {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera2D<D> {
        &mut self.camera
    }

    pub fn scene(&self) -> &SceneSlot<D> {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneSlot<D> {
        &mut self.scene
    }

    /// Ticks the internal clock and renders one frame.
    pub fn render_frame<V>(&mut self, view: &mut V) -> FrameOutcome
    where
        V: RenderView<Device = D>,
    {
        let time = self.clock.tick();
        self.render_frame_at(view, &time)
    }

    /// Renders one frame with an explicit time step.
    ///
    /// Order: scene update, global uniform refresh, then the camera encodes the scene.
    pub fn render_frame_at<V>(&mut self, view: &mut V, time: &FrameTime) -> FrameOutcome
    where
        V: RenderView<Device = D>,
    {
        self.scene.update(time);
        self.camera.update_uniforms();
        self.camera.render(view, &[&self.scene])
    }

    /// Drawable size changed. Only the camera aspect is affected.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.camera.resize(width, height) {
            self.log.game_view(format!("Drawable size changed to {width}x{height}"));
        } else {
            self.log.game_view(format!("Ignoring degenerate drawable size {width}x{height}"));
        }
    }

    /// Restarts the frame clock so a long pause does not show up as one large step.
    pub fn reset_clock(&mut self) {
        self.clock.reset();
    }
}

impl<D: GpuDevice> SceneOwner<D> for Renderer<D> {
    fn set_scene(&mut self, scene: Option<Box<dyn Scene<D>>>) {
        self.scene.set_scene(scene);
    }

    fn has_scene(&self) -> bool {
        self.scene.has_scene()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::camera::{Camera2DFactory, CameraConfig, FrameError};
    use crate::gpu::{BufferIndex, Topology};
    use crate::logging::CaptureSink;
    use crate::render::{Mesh, Uniforms};
    use crate::scene::MeshScene;
    use crate::testing::{Call, Fail, RecordingDevice, RecordingView};

    fn setup() -> (RecordingDevice, RecordingView, Renderer<RecordingDevice>, Log, CaptureSink) {
        let device = RecordingDevice::new();
        let view = RecordingView::new(device.clone());
        let (log, sink) = Log::capture();
        let camera = Camera2DFactory::new("renderer", CameraConfig::default())
            .create_camera(&view, &log)
            .unwrap();
        device.clear_calls();
        sink.clear();
        (device, view, Renderer::new(camera, log.clone()), log, sink)
    }

    #[test]
    fn one_quad_frame_end_to_end() {
        let (device, mut view, mut renderer, log, _) = setup();
        let quad = Mesh::quad(&device, &log, 0.5).unwrap();
        renderer.set_scene(Some(Box::new(MeshScene::new().with_mesh(quad))));

        let outcome = renderer.render_frame_at(&mut view, &FrameTime::fixed(0.016, 0));
        assert_eq!(outcome, FrameOutcome::Presented);

        let calls: Vec<Call> = device
            .calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::MakeCommandBuffer | Call::MakeEncoder | Call::SetLabel(_)))
            .collect();
        let global = renderer.camera().global_uniforms().as_bytes().to_vec();
        assert_eq!(
            calls,
            vec![
                Call::SetPipeline("renderer".into()),
                Call::SetUniformBytes { index: BufferIndex::GlobalUniforms, bytes: global },
                Call::SetVertexBuffer { buffer: 0, index: BufferIndex::VertexData },
                Call::SetUniformBytes {
                    index: BufferIndex::MeshUniforms,
                    bytes: Uniforms::default().as_bytes().to_vec(),
                },
                Call::Draw { topology: Topology::Triangle, vertices: 0..6 },
                Call::EndEncoding,
                Call::Present,
                Call::Commit,
            ]
        );
    }

    #[test]
    fn scene_update_runs_before_encoding() {
        let (device, mut view, mut renderer, log, _) = setup();
        let scene = MeshScene::new()
            .with_mesh(Mesh::quad(&device, &log, 0.5).unwrap())
            .on_update(|meshes, _| meshes[0].set_offset(Vec2::new(0.1, 0.2)));
        renderer.set_scene(Some(Box::new(scene)));

        renderer.render_frame_at(&mut view, &FrameTime::fixed(0.016, 0));

        let pushed = device.calls().into_iter().find_map(|c| match c {
            Call::SetUniformBytes { index: BufferIndex::MeshUniforms, bytes } => Some(bytes),
            _ => None,
        });
        let pushed: Uniforms = bytemuck::pod_read_unaligned(&pushed.unwrap());
        assert_eq!(pushed.offset, [0.1, 0.2]);
    }

    #[test]
    fn frame_without_scene_still_presents() {
        let (device, mut view, mut renderer, _, _) = setup();

        assert!(!renderer.has_scene());
        assert!(renderer.render_frame(&mut view).is_presented());
        assert_eq!(device.calls().last(), Some(&Call::Commit));
    }

    #[test]
    fn detached_scene_is_not_drawn() {
        let (device, mut view, mut renderer, log, _) = setup();
        let quad = Mesh::quad(&device, &log, 0.5).unwrap();
        renderer.set_scene(Some(Box::new(MeshScene::new().with_mesh(quad))));
        renderer.set_scene(None);

        renderer.render_frame_at(&mut view, &FrameTime::fixed(0.016, 0));

        assert!(!device.calls().iter().any(|c| matches!(c, Call::Draw { .. })));
    }

    #[test]
    fn resize_touches_only_the_global_transform() {
        let (device, mut view, mut renderer, log, sink) = setup();
        let quad = Mesh::quad(&device, &log, 0.5).unwrap();
        let uploaded = device.buffer_contents(0);
        renderer.set_scene(Some(Box::new(MeshScene::new().with_mesh(quad))));
        renderer.render_frame_at(&mut view, &FrameTime::fixed(0.016, 0));
        let before = *renderer.camera().global_uniforms();

        renderer.resize(1600, 400);
        renderer.render_frame_at(&mut view, &FrameTime::fixed(0.016, 1));

        let after = *renderer.camera().global_uniforms();
        assert_ne!(before.transform, after.transform);
        assert_eq!(before.offset, after.offset);
        assert_eq!(renderer.camera().aspect(), 4.0);
        assert_eq!(device.buffer_count(), 1);
        assert_eq!(device.buffer_contents(0), uploaded);
        assert!(sink.rendered().contains(&"GAME_VIEW: Drawable size changed to 1600x400".to_string()));
    }

    #[test]
    fn dropped_frame_does_not_tear_down_the_renderer() {
        let (device, mut view, mut renderer, _, sink) = setup();
        device.fail(Fail::CommandBuffer);

        let outcome = renderer.render_frame(&mut view);
        assert_eq!(outcome, FrameOutcome::Dropped(FrameError::CommandBuffer));
        assert_eq!(sink.errors().len(), 1);

        device.heal(&Fail::CommandBuffer);
        assert!(renderer.render_frame(&mut view).is_presented());
    }
}
