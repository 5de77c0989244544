use anyhow::Result;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};

use strith_engine::camera::{Camera2DFactory, CameraConfig};
use strith_engine::coords::rotation;
use strith_engine::core::{AppControl, FrameCtx, ViewDelegate};
use strith_engine::device::{Gpu, GpuInit, TextureLoader, WgpuDevice};
use strith_engine::gpu::{TextureIndex, Topology};
use strith_engine::logging::{init_logging, Log, LoggingConfig};
use strith_engine::render::{Mesh, MeshError, Vertex, DEFAULT_QUAD_SCALE};
use strith_engine::renderer::Renderer;
use strith_engine::scene::{MeshScene, SceneOwner};
use strith_engine::window::{Runtime, RuntimeConfig};

/// Camera rotation added every frame, in radians.
const ROTATION_STEP: f32 = 0.01;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "Strithveina".to_string(),
        initial_size: LogicalSize::new(800.0, 800.0),
    };
    let gpu_init = GpuInit {
        textures: TextureLoader::default().with_root(concat!(env!("CARGO_MANIFEST_DIR"), "/assets")),
        ..GpuInit::default()
    };

    Runtime::run(config, gpu_init, Viewer::new(Log::default()))
}

struct Viewer {
    log: Log,
    factory: Camera2DFactory,
    renderer: Option<Renderer<WgpuDevice>>,
}

impl Viewer {
    fn new(log: Log) -> Self {
        Self {
            log,
            factory: Camera2DFactory::new("Main camera", CameraConfig::default()),
            renderer: None,
        }
    }
}

impl ViewDelegate for Viewer {
    fn attached(&mut self, view: &mut Gpu<'_>) -> AppControl {
        let size = view.size();
        let adapter = view.adapter_info();
        self.log.game_view(format!(
            "View attached ({}x{}) on {} ({:?})",
            size.width, size.height, adapter.name, adapter.backend
        ));

        let camera = match self.factory.create_camera(&*view, &self.log) {
            Ok(camera) => camera,
            Err(e) => {
                self.log.game_view_error(format!("Unable to create camera: {e}"));
                return AppControl::Exit;
            }
        };

        let mut renderer = Renderer::new(camera, self.log.clone());
        match demo_scene(view.wgpu_device(), &self.log) {
            Ok(scene) => renderer.set_scene(Some(Box::new(scene))),
            Err(e) => self.log.game_view_error(format!("Demo scene unavailable: {e}")),
        }

        self.renderer = Some(renderer);
        AppControl::Continue
    }

    fn drawable_size_will_change(&mut self, width: u32, height: u32) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.resize(width, height);
        }
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape) =>
            {
                AppControl::Exit
            }
            WindowEvent::Occluded(false) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.reset_clock();
                }
                AppControl::Continue
            }
            _ => AppControl::Continue,
        }
    }

    fn draw(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(renderer) = self.renderer.as_mut() else {
            return AppControl::Continue;
        };

        let camera = renderer.camera_mut();
        camera.set_rotation(camera.rotation() + ROTATION_STEP);

        ctx.render(renderer)
    }
}

/// Textured quad with a small colored triangle spinning the other way on top.
///
/// Falls back to an untextured quad when the `ColorMap` asset is missing.
fn demo_scene(device: &WgpuDevice, log: &Log) -> Result<MeshScene<WgpuDevice>, MeshError> {
    let quad = Mesh::textured_quad(device, log, "ColorMap", TextureIndex::COLOR, DEFAULT_QUAD_SCALE)
        .or_else(|_| Mesh::quad(device, log, DEFAULT_QUAD_SCALE))?;

    let triangle = Mesh::new(
        device,
        log,
        Topology::Triangle,
        vec![
            Vertex::new(-0.2, -0.15).with_color(1.0, 0.2, 0.2, 1.0),
            Vertex::new(0.2, -0.15).with_color(0.2, 1.0, 0.2, 1.0),
            Vertex::new(0.0, 0.2).with_color(0.2, 0.2, 1.0, 1.0),
        ],
    )?;

    Ok(MeshScene::new()
        .with_mesh(quad)
        .with_mesh(triangle)
        .on_update(|meshes, time| {
            if let Some(triangle) = meshes.get_mut(1) {
                triangle.set_transform(rotation(-2.0 * time.elapsed));
            }
        }))
}
