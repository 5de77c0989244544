use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::gpu::RenderView;

use super::surface::{choose_alpha_mode, choose_surface_format, classify_surface_error};
use super::{GpuInit, SurfaceErrorAction, WgpuDevice, WgpuDrawable};

/// Window-bound GPU context: surface, adapter and the [`WgpuDevice`] built on them.
///
/// This is the render view cameras attach to. The surface borrows the window, so the
/// window must outlive the `Gpu`.
pub struct Gpu<'w> {
    surface: wgpu::Surface<'w>,
    adapter: wgpu::Adapter,
    device: WgpuDevice,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    clear_color: wgpu::Color,

    /// Outcome of the last failed drawable acquisition, until taken.
    surface_error: Option<SurfaceErrorAction>,
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to a window.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let GpuInit {
            prefer_srgb,
            present_mode,
            alpha_mode,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
            clear_color,
            uniform_slots,
            textures,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("strith-engine device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&caps, prefer_srgb)
            .context("no supported surface formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode,
            alpha_mode: choose_alpha_mode(&caps, alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency,
        };
        surface.configure(&device, &config);

        let info = adapter.get_info();
        log::info!("GPU: {} ({:?}), surface format {format:?}", info.name, info.backend);

        Ok(Gpu {
            surface,
            adapter,
            device: WgpuDevice::new(device, queue, textures, uniform_slots),
            config,
            size,
            clear_color,
            surface_error: None,
        })
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    pub fn wgpu_device(&self) -> &WgpuDevice {
        &self.device
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Reconfigures the surface after a resize.
    ///
    /// wgpu cannot configure a 0x0 surface; that size is recorded and configuration is
    /// deferred until the window has area again.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(self.device.raw(), &self.config);
    }

    /// Returns and clears the action recorded for the last failed acquisition.
    pub fn take_surface_error(&mut self) -> Option<SurfaceErrorAction> {
        self.surface_error.take()
    }

    fn handle_surface_error(&mut self, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        let action = classify_surface_error(&err);
        if action == SurfaceErrorAction::Reconfigured && self.size.width > 0 && self.size.height > 0
        {
            self.surface.configure(self.device.raw(), &self.config);
        }
        log::debug!("surface error {err:?} -> {action:?}");
        action
    }
}

impl RenderView for Gpu<'_> {
    type Device = WgpuDevice;

    fn device(&self) -> Option<&WgpuDevice> {
        Some(&self.device)
    }

    fn color_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    fn drawable_size(&self) -> (u32, u32) {
        (self.size.width, self.size.height)
    }

    fn current_drawable(&mut self) -> Option<WgpuDrawable> {
        if self.size.width == 0 || self.size.height == 0 {
            return None;
        }

        match self.surface.get_current_texture() {
            Ok(surface_texture) => {
                let view = surface_texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                Some(WgpuDrawable {
                    surface_texture: Some(surface_texture),
                    view,
                    clear: self.clear_color,
                })
            }
            Err(err) => {
                self.surface_error = Some(self.handle_surface_error(err));
                None
            }
        }
    }
}
