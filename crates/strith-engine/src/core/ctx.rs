use winit::window::{Window, WindowId};

use crate::camera::FrameOutcome;
use crate::device::{Gpu, SurfaceErrorAction, WgpuDevice};
use crate::renderer::Renderer;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Window handle and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

/// Per-frame context passed to `ViewDelegate::draw`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub view: &'a mut Gpu<'w>,
    pub runtime: &'a mut RuntimeCtx,
}

impl FrameCtx<'_, '_> {
    /// Renders one frame of `renderer` into this window.
    ///
    /// A dropped frame is not an error; only a fatal surface failure asks the runtime
    /// to exit.
    pub fn render(&mut self, renderer: &mut Renderer<WgpuDevice>) -> AppControl {
        self.window.window.pre_present_notify();

        match renderer.render_frame(self.view) {
            FrameOutcome::Presented => AppControl::Continue,
            FrameOutcome::Dropped(_) => match self.view.take_surface_error() {
                Some(SurfaceErrorAction::Fatal) => AppControl::Exit,
                _ => AppControl::Continue,
            },
        }
    }
}
