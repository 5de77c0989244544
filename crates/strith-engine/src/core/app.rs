use winit::event::WindowEvent;

use crate::device::Gpu;

use super::ctx::FrameCtx;

/// Control directive returned by delegate callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Callbacks the runtime drives for its render view.
pub trait ViewDelegate {
    /// Called once, after the window and its GPU view exist and before the first frame.
    fn attached(&mut self, view: &mut Gpu<'_>) -> AppControl;

    /// Called when the drawable is about to change size (physical pixels).
    fn drawable_size_will_change(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    /// Called for every window event before the runtime handles it.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per redraw.
    fn draw(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
