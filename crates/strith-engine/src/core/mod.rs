//! Contracts between the runtime (platform loop) and the application.
//!
//! The runtime owns the window and its GPU view; the application implements
//! [`ViewDelegate`] and receives a [`FrameCtx`] once per redraw.

mod app;
mod ctx;

pub use app::{AppControl, ViewDelegate};
pub use ctx::{FrameCtx, WindowCtx};
