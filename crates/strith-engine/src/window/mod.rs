//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, and wires them to the GPU view and the
//! application's `ViewDelegate`.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
