//! Strith engine crate.
//!
//! 2D rendering scaffold: a camera that encodes one frame per redraw, meshes that bind
//! and draw themselves, and scenes that own the meshes. The layers above `gpu` are
//! written against its traits; `device` implements them on wgpu, `window` hosts them
//! in a winit event loop.

pub mod camera;
pub mod coords;
pub mod core;
pub mod device;
pub mod gpu;
pub mod logging;
pub mod render;
pub mod renderer;
pub mod scene;
pub mod time;
pub mod window;

#[cfg(test)]
mod testing;
