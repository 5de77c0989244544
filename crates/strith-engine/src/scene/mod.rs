//! Scenes and their owners.
//!
//! A scene is something that can be drawn and stepped through time. An owner holds at
//! most one scene; attaching a new one replaces the old, attaching `None` detaches.

mod mesh_scene;
mod slot;

pub use mesh_scene::MeshScene;
pub use slot::SceneSlot;

use crate::gpu::GpuDevice;
use crate::render::Renderable;
use crate::time::FrameTime;

pub trait Scene<D: GpuDevice>: Renderable<D> {
    /// Advances simulation state by one frame.
    fn update(&mut self, time: &FrameTime);
}

pub trait SceneOwner<D: GpuDevice> {
    fn set_scene(&mut self, scene: Option<Box<dyn Scene<D>>>);

    fn has_scene(&self) -> bool;
}
