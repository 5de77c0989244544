//! 2D camera: owns the device objects and encodes one frame per call.
//!
//! Cameras are built by [`Camera2DFactory`], which runs each GPU setup step in order and
//! stops at the first failure.

mod camera2d;
mod config;
mod factory;
mod frame;

pub use camera2d::Camera2D;
pub use config::CameraConfig;
pub use factory::{Camera2DFactory, CameraError, FactoryStep};
pub use frame::{FrameError, FrameOutcome};
