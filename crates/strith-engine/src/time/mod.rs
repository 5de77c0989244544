//! Frame timing.
//!
//! One `FrameClock` per render loop; `tick()` once per frame yields the `FrameTime`
//! passed to scene updates.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
