//! Frame timing.
//!
//! One `FrameClock` per window; `tick()` once per presented frame yields the
//! delta fed to `Composition::update`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
