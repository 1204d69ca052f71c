//! Frame timing.

mod clock;

pub use clock::{FrameClock, FrameTime};
