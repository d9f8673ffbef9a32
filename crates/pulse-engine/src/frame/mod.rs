//! Per-frame driver: owns uploaded geometry and linked programs, and records
//! clear → bind → draw → unbind for every frame.

mod animation;
mod driver;
mod geometry;

pub use animation::{TimeUniform, pulse};
pub use driver::{DrawPair, DriverPhase, FrameDriver, FrameDriverConfig, FrameError};
pub use geometry::Geometry;
