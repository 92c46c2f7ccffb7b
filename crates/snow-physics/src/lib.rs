//! # Snow Physics
//!
//! Particle records and the frame-rate independent motion step for falling snow.

pub mod constants;
pub mod motion;
pub mod particle;

pub use constants::*;
pub use motion::*;
pub use particle::*;
