//! # Snow Engine
//!
//! Ties the simulator, the region tracker and the stuck-particle store
//! together: a per-frame driver that turns collisions into stuck particles,
//! plus a fixed-rate timer that fades them out.

pub mod clock;
pub mod error;
pub mod orchestrator;
pub mod settings;
pub mod timer;

pub use clock::*;
pub use error::*;
pub use orchestrator::*;
pub use settings::*;
pub use timer::*;
