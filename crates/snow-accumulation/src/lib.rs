//! # Snow Accumulation
//!
//! Stuck particles: per-region storage with a capacity cap and timed fade-out,
//! the observable [`SnowStore`] that owns them alongside the configuration, and
//! the painter that draws them on top of their regions.

pub mod presentation;
pub mod store;
pub mod stuck;

pub use presentation::*;
pub use store::*;
pub use stuck::*;
