//! # Snowfall Simulation
//!
//! CPU particle simulation for falling snow: spawning, motion, recycling and
//! drawing through a [`snow_surface::DrawSurface`].

pub mod error;
pub mod params;
pub mod render;
pub mod simulation;

pub use error::*;
pub use params::*;
pub use render::*;
pub use simulation::*;
