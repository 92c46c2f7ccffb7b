//! # snow-surface
//!
//! Backend agnostic 2D drawing for the snowfall effect.
//!
//! The simulator draws through the [`DrawSurface`] contract (a small subset of a
//! canvas 2D context). [`MeshSurface`] tessellates those calls into a triangle
//! [`Mesh`] that a GPU backend such as `snow-renderer` uploads as-is.

mod color;
mod mesh;
mod primitives;
mod recording;
mod surface;
mod tessellate;

pub use color::*;
pub use mesh::*;
pub use primitives::*;
pub use recording::*;
pub use surface::*;
pub use tessellate::*;
