//! # Snow Regions
//!
//! Tracks the on-screen regions falling snow can land on and resolves which
//! region, if any, a point hits.

mod tracker;

pub use tracker::*;
