//! Motion and spawn constants for the snowfall simulation
//!
//! Speeds and drifts are expressed in pixels per normalized frame, where one
//! normalized frame is 16ms (~60fps).

/// Timestamps and durations in milliseconds
pub type Millis = u64;

/// Frame duration the speed/wind units are normalized against (milliseconds)
pub const FRAME_BASELINE_MS: f32 = 16.0;

/// Vertical position particles are (re)spawned at, just above the surface
pub const RESPAWN_Y: f32 = -10.0;

/// Fraction of the configured intensity seeded at initialization
pub const INITIAL_FILL_RATIO: f32 = 0.3;

/// Probability of spawning one extra particle per tick while under the intensity cap
pub const SPAWN_CHANCE: f32 = 0.3;

/// Fall speed range (pixels per normalized frame)
pub const MIN_FALL_SPEED: f32 = 0.5;
pub const FALL_SPEED_SPREAD: f32 = 1.5;

/// Opacity range
pub const MIN_OPACITY: f32 = 0.3;
pub const OPACITY_SPREAD: f32 = 0.7;

/// Rotation speed spread (radians per normalized frame), centered on zero
pub const ROTATION_SPEED_SPREAD: f32 = 0.02;

/// Number of outer points on a star flake
pub const STAR_SPIKES: usize = 5;

/// Star inner radius as a fraction of the outer radius
pub const STAR_INNER_RATIO: f32 = 0.5;

/// Cross arm thickness as a fraction of the full arm length
pub const CROSS_ARM_RATIO: f32 = 0.66;
