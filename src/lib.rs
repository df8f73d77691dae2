//! Hover Racer - track generation and vehicle dynamics core
//!
//! Core modules:
//! - `math`: Vector helpers and oriented frames (`Basis`)
//! - `circuit`: Control-point loading, adaptive track subdivision, arc-length queries
//! - `sim`: Vehicle dynamics, race clock and the per-tick driver
//! - `config`: Data-driven tuning with design-constant defaults

pub mod circuit;
pub mod config;
pub mod math;
pub mod sim;

pub use circuit::{Circuit, LoadError};
pub use config::{Config, ConfigError};
pub use math::{Basis, VectorExt};

/// Design constants (defaults for `config`)
pub mod consts {
    /// Fixed simulation tick interval (milliseconds)
    pub const TICK_INTERVAL_MS: u32 = 10;
    /// Laps per race
    pub const LAP_COUNT: u32 = 3;

    /// Maximum chord length of a generated segment
    pub const SEG_LENGTH: f32 = 2.0;
    /// Full width of the driving surface
    pub const CIRC_WIDTH: f32 = 4.0;
    /// Lateral extent of each border strip
    pub const BORDER_WIDTH: f32 = 0.3;
    /// Height of each border strip along the track normal
    pub const BORDER_HEIGHT: f32 = 0.8;
    /// Subdivision depth guard (pathological input like near-duplicate points)
    pub const MAX_SUBDIVISION_DEPTH: u32 = 16;
    /// Hard ceiling on any configured subdivision depth
    pub const SUBDIVISION_DEPTH_CEILING: u32 = 24;
    /// Fewest control points that make a closed loop
    pub const MIN_CONTROL_POINTS: usize = 3;

    /// Nominal hover height above the track surface
    pub const LEVIT_HEIGHT: f32 = 0.3;
    /// Per-tick velocity retention
    pub const INERTY: f32 = 0.995;
    /// Thrust gained per accelerated tick
    pub const ACCEL: f32 = 0.000_005;
    /// Thrust ceiling
    pub const MAX_ACCEL: f32 = 0.0015;
    /// Heading change per steering tick (radians)
    pub const ROT_ANGLE: f32 = 0.025;
    /// Downward pull per tick
    pub const GRAVITY: f32 = 0.001;
    /// Safety margin inside the border strips
    pub const BORDER: f32 = 0.1;
    pub const GROUND_REACTION_TOUCH_FACTOR: f32 = 1.5;
    pub const GROUND_REACTION_FACTOR: f32 = 1.0;
    /// Repulsion right at the surface
    pub const GROUND_REACTION_MAX: f32 = 4.0 * GRAVITY;
    /// Height where repulsion vanishes
    pub const GROUND_REACTION_HEIGHT_MAX: f32 = LEVIT_HEIGHT * 3.0;
    pub const REACTION_FACTOR: f32 = 0.5;
    pub const REACTION_SPEED_FACTOR: f32 = 4.0;
    pub const REACTION_MIN: f32 = 1.0;

    /// Cosmetic bank angle per steering tick
    pub const SLOPE_INCREASE: f32 = 0.02;
    pub const SLOPE_DECREASE_FACTOR: f32 = 0.97;
    pub const SLOPE_MAX: f32 = std::f32::consts::FRAC_PI_3;
    /// Camera lateral offset per radian of bank
    pub const SLOPE_OFFSET_FACTOR: f32 = 0.5;

    /// Chase camera distance behind the vehicle
    pub const CAMERA_DISTANCE: f32 = 1.5;
    /// Chase camera screen-space drop below the vehicle
    pub const CAMERA_DROP: f32 = 0.6;
    /// Velocity magnitude (units/tick) to HUD speed units
    pub const SPEED_DISPLAY_FACTOR: f32 = 666.0;
    /// Per-tick arc-length delta below which the vehicle is going the wrong way
    pub const WRONG_WAY_TOLERANCE: f32 = 0.001;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Wrap an arc-length position into [0, total_length)
#[inline]
pub fn wrap_arc_position(position: f32, total_length: f32) -> f32 {
    if total_length <= 0.0 || !position.is_finite() {
        return 0.0;
    }
    let wrapped = position.rem_euclid(total_length);
    // rem_euclid can round up to exactly total_length for tiny negative inputs
    if wrapped >= total_length { 0.0 } else { wrapped }
}
