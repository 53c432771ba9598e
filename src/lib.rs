//! Prize Wheel - a weighted prize wheel engine
//!
//! Core modules:
//! - `wheel`: Sector layout, hit testing, spin trajectories and the engine facade
//! - `renderer`: Surface-agnostic wheel painting plus a CPU tessellation backend
//! - `ledger`: Bounded, persisted history of redeemed draws
//! - `platform`: Browser/native platform abstraction (key-value storage)
//! - `settings`: Data-driven geometry, label and spin tuning

pub mod error;
pub mod ledger;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod wheel;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{Result, WheelError};
pub use ledger::{LedgerEntry, RedemptionLedger};
pub use settings::WheelSettings;
pub use wheel::{
    DrawOutcome, SectorLayout, SectorSpec, SpinAnimator, SpinPhase, Tier, Trajectory, WheelEngine,
};

use glam::Vec2;
use std::f32::consts::TAU;

/// Wheel configuration constants
pub mod consts {
    /// Outer radius of the painted wheel (pixels)
    pub const WHEEL_RADIUS: f32 = 240.0;
    /// Hub radius; pointer positions inside it hit nothing
    pub const HUB_RADIUS: f32 = 40.0;
    /// Width of the contrasting stroke between sectors
    pub const SECTOR_STROKE_WIDTH: f32 = 3.0;

    /// Weights are integer percentages and must sum to this
    pub const TOTAL_WEIGHT: u32 = 100;

    /// Minimum full turns before the wheel settles
    pub const MIN_FULL_TURNS: u32 = 3;
    /// Spin animation length
    pub const SPIN_DURATION_MS: u32 = 4000;

    /// Redemption history entries kept in storage
    pub const LEDGER_CAPACITY: usize = 100;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Wrap degrees into [0, 360)
#[inline]
pub fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}
