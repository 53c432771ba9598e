//! Spin animation: forward-only trajectories that land on a chosen tier
//!
//! The animator never owns a timer. `begin` hands back the trajectory,
//! the caller plays it for `duration_ms` and then calls `settle`.

use serde::{Deserialize, Serialize};

use super::easing::Easing;
use super::sector::{SectorLayout, Tier};
use crate::consts::{MIN_FULL_TURNS, SPIN_DURATION_MS};
use crate::error::{Result, WheelError};
use crate::wrap_degrees;

/// A planned rotation, in CSS `rotate()` degrees (positive = clockwise)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    /// Tier the wheel lands on
    pub tier: Tier,
    /// Rest angle the spin starts from, in [0, 360)
    pub start_degrees: f32,
    /// Absolute rotation once the spin is over
    pub total_rotation_degrees: f32,
    pub duration_ms: u32,
    pub easing: Easing,
}

impl Trajectory {
    /// Normalized progress for an elapsed time
    #[inline]
    pub fn progress(&self, elapsed_ms: f64) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        (elapsed_ms / f64::from(self.duration_ms)).clamp(0.0, 1.0) as f32
    }

    /// Wheel rotation after `elapsed_ms` of animation
    pub fn rotation_at(&self, elapsed_ms: f64) -> f32 {
        let eased = self.easing.sample(self.progress(elapsed_ms));
        self.start_degrees + (self.total_rotation_degrees - self.start_degrees) * eased
    }

    pub fn is_complete(&self, elapsed_ms: f64) -> bool {
        elapsed_ms >= f64::from(self.duration_ms)
    }

    pub fn remaining_ms(&self, elapsed_ms: f64) -> u32 {
        (f64::from(self.duration_ms) - elapsed_ms).max(0.0).ceil() as u32
    }

    /// Where the wheel rests once this trajectory has played out
    pub fn rest_degrees(&self) -> f32 {
        wrap_degrees(self.total_rotation_degrees)
    }
}

/// Animator state
#[derive(Debug, Clone, PartialEq)]
pub enum SpinPhase {
    /// Nothing has spun yet
    Idle,
    /// A trajectory is playing
    Spinning(Trajectory),
    /// The last spin finished; a new one may start
    Settled,
}

/// Owns the rest angle and the single in-flight spin
#[derive(Debug, Clone)]
pub struct SpinAnimator {
    full_turns: u32,
    duration_ms: u32,
    easing: Easing,
    rest_degrees: f32,
    phase: SpinPhase,
}

impl Default for SpinAnimator {
    fn default() -> Self {
        Self::new(MIN_FULL_TURNS, SPIN_DURATION_MS, Easing::EASE)
    }
}

impl SpinAnimator {
    /// `full_turns` below the minimum is raised to it
    pub fn new(full_turns: u32, duration_ms: u32, easing: Easing) -> Self {
        Self {
            full_turns: full_turns.max(MIN_FULL_TURNS),
            duration_ms,
            easing,
            rest_degrees: 0.0,
            phase: SpinPhase::Idle,
        }
    }

    pub fn phase(&self) -> &SpinPhase {
        &self.phase
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.phase, SpinPhase::Spinning(_))
    }

    /// Current rest angle in [0, 360)
    pub fn rest_degrees(&self) -> f32 {
        self.rest_degrees
    }

    /// The in-flight trajectory, if any
    pub fn trajectory(&self) -> Option<&Trajectory> {
        match &self.phase {
            SpinPhase::Spinning(t) => Some(t),
            _ => None,
        }
    }

    /// Plan a spin that parks `tier`'s midpoint under the top pointer.
    ///
    /// From rest `S` the wheel turns `full_turns * 360` plus the forward
    /// distance to `360 - M`, where `M` is the sector midpoint in degrees.
    /// From a fresh wheel that is `full_turns * 360 + (360 - M)`.
    /// Pure: the animator state is not touched.
    pub fn compute_trajectory(&self, layout: &SectorLayout, tier: &Tier) -> Result<Trajectory> {
        let sector = layout
            .find_tier(tier)
            .ok_or_else(|| WheelError::OutcomeNotFound {
                tier: tier.to_string(),
            })?;

        let start = self.rest_degrees;
        let target = 360.0 - sector.mid_degrees();
        let total = start + self.full_turns as f32 * 360.0 + wrap_degrees(target - start);

        Ok(Trajectory {
            tier: tier.clone(),
            start_degrees: start,
            total_rotation_degrees: total,
            duration_ms: self.duration_ms,
            easing: self.easing,
        })
    }

    /// Start spinning toward `tier`. Rejected while another spin is in flight.
    pub fn begin(&mut self, layout: &SectorLayout, tier: &Tier) -> Result<Trajectory> {
        if self.is_spinning() {
            return Err(WheelError::SpinAlreadyInFlight);
        }
        let trajectory = self.compute_trajectory(layout, tier)?;
        log::debug!(
            "Spin to '{}': {:.1}° -> {:.1}° over {} ms",
            tier,
            trajectory.start_degrees,
            trajectory.total_rotation_degrees,
            trajectory.duration_ms
        );
        self.phase = SpinPhase::Spinning(trajectory.clone());
        Ok(trajectory)
    }

    /// Rotation to display for this frame (None when not spinning)
    pub fn frame(&self, elapsed_ms: f64) -> Option<f32> {
        self.trajectory().map(|t| t.rotation_at(elapsed_ms))
    }

    /// Finish the in-flight spin once its full duration has elapsed.
    ///
    /// Returns the new rest angle (total rotation mod 360).
    pub fn settle(&mut self, elapsed_ms: f64) -> Result<f32> {
        let trajectory = match &self.phase {
            SpinPhase::Spinning(t) => t,
            _ => return Err(WheelError::NotSpinning),
        };
        if !trajectory.is_complete(elapsed_ms) {
            return Err(WheelError::SpinStillRunning {
                remaining_ms: trajectory.remaining_ms(elapsed_ms),
            });
        }

        self.rest_degrees = trajectory.rest_degrees();
        self.phase = SpinPhase::Settled;
        Ok(self.rest_degrees)
    }
}
