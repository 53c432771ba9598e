//! Wheel engine
//!
//! Everything here is synchronous and free of I/O:
//! - `sector`: weighted layout and the shared angle convention
//! - `hit_test`: pointer position -> sector
//! - `spin`: trajectories and the Idle/Spinning/Settled state machine
//! - `engine`: the single owner of layout, rest angle and ledger

pub mod easing;
pub mod engine;
pub mod outcome;
pub mod sector;
pub mod spin;

pub use easing::Easing;
pub use engine::WheelEngine;
pub use hit_test::{HitTester, client_to_surface, hit_test_angle};
pub use outcome::{ApiResponse, DrawOutcome};
pub use sector::{LaidOutSector, REFERENCE_ANGLE, SectorLayout, SectorSpec, Tier};
pub use spin::{SpinAnimator, SpinPhase, Trajectory};
