//! Deterministic wheel simulation
//!
//! All spin and winner logic lives here. This module must be pure and deterministic:
//! - Virtual clock only (the host feeds elapsed time)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod easing;
pub mod engine;
pub mod geometry;
pub mod sequencer;
pub mod spin;
pub mod timer;

pub use easing::CubicBezier;
pub use engine::{Announcement, Command, WheelEngine, WheelEvent};
pub use geometry::WheelGeometry;
pub use sequencer::WinnerSequencer;
pub use spin::{SpinController, SpinOutcome, SpinPhase, SpinPlan};
pub use timer::{Scheduler, TimerHandle};
