//! Spin controller
//!
//! State machine: Idle -> Spinning -> Idle (winner resolved) and
//! Idle -> Resetting -> Idle. The only way out of Spinning is the spin timer.
//! Rotation accumulates forever (never wrapped to 360) so every spin keeps
//! turning forward; only the delta added per spin decides the winner.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::easing::CubicBezier;
use super::geometry::WheelGeometry;
use super::timer::{Scheduler, TimerHandle};
use crate::consts::{FULL_TURN, MIN_FULL_TURNS};
use crate::error::StateError;
use crate::settings::EngineSettings;

/// Current phase of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinPhase {
    Idle,
    Spinning,
    Resetting,
}

/// What a started spin is going to do
#[derive(Debug, Clone, PartialEq)]
pub struct SpinPlan {
    /// Index into the active entries snapshot
    pub target_index: usize,
    pub from_rotation: f64,
    pub to_rotation: f64,
    pub full_turns: u32,
    pub duration_ms: f64,
}

/// A finished spin
#[derive(Debug, Clone, PartialEq)]
pub struct SpinOutcome {
    pub winner: String,
    pub target_index: usize,
    pub rotation: f64,
}

#[derive(Debug, Clone, Copy)]
struct Animation {
    from: f64,
    to: f64,
    start_ms: f64,
    duration_ms: f64,
    easing: CubicBezier,
}

impl Animation {
    fn value_at(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return self.to;
        }
        let t = ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * self.easing.ease(t)
    }
}

/// Owns the rotation and the spinning/resetting flags
#[derive(Debug, Clone)]
pub struct SpinController {
    rotation: f64,
    phase: SpinPhase,
    /// Active entries at spin start; the winner resolves against this
    snapshot: Vec<String>,
    target_index: usize,
    animation: Option<Animation>,
    /// The single outstanding timer (spin resolution or reset cooldown)
    pending: Option<TimerHandle>,
    rng: Pcg32,

    spin_duration_ms: f64,
    reset_cooldown_ms: f64,
    full_turns: u32,
    extra_random_turns: u32,
    spin_easing: CubicBezier,
    reset_easing: CubicBezier,
}

impl SpinController {
    pub fn new(settings: &EngineSettings, seed: u64) -> Self {
        Self {
            rotation: 0.0,
            phase: SpinPhase::Idle,
            snapshot: Vec::new(),
            target_index: 0,
            animation: None,
            pending: None,
            rng: Pcg32::seed_from_u64(seed),
            spin_duration_ms: settings.spin_duration_ms,
            reset_cooldown_ms: settings.reset_cooldown_ms,
            full_turns: settings.full_turns.max(MIN_FULL_TURNS),
            extra_random_turns: settings.extra_random_turns,
            spin_easing: settings.spin_easing,
            reset_easing: settings.reset_easing,
        }
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn is_spinning(&self) -> bool {
        self.phase == SpinPhase::Spinning
    }

    pub fn is_resetting(&self) -> bool {
        self.phase == SpinPhase::Resetting
    }

    /// Cumulative target rotation in degrees
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Rotation to draw at `now_ms` (eased toward the target while animating)
    pub fn display_rotation(&self, now_ms: f64) -> f64 {
        match &self.animation {
            Some(anim) => anim.value_at(now_ms),
            None => self.rotation,
        }
    }

    /// Whether a spin button should be enabled
    pub fn can_spin(&self) -> bool {
        self.phase == SpinPhase::Idle
    }

    /// Whether a reset button should be enabled (nothing to reset at zero)
    pub fn can_reset(&self) -> bool {
        self.phase != SpinPhase::Spinning && self.rotation != 0.0
    }

    /// Start a spin. `on_done` is scheduled to fire when the animation ends;
    /// the owner then calls [`SpinController::complete_spin`].
    pub fn spin<T>(
        &mut self,
        active: &[String],
        forced_winner: Option<&str>,
        timers: &mut Scheduler<T>,
        on_done: T,
    ) -> Result<SpinPlan, StateError> {
        match self.phase {
            SpinPhase::Spinning => return Err(StateError::AlreadySpinning),
            SpinPhase::Resetting => return Err(StateError::Resetting),
            SpinPhase::Idle => {}
        }
        let geometry = WheelGeometry::new(active.len()).ok_or(StateError::NoActiveEntries)?;

        let forced_index =
            forced_winner.and_then(|name| active.iter().position(|entry| entry == name));
        if let (Some(name), None) = (forced_winner, forced_index) {
            log::debug!("Forced winner {:?} is not on the wheel, picking at random", name);
        }
        let target_index =
            forced_index.unwrap_or_else(|| self.rng.random_range(0..active.len()));

        let extra = if self.extra_random_turns > 0 {
            self.rng.random_range(0..=self.extra_random_turns)
        } else {
            0
        };
        let full_turns = self.full_turns + extra;

        let from_rotation = self.rotation;
        let to_rotation =
            from_rotation + full_turns as f64 * FULL_TURN + geometry.winner_angle(target_index);

        self.phase = SpinPhase::Spinning;
        self.snapshot = active.to_vec();
        self.target_index = target_index;
        self.rotation = to_rotation;
        self.animation = Some(Animation {
            from: from_rotation,
            to: to_rotation,
            start_ms: timers.now(),
            duration_ms: self.spin_duration_ms,
            easing: self.spin_easing,
        });
        self.pending = Some(timers.schedule(self.spin_duration_ms, on_done));

        log::debug!(
            "Spin started: target {} of {}, {:.1} -> {:.1}",
            target_index,
            active.len(),
            from_rotation,
            to_rotation
        );

        Ok(SpinPlan {
            target_index,
            from_rotation,
            to_rotation,
            full_turns,
            duration_ms: self.spin_duration_ms,
        })
    }

    /// Finish the running spin and hand back the winner.
    ///
    /// Returns `None` when no spin is running (e.g. it was cancelled).
    pub fn complete_spin(&mut self) -> Option<SpinOutcome> {
        if self.phase != SpinPhase::Spinning {
            return None;
        }
        self.phase = SpinPhase::Idle;
        self.animation = None;
        self.pending = None;

        let snapshot = std::mem::take(&mut self.snapshot);
        let winner = snapshot.get(self.target_index).cloned()?;
        Some(SpinOutcome {
            winner,
            target_index: self.target_index,
            rotation: self.rotation,
        })
    }

    /// Snap the target rotation back to zero and hold the resetting flag for
    /// the cooldown window. `on_done` fires when the window closes.
    pub fn reset<T>(&mut self, timers: &mut Scheduler<T>, on_done: T) -> Result<(), StateError> {
        if self.phase == SpinPhase::Spinning {
            return Err(StateError::AlreadySpinning);
        }
        if let Some(handle) = self.pending.take() {
            timers.cancel(handle);
        }

        let now = timers.now();
        let from = self.display_rotation(now);
        self.rotation = 0.0;
        self.phase = SpinPhase::Resetting;
        self.animation = Some(Animation {
            from,
            to: 0.0,
            start_ms: now,
            duration_ms: self.reset_cooldown_ms,
            easing: self.reset_easing,
        });
        self.pending = Some(timers.schedule(self.reset_cooldown_ms, on_done));
        log::debug!("Reset started from {:.1}", from);
        Ok(())
    }

    /// Close the reset cooldown window
    pub fn finish_reset(&mut self) {
        if self.phase == SpinPhase::Resetting {
            self.phase = SpinPhase::Idle;
            self.animation = None;
            self.pending = None;
        }
    }

    /// Drop any running spin or reset without resolving it. The rotation
    /// keeps the value the cancelled spin was heading to.
    pub fn cancel<T>(&mut self, timers: &mut Scheduler<T>) {
        if let Some(handle) = self.pending.take() {
            timers.cancel(handle);
        }
        self.phase = SpinPhase::Idle;
        self.animation = None;
        self.snapshot.clear();
    }
}
