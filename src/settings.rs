//! Engine settings
//!
//! Timing and geometry knobs for the wheel. Every field has a default so a
//! partial JSON blob (e.g. from the canvas `data-settings` attribute) is fine.

use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_SIZE, MIN_FULL_TURNS, WHEEL_MARGIN};
use crate::sim::easing::CubicBezier;

/// Engine settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    // === Timing (milliseconds) ===
    /// Spin animation length; the winner resolves when it elapses
    pub spin_duration_ms: f64,
    /// How long the wheel eases back to zero after a reset
    pub reset_cooldown_ms: f64,
    /// Pause between dismissing a winner and the next automatic spin
    pub auto_advance_delay_ms: f64,
    /// Non-final winner announcements close on their own after this (0 = never)
    pub announcement_dismiss_ms: f64,

    // === Spin shape ===
    /// Full turns added to every spin (at least 3)
    pub full_turns: u32,
    /// Up to this many extra random full turns for variety
    pub extra_random_turns: u32,
    /// Spin easing curve
    pub spin_easing: CubicBezier,
    /// Reset easing curve
    pub reset_easing: CubicBezier,

    // === Surface ===
    /// Canvas edge length in device-independent pixels
    pub canvas_size: f32,
    /// Gap between canvas edge and wheel rim
    pub wheel_margin: f32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            spin_duration_ms: 5000.0,
            reset_cooldown_ms: 300.0,
            auto_advance_delay_ms: 500.0,
            announcement_dismiss_ms: 5000.0,

            full_turns: 5,
            extra_random_turns: 0,
            spin_easing: CubicBezier::SPIN,
            reset_easing: CubicBezier::EASE_OUT,

            canvas_size: CANVAS_SIZE,
            wheel_margin: WHEEL_MARGIN,
        }
    }
}

impl EngineSettings {
    /// Parse settings from JSON, falling back to defaults for missing fields
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Clamp values into their usable ranges
    pub fn sanitized(mut self) -> Self {
        self.full_turns = self.full_turns.max(MIN_FULL_TURNS);
        self.spin_duration_ms = finite_non_negative(self.spin_duration_ms);
        self.reset_cooldown_ms = finite_non_negative(self.reset_cooldown_ms);
        self.auto_advance_delay_ms = finite_non_negative(self.auto_advance_delay_ms);
        self.announcement_dismiss_ms = finite_non_negative(self.announcement_dismiss_ms);
        if !(self.canvas_size.is_finite() && self.canvas_size > 0.0) {
            self.canvas_size = CANVAS_SIZE;
        }
        self.wheel_margin = self.wheel_margin.clamp(0.0, self.canvas_size / 4.0);
        self
    }

    /// Auto-dismiss delay for announcements, if enabled
    pub fn announcement_dismiss(&self) -> Option<f64> {
        (self.announcement_dismiss_ms > 0.0).then_some(self.announcement_dismiss_ms)
    }
}

fn finite_non_negative(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let s = EngineSettings::from_json(r#"{"spin_duration_ms": 1200}"#).unwrap();
        assert_eq!(s.spin_duration_ms, 1200.0);
        assert_eq!(s.reset_cooldown_ms, 300.0);
        assert_eq!(s.full_turns, 5);
    }

    #[test]
    fn test_sanitize_enforces_min_turns() {
        let s = EngineSettings::from_json(r#"{"full_turns": 1, "reset_cooldown_ms": -5}"#).unwrap();
        assert_eq!(s.full_turns, MIN_FULL_TURNS);
        assert_eq!(s.reset_cooldown_ms, 0.0);
    }

    #[test]
    fn test_announcement_dismiss_disable() {
        let mut s = EngineSettings::default();
        assert_eq!(s.announcement_dismiss(), Some(5000.0));
        s.announcement_dismiss_ms = 0.0;
        assert_eq!(s.announcement_dismiss(), None);
    }

    #[test]
    fn test_bad_json() {
        assert!(EngineSettings::from_json("{not json").is_err());
    }
}
