//! Winner celebration bursts
//!
//! Effects are plain data generated from a seeded RNG. The host turns each
//! piece into whatever it animates with (DOM nodes with CSS keyframes in the
//! browser) and drops the whole burst after `lifetime_ms`.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::customization::{HexColor, WinnerEffect};

/// Pieces in one confetti burst
pub const CONFETTI_COUNT: usize = 200;
/// Confetti is swept away after this long
pub const CONFETTI_LIFETIME_MS: f64 = 5000.0;
/// Sparkles in one burst
pub const SPARKLE_COUNT: usize = 30;
/// Gap between consecutive sparkles appearing
pub const SPARKLE_STAGGER_MS: f64 = 100.0;
/// Each sparkle is removed this long after it appears
pub const SPARKLE_LIFETIME_MS: f64 = 3000.0;

/// Confetti colors
pub const CONFETTI_PALETTE: [HexColor; 10] = [
    HexColor::new(0xFF, 0xD7, 0x00),
    HexColor::new(0xFF, 0x63, 0x47),
    HexColor::new(0x7F, 0xFF, 0xD4),
    HexColor::new(0xDD, 0xA0, 0xDD),
    HexColor::new(0x20, 0xB2, 0xAA),
    HexColor::new(0xFF, 0x45, 0x00),
    HexColor::new(0x2E, 0x8B, 0x57),
    HexColor::new(0xDA, 0xA5, 0x20),
    HexColor::new(0xFF, 0x14, 0x93),
    HexColor::new(0x00, 0xFF, 0xFF),
];

/// Confetti piece outline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceShape {
    Triangle,
    Diamond,
    Circle,
    Square,
}

impl PieceShape {
    pub const ALL: [PieceShape; 4] = [
        PieceShape::Triangle,
        PieceShape::Diamond,
        PieceShape::Circle,
        PieceShape::Square,
    ];

    /// CSS `clip-path` value
    pub fn clip_path(&self) -> &'static str {
        match self {
            PieceShape::Triangle => "polygon(50% 0%, 0% 100%, 100% 100%)",
            PieceShape::Diamond => "polygon(50% 0%, 100% 50%, 50% 100%, 0% 50%)",
            PieceShape::Circle => "circle(50% at 50% 50%)",
            PieceShape::Square => "inset(0 0 0 0)",
        }
    }
}

/// One falling confetti piece
#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiPiece {
    /// Horizontal start, fraction of viewport width (0-1)
    pub left: f32,
    /// Edge length in pixels
    pub size: f32,
    pub color: HexColor,
    pub shape: PieceShape,
    pub duration_s: f32,
    pub delay_s: f32,
}

/// One twinkle somewhere on screen
#[derive(Debug, Clone, PartialEq)]
pub struct Sparkle {
    /// Fraction of the viewport (0-1 on both axes)
    pub position: Vec2,
    pub size: f32,
    pub duration_s: f32,
    /// When this sparkle appears, relative to the burst
    pub appear_ms: f64,
}

/// Everything spawned for one winner
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Celebration {
    pub confetti: Vec<ConfettiPiece>,
    pub sparkles: Vec<Sparkle>,
}

impl Celebration {
    /// Build the burst for `effect` (`None` yields nothing)
    pub fn for_effect<R: Rng + ?Sized>(effect: WinnerEffect, rng: &mut R) -> Option<Self> {
        match effect {
            WinnerEffect::None => None,
            WinnerEffect::Confetti => Some(Self {
                confetti: (0..CONFETTI_COUNT).map(|_| confetti_piece(rng)).collect(),
                sparkles: Vec::new(),
            }),
            WinnerEffect::Sparkles => Some(Self {
                confetti: Vec::new(),
                sparkles: (0..SPARKLE_COUNT).map(|i| sparkle(rng, i)).collect(),
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.confetti.is_empty() && self.sparkles.is_empty()
    }

    /// Time after which nothing from this burst is left on screen
    pub fn lifetime_ms(&self) -> f64 {
        let sparkles = self
            .sparkles
            .iter()
            .map(|s| s.appear_ms + SPARKLE_LIFETIME_MS)
            .fold(0.0, f64::max);
        if self.confetti.is_empty() {
            sparkles
        } else {
            sparkles.max(CONFETTI_LIFETIME_MS)
        }
    }

    /// Sparkles that should be visible `elapsed_ms` into the burst
    pub fn sparkles_visible_at(&self, elapsed_ms: f64) -> impl Iterator<Item = &Sparkle> {
        self.sparkles.iter().filter(move |s| {
            elapsed_ms >= s.appear_ms && elapsed_ms < s.appear_ms + SPARKLE_LIFETIME_MS
        })
    }
}

fn confetti_piece<R: Rng + ?Sized>(rng: &mut R) -> ConfettiPiece {
    ConfettiPiece {
        left: rng.random_range(0.0..1.0),
        size: rng.random_range(5.0..20.0),
        color: *CONFETTI_PALETTE.choose(rng).unwrap_or(&CONFETTI_PALETTE[0]),
        shape: *PieceShape::ALL.choose(rng).unwrap_or(&PieceShape::Square),
        duration_s: rng.random_range(1.0..4.0),
        delay_s: rng.random_range(0.0..0.5),
    }
}

fn sparkle<R: Rng + ?Sized>(rng: &mut R, index: usize) -> Sparkle {
    Sparkle {
        position: Vec2::new(rng.random_range(0.0..1.0), rng.random_range(0.0..1.0)),
        size: rng.random_range(5.0..20.0),
        duration_s: rng.random_range(1.0..3.0),
        appear_ms: index as f64 * SPARKLE_STAGGER_MS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_none_is_empty() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(Celebration::for_effect(WinnerEffect::None, &mut rng).is_none());
    }

    #[test]
    fn test_confetti_burst() {
        let mut rng = Pcg32::seed_from_u64(7);
        let burst = Celebration::for_effect(WinnerEffect::Confetti, &mut rng).unwrap();
        assert_eq!(burst.confetti.len(), CONFETTI_COUNT);
        assert!(burst.sparkles.is_empty());
        for piece in &burst.confetti {
            assert!((0.0..1.0).contains(&piece.left));
            assert!((5.0..20.0).contains(&piece.size));
            assert!((1.0..4.0).contains(&piece.duration_s));
            assert!((0.0..0.5).contains(&piece.delay_s));
            assert!(CONFETTI_PALETTE.contains(&piece.color));
        }
        assert_eq!(burst.lifetime_ms(), CONFETTI_LIFETIME_MS);
    }

    #[test]
    fn test_sparkles_stagger() {
        let mut rng = Pcg32::seed_from_u64(7);
        let burst = Celebration::for_effect(WinnerEffect::Sparkles, &mut rng).unwrap();
        assert_eq!(burst.sparkles.len(), SPARKLE_COUNT);
        assert_eq!(burst.sparkles[0].appear_ms, 0.0);
        assert_eq!(burst.sparkles[29].appear_ms, 2900.0);
        assert_eq!(burst.lifetime_ms(), 2900.0 + SPARKLE_LIFETIME_MS);

        assert_eq!(burst.sparkles_visible_at(0.0).count(), 1);
        assert_eq!(burst.sparkles_visible_at(450.0).count(), 5);
        assert_eq!(burst.sparkles_visible_at(10_000.0).count(), 0);
    }

    #[test]
    fn test_same_seed_same_burst() {
        let a = Celebration::for_effect(WinnerEffect::Confetti, &mut Pcg32::seed_from_u64(3));
        let b = Celebration::for_effect(WinnerEffect::Confetti, &mut Pcg32::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_clip_paths() {
        assert!(PieceShape::Circle.clip_path().starts_with("circle"));
        assert_eq!(PieceShape::ALL.len(), 4);
    }
}
