//! Cubic-bezier easing curves
//!
//! Same model as CSS `cubic-bezier(x1, y1, x2, y2)`: endpoints fixed at (0,0)
//! and (1,1), x control points in [0, 1].

use serde::{Deserialize, Serialize};

/// A CSS-style timing curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CubicBezier {
    /// Quick start, long glide into the pointer
    pub const SPIN: CubicBezier = CubicBezier::new(0.2, 0.1, 0.1, 1.0);
    pub const EASE_OUT: CubicBezier = CubicBezier::new(0.0, 0.0, 0.58, 1.0);
    pub const LINEAR: CubicBezier = CubicBezier::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn sample(a1: f64, a2: f64, t: f64) -> f64 {
        // B(t) = 3(1-t)^2 t a1 + 3(1-t) t^2 a2 + t^3
        let u = 1.0 - t;
        3.0 * u * u * t * a1 + 3.0 * u * t * t * a2 + t * t * t
    }

    fn sample_derivative(a1: f64, a2: f64, t: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * a1 + 6.0 * u * t * (a2 - a1) + 3.0 * t * t * (1.0 - a2)
    }

    /// Curve parameter whose x equals `x`
    fn solve_t(&self, x: f64) -> f64 {
        let (x1, x2) = (self.x1.clamp(0.0, 1.0), self.x2.clamp(0.0, 1.0));

        // Newton first, it converges in a few steps for sane curves
        let mut t = x;
        for _ in 0..8 {
            let err = Self::sample(x1, x2, t) - x;
            if err.abs() < 1e-7 {
                return t;
            }
            let d = Self::sample_derivative(x1, x2, t);
            if d.abs() < 1e-6 {
                break;
            }
            t -= err / d;
        }

        // Bisection fallback (x(t) is monotonic for x1, x2 in [0, 1])
        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        for _ in 0..64 {
            let v = Self::sample(x1, x2, t);
            if (v - x).abs() < 1e-7 {
                break;
            }
            if v < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        t
    }

    /// Eased progress for linear progress `x` in [0, 1]
    pub fn ease(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        Self::sample(self.y1, self.y2, self.solve_t(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for curve in [CubicBezier::SPIN, CubicBezier::EASE_OUT, CubicBezier::LINEAR] {
            assert_eq!(curve.ease(0.0), 0.0);
            assert_eq!(curve.ease(1.0), 1.0);
            assert_eq!(curve.ease(-3.0), 0.0);
            assert_eq!(curve.ease(7.0), 1.0);
        }
    }

    #[test]
    fn test_linear_is_identity() {
        for i in 0..=20 {
            let x = i as f64 / 20.0;
            assert!((CubicBezier::LINEAR.ease(x) - x).abs() < 1e-5);
        }
    }

    #[test]
    fn test_ease_out_front_loaded() {
        assert!(CubicBezier::EASE_OUT.ease(0.5) > 0.5);
        assert!(CubicBezier::SPIN.ease(0.5) > 0.5);
    }

    #[test]
    fn test_monotonic() {
        let mut last = 0.0;
        for i in 0..=100 {
            let v = CubicBezier::SPIN.ease(i as f64 / 100.0);
            assert!(v + 1e-9 >= last);
            last = v;
        }
    }
}
