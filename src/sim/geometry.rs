//! Wheel geometry in degrees
//!
//! Segment `i` spans `[i * a, (i + 1) * a)` from the fixed zero reference,
//! where `a = 360 / n`. The pointer sits at angle 0 of the same reference.
//! A wheel rotated by `R` degrees shows wheel-angle `-R` under the pointer.
//!
//! Derived on demand from the entry count; never cached across renders.

use crate::consts::FULL_TURN;
use crate::normalize_degrees;

/// Segment layout for a wheel with `segment_count` entries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGeometry {
    segment_count: usize,
}

impl WheelGeometry {
    /// Returns `None` for an empty wheel
    pub fn new(segment_count: usize) -> Option<Self> {
        (segment_count > 0).then_some(Self { segment_count })
    }

    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    /// Angular width of each segment
    #[inline]
    pub fn segment_angle(&self) -> f64 {
        FULL_TURN / self.segment_count as f64
    }

    /// `[start, end)` of segment `index`
    pub fn segment_span(&self, index: usize) -> (f64, f64) {
        let a = self.segment_angle();
        (index as f64 * a, (index + 1) as f64 * a)
    }

    /// Bisector of segment `index` (where its label goes)
    pub fn segment_midpoint(&self, index: usize) -> f64 {
        let a = self.segment_angle();
        index as f64 * a + a / 2.0
    }

    /// Rotation delta (in [0, 360)) that parks the midpoint of `index` under
    /// the pointer, measured from a wheel at rest at rotation 0
    pub fn winner_angle(&self, index: usize) -> f64 {
        FULL_TURN - self.segment_midpoint(index)
    }

    /// Segment under the pointer for a cumulative rotation
    pub fn segment_under_pointer(&self, rotation: f64) -> usize {
        let wheel_angle = normalize_degrees(-rotation);
        let index = (wheel_angle / self.segment_angle()).floor() as usize;
        // Floating error at the very top of the range lands on the last segment
        index.min(self.segment_count - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_wheel() {
        assert!(WheelGeometry::new(0).is_none());
    }

    #[test]
    fn test_spans() {
        let g = WheelGeometry::new(4).unwrap();
        assert_eq!(g.segment_angle(), 90.0);
        assert_eq!(g.segment_span(0), (0.0, 90.0));
        assert_eq!(g.segment_span(3), (270.0, 360.0));
        assert_eq!(g.segment_midpoint(1), 135.0);
    }

    #[test]
    fn test_winner_angle_parks_midpoint_on_pointer() {
        let g = WheelGeometry::new(4).unwrap();
        // Segment 2 spans [180, 270), midpoint 225 -> rotate 135 more
        assert_eq!(g.winner_angle(2), 135.0);
        for i in 0..4 {
            let total = g.winner_angle(i) + g.segment_midpoint(i);
            assert!(normalize_degrees(total).abs() < 1e-9);
        }
    }

    #[test]
    fn test_segment_under_pointer_inverts_winner_angle() {
        for n in 1..40 {
            let g = WheelGeometry::new(n).unwrap();
            for i in 0..n {
                let rotation = 1234.0 * 360.0 + g.winner_angle(i);
                assert_eq!(g.segment_under_pointer(rotation), i, "n={n} i={i}");
            }
        }
    }

    #[test]
    fn test_single_segment() {
        let g = WheelGeometry::new(1).unwrap();
        assert_eq!(g.winner_angle(0), 180.0);
        assert_eq!(g.segment_under_pointer(17.0), 0);
    }
}
