use crate::sim::Float3;

use super::Curve;

/// Returns `divisions + 1` points evenly spaced by arc length, ends included.
pub fn spaced_points<C: Curve + ?Sized>(curve: &C, divisions: usize) -> Vec<Float3> {
    if divisions == 0 {
        return vec![curve.point_at(0.0)];
    }
    (0..=divisions)
        .map(|i| curve.point_at(i as f32 / divisions as f32))
        .collect()
}
