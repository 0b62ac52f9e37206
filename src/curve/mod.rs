//! Arc-length parameterized curves.
//!
//! Every curve is sampled with a normalized parameter `u` in [0, 1] measured
//! along its length. Inputs outside that range are clamped before sampling.

mod path;
mod sampling;
mod segment;

pub use path::TrackCurve;
pub use sampling::spaced_points;
pub use segment::{CubicBezier, LineSegment, Segment, ARC_DIVISIONS};

use crate::sim::{clamp01, Float3};

pub trait Curve {
    /// Total arc length in world units.
    fn length(&self) -> f32;

    /// Point at normalized arc position `u`.
    fn point_at(&self, u: f32) -> Float3;

    /// Unit tangent at normalized arc position `u`.
    fn tangent_at(&self, u: f32) -> Float3;

    /// Converts a world distance along the curve into a normalized parameter.
    /// Zero-length curves map everything to 0.
    fn distance_to_t(&self, distance: f32) -> f32 {
        let length = self.length();
        if length <= 0.0 {
            return 0.0;
        }
        clamp01(distance / length)
    }
}
