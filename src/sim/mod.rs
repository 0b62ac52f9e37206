//! Vector math primitives shared by the curve, track and scene layers.
//!
//! Nothing in here knows about tracks, stations or scrolling.

mod math;
mod pose;

pub use math::{clamp01, damp, lerp, Float3, Quaternion};
pub use pose::Pose;
