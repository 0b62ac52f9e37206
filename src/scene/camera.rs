use serde::Serialize;

use crate::curve::Curve;
use crate::sim::{clamp01, damp, Float3};

/// Top-down camera that tracks the train's centre.
///
/// X only moves right of the origin and is smoothed; Z follows the train
/// exactly, pulled back by the branch view offset.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct FollowCamera {
    pub position: Float3,
    pub look_at: Float3,
    pub up: Float3,
    #[serde(skip)]
    smoothing: f32,
    #[serde(skip)]
    center_offset: f32,
}

impl FollowCamera {
    pub const UP: Float3 = Float3::new(0.0, 0.0, -1.0);

    pub fn new(height: f32, smoothing: f32, center_offset: f32) -> Self {
        let position = Float3::new(0.0, height, 0.0);
        Self {
            position,
            look_at: Float3::new(0.0, 0.0, 0.0),
            up: Self::UP,
            smoothing,
            center_offset,
        }
    }

    /// Progress of the train's centre: `center_offset` world units behind the front.
    pub fn center_t(&self, curve: &impl Curve, progress: f32) -> f32 {
        let length = curve.length();
        let offset = if length > 0.0 {
            self.center_offset / length
        } else {
            0.0
        };
        (clamp01(progress) - offset).max(0.0)
    }

    pub fn update(
        &mut self,
        curve: &impl Curve,
        progress: f32,
        height: f32,
        view_offset: f32,
        dt: f32,
    ) {
        let centre = curve.point_at(self.center_t(curve, progress));

        let target_x = centre.x.max(0.0);
        self.position.x = damp(self.position.x, target_x, self.smoothing, dt);
        self.position.y = height;
        self.position.z = centre.z - view_offset;

        self.look_at = Float3::new(self.position.x, 0.0, self.position.z);
    }
}
