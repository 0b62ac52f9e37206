use serde::Serialize;

use crate::config::TrackConfig;
use crate::curve::{spaced_points, Curve, TrackCurve};
use crate::sim::{Float3, Pose};

use super::geometry::TrackGeometry;

/// Height of the rail tops above the centre line.
const RAIL_LIFT: f32 = 0.1;

/// Renderable layout of one track: centre line, two rails and sleepers.
#[derive(Debug, Clone, Default)]
pub struct RailLayout {
    pub centre: Vec<Float3>,
    pub left: Vec<Float3>,
    pub right: Vec<Float3>,
    pub sleepers: Vec<Pose>,
}

impl RailLayout {
    /// Lays out rails for `curve`, omitting the first `render_skip` world units.
    pub fn build(curve: &TrackCurve, config: &TrackConfig, render_skip: f32) -> Self {
        let length = curve.length();

        let mut centre = spaced_points(curve, config.rail_samples);
        if render_skip > 0.0 && length > 0.0 {
            let skip = (centre.len() as f32 * (render_skip / length)).floor() as usize;
            centre.drain(..skip.min(centre.len()));
        }

        let half_gauge = config.gauge / 2.0;
        let left = offset_rail(&centre, -half_gauge);
        let right = offset_rail(&centre, half_gauge);

        let sleepers = if config.sleeper_spacing > 0.0 {
            let count = (length / config.sleeper_spacing).floor() as usize;
            let mut points = spaced_points(curve, count);
            if render_skip > 0.0 {
                let skip = (render_skip / config.sleeper_spacing).floor() as usize;
                points.drain(..skip.min(points.len()));
            }
            orient_sleepers(&points)
        } else {
            Vec::new()
        };

        Self {
            centre,
            left,
            right,
            sleepers,
        }
    }
}

/// Offsets a polyline sideways by `offset` and lifts it onto the sleepers.
/// Tangents use central differences, one-sided at the ends.
fn offset_rail(points: &[Float3], offset: f32) -> Vec<Float3> {
    let n = points.len();
    points
        .iter()
        .enumerate()
        .map(|(i, &point)| {
            let tangent = if n < 2 {
                Float3::FORWARD
            } else if i == 0 {
                (points[1] - points[0]).normalize()
            } else if i == n - 1 {
                (points[i] - points[i - 1]).normalize()
            } else {
                (points[i + 1] - points[i - 1]).normalize()
            };

            let side = tangent.cross(Float3::UP);
            let mut p = point + side * offset;
            p.y += RAIL_LIFT;
            p
        })
        .collect()
}

/// Each sleeper faces the next one; the last continues the previous heading.
fn orient_sleepers(points: &[Float3]) -> Vec<Pose> {
    points
        .iter()
        .enumerate()
        .map(|(i, &position)| {
            if let Some(&next) = points.get(i + 1) {
                Pose::looking_at(position, next)
            } else if i > 0 {
                let prev = points[i - 1];
                Pose::looking_at(position, position + (position - prev))
            } else {
                Pose::new(position, Float3::FORWARD)
            }
        })
        .collect()
}

/// Decorative end-of-track marker, facing along the track toward the train.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct BufferStop {
    pub pose: Pose,
    /// `None` for the main line.
    pub branch: Option<usize>,
}

/// Buffer stops at both ends of the main line and at the far end of every branch.
pub fn buffer_stops(geometry: &TrackGeometry) -> Vec<BufferStop> {
    let main = geometry.main_curve();
    let mut stops = vec![
        BufferStop {
            pose: Pose::new(main.point_at(0.0), Float3::FORWARD),
            branch: None,
        },
        BufferStop {
            pose: Pose::new(main.point_at(1.0), Float3::BACK),
            branch: None,
        },
    ];

    stops.extend(geometry.branches().map(|b| BufferStop {
        pose: Pose::new(b.curve.point_at(1.0), b.curve.tangent_at(1.0)).reversed(),
        branch: Some(b.station),
    }));

    stops
}
