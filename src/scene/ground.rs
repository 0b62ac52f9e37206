use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::GroundConfig;
use crate::curve::Curve;
use crate::sim::Float3;
use crate::track::TrackGeometry;

/// One unit cube of ground.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Voxel {
    /// Cube centre.
    pub position: Float3,
    pub color: [f32; 3],
}

/// Seeded voxel field under the main line and the longest branch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroundField {
    pub voxels: Vec<Voxel>,
}

impl GroundField {
    pub fn build(geometry: &TrackGeometry, config: &GroundConfig) -> Self {
        let layout = geometry.layout();
        let main = geometry.main_curve();
        let start = main.point_at(0.0);
        let end = main.point_at(1.0);

        let right = (layout.track_x + geometry.max_branch_length()).max(layout.vp_width / 2.0);
        let x_min = (layout.track_x - config.margin).floor() as i32;
        let x_max = (right + config.margin).ceil() as i32;
        let z_min = (start.z.min(end.z) - config.margin).floor() as i32;
        let z_max = (start.z.max(end.z) + config.margin).ceil() as i32;

        let mut rng = SmallRng::seed_from_u64(config.seed);
        let cells = (x_max - x_min).max(0) as usize * (z_max - z_min).max(0) as usize;
        let mut voxels = Vec::with_capacity(cells);

        for x in x_min..x_max {
            for z in z_min..z_max {
                // Top faces at 0 or -1, always under the rails
                let y = if rng.random_bool(0.5) { -0.5 } else { -1.5 };
                let lightness = config.min_lightness
                    + rng.random::<f32>() * (config.max_lightness - config.min_lightness);
                voxels.push(Voxel {
                    position: Float3::new(x as f32, y, z as f32),
                    color: hsl_to_rgb(config.hue, config.saturation, lightness),
                });
            }
        }

        log::debug!(
            "ground: {} voxels over x {}..{} z {}..{}",
            voxels.len(),
            x_min,
            x_max,
            z_min,
            z_max
        );
        Self { voxels }
    }

    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }
}

/// HSL to RGB, all components in [0, 1].
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    if s == 0.0 {
        return [l, l, l];
    }

    let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    [
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    ]
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}
