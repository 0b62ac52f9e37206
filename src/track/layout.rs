use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;

/// Visible extent of the ground plane, in world units.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// World-space layout derived from the viewport and the number of stations.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct LayoutMetrics {
    /// X of the main line, hugging the left edge.
    pub track_x: f32,
    /// X of the sign centres, centred in the space right of the train.
    pub sign_x: f32,
    pub sign_width: f32,
    pub vp_width: f32,
    pub vp_height: f32,
    /// Z of the last station plus end padding.
    pub track_length: f32,
    /// Z distance between consecutive stations.
    pub spacing: f32,
    /// Distance between consecutive signs on a branch.
    pub branch_spacing: f32,
    pub camera_y: f32,
    /// Portrait viewports are treated as mobile.
    pub is_mobile: bool,
}

impl LayoutMetrics {
    pub fn compute(viewport: Viewport, station_count: usize, config: &LayoutConfig) -> Self {
        let vp_width = viewport.width.max(0.0);
        let vp_height = viewport.height.max(0.0);
        let station_count = station_count.max(1);

        // Track on the left
        let left_edge = -vp_width / 2.0;
        let track_margin = config
            .max_track_margin
            .min(vp_width * config.track_margin_ratio);
        let track_x = left_edge + track_margin;

        // Each station gets at least one and a half screens of travel
        let spacing = config
            .min_spacing
            .max(vp_height * config.spacing_per_viewport);
        let track_length = spacing * (station_count - 1) as f32 + config.track_end_padding;

        // Signs sit above the ground, where the frustum is narrower
        let perspective = if config.camera_height > 0.0 {
            (config.camera_height - config.sign_height) / config.camera_height
        } else {
            1.0
        };
        let vp_width_at_sign = vp_width * perspective;

        let track_right_edge = track_x + config.train_visual_width / 2.0;
        let screen_right_edge = vp_width_at_sign / 2.0;
        let right_margin = vp_width_at_sign * config.right_margin_ratio;

        let available_end = screen_right_edge - right_margin;
        let available_width = (available_end - track_right_edge).max(1.0);

        let sign_width = available_width * config.sign_fill_ratio;
        let sign_x = track_right_edge + available_width / 2.0;

        Self {
            track_x,
            sign_x,
            sign_width,
            vp_width,
            vp_height,
            track_length,
            spacing,
            branch_spacing: sign_width * 2.0,
            camera_y: config.camera_height,
            is_mobile: vp_width < vp_height,
        }
    }

    /// World Z of station `index`'s sign.
    pub fn station_z(&self, index: usize) -> f32 {
        index as f32 * self.spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TOLERANCE: f32 = 1e-4;

    #[test]
    fn landscape_layout() {
        let m = LayoutMetrics::compute(Viewport::new(30.0, 20.0), 4, &LayoutConfig::default());

        assert_relative_eq!(m.track_x, -12.0, epsilon = TOLERANCE);
        assert_relative_eq!(m.spacing, 30.0, epsilon = TOLERANCE);
        assert_relative_eq!(m.track_length, 110.0, epsilon = TOLERANCE);
        assert_relative_eq!(m.sign_width, 16.775, epsilon = TOLERANCE);
        assert_relative_eq!(m.sign_x, 0.484_375, epsilon = TOLERANCE);
        assert_relative_eq!(m.branch_spacing, 33.55, epsilon = TOLERANCE);
        assert_relative_eq!(m.camera_y, 16.0, epsilon = TOLERANCE);
        assert!(!m.is_mobile);
    }

    #[test]
    fn portrait_layout_is_mobile() {
        let m = LayoutMetrics::compute(Viewport::new(10.0, 20.0), 4, &LayoutConfig::default());

        assert!(m.is_mobile);
        assert_relative_eq!(m.track_x, -3.5, epsilon = TOLERANCE);
        assert_relative_eq!(m.sign_width, 4.125, epsilon = TOLERANCE);
        assert_relative_eq!(m.sign_x, 1.078_125, epsilon = TOLERANCE);
    }

    #[test]
    fn spacing_has_floor() {
        let m = LayoutMetrics::compute(Viewport::new(12.0, 8.0), 3, &LayoutConfig::default());
        assert_relative_eq!(m.spacing, 20.0, epsilon = TOLERANCE);
        assert_relative_eq!(m.track_length, 60.0, epsilon = TOLERANCE);
    }

    #[test]
    fn tiny_viewport_keeps_positive_sign_width() {
        let m = LayoutMetrics::compute(Viewport::new(1.0, 1.0), 1, &LayoutConfig::default());
        assert_relative_eq!(m.sign_width, 0.8, epsilon = TOLERANCE);
        assert_relative_eq!(m.track_length, 20.0, epsilon = TOLERANCE);
    }

    #[test]
    fn zero_stations_behaves_like_one() {
        let zero = LayoutMetrics::compute(Viewport::new(30.0, 20.0), 0, &LayoutConfig::default());
        let one = LayoutMetrics::compute(Viewport::new(30.0, 20.0), 1, &LayoutConfig::default());
        assert_eq!(zero, one);
    }

    #[test]
    fn station_z_is_index_times_spacing() {
        let m = LayoutMetrics::compute(Viewport::new(30.0, 20.0), 4, &LayoutConfig::default());
        assert_relative_eq!(m.station_z(3), 90.0, epsilon = TOLERANCE);
    }
}
