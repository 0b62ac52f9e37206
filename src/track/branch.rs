use std::f32::consts::FRAC_PI_2;

use crate::config::TrackConfig;
use crate::curve::{Curve, TrackCurve};
use crate::sim::Float3;

use super::layout::LayoutMetrics;

/// Side-track for a station's sub-chapters.
///
/// Runs on top of the main line for the lead-in, then turns right through a
/// quarter circle and continues along +X past one sign per sub-chapter:
///
/// ```text
///   lead-in      transition   quarter turn      extension
/// |==========|--------------|(           |====================> +X
/// junction_z - lead_in      junction_z   straight_z
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub station: usize,
    pub sub_count: usize,
    /// Z where the branch leaves the main line.
    pub junction_z: f32,
    /// Z of the straight section carrying the branch signs.
    pub straight_z: f32,
    pub curve: TrackCurve,
    entry_distance: f32,
    /// Nominal distance to the end of the turn, using the true quarter-circle length.
    turn_end_distance: f32,
    track_x: f32,
    turn_radius: f32,
    sign_z: f32,
    branch_spacing: f32,
}

impl Branch {
    pub fn build(
        station: usize,
        sub_count: usize,
        layout: &LayoutMetrics,
        config: &TrackConfig,
    ) -> Self {
        let x = layout.track_x;
        let y = config.rail_height;
        let r = config.turn_radius;

        let sign_z = layout.station_z(station);
        let straight_z = sign_z + config.sign_track_gap;
        // Back-solved so the turn ends exactly on the sign straight
        let junction_z = straight_z - config.transition - r;

        let extension = sub_count as f32 * layout.branch_spacing + config.branch_tail;

        let lead_start = Float3::new(x, y, junction_z - config.lead_in);
        let junction = Float3::new(x, y, junction_z);
        let turn_start = Float3::new(x, y, junction_z + config.transition);
        let turn_end = Float3::new(x + r, y, turn_start.z + r);
        let c1 = Float3::new(x, y, turn_start.z + r * config.bezier_k);
        let c2 = Float3::new(turn_end.x - r * config.bezier_k, y, turn_end.z);
        let end = Float3::new(turn_end.x + extension, y, turn_end.z);

        let mut curve = TrackCurve::new();
        curve
            .push_line(lead_start, junction)
            .push_line(junction, turn_start)
            .push_bezier(turn_start, c1, c2, turn_end)
            .push_line(turn_end, end);

        Self {
            station,
            sub_count,
            junction_z,
            straight_z,
            curve,
            entry_distance: config.lead_in,
            turn_end_distance: config.lead_in + config.transition + FRAC_PI_2 * r,
            track_x: x,
            turn_radius: r,
            sign_z,
            branch_spacing: layout.branch_spacing,
        }
    }

    pub fn length(&self) -> f32 {
        self.curve.length()
    }

    /// Branch progress at the junction, where the train joins and leaves.
    pub fn entry_t(&self) -> f32 {
        self.curve.distance_to_t(self.entry_distance)
    }

    /// Branch progress that parks the train's centre at sub-chapter `sub_index`.
    pub fn target_t(&self, sub_index: usize, center_offset: f32) -> f32 {
        let distance =
            self.turn_end_distance + (sub_index + 1) as f32 * self.branch_spacing + center_offset;
        self.curve.distance_to_t(distance)
    }

    /// Bottom-centre anchor of sub-chapter `sub_index`'s sign.
    pub fn sign_position(&self, sub_index: usize, rail_height: f32) -> Float3 {
        Float3::new(
            self.track_x + self.turn_radius + (sub_index + 1) as f32 * self.branch_spacing,
            rail_height,
            self.sign_z,
        )
    }
}
