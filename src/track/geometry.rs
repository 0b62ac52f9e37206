use serde::Serialize;

use crate::config::TrackConfig;
use crate::content::StationList;
use crate::curve::{Curve, TrackCurve};
use crate::sim::{clamp01, Float3};

use super::branch::Branch;
use super::layout::LayoutMetrics;

/// Which track drives the train and camera. Exactly one is active at a time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
pub enum ActiveTrack {
    #[default]
    Main,
    /// Branch owned by the station at this index.
    Branch(usize),
}

impl ActiveTrack {
    pub fn is_main(self) -> bool {
        matches!(self, ActiveTrack::Main)
    }

    pub fn branch_index(self) -> Option<usize> {
        match self {
            ActiveTrack::Main => None,
            ActiveTrack::Branch(i) => Some(i),
        }
    }
}

/// Main line, station stops and branch curves for one layout.
#[derive(Debug, Clone)]
pub struct TrackGeometry {
    config: TrackConfig,
    layout: LayoutMetrics,
    main: TrackCurve,
    stops: Vec<f32>,
    /// Indexed by station; `None` for stations without sub-chapters.
    branches: Vec<Option<Branch>>,
}

impl TrackGeometry {
    pub fn build(stations: &StationList, layout: &LayoutMetrics, config: &TrackConfig) -> Self {
        let start = Float3::new(layout.track_x, config.rail_height, config.start_z);
        let end = Float3::new(
            layout.track_x,
            config.rail_height,
            layout.track_length + config.end_padding,
        );
        let main = TrackCurve::line(start, end);
        let main_length = main.length();

        let stops = (0..stations.len())
            .map(|i| station_t(layout.station_z(i), config.start_z, main_length))
            .collect();

        let branches = stations
            .iter()
            .enumerate()
            .map(|(i, station)| {
                station
                    .has_branch()
                    .then(|| Branch::build(i, station.sub_chapters.len(), layout, config))
            })
            .collect();

        Self {
            config: config.clone(),
            layout: *layout,
            main,
            stops,
            branches,
        }
    }

    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    pub fn layout(&self) -> &LayoutMetrics {
        &self.layout
    }

    pub fn main_curve(&self) -> &TrackCurve {
        &self.main
    }

    pub fn main_length(&self) -> f32 {
        self.main.length()
    }

    /// Main-line progress at each station's sign.
    pub fn stops(&self) -> &[f32] {
        &self.stops
    }

    pub fn stop(&self, index: usize) -> Option<f32> {
        self.stops.get(index).copied()
    }

    /// Main-line progress at the point where station `index`'s branch diverges.
    pub fn junction_t(&self, index: usize) -> f32 {
        let junction_z = self.layout.station_z(index) + self.config.junction_gap();
        station_t(junction_z, self.config.start_z, self.main_length())
    }

    pub fn branch(&self, index: usize) -> Option<&Branch> {
        self.branches.get(index).and_then(Option::as_ref)
    }

    pub fn branches(&self) -> impl Iterator<Item = &Branch> + '_ {
        self.branches.iter().flatten()
    }

    pub fn max_branch_length(&self) -> f32 {
        self.branches().map(Branch::length).fold(0.0, f32::max)
    }

    /// Curve for `track`, falling back to the main line for unknown branches.
    pub fn curve(&self, track: ActiveTrack) -> &TrackCurve {
        match track {
            ActiveTrack::Main => &self.main,
            ActiveTrack::Branch(i) => self.branch(i).map(|b| &b.curve).unwrap_or(&self.main),
        }
    }
}

/// Progress along a straight main line starting at `start_z`.
fn station_t(z: f32, start_z: f32, main_length: f32) -> f32 {
    if main_length <= 0.0 {
        return 0.0;
    }
    clamp01((z - start_z) / main_length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::content::Station;
    use crate::track::layout::Viewport;
    use approx::assert_relative_eq;

    fn stations() -> StationList {
        StationList::new(vec![
            Station::new("Start", "welcome"),
            Station::new("Code", "programming").with_sub_chapters(vec![
                Station::new("Basics", ""),
                Station::new("Web", ""),
                Station::new("Project", ""),
            ]),
            Station::new("Robots", "").with_sub_chapters(vec![Station::new("Contest", "")]),
            Station::new("End", ""),
        ])
        .unwrap()
    }

    fn geometry() -> TrackGeometry {
        let layout = LayoutMetrics::compute(Viewport::new(30.0, 20.0), 4, &LayoutConfig::default());
        TrackGeometry::build(&stations(), &layout, &TrackConfig::default())
    }

    #[test]
    fn main_line_spans_start_to_padded_end() {
        let g = geometry();
        assert_relative_eq!(g.main_length(), 130.0, epsilon = 1e-3);
        assert_relative_eq!(g.main_curve().point_at(0.0).z, -10.0, epsilon = 1e-4);
        assert_relative_eq!(g.main_curve().point_at(1.0).z, 120.0, epsilon = 1e-3);
        assert_relative_eq!(g.main_curve().point_at(0.5).x, -12.0, epsilon = 1e-4);
    }

    #[test]
    fn stops_land_on_station_signs() {
        let g = geometry();
        assert_eq!(g.stops().len(), 4);
        for (i, &t) in g.stops().iter().enumerate() {
            let z = g.main_curve().point_at(t).z;
            assert_relative_eq!(z, i as f32 * 30.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn branches_only_for_stations_with_sub_chapters() {
        let g = geometry();
        assert!(g.branch(0).is_none());
        assert!(g.branch(1).is_some());
        assert!(g.branch(2).is_some());
        assert!(g.branch(3).is_none());
        assert!(g.branch(99).is_none());
        assert_eq!(g.branches().count(), 2);
    }

    #[test]
    fn junction_z_matches_spacing_plus_gap() {
        let g = geometry();
        for b in g.branches() {
            assert_relative_eq!(b.junction_z, b.station as f32 * 30.0 - 3.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn junction_t_lies_on_branch_junction() {
        let g = geometry();
        let b = g.branch(1).unwrap();
        let main_at_junction = g.main_curve().point_at(g.junction_t(1));
        let branch_at_entry = b.curve.point_at(b.entry_t());
        assert_relative_eq!(main_at_junction.z, branch_at_entry.z, epsilon = 1e-3);
        assert_relative_eq!(main_at_junction.x, branch_at_entry.x, epsilon = 1e-4);
    }

    #[test]
    fn max_branch_length_picks_longest() {
        let g = geometry();
        let longest = g.branch(1).unwrap().length();
        assert_relative_eq!(g.max_branch_length(), longest, epsilon = 1e-4);
        assert!(longest > g.branch(2).unwrap().length());
    }

    #[test]
    fn curve_lookup_falls_back_to_main() {
        let g = geometry();
        assert_eq!(g.curve(ActiveTrack::Branch(0)), g.main_curve());
        assert_ne!(g.curve(ActiveTrack::Branch(1)), g.main_curve());
    }

    #[test]
    fn active_track_helpers() {
        assert!(ActiveTrack::Main.is_main());
        assert_eq!(ActiveTrack::Branch(2).branch_index(), Some(2));
        assert_eq!(ActiveTrack::Main.branch_index(), None);
    }
}
