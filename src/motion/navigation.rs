use log::{debug, warn};
use serde::Serialize;

use crate::content::StationList;
use crate::track::{ActiveTrack, TrackGeometry};

/// Progress along the main line and along whichever branch is active.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize)]
pub struct ProgressState {
    pub main: f32,
    pub branch: f32,
}

/// Where the navigator is in the enter/return cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Phase {
    Idle,
    AligningToEnter(usize),
    OnBranch(usize),
    AligningToReturn(usize),
}

/// Transitions reported back to the scene.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum NavEvent {
    SwitchedToBranch(usize),
    /// The scene must force a scroll sync so the page matches `main_progress`.
    ReturnedToMain { station: usize, main_progress: f32 },
}

/// Owns the active track, the sub-chapter cursor and both progress values.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    active: ActiveTrack,
    aligning_to: Option<usize>,
    pending_entry: Option<usize>,
    sub_index: usize,
    returning: bool,
    progress: ProgressState,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> ActiveTrack {
        self.active
    }

    pub fn phase(&self) -> Phase {
        match (self.active, self.pending_entry) {
            (ActiveTrack::Main, Some(i)) => Phase::AligningToEnter(i),
            (ActiveTrack::Main, None) => Phase::Idle,
            (ActiveTrack::Branch(i), _) if self.returning => Phase::AligningToReturn(i),
            (ActiveTrack::Branch(i), _) => Phase::OnBranch(i),
        }
    }

    pub fn sub_index(&self) -> usize {
        self.sub_index
    }

    pub fn is_returning(&self) -> bool {
        self.returning
    }

    pub fn aligning_to(&self) -> Option<usize> {
        self.aligning_to
    }

    pub fn progress(&self) -> ProgressState {
        self.progress
    }

    pub fn progress_mut(&mut self) -> &mut ProgressState {
        &mut self.progress
    }

    /// Progress on whichever track is active.
    pub fn active_progress(&self) -> f32 {
        match self.active {
            ActiveTrack::Main => self.progress.main,
            ActiveTrack::Branch(_) => self.progress.branch,
        }
    }

    /// Page scrolling drives the train only on the main line with no alignment running.
    pub fn scroll_enabled(&self) -> bool {
        self.active.is_main() && self.aligning_to.is_none()
    }

    /// Starts driving to station `index` and entering its branch on arrival.
    pub fn enter_branch(&mut self, index: usize, geometry: &TrackGeometry) -> bool {
        if !self.active.is_main() {
            warn!("enter_branch({index}) ignored: already on branch {:?}", self.active);
            return false;
        }
        if geometry.branch(index).is_none() {
            warn!("enter_branch({index}) ignored: station has no branch");
            return false;
        }
        debug!("aligning to station {index} to enter its branch");
        self.aligning_to = Some(index);
        self.pending_entry = Some(index);
        true
    }

    /// Drives the main line to station `index` without entering anything.
    pub fn go_to_station(&mut self, index: usize, geometry: &TrackGeometry) -> bool {
        if !self.active.is_main() || geometry.stop(index).is_none() {
            warn!("go_to_station({index}) ignored");
            return false;
        }
        debug!("aligning to station {index}");
        self.aligning_to = Some(index);
        self.pending_entry = None;
        true
    }

    pub fn branch_next(&mut self, stations: &StationList) {
        let ActiveTrack::Branch(i) = self.active else {
            warn!("branch_next ignored on the main line");
            return;
        };
        if self.returning {
            return;
        }
        let last = stations.sub_chapters(i).len().saturating_sub(1);
        if self.sub_index < last {
            self.sub_index += 1;
            debug!("branch {i}: sub-chapter {}", self.sub_index);
        }
    }

    pub fn branch_prev(&mut self) {
        let ActiveTrack::Branch(i) = self.active else {
            warn!("branch_prev ignored on the main line");
            return;
        };
        if self.returning {
            return;
        }
        if self.sub_index == 0 {
            self.return_to_main();
        } else {
            self.sub_index -= 1;
            debug!("branch {i}: sub-chapter {}", self.sub_index);
        }
    }

    pub fn return_to_main(&mut self) {
        let ActiveTrack::Branch(i) = self.active else {
            warn!("return_to_main ignored on the main line");
            return;
        };
        if !self.returning {
            debug!("branch {i}: returning to junction");
            self.returning = true;
        }
    }

    /// Current main-line autopilot target.
    pub fn main_target(&self, geometry: &TrackGeometry) -> Option<f32> {
        if !self.active.is_main() {
            return None;
        }
        self.aligning_to.and_then(|i| geometry.stop(i))
    }

    /// Current branch autopilot target: the sub-chapter sign, or the junction when returning.
    pub fn branch_target(&self, geometry: &TrackGeometry, center_offset: f32) -> Option<f32> {
        let branch = geometry.branch(self.active.branch_index()?)?;
        if self.returning {
            Some(branch.entry_t())
        } else {
            Some(branch.target_t(self.sub_index, center_offset))
        }
    }

    /// Main autopilot reached its target.
    pub fn on_main_arrived(&mut self, geometry: &TrackGeometry) -> Option<NavEvent> {
        let aligned = self.aligning_to.take();
        match self.pending_entry.take() {
            Some(i) => self.perform_switch(i, geometry),
            None => {
                if let Some(i) = aligned {
                    debug!("arrived at station {i}");
                }
                None
            }
        }
    }

    fn perform_switch(&mut self, index: usize, geometry: &TrackGeometry) -> Option<NavEvent> {
        // Entries are only queued for stations that have a branch
        self.progress.branch = geometry.branch(index)?.entry_t();
        self.active = ActiveTrack::Branch(index);
        self.sub_index = 0;
        self.returning = false;
        debug!("switched to branch {index}");
        Some(NavEvent::SwitchedToBranch(index))
    }

    /// Branch autopilot reached its target.
    pub fn on_branch_arrived(&mut self, geometry: &TrackGeometry) -> Option<NavEvent> {
        match self.active {
            ActiveTrack::Branch(i) if self.returning => Some(self.finalize_return(i, geometry)),
            _ => None,
        }
    }

    fn finalize_return(&mut self, index: usize, geometry: &TrackGeometry) -> NavEvent {
        let main_progress = geometry.junction_t(index);
        self.progress.main = main_progress;
        self.active = ActiveTrack::Main;
        self.sub_index = 0;
        self.returning = false;
        self.aligning_to = None;
        self.pending_entry = None;
        debug!("returned from branch {index} at t={main_progress:.4}");
        NavEvent::ReturnedToMain {
            station: index,
            main_progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LayoutConfig, TrackConfig};
    use crate::content::Station;
    use crate::track::{LayoutMetrics, Viewport};

    fn stations() -> StationList {
        StationList::new(vec![
            Station::new("Start", ""),
            Station::new("Code", "").with_sub_chapters(vec![
                Station::new("Basics", ""),
                Station::new("Web", ""),
                Station::new("Project", ""),
            ]),
            Station::new("End", ""),
        ])
        .unwrap()
    }

    fn geometry(stations: &StationList) -> TrackGeometry {
        let layout =
            LayoutMetrics::compute(Viewport::new(30.0, 20.0), stations.len(), &LayoutConfig::default());
        TrackGeometry::build(stations, &layout, &TrackConfig::default())
    }

    #[test]
    fn enter_requires_branch() {
        let s = stations();
        let g = geometry(&s);
        let mut nav = Navigator::new();
        assert!(!nav.enter_branch(0, &g));
        assert!(!nav.enter_branch(9, &g));
        assert_eq!(nav.phase(), Phase::Idle);

        assert!(nav.enter_branch(1, &g));
        assert_eq!(nav.phase(), Phase::AligningToEnter(1));
        assert_eq!(nav.main_target(&g), g.stop(1));
        assert!(!nav.scroll_enabled());
    }

    #[test]
    fn arrival_switches_to_branch_entry() {
        let s = stations();
        let g = geometry(&s);
        let mut nav = Navigator::new();
        nav.enter_branch(1, &g);

        assert_eq!(nav.on_main_arrived(&g), Some(NavEvent::SwitchedToBranch(1)));
        assert_eq!(nav.active(), ActiveTrack::Branch(1));
        assert_eq!(nav.phase(), Phase::OnBranch(1));
        assert_eq!(nav.sub_index(), 0);
        assert_eq!(nav.progress().branch, g.branch(1).unwrap().entry_t());
        assert_eq!(nav.main_target(&g), None);
        assert_eq!(
            nav.branch_target(&g, 3.05),
            Some(g.branch(1).unwrap().target_t(0, 3.05))
        );
    }

    #[test]
    fn enter_ignored_while_on_branch() {
        let s = stations();
        let g = geometry(&s);
        let mut nav = Navigator::new();
        nav.enter_branch(1, &g);
        nav.on_main_arrived(&g);
        assert!(!nav.enter_branch(1, &g));
        assert_eq!(nav.active(), ActiveTrack::Branch(1));
    }

    #[test]
    fn next_is_bounded_by_last_sub_chapter() {
        let s = stations();
        let g = geometry(&s);
        let mut nav = Navigator::new();
        nav.enter_branch(1, &g);
        nav.on_main_arrived(&g);

        for _ in 0..5 {
            nav.branch_next(&s);
        }
        assert_eq!(nav.sub_index(), 2);
        nav.branch_prev();
        assert_eq!(nav.sub_index(), 1);
    }

    #[test]
    fn prev_at_first_sub_chapter_returns() {
        let s = stations();
        let g = geometry(&s);
        let mut nav = Navigator::new();
        nav.enter_branch(1, &g);
        nav.on_main_arrived(&g);

        nav.branch_prev();
        assert!(nav.is_returning());
        assert_eq!(nav.phase(), Phase::AligningToReturn(1));
        assert_eq!(nav.branch_target(&g, 3.05), Some(g.branch(1).unwrap().entry_t()));
    }

    #[test]
    fn return_restores_junction_progress() {
        let s = stations();
        let g = geometry(&s);
        let mut nav = Navigator::new();
        nav.enter_branch(1, &g);
        nav.on_main_arrived(&g);
        nav.branch_next(&s);
        nav.return_to_main();

        let event = nav.on_branch_arrived(&g);
        assert_eq!(
            event,
            Some(NavEvent::ReturnedToMain {
                station: 1,
                main_progress: g.junction_t(1),
            })
        );
        assert_eq!(nav.active(), ActiveTrack::Main);
        assert_eq!(nav.phase(), Phase::Idle);
        assert_eq!(nav.progress().main, g.junction_t(1));
        assert_eq!(nav.sub_index(), 0);
        assert!(nav.scroll_enabled());
    }

    #[test]
    fn branch_arrival_without_return_is_quiet() {
        let s = stations();
        let g = geometry(&s);
        let mut nav = Navigator::new();
        nav.enter_branch(1, &g);
        nav.on_main_arrived(&g);
        assert_eq!(nav.on_branch_arrived(&g), None);
        assert_eq!(nav.active(), ActiveTrack::Branch(1));
    }

    #[test]
    fn go_to_station_aligns_without_entering() {
        let s = stations();
        let g = geometry(&s);
        let mut nav = Navigator::new();
        assert!(nav.go_to_station(2, &g));
        assert_eq!(nav.main_target(&g), g.stop(2));
        assert_eq!(nav.on_main_arrived(&g), None);
        assert_eq!(nav.active(), ActiveTrack::Main);
        assert!(nav.scroll_enabled());
    }

    #[test]
    fn branch_commands_ignored_on_main() {
        let s = stations();
        let mut nav = Navigator::new();
        nav.branch_next(&s);
        nav.branch_prev();
        nav.return_to_main();
        assert_eq!(nav.phase(), Phase::Idle);
        assert!(!nav.is_returning());
    }
}
