use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::SceneConfig;
use crate::content::StationList;
use crate::motion::{
    Autopilot, AutopilotStep, NavEvent, Navigator, Phase, ProgressState, ScrollSurface,
    ScrollSyncer, SyncOutcome, ViewOffset,
};
use crate::track::{
    buffer_stops, ActiveTrack, BufferStop, LayoutMetrics, RailLayout, TrackGeometry, Viewport,
};

use super::camera::FollowCamera;
use super::ground::GroundField;
use super::sign::{branch_max_offset, place_signs, SignPlacement};
use super::train::TrainPose;

/// User input, already stripped of any windowing details.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    Wheel { delta_y: f32 },
    TouchStart { y: f32 },
    TouchMove { y: f32 },
    TouchEnd,
    EnterBranch(usize),
    GoToStation(usize),
    Next,
    Prev,
    Return,
    Resize(Viewport),
}

/// Everything that moves, sampled once per frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneFrame {
    pub frame: u64,
    pub active: ActiveTrack,
    pub phase: Phase,
    pub sub_index: usize,
    pub progress: ProgressState,
    pub scroll_offset: f32,
    pub view_offset: f32,
    pub train: TrainPose,
    pub camera: FollowCamera,
}

/// One rail layout per track, tagged with the track it belongs to.
#[derive(Debug, Clone)]
pub struct TrackRails {
    pub track: ActiveTrack,
    pub rails: RailLayout,
}

/// The station-line scene: content, track geometry and every piece of motion state.
///
/// Drive it with [`Scene::handle`] for input and [`Scene::step`] once per frame.
pub struct Scene {
    stations: StationList,
    config: SceneConfig,
    layout: LayoutMetrics,
    geometry: TrackGeometry,
    navigator: Navigator,
    main_pilot: Autopilot,
    branch_pilot: Autopilot,
    syncer: ScrollSyncer,
    surface: ScrollSurface,
    view_offset: ViewOffset,
    camera: FollowCamera,
    touch_y: Option<f32>,
    frame: u64,
}

impl Scene {
    pub fn new(stations: StationList, config: SceneConfig, viewport: Viewport) -> Self {
        let layout = LayoutMetrics::compute(viewport, stations.len(), &config.layout);
        let geometry = TrackGeometry::build(&stations, &layout, &config.track);

        let motion = &config.motion;
        let pages = ScrollSurface::pages_for(stations.len(), motion.scroll_pages_per_station);

        info!(
            "scene: {} stations, {} branches, main line {:.1} units",
            stations.len(),
            geometry.branches().count(),
            geometry.main_length()
        );

        Self {
            main_pilot: Autopilot::new(motion.main_speed, motion.snap_distance),
            branch_pilot: Autopilot::new(motion.branch_speed, motion.snap_distance),
            syncer: ScrollSyncer::new(geometry.stops(), motion.forced_sync_frames),
            surface: ScrollSurface::new(motion.scroll_client_height, pages),
            view_offset: ViewOffset::new(
                motion.default_view_offset_max,
                motion.wheel_speed,
                motion.touch_speed,
            ),
            camera: FollowCamera::new(
                layout.camera_y,
                motion.camera_smoothing,
                motion.train_center_offset,
            ),
            navigator: Navigator::new(),
            touch_y: None,
            frame: 0,
            stations,
            config,
            layout,
            geometry,
        }
    }

    pub fn stations(&self) -> &StationList {
        &self.stations
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn layout(&self) -> &LayoutMetrics {
        &self.layout
    }

    pub fn geometry(&self) -> &TrackGeometry {
        &self.geometry
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn surface(&self) -> &ScrollSurface {
        &self.surface
    }

    /// Applies one input event. Returns whether it had any effect.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        let on_branch = !self.navigator.active().is_main();
        match event {
            InputEvent::Wheel { delta_y } if on_branch => {
                self.view_offset.wheel(delta_y);
                true
            }
            InputEvent::Wheel { delta_y } => self.scroll_page(delta_y),
            InputEvent::TouchStart { y } => {
                if on_branch {
                    self.view_offset.touch_start(y);
                } else {
                    self.touch_y = Some(y);
                }
                true
            }
            InputEvent::TouchMove { y } if on_branch => {
                self.view_offset.touch_move(y);
                true
            }
            InputEvent::TouchMove { y } => {
                let Some(start) = self.touch_y.replace(y) else {
                    return false;
                };
                self.scroll_page(start - y)
            }
            InputEvent::TouchEnd => {
                self.touch_y = None;
                self.view_offset.touch_end();
                true
            }
            InputEvent::EnterBranch(i) => self.navigator.enter_branch(i, &self.geometry),
            InputEvent::GoToStation(i) => self.navigator.go_to_station(i, &self.geometry),
            InputEvent::Next => {
                let before = self.branch_state();
                self.navigator.branch_next(&self.stations);
                self.branch_state() != before
            }
            InputEvent::Prev => {
                let before = self.branch_state();
                self.navigator.branch_prev();
                self.branch_state() != before
            }
            InputEvent::Return => {
                let before = self.branch_state();
                self.navigator.return_to_main();
                self.branch_state() != before
            }
            InputEvent::Resize(viewport) => {
                self.resize(viewport);
                true
            }
        }
    }

    fn branch_state(&self) -> (Phase, usize) {
        (self.navigator.phase(), self.navigator.sub_index())
    }

    fn scroll_page(&mut self, delta: f32) -> bool {
        if !self.navigator.scroll_enabled() {
            return false;
        }
        self.surface.scroll_by(delta);
        true
    }

    /// Advances the scene by `dt` seconds.
    pub fn step(&mut self, dt: f32) -> SceneFrame {
        self.frame += 1;
        self.sync_scroll();
        self.step_main(dt);
        self.step_branch(dt);
        self.update_view_offset();

        let active = self.navigator.active();
        let curve = self.geometry.curve(active);
        let progress = self.navigator.active_progress();
        let view_offset = if active.is_main() {
            0.0
        } else {
            self.view_offset.value()
        };

        let train = TrainPose::place(curve, progress, &self.config.train);
        self.camera
            .update(curve, progress, self.layout.camera_y, view_offset, dt);

        SceneFrame {
            frame: self.frame,
            active,
            phase: self.navigator.phase(),
            sub_index: self.navigator.sub_index(),
            progress: self.navigator.progress(),
            scroll_offset: self.surface.offset(),
            view_offset,
            train,
            camera: self.camera,
        }
    }

    fn sync_scroll(&mut self) {
        if !self.navigator.active().is_main() {
            return;
        }
        let autopilot = self.navigator.aligning_to().is_some();
        let progress = &mut self.navigator.progress_mut().main;
        if self.syncer.frame(progress, &mut self.surface, autopilot)
            == SyncOutcome::ForcedSyncComplete
        {
            debug!("forced scroll sync complete");
        }
    }

    fn step_main(&mut self, dt: f32) {
        let target = self.navigator.main_target(&self.geometry);
        let length = self.geometry.main_length();
        let progress = &mut self.navigator.progress_mut().main;

        if self.main_pilot.step(progress, target, length, dt) == AutopilotStep::Arrived {
            if let Some(NavEvent::SwitchedToBranch(_)) =
                self.navigator.on_main_arrived(&self.geometry)
            {
                self.view_offset.reset();
            }
        }
    }

    fn step_branch(&mut self, dt: f32) {
        let Some(branch) = self
            .navigator
            .active()
            .branch_index()
            .and_then(|i| self.geometry.branch(i))
        else {
            return;
        };
        let length = branch.length();
        let target = self
            .navigator
            .branch_target(&self.geometry, self.config.motion.train_center_offset);
        let progress = &mut self.navigator.progress_mut().branch;

        if self.branch_pilot.step(progress, target, length, dt) != AutopilotStep::Arrived {
            return;
        }
        if let Some(NavEvent::ReturnedToMain { main_progress, .. }) =
            self.navigator.on_branch_arrived(&self.geometry)
        {
            self.view_offset.reset();
            self.syncer.begin_forced_sync(main_progress, &mut self.surface);
        }
    }

    fn update_view_offset(&mut self) {
        let sub_chapter = self
            .navigator
            .active()
            .branch_index()
            .and_then(|i| self.stations.sub_chapters(i).get(self.navigator.sub_index()));
        let max = branch_max_offset(
            sub_chapter,
            self.layout.is_mobile,
            self.layout.vp_height,
            self.config.track.sign_track_gap,
            self.config.motion.default_view_offset_max,
        );
        self.view_offset.set_max(max);
    }

    /// Rebuilds layout and geometry for a new viewport. Progress values carry over.
    pub fn resize(&mut self, viewport: Viewport) {
        self.layout = LayoutMetrics::compute(viewport, self.stations.len(), &self.config.layout);
        self.geometry = TrackGeometry::build(&self.stations, &self.layout, &self.config.track);
        self.syncer.set_stops(self.geometry.stops());
        info!(
            "resized to {}x{}, main line {:.1} units",
            viewport.width,
            viewport.height,
            self.geometry.main_length()
        );
    }

    pub fn signs(&self) -> Vec<SignPlacement> {
        place_signs(
            &self.stations,
            &self.geometry,
            self.navigator.active(),
            self.navigator.sub_index(),
        )
    }

    pub fn buffer_stops(&self) -> Vec<BufferStop> {
        buffer_stops(&self.geometry)
    }

    /// Rails for the main line and every branch. Branch rails skip the stretch
    /// shared with the main line.
    pub fn rails(&self) -> Vec<TrackRails> {
        let track = &self.config.track;
        let mut all = vec![TrackRails {
            track: ActiveTrack::Main,
            rails: RailLayout::build(self.geometry.main_curve(), track, 0.0),
        }];
        let skip = track.lead_in + track.branch_render_overlap;
        all.extend(self.geometry.branches().map(|b| TrackRails {
            track: ActiveTrack::Branch(b.station),
            rails: RailLayout::build(&b.curve, track, skip),
        }));
        all
    }

    pub fn ground(&self) -> GroundField {
        GroundField::build(&self.geometry, &self.config.ground)
    }
}
