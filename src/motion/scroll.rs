use serde::Serialize;

use crate::sim::clamp01;

/// A scrollable page whose position stands in for main-line progress.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct ScrollSurface {
    pub scroll_top: f32,
    pub scroll_height: f32,
    pub client_height: f32,
}

impl ScrollSurface {
    /// A surface `pages` viewports tall, scrolled to the top.
    pub fn new(client_height: f32, pages: f32) -> Self {
        Self {
            scroll_top: 0.0,
            scroll_height: client_height.max(0.0) * pages.max(1.0),
            client_height: client_height.max(0.0),
        }
    }

    /// Page count for a station list: one and a half viewports per station.
    pub fn pages_for(station_count: usize, pages_per_station: f32) -> f32 {
        station_count as f32 * pages_per_station
    }

    pub fn max_scroll(&self) -> f32 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// Normalized scroll position in [0, 1]; 0 when the page cannot scroll.
    pub fn offset(&self) -> f32 {
        let max = self.max_scroll();
        if max <= 0.0 {
            return 0.0;
        }
        clamp01(self.scroll_top / max)
    }

    pub fn set_offset(&mut self, offset: f32) {
        self.scroll_top = clamp01(offset) * self.max_scroll();
    }

    /// Scrolls by `delta` pixels, clamped to the page.
    pub fn scroll_by(&mut self, delta: f32) {
        if !delta.is_finite() {
            return;
        }
        self.scroll_top = (self.scroll_top + delta).clamp(0.0, self.max_scroll());
    }
}

/// What a sync frame did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Progress was written into the scroll surface.
    Pushed,
    /// Progress was read back from the scroll surface.
    Pulled,
    /// Last frame of a forced sync; the caller should clear its request.
    ForcedSyncComplete,
}

/// Keeps main-line progress and the scroll surface in agreement.
///
/// While the autopilot drives, or for a number of frames after a forced sync,
/// progress is pushed into the surface. Otherwise the surface drives progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollSyncer {
    start_t: f32,
    end_t: f32,
    forced_frames: u32,
    sustain_frames: u32,
}

impl ScrollSyncer {
    /// Syncer over the span between the first and last station stop.
    pub fn new(stops: &[f32], sustain_frames: u32) -> Self {
        let mut syncer = Self {
            start_t: 0.0,
            end_t: 0.0,
            forced_frames: 0,
            sustain_frames,
        };
        syncer.set_stops(stops);
        syncer
    }

    pub fn set_stops(&mut self, stops: &[f32]) {
        self.start_t = stops.first().copied().unwrap_or(0.0);
        self.end_t = stops.last().copied().unwrap_or(self.start_t);
    }

    pub fn start_t(&self) -> f32 {
        self.start_t
    }

    pub fn range(&self) -> f32 {
        self.end_t - self.start_t
    }

    pub fn is_forcing(&self) -> bool {
        self.forced_frames > 0
    }

    pub fn progress_to_offset(&self, progress: f32) -> f32 {
        let range = self.range();
        if range <= 0.0 {
            return 0.0;
        }
        (progress - self.start_t) / range
    }

    pub fn offset_to_progress(&self, offset: f32) -> f32 {
        self.start_t + clamp01(offset) * self.range().max(0.0)
    }

    /// Snaps the surface to `progress` now and keeps pushing for the sustain window.
    pub fn begin_forced_sync(&mut self, progress: f32, surface: &mut ScrollSurface) {
        surface.set_offset(self.progress_to_offset(progress));
        self.forced_frames = self.sustain_frames;
    }

    pub fn frame(
        &mut self,
        progress: &mut f32,
        surface: &mut ScrollSurface,
        autopilot: bool,
    ) -> SyncOutcome {
        if autopilot || self.forced_frames > 0 {
            surface.set_offset(self.progress_to_offset(*progress));

            if self.forced_frames > 0 {
                self.forced_frames -= 1;
                if self.forced_frames == 0 {
                    return SyncOutcome::ForcedSyncComplete;
                }
            }
            return SyncOutcome::Pushed;
        }

        *progress = self.offset_to_progress(surface.offset());
        SyncOutcome::Pulled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn surface() -> ScrollSurface {
        ScrollSurface::new(800.0, ScrollSurface::pages_for(4, 1.5))
    }

    #[test]
    fn surface_height_scales_with_pages() {
        let s = surface();
        assert_relative_eq!(s.scroll_height, 4800.0);
        assert_relative_eq!(s.max_scroll(), 4000.0);
    }

    #[test]
    fn offset_is_normalized_and_clamped() {
        let mut s = surface();
        s.scroll_by(1000.0);
        assert_relative_eq!(s.offset(), 0.25);
        s.scroll_by(1.0e6);
        assert_eq!(s.offset(), 1.0);
        s.scroll_by(-1.0e6);
        assert_eq!(s.offset(), 0.0);
    }

    #[test]
    fn unscrollable_surface_reports_zero() {
        let mut s = ScrollSurface::new(800.0, 0.5);
        s.scroll_by(100.0);
        assert_eq!(s.max_scroll(), 0.0);
        assert_eq!(s.offset(), 0.0);
    }

    #[test]
    fn manual_mode_pulls_progress_from_surface() {
        let mut syncer = ScrollSyncer::new(&[0.1, 0.4, 0.7], 60);
        let mut s = surface();
        s.set_offset(0.5);

        let mut progress = 0.0;
        assert_eq!(syncer.frame(&mut progress, &mut s, false), SyncOutcome::Pulled);
        assert_relative_eq!(progress, 0.4, epsilon = 1e-6);
    }

    #[test]
    fn autopilot_mode_pushes_progress_into_surface() {
        let mut syncer = ScrollSyncer::new(&[0.1, 0.4, 0.7], 60);
        let mut s = surface();

        let mut progress = 0.55;
        assert_eq!(syncer.frame(&mut progress, &mut s, true), SyncOutcome::Pushed);
        assert_relative_eq!(s.offset(), 0.75, epsilon = 1e-6);
        assert_eq!(progress, 0.55);
    }

    #[test]
    fn forced_sync_sustains_then_completes() {
        let mut syncer = ScrollSyncer::new(&[0.0, 1.0], 3);
        let mut s = surface();

        syncer.begin_forced_sync(0.3, &mut s);
        assert_relative_eq!(s.offset(), 0.3, epsilon = 1e-6);
        // User scroll during the window is overridden
        s.scroll_by(900.0);

        let mut progress = 0.3;
        assert_eq!(syncer.frame(&mut progress, &mut s, false), SyncOutcome::Pushed);
        assert_eq!(syncer.frame(&mut progress, &mut s, false), SyncOutcome::Pushed);
        assert_eq!(
            syncer.frame(&mut progress, &mut s, false),
            SyncOutcome::ForcedSyncComplete
        );
        assert!(!syncer.is_forcing());
        assert_relative_eq!(s.offset(), 0.3, epsilon = 1e-6);

        assert_eq!(syncer.frame(&mut progress, &mut s, false), SyncOutcome::Pulled);
        assert_relative_eq!(progress, 0.3, epsilon = 1e-5);
    }

    #[test]
    fn zero_range_never_divides() {
        let mut syncer = ScrollSyncer::new(&[0.5], 60);
        let mut s = surface();
        s.set_offset(0.8);

        let mut progress = 0.9;
        syncer.frame(&mut progress, &mut s, true);
        assert_eq!(s.offset(), 0.0);

        syncer.frame(&mut progress, &mut s, false);
        assert_eq!(progress, 0.5);
    }

    #[test]
    fn empty_stops_give_zero_range() {
        let syncer = ScrollSyncer::new(&[], 60);
        assert_eq!(syncer.range(), 0.0);
        assert_eq!(syncer.progress_to_offset(0.7), 0.0);
    }
}
