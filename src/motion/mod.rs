//! Frame-driven motion: autopilots, scroll sync, branch view offset and the
//! navigation state machine that ties them to the track geometry.

mod autopilot;
mod navigation;
mod scroll;
mod view_offset;

pub use autopilot::{Autopilot, AutopilotStep};
pub use navigation::{NavEvent, Navigator, Phase, ProgressState};
pub use scroll::{ScrollSurface, ScrollSyncer, SyncOutcome};
pub use view_offset::ViewOffset;
