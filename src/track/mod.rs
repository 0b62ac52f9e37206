//! Track layout and geometry.
//!
//! This module provides the pipeline from a viewport and a station list to
//! world-space curves: layout metrics, the main line with its station stops,
//! one branch per station with sub-chapters, and rail/buffer-stop layout.

mod branch;
mod geometry;
mod layout;
mod rails;

pub use branch::Branch;
pub use geometry::{ActiveTrack, TrackGeometry};
pub use layout::{LayoutMetrics, Viewport};
pub use rails::{buffer_stops, BufferStop, RailLayout};
