//! Station content feed.
//!
//! Stations are immutable once loaded. The crate ships a dataset compiled in
//! from `assets/stations.json`; hosts may supply their own JSON instead.

mod station;

pub use station::{Station, StationList};

#[derive(Debug)]
pub enum ContentError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Empty,
    NestedSubChapter { station: usize, sub_chapter: usize },
    EmptyLabel { station: usize, sub_chapter: Option<usize> },
}

impl std::fmt::Display for ContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentError::Io(e) => write!(f, "Failed to read station content: {e}"),
            ContentError::Parse(e) => write!(f, "Invalid station JSON: {e}"),
            ContentError::Empty => write!(f, "Station list is empty"),
            ContentError::NestedSubChapter {
                station,
                sub_chapter,
            } => write!(
                f,
                "Sub-chapter {sub_chapter} of station {station} has its own sub-chapters"
            ),
            ContentError::EmptyLabel {
                station,
                sub_chapter: None,
            } => write!(f, "Station {station} has an empty label"),
            ContentError::EmptyLabel {
                station,
                sub_chapter: Some(sub),
            } => write!(f, "Sub-chapter {sub} of station {station} has an empty label"),
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContentError::Io(e) => Some(e),
            ContentError::Parse(e) => Some(e),
            _ => None,
        }
    }
}
