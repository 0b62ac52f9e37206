use serde::{Deserialize, Serialize};
use std::path::Path;

use super::ContentError;

const EMBEDDED_STATIONS: &str = include_str!("../../assets/stations.json");

/// One stop on the line, or one sub-chapter of a stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub label: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default, rename = "subChapters", alias = "sub_chapters")]
    pub sub_chapters: Vec<Station>,
}

impl Station {
    pub fn new(label: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            desc: desc.into(),
            sub_chapters: Vec::new(),
        }
    }

    pub fn with_sub_chapters(mut self, sub_chapters: Vec<Station>) -> Self {
        self.sub_chapters = sub_chapters;
        self
    }

    pub fn has_branch(&self) -> bool {
        !self.sub_chapters.is_empty()
    }
}

/// Validated, ordered station list: non-empty, labelled, one nesting level.
#[derive(Debug, Clone, PartialEq)]
pub struct StationList {
    stations: Vec<Station>,
}

impl StationList {
    pub fn new(stations: Vec<Station>) -> Result<Self, ContentError> {
        if stations.is_empty() {
            return Err(ContentError::Empty);
        }

        for (i, station) in stations.iter().enumerate() {
            if station.label.trim().is_empty() {
                return Err(ContentError::EmptyLabel {
                    station: i,
                    sub_chapter: None,
                });
            }
            for (j, sub) in station.sub_chapters.iter().enumerate() {
                if sub.has_branch() {
                    return Err(ContentError::NestedSubChapter {
                        station: i,
                        sub_chapter: j,
                    });
                }
                if sub.label.trim().is_empty() {
                    return Err(ContentError::EmptyLabel {
                        station: i,
                        sub_chapter: Some(j),
                    });
                }
            }
        }

        Ok(Self { stations })
    }

    /// The dataset compiled into the crate.
    pub fn embedded() -> Result<Self, ContentError> {
        Self::from_json_str(EMBEDDED_STATIONS)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ContentError> {
        let stations: Vec<Station> = serde_json::from_str(json).map_err(ContentError::Parse)?;
        Self::new(stations)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(ContentError::Io)?;
        let list = Self::from_json_str(&json)?;
        log::info!(
            "Loaded {} stations ({} with branches) from {}",
            list.len(),
            list.branch_indices().count(),
            path.display()
        );
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Station> {
        self.stations.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Station> {
        self.stations.iter()
    }

    pub fn as_slice(&self) -> &[Station] {
        &self.stations
    }

    /// Sub-chapters of station `index`; empty when it has none or is out of range.
    pub fn sub_chapters(&self, index: usize) -> &[Station] {
        self.stations
            .get(index)
            .map(|s| s.sub_chapters.as_slice())
            .unwrap_or(&[])
    }

    /// Indices of stations that own a branch.
    pub fn branch_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.stations
            .iter()
            .enumerate()
            .filter(|(_, s)| s.has_branch())
            .map(|(i, _)| i)
    }
}

impl<'a> IntoIterator for &'a StationList {
    type Item = &'a Station;
    type IntoIter = std::slice::Iter<'a, Station>;

    fn into_iter(self) -> Self::IntoIter {
        self.stations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_dataset_loads() {
        let list = StationList::embedded().unwrap();
        assert!(list.len() >= 2);
        assert!(list.branch_indices().count() >= 1);
    }

    #[test]
    fn parses_camel_case_sub_chapters() {
        let json = r#"[
            { "label": "A", "desc": "first" },
            { "label": "B", "subChapters": [ { "label": "B1", "desc": "x" } ] }
        ]"#;
        let list = StationList::from_json_str(json).unwrap();

        assert_eq!(list.len(), 2);
        assert!(!list.get(0).unwrap().has_branch());
        assert_eq!(list.sub_chapters(1).len(), 1);
        assert_eq!(list.get(1).unwrap().desc, "");
        assert_eq!(list.branch_indices().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn accepts_snake_case_alias() {
        let json = r#"[ { "label": "A", "sub_chapters": [ { "label": "A1" } ] } ]"#;
        let list = StationList::from_json_str(json).unwrap();
        assert_eq!(list.sub_chapters(0).len(), 1);
    }

    #[test]
    fn rejects_empty_list() {
        assert!(matches!(
            StationList::from_json_str("[]"),
            Err(ContentError::Empty)
        ));
    }

    #[test]
    fn rejects_nested_sub_chapters() {
        let stations = vec![Station::new("A", "").with_sub_chapters(vec![
            Station::new("A1", "").with_sub_chapters(vec![Station::new("A1a", "")]),
        ])];
        assert!(matches!(
            StationList::new(stations),
            Err(ContentError::NestedSubChapter {
                station: 0,
                sub_chapter: 0
            })
        ));
    }

    #[test]
    fn rejects_blank_labels() {
        let stations = vec![Station::new("  ", "desc")];
        assert!(matches!(
            StationList::new(stations),
            Err(ContentError::EmptyLabel {
                station: 0,
                sub_chapter: None
            })
        ));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            StationList::from_json_str("{"),
            Err(ContentError::Parse(_))
        ));
    }

    #[test]
    fn out_of_range_sub_chapters_are_empty() {
        let list = StationList::new(vec![Station::new("A", "")]).unwrap();
        assert!(list.sub_chapters(5).is_empty());
    }
}
