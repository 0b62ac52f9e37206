use serde::Serialize;

use crate::content::{Station, StationList};
use crate::sim::Float3;
use crate::track::{ActiveTrack, TrackGeometry};

const TITLE_LINE_HEIGHT: f32 = 0.8;
const DESC_LINE_HEIGHT: f32 = 0.42;
const TITLE_CHARS_PER_UNIT: f32 = 2.2;
const DESC_CHARS_PER_UNIT: f32 = 6.5;
const MIN_HEIGHT: f32 = 4.0;
const FRAME_THICKNESS: f32 = 0.3;

/// Width assumed for branch signs when sizing the view offset range.
const BRANCH_FRAME_WIDTH: f32 = 14.0;
const VIEW_MARGIN: f32 = -3.0;
const TRAIN_BOTTOM_MARGIN: f32 = 2.0;

/// Estimated size and text anchors of a sign, in world units.
///
/// Text is never shaped; line counts come from a fixed characters-per-unit
/// estimate for the title and description fonts. Vertical anchors are
/// relative to the sign centre.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct SignMetrics {
    pub width: f32,
    pub height: f32,
    /// Height the content needs, before the minimum sign height applies.
    pub content_height: f32,
    pub text_box_width: f32,
    pub title_lines: u32,
    pub title_height: f32,
    pub desc_lines: u32,
    pub desc_height: f32,
    pub title_y: f32,
    pub desc_y: f32,
    pub button_y: f32,
}

impl SignMetrics {
    pub fn measure(label: &str, desc: &str, width: f32) -> Self {
        let text_box_width = width - 1.0;

        let title_lines = line_count(label, text_box_width * TITLE_CHARS_PER_UNIT);
        let title_height = title_lines as f32 * TITLE_LINE_HEIGHT;

        let desc_lines = line_count(desc, text_box_width * DESC_CHARS_PER_UNIT);
        let desc_height = desc_lines as f32 * DESC_LINE_HEIGHT;

        let content_height = 1.0 + title_height + 0.5 + desc_height + 1.0;
        let height = content_height.max(MIN_HEIGHT);

        let title_y = height / 2.0 - 1.0;
        let desc_y = title_y - title_height - 0.2;

        Self {
            width,
            height,
            content_height,
            text_box_width,
            title_lines,
            title_height,
            desc_lines,
            desc_height,
            title_y,
            desc_y,
            button_y: -(height / 2.0) - 1.2,
        }
    }

    /// Background panel plus the four wooden bars around it, centred on the sign.
    pub fn frame(&self) -> [FrameBox; 5] {
        let (w, h, t) = (self.width, self.height, FRAME_THICKNESS);
        let bar = |x: f32, y: f32, size_x: f32, size_y: f32| FrameBox {
            centre: Float3::new(x, y, 0.0),
            size: Float3::new(size_x, size_y, t),
            part: FramePart::Bar,
        };
        [
            FrameBox {
                centre: Float3::new(0.0, 0.0, -0.05),
                size: Float3::new(w, h, 0.1),
                part: FramePart::Panel,
            },
            bar(0.0, h / 2.0 + t / 2.0, w + 2.0 * t, t),
            bar(0.0, -h / 2.0 - t / 2.0, w + 2.0 * t, t),
            bar(-w / 2.0 - t / 2.0, 0.0, t, h),
            bar(w / 2.0 + t / 2.0, 0.0, t, h),
        ]
    }
}

/// Lines needed for `text` at `chars_per_line`, never dividing by less than one.
fn line_count(text: &str, chars_per_line: f32) -> u32 {
    let chars = text.chars().count() as f32;
    let per_line = chars_per_line.floor().max(1.0);
    (chars / per_line).ceil() as u32
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum FramePart {
    Panel,
    Bar,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct FrameBox {
    pub centre: Float3,
    pub size: Float3,
    pub part: FramePart,
}

/// How far the camera may pull back to read `sub_chapter`'s sign.
///
/// Falls back to `default_max` when there is no current sub-chapter.
pub fn branch_max_offset(
    sub_chapter: Option<&Station>,
    is_mobile: bool,
    vp_height: f32,
    sign_track_gap: f32,
    default_max: f32,
) -> f32 {
    let Some(sub) = sub_chapter else {
        return default_max;
    };
    let metrics = SignMetrics::measure(&sub.label, &sub.desc, BRANCH_FRAME_WIDTH);
    let viewport = if is_mobile { 0.0 } else { vp_height };
    metrics.content_height + VIEW_MARGIN + sign_track_gap + TRAIN_BOTTOM_MARGIN - viewport
}

/// Interactive controls rendered under a sign.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum SignButton {
    /// Drive to the station and enter its branch.
    Enter,
    /// Step back one sub-chapter.
    Previous,
    /// Leave the branch from its first sign.
    Back,
    Next,
    /// Leave the branch from its last sign.
    Return,
}

impl SignButton {
    pub fn label(self) -> &'static str {
        match self {
            SignButton::Enter => "Czytaj Dalej",
            SignButton::Previous => "Cofnij",
            SignButton::Back => "Powrót",
            SignButton::Next => "Dalej",
            SignButton::Return => "Powrót",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum SignOwner {
    Main(usize),
    Branch { station: usize, sub_chapter: usize },
}

/// A sign ready to draw: where it stands, what it says and which buttons it shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignPlacement {
    pub owner: SignOwner,
    /// Bottom-centre anchor; the sign lies flat and grows along -Z.
    pub position: Float3,
    pub label: String,
    pub desc: String,
    pub metrics: SignMetrics,
    pub buttons: Vec<SignButton>,
}

/// Signs for every station, plus the active branch's sub-chapters.
pub fn place_signs(
    stations: &StationList,
    geometry: &TrackGeometry,
    active: ActiveTrack,
    sub_index: usize,
) -> Vec<SignPlacement> {
    let layout = geometry.layout();
    let height = geometry.config().rail_height;

    let mut signs: Vec<SignPlacement> = stations
        .iter()
        .enumerate()
        .map(|(i, station)| {
            let mut buttons = Vec::new();
            // Entering is only possible from the main line
            if station.has_branch() && active.is_main() {
                buttons.push(SignButton::Enter);
            }
            SignPlacement {
                owner: SignOwner::Main(i),
                position: Float3::new(layout.sign_x, height, layout.station_z(i)),
                label: station.label.clone(),
                desc: station.desc.clone(),
                metrics: SignMetrics::measure(&station.label, &station.desc, layout.sign_width),
                buttons,
            }
        })
        .collect();

    let Some(station) = active.branch_index() else {
        return signs;
    };
    let Some(branch) = geometry.branch(station) else {
        return signs;
    };

    let subs = stations.sub_chapters(station);
    signs.extend(subs.iter().enumerate().map(|(j, sub)| {
        let buttons = if j == sub_index {
            branch_buttons(j, subs.len())
        } else {
            Vec::new()
        };
        SignPlacement {
            owner: SignOwner::Branch {
                station,
                sub_chapter: j,
            },
            position: branch.sign_position(j, height),
            label: sub.label.clone(),
            desc: sub.desc.clone(),
            metrics: SignMetrics::measure(&sub.label, &sub.desc, layout.sign_width),
            buttons,
        }
    }));

    signs
}

fn branch_buttons(index: usize, count: usize) -> Vec<SignButton> {
    let is_last = index + 1 >= count;
    let mut buttons = Vec::with_capacity(2);
    match (index, is_last) {
        // A single sign already offers Return; Back would duplicate it.
        (0, true) => {}
        (0, false) => buttons.push(SignButton::Back),
        _ => buttons.push(SignButton::Previous),
    }
    buttons.push(if is_last {
        SignButton::Return
    } else {
        SignButton::Next
    });
    buttons
}
