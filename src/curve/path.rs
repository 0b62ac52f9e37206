use crate::sim::{clamp01, Float3};

use super::segment::{CubicBezier, LineSegment, Segment};
use super::Curve;

/// An ordered chain of segments parameterized by arc length over the whole chain.
///
/// Both the main line and every branch are `TrackCurve`s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackCurve {
    segments: Vec<Segment>,
    /// Arc distance at the end of each segment.
    ends: Vec<f32>,
}

impl TrackCurve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single straight segment.
    pub fn line(start: Float3, end: Float3) -> Self {
        let mut curve = Self::new();
        curve.push_line(start, end);
        curve
    }

    pub fn push(&mut self, segment: Segment) -> &mut Self {
        let start = self.ends.last().copied().unwrap_or(0.0);
        self.ends.push(start + segment.length());
        self.segments.push(segment);
        self
    }

    pub fn push_line(&mut self, start: Float3, end: Float3) -> &mut Self {
        self.push(Segment::Line(LineSegment::new(start, end)))
    }

    pub fn push_bezier(&mut self, p0: Float3, c1: Float3, c2: Float3, p3: Float3) -> &mut Self {
        self.push(Segment::Bezier(CubicBezier::new(p0, c1, c2, p3)))
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Arc distance from the start of the curve to the start of segment `index`.
    pub fn segment_start(&self, index: usize) -> f32 {
        if index == 0 {
            0.0
        } else {
            self.ends.get(index - 1).copied().unwrap_or_else(|| self.length())
        }
    }

    /// Finds the segment containing normalized arc position `u` and the local
    /// parameter within it.
    fn locate(&self, u: f32) -> Option<(usize, f32)> {
        if self.segments.is_empty() {
            return None;
        }

        let total = self.length();
        if total <= 0.0 {
            return Some((0, 0.0));
        }

        let d = clamp01(u) * total;
        let index = self
            .ends
            .partition_point(|&end| end < d)
            .min(self.segments.len() - 1);

        let start = self.segment_start(index);
        let seg_len = self.segments[index].length();
        let local = if seg_len > 0.0 {
            (d - start) / seg_len
        } else {
            0.0
        };

        Some((index, clamp01(local)))
    }
}

impl Curve for TrackCurve {
    fn length(&self) -> f32 {
        self.ends.last().copied().unwrap_or(0.0)
    }

    fn point_at(&self, u: f32) -> Float3 {
        match self.locate(u) {
            Some((index, local)) => self.segments[index].point_at(local),
            None => Float3::ZERO,
        }
    }

    fn tangent_at(&self, u: f32) -> Float3 {
        match self.locate(u) {
            Some((index, local)) => self.segments[index].tangent_at(local),
            None => Float3::FORWARD,
        }
    }
}
