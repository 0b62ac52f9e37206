use crate::sim::{clamp01, Float3};

use super::Curve;

/// Number of chords used to tabulate Bezier arc length.
pub const ARC_DIVISIONS: usize = 200;

/// Straight piece of track between two points.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineSegment {
    pub start: Float3,
    pub end: Float3,
}

impl LineSegment {
    pub const fn new(start: Float3, end: Float3) -> Self {
        Self { start, end }
    }
}

impl Curve for LineSegment {
    fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    fn point_at(&self, u: f32) -> Float3 {
        self.start.lerp(self.end, clamp01(u))
    }

    fn tangent_at(&self, _u: f32) -> Float3 {
        let dir = (self.end - self.start).normalize();
        if dir == Float3::ZERO {
            Float3::FORWARD
        } else {
            dir
        }
    }
}

/// Cubic Bezier with an arc-length lookup table so that `point_at` is
/// uniform in distance rather than in the raw Bezier parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicBezier {
    pub p0: Float3,
    pub c1: Float3,
    pub c2: Float3,
    pub p3: Float3,
    /// Cumulative chord length at `i / ARC_DIVISIONS`, `ARC_DIVISIONS + 1` entries.
    arc_table: Vec<f32>,
}

impl CubicBezier {
    pub fn new(p0: Float3, c1: Float3, c2: Float3, p3: Float3) -> Self {
        let mut bezier = Self {
            p0,
            c1,
            c2,
            p3,
            arc_table: Vec::with_capacity(ARC_DIVISIONS + 1),
        };

        let mut total = 0.0;
        let mut prev = p0;
        bezier.arc_table.push(0.0);
        for i in 1..=ARC_DIVISIONS {
            let p = bezier.point(i as f32 / ARC_DIVISIONS as f32);
            total += prev.distance(p);
            bezier.arc_table.push(total);
            prev = p;
        }

        bezier
    }

    /// Point at raw Bezier parameter `t`.
    pub fn point(&self, t: f32) -> Float3 {
        let t = clamp01(t);
        let mt = 1.0 - t;
        self.p0 * (mt * mt * mt)
            + self.c1 * (3.0 * mt * mt * t)
            + self.c2 * (3.0 * mt * t * t)
            + self.p3 * (t * t * t)
    }

    /// First derivative at raw Bezier parameter `t`.
    pub fn derivative(&self, t: f32) -> Float3 {
        let t = clamp01(t);
        let mt = 1.0 - t;
        (self.c1 - self.p0) * (3.0 * mt * mt)
            + (self.c2 - self.c1) * (6.0 * mt * t)
            + (self.p3 - self.c2) * (3.0 * t * t)
    }

    /// Maps a normalized arc distance to the raw Bezier parameter.
    /// Uses binary search to find the bracketing chord, then linearly interpolates.
    fn u_to_t(&self, u: f32) -> f32 {
        let u = clamp01(u);
        let last = self.arc_table.len() - 1;
        let total = self.arc_table[last];
        if total <= 0.0 {
            return u;
        }

        let target = u * total;
        if target >= total {
            return 1.0;
        }

        let mut lo = 0usize;
        let mut hi = last;
        while lo < hi - 1 {
            let mid = (lo + hi) / 2;
            if self.arc_table[mid] <= target {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        let seg_len = self.arc_table[lo + 1] - self.arc_table[lo];
        let frac = if seg_len > 0.0 {
            (target - self.arc_table[lo]) / seg_len
        } else {
            0.0
        };

        (lo as f32 + frac) / last as f32
    }
}

impl Curve for CubicBezier {
    fn length(&self) -> f32 {
        self.arc_table[self.arc_table.len() - 1]
    }

    fn point_at(&self, u: f32) -> Float3 {
        self.point(self.u_to_t(u))
    }

    fn tangent_at(&self, u: f32) -> Float3 {
        let dir = self.derivative(self.u_to_t(u)).normalize();
        if dir != Float3::ZERO {
            return dir;
        }
        let chord = (self.p3 - self.p0).normalize();
        if chord == Float3::ZERO {
            Float3::FORWARD
        } else {
            chord
        }
    }
}

/// One piece of a [`TrackCurve`](super::TrackCurve).
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Line(LineSegment),
    Bezier(CubicBezier),
}

impl Curve for Segment {
    fn length(&self) -> f32 {
        match self {
            Segment::Line(line) => line.length(),
            Segment::Bezier(bezier) => bezier.length(),
        }
    }

    fn point_at(&self, u: f32) -> Float3 {
        match self {
            Segment::Line(line) => line.point_at(u),
            Segment::Bezier(bezier) => bezier.point_at(u),
        }
    }

    fn tangent_at(&self, u: f32) -> Float3 {
        match self {
            Segment::Line(line) => line.tangent_at(u),
            Segment::Bezier(bezier) => bezier.tangent_at(u),
        }
    }
}
