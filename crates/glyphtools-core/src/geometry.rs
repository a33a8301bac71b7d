// this_file: crates/glyphtools-core/src/geometry.rs

//! Outlines and the ink-to-ink distance between them
//!
//! A glyph's ink is a handful of closed Bézier paths. To ask "how close do
//! these two glyphs get?" we sample every segment of both paths at a fixed
//! number of parameter values and take the shortest point-to-point gap.
//!
//! The sampling resolution is part of the answer: raise it and the measured
//! distance shrinks towards the true minimum, changing every kern computed
//! from it. It is therefore a constant, never adapted at runtime.

use kurbo::{Affine, BezPath, ParamCurve, Point, Rect, Shape, Vec2};

/// Parameter samples taken on each path segment: start, middle and end.
pub const SAMPLES_PER_SEGMENT: usize = 3;

/// One closed contour of a glyph
///
/// Outlines are immutable once they leave a font source. Moving one around
/// produces a new outline and leaves the original where it was.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline(BezPath);

impl Outline {
    pub fn new(path: BezPath) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &BezPath {
        &self.0
    }

    pub fn into_path(self) -> BezPath {
        self.0
    }

    /// True when the outline has no drawable segments.
    pub fn is_empty(&self) -> bool {
        self.0.segments().next().is_none()
    }

    /// A copy of this outline shifted by `offset`.
    pub fn translated(&self, offset: Vec2) -> Outline {
        let mut path = self.0.clone();
        path.apply_affine(Affine::translate(offset));
        Outline(path)
    }

    /// A copy of this outline under an arbitrary affine transform.
    pub fn transformed(&self, affine: Affine) -> Outline {
        let mut path = self.0.clone();
        path.apply_affine(affine);
        Outline(path)
    }

    /// Tight bounds of the ink, or `None` for an empty outline.
    pub fn bounds(&self) -> Option<Rect> {
        if self.is_empty() {
            None
        } else {
            Some(self.0.bounding_box())
        }
    }

    /// Points sampled along every segment, `samples` per segment.
    ///
    /// Samples are spread evenly over `t ∈ [0, 1]` and always include both
    /// endpoints. Asking for fewer than two samples still yields the endpoints.
    pub fn sample_points(&self, samples: usize) -> Vec<Point> {
        let samples = samples.max(2);
        let step = 1.0 / (samples - 1) as f64;
        let mut points = Vec::new();
        for seg in self.0.segments() {
            for i in 0..samples {
                points.push(seg.eval(i as f64 * step));
            }
        }
        points
    }

    /// Shortest sampled distance to `other` at the standard resolution.
    ///
    /// Returns `None` when either outline has no segments.
    pub fn distance_to(&self, other: &Outline) -> Option<f64> {
        self.distance_to_with(other, SAMPLES_PER_SEGMENT)
    }

    /// Shortest sampled distance to `other` with a caller-chosen resolution.
    pub fn distance_to_with(&self, other: &Outline, samples: usize) -> Option<f64> {
        let ours = self.sample_points(samples);
        let theirs = other.sample_points(samples);

        let mut best: Option<f64> = None;
        for p in &ours {
            for q in &theirs {
                let d = p.distance(*q);
                if best.map_or(true, |b| d < b) {
                    best = Some(d);
                }
            }
        }
        best
    }
}

impl From<BezPath> for Outline {
    fn from(path: BezPath) -> Self {
        Self(path)
    }
}

/// Shortest distance between any outline of `left` and any outline of `right`
///
/// Outline pairs where either side is empty contribute nothing. `None` means
/// no pair could be measured at all.
pub fn min_distance(left: &[Outline], right: &[Outline]) -> Option<f64> {
    let mut best: Option<f64> = None;
    for a in left {
        for b in right {
            if let Some(d) = a.distance_to(b) {
                if best.map_or(true, |current| d < current) {
                    best = Some(d);
                }
            }
        }
    }
    best
}

/// Union of the bounds of every non-empty outline.
pub fn union_bounds(outlines: &[Outline]) -> Option<Rect> {
    outlines
        .iter()
        .filter_map(Outline::bounds)
        .reduce(|acc, r| acc.union(r))
}

/// An axis-aligned rectangle as a closed outline, handy for fixtures.
pub fn rect_outline(x0: f64, y0: f64, x1: f64, y1: f64) -> Outline {
    let mut path = BezPath::new();
    path.move_to((x0, y0));
    path.line_to((x1, y0));
    path.line_to((x1, y1));
    path.line_to((x0, y1));
    path.close_path();
    Outline(path)
}
