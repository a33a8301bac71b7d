// this_file: crates/glyphtools-core/src/kern.rs

//! Kerning by ink distance
//!
//! Place the right glyph at the left glyph's advance, measure how close the
//! ink gets, then slide the right glyph by exactly the error and measure
//! again. Each round is a fixed-point step on the kern value.
//!
//! Three things end the search:
//!
//! - the measured distance lands within [`TOLERANCE`] of the target,
//! - a round fails to get strictly closer than the best so far (we have
//!   overshot or hit a plateau), in which case the kern that produced the
//!   best distance is kept,
//! - the round counter passes [`MAX_ITERATIONS`].
//!
//! Whatever the search finds, the result is floored so the right glyph is
//! never tucked further left than `max_tuck` of the left glyph's width.

use kurbo::Vec2;

use crate::{
    error::{GlyphtoolsError, Result},
    geometry::{min_distance, Outline},
    traits::FontSource,
};

/// Adjustment rounds allowed before the search gives up.
pub const MAX_ITERATIONS: u32 = 10;

/// Distances within this many units of the target count as a hit.
pub const TOLERANCE: f64 = 1.0;

/// Default tuck limit, as a fraction of the left glyph's width.
pub const DEFAULT_MAX_TUCK: f64 = 0.4;

/// How a kerning search should behave
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernParams {
    /// Desired ink-to-ink distance; zero or negative asks for contact or overlap
    pub target_distance: f64,
    /// Where the left glyph's origin sits
    pub offset_left: Vec2,
    /// Extra displacement of the right glyph, on top of the left advance
    pub offset_right: Vec2,
    /// Largest tuck as a fraction of the left width; `None` or zero means
    /// the whole width
    pub max_tuck: Option<f64>,
}

impl Default for KernParams {
    fn default() -> Self {
        Self {
            target_distance: 0.0,
            offset_left: Vec2::ZERO,
            offset_right: Vec2::ZERO,
            max_tuck: Some(DEFAULT_MAX_TUCK),
        }
    }
}

impl KernParams {
    pub fn new(target_distance: f64) -> Self {
        Self {
            target_distance,
            ..Self::default()
        }
    }

    pub fn with_offsets(mut self, offset_left: Vec2, offset_right: Vec2) -> Self {
        self.offset_left = offset_left;
        self.offset_right = offset_right;
        self
    }

    pub fn with_max_tuck(mut self, max_tuck: Option<f64>) -> Self {
        self.max_tuck = max_tuck;
        self
    }

    /// The most negative kern allowed after a left glyph of `width`.
    pub fn kern_floor(&self, width: f64) -> f64 {
        match self.max_tuck {
            Some(tuck) if tuck != 0.0 => -(width * tuck),
            _ => -width,
        }
    }
}

/// A kerning request for a named glyph pair
#[derive(Debug, Clone, PartialEq)]
pub struct KerningQuery {
    pub left: String,
    pub right: String,
    pub params: KernParams,
}

impl KerningQuery {
    pub fn new(left: impl Into<String>, right: impl Into<String>, target_distance: f64) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            params: KernParams::new(target_distance),
        }
    }

    pub fn with_params(mut self, params: KernParams) -> Self {
        self.params = params;
        self
    }
}

/// Which rule ended the search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Measured distance landed within tolerance of the target
    Converged,
    /// A round did not improve on the best distance so far
    Stalled,
    /// Ran out of rounds
    IterationCap,
}

/// Everything the search learned on its way to a kern
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernSolution {
    /// The kern to use: floored by the tuck limit and truncated
    pub kern: i32,
    /// The kern the search settled on before the tuck limit applied
    pub unclamped: f64,
    /// Ink distance measured at `unclamped`
    pub distance: f64,
    /// Distance measurements performed
    pub rounds: u32,
    pub stop: StopReason,
}

/// Find the kern that sets two outline sets `target_distance` apart.
///
/// `width_left` is the advance of the left glyph; the right glyph starts at
/// that advance and moves from there.
pub fn solve(
    left: &[Outline],
    right: &[Outline],
    width_left: f64,
    params: &KernParams,
) -> Result<i32> {
    solve_detailed(left, right, width_left, params).map(|solution| solution.kern)
}

/// Like [`solve`], but reports how the search went.
pub fn solve_detailed(
    left: &[Outline],
    right: &[Outline],
    width_left: f64,
    params: &KernParams,
) -> Result<KernSolution> {
    if left.iter().all(Outline::is_empty) {
        return Err(GlyphtoolsError::MissingGeometry("left glyph".into()));
    }
    if right.iter().all(Outline::is_empty) {
        return Err(GlyphtoolsError::MissingGeometry("right glyph".into()));
    }

    let target = params.target_distance;
    let placed_left: Vec<Outline> = left
        .iter()
        .map(|o| o.translated(params.offset_left))
        .collect();
    let origin_right = params.offset_right + Vec2::new(width_left, 0.0);

    let mut kern = 0.0;
    let mut best: Option<(f64, f64)> = None; // (distance, kern that produced it)
    let mut iterations = 0;
    let mut rounds = 0;

    let stop = loop {
        let shift = origin_right + Vec2::new(kern, 0.0);
        let placed_right: Vec<Outline> = right.iter().map(|o| o.translated(shift)).collect();
        let distance = min_distance(&placed_left, &placed_right)
            .ok_or_else(|| GlyphtoolsError::MissingGeometry("glyph pair".into()))?;
        rounds += 1;
        log::debug!("kern round {rounds}: kern={kern:.3} distance={distance:.3}");

        if let Some((best_distance, best_kern)) = best {
            if distance >= best_distance {
                kern = best_kern;
                break StopReason::Stalled;
            }
        }
        best = Some((distance, kern));

        if (distance - target).abs() < TOLERANCE {
            break StopReason::Converged;
        }
        if iterations > MAX_ITERATIONS {
            break StopReason::IterationCap;
        }
        iterations += 1;
        kern += target - distance;
    };

    let distance = best.map_or(f64::INFINITY, |(d, _)| d);
    let clamped = kern.max(params.kern_floor(width_left));
    log::debug!(
        "kern search stopped ({stop:?}) after {rounds} rounds: {kern:.3} -> {clamped:.3}"
    );

    Ok(KernSolution {
        kern: clamped.trunc() as i32,
        unclamped: kern,
        distance,
        rounds,
        stop,
    })
}

/// Resolve a named pair through a font source and solve it.
pub fn determine_kern<S: FontSource + ?Sized>(source: &S, query: &KerningQuery) -> Result<i32> {
    determine_kern_detailed(source, query).map(|solution| solution.kern)
}

/// Like [`determine_kern`], but reports how the search went.
pub fn determine_kern_detailed<S: FontSource + ?Sized>(
    source: &S,
    query: &KerningQuery,
) -> Result<KernSolution> {
    let left = source.outlines(&query.left)?;
    if left.iter().all(Outline::is_empty) {
        return Err(GlyphtoolsError::MissingGeometry(query.left.clone()));
    }
    let right = source.outlines(&query.right)?;
    if right.iter().all(Outline::is_empty) {
        return Err(GlyphtoolsError::MissingGeometry(query.right.clone()));
    }
    let width = source.metrics(&query.left)?.width;

    log::debug!(
        "kerning {}/{} in {} font, target {}",
        query.left,
        query.right,
        source.format_name(),
        query.params.target_distance
    );
    solve_detailed(&left, &right, width, &query.params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rect_outline;

    fn square(x0: f64, x1: f64) -> Vec<Outline> {
        vec![rect_outline(x0, 0.0, x1, 100.0)]
    }

    // A zero-sized contour: every sample sits on the origin
    fn dot() -> Vec<Outline> {
        vec![rect_outline(0.0, 0.0, 0.0, 0.0)]
    }

    #[test]
    fn test_converges_on_target_distance() {
        let params = KernParams::new(20.0);
        let solution = solve_detailed(&square(0.0, 100.0), &square(50.0, 150.0), 100.0, &params)
            .unwrap();

        assert_eq!(solution.stop, StopReason::Converged);
        assert_eq!(solution.kern, -30);
        assert_eq!(solution.rounds, 2);
        assert!((solution.distance - 20.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_stall_keeps_best_kern_then_clamps() {
        // Asking for overlap: the search pulls the squares on top of each
        // other, stops improving, and falls back to the best kern it saw.
        let params = KernParams::new(-50.0);
        let solution = solve_detailed(&square(0.0, 100.0), &square(50.0, 150.0), 100.0, &params)
            .unwrap();

        assert_eq!(solution.stop, StopReason::Stalled);
        assert_eq!(solution.unclamped, -100.0);
        assert_eq!(solution.kern, -40);
    }

    #[test]
    fn test_unset_tuck_bounds_by_full_width() {
        let params = KernParams::new(-50.0).with_max_tuck(None);
        let kern = solve(&square(0.0, 100.0), &square(50.0, 150.0), 100.0, &params).unwrap();
        assert_eq!(kern, -100);

        let zero_tuck = KernParams::new(-50.0).with_max_tuck(Some(0.0));
        let kern = solve(&square(0.0, 100.0), &square(50.0, 150.0), 100.0, &zero_tuck).unwrap();
        assert_eq!(kern, -100);
    }

    #[test]
    fn test_touching_identical_glyphs_need_no_kern() {
        let params = KernParams::new(0.0);
        let solution =
            solve_detailed(&square(0.0, 100.0), &square(0.0, 100.0), 100.0, &params).unwrap();
        assert_eq!(solution.stop, StopReason::Converged);
        assert_eq!(solution.kern, 0);
    }

    #[test]
    fn test_unit_squares_respect_tuck_limit() {
        let unit = vec![rect_outline(0.0, 0.0, 1.0, 1.0)];
        let params = KernParams::new(50.0).with_max_tuck(Some(0.4));
        let solution = solve_detailed(&unit, &unit, 100.0, &params).unwrap();

        // The search wants -49, the tuck limit says -40
        assert_eq!(solution.unclamped, -49.0);
        assert_eq!(solution.kern, -40);
    }

    #[test]
    fn test_iteration_cap_stops_slow_approach() {
        // Right dot sits 100 units above the left one, so a 98 unit gap is
        // unreachable; every round gets closer, none gets there.
        let params = KernParams::new(98.0)
            .with_offsets(Vec2::ZERO, Vec2::new(0.0, 100.0))
            .with_max_tuck(Some(1.0));
        let solution = solve_detailed(&dot(), &dot(), 200.0, &params).unwrap();

        assert_eq!(solution.stop, StopReason::IterationCap);
        assert_eq!(solution.rounds, MAX_ITERATIONS + 2);
        assert_eq!(solution.kern, -196);
    }

    #[test]
    fn test_offsets_move_the_pair() {
        let params = KernParams::new(20.0).with_offsets(Vec2::new(10.0, 0.0), Vec2::ZERO);
        let kern = solve(&square(0.0, 100.0), &square(50.0, 150.0), 100.0, &params).unwrap();
        assert_eq!(kern, -20);
    }

    #[test]
    fn test_no_geometry_is_an_error() {
        let params = KernParams::default();
        let err = solve(&[], &square(0.0, 10.0), 100.0, &params).unwrap_err();
        assert!(matches!(err, GlyphtoolsError::MissingGeometry(_)));

        let err = solve(&square(0.0, 10.0), &[Outline::default()], 100.0, &params).unwrap_err();
        assert!(matches!(err, GlyphtoolsError::MissingGeometry(_)));
    }

    #[test]
    fn test_kern_floor() {
        assert_eq!(KernParams::default().kern_floor(500.0), -200.0);
        assert_eq!(
            KernParams::default().with_max_tuck(None).kern_floor(500.0),
            -500.0
        );
    }
}
