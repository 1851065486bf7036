//! Iterative refinement of a bracketed crossing.
//!
//! A bracket `[min_y, max_y]` between two samples with different labels is
//! re-swept with the same sample count; the finer flip becomes the new
//! bracket. The loop stops once the bracket is narrower than the convergence
//! tolerance or after `max_iterations` passes.

use tracing::{debug, warn};

use super::sweep::{check_sweep_inputs, flip_indices, sample_range, ClassificationSample};
use crate::config::SweepConfig;
use crate::error::IntersectionError;
use crate::geometry::line::Line2d;
use crate::geometry::point::Point2d;
use crate::geometry::torus::SpiricSection;

/// Y interval known to contain a label change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub min_y: f64,
    pub max_y: f64,
}

impl Bracket {
    pub fn new(min_y: f64, max_y: f64) -> Self {
        Self { min_y, max_y }
    }

    /// The bracket between sample `index` and the next one, if both exist.
    pub fn between(samples: &[ClassificationSample], index: usize) -> Option<Self> {
        let lower = samples.get(index)?;
        let upper = samples.get(index.checked_add(1)?)?;
        Some(Self::new(lower.y, upper.y))
    }

    pub fn width(&self) -> f64 {
        (self.max_y - self.min_y).abs()
    }

    pub fn midpoint(&self) -> f64 {
        (self.min_y + self.max_y) / 2.0
    }
}

/// Outcome of refining one bracket.
#[derive(Debug, Clone, Copy)]
pub struct RefinedCrossing {
    /// Point on the query line at the converged ordinate.
    pub point: Point2d,
    /// Number of sweep passes spent.
    pub iterations: usize,
    /// Width of the final bracket.
    pub bracket_width: f64,
    /// Whether the width dropped below the convergence tolerance.
    pub converged: bool,
}

/// Refine `bracket` down to a single crossing of `line` with the spiric.
///
/// `buffer` is reused by every pass. Running out of iterations is not an
/// error: the midpoint of the best bracket is returned.
pub fn refine(
    section: &SpiricSection,
    line: &Line2d,
    bracket: Bracket,
    config: &SweepConfig,
    buffer: &mut Vec<ClassificationSample>,
) -> Result<RefinedCrossing, IntersectionError> {
    refine_with_trace(section, line, bracket, config, buffer, |_| {})
}

/// Same as [`refine`], reporting the bracket width after every pass.
pub fn refine_with_trace(
    section: &SpiricSection,
    line: &Line2d,
    bracket: Bracket,
    config: &SweepConfig,
    buffer: &mut Vec<ClassificationSample>,
    on_pass: impl FnMut(f64),
) -> Result<RefinedCrossing, IntersectionError> {
    check_sweep_inputs(line, config)?;
    Ok(refine_bracket(section, line, bracket, config, buffer, on_pass))
}

/// Refinement loop for inputs that already passed [`check_sweep_inputs`].
pub(crate) fn refine_bracket(
    section: &SpiricSection,
    line: &Line2d,
    bracket: Bracket,
    config: &SweepConfig,
    buffer: &mut Vec<ClassificationSample>,
    mut on_pass: impl FnMut(f64),
) -> RefinedCrossing {
    let mut current = bracket;
    let mut iterations = 0;

    while current.width() >= config.convergence_tolerance && iterations < config.max_iterations {
        iterations += 1;
        sample_range(section, line, current.min_y, current.max_y, config, buffer);
        let samples: &[ClassificationSample] = buffer;

        match flip_indices(samples)
            .next()
            .and_then(|index| Bracket::between(samples, index))
        {
            Some(finer) => {
                current = finer;
                on_pass(current.width());
            }
            None => {
                // Re-sweeping an unchanged bracket is deterministic; it would never recover.
                warn!(
                    min_y = current.min_y,
                    max_y = current.max_y,
                    iterations,
                    "bracket lost its label change, keeping current midpoint"
                );
                break;
            }
        }
    }

    let converged = current.width() < config.convergence_tolerance;
    if !converged && iterations >= config.max_iterations {
        warn!(
            iterations,
            width = current.width(),
            "bisection hit the iteration cap before converging"
        );
    }

    let y = current.midpoint();
    let point = Point2d::new(line.x_at(y), y);
    debug!(x = point.x, y = point.y, iterations, width = current.width(), "crossing refined");

    RefinedCrossing {
        point,
        iterations,
        bracket_width: current.width(),
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spiric::sweep::LinePosition;

    fn ring() -> SpiricSection {
        SpiricSection::new(2.0, 1.0, 0.0).unwrap()
    }

    fn vertical_through_tube() -> Line2d {
        Line2d::new(Point2d::new(2.0, -5.0), Point2d::new(2.0, 5.0)).unwrap()
    }

    #[test]
    fn test_refine_top_of_tube() {
        let config = SweepConfig::default();
        let mut buffer = Vec::new();
        let crossing = refine(
            &ring(),
            &vertical_through_tube(),
            Bracket::new(0.9, 1.1),
            &config,
            &mut buffer,
        )
        .unwrap();

        assert!(crossing.converged);
        assert!(crossing.bracket_width < 1e-12);
        assert!(crossing.iterations > 1 && crossing.iterations < 20);
        assert!((crossing.point.x - 2.0).abs() < 1e-15);
        assert!((crossing.point.y - 1.0).abs() < 1e-11, "y={}", crossing.point.y);
    }

    #[test]
    fn test_bracket_width_is_monotone() {
        let line = Line2d::new(Point2d::new(0.0, -2.0), Point2d::new(4.0, 2.0)).unwrap();
        let config = SweepConfig::default();
        let mut buffer = Vec::new();
        let mut widths = vec![0.2];
        let crossing = refine_with_trace(
            &ring(),
            &line,
            Bracket::new(0.6, 0.8),
            &config,
            &mut buffer,
            |w| widths.push(w),
        )
        .unwrap();

        assert_eq!(widths.len(), crossing.iterations + 1);
        for pair in widths.windows(2) {
            assert!(pair[1] <= pair[0], "width grew: {} -> {}", pair[0], pair[1]);
        }
        assert!(*widths.last().unwrap() < 1e-12);

        // The line y = x - 2 leaves the right-hand circle at y = 1/√2.
        let expected = std::f64::consts::FRAC_1_SQRT_2;
        assert!((crossing.point.y - expected).abs() < 1e-11);
        assert!((crossing.point.x - (expected + 2.0)).abs() < 1e-11);
    }

    #[test]
    fn test_iteration_cap_is_not_an_error() {
        let config = SweepConfig {
            max_iterations: 1,
            ..SweepConfig::default()
        };
        let mut buffer = Vec::new();
        let crossing = refine(
            &ring(),
            &vertical_through_tube(),
            Bracket::new(0.9, 1.1),
            &config,
            &mut buffer,
        )
        .unwrap();

        assert_eq!(crossing.iterations, 1);
        assert!(!crossing.converged);
        assert!(crossing.bracket_width <= 0.2 / 99.0 + 1e-15);
        assert!((crossing.point.y - 1.0).abs() < 0.2 / 99.0);
    }

    #[test]
    fn test_between_needs_two_samples() {
        let line = vertical_through_tube();
        let mut samples = Vec::new();
        sample_range(&ring(), &line, -2.0, 2.0, &SweepConfig::default(), &mut samples);
        let last = samples.len() - 1;

        let bracket = Bracket::between(&samples, last - 1).unwrap();
        assert_eq!(bracket.max_y, 2.0);
        assert!(Bracket::between(&samples, last).is_none());
        assert!(Bracket::between(&samples, usize::MAX).is_none());
        assert!(Bracket::between(&[], 0).is_none());
    }

    #[test]
    fn test_refine_rejects_horizontal_line() {
        let line = Line2d::new(Point2d::new(-5.0, 0.5), Point2d::new(5.0, 0.5)).unwrap();
        let mut buffer = Vec::new();
        let result = refine(
            &ring(),
            &line,
            Bracket::new(0.0, 1.0),
            &SweepConfig::default(),
            &mut buffer,
        );
        assert!(matches!(result, Err(IntersectionError::InvalidInput { .. })));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_bracket_without_flip_stops_early() {
        let config = SweepConfig::default();
        let mut buffer = Vec::new();
        let crossing = refine(
            &ring(),
            &vertical_through_tube(),
            Bracket::new(-0.5, 0.5),
            &config,
            &mut buffer,
        )
        .unwrap();

        assert_eq!(crossing.iterations, 1);
        assert!(!crossing.converged);
        assert!(buffer.iter().all(|s| s.position == LinePosition::Inside));
        assert!(crossing.point.y.abs() < 1e-15);
    }
}
