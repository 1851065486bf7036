//! Sweep-line classification of a query line against a spiric section.
//!
//! Each horizontal sample line meets the spiric in up to four points and the
//! query line in one. Ordering those five abscissas tells whether the query
//! line is inside or outside the spiric at that height; a change of label
//! between two neighbouring samples brackets a crossing.

use std::cmp::Ordering;

use tracing::trace;

use super::quartic::Biquadratic;
use crate::config::SweepConfig;
use crate::error::IntersectionError;
use crate::geometry::line::Line2d;
use crate::geometry::torus::SpiricSection;

/// Four spiric roots plus one query-line crossing.
pub const ABSCISSAS_PER_SAMPLE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbscissaOrigin {
    SpiricRoot,
    LineRoot,
}

/// Where the query line sits relative to the spiric at one sample height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePosition {
    Inside,
    Outside,
}

#[derive(Debug, Clone, Copy)]
pub struct TaggedAbscissa {
    pub x: f64,
    pub origin: AbscissaOrigin,
}

impl TaggedAbscissa {
    pub fn spiric(x: f64) -> Self {
        Self {
            x,
            origin: AbscissaOrigin::SpiricRoot,
        }
    }

    pub fn line(x: f64) -> Self {
        Self {
            x,
            origin: AbscissaOrigin::LineRoot,
        }
    }
}

/// One horizontal sample line: its height, the sorted abscissas, and the label.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationSample {
    pub y: f64,
    pub abscissas: [TaggedAbscissa; ABSCISSAS_PER_SAMPLE],
    pub position: LinePosition,
}

impl ClassificationSample {
    pub fn new(section: &SpiricSection, line: &Line2d, y: f64, boundary_tolerance: f64) -> Self {
        let roots = Biquadratic::from_spiric(section, y).roots();
        let crossing = line.intersect_horizontal(y);

        let mut abscissas = [
            TaggedAbscissa::spiric(roots.x[0]),
            TaggedAbscissa::spiric(roots.x[1]),
            TaggedAbscissa::spiric(roots.x[2]),
            TaggedAbscissa::spiric(roots.x[3]),
            TaggedAbscissa::line(crossing.x),
        ];
        sort_abscissas(&mut abscissas);
        let position = classify(&abscissas, y, section, boundary_tolerance);

        Self {
            y,
            abscissas,
            position,
        }
    }

    /// Number of non-NaN abscissas.
    pub fn valid_count(&self) -> usize {
        valid_count(&self.abscissas)
    }

    /// Rank of the query-line crossing among the valid abscissas.
    pub fn line_index(&self) -> Option<usize> {
        line_index(&self.abscissas)
    }
}

/// Stable ascending sort; NaN entries trail. Tags travel with their values.
pub fn sort_abscissas(abscissas: &mut [TaggedAbscissa; ABSCISSAS_PER_SAMPLE]) {
    abscissas.sort_by(|a, b| match (a.x.is_nan(), b.x.is_nan()) {
        (false, false) => a.x.total_cmp(&b.x),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    });
}

fn valid_count(abscissas: &[TaggedAbscissa]) -> usize {
    abscissas.iter().take_while(|a| !a.x.is_nan()).count()
}

fn line_index(abscissas: &[TaggedAbscissa]) -> Option<usize> {
    let count = valid_count(abscissas);
    abscissas[..count]
        .iter()
        .position(|a| a.origin == AbscissaOrigin::LineRoot)
}

/// Label a sorted sample.
///
/// With `k` valid abscissas and the line crossing at rank `i`:
///
/// | k | rule |
/// |---|------|
/// | 1, 2 | outside |
/// | 3 | outside at 0 or 2; at 1 inside, unless on the top/bottom of the tube |
/// | 4 | outside at 0 or 3, inside otherwise |
/// | 5 | outside at 0 or 4, inside at 1 or 3; at 2 see below |
///
/// With five abscissas the middle gap is the inner lemon of a spindle torus
/// while `y² < r² - R²`, and the hole between the two lobes otherwise. Only
/// the lemon counts as inside.
pub fn classify(
    abscissas: &[TaggedAbscissa; ABSCISSAS_PER_SAMPLE],
    y: f64,
    section: &SpiricSection,
    boundary_tolerance: f64,
) -> LinePosition {
    use LinePosition::{Inside, Outside};

    let Some(line) = line_index(abscissas) else {
        return Outside;
    };

    match (valid_count(abscissas), line) {
        (3, 1) => {
            // At y = ±r both roots are tangency points of the tube top (or bottom).
            if (y.abs() - section.tube_radius).abs() <= boundary_tolerance {
                Outside
            } else {
                Inside
            }
        }
        (4, 1 | 2) => Inside,
        (5, 1 | 3) => Inside,
        (5, 2) => {
            let r2 = section.tube_radius * section.tube_radius;
            let big_r2 = section.radius * section.radius;
            if section.is_spindle() && y * y < r2 - big_r2 {
                Inside
            } else {
                Outside
            }
        }
        _ => Outside,
    }
}

/// Reject inputs the sweep cannot handle: a query line parallel to the sweep
/// lines, or an unusable configuration.
pub fn check_sweep_inputs(line: &Line2d, config: &SweepConfig) -> Result<(), IntersectionError> {
    if line.is_horizontal() {
        return Err(IntersectionError::invalid_input(format!(
            "query line {} -> {} is parallel to the X axis",
            line.start, line.end
        )));
    }
    config.validate()
}

/// Classify `config.samples_per_pass` evenly spaced horizontal lines over
/// `[min_y, max_y]` into `samples` (cleared first). The first and last
/// samples sit exactly on `min_y` and `max_y`.
pub fn sweep(
    section: &SpiricSection,
    line: &Line2d,
    min_y: f64,
    max_y: f64,
    config: &SweepConfig,
    samples: &mut Vec<ClassificationSample>,
) -> Result<(), IntersectionError> {
    check_sweep_inputs(line, config)?;
    sample_range(section, line, min_y, max_y, config, samples);
    Ok(())
}

/// [`sweep`] for inputs that already passed [`check_sweep_inputs`].
pub(crate) fn sample_range(
    section: &SpiricSection,
    line: &Line2d,
    min_y: f64,
    max_y: f64,
    config: &SweepConfig,
    samples: &mut Vec<ClassificationSample>,
) {
    let n = config.samples_per_pass;
    let step = (max_y - min_y) / (n - 1) as f64;

    samples.clear();
    for i in 0..n {
        let y = if i == n - 1 {
            max_y
        } else {
            step * i as f64 + min_y
        };
        samples.push(ClassificationSample::new(
            section,
            line,
            y,
            config.boundary_tolerance,
        ));
    }

    trace!(min_y, max_y, samples = n, "sweep pass complete");
}

/// Indices `i` where the label of sample `i` differs from sample `i + 1`.
pub fn flip_indices(samples: &[ClassificationSample]) -> impl Iterator<Item = usize> + '_ {
    samples
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0].position != pair[1].position)
        .map(|(i, _)| i)
}
