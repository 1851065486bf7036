//! Tunable parameters for the spiric sweep and the final geometric checks.

use serde::{Deserialize, Serialize};

use crate::error::IntersectionError;

/// Fewest sample lines per pass for which adjacent crossings stay separated.
pub const MIN_SAMPLES_PER_PASS: usize = 10;

/// Parameters of the sweep-line classifier and the bisection refiner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Number of horizontal sample lines per classifier pass.
    pub samples_per_pass: usize,
    /// Bisection stops once the bracket is narrower than this.
    pub convergence_tolerance: f64,
    /// Hard cap on refinement passes for a single crossing.
    pub max_iterations: usize,
    /// The coarse pass scans `[-tube_radius - margin, tube_radius + margin]`.
    pub range_margin: f64,
    /// Tolerance for the `|y| == tube_radius` boundary rule.
    pub boundary_tolerance: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            samples_per_pass: 100,
            convergence_tolerance: 1e-12,
            max_iterations: 10_000,
            range_margin: 1.0,
            boundary_tolerance: 1e-12,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<(), IntersectionError> {
        if self.samples_per_pass < MIN_SAMPLES_PER_PASS {
            return Err(IntersectionError::invalid_input(format!(
                "samples_per_pass must be at least {MIN_SAMPLES_PER_PASS}, got {}",
                self.samples_per_pass
            )));
        }
        if self.convergence_tolerance.is_nan() || self.convergence_tolerance <= 0.0 {
            return Err(IntersectionError::invalid_input(
                "convergence_tolerance must be strictly positive",
            ));
        }
        if self.max_iterations == 0 {
            return Err(IntersectionError::invalid_input("max_iterations must be non-zero"));
        }
        if self.range_margin.is_nan()
            || self.range_margin < 0.0
            || self.boundary_tolerance.is_nan()
            || self.boundary_tolerance < 0.0
        {
            return Err(IntersectionError::invalid_input(
                "range_margin and boundary_tolerance must be non-negative",
            ));
        }
        Ok(())
    }
}

/// Thresholds used by the 3D entry point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationTolerance {
    /// Maximum |Δz| between the line endpoints.
    pub perpendicular: f64,
    /// Angular tolerance (radians) for the collinearity check.
    pub on_line: f64,
    /// Maximum absolute residual of the torus implicit equation.
    pub on_torus: f64,
}

impl Default for ValidationTolerance {
    fn default() -> Self {
        Self {
            perpendicular: 1e-8,
            on_line: 1e-6,
            on_torus: 1e-8,
        }
    }
}
