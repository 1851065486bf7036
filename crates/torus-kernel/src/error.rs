use thiserror::Error;

use crate::geometry::point::Point3d;

/// Failures reported by the torus/line intersection entry points.
///
/// A query that simply misses the torus is not an error: absent intersections
/// are reported through NaN slots.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntersectionError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Intersection {slot} at {point} does not lie on the query line")]
    NotOnLine { slot: usize, point: Point3d },

    #[error("Intersection {slot} at {point} does not lie on the torus (residual: {residual:e})")]
    NotOnTorus {
        slot: usize,
        point: Point3d,
        residual: f64,
    },
}

impl IntersectionError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// True for the post-hoc geometric checks (on-line / on-torus).
    pub fn is_numeric_validation(&self) -> bool {
        matches!(self, Self::NotOnLine { .. } | Self::NotOnTorus { .. })
    }
}
