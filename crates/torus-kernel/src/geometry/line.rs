use serde::{Deserialize, Serialize};

use super::point::{Point2d, Point3d};
use super::vector::{Vec2, Vec3};
use crate::error::IntersectionError;

/// An infinite line in the plane, defined by two distinct points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line2d {
    pub start: Point2d,
    pub end: Point2d,
}

impl Line2d {
    pub fn new(start: Point2d, end: Point2d) -> Result<Self, IntersectionError> {
        if start.contains_nan() || end.contains_nan() {
            return Err(IntersectionError::invalid_input("line endpoints must not be NaN"));
        }
        if start == end {
            return Err(IntersectionError::invalid_input(format!(
                "line endpoints coincide at {start}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn direction(&self) -> Vec2 {
        self.end - self.start
    }

    /// Both endpoints share Y: the line is parallel to the sweep direction.
    pub fn is_horizontal(&self) -> bool {
        self.start.y == self.end.y
    }

    pub fn is_vertical(&self) -> bool {
        self.start.x == self.end.x
    }

    pub fn point_at(&self, t: f64) -> Point2d {
        self.start + self.direction() * t
    }

    /// Solve the line equation for X at the given Y.
    ///
    /// Vertical lines return their constant X; horizontal lines have no
    /// unique answer and return NaN.
    pub fn x_at(&self, y: f64) -> f64 {
        if self.is_vertical() {
            return self.start.x;
        }
        if self.is_horizontal() {
            return f64::NAN;
        }
        let d = self.direction();
        self.start.x + (y - self.start.y) * d.x / d.y
    }

    /// Intersection with the horizontal line at height `y`.
    /// NaN when this line is itself horizontal.
    pub fn intersect_horizontal(&self, y: f64) -> Point2d {
        let x = self.x_at(y);
        if x.is_nan() {
            Point2d::NAN
        } else {
            Point2d::new(x, y)
        }
    }

    /// Signed distance scaled by the direction length; zero on the line.
    pub fn side_of(&self, p: &Point2d) -> f64 {
        self.direction().cross(&(*p - self.start))
    }
}

/// An infinite line in 3D, defined by two distinct points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line3d {
    pub start: Point3d,
    pub end: Point3d,
}

impl Line3d {
    pub fn new(start: Point3d, end: Point3d) -> Result<Self, IntersectionError> {
        if start.contains_nan() || end.contains_nan() {
            return Err(IntersectionError::invalid_input("line endpoints must not be NaN"));
        }
        if start == end {
            return Err(IntersectionError::invalid_input(format!(
                "line endpoints coincide at {start}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn direction(&self) -> Vec3 {
        self.end - self.start
    }

    pub fn point_at(&self, t: f64) -> Point3d {
        self.start + self.direction() * t
    }

    /// Collinearity test: `end - start` and `point - start` must be parallel
    /// within `angular_tol` radians.
    ///
    /// NaN points are vacuously on the line, as is the start point itself.
    pub fn contains_point(&self, point: &Point3d, angular_tol: f64) -> bool {
        if point.contains_nan() {
            return true;
        }
        let offset = *point - self.start;
        if offset.length() < 1e-15 {
            return true;
        }
        self.direction().is_parallel_to(&offset, angular_tol)
    }
}
