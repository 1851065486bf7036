use serde::{Deserialize, Serialize};

use super::point::{Point2d, Point3d};
use crate::error::IntersectionError;

/// Topology of a torus, decided by the tube radius relative to the trajectory radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TorusKind {
    /// `tube_radius < radius`: the tube does not touch the axis.
    Ring,
    /// `tube_radius == radius`: the tube touches the axis at the origin.
    Horn,
    /// `tube_radius > radius`: self-intersecting.
    Spindle,
}

/// A torus in its own frame: centered at the origin, axis along Y.
///
/// Implicit equation: `4R²(x² + z²) = (x² + y² + z² + R² - r²)²`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Torus {
    /// Radius of the circle traced by the tube center.
    pub radius: f64,
    /// Radius of the generator circle.
    pub tube_radius: f64,
}

impl Torus {
    pub fn new(radius: f64, tube_radius: f64) -> Result<Self, IntersectionError> {
        check_radius("radius", radius)?;
        check_radius("tube_radius", tube_radius)?;
        Ok(Self {
            radius,
            tube_radius,
        })
    }

    pub fn kind(&self) -> TorusKind {
        torus_kind(self.radius, self.tube_radius)
    }

    /// Evaluate at (u = angle around the axis, v = angle around the tube).
    pub fn evaluate(&self, u: f64, v: f64) -> Point3d {
        let rho = self.radius + self.tube_radius * v.cos();
        Point3d::new(rho * u.cos(), self.tube_radius * v.sin(), rho * u.sin())
    }

    /// Residual of the implicit equation; zero on the surface.
    pub fn implicit_value(&self, p: &Point3d) -> f64 {
        let r2 = self.radius * self.radius;
        let radial2 = p.x * p.x + p.z * p.z;
        let s = radial2 + p.y * p.y + r2 - self.tube_radius * self.tube_radius;
        4.0 * r2 * radial2 - s * s
    }

    /// NaN points are vacuously on the torus.
    pub fn contains_point(&self, p: &Point3d, tolerance: f64) -> bool {
        if p.contains_nan() {
            return true;
        }
        self.implicit_value(p).abs() <= tolerance
    }

    /// The spiric section cut by the plane `z = plane_distance`.
    pub fn section(&self, plane_distance: f64) -> Result<SpiricSection, IntersectionError> {
        SpiricSection::new(self.radius, self.tube_radius, plane_distance)
    }
}

/// Planar quartic obtained by slicing a torus with a plane parallel to its axis,
/// at `plane_distance` from that axis.
///
/// In plane coordinates (x, y), with `d = plane_distance`:
/// `(x² + y² + d² + R² - r²)² = 4R²(x² + d²)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpiricSection {
    pub radius: f64,
    pub tube_radius: f64,
    pub plane_distance: f64,
}

impl SpiricSection {
    /// Only `plane_distance²` enters the curve, so a negative distance
    /// describes the mirrored plane and is accepted.
    pub fn new(radius: f64, tube_radius: f64, plane_distance: f64) -> Result<Self, IntersectionError> {
        check_radius("radius", radius)?;
        check_radius("tube_radius", tube_radius)?;
        if !plane_distance.is_finite() {
            return Err(IntersectionError::invalid_input(format!(
                "plane_distance must be finite, got {plane_distance}"
            )));
        }
        Ok(Self {
            radius,
            tube_radius,
            plane_distance,
        })
    }

    pub fn kind(&self) -> TorusKind {
        torus_kind(self.radius, self.tube_radius)
    }

    pub fn is_spindle(&self) -> bool {
        self.kind() == TorusKind::Spindle
    }

    pub fn implicit_value(&self, p: &Point2d) -> f64 {
        let r2 = self.radius * self.radius;
        let d2 = self.plane_distance * self.plane_distance;
        let s = p.x * p.x + p.y * p.y + d2 + r2 - self.tube_radius * self.tube_radius;
        s * s - 4.0 * r2 * (p.x * p.x + d2)
    }

    /// Y interval swept by the coarse pass.
    pub fn scan_range(&self, margin: f64) -> (f64, f64) {
        (-self.tube_radius - margin, self.tube_radius + margin)
    }
}

fn torus_kind(radius: f64, tube_radius: f64) -> TorusKind {
    if tube_radius > radius {
        TorusKind::Spindle
    } else if tube_radius < radius {
        TorusKind::Ring
    } else {
        TorusKind::Horn
    }
}

fn check_radius(name: &str, value: f64) -> Result<(), IntersectionError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(IntersectionError::invalid_input(format!(
            "{name} must be finite and non-negative, got {value}"
        )))
    }
}

/// Whether `point` satisfies the torus equation within `tolerance`.
/// NaN points are vacuously on the torus.
pub fn is_point_on_torus(radius: f64, tube_radius: f64, point: &Point3d, tolerance: f64) -> bool {
    Torus {
        radius,
        tube_radius,
    }
    .contains_point(point, tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_torus_on_surface() {
        let t = Torus::new(10.0, 3.0).unwrap();
        for i in 0..12 {
            for j in 0..12 {
                let u = 2.0 * PI * (i as f64 / 12.0);
                let v = 2.0 * PI * (j as f64 / 12.0);
                let p = t.evaluate(u, v);
                let rel = t.implicit_value(&p).abs() / 1e4;
                assert!(rel < 1e-10, "residual {} at u={}, v={}", rel, u, v);
            }
        }
    }

    #[test]
    fn test_torus_axis_is_y() {
        let t = Torus::new(2.0, 1.0).unwrap();
        assert!(t.contains_point(&Point3d::new(3.0, 0.0, 0.0), 1e-12));
        assert!(t.contains_point(&Point3d::new(0.0, 0.0, -1.0), 1e-12));
        assert!(t.contains_point(&Point3d::new(2.0, 1.0, 0.0), 1e-12));
        assert!(!t.contains_point(&Point3d::new(0.0, 3.0, 0.0), 1e-8));
    }

    #[test]
    fn test_nan_point_vacuously_on_torus() {
        assert!(is_point_on_torus(2.0, 1.0, &Point3d::NAN, 1e-8));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Torus::new(2.0, 1.0).unwrap().kind(), TorusKind::Ring);
        assert_eq!(Torus::new(1.0, 1.0).unwrap().kind(), TorusKind::Horn);
        assert_eq!(Torus::new(1.0, 2.0).unwrap().kind(), TorusKind::Spindle);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(Torus::new(-1.0, 1.0).is_err());
        assert!(Torus::new(1.0, f64::NAN).is_err());
        assert!(SpiricSection::new(2.0, 1.0, f64::INFINITY).is_err());
        assert!(SpiricSection::new(2.0, 1.0, -0.5).is_ok());
    }

    #[test]
    fn test_section_matches_torus() {
        let t = Torus::new(2.0, 0.75).unwrap();
        let section = t.section(0.4).unwrap();
        for (x, y) in [(1.0, 0.3), (-2.4, 0.1), (0.0, 0.0), (2.6, -0.5)] {
            let planar = section.implicit_value(&Point2d::new(x, y));
            let spatial = t.implicit_value(&Point3d::new(x, y, 0.4));
            assert!((planar + spatial).abs() < 1e-12, "({x}, {y}): {planar} vs {spatial}");
        }
    }
}
