//! Entry points: line vs. spiric section (2D) and line vs. torus (3D).
//!
//! Results are written into caller-owned slot arrays in the order the
//! crossings are found (ascending Y of the bracketing samples). Slots without
//! an intersection are set to NaN.

use tracing::{debug, info, instrument, warn};

use crate::config::{SweepConfig, ValidationTolerance};
use crate::error::IntersectionError;
use crate::geometry::line::{Line2d, Line3d};
use crate::geometry::point::{Point2d, Point3d};
use crate::geometry::torus::{SpiricSection, Torus};
use crate::spiric::bisection::{refine_bracket, Bracket};
use crate::spiric::sweep::{check_sweep_inputs, flip_indices, sample_range};

/// Maximum number of intersections between a line and a torus.
pub const MAX_INTERSECTIONS: usize = 4;

/// Intersect the line through `start` and `end` with a spiric section,
/// using the default [`SweepConfig`].
///
/// Returns the number of intersections written to `slots`.
pub fn intersect_spiric_and_line_2d(
    section: &SpiricSection,
    start: Point2d,
    end: Point2d,
    slots: &mut [Point2d; MAX_INTERSECTIONS],
) -> Result<usize, IntersectionError> {
    intersect_spiric_and_line_2d_with(section, start, end, &SweepConfig::default(), slots)
}

#[instrument(
    level = "debug",
    skip_all,
    fields(
        radius = section.radius,
        tube_radius = section.tube_radius,
        plane_distance = section.plane_distance,
    )
)]
pub fn intersect_spiric_and_line_2d_with(
    section: &SpiricSection,
    start: Point2d,
    end: Point2d,
    config: &SweepConfig,
    slots: &mut [Point2d; MAX_INTERSECTIONS],
) -> Result<usize, IntersectionError> {
    let line = Line2d::new(start, end)?;
    check_sweep_inputs(&line, config)?;

    let (min_y, max_y) = section.scan_range(config.range_margin);
    let mut coarse = Vec::with_capacity(config.samples_per_pass);
    sample_range(section, &line, min_y, max_y, config, &mut coarse);

    let mut buffer = Vec::with_capacity(config.samples_per_pass);
    let crossings: Vec<Point2d> = flip_indices(&coarse)
        .filter_map(|index| Bracket::between(&coarse, index))
        .map(|bracket| {
            debug!(min_y = bracket.min_y, max_y = bracket.max_y, "label change detected");
            refine_bracket(section, &line, bracket, config, &mut buffer, |_| {}).point
        })
        .collect();

    let found = pack_slots(&crossings, slots);
    debug!(count = found, "planar intersections");
    Ok(found)
}

/// Copy the first crossings into `slots` and NaN-fill the rest.
/// Returns the number of slots filled.
fn pack_slots(crossings: &[Point2d], slots: &mut [Point2d; MAX_INTERSECTIONS]) -> usize {
    for slot in slots.iter_mut() {
        slot.set_to_nan();
    }
    for (slot, crossing) in slots.iter_mut().zip(crossings) {
        *slot = *crossing;
    }

    let dropped = crossings.len().saturating_sub(MAX_INTERSECTIONS);
    if dropped > 0 {
        warn!(dropped, "more label changes than intersection slots, extra crossings dropped");
    }
    crossings.len().min(MAX_INTERSECTIONS)
}

/// Intersect the line through `start` and `end` with a torus in its own
/// frame (axis along Y), using default configuration and tolerances.
///
/// The line must be perpendicular to the torus axis, i.e. have a constant Z.
pub fn intersect_torus_and_line_3d(
    torus: &Torus,
    start: Point3d,
    end: Point3d,
    slots: &mut [Point3d; MAX_INTERSECTIONS],
) -> Result<usize, IntersectionError> {
    intersect_torus_and_line_3d_with(
        torus,
        start,
        end,
        &SweepConfig::default(),
        &ValidationTolerance::default(),
        slots,
    )
}

#[instrument(
    skip_all,
    fields(radius = torus.radius, tube_radius = torus.tube_radius, z = start.z)
)]
pub fn intersect_torus_and_line_3d_with(
    torus: &Torus,
    start: Point3d,
    end: Point3d,
    config: &SweepConfig,
    tolerance: &ValidationTolerance,
    slots: &mut [Point3d; MAX_INTERSECTIONS],
) -> Result<usize, IntersectionError> {
    let line = Line3d::new(start, end)?;
    if (start.z - end.z).abs() > tolerance.perpendicular {
        return Err(IntersectionError::invalid_input(format!(
            "line {start} -> {end} is not perpendicular to the torus axis (|dz| = {})",
            (start.z - end.z).abs()
        )));
    }

    let plane_distance = start.z;
    let section = torus.section(plane_distance)?;

    let mut planar = [Point2d::NAN; MAX_INTERSECTIONS];
    let count =
        intersect_spiric_and_line_2d_with(&section, start.xy(), end.xy(), config, &mut planar)?;

    for (slot, p) in slots.iter_mut().zip(planar.iter()) {
        if p.contains_nan() {
            slot.set_to_nan();
        } else {
            *slot = p.with_z(plane_distance);
        }
    }

    validate_intersections(torus, &line, slots, tolerance)?;

    info!(count, "torus/line intersections");
    Ok(count)
}

/// Every non-NaN slot must lie on the line and on the torus.
fn validate_intersections(
    torus: &Torus,
    line: &Line3d,
    slots: &[Point3d; MAX_INTERSECTIONS],
    tolerance: &ValidationTolerance,
) -> Result<(), IntersectionError> {
    for (slot, point) in slots.iter().enumerate() {
        if !line.contains_point(point, tolerance.on_line) {
            return Err(IntersectionError::NotOnLine {
                slot,
                point: *point,
            });
        }
        if !torus.contains_point(point, tolerance.on_torus) {
            return Err(IntersectionError::NotOnTorus {
                slot,
                point: *point,
                residual: torus.implicit_value(point),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_line_through_ring_tube() {
        let section = SpiricSection::new(2.0, 1.0, 0.0).unwrap();
        let mut slots = [Point2d::ORIGIN; 4];
        let count = intersect_spiric_and_line_2d(
            &section,
            Point2d::new(2.0, -5.0),
            Point2d::new(2.0, 5.0),
            &mut slots,
        )
        .unwrap();

        assert_eq!(count, 2);
        assert!((slots[0].x - 2.0).abs() < 1e-15);
        assert!((slots[0].y + 1.0).abs() < 1e-11);
        assert!((slots[1].x - 2.0).abs() < 1e-15);
        assert!((slots[1].y - 1.0).abs() < 1e-11);
        assert!(slots[2].contains_nan());
        assert!(slots[3].contains_nan());
    }

    #[test]
    fn test_horizontal_line_rejected() {
        let section = SpiricSection::new(2.0, 1.0, 0.0).unwrap();
        let mut slots = [Point2d::NAN; 4];
        let result = intersect_spiric_and_line_2d(
            &section,
            Point2d::new(-5.0, 0.0),
            Point2d::new(5.0, 0.0),
            &mut slots,
        );
        assert!(matches!(result, Err(IntersectionError::InvalidInput { .. })));
    }

    #[test]
    fn test_missing_line_clears_slots() {
        let section = SpiricSection::new(2.0, 1.0, 0.0).unwrap();
        let mut slots = [Point2d::new(7.0, 7.0); 4];
        let count = intersect_spiric_and_line_2d(
            &section,
            Point2d::new(10.0, -1.0),
            Point2d::new(10.0, 1.0),
            &mut slots,
        )
        .unwrap();
        assert_eq!(count, 0);
        assert!(slots.iter().all(|p| p.contains_nan()));
    }

    #[test]
    fn test_pack_slots_drops_extra_crossings() {
        let crossings: Vec<Point2d> = (0..6)
            .map(|i| Point2d::new(i as f64, -1.0 + 0.4 * i as f64))
            .collect();
        let mut slots = [Point2d::NAN; MAX_INTERSECTIONS];

        let count = pack_slots(&crossings, &mut slots);
        assert_eq!(count, MAX_INTERSECTIONS);
        assert_eq!(slots, [crossings[0], crossings[1], crossings[2], crossings[3]]);
    }

    #[test]
    fn test_pack_slots_clears_unused() {
        let mut slots = [Point2d::ORIGIN; MAX_INTERSECTIONS];
        let count = pack_slots(&[Point2d::new(2.0, 0.5)], &mut slots);
        assert_eq!(count, 1);
        assert_eq!(slots[0], Point2d::new(2.0, 0.5));
        assert!(slots[1..].iter().all(|p| p.contains_nan()));
    }

    #[test]
    fn test_spindle_slanted_line_hits_outer_lobe() {
        // Crossings of x = (y + 3) / 6 with (x - 1)² + y² = 4: 37y² - 6y - 135 = 0.
        let section = SpiricSection::new(1.0, 2.0, 0.0).unwrap();
        let mut slots = [Point2d::NAN; 4];
        let count = intersect_spiric_and_line_2d(
            &section,
            Point2d::new(0.0, -3.0),
            Point2d::new(1.0, 3.0),
            &mut slots,
        )
        .unwrap();

        assert_eq!(count, 2);
        let root = 20016f64.sqrt();
        for (p, y) in slots.iter().zip([(6.0 - root) / 74.0, (6.0 + root) / 74.0]) {
            assert!((p.y - y).abs() < 1e-10, "y={} expected {}", p.y, y);
            assert!(section.implicit_value(p).abs() < 1e-8);
        }
    }

    #[test]
    fn test_3d_not_perpendicular_rejected() {
        let torus = Torus::new(2.0, 1.0).unwrap();
        let mut slots = [Point3d::NAN; 4];
        let result = intersect_torus_and_line_3d(
            &torus,
            Point3d::new(2.0, -5.0, 0.0),
            Point3d::new(2.0, 5.0, 1e-6),
            &mut slots,
        );
        assert!(matches!(result, Err(IntersectionError::InvalidInput { .. })));
    }

    #[test]
    fn test_3d_lifts_plane_points() {
        let torus = Torus::new(2.0, 1.0).unwrap();
        let mut slots = [Point3d::ORIGIN; 4];
        let count = intersect_torus_and_line_3d(
            &torus,
            Point3d::new(2.0, -5.0, 0.0),
            Point3d::new(2.0, 5.0, 0.0),
            &mut slots,
        )
        .unwrap();

        assert_eq!(count, 2);
        for p in &slots[..2] {
            assert_eq!(p.z, 0.0);
            assert!((p.y.abs() - 1.0).abs() < 1e-11);
        }
        assert!(slots[2].contains_nan() && slots[3].contains_nan());
    }

    #[test]
    fn test_validation_reports_offending_slot() {
        let torus = Torus::new(2.0, 1.0).unwrap();
        let line = Line3d::new(Point3d::new(0.0, -1.0, 0.0), Point3d::new(0.0, 1.0, 0.0)).unwrap();
        let slots = [
            Point3d::NAN,
            Point3d::new(0.0, 0.5, 0.0),
            Point3d::NAN,
            Point3d::NAN,
        ];
        let err = validate_intersections(&torus, &line, &slots, &ValidationTolerance::default())
            .unwrap_err();
        assert!(matches!(err, IntersectionError::NotOnTorus { slot: 1, .. }));

        let off_line = [Point3d::new(3.0, 0.0, 0.0), Point3d::NAN, Point3d::NAN, Point3d::NAN];
        let err = validate_intersections(&torus, &line, &off_line, &ValidationTolerance::default())
            .unwrap_err();
        assert!(matches!(err, IntersectionError::NotOnLine { slot: 0, .. }));
    }
}
