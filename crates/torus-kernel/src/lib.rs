//! Intersections between a line and a torus, computed in the torus frame.
//!
//! A line perpendicular to the torus axis lies in a plane that cuts the
//! torus along a spiric section. The crossings with that planar quartic are
//! located by a sweep of horizontal lines (each solved in closed form) and
//! refined by bisection, then lifted back to 3D and checked against both the
//! line and the torus.

pub mod config;
pub mod error;
pub mod geometry;
pub mod intersection;
pub mod spiric;

pub use config::{SweepConfig, ValidationTolerance};
pub use error::IntersectionError;
pub use geometry::{is_point_on_torus, Line2d, Line3d, Point2d, Point3d, SpiricSection, Torus, TorusKind};
pub use intersection::{
    intersect_spiric_and_line_2d, intersect_spiric_and_line_2d_with, intersect_torus_and_line_3d,
    intersect_torus_and_line_3d_with, MAX_INTERSECTIONS,
};
pub use spiric::solve_spiric_line_x;
