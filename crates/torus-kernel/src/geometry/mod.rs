pub mod point;
pub mod vector;
pub mod line;
pub mod torus;

pub use line::{Line2d, Line3d};
pub use point::{Point2d, Point3d};
pub use torus::{is_point_on_torus, SpiricSection, Torus, TorusKind};
pub use vector::{Vec2, Vec3};
