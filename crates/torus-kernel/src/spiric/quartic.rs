//! Closed-form roots of a spiric section along a line parallel to the X axis.
//!
//! Substituting `y = y0` into the spiric equation leaves the biquadratic
//! `x⁴ + Bx² + C = 0`, solved through `u = x²`.

use crate::geometry::point::Point2d;
use crate::geometry::torus::SpiricSection;

/// Up to four real roots in fixed slot order, NaN-padded.
///
/// Slots 0/1 hold `±√u₁` and slots 2/3 hold `±√u₂`, with `u₁ ≥ u₂`. A zero
/// `u` contributes a single root `0` in the first slot of its pair.
#[derive(Debug, Clone, Copy)]
pub struct SpiricRoots {
    pub count: usize,
    pub x: [f64; 4],
}

impl SpiricRoots {
    /// The non-NaN roots, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.x.iter().copied().filter(|x| !x.is_nan())
    }

    /// Write `(root, y)` into each slot, or NaN for the empty ones.
    pub fn pack_into(&self, y: f64, slots: &mut [Point2d; 4]) {
        for (slot, &x) in slots.iter_mut().zip(self.x.iter()) {
            if x.is_nan() {
                slot.set_to_nan();
            } else {
                *slot = Point2d::new(x, y);
            }
        }
    }
}

/// `x⁴ + b·x² + c = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biquadratic {
    pub b: f64,
    pub c: f64,
}

impl Biquadratic {
    pub fn new(b: f64, c: f64) -> Self {
        Self { b, c }
    }

    /// Coefficients of the spiric restricted to the horizontal line `y`.
    pub fn from_spiric(section: &SpiricSection, y: f64) -> Self {
        let r2 = section.radius * section.radius;
        let t2 = section.tube_radius * section.tube_radius;
        let d2 = section.plane_distance * section.plane_distance;
        let y2 = y * y;
        let k = d2 - t2 + r2;

        Self {
            b: 2.0 * (y2 + d2 - t2 - r2),
            c: y2 * y2 + 2.0 * y2 * k + k * k - 4.0 * d2 * r2,
        }
    }

    /// The biquadratic whose squared roots are `u1` and `u2`.
    pub fn from_square_roots(u1: f64, u2: f64) -> Self {
        Self {
            b: -(u1 + u2),
            c: u1 * u2,
        }
    }

    pub fn discriminant(&self) -> f64 {
        self.b * self.b - 4.0 * self.c
    }

    pub fn roots(&self) -> SpiricRoots {
        let delta = self.discriminant();

        let (first, second) = if delta > 0.0 {
            let sqrt_delta = delta.sqrt();
            (
                roots_of_square((-self.b + sqrt_delta) / 2.0),
                roots_of_square((-self.b - sqrt_delta) / 2.0),
            )
        } else if delta == 0.0 {
            (roots_of_square(-self.b / 2.0), NO_PAIR)
        } else {
            (NO_PAIR, NO_PAIR)
        };

        SpiricRoots {
            count: first.count + second.count,
            x: [first.plus, first.minus, second.plus, second.minus],
        }
    }
}

#[derive(Clone, Copy)]
struct RootPair {
    plus: f64,
    minus: f64,
    count: usize,
}

const NO_PAIR: RootPair = RootPair {
    plus: f64::NAN,
    minus: f64::NAN,
    count: 0,
};

fn roots_of_square(u: f64) -> RootPair {
    if u > 0.0 {
        let s = u.sqrt();
        RootPair {
            plus: s,
            minus: -s,
            count: 2,
        }
    } else if u == 0.0 {
        RootPair {
            plus: 0.0,
            minus: f64::NAN,
            count: 1,
        }
    } else {
        NO_PAIR
    }
}

/// Abscissas where the horizontal line `y` meets the spiric section of the
/// torus `(radius, tube_radius)` cut at `plane_distance` from its axis.
pub fn solve_spiric_line_x(radius: f64, tube_radius: f64, y: f64, plane_distance: f64) -> SpiricRoots {
    let section = SpiricSection {
        radius,
        tube_radius,
        plane_distance,
    };
    Biquadratic::from_spiric(&section, y).roots()
}
