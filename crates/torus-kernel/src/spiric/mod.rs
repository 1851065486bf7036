//! Line/spiric-section intersection: closed-form roots along horizontal
//! lines, a sweep-line classifier built on them, and bisection refinement
//! of the crossings the sweep brackets.

pub mod quartic;
pub mod sweep;
pub mod bisection;

pub use bisection::{refine, refine_with_trace, Bracket, RefinedCrossing};
pub use quartic::{solve_spiric_line_x, Biquadratic, SpiricRoots};
pub use sweep::{
    check_sweep_inputs, classify, flip_indices, sweep, AbscissaOrigin, ClassificationSample,
    LinePosition, TaggedAbscissa,
};
