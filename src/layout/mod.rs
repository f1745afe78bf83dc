//! Space negotiation between axes, legend/title boxes, and the plot area.

pub mod axis;
pub mod fitter;
pub mod negotiator;

pub use axis::{Axis, AxisOptions};
pub use negotiator::{FixedBox, LayoutBox, LayoutResult, MAX_PASSES, SIZE_EPSILON, negotiate};
