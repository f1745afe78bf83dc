pub mod easing;
pub mod font;
pub mod geometry;
pub mod ticks;
pub mod types;

pub use easing::Easing;
pub use font::FontSpec;
pub use geometry::{Edge, Padding, Point, Rect, Size};
pub use ticks::{Tick, build_ticks, format_tick_value};
pub use types::{ChartId, DataPoint};
