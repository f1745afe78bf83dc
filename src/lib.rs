//! chartcore: layout-negotiation and update/render core for 2D charts.
//!
//! This crate implements the hard center of an interactive charting engine:
//! the constrained layout solver that partitions canvas space among axes and
//! legend/title boxes (including iterative tick-label rotation fitting), the
//! staged update/render pipeline, a cooperative animation scheduler shared by
//! all chart instances, pointer-to-element interaction resolution, and
//! overflow-aware tooltip placement. Rasterization of the actual geometry is
//! left to host-provided dataset controllers and drawing backends.

pub mod animation;
pub mod core;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod measure;
pub mod pipeline;
pub mod telemetry;
pub mod tooltip;

pub use error::{ChartError, ChartResult};
pub use pipeline::{ChartController, ChartOptions, ChartRegistry};
