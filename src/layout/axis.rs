use serde::{Deserialize, Serialize};

use crate::core::{Edge, FontSpec, Padding, Rect, Size, Tick, build_ticks};
use crate::layout::fitter;
use crate::layout::negotiator::LayoutBox;
use crate::measure::MeasurementSurface;

/// Per-axis configuration knobs that affect fitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisOptions {
    #[serde(default = "default_display")]
    pub display: bool,
    /// Rotation floor for tick labels, degrees.
    #[serde(default)]
    pub min_rotation_deg: f64,
    /// Rotation ceiling for tick labels, degrees.
    #[serde(default = "default_max_rotation")]
    pub max_rotation_deg: f64,
    #[serde(default = "default_tick_mark_length")]
    pub tick_mark_length_px: f64,
    #[serde(default = "default_max_ticks")]
    pub max_ticks: usize,
    #[serde(default)]
    pub tick_font: FontSpec,
    /// Optional scale title rendered along the axis; reserves one title-font line.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_font: FontSpec,
}

impl Default for AxisOptions {
    fn default() -> Self {
        Self {
            display: default_display(),
            min_rotation_deg: 0.0,
            max_rotation_deg: default_max_rotation(),
            tick_mark_length_px: default_tick_mark_length(),
            max_ticks: default_max_ticks(),
            tick_font: FontSpec::default(),
            title: None,
            title_font: FontSpec::default(),
        }
    }
}

fn default_display() -> bool {
    true
}

fn default_max_rotation() -> f64 {
    50.0
}

fn default_tick_mark_length() -> f64 {
    10.0
}

fn default_max_ticks() -> usize {
    11
}

/// One axis: a coordinate mapping plus the rectangular strip its ticks,
/// labels, and title occupy.
///
/// Rebuilt in place on every update cycle; the identity (`id`) is stable for
/// the life of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    id: String,
    edge: Edge,
    options: AxisOptions,
    ticks: Vec<Tick>,
    data_min: f64,
    data_max: f64,
    padding: Padding,
    label_rotation_deg: f64,
    min_size: Size,
    rect: Rect,
}

impl Axis {
    #[must_use]
    pub fn new(id: impl Into<String>, edge: Edge) -> Self {
        Self::with_options(id, edge, AxisOptions::default())
    }

    #[must_use]
    pub fn with_options(id: impl Into<String>, edge: Edge, options: AxisOptions) -> Self {
        Self {
            id: id.into(),
            edge,
            options,
            ticks: Vec::new(),
            data_min: 0.0,
            data_max: 1.0,
            padding: Padding::zero(),
            label_rotation_deg: 0.0,
            min_size: Size::zero(),
            rect: Rect::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn edge(&self) -> Edge {
        self.edge
    }

    #[must_use]
    pub fn options(&self) -> &AxisOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut AxisOptions {
        &mut self.options
    }

    #[must_use]
    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    pub fn set_ticks(&mut self, ticks: Vec<Tick>) {
        self.ticks = ticks;
    }

    #[must_use]
    pub fn data_range(&self) -> (f64, f64) {
        (self.data_min, self.data_max)
    }

    /// Stores the data range and regenerates ticks from it.
    ///
    /// Called from the pipeline's rebuild-scales stage; a degenerate range is
    /// widened by half a unit on each side so the mapping keeps a usable span.
    pub fn rebuild(&mut self, data_min: f64, data_max: f64) {
        let (min, max) = if data_min.is_finite() && data_max.is_finite() && data_max > data_min {
            (data_min, data_max)
        } else if data_min.is_finite() {
            (data_min - 0.5, data_min + 0.5)
        } else {
            (0.0, 1.0)
        };
        self.data_min = min;
        self.data_max = max;
        self.ticks = build_ticks(min, max, self.options.max_ticks);
    }

    #[must_use]
    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub(crate) fn set_padding(&mut self, padding: Padding) {
        self.padding = padding;
    }

    #[must_use]
    pub fn label_rotation_deg(&self) -> f64 {
        self.label_rotation_deg
    }

    pub(crate) fn set_label_rotation_deg(&mut self, rotation: f64) {
        self.label_rotation_deg = rotation;
    }

    #[must_use]
    pub fn min_size(&self) -> Size {
        self.min_size
    }

    pub(crate) fn set_min_size(&mut self, size: Size) {
        self.min_size = size;
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Maps a data value to a pixel coordinate along the plot area span.
    ///
    /// Vertical axes invert so larger values sit higher on screen. Degenerate
    /// plot areas or non-finite values map to the span start instead of
    /// producing NaN.
    #[must_use]
    pub fn pixel_for_value(&self, value: f64, plot_area: Rect) -> f64 {
        let span = self.data_max - self.data_min;
        let start = if self.edge.is_horizontal() {
            plot_area.left
        } else {
            plot_area.bottom
        };
        if !value.is_finite() || span <= 0.0 || plot_area.is_degenerate() {
            return start;
        }
        let normalized = (value - self.data_min) / span;
        if self.edge.is_horizontal() {
            plot_area.left + normalized * plot_area.width()
        } else {
            plot_area.bottom - normalized * plot_area.height()
        }
    }

    /// Inverse of [`Self::pixel_for_value`].
    #[must_use]
    pub fn value_for_pixel(&self, pixel: f64, plot_area: Rect) -> f64 {
        if plot_area.is_degenerate() || !pixel.is_finite() {
            return self.data_min;
        }
        let normalized = if self.edge.is_horizontal() {
            (pixel - plot_area.left) / plot_area.width()
        } else {
            (plot_area.bottom - pixel) / plot_area.height()
        };
        self.data_min + normalized * (self.data_max - self.data_min)
    }
}

impl LayoutBox for Axis {
    fn edge(&self) -> Edge {
        self.edge
    }

    fn is_visible(&self) -> bool {
        self.options.display
    }

    fn fit(&mut self, max: Size, margins: Padding, surface: &dyn MeasurementSurface) -> Size {
        fitter::fit(self, max.width, max.height, margins, surface)
    }

    fn place(&mut self, rect: Rect) {
        self.rect = rect;
    }
}
