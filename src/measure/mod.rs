//! Measurement surface adapter.
//!
//! Abstracts "measure text width", "available canvas size" and "pixel density"
//! away from any concrete drawing backend so the layout solver and tooltip
//! positioner stay headless and deterministic.

use crate::core::FontSpec;

/// Host drawing surface seen through the narrow lens layout needs.
pub trait MeasurementSurface {
    /// Width in logical pixels of `text` rendered with `font`.
    ///
    /// Implementations may return non-finite values when the backing surface
    /// is gone; consumers must pass results through [`sanitize_measurement`].
    fn measure_text(&self, font: &FontSpec, text: &str) -> f64;

    fn available_width(&self) -> f64;

    fn available_height(&self) -> f64;

    fn pixel_ratio(&self) -> f64 {
        1.0
    }
}

/// Clamps a measurement to a usable value: non-finite or negative readings
/// degrade to zero so an unavailable surface never aborts layout.
#[must_use]
pub fn sanitize_measurement(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

/// Surface standing in for a missing drawing target: measures nothing,
/// reports no available area.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl MeasurementSurface for NullSurface {
    fn measure_text(&self, _font: &FontSpec, _text: &str) -> f64 {
        0.0
    }

    fn available_width(&self) -> f64 {
        0.0
    }

    fn available_height(&self) -> f64 {
        0.0
    }
}

/// Deterministic, backend-independent text measurement for tests and
/// headless hosts: per-glyph width classes scaled by the font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphEstimateSurface {
    pub width: f64,
    pub height: f64,
    pub ratio: f64,
}

impl GlyphEstimateSurface {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ratio: 1.0,
        }
    }
}

impl MeasurementSurface for GlyphEstimateSurface {
    fn measure_text(&self, font: &FontSpec, text: &str) -> f64 {
        // Multi-line labels measure as their widest line.
        text.split('\n')
            .map(|line| {
                let units = line.chars().fold(0.0, |acc, ch| {
                    acc + match ch {
                        '0'..='9' => 0.62,
                        '.' | ',' => 0.34,
                        '-' | '+' | '%' => 0.42,
                        ' ' => 0.33,
                        _ => 0.58,
                    }
                });
                units * font.size_px
            })
            .fold(0.0, f64::max)
    }

    fn available_width(&self) -> f64 {
        self.width
    }

    fn available_height(&self) -> f64 {
        self.height
    }

    fn pixel_ratio(&self) -> f64 {
        self.ratio
    }
}
