use serde::{Deserialize, Serialize};

/// Font description handed to the measurement surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    #[serde(default = "default_family")]
    pub family: String,
    #[serde(default = "default_size")]
    pub size_px: f64,
    /// Line height as a multiple of the font size.
    #[serde(default = "default_line_height")]
    pub line_height: f64,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: default_family(),
            size_px: default_size(),
            line_height: default_line_height(),
        }
    }
}

impl FontSpec {
    #[must_use]
    pub fn new(family: impl Into<String>, size_px: f64) -> Self {
        Self {
            family: family.into(),
            size_px,
            line_height: default_line_height(),
        }
    }

    #[must_use]
    pub fn with_size(mut self, size_px: f64) -> Self {
        self.size_px = size_px;
        self
    }

    #[must_use]
    pub fn line_height_px(&self) -> f64 {
        self.size_px * self.line_height
    }
}

fn default_family() -> String {
    "sans-serif".to_owned()
}

fn default_size() -> f64 {
    12.0
}

fn default_line_height() -> f64 {
    1.2
}
