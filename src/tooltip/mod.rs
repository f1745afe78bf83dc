//! Tooltip model and collision-free positioner.
//!
//! The model is rebuilt on every update, even with no active elements (then
//! opacity is 0 while size/alignment/position keep their last values), so a
//! fade between hidden and visible states always has a stable endpoint to
//! interpolate toward.

use serde::{Deserialize, Serialize};

use crate::core::{FontSpec, Point, Rect, Size};
use crate::measure::{MeasurementSurface, sanitize_measurement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum XAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum YAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipOptions {
    #[serde(default = "default_padding")]
    pub padding: f64,
    #[serde(default = "default_caret_size")]
    pub caret_size: f64,
    #[serde(default = "default_caret_padding")]
    pub caret_padding: f64,
    #[serde(default = "default_corner_radius")]
    pub corner_radius: f64,
    #[serde(default)]
    pub title_font: FontSpec,
    #[serde(default)]
    pub body_font: FontSpec,
    #[serde(default)]
    pub footer_font: FontSpec,
    #[serde(default = "default_line_spacing")]
    pub title_spacing: f64,
    #[serde(default = "default_section_margin")]
    pub title_margin_bottom: f64,
    #[serde(default = "default_line_spacing")]
    pub body_spacing: f64,
    #[serde(default = "default_line_spacing")]
    pub footer_spacing: f64,
    #[serde(default = "default_section_margin")]
    pub footer_margin_top: f64,
}

impl Default for TooltipOptions {
    fn default() -> Self {
        Self {
            padding: default_padding(),
            caret_size: default_caret_size(),
            caret_padding: default_caret_padding(),
            corner_radius: default_corner_radius(),
            title_font: FontSpec::default(),
            body_font: FontSpec::default(),
            footer_font: FontSpec::default(),
            title_spacing: default_line_spacing(),
            title_margin_bottom: default_section_margin(),
            body_spacing: default_line_spacing(),
            footer_spacing: default_line_spacing(),
            footer_margin_top: default_section_margin(),
        }
    }
}

impl TooltipOptions {
    /// Width reserved next to each body line for the dataset color swatch.
    #[must_use]
    pub fn swatch_width(&self) -> f64 {
        self.body_font.size_px + 2.0
    }
}

fn default_padding() -> f64 {
    6.0
}

fn default_caret_size() -> f64 {
    5.0
}

fn default_caret_padding() -> f64 {
    2.0
}

fn default_corner_radius() -> f64 {
    6.0
}

fn default_line_spacing() -> f64 {
    2.0
}

fn default_section_margin() -> f64 {
    6.0
}

/// Text content of a tooltip, one entry per line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TooltipContent {
    pub title: Vec<String>,
    pub body: Vec<String>,
    pub footer: Vec<String>,
}

impl TooltipContent {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.body.is_empty() && self.footer.is_empty()
    }
}

/// Tooltip render model owned by the chart instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TooltipModel {
    /// 0 means hidden. Size/alignment/position fields keep their last values
    /// when hidden.
    pub opacity: f64,
    pub x_align: XAlign,
    pub y_align: YAlign,
    /// Background top-left origin.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Anchor the caret points at.
    pub caret: Point,
    pub content: TooltipContent,
}

/// Computes the tooltip box size from its content (§ step 1): summed section
/// line heights plus padding vertically; widest measured line (body lines
/// reserve swatch width) plus padding horizontally.
#[must_use]
pub fn measure(
    content: &TooltipContent,
    options: &TooltipOptions,
    surface: &dyn MeasurementSurface,
) -> Size {
    let mut height = options.padding * 2.0;
    let mut width: f64 = 0.0;

    let title_count = content.title.len();
    if title_count > 0 {
        height += title_count as f64 * options.title_font.line_height_px()
            + (title_count - 1) as f64 * options.title_spacing
            + options.title_margin_bottom;
    }
    let body_count = content.body.len();
    if body_count > 0 {
        height += body_count as f64 * options.body_font.line_height_px()
            + (body_count - 1) as f64 * options.body_spacing;
    }
    let footer_count = content.footer.len();
    if footer_count > 0 {
        height += options.footer_margin_top
            + footer_count as f64 * options.footer_font.line_height_px()
            + (footer_count - 1) as f64 * options.footer_spacing;
    }

    for line in &content.title {
        width = width.max(sanitize_measurement(
            surface.measure_text(&options.title_font, line),
        ));
    }
    for line in &content.body {
        let line_width =
            sanitize_measurement(surface.measure_text(&options.body_font, line))
                + options.swatch_width();
        width = width.max(line_width);
    }
    for line in &content.footer {
        width = width.max(sanitize_measurement(
            surface.measure_text(&options.footer_font, line),
        ));
    }

    Size::new(width + options.padding * 2.0, height)
}

/// Determines box alignment relative to the anchor (§ steps 2-3).
///
/// Vertical first: `Top` when the anchor sits within one box height of the
/// content-area top, `Bottom` within one box height of the bottom, `Center`
/// otherwise. Horizontal predicates split at the content midline when
/// vertically centered, else at half a box width from each canvas edge; an
/// alignment that would push the box off-canvas falls back to horizontal
/// `Center` with vertical re-derived from the midline.
#[must_use]
pub fn determine_alignment(
    anchor: Point,
    size: Size,
    chart_area: Rect,
    canvas: Size,
    options: &TooltipOptions,
) -> (XAlign, YAlign) {
    let mut y_align = YAlign::Center;
    if anchor.y < chart_area.top + size.height {
        y_align = YAlign::Top;
    } else if anchor.y > chart_area.bottom - size.height {
        y_align = YAlign::Bottom;
    }

    let mid_x = chart_area.center().x;
    let mid_y = chart_area.center().y;
    let caret = options.caret_size + options.caret_padding;

    let left_of = |x: f64| {
        if y_align == YAlign::Center {
            x <= mid_x
        } else {
            x <= size.width / 2.0
        }
    };
    let right_of = |x: f64| {
        if y_align == YAlign::Center {
            x > mid_x
        } else {
            x >= canvas.width - size.width / 2.0
        }
    };
    let overflows_left_aligned = |x: f64| x + size.width + caret > canvas.width;
    let overflows_right_aligned = |x: f64| x - size.width - caret < 0.0;
    let midline_y = |y: f64| if y <= mid_y { YAlign::Top } else { YAlign::Bottom };

    let mut x_align = XAlign::Center;
    if left_of(anchor.x) {
        x_align = XAlign::Left;
        if overflows_left_aligned(anchor.x) {
            x_align = XAlign::Center;
            y_align = midline_y(anchor.y);
        }
    } else if right_of(anchor.x) {
        x_align = XAlign::Right;
        if overflows_right_aligned(anchor.x) {
            x_align = XAlign::Center;
            y_align = midline_y(anchor.y);
        }
    }

    (x_align, y_align)
}

/// Translates alignment + anchor into the background top-left origin
/// (§ step 4), accounting for the caret's protruding size on the anchor side.
#[must_use]
pub fn background_point(
    anchor: Point,
    size: Size,
    x_align: XAlign,
    y_align: YAlign,
    canvas: Size,
    options: &TooltipOptions,
) -> Point {
    let caret_and_padding = options.caret_size + options.caret_padding;
    let radius_and_padding = options.corner_radius + options.caret_padding;

    let mut x = anchor.x;
    match x_align {
        XAlign::Right => x -= size.width,
        XAlign::Center => {
            x -= size.width / 2.0;
            // Centered boxes clamp to the canvas instead of growing a caret gap.
            if x + size.width > canvas.width {
                x = canvas.width - size.width;
            }
            if x < 0.0 {
                x = 0.0;
            }
        }
        XAlign::Left => {}
    }

    let mut y = anchor.y;
    match y_align {
        YAlign::Top => y += caret_and_padding,
        YAlign::Bottom => y -= size.height + caret_and_padding,
        YAlign::Center => y -= size.height / 2.0,
    }

    if y_align == YAlign::Center {
        match x_align {
            XAlign::Left => x += caret_and_padding,
            XAlign::Right => x -= caret_and_padding,
            XAlign::Center => {}
        }
    } else {
        match x_align {
            XAlign::Left => x -= radius_and_padding,
            XAlign::Right => x += radius_and_padding,
            XAlign::Center => {}
        }
    }

    // Final clamp: a box that fits the canvas must never render clipped, even
    // after the caret/corner offsets above.
    if size.width <= canvas.width {
        x = x.clamp(0.0, canvas.width - size.width);
    }
    if size.height <= canvas.height {
        y = y.clamp(0.0, canvas.height - size.height);
    }

    Point::new(x, y)
}

/// Builds the full tooltip model for the given anchor and content.
///
/// With empty content (no active elements) the previous model is carried
/// forward at opacity 0.
#[must_use]
pub fn build_model(
    previous: &TooltipModel,
    anchor: Option<Point>,
    content: TooltipContent,
    options: &TooltipOptions,
    chart_area: Rect,
    canvas: Size,
    surface: &dyn MeasurementSurface,
) -> TooltipModel {
    let (Some(anchor), false) = (anchor, content.is_empty()) else {
        let mut model = previous.clone();
        model.opacity = 0.0;
        return model;
    };

    let size = measure(&content, options, surface);
    let (x_align, y_align) = determine_alignment(anchor, size, chart_area, canvas, options);
    let origin = background_point(anchor, size, x_align, y_align, canvas, options);

    TooltipModel {
        opacity: 1.0,
        x_align,
        y_align,
        x: origin.x,
        y: origin.y,
        width: size.width,
        height: size.height,
        caret: anchor,
        content,
    }
}
