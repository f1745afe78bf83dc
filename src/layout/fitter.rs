//! Axis/scale fitter: computes the pixel footprint an axis needs inside a
//! candidate content-area size, including the iterative label-rotation search.

use crate::core::{Padding, Size};
use crate::layout::axis::Axis;
use crate::measure::{MeasurementSurface, sanitize_measurement};

/// Breathing room subtracted from the raw distance between adjacent ticks.
pub(crate) const TICK_PITCH_GAP_PX: f64 = 6.0;

/// Pixel distance available to one label between adjacent ticks.
///
/// A single tick has no neighbor, so its pitch is a zero pixel span rather
/// than a division by zero.
#[must_use]
pub fn tick_pitch(span_px: f64, tick_count: usize) -> f64 {
    if tick_count <= 1 || !(span_px > 0.0) {
        return 0.0;
    }
    (span_px / (tick_count - 1) as f64 - TICK_PITCH_GAP_PX).max(0.0)
}

/// Fits `axis` into a candidate `max_width` x `max_height` box.
///
/// Implements the bounded 1°-step rotation search: rotation grows from the
/// configured floor until the cosine-projected longest label fits the tick
/// pitch or the ceiling is reached, backing off one degree when the sine
/// projection would overflow `max_height`. Label metrics are not analytically
/// invertible from rotation, hence the linear scan instead of a closed-form
/// solve.
///
/// Unmeasurable input (NaN/negative surface readings) degrades to a zero-size
/// contribution; this function never panics on host-surface failure.
pub fn fit(
    axis: &mut Axis,
    max_width: f64,
    max_height: f64,
    margins: Padding,
    surface: &dyn MeasurementSurface,
) -> Size {
    let max_width = sanitize_measurement(max_width);
    let max_height = sanitize_measurement(max_height);

    let options = axis.options().clone();

    // Hosts can hand an inverted or non-finite rotation range through the
    // public options; degrade to an ordered finite pair instead of panicking.
    let floor = if options.min_rotation_deg.is_finite() {
        options.min_rotation_deg
    } else {
        0.0
    };
    let ceiling = if options.max_rotation_deg.is_finite() {
        options.max_rotation_deg
    } else {
        floor
    };
    let (floor, ceiling) = (floor.min(ceiling), floor.max(ceiling));

    axis.set_padding(Padding::zero());
    axis.set_label_rotation_deg(floor);

    if !options.display {
        axis.set_min_size(Size::zero());
        return Size::zero();
    }

    let font = &options.tick_font;
    let measure = |text: &str| sanitize_measurement(surface.measure_text(font, text));

    // Unlabeled ticks keep their pitch slot but are neither drawn nor measured.
    let tick_count = axis.ticks().len();
    let labels: Vec<String> = axis
        .ticks()
        .iter()
        .filter_map(|tick| tick.label.clone())
        .collect();

    let first_width = labels.first().map(|label| measure(label)).unwrap_or(0.0);
    let last_width = labels.last().map(|label| measure(label)).unwrap_or(0.0);
    let longest = labels
        .iter()
        .map(|label| measure(label))
        .fold(0.0, f64::max);
    let line_height = font.line_height_px();
    let line_count = labels
        .iter()
        .map(|label| label.split('\n').count())
        .max()
        .unwrap_or(1);

    let horizontal = axis.edge().is_horizontal();

    let mut padding = Padding::zero();
    if horizontal {
        padding.left = first_width / 2.0;
        padding.right = last_width / 2.0;
    } else {
        padding.top = line_height / 2.0;
        padding.bottom = line_height / 2.0;
    }

    let mut rotation = floor;
    if horizontal && !labels.is_empty() {
        let pitch = tick_pitch(max_width, tick_count);
        while longest * rotation.to_radians().cos() > pitch && rotation < ceiling {
            rotation += 1.0;
            if longest * rotation.to_radians().sin() > max_height {
                rotation -= 1.0;
                break;
            }
        }
        rotation = rotation.clamp(floor, ceiling);
    }
    axis.set_label_rotation_deg(rotation);

    let title_line = if options.title.is_some() {
        options.title_font.line_height_px()
    } else {
        0.0
    };

    let mut size = Size::zero();
    if horizontal {
        size.width = max_width;
        let label_height = if labels.is_empty() {
            0.0
        } else {
            rotation.to_radians().sin() * longest + line_height * line_count as f64
        };
        size.height = options.tick_mark_length_px + label_height + title_line;
    } else {
        size.height = max_height;
        let label_width = if labels.is_empty() { 0.0 } else { longest };
        // A vertical-axis title renders rotated and consumes one line of width.
        size.width = options.tick_mark_length_px + label_width + title_line;
    }
    let size = size.clamped_to(Size::new(max_width, max_height));

    axis.set_padding(Padding {
        top: (padding.top - margins.top).max(0.0),
        right: (padding.right - margins.right).max(0.0),
        bottom: (padding.bottom - margins.bottom).max(0.0),
        left: (padding.left - margins.left).max(0.0),
    });
    axis.set_min_size(size);
    size
}
