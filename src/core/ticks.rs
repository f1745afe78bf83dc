//! Linear tick generation and default label formatting.

use serde::{Deserialize, Serialize};

/// One axis tick. A `None` label means the tick exists in the coordinate
/// mapping but is neither drawn nor measured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub value: f64,
    pub label: Option<String>,
}

impl Tick {
    #[must_use]
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: Some(label.into()),
        }
    }

    #[must_use]
    pub fn unlabeled(value: f64) -> Self {
        Self { value, label: None }
    }
}

/// Rounds a raw step up to the nearest 1/2/5 decade multiple.
fn nice_step(raw_step: f64) -> f64 {
    if !raw_step.is_finite() || raw_step <= 0.0 {
        return 1.0;
    }
    let magnitude = 10.0_f64.powf(raw_step.log10().floor());
    let fraction = raw_step / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Builds labeled ticks covering `[min, max]` with at most `max_count` entries.
///
/// Degenerate inputs (non-finite bounds, inverted range, `max_count < 2`)
/// produce a single tick at `min` so downstream fitting never divides by a
/// zero tick span.
#[must_use]
pub fn build_ticks(min: f64, max: f64, max_count: usize) -> Vec<Tick> {
    if !min.is_finite() || !max.is_finite() || max <= min || max_count < 2 {
        let anchor = if min.is_finite() { min } else { 0.0 };
        return vec![Tick::new(anchor, format_tick_value(anchor))];
    }

    let step = nice_step((max - min) / (max_count.saturating_sub(1)) as f64);
    let first = (min / step).ceil() * step;

    let mut ticks = Vec::new();
    let mut value = first;
    while value <= max + step * 1e-9 && ticks.len() < max_count {
        // Snap near-zero accumulation noise so labels read "0", not "-0".
        let snapped = if value.abs() < step * 1e-9 { 0.0 } else { value };
        ticks.push(Tick::new(snapped, format_tick_value(snapped)));
        value += step;
    }

    if ticks.is_empty() {
        ticks.push(Tick::new(min, format_tick_value(min)));
    }
    ticks
}

/// Default tick label formatter: trims trailing fractional zeros.
#[must_use]
pub fn format_tick_value(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    if value == value.trunc() && value.abs() < 1e15 {
        return format!("{value:.0}");
    }
    let formatted = format!("{value:.6}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_owned()
}

#[cfg(test)]
mod tests {
    use super::{Tick, build_ticks, format_tick_value, nice_step};

    #[test]
    fn nice_step_rounds_to_decade_multiples() {
        assert_eq!(nice_step(0.7), 1.0);
        assert_eq!(nice_step(1.3), 2.0);
        assert_eq!(nice_step(3.9), 5.0);
        assert_eq!(nice_step(7.2), 10.0);
        assert_eq!(nice_step(23.0), 50.0);
    }

    #[test]
    fn build_ticks_covers_range_without_exceeding_count() {
        let ticks = build_ticks(0.0, 100.0, 6);
        assert!(ticks.len() >= 2);
        assert!(ticks.len() <= 6);
        assert_eq!(ticks.first().map(|t| t.value), Some(0.0));
        assert!(ticks.iter().all(|t| t.value >= 0.0 && t.value <= 100.0));
    }

    #[test]
    fn degenerate_range_yields_single_tick() {
        assert_eq!(build_ticks(5.0, 5.0, 10).len(), 1);
        assert_eq!(build_ticks(f64::NAN, 1.0, 10).len(), 1);
        assert_eq!(build_ticks(0.0, 10.0, 1).len(), 1);
    }

    #[test]
    fn formatting_trims_trailing_zeros() {
        assert_eq!(format_tick_value(1000000.0), "1000000");
        assert_eq!(format_tick_value(0.25), "0.25");
        assert_eq!(format_tick_value(0.0), "0");
        assert_eq!(format_tick_value(f64::NAN), "");
    }

    #[test]
    fn unlabeled_ticks_carry_no_text() {
        assert_eq!(Tick::unlabeled(3.0).label, None);
    }
}
