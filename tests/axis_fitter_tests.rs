use approx::assert_abs_diff_eq;
use chartcore::core::{Edge, FontSpec, Padding, Tick};
use chartcore::layout::fitter::fit;
use chartcore::layout::{Axis, AxisOptions};
use chartcore::measure::{GlyphEstimateSurface, MeasurementSurface};

fn surface() -> GlyphEstimateSurface {
    GlyphEstimateSurface::new(800.0, 600.0)
}

fn labeled_axis(edge: Edge, labels: &[&str]) -> Axis {
    let mut axis = Axis::new("a", edge);
    axis.set_ticks(
        labels
            .iter()
            .enumerate()
            .map(|(index, label)| Tick::new(index as f64, *label))
            .collect(),
    );
    axis
}

#[test]
fn rotation_search_fits_the_longest_label_within_fifty_degrees() {
    let surface = surface();
    let mut axis = labeled_axis(Edge::Bottom, &["0", "Jan", "February", "1000000", "x"]);
    let size = fit(&mut axis, 200.0, 300.0, Padding::zero(), &surface);

    let rotation = axis.label_rotation_deg();
    assert!(rotation > 0.0, "long labels must force some rotation");
    assert!(rotation <= 50.0);

    // At the settled rotation the longest label's projection fits the pitch,
    // unless the ceiling cut the search short.
    let longest = surface.measure_text(&FontSpec::default(), "February");
    let pitch = 200.0 / 4.0 - 6.0;
    assert!(longest * rotation.to_radians().cos() <= pitch || rotation == 50.0);
    assert!(size.height > 0.0);
}

#[test]
fn rotation_reports_ceiling_when_label_never_fits() {
    let surface = surface();
    let mut axis = labeled_axis(Edge::Bottom, &["0", "Jan", "February", "1000000", "x"]);
    fit(&mut axis, 50.0, 600.0, Padding::zero(), &surface);
    assert_abs_diff_eq!(axis.label_rotation_deg(), 50.0);
}

#[test]
fn rotation_backs_off_when_projection_would_overflow_height() {
    let surface = surface();
    let mut axis = labeled_axis(Edge::Bottom, &["0", "Jan", "February", "1000000", "x"]);
    let max_height = 20.0;
    fit(&mut axis, 50.0, max_height, Padding::zero(), &surface);

    let rotation = axis.label_rotation_deg();
    let longest = surface.measure_text(&FontSpec::default(), "February");
    assert!(rotation < 50.0);
    assert!(longest * rotation.to_radians().sin() <= max_height + 1e-9);
}

#[test]
fn single_tick_axis_does_not_divide_by_zero() {
    let surface = surface();
    let mut axis = labeled_axis(Edge::Bottom, &["only"]);
    let size = fit(&mut axis, 400.0, 300.0, Padding::zero(), &surface);
    // Zero pixel span means the label can never fit; the search must still
    // terminate at the ceiling.
    assert_abs_diff_eq!(axis.label_rotation_deg(), 50.0);
    assert!(size.width.is_finite() && size.height.is_finite());
}

#[test]
fn inverted_rotation_bounds_degrade_by_swapping() {
    let surface = surface();
    let mut options = AxisOptions::default();
    options.min_rotation_deg = 60.0;
    options.max_rotation_deg = 50.0;
    let mut axis = Axis::with_options("a", Edge::Bottom, options);
    axis.set_ticks(vec![Tick::new(0.0, "February"), Tick::new(1.0, "x")]);
    let size = fit(&mut axis, 400.0, 300.0, Padding::zero(), &surface);

    // The pair is reordered, so the search starts at the true floor.
    assert_abs_diff_eq!(axis.label_rotation_deg(), 50.0);
    assert!(size.width.is_finite() && size.height.is_finite());
}

#[test]
fn non_finite_rotation_bounds_collapse_to_zero() {
    let surface = surface();
    let mut options = AxisOptions::default();
    options.min_rotation_deg = f64::NAN;
    options.max_rotation_deg = f64::NAN;
    let mut axis = Axis::with_options("a", Edge::Bottom, options);
    axis.set_ticks(vec![Tick::new(0.0, "February"), Tick::new(1.0, "x")]);
    fit(&mut axis, 400.0, 300.0, Padding::zero(), &surface);
    assert_eq!(axis.label_rotation_deg(), 0.0);
}

#[test]
fn unlabeled_ticks_still_occupy_pitch_slots() {
    let surface = surface();
    let mut axis = Axis::new("a", Edge::Bottom);
    let mut ticks = vec![Tick::new(0.0, "February")];
    ticks.extend((1..10).map(|index| Tick::unlabeled(index as f64)));
    ticks.push(Tick::new(10.0, "February"));
    axis.set_ticks(ticks);

    // Eleven slots over 200px leave a 14px pitch; two labels over the same
    // span would leave 194px and no rotation at all.
    fit(&mut axis, 200.0, 300.0, Padding::zero(), &surface);
    assert_abs_diff_eq!(axis.label_rotation_deg(), 50.0);
}

#[test]
fn unlabeled_ticks_are_neither_measured_nor_drawn() {
    let surface = surface();
    let mut with_gap = Axis::new("a", Edge::Bottom);
    with_gap.set_ticks(vec![
        Tick::new(0.0, "a"),
        Tick::unlabeled(1.0),
        Tick::new(2.0, "b"),
    ]);
    let mut dense = labeled_axis(Edge::Bottom, &["a", "b"]);

    let gap_size = fit(&mut with_gap, 400.0, 300.0, Padding::zero(), &surface);
    let dense_size = fit(&mut dense, 400.0, 300.0, Padding::zero(), &surface);
    assert_eq!(gap_size, dense_size);
    assert_eq!(with_gap.label_rotation_deg(), dense.label_rotation_deg());
}

#[test]
fn axis_with_no_labels_contributes_only_tick_marks() {
    let surface = surface();
    let mut axis = Axis::new("a", Edge::Bottom);
    axis.set_ticks(vec![Tick::unlabeled(0.0), Tick::unlabeled(1.0)]);
    let size = fit(&mut axis, 400.0, 300.0, Padding::zero(), &surface);
    assert_abs_diff_eq!(size.height, axis.options().tick_mark_length_px);
    assert_abs_diff_eq!(size.width, 400.0);
}

#[test]
fn vertical_axis_width_covers_tick_marks_and_widest_label() {
    let surface = surface();
    let mut axis = labeled_axis(Edge::Left, &["10", "1000000"]);
    let size = fit(&mut axis, 400.0, 300.0, Padding::zero(), &surface);

    let widest = surface.measure_text(&FontSpec::default(), "1000000");
    assert_abs_diff_eq!(size.width, axis.options().tick_mark_length_px + widest);
    assert_abs_diff_eq!(size.height, 300.0);
}

#[test]
fn hidden_axis_takes_no_space() {
    let surface = surface();
    let mut options = AxisOptions::default();
    options.display = false;
    let mut axis = Axis::with_options("a", Edge::Bottom, options);
    axis.set_ticks(vec![Tick::new(0.0, "February")]);
    let size = fit(&mut axis, 400.0, 300.0, Padding::zero(), &surface);
    assert_eq!(size, chartcore::core::Size::zero());
}

#[test]
fn final_size_never_exceeds_the_candidate_box() {
    let surface = surface();
    let mut axis = labeled_axis(
        Edge::Bottom,
        &["a very long label indeed", "another very long one"],
    );
    let size = fit(&mut axis, 80.0, 12.0, Padding::zero(), &surface);
    assert!(size.width <= 80.0);
    assert!(size.height <= 12.0);
}

#[test]
fn margins_subtract_from_padding_floored_at_zero() {
    let surface = surface();
    let mut axis = labeled_axis(Edge::Bottom, &["February", "x"]);
    let margins = Padding {
        left: 1000.0,
        right: 1.0,
        ..Padding::zero()
    };
    fit(&mut axis, 400.0, 300.0, margins, &surface);

    let padding = axis.padding();
    assert_eq!(padding.left, 0.0);
    let unclamped_right = surface.measure_text(&FontSpec::default(), "x") / 2.0 - 1.0;
    assert_abs_diff_eq!(padding.right, unclamped_right.max(0.0), epsilon = 1e-9);
}

struct NanSurface;

impl MeasurementSurface for NanSurface {
    fn measure_text(&self, _font: &FontSpec, _text: &str) -> f64 {
        f64::NAN
    }

    fn available_width(&self) -> f64 {
        f64::NAN
    }

    fn available_height(&self) -> f64 {
        f64::NAN
    }
}

#[test]
fn non_finite_measurements_degrade_to_zero_instead_of_aborting() {
    let mut axis = labeled_axis(Edge::Bottom, &["February", "x"]);
    let size = fit(&mut axis, 400.0, 300.0, Padding::zero(), &NanSurface);
    assert!(size.width.is_finite());
    assert!(size.height.is_finite());
    assert_eq!(axis.padding().left, 0.0);
    assert_eq!(axis.padding().right, 0.0);
    // Zero-width labels fit any pitch, so no rotation is needed.
    assert_eq!(axis.label_rotation_deg(), 0.0);
}
