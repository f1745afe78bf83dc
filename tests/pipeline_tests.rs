use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_abs_diff_eq;
use chartcore::animation::AnimationScheduler;
use chartcore::core::{ChartId, DataPoint, Edge, Point, Size};
use chartcore::layout::Axis;
use chartcore::measure::{GlyphEstimateSurface, NullSurface};
use chartcore::pipeline::{
    ChartObserver, ChartRegistry, Dataset, ObserverContext, PipelineEvent, PointerEvent,
    PointerEventKind,
};
use chartcore::{ChartController, ChartError, ChartOptions};

fn instant_options() -> ChartOptions {
    let mut options = ChartOptions::default();
    options.animation.duration_ms = 0.0;
    options
}

fn build_chart(options: ChartOptions) -> (ChartController<GlyphEstimateSurface>, AnimationScheduler) {
    let mut chart = ChartController::new(
        ChartId::from_raw(1),
        GlyphEstimateSurface::new(400.0, 300.0),
        options,
    );
    chart.add_axis(Axis::new("x", Edge::Bottom));
    chart.add_axis(Axis::new("y", Edge::Left));
    chart.add_dataset(Dataset::new(
        "series",
        vec![
            DataPoint::new(0.0, 0.0),
            DataPoint::new(5.0, 50.0),
            DataPoint::new(10.0, 100.0),
        ],
    ));
    (chart, AnimationScheduler::new())
}

fn element_center(chart: &ChartController<GlyphEstimateSurface>, x: f64, y: f64) -> Point {
    let area = chart.chart_area();
    let px = chart.axis("x").map(|axis| axis.pixel_for_value(x, area));
    let py = chart.axis("y").map(|axis| axis.pixel_for_value(y, area));
    Point::new(px.unwrap(), py.unwrap())
}

fn hover(chart: &mut ChartController<GlyphEstimateSurface>, scheduler: &mut AnimationScheduler, at: Point) -> bool {
    chart.pointer_event(
        PointerEvent {
            kind: PointerEventKind::Move,
            position: at,
        },
        scheduler,
    )
}

#[test]
fn update_produces_a_usable_chart_area_and_one_draw() {
    let (mut chart, mut scheduler) = build_chart(instant_options());
    chart.update(&mut scheduler);

    let area = chart.chart_area();
    assert!(area.width() > 0.0 && area.height() > 0.0);
    assert!(area.width() < 400.0, "left axis takes horizontal space");
    assert!(area.height() < 300.0, "bottom axis takes vertical space");
    assert_eq!(chart.draw_count(), 1);
    assert_abs_diff_eq!(chart.last_progress(), 1.0);
    assert!(scheduler.is_idle());
}

#[test]
fn repeated_updates_are_idempotent() {
    let (mut chart, mut scheduler) = build_chart(instant_options());
    chart.update(&mut scheduler);
    let first_area = chart.chart_area();
    let first_rotation = chart.axis("x").map(Axis::label_rotation_deg);

    chart.update(&mut scheduler);
    assert_eq!(chart.chart_area(), first_area);
    assert_eq!(chart.axis("x").map(Axis::label_rotation_deg), first_rotation);
}

#[test]
fn event_batch_coalesces_renders_into_one_trailing_draw() {
    let (mut chart, mut scheduler) = build_chart(instant_options());
    chart.update(&mut scheduler);
    assert_eq!(chart.draw_count(), 1);

    chart.begin_event_batch();
    chart.update(&mut scheduler);
    chart.update(&mut scheduler);
    chart.update(&mut scheduler);
    assert_eq!(chart.draw_count(), 1, "renders buffer during the batch");
    chart.end_event_batch(&mut scheduler);
    assert_eq!(chart.draw_count(), 2, "exactly one trailing render fires");
}

#[test]
fn empty_batch_fires_no_render() {
    let (mut chart, mut scheduler) = build_chart(instant_options());
    chart.begin_event_batch();
    chart.end_event_batch(&mut scheduler);
    assert_eq!(chart.draw_count(), 0);
}

#[test]
fn detached_chart_is_inert_but_inspectable() {
    let mut chart = ChartController::new(
        ChartId::from_raw(9),
        NullSurface,
        ChartOptions::default(),
    );
    let mut scheduler = AnimationScheduler::new();
    chart.add_axis(Axis::new("x", Edge::Bottom));
    chart.add_dataset(Dataset::new("s", vec![DataPoint::new(1.0, 1.0)]));

    assert!(!chart.is_attached());
    chart.update(&mut scheduler);
    chart.draw(1.0);
    assert_eq!(chart.draw_count(), 0);
    assert!(scheduler.is_idle());
    let changed = chart.pointer_event(
        PointerEvent {
            kind: PointerEventKind::Move,
            position: Point::new(1.0, 1.0),
        },
        &mut scheduler,
    );
    assert!(!changed);
    // Identifying state stays readable.
    assert_eq!(chart.id(), ChartId::from_raw(9));
    assert_eq!(chart.dataset_count(), 1);
}

#[test]
fn dangling_axis_id_degrades_that_dataset_to_a_no_op() {
    let (mut chart, mut scheduler) = build_chart(instant_options());
    chart.add_dataset(Dataset::new("orphan", vec![DataPoint::new(5.0, 50.0)]).with_axes("x", "nope"));
    chart.update(&mut scheduler);

    // The bound dataset still resolves; the orphan contributes no elements.
    let at = element_center(&chart, 5.0, 50.0);
    assert!(hover(&mut chart, &mut scheduler, at));
    for active in chart.active_elements() {
        assert_eq!(active.dataset_index, 0);
    }
}

#[test]
fn datasets_without_axis_ids_bind_to_the_first_axes() {
    let (mut chart, mut scheduler) = build_chart(instant_options());
    chart.update(&mut scheduler);
    assert_eq!(chart.dataset(0).map(|d| d.x_axis_id.as_str()), Some("x"));
    assert_eq!(chart.dataset(0).map(|d| d.y_axis_id.as_str()), Some("y"));
}

#[test]
fn hover_activates_elements_and_builds_the_tooltip() {
    let (mut chart, mut scheduler) = build_chart(instant_options());
    chart.update(&mut scheduler);
    assert_abs_diff_eq!(chart.tooltip().opacity, 0.0);

    let at = element_center(&chart, 5.0, 50.0);
    assert!(hover(&mut chart, &mut scheduler, at));
    assert_eq!(chart.active_elements().len(), 1);

    let tooltip = chart.tooltip();
    assert_abs_diff_eq!(tooltip.opacity, 1.0);
    assert_eq!(tooltip.content.title, vec!["5".to_owned()]);
    assert_eq!(tooltip.content.body, vec!["series: 50".to_owned()]);
    assert!(tooltip.x >= 0.0 && tooltip.x + tooltip.width <= 400.0);
    assert!(tooltip.y >= 0.0 && tooltip.y + tooltip.height <= 300.0);
}

#[test]
fn unchanged_hover_reports_no_change() {
    let (mut chart, mut scheduler) = build_chart(instant_options());
    chart.update(&mut scheduler);
    let at = element_center(&chart, 5.0, 50.0);
    assert!(hover(&mut chart, &mut scheduler, at));
    let draws = chart.draw_count();

    assert!(!hover(&mut chart, &mut scheduler, at));
    assert_eq!(chart.draw_count(), draws, "no redraw without a change");
}

#[test]
fn pointer_leave_clears_the_selection_and_hides_the_tooltip() {
    let (mut chart, mut scheduler) = build_chart(instant_options());
    chart.update(&mut scheduler);
    let at = element_center(&chart, 5.0, 50.0);
    assert!(hover(&mut chart, &mut scheduler, at));
    let visible_size = (chart.tooltip().width, chart.tooltip().height);

    let changed = chart.pointer_event(
        PointerEvent {
            kind: PointerEventKind::Leave,
            position: at,
        },
        &mut scheduler,
    );
    assert!(changed);
    assert!(chart.active_elements().is_empty());
    assert_abs_diff_eq!(chart.tooltip().opacity, 0.0);
    assert_eq!((chart.tooltip().width, chart.tooltip().height), visible_size);
}

#[test]
fn lazy_hover_render_yields_to_the_inflight_animation() {
    let mut options = ChartOptions::default();
    options.animation.duration_ms = 1000.0;
    let (mut chart, mut scheduler) = build_chart(options);
    chart.update(&mut scheduler);

    let task_steps = scheduler.task_for(chart.id()).map(|t| t.total_steps());
    assert_eq!(task_steps, Some(60));

    let at = element_center(&chart, 5.0, 50.0);
    assert!(hover(&mut chart, &mut scheduler, at));
    // Still the same task: the hover's lazy render did not restart it.
    assert_eq!(scheduler.task_count(), 1);
    assert_eq!(
        scheduler.task_for(chart.id()).map(|t| t.total_steps()),
        Some(60)
    );
}

#[test]
fn resize_to_zero_detaches_and_back_reattaches() {
    let (mut chart, mut scheduler) = build_chart(instant_options());
    chart.update(&mut scheduler);

    chart.resize(Size::new(0.0, 300.0), &mut scheduler).unwrap();
    assert!(!chart.is_attached());
    let draws = chart.draw_count();
    chart.update(&mut scheduler);
    assert_eq!(chart.draw_count(), draws);

    chart.resize(Size::new(200.0, 150.0), &mut scheduler).unwrap();
    assert!(chart.is_attached());
    assert_eq!(chart.canvas(), Size::new(200.0, 150.0));
    assert!(chart.chart_area().width() < 200.0);
}

#[test]
fn contract_violations_surface_as_errors() {
    let (mut chart, mut scheduler) = build_chart(instant_options());
    chart.update(&mut scheduler);

    assert!(matches!(
        chart.resize(Size::new(f64::NAN, 100.0), &mut scheduler),
        Err(ChartError::InvalidCanvas { .. })
    ));
    assert!(matches!(
        chart.resize(Size::new(-1.0, 100.0), &mut scheduler),
        Err(ChartError::InvalidCanvas { .. })
    ));
    assert!(chart.is_attached(), "a rejected resize changes nothing");

    assert!(matches!(
        chart.set_data(7, vec![]),
        Err(ChartError::UnknownDataset(7))
    ));
    assert!(matches!(
        chart.set_dataset_visible(7, false),
        Err(ChartError::UnknownDataset(7))
    ));
    assert!(matches!(
        chart.bind_dataset_axes(0, "x", "nope"),
        Err(ChartError::UnknownAxis(_))
    ));
    assert_eq!(
        chart.dataset(0).map(|d| d.y_axis_id.as_str()),
        Some("y"),
        "a rejected binding leaves the dataset untouched"
    );

    chart.bind_dataset_axes(0, "x", "y").unwrap();
    chart.set_data(0, vec![DataPoint::new(1.0, 2.0)]).unwrap();
    chart.set_dataset_visible(0, true).unwrap();
}

struct RecordingObserver {
    log: Rc<RefCell<Vec<PipelineEvent>>>,
}

impl ChartObserver for RecordingObserver {
    fn on_event(&mut self, event: PipelineEvent, _context: ObserverContext) {
        self.log.borrow_mut().push(event);
    }
}

#[test]
fn observers_see_pipeline_checkpoints_in_stage_order() {
    let (mut chart, mut scheduler) = build_chart(instant_options());
    let log = Rc::new(RefCell::new(Vec::new()));
    chart.add_observer(Box::new(RecordingObserver { log: Rc::clone(&log) }));

    chart.update(&mut scheduler);

    let events = log.borrow();
    assert_eq!(
        events.as_slice(),
        &[
            PipelineEvent::BeforeUpdate,
            PipelineEvent::BeforeLayout,
            PipelineEvent::AfterLayout,
            PipelineEvent::AfterUpdate,
            PipelineEvent::BeforeDatasetsDraw { progress: 1.0 },
            PipelineEvent::AfterDatasetsDraw { progress: 1.0 },
        ]
    );
}

#[test]
fn registry_drives_multiple_charts_on_one_clock() {
    let mut registry: ChartRegistry<GlyphEstimateSurface> = ChartRegistry::new();
    let mut ids = Vec::new();
    for _ in 0..2 {
        let id = registry.create(GlyphEstimateSurface::new(400.0, 300.0), ChartOptions::default());
        let chart = registry.chart_mut(id).unwrap();
        chart.add_axis(Axis::new("x", Edge::Bottom));
        chart.add_axis(Axis::new("y", Edge::Left));
        chart.add_dataset(Dataset::new("s", vec![DataPoint::new(0.0, 0.0), DataPoint::new(1.0, 1.0)]));
        ids.push(id);
    }

    for id in &ids {
        assert!(registry.update(*id));
    }
    assert!(registry.needs_frame());

    let mut frames = 0;
    while registry.needs_frame() {
        assert_eq!(registry.render_frame(), 2, "both charts draw every frame");
        frames += 1;
        assert!(frames <= 60);
    }
    assert_eq!(frames, 60);
    for id in &ids {
        let chart = registry.chart(*id).unwrap();
        assert_eq!(chart.draw_count(), 60);
        assert_abs_diff_eq!(chart.last_progress(), 1.0, epsilon = 1e-9);
    }
}

#[test]
fn destroying_a_chart_cancels_its_animation() {
    let mut registry: ChartRegistry<GlyphEstimateSurface> = ChartRegistry::new();
    let id = registry.create(GlyphEstimateSurface::new(400.0, 300.0), ChartOptions::default());
    let chart = registry.chart_mut(id).unwrap();
    chart.add_axis(Axis::new("x", Edge::Bottom));
    chart.add_axis(Axis::new("y", Edge::Left));
    chart.add_dataset(Dataset::new("s", vec![DataPoint::new(0.0, 0.0)]));
    registry.update(id);
    assert!(registry.needs_frame());

    assert!(registry.destroy(id));
    assert!(!registry.needs_frame());
    assert!(registry.chart(id).is_none());
    assert!(!registry.destroy(id));
    assert!(registry.is_empty());
}
