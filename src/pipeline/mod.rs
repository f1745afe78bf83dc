//! Update/render pipeline: the chart controller core.
//!
//! Orchestrates the staged lifecycle
//! `beforeUpdate -> ensure-axis-ids -> rebuild-dataset-controllers ->
//! rebuild-scales -> layout -> reset-new-elements -> per-dataset-update ->
//! afterUpdate -> render`, coalesces update bursts into a single trailing
//! render, and routes animation frames into dataset draws.

pub mod dataset;
pub mod observer;
pub mod registry;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::animation::{AnimationScheduler, AnimationTask};
use crate::core::{ChartId, DataPoint, Easing, Padding, Point, Rect, Size, format_tick_value};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{
    ActiveElementSet, ElementSource, InteractionOptions, SelectionMode, resolve,
};
use crate::layout::{Axis, FixedBox, LayoutBox, negotiate};
use crate::measure::{MeasurementSurface, sanitize_measurement};
use crate::tooltip::{self, TooltipContent, TooltipModel, TooltipOptions};

pub use dataset::{DatasetContext, DatasetController, ElementGeometry, ScatterController};
pub use observer::{ChartObserver, ObserverContext, PipelineEvent};
pub use registry::ChartRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationOptions {
    #[serde(default = "default_duration_ms")]
    pub duration_ms: f64,
    #[serde(default)]
    pub easing: Easing,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            easing: Easing::default(),
        }
    }
}

fn default_duration_ms() -> f64 {
    1000.0
}

/// Chart bootstrap configuration.
///
/// Serializable so host applications can persist/load chart setup without
/// inventing their own ad-hoc format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    #[serde(default)]
    pub animation: AnimationOptions,
    #[serde(default)]
    pub interaction: InteractionOptions,
    #[serde(default)]
    pub tooltip: TooltipOptions,
    /// Outer padding between the canvas edge and negotiated layout boxes.
    #[serde(default)]
    pub layout_padding: Padding,
    #[serde(default = "default_hit_radius")]
    pub hit_radius: f64,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            animation: AnimationOptions::default(),
            interaction: InteractionOptions::default(),
            tooltip: TooltipOptions::default(),
            layout_padding: Padding::zero(),
            hit_radius: default_hit_radius(),
        }
    }
}

fn default_hit_radius() -> f64 {
    4.0
}

/// Latest requested render parameters, kept while a burst is buffered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub duration_ms: f64,
    /// A lazy render yields to an animation already in flight instead of
    /// restarting it.
    pub lazy: bool,
}

/// Re-entrant update coalescing as an explicit state machine: while handling
/// a burst of input events, `update` calls store their render request here
/// and exactly one render fires when the burst ends.
#[derive(Debug, Clone, Copy, PartialEq)]
enum RenderGate {
    Idle,
    Buffering(Option<RenderRequest>),
}

/// Dataset description supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub x_axis_id: String,
    pub y_axis_id: String,
    pub data: Vec<DataPoint>,
    pub visible: bool,
}

struct DatasetSlot {
    meta: Dataset,
    controller: Option<Box<dyn DatasetController>>,
}

/// One chart instance: owns its axes, datasets, active element set, tooltip
/// model, and content-area rectangle.
pub struct ChartController<S: MeasurementSurface> {
    id: ChartId,
    surface: S,
    options: ChartOptions,
    canvas: Size,
    pixel_ratio: f64,
    attached: bool,
    axes: IndexMap<String, Axis>,
    datasets: Vec<DatasetSlot>,
    boxes: Vec<FixedBox>,
    chart_area: Rect,
    active: ActiveElementSet,
    tooltip: TooltipModel,
    observers: Vec<Box<dyn ChartObserver>>,
    render_gate: RenderGate,
    draw_count: u64,
    last_progress: f64,
}

/// Pointer/input event kinds delivered by the host input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerEventKind {
    Move,
    Leave,
    Click,
    Press,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub position: Point,
}

impl<S: MeasurementSurface> ChartController<S> {
    /// Creates a chart bound to `surface`.
    ///
    /// A surface with no usable area leaves the instance detached: minimal
    /// identifying state is recorded and every pipeline operation becomes a
    /// no-op, but the instance stays inspectable. Never panics.
    pub fn new(id: ChartId, surface: S, options: ChartOptions) -> Self {
        let width = sanitize_measurement(surface.available_width());
        let height = sanitize_measurement(surface.available_height());
        let ratio = surface.pixel_ratio();
        let attached = width > 0.0 && height > 0.0;
        if !attached {
            debug!(chart = id.raw(), "no valid drawing target; chart is inert");
        }
        Self {
            id,
            surface,
            options,
            canvas: Size::new(width, height),
            pixel_ratio: if ratio.is_finite() && ratio > 0.0 {
                ratio
            } else {
                1.0
            },
            attached,
            axes: IndexMap::new(),
            datasets: Vec::new(),
            boxes: Vec::new(),
            chart_area: Rect::default(),
            active: ActiveElementSet::new(),
            tooltip: TooltipModel::default(),
            observers: Vec::new(),
            render_gate: RenderGate::Idle,
            draw_count: 0,
            last_progress: 0.0,
        }
    }

    #[must_use]
    pub fn id(&self) -> ChartId {
        self.id
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    #[must_use]
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    #[must_use]
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    #[must_use]
    pub fn chart_area(&self) -> Rect {
        self.chart_area
    }

    #[must_use]
    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut ChartOptions {
        &mut self.options
    }

    #[must_use]
    pub fn tooltip(&self) -> &TooltipModel {
        &self.tooltip
    }

    #[must_use]
    pub fn active_elements(&self) -> &ActiveElementSet {
        &self.active
    }

    #[must_use]
    pub fn draw_count(&self) -> u64 {
        self.draw_count
    }

    #[must_use]
    pub fn last_progress(&self) -> f64 {
        self.last_progress
    }

    pub fn add_axis(&mut self, axis: Axis) {
        self.axes.insert(axis.id().to_owned(), axis);
    }

    #[must_use]
    pub fn axis(&self, id: &str) -> Option<&Axis> {
        self.axes.get(id)
    }

    #[must_use]
    pub fn axes(&self) -> impl Iterator<Item = &Axis> {
        self.axes.values()
    }

    /// Registers a fixed-size layout participant (legend, title).
    pub fn add_box(&mut self, layout_box: FixedBox) {
        self.boxes.push(layout_box);
    }

    #[must_use]
    pub fn boxes(&self) -> &[FixedBox] {
        &self.boxes
    }

    pub fn add_observer(&mut self, observer: Box<dyn ChartObserver>) {
        self.observers.push(observer);
    }

    /// Adds a dataset using the built-in scatter controller.
    pub fn add_dataset(&mut self, dataset: Dataset) -> usize {
        self.datasets.push(DatasetSlot {
            meta: dataset,
            controller: None,
        });
        self.datasets.len() - 1
    }

    /// Adds a dataset driven by a host-provided controller.
    pub fn add_dataset_with_controller(
        &mut self,
        dataset: Dataset,
        controller: Box<dyn DatasetController>,
    ) -> usize {
        self.datasets.push(DatasetSlot {
            meta: dataset,
            controller: Some(controller),
        });
        self.datasets.len() - 1
    }

    #[must_use]
    pub fn dataset(&self, index: usize) -> Option<&Dataset> {
        self.datasets.get(index).map(|slot| &slot.meta)
    }

    #[must_use]
    pub fn dataset_count(&self) -> usize {
        self.datasets.len()
    }

    pub fn set_data(&mut self, dataset_index: usize, data: Vec<DataPoint>) -> ChartResult<()> {
        let slot = self
            .datasets
            .get_mut(dataset_index)
            .ok_or(ChartError::UnknownDataset(dataset_index))?;
        slot.meta.data = data;
        Ok(())
    }

    pub fn set_dataset_visible(&mut self, dataset_index: usize, visible: bool) -> ChartResult<()> {
        let slot = self
            .datasets
            .get_mut(dataset_index)
            .ok_or(ChartError::UnknownDataset(dataset_index))?;
        slot.meta.visible = visible;
        Ok(())
    }

    /// Re-binds a dataset to different axes, validating both ids up front so
    /// the dataset never ends up half-bound.
    pub fn bind_dataset_axes(
        &mut self,
        dataset_index: usize,
        x_axis_id: &str,
        y_axis_id: &str,
    ) -> ChartResult<()> {
        for id in [x_axis_id, y_axis_id] {
            if !self.axes.contains_key(id) {
                return Err(ChartError::UnknownAxis(id.to_owned()));
            }
        }
        let slot = self
            .datasets
            .get_mut(dataset_index)
            .ok_or(ChartError::UnknownDataset(dataset_index))?;
        slot.meta.x_axis_id = x_axis_id.to_owned();
        slot.meta.y_axis_id = y_axis_id.to_owned();
        Ok(())
    }

    /// Runs the staged update cycle, then requests a render.
    ///
    /// Stage order is fixed; notably, freshly created controllers are reset
    /// only after layout so their zero state is computed against valid axis
    /// pixel mappings, never stale geometry.
    pub fn update(&mut self, scheduler: &mut AnimationScheduler) {
        if !self.attached {
            return;
        }
        self.notify(PipelineEvent::BeforeUpdate);
        self.ensure_axis_ids();
        let fresh = self.rebuild_controllers();
        self.rebuild_scales();
        self.run_layout();
        self.reset_controllers(&fresh);
        self.update_datasets();
        self.rebuild_tooltip(None);
        self.notify(PipelineEvent::AfterUpdate);
        self.render_with(
            RenderRequest {
                duration_ms: self.options.animation.duration_ms,
                lazy: false,
            },
            scheduler,
        );
    }

    /// Requests a render directly, bypassing the update stages.
    pub fn render(&mut self, duration_ms: f64, lazy: bool, scheduler: &mut AnimationScheduler) {
        self.render_with(RenderRequest { duration_ms, lazy }, scheduler);
    }

    fn render_with(&mut self, request: RenderRequest, scheduler: &mut AnimationScheduler) {
        if !self.attached {
            return;
        }
        if let RenderGate::Buffering(pending) = &mut self.render_gate {
            // Coalesce: keep only the latest request from the burst.
            *pending = Some(request);
            return;
        }
        if request.lazy && scheduler.task_for(self.id).is_some() {
            return;
        }
        if request.duration_ms.is_finite() && request.duration_ms > 0.0 {
            scheduler.schedule(AnimationTask::new(
                self.id,
                request.duration_ms,
                self.options.animation.easing,
            ));
        } else {
            self.draw(1.0);
        }
    }

    /// Draws all visible datasets at the given eased progress.
    pub fn draw(&mut self, eased_progress: f64) {
        if !self.attached {
            return;
        }
        self.notify(PipelineEvent::BeforeDatasetsDraw {
            progress: eased_progress,
        });
        for slot in &mut self.datasets {
            if !slot.meta.visible {
                continue;
            }
            if let Some(controller) = slot.controller.as_mut() {
                controller.draw(eased_progress);
            }
        }
        self.draw_count += 1;
        self.last_progress = eased_progress;
        self.notify(PipelineEvent::AfterDatasetsDraw {
            progress: eased_progress,
        });
    }

    /// Enters the buffering state: render requests from subsequent `update`
    /// calls coalesce until [`Self::end_event_batch`].
    pub fn begin_event_batch(&mut self) {
        if self.render_gate == RenderGate::Idle {
            self.render_gate = RenderGate::Buffering(None);
        }
    }

    /// Leaves the buffering state, firing at most one trailing render.
    pub fn end_event_batch(&mut self, scheduler: &mut AnimationScheduler) {
        let gate = std::mem::replace(&mut self.render_gate, RenderGate::Idle);
        if let RenderGate::Buffering(Some(request)) = gate {
            self.render_with(request, scheduler);
        }
    }

    /// Applies a new canvas size and re-runs the update cycle.
    ///
    /// A zero-sized canvas is a legitimate state (the chart detaches and goes
    /// inert); a non-finite or negative one is a host contract violation.
    pub fn resize(&mut self, new_size: Size, scheduler: &mut AnimationScheduler) -> ChartResult<()> {
        let Size { width, height } = new_size;
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(ChartError::InvalidCanvas { width, height });
        }
        self.canvas = new_size;
        self.attached = width > 0.0 && height > 0.0;
        self.notify(PipelineEvent::Resized { width, height });
        if self.attached {
            self.update(scheduler);
        }
        Ok(())
    }

    /// Resolves a pointer event into the active element set.
    ///
    /// Returns true when the active set changed (order-and-content sensitive
    /// comparison), in which case the tooltip model has been rebuilt and a
    /// lazy render was requested.
    pub fn pointer_event(
        &mut self,
        event: PointerEvent,
        scheduler: &mut AnimationScheduler,
    ) -> bool {
        if !self.attached {
            return false;
        }
        let next = match event.kind {
            PointerEventKind::Leave => ActiveElementSet::new(),
            _ => self.get_elements_at(
                event.position,
                self.options.interaction.mode,
                self.options.interaction.intersect,
            ),
        };
        if next == self.active {
            return false;
        }
        self.active = next;
        self.rebuild_tooltip(Some(event.position));
        self.render_with(
            RenderRequest {
                duration_ms: self.options.animation.duration_ms,
                lazy: true,
            },
            scheduler,
        );
        true
    }

    /// Public query API mirroring the interaction resolver.
    #[must_use]
    pub fn get_elements_at(
        &self,
        position: Point,
        mode: SelectionMode,
        intersect: bool,
    ) -> ActiveElementSet {
        let sources: Vec<ElementSource<'_>> = self
            .datasets
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.meta.visible)
            .filter_map(|(dataset_index, slot)| {
                slot.controller.as_ref().map(|controller| ElementSource {
                    dataset_index,
                    elements: controller.elements(),
                })
            })
            .collect();
        resolve(
            &sources,
            position,
            mode,
            intersect,
            self.options.interaction.axis,
        )
    }

    fn notify(&mut self, event: PipelineEvent) {
        let context = ObserverContext {
            chart: self.id,
            canvas: self.canvas,
            chart_area: self.chart_area,
            dataset_count: self.datasets.len(),
            active_count: self.active.len(),
        };
        for observer in &mut self.observers {
            observer.on_event(event, context);
        }
    }

    /// Defaults empty dataset axis references to the first axis on the
    /// matching orientation.
    fn ensure_axis_ids(&mut self) {
        let first_x = self
            .axes
            .values()
            .find(|axis| axis.edge().is_horizontal())
            .map(|axis| axis.id().to_owned());
        let first_y = self
            .axes
            .values()
            .find(|axis| !axis.edge().is_horizontal())
            .map(|axis| axis.id().to_owned());
        for slot in &mut self.datasets {
            if slot.meta.x_axis_id.is_empty() {
                if let Some(id) = &first_x {
                    slot.meta.x_axis_id.clone_from(id);
                }
            }
            if slot.meta.y_axis_id.is_empty() {
                if let Some(id) = &first_y {
                    slot.meta.y_axis_id.clone_from(id);
                }
            }
        }
    }

    /// Reuses existing controllers (reindexing them) and constructs missing
    /// ones; returns the indices of freshly constructed controllers so they
    /// can be reset after layout.
    fn rebuild_controllers(&mut self) -> Vec<usize> {
        let hit_radius = self.options.hit_radius;
        let mut fresh = Vec::new();
        for (index, slot) in self.datasets.iter_mut().enumerate() {
            match slot.controller.as_mut() {
                Some(controller) => controller.reindex(index),
                None => {
                    slot.controller = Some(Box::new(ScatterController::new(index, hit_radius)));
                    fresh.push(index);
                }
            }
        }
        fresh
    }

    /// Scans visible datasets for each axis's data range and regenerates ticks.
    fn rebuild_scales(&mut self) {
        for axis in self.axes.values_mut() {
            let horizontal = axis.edge().is_horizontal();
            let id = axis.id().to_owned();
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for slot in &self.datasets {
                if !slot.meta.visible {
                    continue;
                }
                let bound_here = if horizontal {
                    slot.meta.x_axis_id == id
                } else {
                    slot.meta.y_axis_id == id
                };
                if !bound_here {
                    continue;
                }
                for point in &slot.meta.data {
                    if !point.is_finite() {
                        continue;
                    }
                    let value = if horizontal { point.x } else { point.y };
                    min = min.min(value);
                    max = max.max(value);
                }
            }
            if min.is_finite() {
                axis.rebuild(min, max);
            } else {
                axis.rebuild(f64::NAN, f64::NAN);
            }
        }
    }

    fn run_layout(&mut self) {
        self.notify(PipelineEvent::BeforeLayout);
        let chart_rect = Rect::from_origin_size(Point::new(0.0, 0.0), self.canvas)
            .shrunk_by(self.options.layout_padding);
        let mut participants: Vec<&mut dyn LayoutBox> = Vec::new();
        for axis in self.axes.values_mut() {
            participants.push(axis);
        }
        for layout_box in &mut self.boxes {
            participants.push(layout_box);
        }
        let result = negotiate(chart_rect, &mut participants, &self.surface);
        self.chart_area = result.chart_area;
        self.notify(PipelineEvent::AfterLayout);
    }

    fn dataset_context<'a>(
        axes: &'a IndexMap<String, Axis>,
        chart_area: Rect,
        dataset_index: usize,
        meta: &'a Dataset,
    ) -> DatasetContext<'a> {
        DatasetContext {
            dataset_index,
            data: &meta.data,
            x_axis: axes.get(&meta.x_axis_id),
            y_axis: axes.get(&meta.y_axis_id),
            chart_area,
        }
    }

    fn reset_controllers(&mut self, fresh: &[usize]) {
        for &index in fresh {
            let Some(slot) = self.datasets.get_mut(index) else {
                continue;
            };
            let context =
                Self::dataset_context(&self.axes, self.chart_area, index, &slot.meta);
            if let Some(controller) = slot.controller.as_mut() {
                controller.reset(&context);
            }
        }
    }

    fn update_datasets(&mut self) {
        for (index, slot) in self.datasets.iter_mut().enumerate() {
            if !slot.meta.visible {
                continue;
            }
            let context = Self::dataset_context(&self.axes, self.chart_area, index, &slot.meta);
            if let Some(controller) = slot.controller.as_mut() {
                controller.update(&context);
            }
        }
    }

    /// Anchor for the tooltip caret: the mean center of the active elements.
    fn active_anchor(&self) -> Option<Point> {
        if self.active.is_empty() {
            return None;
        }
        let mut sum = Point::default();
        let mut count = 0.0;
        for active in &self.active {
            let Some(slot) = self.datasets.get(active.dataset_index) else {
                continue;
            };
            let Some(controller) = slot.controller.as_ref() else {
                continue;
            };
            if let Some(element) = controller.elements().get(active.element_index) {
                sum.x += element.center.x;
                sum.y += element.center.y;
                count += 1.0;
            }
        }
        if count > 0.0 {
            Some(Point::new(sum.x / count, sum.y / count))
        } else {
            None
        }
    }

    fn tooltip_content(&self) -> TooltipContent {
        let mut content = TooltipContent::default();
        for (position, active) in self.active.iter().enumerate() {
            let Some(slot) = self.datasets.get(active.dataset_index) else {
                continue;
            };
            let Some(point) = slot.meta.data.get(active.element_index) else {
                continue;
            };
            if position == 0 {
                content.title.push(format_tick_value(point.x));
            }
            content
                .body
                .push(format!("{}: {}", slot.meta.label, format_tick_value(point.y)));
        }
        content
    }

    /// Rebuilt on every update, even with no active elements, so fades have a
    /// stable endpoint.
    fn rebuild_tooltip(&mut self, pointer: Option<Point>) {
        let anchor = self.active_anchor().or(pointer);
        let content = self.tooltip_content();
        self.tooltip = tooltip::build_model(
            &self.tooltip,
            anchor,
            content,
            &self.options.tooltip,
            self.chart_area,
            self.canvas,
            &self.surface,
        );
    }
}

impl Dataset {
    #[must_use]
    pub fn new(label: impl Into<String>, data: Vec<DataPoint>) -> Self {
        Self {
            label: label.into(),
            x_axis_id: String::new(),
            y_axis_id: String::new(),
            data,
            visible: true,
        }
    }

    #[must_use]
    pub fn with_axes(
        mut self,
        x_axis_id: impl Into<String>,
        y_axis_id: impl Into<String>,
    ) -> Self {
        self.x_axis_id = x_axis_id.into();
        self.y_axis_id = y_axis_id.into();
        self
    }
}
