//! Application-owned chart instance registry.
//!
//! Replaces ambient global state: the registry maps instance ids to chart
//! controllers, owns the shared animation scheduler, and is constructed at
//! startup and explicitly cleared on teardown.

use indexmap::IndexMap;

use crate::animation::AnimationScheduler;
use crate::core::ChartId;
use crate::measure::MeasurementSurface;
use crate::pipeline::{ChartController, ChartOptions, PointerEvent};

pub struct ChartRegistry<S: MeasurementSurface> {
    next_id: u64,
    charts: IndexMap<ChartId, ChartController<S>>,
    scheduler: AnimationScheduler,
}

impl<S: MeasurementSurface> Default for ChartRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: MeasurementSurface> ChartRegistry<S> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            charts: IndexMap::new(),
            scheduler: AnimationScheduler::new(),
        }
    }

    /// Creates and registers a chart bound to `surface`.
    pub fn create(&mut self, surface: S, options: ChartOptions) -> ChartId {
        let id = ChartId::from_raw(self.next_id);
        self.next_id += 1;
        self.charts.insert(id, ChartController::new(id, surface, options));
        id
    }

    #[must_use]
    pub fn chart(&self, id: ChartId) -> Option<&ChartController<S>> {
        self.charts.get(&id)
    }

    #[must_use]
    pub fn chart_mut(&mut self, id: ChartId) -> Option<&mut ChartController<S>> {
        self.charts.get_mut(&id)
    }

    /// Runs the update cycle for one chart against the shared scheduler.
    pub fn update(&mut self, id: ChartId) -> bool {
        match self.charts.get_mut(&id) {
            Some(chart) => {
                chart.update(&mut self.scheduler);
                true
            }
            None => false,
        }
    }

    /// Routes a pointer event to one chart; returns whether a redraw is due.
    pub fn pointer_event(&mut self, id: ChartId, event: PointerEvent) -> bool {
        match self.charts.get_mut(&id) {
            Some(chart) => chart.pointer_event(event, &mut self.scheduler),
            None => false,
        }
    }

    /// Advances the shared animation clock by one frame and dispatches the
    /// due draws. Returns how many charts drew.
    pub fn render_frame(&mut self) -> usize {
        let frames = self.scheduler.tick();
        let mut drawn = 0;
        for frame in frames {
            if let Some(chart) = self.charts.get_mut(&frame.chart) {
                chart.draw(frame.eased_progress);
                drawn += 1;
            }
        }
        drawn
    }

    /// True while any chart still animates; the host frame loop should idle
    /// otherwise.
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        self.scheduler.needs_frame()
    }

    /// Tears a chart down, releasing its animation registration and id.
    pub fn destroy(&mut self, id: ChartId) -> bool {
        self.scheduler.cancel(id);
        self.charts.shift_remove(&id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.charts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<ChartId> {
        self.charts.keys().copied().collect()
    }

    #[must_use]
    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut AnimationScheduler {
        &mut self.scheduler
    }
}
