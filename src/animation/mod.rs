//! Cooperative animation scheduler shared by all chart instances.
//!
//! One clock drives every in-flight animation: the host calls [`AnimationScheduler::tick`]
//! once per animation frame while [`AnimationScheduler::needs_frame`] reports
//! true, and routes the returned frames to the owning chart's draw path.
//! Tasks for different charts advance independently and may interleave in any
//! order; within one task, steps are strictly sequential.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::{ChartId, Easing};

/// Steps derived from a millisecond duration, assuming a 60 Hz frame clock.
pub const STEPS_PER_SECOND: f64 = 60.0;

/// One chart's in-flight animation. A chart owns at most one task at a time:
/// scheduling a new task for the same chart cancels the prior one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationTask {
    chart: ChartId,
    total_steps: u32,
    current_step: u32,
    easing: Easing,
}

impl AnimationTask {
    #[must_use]
    pub fn new(chart: ChartId, duration_ms: f64, easing: Easing) -> Self {
        let steps = if duration_ms.is_finite() && duration_ms > 0.0 {
            ((duration_ms / 1000.0) * STEPS_PER_SECOND).round().max(1.0) as u32
        } else {
            1
        };
        Self {
            chart,
            total_steps: steps,
            current_step: 0,
            easing,
        }
    }

    #[must_use]
    pub fn chart(&self) -> ChartId {
        self.chart
    }

    #[must_use]
    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    #[must_use]
    pub fn current_step(&self) -> u32 {
        self.current_step
    }
}

/// One due redraw produced by a scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationFrame {
    pub chart: ChartId,
    /// Eased progress in `[0, 1]` for this step.
    pub eased_progress: f64,
    /// True exactly once per task, on its final step. A cancelled task never
    /// reports completion.
    pub completed: bool,
}

/// Process-wide task registry. Mutated only from the single logical thread:
/// the pipeline registers/replaces tasks, `tick` removes finished ones.
#[derive(Debug, Default)]
pub struct AnimationScheduler {
    tasks: Vec<AnimationTask>,
}

impl AnimationScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `task`, replacing any in-flight task for the same chart.
    ///
    /// Replacement is silent: the superseded task simply stops, its remaining
    /// steps and completion are never delivered.
    pub fn schedule(&mut self, task: AnimationTask) {
        let replaced = self.cancel(task.chart);
        if replaced {
            debug!(chart = task.chart.raw(), "replacing in-flight animation task");
        }
        self.tasks.push(task);
    }

    /// Removes the chart's task, if any, without delivering its completion.
    pub fn cancel(&mut self, chart: ChartId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.chart != chart);
        self.tasks.len() != before
    }

    /// Advances every registered task by one step and returns the due frames.
    ///
    /// Finished tasks are removed; their final frame carries `completed`.
    pub fn tick(&mut self) -> SmallVec<[AnimationFrame; 4]> {
        let mut frames = SmallVec::new();
        self.tasks.retain_mut(|task| {
            task.current_step += 1;
            let progress = f64::from(task.current_step) / f64::from(task.total_steps);
            let done = task.current_step >= task.total_steps;
            frames.push(AnimationFrame {
                chart: task.chart,
                eased_progress: task.easing.apply(progress),
                completed: done,
            });
            !done
        });
        frames
    }

    /// True while any task is registered. The host frame loop should idle
    /// when this is false instead of busy-looping on an empty registry.
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        !self.tasks.is_empty()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    #[must_use]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn task_for(&self, chart: ChartId) -> Option<&AnimationTask> {
        self.tasks.iter().find(|task| task.chart == chart)
    }
}
