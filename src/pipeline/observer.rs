//! Pipeline observer hooks.
//!
//! An explicit ordered list of observers is invoked at named pipeline
//! checkpoints, synchronously and in-process. Observer panics are not caught:
//! masking them would hide integration bugs in host code.

use crate::core::{ChartId, Rect, Size};

/// Checkpoint notifications emitted by the update/render pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PipelineEvent {
    BeforeUpdate,
    AfterUpdate,
    BeforeLayout,
    AfterLayout,
    BeforeDatasetsDraw { progress: f64 },
    AfterDatasetsDraw { progress: f64 },
    Resized { width: f64, height: f64 },
}

/// Read-only chart snapshot passed alongside each event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverContext {
    pub chart: ChartId,
    pub canvas: Size,
    pub chart_area: Rect,
    pub dataset_count: usize,
    pub active_count: usize,
}

/// Plugin-style hook interface for bounded custom logic at stage boundaries.
pub trait ChartObserver {
    fn on_event(&mut self, event: PipelineEvent, context: ObserverContext);
}
