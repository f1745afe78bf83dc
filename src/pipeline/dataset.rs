//! Dataset-controller contract and the built-in scatter controller.
//!
//! Controllers own per-dataset element geometry. The pipeline drives them in
//! a fixed order: `reset` only after layout has produced valid axis pixel
//! mappings, then `update`, then `draw` with eased animation progress.

use crate::core::{DataPoint, Point, Rect};
use crate::layout::Axis;

/// Hit-testable geometry of one rendered data element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementGeometry {
    pub center: Point,
    pub bounds: Rect,
}

impl ElementGeometry {
    #[must_use]
    pub fn in_range(&self, position: Point) -> bool {
        self.bounds.contains(position)
    }

    /// Containment along the x axis only, ignoring the vertical position.
    #[must_use]
    pub fn in_x_range(&self, position: Point) -> bool {
        position.x >= self.bounds.left && position.x <= self.bounds.right
    }
}

/// Everything a controller may read while rebuilding its elements.
///
/// Axis references are `None` when the dataset names an axis id that does not
/// exist; axis-dependent computations then become a no-op for this dataset
/// while the rest of the chart stays renderable.
#[derive(Debug, Clone, Copy)]
pub struct DatasetContext<'a> {
    pub dataset_index: usize,
    pub data: &'a [DataPoint],
    pub x_axis: Option<&'a Axis>,
    pub y_axis: Option<&'a Axis>,
    pub chart_area: Rect,
}

/// Per-dataset collaborator invoked during the update cycle.
pub trait DatasetController {
    /// Re-binds an existing controller to its (possibly shifted) dataset index.
    fn reindex(&mut self, dataset_index: usize);

    /// Places elements at their initial/zero state. Called for newly created
    /// controllers only, and only after layout.
    fn reset(&mut self, context: &DatasetContext<'_>);

    /// Recomputes data-derived geometry for the current layout.
    fn update(&mut self, context: &DatasetContext<'_>);

    fn build_or_update_elements(&mut self, context: &DatasetContext<'_>);

    /// Rasterizes at the given eased progress. Out of scope for this core;
    /// implementations decide what drawing means.
    fn draw(&mut self, eased_progress: f64);

    /// Current element geometry, indexed 1:1 with the dataset's data points.
    fn elements(&self) -> &[ElementGeometry];
}

/// Built-in point controller: one square hit region per data point.
///
/// Keeps the pipeline, interaction resolver, and tooltip exercisable without
/// any external drawing backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterController {
    dataset_index: usize,
    hit_radius: f64,
    elements: Vec<ElementGeometry>,
    draw_count: u64,
    last_progress: f64,
}

impl ScatterController {
    #[must_use]
    pub fn new(dataset_index: usize, hit_radius: f64) -> Self {
        Self {
            dataset_index,
            hit_radius: if hit_radius.is_finite() && hit_radius > 0.0 {
                hit_radius
            } else {
                1.0
            },
            elements: Vec::new(),
            draw_count: 0,
            last_progress: 0.0,
        }
    }

    #[must_use]
    pub fn dataset_index(&self) -> usize {
        self.dataset_index
    }

    #[must_use]
    pub fn draw_count(&self) -> u64 {
        self.draw_count
    }

    #[must_use]
    pub fn last_progress(&self) -> f64 {
        self.last_progress
    }

    fn element_at(&self, center: Point) -> ElementGeometry {
        let r = self.hit_radius;
        ElementGeometry {
            center,
            bounds: Rect::new(center.x - r, center.y - r, center.x + r, center.y + r),
        }
    }
}

impl DatasetController for ScatterController {
    fn reindex(&mut self, dataset_index: usize) {
        self.dataset_index = dataset_index;
    }

    fn reset(&mut self, context: &DatasetContext<'_>) {
        let (Some(x_axis), Some(_)) = (context.x_axis, context.y_axis) else {
            self.elements.clear();
            return;
        };
        // Initial state: points sit on the baseline so the first animation
        // grows them into place.
        self.elements = context
            .data
            .iter()
            .map(|point| {
                let x = x_axis.pixel_for_value(point.x, context.chart_area);
                self.element_at(Point::new(x, context.chart_area.bottom))
            })
            .collect();
    }

    fn update(&mut self, context: &DatasetContext<'_>) {
        self.build_or_update_elements(context);
    }

    fn build_or_update_elements(&mut self, context: &DatasetContext<'_>) {
        let (Some(x_axis), Some(y_axis)) = (context.x_axis, context.y_axis) else {
            self.elements.clear();
            return;
        };
        self.elements = context
            .data
            .iter()
            .map(|point| {
                let center = Point::new(
                    x_axis.pixel_for_value(point.x, context.chart_area),
                    y_axis.pixel_for_value(point.y, context.chart_area),
                );
                self.element_at(center)
            })
            .collect();
    }

    fn draw(&mut self, eased_progress: f64) {
        self.draw_count += 1;
        self.last_progress = eased_progress;
    }

    fn elements(&self) -> &[ElementGeometry] {
        &self.elements
    }
}
