//! Layout negotiator: iteratively partitions the chart rectangle among
//! edge-attached boxes (axes, legend, title) and the remaining plot area.
//!
//! A vertical axis's width shrinks the width available to horizontal axes,
//! whose rotated labels in turn shrink the available height, so sizing runs
//! in passes against a progressively committed rectangle until stable.

use tracing::{debug, warn};

use crate::core::{Edge, Padding, Rect, Size};
use crate::measure::MeasurementSurface;

/// Convergence ceiling for sizing passes. Hitting it yields a degraded but
/// non-fatal layout that keeps the last computed sizes.
pub const MAX_PASSES: usize = 6;

/// Two box sizes within this many pixels in both dimensions count as stable.
pub const SIZE_EPSILON: f64 = 0.5;

/// Polymorphic participant in layout negotiation. Axes implement this;
/// external legend/title sizers plug in through the same contract.
pub trait LayoutBox {
    fn edge(&self) -> Edge;

    fn is_visible(&self) -> bool {
        true
    }

    /// Reports the minimum size needed given a candidate maximum, with
    /// `margins` already committed by boxes on the perpendicular edges.
    fn fit(&mut self, max: Size, margins: Padding, surface: &dyn MeasurementSurface) -> Size;

    /// Takes the final rectangle once negotiation has settled.
    fn place(&mut self, rect: Rect);
}

/// Constant-size layout participant used for legends, titles, and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedBox {
    edge: Edge,
    size: Size,
    rect: Rect,
    visible: bool,
}

impl FixedBox {
    #[must_use]
    pub fn new(edge: Edge, size: Size) -> Self {
        Self {
            edge,
            size,
            rect: Rect::default(),
            visible: true,
        }
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect
    }
}

impl LayoutBox for FixedBox {
    fn edge(&self) -> Edge {
        self.edge
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn fit(&mut self, max: Size, _margins: Padding, _surface: &dyn MeasurementSurface) -> Size {
        self.size.clamped_to(max)
    }

    fn place(&mut self, rect: Rect) {
        self.rect = rect;
    }
}

/// Final partition: one rectangle per input box (same order) plus the
/// interior plot area.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    pub chart_area: Rect,
    pub box_rects: Vec<Rect>,
}

#[derive(Debug, Clone, Copy, Default)]
struct EdgeTotals {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

fn edge_totals(sizes: &[Size], edges: &[Edge], skip: usize) -> EdgeTotals {
    let mut totals = EdgeTotals::default();
    for (index, (size, edge)) in sizes.iter().zip(edges).enumerate() {
        if skip == index {
            continue;
        }
        match edge {
            Edge::Left => totals.left += size.width,
            Edge::Right => totals.right += size.width,
            Edge::Top => totals.top += size.height,
            Edge::Bottom => totals.bottom += size.height,
        }
    }
    totals
}

/// Allocates `chart_rect` among `boxes`, returning final rectangles and the
/// remaining plot area.
///
/// Non-convergence within [`MAX_PASSES`] logs a warning and proceeds with the
/// last computed sizes. Every returned rectangle lies inside `chart_rect` and
/// the plot area is never negative in either dimension.
pub fn negotiate(
    chart_rect: Rect,
    boxes: &mut [&mut dyn LayoutBox],
    surface: &dyn MeasurementSurface,
) -> LayoutResult {
    let chart_rect = chart_rect.normalized();
    let count = boxes.len();
    let edges: Vec<Edge> = boxes.iter().map(|b| b.edge()).collect();
    let visible: Vec<bool> = boxes.iter().map(|b| b.is_visible()).collect();

    let mut sizes = vec![Size::zero(); count];
    let mut converged = count == 0;

    for pass in 0..MAX_PASSES {
        let mut next = vec![Size::zero(); count];
        for (index, layout_box) in boxes.iter_mut().enumerate() {
            if !visible[index] {
                continue;
            }
            // Size against the rectangle shrunk by every *other* box's last
            // commitment, so a box never competes with itself.
            let totals = edge_totals(&sizes, &edges, index);
            let available = Size::new(
                (chart_rect.width() - totals.left - totals.right).max(0.0),
                (chart_rect.height() - totals.top - totals.bottom).max(0.0),
            );
            let margins = if edges[index].is_horizontal() {
                Padding {
                    left: totals.left,
                    right: totals.right,
                    ..Padding::zero()
                }
            } else {
                Padding {
                    top: totals.top,
                    bottom: totals.bottom,
                    ..Padding::zero()
                }
            };
            next[index] = layout_box
                .fit(available, margins, surface)
                .clamped_to(available);
        }

        let stable = next
            .iter()
            .zip(&sizes)
            .all(|(a, b)| a.approx_eq(*b, SIZE_EPSILON));
        sizes = next;
        if stable {
            debug!(passes = pass + 1, "layout negotiation converged");
            converged = true;
            break;
        }
    }

    if !converged {
        warn!(
            passes = MAX_PASSES,
            "layout negotiation did not converge; keeping last computed box sizes"
        );
    }

    place_boxes(chart_rect, boxes, &edges, &visible, &sizes)
}

fn place_boxes(
    chart_rect: Rect,
    boxes: &mut [&mut dyn LayoutBox],
    edges: &[Edge],
    visible: &[bool],
    sizes: &[Size],
) -> LayoutResult {
    let mut cursor_left = chart_rect.left;
    let mut cursor_right = chart_rect.right;
    let mut cursor_top = chart_rect.top;
    let mut cursor_bottom = chart_rect.bottom;

    let mut box_rects = vec![Rect::default(); boxes.len()];

    // Horizontal strips first: the band they leave between the top and bottom
    // cursors bounds the vertical boxes, so every shared edge carries the
    // exact same value instead of a separately rounded recomputation. Corners
    // belong to the top/bottom boxes, which span the full chart width.
    for (index, layout_box) in boxes.iter_mut().enumerate() {
        if !edges[index].is_horizontal() {
            continue;
        }
        let rect = if !visible[index] {
            Rect::new(chart_rect.left, cursor_top, chart_rect.left, cursor_top)
        } else if edges[index] == Edge::Top {
            let rect = Rect::new(
                chart_rect.left,
                cursor_top,
                chart_rect.right,
                (cursor_top + sizes[index].height).min(cursor_bottom),
            );
            cursor_top = rect.bottom;
            rect
        } else {
            let rect = Rect::new(
                chart_rect.left,
                (cursor_bottom - sizes[index].height).max(cursor_top),
                chart_rect.right,
                cursor_bottom,
            );
            cursor_bottom = rect.top;
            rect
        };
        let rect = rect.normalized();
        box_rects[index] = rect;
        layout_box.place(rect);
    }

    for (index, layout_box) in boxes.iter_mut().enumerate() {
        if edges[index].is_horizontal() {
            continue;
        }
        let rect = if !visible[index] {
            Rect::new(cursor_left, cursor_top, cursor_left, cursor_top)
        } else if edges[index] == Edge::Left {
            let rect = Rect::new(
                cursor_left,
                cursor_top,
                (cursor_left + sizes[index].width).min(cursor_right),
                cursor_bottom,
            );
            cursor_left = rect.right;
            rect
        } else {
            let rect = Rect::new(
                (cursor_right - sizes[index].width).max(cursor_left),
                cursor_top,
                cursor_right,
                cursor_bottom,
            );
            cursor_right = rect.left;
            rect
        };
        let rect = rect.normalized();
        box_rects[index] = rect;
        layout_box.place(rect);
    }

    let chart_area = Rect::new(cursor_left, cursor_top, cursor_right, cursor_bottom).normalized();
    LayoutResult {
        chart_area,
        box_rects,
    }
}
