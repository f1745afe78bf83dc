//! Interaction resolver: maps a pointer position to the set of active chart
//! elements under a selection mode.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Point;
use crate::pipeline::ElementGeometry;

/// How "nearest" measures distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DistanceAxis {
    X,
    Y,
    #[default]
    Xy,
}

impl DistanceAxis {
    #[must_use]
    pub fn distance(self, a: Point, b: Point) -> f64 {
        match self {
            Self::X => a.x_distance_to(b),
            Self::Y => a.y_distance_to(b),
            Self::Xy => a.distance_to(b),
        }
    }
}

/// Selection strategies for pointer resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SelectionMode {
    /// Exact hits under the cursor.
    Point,
    /// Closest element by the configured distance axis.
    #[default]
    Nearest,
    /// All elements sharing the nearest x-index across datasets.
    Index,
    /// All elements of the nearest dataset.
    Dataset,
    /// All elements sharing the nearest x pixel; containment is tested on
    /// the x axis only.
    XAxis,
}

/// Pointer-resolution knobs carried in chart options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionOptions {
    #[serde(default)]
    pub mode: SelectionMode,
    #[serde(default = "default_intersect")]
    pub intersect: bool,
    #[serde(default)]
    pub axis: DistanceAxis,
}

impl Default for InteractionOptions {
    fn default() -> Self {
        Self {
            mode: SelectionMode::default(),
            intersect: default_intersect(),
            axis: DistanceAxis::default(),
        }
    }
}

fn default_intersect() -> bool {
    true
}

/// One selected element, addressed by dataset and element index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveElement {
    pub dataset_index: usize,
    pub element_index: usize,
}

/// Ephemeral selection result. Ordering is insertion order during the scan;
/// equality is order-and-content sensitive, which is what decides whether a
/// hover change warrants a redraw.
pub type ActiveElementSet = SmallVec<[ActiveElement; 4]>;

/// One dataset's element geometry as seen by the resolver.
#[derive(Debug, Clone, Copy)]
pub struct ElementSource<'a> {
    pub dataset_index: usize,
    pub elements: &'a [ElementGeometry],
}

/// How the `intersect` flag tests an element against the pointer.
#[derive(Debug, Clone, Copy)]
enum Containment {
    Full,
    XOnly,
}

impl Containment {
    fn test(self, element: &ElementGeometry, position: Point) -> bool {
        match self {
            Self::Full => element.in_range(position),
            Self::XOnly => element.in_x_range(position),
        }
    }
}

/// Resolves `position` to active elements under `mode`.
///
/// With `intersect` set, only elements whose geometry contains the position
/// qualify; without it, the nearest candidate qualifies regardless of
/// containment. `Point` is containment by definition; `XAxis` applies the
/// flag along the x axis only.
#[must_use]
pub fn resolve(
    sources: &[ElementSource<'_>],
    position: Point,
    mode: SelectionMode,
    intersect: bool,
    axis: DistanceAxis,
) -> ActiveElementSet {
    match mode {
        SelectionMode::Point => resolve_point(sources, position),
        SelectionMode::Nearest => resolve_nearest(sources, position, intersect, axis),
        SelectionMode::Index => resolve_index(sources, position, intersect, Containment::Full),
        SelectionMode::Dataset => resolve_dataset(sources, position, intersect, axis),
        SelectionMode::XAxis => resolve_index(sources, position, intersect, Containment::XOnly),
    }
}

fn resolve_point(sources: &[ElementSource<'_>], position: Point) -> ActiveElementSet {
    let mut active = ActiveElementSet::new();
    for source in sources {
        for (element_index, element) in source.elements.iter().enumerate() {
            if element.in_range(position) {
                active.push(ActiveElement {
                    dataset_index: source.dataset_index,
                    element_index,
                });
            }
        }
    }
    active
}

/// Scans every candidate and keeps all elements tied at the minimum distance,
/// in scan order.
fn nearest_candidates(
    sources: &[ElementSource<'_>],
    position: Point,
    intersect: bool,
    axis: DistanceAxis,
    containment: Containment,
) -> ActiveElementSet {
    let mut best = OrderedFloat(f64::INFINITY);
    let mut active = ActiveElementSet::new();
    for source in sources {
        for (element_index, element) in source.elements.iter().enumerate() {
            if intersect && !containment.test(element, position) {
                continue;
            }
            let distance = OrderedFloat(axis.distance(element.center, position));
            if distance < best {
                best = distance;
                active.clear();
            }
            if distance == best {
                active.push(ActiveElement {
                    dataset_index: source.dataset_index,
                    element_index,
                });
            }
        }
    }
    active
}

fn resolve_nearest(
    sources: &[ElementSource<'_>],
    position: Point,
    intersect: bool,
    axis: DistanceAxis,
) -> ActiveElementSet {
    nearest_candidates(sources, position, intersect, axis, Containment::Full)
}

fn resolve_index(
    sources: &[ElementSource<'_>],
    position: Point,
    intersect: bool,
    containment: Containment,
) -> ActiveElementSet {
    let anchor = nearest_candidates(sources, position, intersect, DistanceAxis::X, containment);
    let Some(first) = anchor.first() else {
        return ActiveElementSet::new();
    };
    let index = first.element_index;

    let mut active = ActiveElementSet::new();
    for source in sources {
        if index < source.elements.len() {
            active.push(ActiveElement {
                dataset_index: source.dataset_index,
                element_index: index,
            });
        }
    }
    active
}

fn resolve_dataset(
    sources: &[ElementSource<'_>],
    position: Point,
    intersect: bool,
    axis: DistanceAxis,
) -> ActiveElementSet {
    let anchor = nearest_candidates(sources, position, intersect, axis, Containment::Full);
    let Some(first) = anchor.first() else {
        return ActiveElementSet::new();
    };

    let mut active = ActiveElementSet::new();
    for source in sources {
        if source.dataset_index != first.dataset_index {
            continue;
        }
        for element_index in 0..source.elements.len() {
            active.push(ActiveElement {
                dataset_index: source.dataset_index,
                element_index,
            });
        }
    }
    active
}
