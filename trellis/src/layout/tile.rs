//! Axis-agnostic distribution math shared by stacked, layered and flow
//! containers.
//!
//! Containers collect each child's envelope into an [`Allocation`], call
//! [`allocate`] with the space available on the stacking axis, and read back
//! the sizes. Every child starts at its minimum; surplus space is then handed
//! out in proportion to stretch weights, clamping each child at its maximum
//! and redistributing what the clamped children could not absorb.

use super::limits::{FULL_EXTENT, ViewLimits};
use crate::primitives::{Axis, Size};

/// Upper bound on redistribution passes. Each pass either exhausts the
/// surplus or saturates at least one child, so this is rarely reached.
const MAX_PASSES: usize = 10;

/// Surplus below this is not worth distributing (sub-pixel noise).
const MIN_SURPLUS: f32 = 0.5;

/// Per-child input and output of [`allocate`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Allocation {
    pub min: f32,
    pub max: f32,
    pub stretch: f32,
    /// Allocated extent (output).
    pub size: f32,
}

impl Allocation {
    pub fn new(limits: &ViewLimits, stretch: f32, axis: Axis) -> Self {
        Self {
            min: limits.min_along(axis),
            max: limits.max_along(axis),
            stretch,
            size: 0.0,
        }
    }

    #[inline]
    fn can_grow(&self) -> bool {
        self.stretch > 0.0 && self.size < self.max
    }
}

/// Distribute `available` space along one axis.
///
/// If `available` is smaller than the sum of minimums the children keep
/// their minimums and overflow; nothing is ever shrunk below its envelope.
pub fn allocate(available: f32, items: &mut [Allocation]) {
    let mut extra = available;
    for item in items.iter_mut() {
        item.size = item.min;
        extra -= item.min;
    }

    for _ in 0..MAX_PASSES {
        if extra < MIN_SURPLUS {
            break;
        }
        let total_stretch: f32 = items
            .iter()
            .filter(|a| a.can_grow())
            .map(|a| a.stretch)
            .sum();
        if total_stretch <= 0.0 {
            break;
        }

        let mut used = 0.0;
        for item in items.iter_mut().filter(|a| a.can_grow()) {
            let grown = (item.size + extra * item.stretch / total_stretch).min(item.max);
            used += grown - item.size;
            item.size = grown;
        }
        extra -= used;
    }
}

/// Envelope of children stacked along `axis`.
///
/// The stacking axis sums minimums and maximums. The cross axis takes the
/// largest minimum and the smallest maximum, raised to the minimum when
/// children disagree.
pub fn stack_limits(axis: Axis, children: impl IntoIterator<Item = ViewLimits>) -> ViewLimits {
    let cross = axis.cross();
    let mut main_min = 0.0f32;
    let mut main_max = 0.0f32;
    let mut cross_min = 0.0f32;
    let mut cross_max = FULL_EXTENT;

    for lim in children {
        main_min += lim.min_along(axis);
        main_max += lim.max_along(axis);
        cross_min = cross_min.max(lim.min_along(cross));
        cross_max = cross_max.min(lim.max_along(cross));
    }

    ViewLimits {
        min: Size::from_axis(axis, main_min, cross_min),
        max: Size::from_axis(
            axis,
            main_max.min(FULL_EXTENT).max(main_min),
            cross_max.max(cross_min),
        ),
    }
}

/// Envelope of children placed on fixed grid lines along `axis`.
///
/// `stops` holds each cell's far edge, measured from the start. The main
/// axis is rigid at the stop of the last child; children past the end of
/// `stops` get empty cells. The cross axis combines like a stack's.
pub fn grid_limits(
    axis: Axis,
    stops: &[f32],
    children: impl IntoIterator<Item = ViewLimits>,
) -> ViewLimits {
    let cross = axis.cross();
    let mut count = 0;
    let mut cross_min = 0.0f32;
    let mut cross_max = FULL_EXTENT;

    for lim in children {
        count += 1;
        cross_min = cross_min.max(lim.min_along(cross));
        cross_max = cross_max.min(lim.max_along(cross));
    }

    let main = match count {
        0 => 0.0,
        n => grid_span(stops, n - 1).end,
    };
    ViewLimits {
        min: Size::from_axis(axis, main, cross_min),
        max: Size::from_axis(axis, main, cross_max.max(cross_min)),
    }
}

/// Start and end of grid cell `index`, clamped to the last stop.
pub fn grid_span(stops: &[f32], index: usize) -> std::ops::Range<f32> {
    let last = stops.last().copied().unwrap_or(0.0);
    let edge = |i: usize| stops.get(i).copied().unwrap_or(last);
    let start = if index == 0 { 0.0 } else { edge(index - 1) };
    start..edge(index).max(start)
}

/// Envelope of children sharing the same bounds (layers, decks).
pub fn layer_limits(children: impl IntoIterator<Item = ViewLimits>) -> ViewLimits {
    let mut min = Size::ZERO;
    let mut max = Size::new(FULL_EXTENT, FULL_EXTENT);

    for lim in children {
        min.width = min.width.max(lim.min.width);
        min.height = min.height.max(lim.min.height);
        max.width = max.width.min(lim.max.width);
        max.height = max.height.min(lim.max.height);
    }

    max.width = max.width.max(min.width);
    max.height = max.height.max(min.height);
    ViewLimits { min, max }
}
