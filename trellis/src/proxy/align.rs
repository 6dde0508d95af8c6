use super::{Proxy, ProxyPolicy};
use crate::context::BasicContext;
use crate::element::Element;
use crate::layout::{FULL_EXTENT, ViewLimits};
use crate::primitives::{Axis, Rect};

/// Positions the subject inside larger bounds. `0.0` is leading, `0.5`
/// centered, `1.0` trailing. `None` leaves an axis alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Align {
    pub x: Option<f32>,
    pub y: Option<f32>,
}

impl Align {
    fn along(&self, axis: Axis) -> Option<f32> {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }
}

impl ProxyPolicy for Align {
    fn limits(&self, ctx: &BasicContext, subject: &dyn Element) -> ViewLimits {
        let mut e = subject.limits(ctx);
        if self.x.is_some() {
            e.max.width = FULL_EXTENT;
        }
        if self.y.is_some() {
            e.max.height = FULL_EXTENT;
        }
        e
    }

    fn prepare_subject(&self, ctx: &BasicContext, mut bounds: Rect, subject: &dyn Element) -> Rect {
        let e = subject.limits(ctx);
        for axis in [Axis::Horizontal, Axis::Vertical] {
            let Some(align) = self.along(axis) else {
                continue;
            };
            let avail = bounds.extent(axis);
            let min = e.min_along(axis);
            let elem = if avail > min {
                avail.min(e.max_along(axis))
            } else {
                min
            };
            let start = bounds.start(axis) + (avail - elem) * align;
            bounds = bounds.with_span(axis, start, elem);
        }
        bounds
    }
}

pub fn halign(align: f32, subject: impl Element + 'static) -> Proxy<Align> {
    Proxy::new(
        Align {
            x: Some(align),
            y: None,
        },
        subject,
    )
}

pub fn valign(align: f32, subject: impl Element + 'static) -> Proxy<Align> {
    Proxy::new(
        Align {
            x: None,
            y: Some(align),
        },
        subject,
    )
}

pub fn align(x: f32, y: f32, subject: impl Element + 'static) -> Proxy<Align> {
    Proxy::new(
        Align {
            x: Some(x),
            y: Some(y),
        },
        subject,
    )
}

pub fn align_center(subject: impl Element + 'static) -> Proxy<Align> {
    align(0.5, 0.5, subject)
}
