//! Begin/keep/end drag tracking.
//!
//! Controls that follow the pointer while a button is held (dials,
//! sliders) implement [`Tracking`] and route their `click` and `drag`
//! calls through [`track_click`] and [`track_drag`]. The tracker state
//! exists only between button-down and button-up.

use crate::context::Context;
use crate::event::{Modifiers, MouseButton};
use crate::primitives::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerInfo {
    pub start: Point,
    pub current: Point,
    pub previous: Point,
    /// Grab offset subtracted from pointer positions, so a control can be
    /// dragged by a point other than its center without jumping.
    pub offset: Point,
    pub modifiers: Modifiers,
}

impl TrackerInfo {
    pub fn new(start: Point, modifiers: Modifiers) -> Self {
        Self {
            start,
            current: start,
            previous: start,
            offset: Point::ORIGIN,
            modifiers,
        }
    }
}

pub trait Tracking {
    /// Storage for the in-flight tracker state.
    fn tracker_state(&mut self) -> &mut Option<TrackerInfo>;

    fn begin_tracking(&mut self, _ctx: &Context, _info: &mut TrackerInfo) {}
    fn keep_tracking(&mut self, ctx: &Context, info: &mut TrackerInfo);
    fn end_tracking(&mut self, _ctx: &Context, _info: &mut TrackerInfo) {}
}

/// Button press starts tracking, release ends it. Returns whether the
/// event was consumed.
pub fn track_click<T: Tracking + ?Sized>(this: &mut T, ctx: &Context, btn: MouseButton) -> bool {
    if btn.down {
        let mut info = TrackerInfo::new(btn.pos, btn.modifiers);
        this.begin_tracking(ctx, &mut info);
        *this.tracker_state() = Some(info);
        tracing::trace!(path = ?ctx.path(), "tracking started");
        return true;
    }
    let Some(mut info) = this.tracker_state().take() else {
        return false;
    };
    this.end_tracking(ctx, &mut info);
    tracing::trace!(path = ?ctx.path(), "tracking ended");
    true
}

/// Pointer motion while tracking. A no-op when nothing is being tracked.
pub fn track_drag<T: Tracking + ?Sized>(this: &mut T, ctx: &Context, btn: MouseButton) {
    let Some(mut info) = *this.tracker_state() else {
        return;
    };
    info.previous = info.current;
    info.current = btn.pos - info.offset;
    info.modifiers = btn.modifiers;
    this.keep_tracking(ctx, &mut info);
    *this.tracker_state() = Some(info);
}
