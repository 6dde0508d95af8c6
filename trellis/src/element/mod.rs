//! The element protocol.
//!
//! Every node in the tree implements [`Element`]. All methods have a
//! default, so a leaf only overrides what it cares about: a static
//! rectangle needs `limits` and `draw`, a dial adds `click`, `drag` and
//! `scroll`.
//!
//! Elements carry no bounds and no parent pointer. Position arrives through
//! the [`Context`] on every call, and event methods report whether they
//! consumed the event so the caller can keep routing.

pub mod basic;
pub mod dial;
pub mod slider;
pub mod tracker;

use crate::context::{BasicContext, Context};
use crate::event::{CursorTracking, FocusRequest, KeyInfo, MouseButton, TextInfo};
use crate::layout::{ViewLimits, ViewStretch};
use crate::payload::DropInfo;
use crate::primitives::{Point, Rect};

pub use basic::{Empty, Label, ProgressBar, Rectangle, Spacer};
pub use dial::{Dial, DialState, Knob, dial};
pub use slider::Slider;
pub use tracker::{TrackerInfo, Tracking, track_click, track_drag};

/// Owned element pointer.
pub type ElementPtr = Box<dyn Element>;

/// Result of a successful hit test: the bounds of the deepest element
/// under the point and the child-index path leading to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub bounds: Rect,
    pub path: Vec<usize>,
}

impl Hit {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            path: Vec::new(),
        }
    }

    /// Prefix the path with the index of the child the hit came through.
    pub fn within(mut self, index: usize) -> Self {
        self.path.insert(0, index);
        self
    }
}

/// Value pushed into an element by a controller (dial, slider, animation).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Double(f64),
    Text(String),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }
}

pub trait Element {
    /// Size envelope this element accepts.
    fn limits(&self, _ctx: &BasicContext) -> ViewLimits {
        ViewLimits::FULL
    }

    /// How eagerly this element takes surplus space.
    fn stretch(&self) -> ViewStretch {
        ViewStretch::default()
    }

    /// Deepest element under `p`, or `None` if this element rejects it.
    fn hit_test(&self, ctx: &Context, p: Point) -> Option<Hit> {
        ctx.bounds.contains(p).then(|| Hit::new(ctx.bounds))
    }

    fn draw(&mut self, _ctx: &Context) {}

    /// Position children inside `ctx.bounds`.
    fn layout(&mut self, _ctx: &Context) {}

    /// Button press or release. Returns whether it was consumed.
    fn click(&mut self, _ctx: &Context, _btn: MouseButton) -> bool {
        false
    }

    /// Pointer motion while a button press is being tracked.
    fn drag(&mut self, _ctx: &Context, _btn: MouseButton) {}

    fn key(&mut self, _ctx: &Context, _k: &KeyInfo) -> bool {
        false
    }

    fn text(&mut self, _ctx: &Context, _info: TextInfo) -> bool {
        false
    }

    fn cursor(&mut self, _ctx: &Context, _p: Point, _status: CursorTracking) -> bool {
        false
    }

    /// Wheel or trackpad scroll by `dir` pixels with the pointer at `p`.
    fn scroll(&mut self, _ctx: &Context, _dir: Point, _p: Point) -> bool {
        false
    }

    fn wants_focus(&self) -> bool {
        false
    }

    /// Focus transition. Returns whether this element (or a descendant)
    /// took the focus.
    fn focus(&mut self, _req: FocusRequest) -> bool {
        false
    }

    /// Interactive elements receive clicks during routing; purely visual
    /// ones are skipped.
    fn is_control(&self) -> bool {
        false
    }

    fn track_drop(&mut self, _ctx: &Context, _info: &DropInfo, _status: CursorTracking) {}

    /// Deliver a drop. Returns whether it was accepted.
    fn drop_payload(&mut self, _ctx: &Context, _info: &DropInfo) -> bool {
        false
    }

    fn set_value(&mut self, _value: Value) {}
}

impl<E: Element + ?Sized> Element for Box<E> {
    fn limits(&self, ctx: &BasicContext) -> ViewLimits {
        (**self).limits(ctx)
    }

    fn stretch(&self) -> ViewStretch {
        (**self).stretch()
    }

    fn hit_test(&self, ctx: &Context, p: Point) -> Option<Hit> {
        (**self).hit_test(ctx, p)
    }

    fn draw(&mut self, ctx: &Context) {
        (**self).draw(ctx)
    }

    fn layout(&mut self, ctx: &Context) {
        (**self).layout(ctx)
    }

    fn click(&mut self, ctx: &Context, btn: MouseButton) -> bool {
        (**self).click(ctx, btn)
    }

    fn drag(&mut self, ctx: &Context, btn: MouseButton) {
        (**self).drag(ctx, btn)
    }

    fn key(&mut self, ctx: &Context, k: &KeyInfo) -> bool {
        (**self).key(ctx, k)
    }

    fn text(&mut self, ctx: &Context, info: TextInfo) -> bool {
        (**self).text(ctx, info)
    }

    fn cursor(&mut self, ctx: &Context, p: Point, status: CursorTracking) -> bool {
        (**self).cursor(ctx, p, status)
    }

    fn scroll(&mut self, ctx: &Context, dir: Point, p: Point) -> bool {
        (**self).scroll(ctx, dir, p)
    }

    fn wants_focus(&self) -> bool {
        (**self).wants_focus()
    }

    fn focus(&mut self, req: FocusRequest) -> bool {
        (**self).focus(req)
    }

    fn is_control(&self) -> bool {
        (**self).is_control()
    }

    fn track_drop(&mut self, ctx: &Context, info: &DropInfo, status: CursorTracking) {
        (**self).track_drop(ctx, info, status)
    }

    fn drop_payload(&mut self, ctx: &Context, info: &DropInfo) -> bool {
        (**self).drop_payload(ctx, info)
    }

    fn set_value(&mut self, value: Value) {
        (**self).set_value(value)
    }
}
