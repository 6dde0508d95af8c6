//! Single-child decorators.
//!
//! A [`Proxy`] owns one subject element and a [`ProxyPolicy`] that decides
//! how each call reaches it. Every hook defaults to plain delegation, so a
//! policy only spells out what it changes: a margin rewrites `limits` and
//! `prepare_subject`, a port adds clipping, scrolling and scrollbars, a
//! popup claims the area around its subject until dismissed.
//!
//! # Architecture
//!
//! For every call the proxy asks the policy for the subject's bounds
//! (`prepare_subject`) and viewport (`subject_viewport`), builds a subject
//! context whose parent is the proxy's own context, and passes both the
//! context and the subject to the matching hook. Inside a hook the proxy's
//! own bounds are `ctx.parent_bounds()`.

mod align;
mod drop_box;
mod floating;
mod hidable;
mod margin;
mod popup;
mod port;
mod size;
mod themed;

pub use align::{Align, align, align_center, halign, valign};
pub use drop_box::{DropBox, drop_box};
pub use floating::{Floating, floating};
pub use hidable::{Collapsable, Hidable, hcollapsable, hidable, vcollapsable};
pub use margin::{Margin, bottom_margin, left_margin, margin, right_margin, top_margin};
pub use popup::{Popup, popup};
pub use port::{MIN_PORT_SIZE, Port, hport, hscroller, port, scroller, vport, vscroller};
pub use size::{
    FixedSize, LimitSize, Stretch, fixed_size, hsize, hstretch, max_size, min_size, vsize,
    vstretch,
};
pub use themed::Themed;

use crate::context::{BasicContext, Context};
use crate::element::{Element, ElementPtr, Hit, Value};
use crate::event::{CursorTracking, FocusRequest, KeyInfo, MouseButton, TextInfo};
use crate::layout::{ViewLimits, ViewStretch};
use crate::payload::DropInfo;
use crate::primitives::{Point, Rect};

/// What a proxy does on top of its subject.
///
/// Hooks that receive a [`Context`] get the subject's context, already
/// prepared.
pub trait ProxyPolicy {
    fn limits(&self, ctx: &BasicContext, subject: &dyn Element) -> ViewLimits {
        subject.limits(ctx)
    }

    fn stretch(&self, subject: &dyn Element) -> ViewStretch {
        subject.stretch()
    }

    /// Bounds handed to the subject, given the proxy's own.
    fn prepare_subject(&self, _ctx: &BasicContext, bounds: Rect, _subject: &dyn Element) -> Rect {
        bounds
    }

    fn subject_viewport(&self, viewport: Rect, _bounds: Rect) -> Rect {
        viewport
    }

    fn draw(&mut self, ctx: &Context, subject: &mut dyn Element) {
        subject.draw(ctx)
    }

    fn layout(&mut self, ctx: &Context, subject: &mut dyn Element) {
        subject.layout(ctx)
    }

    fn hit_test(&self, ctx: &Context, subject: &dyn Element, p: Point) -> Option<Hit> {
        subject.hit_test(ctx, p)
    }

    fn click(&mut self, ctx: &Context, subject: &mut dyn Element, btn: MouseButton) -> bool {
        subject.click(ctx, btn)
    }

    fn drag(&mut self, ctx: &Context, subject: &mut dyn Element, btn: MouseButton) {
        subject.drag(ctx, btn)
    }

    fn key(&mut self, ctx: &Context, subject: &mut dyn Element, k: &KeyInfo) -> bool {
        subject.key(ctx, k)
    }

    fn text(&mut self, ctx: &Context, subject: &mut dyn Element, info: TextInfo) -> bool {
        subject.text(ctx, info)
    }

    fn cursor(
        &mut self,
        ctx: &Context,
        subject: &mut dyn Element,
        p: Point,
        status: CursorTracking,
    ) -> bool {
        subject.cursor(ctx, p, status)
    }

    fn scroll(&mut self, ctx: &Context, subject: &mut dyn Element, dir: Point, p: Point) -> bool {
        subject.scroll(ctx, dir, p)
    }

    fn wants_focus(&self, subject: &dyn Element) -> bool {
        subject.wants_focus()
    }

    fn focus(&mut self, subject: &mut dyn Element, req: FocusRequest) -> bool {
        subject.focus(req)
    }

    fn is_control(&self, subject: &dyn Element) -> bool {
        subject.is_control()
    }

    fn track_drop(
        &mut self,
        ctx: &Context,
        subject: &mut dyn Element,
        info: &DropInfo,
        status: CursorTracking,
    ) {
        subject.track_drop(ctx, info, status)
    }

    fn drop_payload(&mut self, ctx: &Context, subject: &mut dyn Element, info: &DropInfo) -> bool {
        subject.drop_payload(ctx, info)
    }

    fn set_value(&mut self, subject: &mut dyn Element, value: Value) {
        subject.set_value(value)
    }
}

pub struct Proxy<P> {
    subject: ElementPtr,
    policy: P,
}

impl<P: ProxyPolicy> Proxy<P> {
    pub fn new(policy: P, subject: impl Element + 'static) -> Self {
        Self {
            subject: Box::new(subject),
            policy,
        }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    pub fn subject(&self) -> &dyn Element {
        self.subject.as_ref()
    }

    pub fn subject_mut(&mut self) -> &mut ElementPtr {
        &mut self.subject
    }

    /// Bounds the subject gets when the proxy sits at `ctx.bounds`.
    pub fn subject_bounds(&self, ctx: &Context) -> Rect {
        self.policy
            .prepare_subject(&ctx.basic(), ctx.bounds, self.subject.as_ref())
    }

    fn subject_context<'c>(&self, ctx: &'c Context) -> Context<'c> {
        let bounds = self.subject_bounds(ctx);
        let viewport = self.policy.subject_viewport(ctx.viewport, ctx.bounds);
        ctx.subject(bounds).with_viewport(viewport)
    }
}

impl<P: ProxyPolicy> Element for Proxy<P> {
    fn limits(&self, ctx: &BasicContext) -> ViewLimits {
        self.policy.limits(ctx, self.subject.as_ref())
    }

    fn stretch(&self) -> ViewStretch {
        self.policy.stretch(self.subject.as_ref())
    }

    fn hit_test(&self, ctx: &Context, p: Point) -> Option<Hit> {
        let sctx = self.subject_context(ctx);
        self.policy.hit_test(&sctx, self.subject.as_ref(), p)
    }

    fn draw(&mut self, ctx: &Context) {
        let sctx = self.subject_context(ctx);
        self.policy.draw(&sctx, self.subject.as_mut())
    }

    fn layout(&mut self, ctx: &Context) {
        let sctx = self.subject_context(ctx);
        self.policy.layout(&sctx, self.subject.as_mut())
    }

    fn click(&mut self, ctx: &Context, btn: MouseButton) -> bool {
        let sctx = self.subject_context(ctx);
        self.policy.click(&sctx, self.subject.as_mut(), btn)
    }

    fn drag(&mut self, ctx: &Context, btn: MouseButton) {
        let sctx = self.subject_context(ctx);
        self.policy.drag(&sctx, self.subject.as_mut(), btn)
    }

    fn key(&mut self, ctx: &Context, k: &KeyInfo) -> bool {
        let sctx = self.subject_context(ctx);
        self.policy.key(&sctx, self.subject.as_mut(), k)
    }

    fn text(&mut self, ctx: &Context, info: TextInfo) -> bool {
        let sctx = self.subject_context(ctx);
        self.policy.text(&sctx, self.subject.as_mut(), info)
    }

    fn cursor(&mut self, ctx: &Context, p: Point, status: CursorTracking) -> bool {
        let sctx = self.subject_context(ctx);
        self.policy.cursor(&sctx, self.subject.as_mut(), p, status)
    }

    fn scroll(&mut self, ctx: &Context, dir: Point, p: Point) -> bool {
        let sctx = self.subject_context(ctx);
        self.policy.scroll(&sctx, self.subject.as_mut(), dir, p)
    }

    fn wants_focus(&self) -> bool {
        self.policy.wants_focus(self.subject.as_ref())
    }

    fn focus(&mut self, req: FocusRequest) -> bool {
        self.policy.focus(self.subject.as_mut(), req)
    }

    fn is_control(&self) -> bool {
        self.policy.is_control(self.subject.as_ref())
    }

    fn track_drop(&mut self, ctx: &Context, info: &DropInfo, status: CursorTracking) {
        let sctx = self.subject_context(ctx);
        self.policy
            .track_drop(&sctx, self.subject.as_mut(), info, status)
    }

    fn drop_payload(&mut self, ctx: &Context, info: &DropInfo) -> bool {
        let sctx = self.subject_context(ctx);
        self.policy.drop_payload(&sctx, self.subject.as_mut(), info)
    }

    fn set_value(&mut self, value: Value) {
        self.policy.set_value(self.subject.as_mut(), value)
    }
}
