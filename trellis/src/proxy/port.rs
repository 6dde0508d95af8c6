//! Scrolling windows onto larger content.
//!
//! A port gives its subject as much space as the subject asks for on the
//! scrollable axes, then shows a window of it offset by a pixel scroll
//! position. The subject is clipped to the port and sees a viewport
//! narrowed to the port's bounds, so virtualized content only materializes
//! what is visible. A scroller is a port with scrollbars.
//!
//! Scroll directions follow trackpad convention: a positive `dir.y` moves
//! the content down, revealing what is above.

use super::{Proxy, ProxyPolicy};
use crate::context::{BasicContext, Context};
use crate::element::{Element, Hit};
use crate::event::{CursorKind, CursorTracking, KeyInfo, MouseButton, NamedKey};
use crate::layout::ViewLimits;
use crate::primitives::{Axis, Point, Rect};

/// Smallest extent a port asks for on a scrollable axis.
pub const MIN_PORT_SIZE: f32 = 64.0;

const MIN_THUMB: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bar {
    axis: Axis,
    track: Rect,
    thumb: Rect,
    max_offset: f32,
}

impl Bar {
    /// Thumb travel in pixels.
    fn travel(&self) -> f32 {
        self.track.extent(self.axis) - self.thumb.extent(self.axis)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Port {
    horizontal: bool,
    vertical: bool,
    scrollbars: bool,
    offset: Point,
    laid_out: Option<Rect>,
    /// Axis and grab offset of a thumb being dragged.
    thumb_drag: Option<(Axis, f32)>,
}

impl Port {
    pub fn new(horizontal: bool, vertical: bool, scrollbars: bool) -> Self {
        Self {
            horizontal,
            vertical,
            scrollbars,
            ..Default::default()
        }
    }

    pub fn scrolls(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    /// Current scroll offset in pixels. May exceed the scrollable range
    /// until the next layout clamps it.
    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Point) {
        self.offset = Point::new(offset.x.max(0.0), offset.y.max(0.0));
    }

    fn axes(&self) -> impl Iterator<Item = Axis> + '_ {
        [Axis::Horizontal, Axis::Vertical]
            .into_iter()
            .filter(|a| self.scrolls(*a))
    }

    fn offset_along(&self, axis: Axis) -> f32 {
        self.offset.along(axis)
    }

    /// Set the offset along `axis`, clamped to `[0, max]`. Returns whether
    /// it changed.
    fn scroll_to(&mut self, axis: Axis, value: f32, max: f32) -> bool {
        let value = value.clamp(0.0, max.max(0.0));
        let slot = match axis {
            Axis::Horizontal => &mut self.offset.x,
            Axis::Vertical => &mut self.offset.y,
        };
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    fn bars(&self, ctx: &Context) -> Vec<Bar> {
        if !self.scrollbars {
            return Vec::new();
        }
        let own = ctx.parent_bounds();
        let content = ctx.bounds;
        let width = ctx.theme.scrollbar_width;
        self.axes()
            .filter_map(|axis| bar(axis, own, content, width))
            .collect()
    }

    fn bar_at(&self, ctx: &Context, p: Point) -> Option<Bar> {
        self.bars(ctx).into_iter().find(|b| b.track.contains(p))
    }
}

fn bar(axis: Axis, own: Rect, content: Rect, width: f32) -> Option<Bar> {
    let avail = own.extent(axis);
    let total = content.extent(axis);
    if total <= avail || avail <= 0.0 {
        return None;
    }
    let track = match axis {
        Axis::Vertical => Rect::new(own.right() - width, own.y, width, own.height),
        Axis::Horizontal => Rect::new(own.x, own.bottom() - width, own.width, width),
    };
    let len = track.extent(axis);
    let thumb_len = (len * avail / total).max(MIN_THUMB).min(len);
    let max_offset = total - avail;
    let offset = (own.start(axis) - content.start(axis)).clamp(0.0, max_offset);
    let pos = track.start(axis) + (len - thumb_len) * offset / max_offset;
    Some(Bar {
        axis,
        track,
        thumb: track.with_span(axis, pos, thumb_len),
        max_offset,
    })
}

impl ProxyPolicy for Port {
    fn limits(&self, ctx: &BasicContext, subject: &dyn Element) -> ViewLimits {
        let e = subject.limits(ctx);
        let mut min = e.min;
        if self.horizontal {
            min.width = min.width.min(MIN_PORT_SIZE);
        }
        if self.vertical {
            min.height = min.height.min(MIN_PORT_SIZE);
        }
        ViewLimits::new(min, e.max)
    }

    fn prepare_subject(&self, ctx: &BasicContext, bounds: Rect, subject: &dyn Element) -> Rect {
        let e = subject.limits(ctx);
        let content = e.clamp(bounds.size());
        let mut r = bounds.with_size(content);
        for axis in self.axes() {
            let max = (content.along(axis) - bounds.extent(axis)).max(0.0);
            let offset = self.offset_along(axis).clamp(0.0, max);
            r = r.with_span(axis, bounds.start(axis) - offset, content.along(axis));
        }
        r
    }

    fn subject_viewport(&self, viewport: Rect, bounds: Rect) -> Rect {
        viewport
            .intersection(&bounds)
            .unwrap_or(Rect::new(bounds.x, bounds.y, 0.0, 0.0))
    }

    fn layout(&mut self, ctx: &Context, subject: &mut dyn Element) {
        subject.layout(ctx);
        self.laid_out = Some(ctx.bounds);
    }

    fn draw(&mut self, ctx: &Context, subject: &mut dyn Element) {
        if self.laid_out != Some(ctx.bounds) {
            tracing::trace!(bounds = ?ctx.bounds, "port relayout after scroll");
            subject.layout(ctx);
            self.laid_out = Some(ctx.bounds);
        }
        let own = ctx.parent_bounds();
        {
            let mut cnv = ctx.canvas.borrow_mut();
            cnv.save();
            cnv.begin_path();
            cnv.rect(own);
            cnv.clip();
        }
        subject.draw(ctx);
        ctx.canvas.borrow_mut().restore();

        let bars = self.bars(ctx);
        if bars.is_empty() {
            return;
        }
        let mut cnv = ctx.canvas.borrow_mut();
        cnv.fill_style(ctx.theme.scrollbar_color);
        for b in bars {
            cnv.begin_path();
            cnv.round_rect(b.thumb, b.thumb.extent(b.axis.cross()) / 2.0);
            cnv.fill();
        }
    }

    fn hit_test(&self, ctx: &Context, subject: &dyn Element, p: Point) -> Option<Hit> {
        let own = ctx.parent_bounds();
        if !own.contains(p) {
            return None;
        }
        if self.bar_at(ctx, p).is_some() {
            return Some(Hit::new(own));
        }
        subject.hit_test(ctx, p)
    }

    fn click(&mut self, ctx: &Context, subject: &mut dyn Element, btn: MouseButton) -> bool {
        if btn.down {
            if let Some(b) = self.bar_at(ctx, btn.pos) {
                let p = btn.pos.along(b.axis);
                if b.thumb.contains(btn.pos) {
                    self.thumb_drag = Some((b.axis, p - b.thumb.start(b.axis)));
                } else {
                    let page = ctx.parent_bounds().extent(b.axis);
                    let dir = if p < b.thumb.start(b.axis) { -1.0 } else { 1.0 };
                    let target = self.offset_along(b.axis) + dir * page;
                    if self.scroll_to(b.axis, target, b.max_offset) {
                        ctx.view.refresh(ctx.parent_bounds());
                    }
                }
                return true;
            }
        } else if self.thumb_drag.take().is_some() {
            return true;
        }
        subject.click(ctx, btn)
    }

    fn drag(&mut self, ctx: &Context, subject: &mut dyn Element, btn: MouseButton) {
        let Some((axis, grab)) = self.thumb_drag else {
            subject.drag(ctx, btn);
            return;
        };
        let Some(b) = self.bars(ctx).into_iter().find(|b| b.axis == axis) else {
            return;
        };
        let travel = b.travel();
        if travel <= 0.0 {
            return;
        }
        let pos = btn.pos.along(axis) - grab - b.track.start(axis);
        if self.scroll_to(axis, pos / travel * b.max_offset, b.max_offset) {
            ctx.view.refresh(ctx.parent_bounds());
        }
    }

    fn key(&mut self, ctx: &Context, subject: &mut dyn Element, k: &KeyInfo) -> bool {
        if subject.key(ctx, k) {
            return true;
        }
        let axis = if self.vertical {
            Axis::Vertical
        } else if self.horizontal {
            Axis::Horizontal
        } else {
            return false;
        };
        let page = ctx.parent_bounds().extent(axis);
        let max = ctx.bounds.extent(axis) - page;
        let current = self.offset_along(axis);
        let target = if k.is_pressed(NamedKey::Home) {
            0.0
        } else if k.is_pressed(NamedKey::End) {
            max
        } else if k.is_pressed(NamedKey::PageUp) {
            current - page
        } else if k.is_pressed(NamedKey::PageDown) {
            current + page
        } else {
            return false;
        };
        if self.scroll_to(axis, target, max) {
            ctx.view.refresh(ctx.parent_bounds());
        }
        true
    }

    fn cursor(
        &mut self,
        ctx: &Context,
        subject: &mut dyn Element,
        p: Point,
        status: CursorTracking,
    ) -> bool {
        if status != CursorTracking::Leaving && self.bar_at(ctx, p).is_some() {
            ctx.view.set_cursor(CursorKind::Arrow);
            return true;
        }
        subject.cursor(ctx, p, status)
    }

    fn scroll(&mut self, ctx: &Context, subject: &mut dyn Element, dir: Point, p: Point) -> bool {
        if subject.scroll(ctx, dir, p) {
            return true;
        }
        let own = ctx.parent_bounds();
        let mut changed = false;
        let axes: Vec<Axis> = self.axes().collect();
        for axis in axes {
            let max = ctx.bounds.extent(axis) - own.extent(axis);
            let target = self.offset_along(axis) - dir.along(axis);
            changed |= self.scroll_to(axis, target, max);
        }
        if changed {
            ctx.view.refresh(own);
        }
        changed
    }

    fn is_control(&self, _subject: &dyn Element) -> bool {
        true
    }
}

impl Proxy<Port> {
    /// Scroll so that `target` (in the coordinates of `ctx`) is visible,
    /// leaving the theme's clearance around it. `ctx` is the port's own
    /// context. Returns whether the offset changed.
    pub fn scroll_into_view(&mut self, ctx: &Context, target: Rect) -> bool {
        let content = self.subject_bounds(ctx);
        let clearance = ctx.theme.scroll_clearance;
        let own = ctx.bounds;
        let port = self.policy_mut();
        let axes: Vec<Axis> = port.axes().collect();
        let mut changed = false;
        for axis in axes {
            let start = own.start(axis);
            let end = start + own.extent(axis);
            let max = content.extent(axis) - own.extent(axis);
            let current = start - content.start(axis);
            let t_start = target.start(axis);
            let t_end = t_start + target.extent(axis);
            let wanted = if t_end > end {
                current + (t_end - end) + clearance
            } else if t_start < start {
                current - (start - t_start) - clearance
            } else {
                continue;
            };
            changed |= port.scroll_to(axis, wanted, max);
        }
        if changed {
            ctx.refresh();
        }
        changed
    }
}

/// Scrolls both axes, no scrollbars.
pub fn port(subject: impl Element + 'static) -> Proxy<Port> {
    Proxy::new(Port::new(true, true, false), subject)
}

pub fn vport(subject: impl Element + 'static) -> Proxy<Port> {
    Proxy::new(Port::new(false, true, false), subject)
}

pub fn hport(subject: impl Element + 'static) -> Proxy<Port> {
    Proxy::new(Port::new(true, false, false), subject)
}

/// Scrolls both axes with scrollbars.
pub fn scroller(subject: impl Element + 'static) -> Proxy<Port> {
    Proxy::new(Port::new(true, true, true), subject)
}

pub fn vscroller(subject: impl Element + 'static) -> Proxy<Port> {
    Proxy::new(Port::new(false, true, true), subject)
}

pub fn hscroller(subject: impl Element + 'static) -> Proxy<Port> {
    Proxy::new(Port::new(true, false, true), subject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DrawCommand;
    use crate::context::testing::Harness;
    use crate::element::Rectangle;
    use crate::layout::FULL_EXTENT;
    use crate::primitives::{Color, Size};

    fn tall() -> Rectangle {
        Rectangle::new(Color::WHITE).with_limits(ViewLimits::new(
            Size::new(50.0, 1000.0),
            Size::new(FULL_EXTENT, 1000.0),
        ))
    }

    #[test]
    fn port_limits_shrink_on_scrollable_axis() {
        let h = Harness::new();
        let p = vport(tall());
        let limits = p.limits(&h.basic());
        assert_eq!(limits.min, Size::new(50.0, MIN_PORT_SIZE));
        assert_eq!(limits.max, Size::new(FULL_EXTENT, 1000.0));
    }

    #[test]
    fn wheel_scroll_moves_content_and_clamps() {
        let h = Harness::new();
        let mut p = vscroller(tall());
        let ctx = h.ctx(Rect::new(0.0, 0.0, 100.0, 200.0));
        p.layout(&ctx);
        assert_eq!(p.subject_bounds(&ctx), Rect::new(0.0, 0.0, 100.0, 1000.0));

        assert!(p.scroll(&ctx, Point::new(0.0, -300.0), Point::new(10.0, 10.0)));
        assert_eq!(p.policy().offset(), Point::new(0.0, 300.0));
        assert_eq!(p.subject_bounds(&ctx), Rect::new(0.0, -300.0, 100.0, 1000.0));

        assert!(p.scroll(&ctx, Point::new(0.0, -5000.0), Point::new(10.0, 10.0)));
        assert_eq!(p.policy().offset().y, 800.0);
        assert!(!p.scroll(&ctx, Point::new(0.0, -10.0), Point::new(10.0, 10.0)));
        assert!(h.state.take_dirty().is_some());
    }

    #[test]
    fn keys_jump_and_page() {
        let h = Harness::new();
        let mut p = vscroller(tall());
        let ctx = h.ctx(Rect::new(0.0, 0.0, 100.0, 200.0));
        assert!(p.key(&ctx, &KeyInfo::press(NamedKey::End)));
        assert_eq!(p.policy().offset().y, 800.0);
        assert!(p.key(&ctx, &KeyInfo::press(NamedKey::PageUp)));
        assert_eq!(p.policy().offset().y, 600.0);
        assert!(p.key(&ctx, &KeyInfo::press(NamedKey::Home)));
        assert_eq!(p.policy().offset().y, 0.0);
        assert!(!p.key(&ctx, &KeyInfo::press(NamedKey::Enter)));
    }

    #[test]
    fn draw_clips_and_paints_thumb() {
        let h = Harness::new();
        let mut p = vscroller(tall());
        let ctx = h.ctx(Rect::new(0.0, 0.0, 100.0, 200.0));
        p.draw(&ctx);
        let cmds = h.canvas.borrow().commands().to_vec();
        assert!(cmds.contains(&DrawCommand::Clip(Rect::new(0.0, 0.0, 100.0, 200.0))));
        let thumb_len = 200.0 * 200.0 / 1000.0;
        let thumb = Rect::new(90.0, 0.0, 10.0, thumb_len);
        assert!(cmds.iter().any(|c| matches!(c,
            DrawCommand::Fill { bounds, .. } if *bounds == thumb)));
    }

    #[test]
    fn thumb_drag_scrolls_proportionally() {
        let h = Harness::new();
        let mut p = vscroller(tall());
        let ctx = h.ctx(Rect::new(0.0, 0.0, 100.0, 200.0));
        p.layout(&ctx);
        // Thumb spans 0..40; grab it at y = 10.
        assert!(p.click(&ctx, MouseButton::press(Point::new(95.0, 10.0))));
        p.drag(&ctx, MouseButton::press(Point::new(95.0, 90.0)));
        // 80px of 160px travel is half of the 800px range.
        assert_eq!(p.policy().offset().y, 400.0);
        assert!(p.click(&ctx, MouseButton::release(Point::new(95.0, 90.0))));
    }

    #[test]
    fn track_click_pages() {
        let h = Harness::new();
        let mut p = vscroller(tall());
        let ctx = h.ctx(Rect::new(0.0, 0.0, 100.0, 200.0));
        assert!(p.click(&ctx, MouseButton::press(Point::new(95.0, 150.0))));
        assert_eq!(p.policy().offset().y, 200.0);
    }

    #[test]
    fn scroll_into_view_adds_clearance() {
        let h = Harness::new();
        let mut p = vscroller(tall());
        let ctx = h.ctx(Rect::new(0.0, 0.0, 100.0, 200.0));
        assert!(p.scroll_into_view(&ctx, Rect::new(0.0, 300.0, 10.0, 20.0)));
        assert_eq!(p.policy().offset().y, 140.0);
        assert!(!p.scroll_into_view(&ctx, Rect::new(0.0, 50.0, 10.0, 20.0)));
        assert!(p.scroll_into_view(&ctx, Rect::new(0.0, -40.0, 10.0, 20.0)));
        assert_eq!(p.policy().offset().y, 80.0);
    }

    #[test]
    fn hits_outside_port_are_rejected() {
        let h = Harness::new();
        let p = vport(tall());
        let ctx = h.ctx(Rect::new(0.0, 0.0, 100.0, 200.0));
        assert!(p.hit_test(&ctx, Point::new(50.0, 500.0)).is_none());
        assert!(p.hit_test(&ctx, Point::new(50.0, 100.0)).is_some());
    }
}
