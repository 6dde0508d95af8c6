//! Linear slider: a thumb moving along a track.

use crate::context::{BasicContext, Context};
use crate::element::tracker::{TrackerInfo, Tracking, track_click, track_drag};
use crate::element::{Element, ElementPtr, Value};
use crate::event::MouseButton;
use crate::layout::ViewLimits;
use crate::primitives::{Point, Rect};

/// Orientation follows the track: wider than tall means horizontal. On a
/// vertical slider, `0.0` is at the bottom.
pub struct Slider {
    thumb: ElementPtr,
    track: ElementPtr,
    value: f64,
    tracker: Option<TrackerInfo>,
    on_change: Option<Box<dyn FnMut(f64)>>,
}

impl Slider {
    pub fn new(thumb: impl Element + 'static, track: impl Element + 'static, init: f64) -> Self {
        Self {
            thumb: Box::new(thumb),
            track: Box::new(track),
            value: init.clamp(0.0, 1.0),
            tracker: None,
            on_change: None,
        }
    }

    pub fn on_change(mut self, f: impl FnMut(f64) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    fn is_horizontal(&self, ctx: &BasicContext) -> bool {
        let limits = self.track.limits(ctx);
        limits.max.width > limits.max.height
    }

    fn track_bounds(&self, ctx: &Context) -> Rect {
        let limits = self.track.limits(ctx);
        let b = ctx.bounds;
        if self.is_horizontal(ctx) {
            let h = limits.max.height.min(b.height);
            Rect::new(b.x, b.y + (b.height - h) / 2.0, b.width, h)
        } else {
            let w = limits.max.width.min(b.width);
            Rect::new(b.x + (b.width - w) / 2.0, b.y, w, b.height)
        }
    }

    fn thumb_bounds(&self, ctx: &Context) -> Rect {
        let limits = self.thumb.limits(ctx);
        let b = ctx.bounds;
        let (tw, th) = (limits.max.width.min(b.width), limits.max.height.min(b.height));
        if self.is_horizontal(ctx) {
            let x = b.x + (b.width - tw) * self.value as f32;
            Rect::new(x, b.y + (b.height - th) / 2.0, tw, th)
        } else {
            let y = b.y + (b.height - th) * (1.0 - self.value as f32);
            Rect::new(b.x + (b.width - tw) / 2.0, y, tw, th)
        }
    }

    fn value_from_point(&self, ctx: &Context, p: Point) -> f64 {
        let thumb = self.thumb_bounds(ctx);
        let b = ctx.bounds;
        let v = if self.is_horizontal(ctx) {
            let span = b.width - thumb.width;
            if span <= 0.0 {
                return self.value;
            }
            (p.x - (b.x + thumb.width / 2.0)) / span
        } else {
            let span = b.height - thumb.height;
            if span <= 0.0 {
                return self.value;
            }
            1.0 - (p.y - (b.y + thumb.height / 2.0)) / span
        };
        f64::from(v).clamp(0.0, 1.0)
    }

    fn update(&mut self, ctx: &Context, value: f64) {
        let value = value.clamp(0.0, 1.0);
        if value == self.value {
            return;
        }
        self.value = value;
        self.thumb.set_value(Value::Double(value));
        if let Some(f) = self.on_change.as_mut() {
            f(value);
        }
        ctx.refresh();
    }
}

impl Tracking for Slider {
    fn tracker_state(&mut self) -> &mut Option<TrackerInfo> {
        &mut self.tracker
    }

    fn begin_tracking(&mut self, ctx: &Context, info: &mut TrackerInfo) {
        let thumb = self.thumb_bounds(ctx);
        if thumb.contains(info.current) {
            info.offset = info.current - thumb.center();
        }
    }

    fn keep_tracking(&mut self, ctx: &Context, info: &mut TrackerInfo) {
        if info.current != info.previous {
            let v = self.value_from_point(ctx, info.current);
            self.update(ctx, v);
        }
    }

    fn end_tracking(&mut self, ctx: &Context, info: &mut TrackerInfo) {
        let v = self.value_from_point(ctx, info.current);
        self.update(ctx, v);
    }
}

impl Element for Slider {
    fn limits(&self, ctx: &BasicContext) -> ViewLimits {
        let mut limits = self.track.limits(ctx);
        let thumb = self.thumb.limits(ctx);
        if self.is_horizontal(ctx) {
            limits.min.height = limits.min.height.max(thumb.min.height);
            limits.max.height = limits.max.height.max(thumb.max.height);
            limits.min.width = limits.min.width.max(thumb.min.width * 2.0);
        } else {
            limits.min.width = limits.min.width.max(thumb.min.width);
            limits.max.width = limits.max.width.max(thumb.max.width);
            limits.min.height = limits.min.height.max(thumb.min.height * 2.0);
        }
        limits.validated()
    }

    fn layout(&mut self, ctx: &Context) {
        let track = self.track_bounds(ctx);
        let thumb = self.thumb_bounds(ctx);
        self.track.layout(&ctx.child(0, track));
        self.thumb.layout(&ctx.child(1, thumb));
    }

    fn draw(&mut self, ctx: &Context) {
        let track = self.track_bounds(ctx);
        let thumb = self.thumb_bounds(ctx);
        self.track.draw(&ctx.child(0, track));
        self.thumb.draw(&ctx.child(1, thumb));
    }

    fn click(&mut self, ctx: &Context, btn: MouseButton) -> bool {
        track_click(self, ctx, btn)
    }

    fn drag(&mut self, ctx: &Context, btn: MouseButton) {
        track_drag(self, ctx, btn)
    }

    fn scroll(&mut self, ctx: &Context, dir: Point, _p: Point) -> bool {
        let delta = if self.is_horizontal(ctx) { -dir.x } else { dir.y };
        let before = self.value;
        self.update(ctx, self.value + f64::from(delta * ctx.theme.scroll_step));
        self.value != before
    }

    fn is_control(&self) -> bool {
        true
    }

    fn set_value(&mut self, value: Value) {
        if let Some(v) = value.as_f64() {
            self.value = v.clamp(0.0, 1.0);
            self.thumb.set_value(Value::Double(self.value));
        }
    }
}
