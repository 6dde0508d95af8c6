//! Rotary controls.
//!
//! A [`Dial`] wraps a visual subject (usually a [`Knob`]) and turns pointer
//! motion into a value in `0..=1`, pushed back to the subject with
//! `set_value`. Radial mode follows the angle around the center; linear
//! mode follows pointer displacement and ignores where the pointer is.

use std::f64::consts::TAU;

use crate::context::{BasicContext, Context};
use crate::element::tracker::{TrackerInfo, Tracking, track_click, track_drag};
use crate::element::{Element, Value};
use crate::event::MouseButton;
use crate::layout::ViewLimits;
use crate::primitives::{Point, Size};
use crate::proxy::{Proxy, ProxyPolicy};
use crate::theme::DialMode;

pub type Dial = Proxy<DialState>;

#[derive(Default)]
pub struct DialState {
    value: f64,
    mode: Option<DialMode>,
    tracker: Option<TrackerInfo>,
    on_change: Option<Box<dyn FnMut(f64)>>,
}

impl DialState {
    pub fn value(&self) -> f64 {
        self.value
    }

    fn update(&mut self, ctx: &Context, value: f64) -> bool {
        let value = value.clamp(0.0, 1.0);
        if value == self.value {
            return false;
        }
        self.value = value;
        if let Some(f) = self.on_change.as_mut() {
            f(value);
        }
        ctx.refresh();
        true
    }

    /// Value under `p` in radial mode, or the current value if the jump
    /// would exceed the theme's maximum delta (crossing the dead zone).
    fn value_from_point(&self, ctx: &Context, p: Point) -> f64 {
        let travel = f64::from(ctx.theme.dial_travel);
        let range = TAU * travel;
        let start = TAU * (1.0 - travel) / 2.0;
        let center = ctx.bounds.center();
        let mut angle = -f64::from(p.x - center.x).atan2(f64::from(p.y - center.y));
        if angle < 0.0 {
            angle += TAU;
        }
        let val = (angle - start) / range;
        if (val - self.value).abs() < f64::from(ctx.theme.dial_max_delta) {
            val.clamp(0.0, 1.0)
        } else {
            self.value
        }
    }
}

impl Tracking for DialState {
    fn tracker_state(&mut self) -> &mut Option<TrackerInfo> {
        &mut self.tracker
    }

    fn keep_tracking(&mut self, ctx: &Context, info: &mut TrackerInfo) {
        if info.current == info.previous {
            return;
        }
        let mode = self.mode.unwrap_or(ctx.theme.dial_mode);
        let next = match mode {
            DialMode::Radial => self.value_from_point(ctx, info.current),
            DialMode::Linear => {
                let delta = (info.current.x - info.previous.x) - (info.current.y - info.previous.y);
                let mut range = ctx.theme.dial_linear_range;
                if info.modifiers.shift {
                    range *= 5.0;
                }
                self.value + f64::from(delta / range)
            }
        };
        self.update(ctx, next);
    }
}

impl ProxyPolicy for DialState {
    fn click(&mut self, ctx: &Context, _subject: &mut dyn Element, btn: MouseButton) -> bool {
        track_click(self, ctx, btn)
    }

    fn drag(&mut self, ctx: &Context, subject: &mut dyn Element, btn: MouseButton) {
        let before = self.value;
        track_drag(self, ctx, btn);
        if self.value != before {
            subject.set_value(Value::Double(self.value));
        }
    }

    fn scroll(&mut self, ctx: &Context, subject: &mut dyn Element, dir: Point, _p: Point) -> bool {
        let step = f64::from(ctx.theme.scroll_step);
        let next = self.value + f64::from(dir.x + dir.y) * step;
        if self.update(ctx, next) {
            subject.set_value(Value::Double(self.value));
        }
        true
    }

    fn is_control(&self, _subject: &dyn Element) -> bool {
        true
    }

    fn set_value(&mut self, subject: &mut dyn Element, value: Value) {
        if let Some(v) = value.as_f64() {
            self.value = v.clamp(0.0, 1.0);
            subject.set_value(Value::Double(self.value));
        }
    }
}

impl Proxy<DialState> {
    pub fn value(&self) -> f64 {
        self.policy().value()
    }

    pub fn on_change(mut self, f: impl FnMut(f64) + 'static) -> Self {
        self.policy_mut().on_change = Some(Box::new(f));
        self
    }

    /// Override the theme's dial mode for this dial.
    pub fn mode(mut self, mode: DialMode) -> Self {
        self.policy_mut().mode = Some(mode);
        self
    }
}

pub fn dial(subject: impl Element + 'static, init: f64) -> Dial {
    let mut d = Proxy::new(DialState::default(), subject);
    d.set_value(Value::Double(init));
    d
}

/// Round knob of a fixed diameter with a value indicator.
#[derive(Debug, Clone)]
pub struct Knob {
    size: f32,
    value: f64,
}

impl Knob {
    pub fn new(size: f32) -> Self {
        Self { size, value: 0.0 }
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Element for Knob {
    fn limits(&self, _ctx: &BasicContext) -> ViewLimits {
        ViewLimits::fixed(Size::new(self.size, self.size))
    }

    fn draw(&mut self, ctx: &Context) {
        let center = ctx.bounds.center();
        let radius = ctx.bounds.width.min(ctx.bounds.height) / 2.0;
        let travel = f64::from(ctx.theme.dial_travel);
        let angle = TAU * (1.0 - travel) / 2.0 + self.value * TAU * travel;
        let tip = Point::new(
            center.x - (angle.sin() as f32) * radius * 0.7,
            center.y + (angle.cos() as f32) * radius * 0.7,
        );
        let mut cnv = ctx.canvas.borrow_mut();
        cnv.begin_path();
        cnv.circle(center, radius);
        cnv.fill_style(ctx.theme.frame_color);
        cnv.fill();
        cnv.begin_path();
        cnv.circle(tip, radius * 0.1);
        cnv.fill_style(ctx.theme.indicator_color);
        cnv.fill();
    }

    fn set_value(&mut self, value: Value) {
        if let Some(v) = value.as_f64() {
            self.value = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::Harness;
    use crate::event::Modifiers;
    use crate::primitives::Rect;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn linear_drag_follows_displacement() {
        let h = Harness::new();
        let ctx = h.ctx(Rect::new(0.0, 0.0, 40.0, 40.0));
        let changes = Rc::new(Cell::new(0));
        let c = changes.clone();
        let mut d = dial(Knob::new(40.0), 0.5).on_change(move |_| c.set(c.get() + 1));

        let start = Point::new(20.0, 20.0);
        assert!(d.click(&ctx, MouseButton::press(start)));
        d.drag(&ctx, MouseButton::press(start).at(Point::new(40.0, 20.0)));
        assert!((d.value() - 0.6).abs() < 1e-6);

        let fine = MouseButton::press(start).with_modifiers(Modifiers::SHIFT);
        d.drag(&ctx, fine.at(Point::new(60.0, 20.0)));
        assert!((d.value() - 0.62).abs() < 1e-6);
        assert!(d.click(&ctx, MouseButton::release(Point::new(60.0, 20.0))));
        assert_eq!(changes.get(), 2);
    }

    #[test]
    fn wheel_adjusts_and_clamps() {
        let h = Harness::new();
        let ctx = h.ctx(Rect::new(0.0, 0.0, 40.0, 40.0));
        let mut d = dial(Knob::new(40.0), 0.5);
        assert!(d.scroll(&ctx, Point::new(0.0, 20.0), Point::new(20.0, 20.0)));
        assert!((d.value() - 0.6).abs() < 1e-6);
        d.scroll(&ctx, Point::new(0.0, 1000.0), Point::new(20.0, 20.0));
        assert_eq!(d.value(), 1.0);
    }

    #[test]
    fn radial_drag_tracks_angle() {
        let h = Harness::new();
        let ctx = h.ctx(Rect::new(0.0, 0.0, 100.0, 100.0));
        let mut d = dial(Knob::new(100.0), 0.5).mode(DialMode::Radial);
        assert!(d.click(&ctx, MouseButton::press(Point::new(50.0, 10.0))));
        // Straight up is the middle of the travel.
        d.drag(&ctx, MouseButton::press(Point::new(50.0, 10.0)).at(Point::new(50.0, 9.0)));
        assert!((d.value() - 0.5).abs() < 1e-6);
        // Straight right is three quarters of a turn from the bottom.
        d.drag(&ctx, MouseButton::press(Point::new(90.0, 50.0)));
        let expected = (0.75 * TAU - TAU * 0.09) / (TAU * 0.82);
        assert!((d.value() - expected).abs() < 1e-3);
    }

    #[test]
    fn knob_receives_pushed_values() {
        let mut d = dial(Knob::new(10.0), 0.25);
        d.set_value(Value::Double(2.0));
        assert_eq!(d.value(), 1.0);
    }
}
