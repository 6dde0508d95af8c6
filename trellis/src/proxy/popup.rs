//! Transient floating content that dismisses itself.
//!
//! A popup sits on top of a layer and, while open, claims every point in
//! its own bounds so the content underneath gets nothing. Presses inside
//! the subject reach it as usual; a press anywhere else, or Escape, closes
//! the popup and runs the dismiss callback. A closed popup is inert.

use super::{Floating, Proxy, ProxyPolicy};
use crate::context::{BasicContext, Context};
use crate::element::{Element, Hit};
use crate::event::{CursorTracking, KeyInfo, MouseButton, NamedKey};
use crate::layout::ViewLimits;
use crate::primitives::{Point, Rect};

#[derive(Default)]
pub struct Popup {
    placement: Floating,
    open: bool,
    on_dismiss: Option<Box<dyn FnMut()>>,
}

impl Popup {
    pub fn is_open(&self) -> bool {
        self.open
    }

    fn dismiss(&mut self, ctx: &Context) {
        self.open = false;
        ctx.view.refresh(ctx.parent_bounds());
        tracing::debug!("popup dismissed");
        if let Some(f) = self.on_dismiss.as_mut() {
            f();
        }
    }
}

impl ProxyPolicy for Popup {
    fn limits(&self, ctx: &BasicContext, subject: &dyn Element) -> ViewLimits {
        self.placement.limits(ctx, subject)
    }

    fn prepare_subject(&self, ctx: &BasicContext, bounds: Rect, subject: &dyn Element) -> Rect {
        self.placement.prepare_subject(ctx, bounds, subject)
    }

    fn draw(&mut self, ctx: &Context, subject: &mut dyn Element) {
        if self.open {
            subject.draw(ctx);
        }
    }

    fn hit_test(&self, ctx: &Context, subject: &dyn Element, p: Point) -> Option<Hit> {
        if !self.open {
            return None;
        }
        let own = ctx.parent_bounds();
        subject
            .hit_test(ctx, p)
            .or_else(|| own.contains(p).then(|| Hit::new(own)))
    }

    fn click(&mut self, ctx: &Context, subject: &mut dyn Element, btn: MouseButton) -> bool {
        if !self.open {
            return false;
        }
        if ctx.bounds.contains(btn.pos) {
            return subject.click(ctx, btn);
        }
        if btn.down {
            self.dismiss(ctx);
        }
        true
    }

    fn key(&mut self, ctx: &Context, subject: &mut dyn Element, k: &KeyInfo) -> bool {
        if !self.open {
            return false;
        }
        if subject.key(ctx, k) {
            return true;
        }
        if k.is_pressed(NamedKey::Escape) {
            self.dismiss(ctx);
            return true;
        }
        false
    }

    fn cursor(
        &mut self,
        ctx: &Context,
        subject: &mut dyn Element,
        p: Point,
        status: CursorTracking,
    ) -> bool {
        if !self.open {
            return false;
        }
        subject.cursor(ctx, p, status);
        ctx.bounds.contains(p)
    }

    fn scroll(&mut self, ctx: &Context, subject: &mut dyn Element, dir: Point, p: Point) -> bool {
        self.open && subject.scroll(ctx, dir, p)
    }

    fn wants_focus(&self, subject: &dyn Element) -> bool {
        self.open && subject.wants_focus()
    }

    fn is_control(&self, _subject: &dyn Element) -> bool {
        self.open
    }
}

impl Proxy<Popup> {
    pub fn on_dismiss(mut self, f: impl FnMut() + 'static) -> Self {
        self.policy_mut().on_dismiss = Some(Box::new(f));
        self
    }

    pub fn is_open(&self) -> bool {
        self.policy().is_open()
    }

    /// Show the popup. The caller refreshes the view.
    pub fn open(&mut self) {
        self.policy_mut().open = true;
    }

    /// Hide the popup without running the dismiss callback.
    pub fn close(&mut self) {
        self.policy_mut().open = false;
    }
}

/// Closed popup centered in `area`, or in its own bounds when `None`.
pub fn popup(area: Option<Rect>, subject: impl Element + 'static) -> Proxy<Popup> {
    Proxy::new(
        Popup {
            placement: Floating { area },
            ..Default::default()
        },
        subject,
    )
}
