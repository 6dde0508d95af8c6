use super::{Proxy, ProxyPolicy};
use crate::context::BasicContext;
use crate::element::Element;
use crate::layout::ViewLimits;
use crate::primitives::{Insets, Rect};

/// Fixed padding around the subject.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin(pub Insets);

impl ProxyPolicy for Margin {
    fn limits(&self, ctx: &BasicContext, subject: &dyn Element) -> ViewLimits {
        subject.limits(ctx).inflate(&self.0)
    }

    fn prepare_subject(&self, _ctx: &BasicContext, bounds: Rect, _subject: &dyn Element) -> Rect {
        bounds.inset(self.0)
    }
}

pub fn margin(insets: Insets, subject: impl Element + 'static) -> Proxy<Margin> {
    Proxy::new(Margin(insets), subject)
}

pub fn left_margin(left: f32, subject: impl Element + 'static) -> Proxy<Margin> {
    margin(Insets::new(left, 0.0, 0.0, 0.0), subject)
}

pub fn top_margin(top: f32, subject: impl Element + 'static) -> Proxy<Margin> {
    margin(Insets::new(0.0, top, 0.0, 0.0), subject)
}

pub fn right_margin(right: f32, subject: impl Element + 'static) -> Proxy<Margin> {
    margin(Insets::new(0.0, 0.0, right, 0.0), subject)
}

pub fn bottom_margin(bottom: f32, subject: impl Element + 'static) -> Proxy<Margin> {
    margin(Insets::new(0.0, 0.0, 0.0, bottom), subject)
}
