use super::{Proxy, ProxyPolicy};
use crate::context::BasicContext;
use crate::element::Element;
use crate::layout::ViewLimits;
use crate::primitives::{Rect, Size};

/// Places the subject at its natural size, centered in either the bounds
/// it is given or an explicit area (popups, tooltips).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Floating {
    pub area: Option<Rect>,
}

impl Floating {
    pub fn set_area(&mut self, area: Option<Rect>) {
        self.area = area;
    }
}

impl ProxyPolicy for Floating {
    fn limits(&self, ctx: &BasicContext, subject: &dyn Element) -> ViewLimits {
        ViewLimits::at_least(subject.limits(ctx).min)
    }

    fn prepare_subject(&self, ctx: &BasicContext, bounds: Rect, subject: &dyn Element) -> Rect {
        let area = self.area.unwrap_or(bounds);
        let size: Size = subject.limits(ctx).clamp(area.size());
        area.center_size(size)
    }
}

pub fn floating(area: Option<Rect>, subject: impl Element + 'static) -> Proxy<Floating> {
    Proxy::new(Floating { area }, subject)
}
