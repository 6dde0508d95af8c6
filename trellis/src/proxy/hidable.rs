//! Subjects that can be switched off without leaving the tree.
//!
//! A hidden subject keeps its place in the layout but paints nothing and
//! takes no pointer or keyboard input. A collapsed subject also gives up
//! its extent along one axis, so the container closes the gap on its next
//! layout. Flip the flag with `set_hidden` or `set_collapsed`, then relayout
//! the view.

use super::{Proxy, ProxyPolicy};
use crate::context::{BasicContext, Context};
use crate::element::{Element, Hit};
use crate::event::MouseButton;
use crate::layout::ViewLimits;
use crate::primitives::{Axis, Point, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hidable {
    pub hidden: bool,
}

impl ProxyPolicy for Hidable {
    fn draw(&mut self, ctx: &Context, subject: &mut dyn Element) {
        if !self.hidden {
            subject.draw(ctx);
        }
    }

    fn hit_test(&self, ctx: &Context, subject: &dyn Element, p: Point) -> Option<Hit> {
        if self.hidden {
            return None;
        }
        subject.hit_test(ctx, p)
    }

    fn click(&mut self, ctx: &Context, subject: &mut dyn Element, btn: MouseButton) -> bool {
        !self.hidden && subject.click(ctx, btn)
    }

    fn wants_focus(&self, subject: &dyn Element) -> bool {
        !self.hidden && subject.wants_focus()
    }

    fn is_control(&self, subject: &dyn Element) -> bool {
        !self.hidden && subject.is_control()
    }
}

/// Like [`Hidable`], but a collapsed subject is also squashed to zero
/// along `axis`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collapsable {
    pub axis: Axis,
    pub collapsed: bool,
}

impl Collapsable {
    fn as_hidable(&self) -> Hidable {
        Hidable {
            hidden: self.collapsed,
        }
    }
}

impl ProxyPolicy for Collapsable {
    fn limits(&self, ctx: &BasicContext, subject: &dyn Element) -> ViewLimits {
        let limits = subject.limits(ctx);
        if !self.collapsed {
            return limits;
        }
        let cross = self.axis.cross();
        ViewLimits::new(
            Size::from_axis(self.axis, 0.0, limits.min_along(cross)),
            Size::from_axis(self.axis, 0.0, limits.max_along(cross)),
        )
    }

    fn draw(&mut self, ctx: &Context, subject: &mut dyn Element) {
        self.as_hidable().draw(ctx, subject)
    }

    fn hit_test(&self, ctx: &Context, subject: &dyn Element, p: Point) -> Option<Hit> {
        self.as_hidable().hit_test(ctx, subject, p)
    }

    fn click(&mut self, ctx: &Context, subject: &mut dyn Element, btn: MouseButton) -> bool {
        self.as_hidable().click(ctx, subject, btn)
    }

    fn wants_focus(&self, subject: &dyn Element) -> bool {
        self.as_hidable().wants_focus(subject)
    }

    fn is_control(&self, subject: &dyn Element) -> bool {
        self.as_hidable().is_control(subject)
    }
}

impl Proxy<Hidable> {
    pub fn is_hidden(&self) -> bool {
        self.policy().hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.policy_mut().hidden = hidden;
    }
}

impl Proxy<Collapsable> {
    pub fn is_collapsed(&self) -> bool {
        self.policy().collapsed
    }

    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.policy_mut().collapsed = collapsed;
    }
}

pub fn hidable(subject: impl Element + 'static) -> Proxy<Hidable> {
    Proxy::new(Hidable::default(), subject)
}

/// Collapses to zero height.
pub fn vcollapsable(subject: impl Element + 'static) -> Proxy<Collapsable> {
    Proxy::new(
        Collapsable {
            axis: Axis::Vertical,
            collapsed: false,
        },
        subject,
    )
}

/// Collapses to zero width.
pub fn hcollapsable(subject: impl Element + 'static) -> Proxy<Collapsable> {
    Proxy::new(
        Collapsable {
            axis: Axis::Horizontal,
            collapsed: false,
        },
        subject,
    )
}
