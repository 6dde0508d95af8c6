use super::{Proxy, ProxyPolicy};
use crate::context::Context;
use crate::element::Element;
use crate::event::CursorTracking;
use crate::payload::{DropInfo, Payload};

type DropHandler = Box<dyn FnMut(&Payload) -> bool>;

/// Drop target. Highlights while a drag hovers over it and hands the
/// payload to `on_drop`, whose return value decides acceptance.
#[derive(Default)]
pub struct DropBox {
    highlight: bool,
    on_drop: Option<DropHandler>,
}

impl DropBox {
    pub fn is_highlighted(&self) -> bool {
        self.highlight
    }
}

impl ProxyPolicy for DropBox {
    fn draw(&mut self, ctx: &Context, subject: &mut dyn Element) {
        subject.draw(ctx);
        if self.highlight {
            let mut cnv = ctx.canvas.borrow_mut();
            cnv.begin_path();
            cnv.rect(ctx.parent_bounds());
            cnv.fill_style(ctx.theme.drop_highlight_color);
            cnv.fill();
        }
    }

    fn is_control(&self, _subject: &dyn Element) -> bool {
        true
    }

    fn track_drop(
        &mut self,
        ctx: &Context,
        _subject: &mut dyn Element,
        _info: &DropInfo,
        status: CursorTracking,
    ) {
        let highlight = status != CursorTracking::Leaving;
        if highlight != self.highlight {
            self.highlight = highlight;
            ctx.view.refresh(ctx.parent_bounds());
        }
    }

    fn drop_payload(&mut self, ctx: &Context, _subject: &mut dyn Element, info: &DropInfo) -> bool {
        if self.highlight {
            self.highlight = false;
            ctx.view.refresh(ctx.parent_bounds());
        }
        let accepted = self.on_drop.as_mut().is_some_and(|f| f(&info.payload));
        tracing::debug!(accepted, "drop delivered");
        accepted
    }
}

impl Proxy<DropBox> {
    pub fn on_drop(mut self, f: impl FnMut(&Payload) -> bool + 'static) -> Self {
        self.policy_mut().on_drop = Some(Box::new(f));
        self
    }
}

pub fn drop_box(subject: impl Element + 'static) -> Proxy<DropBox> {
    Proxy::new(DropBox::default(), subject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::Harness;
    use crate::element::Empty;
    use crate::payload::{PLAIN_TEXT, PayloadData};
    use crate::primitives::{Point, Rect};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn highlight_follows_tracking_and_drop_calls_back() {
        let h = Harness::new();
        let ctx = h.ctx(Rect::new(0.0, 0.0, 50.0, 50.0));
        let received = Rc::new(RefCell::new(None));
        let r = received.clone();
        let mut b = drop_box(Empty).on_drop(move |payload| {
            *r.borrow_mut() = payload.get(PLAIN_TEXT).cloned();
            true
        });
        let info = DropInfo::new(Payload::new().text(PLAIN_TEXT, "hi"), Point::new(5.0, 5.0));

        b.track_drop(&ctx, &info, CursorTracking::Entering);
        assert!(b.policy().is_highlighted());
        b.track_drop(&ctx, &info, CursorTracking::Leaving);
        assert!(!b.policy().is_highlighted());
        b.track_drop(&ctx, &info, CursorTracking::Hovering);

        assert!(b.drop_payload(&ctx, &info));
        assert!(!b.policy().is_highlighted());
        assert_eq!(*received.borrow(), Some(PayloadData::Text("hi".into())));
    }

    #[test]
    fn without_handler_drop_is_rejected() {
        let h = Harness::new();
        let ctx = h.ctx(Rect::new(0.0, 0.0, 50.0, 50.0));
        let mut b = drop_box(Empty);
        let info = DropInfo::new(Payload::new(), Point::ORIGIN);
        assert!(!b.drop_payload(&ctx, &info));
    }
}
