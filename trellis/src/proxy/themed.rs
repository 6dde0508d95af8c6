use crate::context::{BasicContext, Context};
use crate::element::{Element, ElementPtr, Hit, Value};
use crate::event::{CursorTracking, FocusRequest, KeyInfo, MouseButton, TextInfo};
use crate::layout::{ViewLimits, ViewStretch};
use crate::payload::DropInfo;
use crate::primitives::Point;
use crate::theme::Theme;

/// Applies a different theme to everything below it.
pub struct Themed {
    theme: Theme,
    subject: ElementPtr,
}

impl Themed {
    pub fn new(theme: Theme, subject: impl Element + 'static) -> Self {
        Self {
            theme,
            subject: Box::new(subject),
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn theme_mut(&mut self) -> &mut Theme {
        &mut self.theme
    }
}

impl Element for Themed {
    fn limits(&self, ctx: &BasicContext) -> ViewLimits {
        let basic = BasicContext::new(ctx.view, ctx.canvas, &self.theme);
        self.subject.limits(&basic)
    }

    fn stretch(&self) -> ViewStretch {
        self.subject.stretch()
    }

    fn hit_test(&self, ctx: &Context, p: Point) -> Option<Hit> {
        self.subject.hit_test(&ctx.with_theme(&self.theme), p)
    }

    fn draw(&mut self, ctx: &Context) {
        self.subject.draw(&ctx.with_theme(&self.theme))
    }

    fn layout(&mut self, ctx: &Context) {
        self.subject.layout(&ctx.with_theme(&self.theme))
    }

    fn click(&mut self, ctx: &Context, btn: MouseButton) -> bool {
        self.subject.click(&ctx.with_theme(&self.theme), btn)
    }

    fn drag(&mut self, ctx: &Context, btn: MouseButton) {
        self.subject.drag(&ctx.with_theme(&self.theme), btn)
    }

    fn key(&mut self, ctx: &Context, k: &KeyInfo) -> bool {
        self.subject.key(&ctx.with_theme(&self.theme), k)
    }

    fn text(&mut self, ctx: &Context, info: TextInfo) -> bool {
        self.subject.text(&ctx.with_theme(&self.theme), info)
    }

    fn cursor(&mut self, ctx: &Context, p: Point, status: CursorTracking) -> bool {
        self.subject.cursor(&ctx.with_theme(&self.theme), p, status)
    }

    fn scroll(&mut self, ctx: &Context, dir: Point, p: Point) -> bool {
        self.subject.scroll(&ctx.with_theme(&self.theme), dir, p)
    }

    fn wants_focus(&self) -> bool {
        self.subject.wants_focus()
    }

    fn focus(&mut self, req: FocusRequest) -> bool {
        self.subject.focus(req)
    }

    fn is_control(&self) -> bool {
        self.subject.is_control()
    }

    fn track_drop(&mut self, ctx: &Context, info: &DropInfo, status: CursorTracking) {
        self.subject
            .track_drop(&ctx.with_theme(&self.theme), info, status)
    }

    fn drop_payload(&mut self, ctx: &Context, info: &DropInfo) -> bool {
        self.subject
            .drop_payload(&ctx.with_theme(&self.theme), info)
    }

    fn set_value(&mut self, value: Value) {
        self.subject.set_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::Harness;
    use crate::element::Label;
    use crate::primitives::Rect;

    #[test]
    fn subtree_sees_overridden_theme() {
        let h = Harness::new();
        let big = Theme {
            label_font_size: 28.0,
            ..Theme::default()
        };
        let plain = Label::new("abc").limits(&h.basic());
        let themed = Themed::new(big, Label::new("abc"));
        let limits = themed.limits(&h.basic());
        assert_eq!(limits.min.width, plain.min.width * 2.0);

        let mut themed = themed;
        themed.draw(&h.ctx(Rect::new(0.0, 0.0, 100.0, 40.0)));
        assert!(h.canvas.borrow().commands().iter().any(|c| matches!(c,
            crate::canvas::DrawCommand::Text { size, .. } if *size == 28.0)));
    }
}
