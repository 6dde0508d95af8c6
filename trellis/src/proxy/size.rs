//! Size and stretch overrides.

use super::{Proxy, ProxyPolicy};
use crate::context::BasicContext;
use crate::element::Element;
use crate::layout::{ViewLimits, ViewStretch};
use crate::primitives::{Rect, Size};

/// Pins one or both axes to a fixed extent, clamped to what the subject
/// accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedSize {
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl FixedSize {
    fn resolve(&self, limits: &ViewLimits) -> (Option<f32>, Option<f32>) {
        (
            self.width
                .map(|w| w.clamp(limits.min.width, limits.max.width)),
            self.height
                .map(|h| h.clamp(limits.min.height, limits.max.height)),
        )
    }
}

impl ProxyPolicy for FixedSize {
    fn limits(&self, ctx: &BasicContext, subject: &dyn Element) -> ViewLimits {
        let mut e = subject.limits(ctx);
        let (w, h) = self.resolve(&e);
        if let Some(w) = w {
            e.min.width = w;
            e.max.width = w;
        }
        if let Some(h) = h {
            e.min.height = h;
            e.max.height = h;
        }
        e
    }

    fn prepare_subject(&self, ctx: &BasicContext, mut bounds: Rect, subject: &dyn Element) -> Rect {
        let (w, h) = self.resolve(&subject.limits(ctx));
        if let Some(w) = w {
            bounds.width = w;
        }
        if let Some(h) = h {
            bounds.height = h;
        }
        bounds
    }
}

pub fn fixed_size(size: Size, subject: impl Element + 'static) -> Proxy<FixedSize> {
    Proxy::new(
        FixedSize {
            width: Some(size.width),
            height: Some(size.height),
        },
        subject,
    )
}

pub fn hsize(width: f32, subject: impl Element + 'static) -> Proxy<FixedSize> {
    Proxy::new(
        FixedSize {
            width: Some(width),
            height: None,
        },
        subject,
    )
}

pub fn vsize(height: f32, subject: impl Element + 'static) -> Proxy<FixedSize> {
    Proxy::new(
        FixedSize {
            width: None,
            height: Some(height),
        },
        subject,
    )
}

/// Raises the minimum or lowers the maximum of the subject's envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitSize {
    pub min: Option<Size>,
    pub max: Option<Size>,
}

impl ProxyPolicy for LimitSize {
    fn limits(&self, ctx: &BasicContext, subject: &dyn Element) -> ViewLimits {
        let e = subject.limits(ctx);
        let mut out = e;
        if let Some(min) = self.min {
            out.min = e.clamp(min);
        }
        if let Some(max) = self.max {
            out.max = e.clamp(max);
        }
        out.validated()
    }

    fn prepare_subject(&self, _ctx: &BasicContext, mut bounds: Rect, _subject: &dyn Element) -> Rect {
        if let Some(min) = self.min {
            bounds.width = bounds.width.max(min.width);
            bounds.height = bounds.height.max(min.height);
        }
        if let Some(max) = self.max {
            bounds.width = bounds.width.min(max.width);
            bounds.height = bounds.height.min(max.height);
        }
        bounds
    }
}

pub fn min_size(size: Size, subject: impl Element + 'static) -> Proxy<LimitSize> {
    Proxy::new(
        LimitSize {
            min: Some(size),
            max: None,
        },
        subject,
    )
}

pub fn max_size(size: Size, subject: impl Element + 'static) -> Proxy<LimitSize> {
    Proxy::new(
        LimitSize {
            min: None,
            max: Some(size),
        },
        subject,
    )
}

/// Overrides the subject's stretch weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stretch {
    pub x: Option<f32>,
    pub y: Option<f32>,
}

impl ProxyPolicy for Stretch {
    fn stretch(&self, subject: &dyn Element) -> ViewStretch {
        let s = subject.stretch();
        ViewStretch::new(self.x.unwrap_or(s.x), self.y.unwrap_or(s.y))
    }
}

pub fn hstretch(weight: f32, subject: impl Element + 'static) -> Proxy<Stretch> {
    Proxy::new(
        Stretch {
            x: Some(weight),
            y: None,
        },
        subject,
    )
}

pub fn vstretch(weight: f32, subject: impl Element + 'static) -> Proxy<Stretch> {
    Proxy::new(
        Stretch {
            x: None,
            y: Some(weight),
        },
        subject,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::Harness;
    use crate::element::Rectangle;
    use crate::layout::FULL_EXTENT;
    use crate::primitives::Color;

    fn bounded() -> Rectangle {
        Rectangle::new(Color::WHITE).with_limits(ViewLimits::new(
            Size::new(10.0, 10.0),
            Size::new(100.0, 100.0),
        ))
    }

    #[test]
    fn fixed_size_clamps_to_subject() {
        let h = Harness::new();
        let s = hsize(500.0, bounded());
        let limits = s.limits(&h.basic());
        assert_eq!(limits.min.width, 100.0);
        assert_eq!(limits.max.width, 100.0);
        assert_eq!(limits.min.height, 10.0);

        let ctx = h.ctx(Rect::new(0.0, 0.0, 300.0, 50.0));
        assert_eq!(s.subject_bounds(&ctx), Rect::new(0.0, 0.0, 100.0, 50.0));
    }

    #[test]
    fn min_size_raises_minimum_within_envelope() {
        let h = Harness::new();
        let s = min_size(Size::new(40.0, 400.0), bounded());
        let limits = s.limits(&h.basic());
        assert_eq!(limits.min, Size::new(40.0, 100.0));
        assert_eq!(limits.max, Size::new(100.0, 100.0));
    }

    #[test]
    fn max_size_lowers_maximum() {
        let h = Harness::new();
        let s = max_size(
            Size::new(50.0, 5.0),
            Rectangle::new(Color::WHITE).with_limits(ViewLimits::at_least(Size::new(10.0, 10.0))),
        );
        let limits = s.limits(&h.basic());
        assert_eq!(limits.max, Size::new(50.0, 10.0));
        assert_eq!(limits.min, Size::new(10.0, 10.0));
        assert!(limits.max.width < FULL_EXTENT);
    }

    #[test]
    fn stretch_override_keeps_other_axis() {
        let s = hstretch(3.0, Rectangle::new(Color::WHITE));
        assert_eq!(s.stretch(), ViewStretch::new(3.0, 1.0));
    }
}
