//! Leaf elements.

use crate::canvas::Font;
use crate::context::{BasicContext, Context};
use crate::element::{Element, Value};
use crate::layout::{FULL_EXTENT, ViewLimits, ViewStretch};
use crate::primitives::{Axis, Color, Point, Size};

/// Takes any size, draws nothing, accepts nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Empty;

impl Element for Empty {
    fn hit_test(&self, _ctx: &Context, _p: Point) -> Option<crate::element::Hit> {
        None
    }
}

/// A filled box.
#[derive(Debug, Clone)]
pub struct Rectangle {
    color: Color,
    limits: ViewLimits,
    stretch: ViewStretch,
}

impl Rectangle {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            limits: ViewLimits::FULL,
            stretch: ViewStretch::default(),
        }
    }

    /// Rectangle of exactly `width` x `height`.
    pub fn fixed(color: Color, width: f32, height: f32) -> Self {
        Self::new(color).with_limits(ViewLimits::fixed(Size::new(width, height)))
    }

    pub fn with_limits(mut self, limits: ViewLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_stretch(mut self, stretch: ViewStretch) -> Self {
        self.stretch = stretch;
        self
    }
}

impl Element for Rectangle {
    fn limits(&self, _ctx: &BasicContext) -> ViewLimits {
        self.limits
    }

    fn stretch(&self) -> ViewStretch {
        self.stretch
    }

    fn draw(&mut self, ctx: &Context) {
        let mut cnv = ctx.canvas.borrow_mut();
        cnv.begin_path();
        cnv.rect(ctx.bounds);
        cnv.fill_style(self.color);
        cnv.fill();
    }
}

/// Flexible gap. Zero minimum along its axis, fills what is left.
#[derive(Debug, Clone, Copy)]
pub struct Spacer {
    axis: Option<Axis>,
    min: f32,
}

impl Spacer {
    /// Grows in both directions.
    pub fn new() -> Self {
        Self { axis: None, min: 0.0 }
    }

    pub fn horizontal(min: f32) -> Self {
        Self {
            axis: Some(Axis::Horizontal),
            min,
        }
    }

    pub fn vertical(min: f32) -> Self {
        Self {
            axis: Some(Axis::Vertical),
            min,
        }
    }
}

impl Default for Spacer {
    fn default() -> Self {
        Self::new()
    }
}

impl Element for Spacer {
    fn limits(&self, _ctx: &BasicContext) -> ViewLimits {
        match self.axis {
            None => ViewLimits::FULL,
            Some(axis) => ViewLimits::at_least(Size::from_axis(axis, self.min, 0.0)),
        }
    }

    fn hit_test(&self, _ctx: &Context, _p: Point) -> Option<crate::element::Hit> {
        None
    }
}

/// Single line of text, sized to its measured extent.
#[derive(Debug, Clone)]
pub struct Label {
    text: String,
    font_size: Option<f32>,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: None,
        }
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn font(&self, ctx: &BasicContext) -> Font {
        Font {
            size: self.font_size.unwrap_or(ctx.theme.label_font_size),
            ..Font::default()
        }
    }
}

impl Element for Label {
    fn limits(&self, ctx: &BasicContext) -> ViewLimits {
        let m = ctx.measure_text(&self.text, &self.font(ctx));
        ViewLimits::new(
            Size::new(m.width, m.line_height()),
            Size::new(FULL_EXTENT, m.line_height()),
        )
    }

    fn draw(&mut self, ctx: &Context) {
        let font = self.font(ctx);
        let m = ctx.measure_text(&self.text, &font);
        let mut cnv = ctx.canvas.borrow_mut();
        cnv.fill_style(ctx.theme.label_color);
        cnv.fill_text(
            &self.text,
            Point::new(ctx.bounds.x, ctx.bounds.y + m.ascent),
            &font,
        );
    }

    fn set_value(&mut self, value: Value) {
        self.text = match value {
            Value::Text(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Double(d) => format!("{d:.2}"),
        };
    }
}

/// Horizontal bar filled to a 0..1 value.
#[derive(Debug, Clone, Default)]
pub struct ProgressBar {
    value: f64,
}

impl ProgressBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Element for ProgressBar {
    fn limits(&self, _ctx: &BasicContext) -> ViewLimits {
        ViewLimits::new(Size::new(20.0, 6.0), Size::new(FULL_EXTENT, 6.0))
    }

    fn draw(&mut self, ctx: &Context) {
        let mut filled = ctx.bounds;
        filled.width *= self.value as f32;
        let mut cnv = ctx.canvas.borrow_mut();
        cnv.begin_path();
        cnv.rect(ctx.bounds);
        cnv.fill_style(ctx.theme.frame_color);
        cnv.fill();
        cnv.begin_path();
        cnv.rect(filled);
        cnv.fill_style(ctx.theme.indicator_color);
        cnv.fill();
    }

    fn set_value(&mut self, value: Value) {
        if let Some(v) = value.as_f64() {
            self.value = v.clamp(0.0, 1.0);
        }
    }
}
