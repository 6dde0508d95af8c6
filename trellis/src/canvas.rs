//! Drawing surface abstraction.
//!
//! The core never talks to a rendering backend directly. Elements paint
//! through the [`Canvas`] trait, which a host implements over whatever 2D
//! library it uses. [`RecordingCanvas`] is a headless implementation that
//! records commands; it backs the tests and the demo binary.

use unicode_width::UnicodeWidthChar;

use crate::primitives::{Color, Point, Rect};

// Monospace metrics at the 14px base size; other sizes scale linearly.
pub const CHAR_WIDTH: f32 = 8.4;
pub const LINE_HEIGHT: f32 = 18.0;
pub const BASE_FONT_SIZE: f32 = 14.0;

/// Font request passed to text measurement and drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    pub size: f32,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("sans", BASE_FONT_SIZE)
    }
}

/// Result of `measure_text`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
    pub leading: f32,
}

impl TextMetrics {
    /// Line box height.
    pub fn line_height(&self) -> f32 {
        self.ascent + self.descent + self.leading
    }
}

/// Primitive 2D drawing operations consumed by elements.
///
/// Path calls accumulate into a current path that `fill`, `stroke` and
/// `clip` consume. `save`/`restore` bracket style and clip changes.
pub trait Canvas {
    fn save(&mut self);
    fn restore(&mut self);

    fn fill_style(&mut self, color: Color);
    fn stroke_style(&mut self, color: Color);
    fn line_width(&mut self, width: f32);

    fn begin_path(&mut self);
    fn rect(&mut self, rect: Rect);
    fn round_rect(&mut self, rect: Rect, radius: f32);
    fn circle(&mut self, center: Point, radius: f32);
    fn move_to(&mut self, p: Point);
    fn line_to(&mut self, p: Point);

    fn fill(&mut self);
    fn stroke(&mut self);
    /// Intersect the clip region with the current path.
    fn clip(&mut self);
    /// Bounding box of the current clip region.
    fn clip_extent(&self) -> Rect;

    fn fill_text(&mut self, text: &str, p: Point, font: &Font);
    fn measure_text(&self, text: &str, font: &Font) -> TextMetrics;
}

/// Display width of `text` in monospace cells.
pub(crate) fn unicode_display_width(text: &str) -> f32 {
    text.chars()
        .map(|c| UnicodeWidthChar::width(c).unwrap_or(0) as f32)
        .sum()
}

/// A recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill { bounds: Rect, color: Color },
    Stroke { bounds: Rect, color: Color, width: f32 },
    Clip(Rect),
    Text { text: String, pos: Point, size: f32, color: Color },
}

#[derive(Debug, Clone, Copy)]
struct CanvasState {
    fill: Color,
    stroke: Color,
    line_width: f32,
    clip: Rect,
}

/// Headless canvas that records fills, strokes, clips and text.
///
/// Paths are tracked only by their bounding box, which is enough to assert
/// what was painted where.
#[derive(Debug)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    state: CanvasState,
    stack: Vec<CanvasState>,
    path: Option<Rect>,
    cursor: Point,
}

impl RecordingCanvas {
    pub fn new(extent: Rect) -> Self {
        Self {
            commands: Vec::new(),
            state: CanvasState {
                fill: Color::BLACK,
                stroke: Color::BLACK,
                line_width: 1.0,
                clip: extent,
            },
            stack: Vec::new(),
            path: None,
            cursor: Point::ORIGIN,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Bounds of every fill, in paint order.
    pub fn filled(&self) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Fill { bounds, .. } => Some(*bounds),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    fn add_to_path(&mut self, r: Rect) {
        self.path = Some(match self.path {
            Some(p) => p.union(&r),
            None => r,
        });
    }
}

impl Canvas for RecordingCanvas {
    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        } else {
            tracing::warn!("canvas restore without matching save");
        }
    }

    fn fill_style(&mut self, color: Color) {
        self.state.fill = color;
    }

    fn stroke_style(&mut self, color: Color) {
        self.state.stroke = color;
    }

    fn line_width(&mut self, width: f32) {
        self.state.line_width = width;
    }

    fn begin_path(&mut self) {
        self.path = None;
    }

    fn rect(&mut self, rect: Rect) {
        self.add_to_path(rect);
    }

    fn round_rect(&mut self, rect: Rect, _radius: f32) {
        self.add_to_path(rect);
    }

    fn circle(&mut self, center: Point, radius: f32) {
        self.add_to_path(Rect::new(
            center.x - radius,
            center.y - radius,
            radius * 2.0,
            radius * 2.0,
        ));
    }

    fn move_to(&mut self, p: Point) {
        self.cursor = p;
    }

    fn line_to(&mut self, p: Point) {
        let from = self.cursor;
        let x = from.x.min(p.x);
        let y = from.y.min(p.y);
        self.add_to_path(Rect::new(x, y, (from.x - p.x).abs(), (from.y - p.y).abs()));
        self.cursor = p;
    }

    fn fill(&mut self) {
        if let Some(bounds) = self.path.take() {
            self.commands.push(DrawCommand::Fill {
                bounds,
                color: self.state.fill,
            });
        }
    }

    fn stroke(&mut self) {
        if let Some(bounds) = self.path.take() {
            self.commands.push(DrawCommand::Stroke {
                bounds,
                color: self.state.stroke,
                width: self.state.line_width,
            });
        }
    }

    fn clip(&mut self) {
        if let Some(path) = self.path.take() {
            self.state.clip = self
                .state
                .clip
                .intersection(&path)
                .unwrap_or(Rect::new(path.x, path.y, 0.0, 0.0));
            self.commands.push(DrawCommand::Clip(self.state.clip));
        }
    }

    fn clip_extent(&self) -> Rect {
        self.state.clip
    }

    fn fill_text(&mut self, text: &str, pos: Point, font: &Font) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            pos,
            size: font.size,
            color: self.state.fill,
        });
    }

    fn measure_text(&self, text: &str, font: &Font) -> TextMetrics {
        let scale = font.size / BASE_FONT_SIZE;
        TextMetrics {
            width: unicode_display_width(text) * CHAR_WIDTH * scale,
            ascent: font.size * 0.8,
            descent: font.size * 0.2,
            leading: (LINE_HEIGHT - BASE_FONT_SIZE) * scale,
        }
    }
}
