//! Traversal contexts threaded through every element call.
//!
//! A `Context` is built on the stack for each descent and discarded on
//! return. It carries the shared services (`BasicContext`), the bounds the
//! parent allocated, the visible viewport, and a non-owning back-reference
//! to the parent context. The chain of parents mirrors the call stack, so
//! an element can look at where it sits without the tree storing it.
//!
//! # Architecture
//!
//! ```text
//! View ──► Context::new(root bounds)
//!            └─► ctx.child(i, bounds)      composites, one per child
//!                  └─► ctx.subject(bounds) proxies, prepared bounds
//! ```

use std::cell::RefCell;
use std::ops::Deref;

use crate::canvas::{Canvas, Font, TextMetrics};
use crate::primitives::Rect;
use crate::theme::Theme;
use crate::view::ViewState;

/// Services available to every element call, including `limits`.
#[derive(Clone, Copy)]
pub struct BasicContext<'a> {
    pub view: &'a ViewState,
    pub canvas: &'a RefCell<dyn Canvas>,
    pub theme: &'a Theme,
}

impl<'a> BasicContext<'a> {
    pub fn new(view: &'a ViewState, canvas: &'a RefCell<dyn Canvas>, theme: &'a Theme) -> Self {
        Self { view, canvas, theme }
    }

    /// Measure text through the drawing surface.
    pub fn measure_text(&self, text: &str, font: &Font) -> TextMetrics {
        self.canvas.borrow().measure_text(text, font)
    }
}

/// Per-call traversal state.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    basic: BasicContext<'a>,
    /// Bounds allocated to the current element.
    pub bounds: Rect,
    /// Region actually visible (window or dirty region, narrowed by ports).
    pub viewport: Rect,
    /// Position of the current element within its parent composite.
    pub index: Option<usize>,
    pub parent: Option<&'a Context<'a>>,
}

impl<'a> Context<'a> {
    /// Root context covering `bounds`.
    pub fn new(basic: BasicContext<'a>, bounds: Rect) -> Self {
        Self {
            basic,
            bounds,
            viewport: bounds,
            index: None,
            parent: None,
        }
    }

    /// Context for child `index` of the current element.
    pub fn child(&self, index: usize, bounds: Rect) -> Context<'_> {
        Context {
            basic: self.basic,
            bounds,
            viewport: self.viewport,
            index: Some(index),
            parent: Some(self),
        }
    }

    /// Context for the subject of a proxy.
    pub fn subject(&self, bounds: Rect) -> Context<'_> {
        Context {
            basic: self.basic,
            bounds,
            viewport: self.viewport,
            index: None,
            parent: Some(self),
        }
    }

    /// Same element, different bounds.
    pub fn with_bounds(&self, bounds: Rect) -> Context<'a> {
        Context { bounds, ..*self }
    }

    /// Same element, narrower visible region.
    pub fn with_viewport(self, viewport: Rect) -> Context<'a> {
        Context { viewport, ..self }
    }

    /// Same element, different theme for everything below it.
    pub fn with_theme<'b>(&'b self, theme: &'b Theme) -> Context<'b> {
        let this: Context<'b> = *self;
        Context {
            basic: BasicContext { theme, ..this.basic },
            ..this
        }
    }

    pub fn basic(&self) -> BasicContext<'a> {
        self.basic
    }

    /// Bounds of the parent element, or our own at the root.
    pub fn parent_bounds(&self) -> Rect {
        self.parent.map_or(self.bounds, |p| p.bounds)
    }

    /// Request a redraw of the current element.
    pub fn refresh(&self) {
        self.basic.view.refresh(self.bounds);
    }

    /// Child-index path from the root to the current element.
    pub fn path(&self) -> Vec<usize> {
        let mut path = Vec::new();
        let mut cur = Some(self);
        while let Some(ctx) = cur {
            if let Some(ix) = ctx.index {
                path.push(ix);
            }
            cur = ctx.parent;
        }
        path.reverse();
        path
    }
}

impl<'a> Deref for Context<'a> {
    type Target = BasicContext<'a>;

    fn deref(&self) -> &Self::Target {
        &self.basic
    }
}
