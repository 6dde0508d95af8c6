//! Multi-child containers.
//!
//! A [`Composite`] owns an ordered list of children and an
//! [`Arrangement`] that decides where they go:
//!
//! - `Stacked` tiles children along an axis, distributing surplus space by
//!   stretch weight ([`vtile`], [`htile`]).
//! - `Layered` gives every child the full bounds; later children are on top
//!   ([`layer`]).
//! - `Deck` is a layer that shows and routes to one selected child
//!   ([`deck`]).
//! - `Flow` packs children into rows that wrap at the available width
//!   ([`flow`]).
//! - `Grid` places children between fixed grid lines along an axis
//!   ([`vgrid`], [`hgrid`]).
//!
//! Child bounds are cached relative to the composite's origin, so moving
//! the composite (scrolling a port) does not require a new layout. Any
//! structural mutation drops the cache and the routing state of the
//! affected children.

pub mod dispatch;

use std::ops::Range;
use std::time::Duration;

use crate::context::{BasicContext, Context};
use crate::element::{Element, ElementPtr, Hit, Value};
use crate::event::{CursorTracking, FocusRequest, KeyInfo, MouseButton, TextInfo};
use crate::layout::{
    Allocation, FULL_EXTENT, ViewLimits, ViewStretch, allocate, break_lines, grid_limits,
    grid_span, layer_limits, stack_limits,
};
use crate::payload::DropInfo;
use crate::primitives::{Axis, Point, Rect, Size};

use dispatch::ChildSet;

pub use dispatch::DispatchState;

/// Row partition of a flow, kept between layouts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowState {
    rows: Vec<Range<usize>>,
    width: Option<f32>,
    min_height: f32,
    needs_reflow: bool,
}

impl FlowState {
    pub fn rows(&self) -> &[Range<usize>] {
        &self.rows
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Arrangement {
    Stacked(Axis),
    Layered,
    Deck { selected: usize },
    Flow(FlowState),
    /// Cell `i` ends at `stops[i]` along `axis`.
    Grid { axis: Axis, stops: Vec<f32> },
}

pub struct Composite {
    arrangement: Arrangement,
    children: Vec<ElementPtr>,
    /// Child bounds relative to the composite origin.
    bounds: Vec<Rect>,
    laid_out: Option<Size>,
    dispatch: DispatchState,
}

impl Composite {
    pub fn new(arrangement: Arrangement) -> Self {
        Self {
            arrangement,
            children: Vec::new(),
            bounds: Vec::new(),
            laid_out: None,
            dispatch: DispatchState::default(),
        }
    }

    pub fn with_children(arrangement: Arrangement, children: Vec<ElementPtr>) -> Self {
        Self {
            children,
            ..Self::new(arrangement)
        }
    }

    /// Builder form of [`Composite::append`].
    pub fn push(mut self, child: impl Element + 'static) -> Self {
        self.append(Box::new(child));
        self
    }

    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, index: usize) -> Option<&dyn Element> {
        self.children.get(index).map(|c| &**c)
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut ElementPtr> {
        self.children.get_mut(index)
    }

    pub fn routing(&self) -> &DispatchState {
        &self.dispatch
    }

    pub fn append(&mut self, child: ElementPtr) {
        let at = self.children.len();
        self.children.push(child);
        self.invalidate(at);
    }

    /// Insert at `index`, clamped to the end.
    pub fn insert(&mut self, index: usize, child: ElementPtr) {
        let at = index.min(self.children.len());
        self.children.insert(at, child);
        self.invalidate(at);
    }

    pub fn remove(&mut self, index: usize) -> Option<ElementPtr> {
        if index >= self.children.len() {
            return None;
        }
        let removed = self.children.remove(index);
        self.invalidate(index);
        Some(removed)
    }

    pub fn truncate(&mut self, len: usize) {
        if len < self.children.len() {
            self.children.truncate(len);
            self.invalidate(len);
        }
    }

    pub fn clear(&mut self) {
        self.truncate(0);
    }

    fn invalidate(&mut self, from: usize) {
        self.bounds.truncate(from);
        self.laid_out = None;
        self.dispatch.invalidate_from(from);
        if let Arrangement::Flow(flow) = &mut self.arrangement {
            flow.needs_reflow = true;
        }
    }

    /// Show child `index` of a deck. Other arrangements ignore this.
    pub fn select(&mut self, index: usize) {
        if let Arrangement::Deck { selected } = &mut self.arrangement {
            if *selected != index {
                *selected = index;
                self.dispatch = DispatchState::default();
            }
        }
    }

    pub fn selected(&self) -> Option<usize> {
        match self.arrangement {
            Arrangement::Deck { selected } => Some(selected),
            _ => None,
        }
    }

    /// Absolute bounds of child `index`, valid once laid out.
    pub fn bounds_of(&self, ctx: &Context, index: usize) -> Option<Rect> {
        if self.laid_out != Some(ctx.bounds.size()) {
            return None;
        }
        self.bounds
            .get(index)
            .map(|r| r.translate(ctx.bounds.origin()))
    }

    fn child_limits(&self, ctx: &BasicContext) -> Vec<ViewLimits> {
        self.children.iter().map(|c| c.limits(ctx)).collect()
    }

    fn ensure_layout(&mut self, ctx: &Context) {
        if self.laid_out != Some(ctx.bounds.size()) {
            self.layout(ctx);
        }
    }

    fn arrange_stacked(&self, axis: Axis, size: Size, limits: &[ViewLimits]) -> Vec<Rect> {
        let cross = axis.cross();
        let mut allocs: Vec<Allocation> = limits
            .iter()
            .zip(&self.children)
            .map(|(l, c)| Allocation::new(l, c.stretch().along(axis), axis))
            .collect();
        allocate(size.along(axis), &mut allocs);

        let mut pos = 0.0;
        let mut out = Vec::with_capacity(allocs.len());
        for (a, l) in allocs.iter().zip(limits) {
            let cross_extent = size
                .along(cross)
                .clamp(l.min_along(cross), l.max_along(cross));
            let s = Size::from_axis(axis, a.size, cross_extent);
            let origin = match axis {
                Axis::Horizontal => Point::new(pos, 0.0),
                Axis::Vertical => Point::new(0.0, pos),
            };
            out.push(Rect::from_origin_size(origin, s));
            pos += a.size;
        }
        out
    }

    fn arrange_grid(&self, axis: Axis, stops: &[f32], size: Size, limits: &[ViewLimits]) -> Vec<Rect> {
        let cross = axis.cross();
        limits
            .iter()
            .enumerate()
            .map(|(i, l)| {
                let span = grid_span(stops, i);
                let cross_extent = size
                    .along(cross)
                    .clamp(l.min_along(cross), l.max_along(cross));
                let s = Size::from_axis(axis, span.end - span.start, cross_extent);
                let origin = match axis {
                    Axis::Horizontal => Point::new(span.start, 0.0),
                    Axis::Vertical => Point::new(0.0, span.start),
                };
                Rect::from_origin_size(origin, s)
            })
            .collect()
    }

    fn arrange_flow(&mut self, ctx: &Context, limits: &[ViewLimits]) -> Vec<Rect> {
        let size = ctx.bounds.size();
        let Arrangement::Flow(flow) = &mut self.arrangement else {
            return Vec::new();
        };
        if flow.needs_reflow || flow.width != Some(size.width) {
            flow.rows = break_lines(limits.iter().map(|l| l.min.width), size.width);
            flow.width = Some(size.width);
            flow.needs_reflow = false;
            tracing::debug!(rows = flow.rows.len(), width = size.width, "flow reflowed");
        }

        let row_limits: Vec<ViewLimits> = flow
            .rows
            .iter()
            .map(|r| stack_limits(Axis::Horizontal, limits[r.clone()].iter().copied()))
            .collect();
        let min_height: f32 = row_limits.iter().map(|l| l.min.height).sum();
        if min_height != flow.min_height {
            flow.min_height = min_height;
            // The envelope changed after the parent already sized us.
            ctx.view.post(Duration::ZERO, |v| v.relayout());
        }

        let mut heights: Vec<Allocation> = row_limits
            .iter()
            .map(|l| Allocation::new(l, 1.0, Axis::Vertical))
            .collect();
        allocate(size.height, &mut heights);

        let mut out = vec![Rect::ZERO; limits.len()];
        let mut y = 0.0;
        for (row, h) in flow.rows.iter().zip(&heights) {
            let mut widths: Vec<Allocation> = row
                .clone()
                .map(|i| Allocation::new(&limits[i], self.children[i].stretch().x, Axis::Horizontal))
                .collect();
            allocate(size.width, &mut widths);
            let mut x = 0.0;
            for (i, w) in row.clone().zip(&widths) {
                let child_h = h.size.clamp(limits[i].min.height, limits[i].max.height);
                out[i] = Rect::new(x, y, w.size, child_h);
                x += w.size;
            }
            y += h.size;
        }
        out
    }
}

impl ChildSet for Composite {
    fn element(&self, index: usize) -> Option<&ElementPtr> {
        self.children.get(index)
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut ElementPtr> {
        self.children.get_mut(index)
    }

    fn child_bounds(&self, ctx: &Context, index: usize) -> Option<Rect> {
        self.bounds_of(ctx, index)
    }

    fn hit_order(&self) -> Vec<usize> {
        let n = self.children.len();
        match self.arrangement {
            Arrangement::Layered => (0..n).rev().collect(),
            Arrangement::Deck { selected } => (selected < n).then_some(selected).into_iter().collect(),
            Arrangement::Stacked(_) | Arrangement::Flow(_) | Arrangement::Grid { .. } => {
                (0..n).collect()
            }
        }
    }

    fn focus_order(&self) -> Vec<usize> {
        let n = self.children.len();
        match self.arrangement {
            Arrangement::Deck { selected } => (selected < n).then_some(selected).into_iter().collect(),
            _ => (0..n).collect(),
        }
    }

    fn dispatch_state(&mut self) -> &mut DispatchState {
        &mut self.dispatch
    }

    fn dispatch_state_ref(&self) -> &DispatchState {
        &self.dispatch
    }
}

impl Element for Composite {
    fn limits(&self, ctx: &BasicContext) -> ViewLimits {
        let limits = self.child_limits(ctx);
        match &self.arrangement {
            Arrangement::Stacked(axis) => stack_limits(*axis, limits),
            Arrangement::Layered | Arrangement::Deck { .. } => layer_limits(limits),
            Arrangement::Grid { axis, stops } => grid_limits(*axis, stops, limits),
            Arrangement::Flow(flow) => {
                let min_width = limits.iter().map(|l| l.min.width).fold(0.0, f32::max);
                ViewLimits::new(
                    Size::new(min_width, flow.min_height),
                    Size::new(FULL_EXTENT, FULL_EXTENT),
                )
            }
        }
    }

    fn stretch(&self) -> ViewStretch {
        match self.arrangement {
            Arrangement::Flow(_) => ViewStretch::new(1.0, 0.0),
            _ => ViewStretch::default(),
        }
    }

    fn hit_test(&self, ctx: &Context, p: Point) -> Option<Hit> {
        if !ctx.bounds.contains(p) {
            return None;
        }
        dispatch::hit_test(self, ctx, p)
    }

    fn layout(&mut self, ctx: &Context) {
        let size = ctx.bounds.size();
        let limits = self.child_limits(&ctx.basic());
        self.bounds = match self.arrangement {
            Arrangement::Stacked(axis) => self.arrange_stacked(axis, size, &limits),
            Arrangement::Grid { axis, ref stops } => self.arrange_grid(axis, stops, size, &limits),
            Arrangement::Layered | Arrangement::Deck { .. } => limits
                .iter()
                .map(|l| Rect::from_origin_size(Point::ORIGIN, l.clamp(size)))
                .collect(),
            Arrangement::Flow(_) => self.arrange_flow(ctx, &limits),
        };
        self.laid_out = Some(size);

        let origin = ctx.bounds.origin();
        for (i, (child, r)) in self.children.iter_mut().zip(&self.bounds).enumerate() {
            child.layout(&ctx.child(i, r.translate(origin)));
        }
    }

    fn draw(&mut self, ctx: &Context) {
        self.ensure_layout(ctx);
        let order = match self.arrangement {
            Arrangement::Deck { selected } => vec![selected],
            _ => (0..self.children.len()).collect(),
        };
        let origin = ctx.bounds.origin();
        for i in order {
            let (Some(child), Some(r)) = (self.children.get_mut(i), self.bounds.get(i)) else {
                continue;
            };
            let b = r.translate(origin);
            if b.intersects(&ctx.viewport) {
                child.draw(&ctx.child(i, b));
            }
        }
    }

    fn click(&mut self, ctx: &Context, btn: MouseButton) -> bool {
        self.ensure_layout(ctx);
        dispatch::click(self, ctx, btn)
    }

    fn drag(&mut self, ctx: &Context, btn: MouseButton) {
        self.ensure_layout(ctx);
        dispatch::drag(self, ctx, btn)
    }

    fn key(&mut self, ctx: &Context, k: &KeyInfo) -> bool {
        self.ensure_layout(ctx);
        dispatch::key(self, ctx, k)
    }

    fn text(&mut self, ctx: &Context, info: TextInfo) -> bool {
        self.ensure_layout(ctx);
        dispatch::text(self, ctx, info)
    }

    fn cursor(&mut self, ctx: &Context, p: Point, status: CursorTracking) -> bool {
        self.ensure_layout(ctx);
        dispatch::cursor(self, ctx, p, status)
    }

    fn scroll(&mut self, ctx: &Context, dir: Point, p: Point) -> bool {
        self.ensure_layout(ctx);
        dispatch::scroll(self, ctx, dir, p)
    }

    fn wants_focus(&self) -> bool {
        dispatch::wants_focus(self)
    }

    fn focus(&mut self, req: FocusRequest) -> bool {
        dispatch::focus(self, req)
    }

    fn is_control(&self) -> bool {
        dispatch::is_control(self)
    }

    fn track_drop(&mut self, ctx: &Context, info: &DropInfo, status: CursorTracking) {
        self.ensure_layout(ctx);
        dispatch::track_drop(self, ctx, info, status)
    }

    fn drop_payload(&mut self, ctx: &Context, info: &DropInfo) -> bool {
        self.ensure_layout(ctx);
        dispatch::drop_payload(self, ctx, info)
    }

    fn set_value(&mut self, value: Value) {
        for child in &mut self.children {
            child.set_value(value.clone());
        }
    }
}

/// Children stacked top to bottom.
pub fn vtile() -> Composite {
    Composite::new(Arrangement::Stacked(Axis::Vertical))
}

/// Children stacked left to right.
pub fn htile() -> Composite {
    Composite::new(Arrangement::Stacked(Axis::Horizontal))
}

/// Children sharing the same bounds, last on top.
pub fn layer() -> Composite {
    Composite::new(Arrangement::Layered)
}

/// Layer showing only the selected child, initially the first.
pub fn deck() -> Composite {
    Composite::new(Arrangement::Deck { selected: 0 })
}

/// Children wrapped into rows at the available width.
pub fn flow() -> Composite {
    Composite::new(Arrangement::Flow(FlowState::default()))
}

/// Children between fixed horizontal grid lines, top to bottom. `stops`
/// are the bottom edges of the cells.
pub fn vgrid(stops: impl Into<Vec<f32>>) -> Composite {
    Composite::new(Arrangement::Grid {
        axis: Axis::Vertical,
        stops: stops.into(),
    })
}

/// Children between fixed vertical grid lines, left to right. `stops`
/// are the right edges of the cells.
pub fn hgrid(stops: impl Into<Vec<f32>>) -> Composite {
    Composite::new(Arrangement::Grid {
        axis: Axis::Horizontal,
        stops: stops.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::Harness;
    use crate::element::{Empty, Rectangle, Spacer};
    use crate::event::{Modifiers, NamedKey};
    use crate::primitives::Color;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn fixed(w: f32, h: f32) -> Rectangle {
        Rectangle::fixed(Color::WHITE, w, h)
    }

    fn rigid(h: f32) -> Rectangle {
        Rectangle::new(Color::WHITE).with_limits(ViewLimits::new(
            Size::new(0.0, h),
            Size::new(FULL_EXTENT, h),
        ))
    }

    /// Records the events it receives and always consumes clicks.
    struct Recorder {
        log: Rc<RefCell<Vec<String>>>,
        name: &'static str,
        focusable: bool,
    }

    impl Recorder {
        fn new(log: &Rc<RefCell<Vec<String>>>, name: &'static str) -> Self {
            Self {
                log: log.clone(),
                name,
                focusable: true,
            }
        }

        fn note(&self, what: &str) {
            self.log.borrow_mut().push(format!("{}:{what}", self.name));
        }
    }

    impl Element for Recorder {
        fn click(&mut self, _ctx: &Context, btn: MouseButton) -> bool {
            self.note(if btn.down { "down" } else { "up" });
            true
        }

        fn drag(&mut self, _ctx: &Context, _btn: MouseButton) {
            self.note("drag");
        }

        fn cursor(&mut self, _ctx: &Context, _p: Point, status: CursorTracking) -> bool {
            self.note(&format!("{status:?}"));
            true
        }

        fn text(&mut self, _ctx: &Context, info: TextInfo) -> bool {
            self.note(&format!("text {}", info.codepoint));
            true
        }

        fn wants_focus(&self) -> bool {
            self.focusable
        }

        fn focus(&mut self, req: FocusRequest) -> bool {
            self.note(&format!("{req:?}"));
            true
        }

        fn is_control(&self) -> bool {
            true
        }
    }

    #[test]
    fn vtile_limits_sum_main_axis() {
        let h = Harness::new();
        let c = vtile().push(rigid(10.0)).push(rigid(20.0)).push(rigid(30.0));
        let limits = c.limits(&h.basic());
        assert_eq!(limits.min.height, 60.0);
        assert_eq!(limits.max.height, 60.0);
    }

    #[test]
    fn vtile_distributes_surplus_and_clamps_cross_axis() {
        let h = Harness::new();
        let mut c = vtile().push(fixed(40.0, 20.0)).push(Spacer::vertical(0.0));
        let ctx = h.ctx(Rect::new(10.0, 10.0, 100.0, 100.0));
        c.layout(&ctx);
        assert_eq!(c.bounds_of(&ctx, 0), Some(Rect::new(10.0, 10.0, 40.0, 20.0)));
        assert_eq!(c.bounds_of(&ctx, 1), Some(Rect::new(10.0, 30.0, 100.0, 80.0)));
    }

    #[test]
    fn grid_cells_sit_between_their_lines() {
        let h = Harness::new();
        let mut c = hgrid([40.0, 100.0, 160.0])
            .push(Rectangle::new(Color::WHITE))
            .push(fixed(30.0, 10.0))
            .push(Rectangle::new(Color::WHITE));
        let limits = c.limits(&h.basic());
        assert_eq!(limits.min.width, 160.0);
        assert_eq!(limits.max.width, 160.0);
        assert_eq!(limits.max.height, 10.0);

        let ctx = h.ctx(Rect::new(5.0, 0.0, 160.0, 10.0));
        c.layout(&ctx);
        assert_eq!(c.bounds_of(&ctx, 0), Some(Rect::new(5.0, 0.0, 40.0, 10.0)));
        assert_eq!(c.bounds_of(&ctx, 1), Some(Rect::new(45.0, 0.0, 60.0, 10.0)));
        assert_eq!(c.bounds_of(&ctx, 2), Some(Rect::new(105.0, 0.0, 60.0, 10.0)));
        let hit = c.hit_test(&ctx, Point::new(104.0, 5.0)).map(|h| h.path);
        assert_eq!(hit, Some(vec![1]));
    }

    #[test]
    fn vgrid_children_past_the_lines_collapse() {
        let h = Harness::new();
        let mut c = vgrid([20.0])
            .push(Rectangle::new(Color::WHITE))
            .push(Rectangle::new(Color::WHITE));
        assert_eq!(c.limits(&h.basic()).min.height, 20.0);
        let ctx = h.ctx(Rect::new(0.0, 0.0, 50.0, 20.0));
        c.layout(&ctx);
        assert_eq!(c.bounds_of(&ctx, 1), Some(Rect::new(0.0, 20.0, 50.0, 0.0)));
    }

    #[test]
    fn layout_is_idempotent() {
        let h = Harness::new();
        let mut c = htile()
            .push(fixed(30.0, 10.0))
            .push(Spacer::horizontal(5.0))
            .push(fixed(20.0, 10.0));
        let ctx = h.ctx(Rect::new(0.0, 0.0, 200.0, 10.0));
        c.layout(&ctx);
        let first = c.bounds.clone();
        c.layout(&ctx);
        assert_eq!(c.bounds, first);
    }

    #[test]
    fn moving_does_not_need_relayout() {
        let h = Harness::new();
        let mut c = vtile().push(fixed(10.0, 10.0));
        c.layout(&h.ctx(Rect::new(0.0, 0.0, 50.0, 50.0)));
        let moved = h.ctx(Rect::new(100.0, 100.0, 50.0, 50.0));
        assert_eq!(c.bounds_of(&moved, 0), Some(Rect::new(100.0, 100.0, 10.0, 10.0)));
        let resized = h.ctx(Rect::new(0.0, 0.0, 60.0, 50.0));
        assert_eq!(c.bounds_of(&resized, 0), None);
    }

    #[test]
    fn stacked_hits_reach_exactly_one_child() {
        let h = Harness::new();
        let mut c = vtile().push(rigid(10.0)).push(rigid(10.0)).push(Empty);
        let ctx = h.ctx(Rect::new(0.0, 0.0, 50.0, 30.0));
        c.layout(&ctx);
        let hit = c.hit_test(&ctx, Point::new(5.0, 15.0)).map(|h| h.path);
        assert_eq!(hit, Some(vec![1]));
        assert_eq!(c.hit_test(&ctx, Point::new(5.0, 25.0)), None);
    }

    #[test]
    fn layered_hits_topmost_first() {
        let h = Harness::new();
        let mut c = layer().push(Rectangle::new(Color::BLACK)).push(fixed(10.0, 10.0));
        let ctx = h.ctx(Rect::new(0.0, 0.0, 50.0, 50.0));
        c.layout(&ctx);
        assert_eq!(c.hit_test(&ctx, Point::new(5.0, 5.0)).map(|h| h.path), Some(vec![1]));
        assert_eq!(c.hit_test(&ctx, Point::new(30.0, 30.0)).map(|h| h.path), Some(vec![0]));
    }

    #[test]
    fn deck_routes_to_selected_only() {
        let h = Harness::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut c = deck().push(Recorder::new(&log, "a")).push(Recorder::new(&log, "b"));
        let ctx = h.ctx(Rect::new(0.0, 0.0, 50.0, 50.0));
        c.select(1);
        assert!(c.click(&ctx, MouseButton::press(Point::new(5.0, 5.0))));
        assert_eq!(c.hit_test(&ctx, Point::new(5.0, 5.0)).map(|h| h.path), Some(vec![1]));
        assert_eq!(*log.borrow(), vec!["b:Begin", "b:down"]);
    }

    #[test]
    fn deck_draws_only_selected() {
        let h = Harness::new();
        let mut c = deck()
            .push(Rectangle::new(Color::BLACK))
            .push(Rectangle::new(Color::WHITE));
        c.draw(&h.ctx(Rect::new(0.0, 0.0, 20.0, 20.0)));
        assert_eq!(h.canvas.borrow().filled().len(), 1);
    }

    #[test]
    fn draw_skips_children_outside_viewport() {
        let h = Harness::new();
        let mut c = vtile().push(rigid(10.0)).push(rigid(10.0)).push(rigid(10.0));
        let ctx = h
            .ctx(Rect::new(0.0, 0.0, 20.0, 30.0))
            .with_viewport(Rect::new(0.0, 12.0, 20.0, 5.0));
        c.draw(&ctx);
        assert_eq!(h.canvas.borrow().filled(), vec![Rect::new(0.0, 10.0, 20.0, 10.0)]);
    }

    #[test]
    fn click_release_and_drag_follow_pressed_child() {
        let h = Harness::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut c = vtile()
            .push(Recorder::new(&log, "a").with_height(10.0))
            .push(Recorder::new(&log, "b").with_height(10.0));
        let ctx = h.ctx(Rect::new(0.0, 0.0, 50.0, 20.0));
        c.click(&ctx, MouseButton::press(Point::new(5.0, 5.0)));
        c.drag(&ctx, MouseButton::press(Point::new(5.0, 15.0)));
        c.click(&ctx, MouseButton::release(Point::new(5.0, 15.0)));
        assert_eq!(*log.borrow(), vec!["a:Begin", "a:down", "a:drag", "a:up"]);
        assert_eq!(c.routing().click_tracking, None);
    }

    #[test]
    fn cursor_reports_enter_and_leave() {
        let h = Harness::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut c = vtile()
            .push(Recorder::new(&log, "a").with_height(10.0))
            .push(Recorder::new(&log, "b").with_height(10.0));
        let ctx = h.ctx(Rect::new(0.0, 0.0, 50.0, 20.0));
        c.cursor(&ctx, Point::new(5.0, 5.0), CursorTracking::Hovering);
        c.cursor(&ctx, Point::new(6.0, 5.0), CursorTracking::Hovering);
        c.cursor(&ctx, Point::new(5.0, 15.0), CursorTracking::Hovering);
        c.cursor(&ctx, Point::new(5.0, 15.0), CursorTracking::Leaving);
        assert_eq!(
            *log.borrow(),
            vec!["a:Entering", "a:Hovering", "a:Leaving", "b:Entering", "b:Leaving"]
        );
    }

    #[test]
    fn tab_walks_focus_without_wrapping() {
        let h = Harness::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut skipped = Recorder::new(&log, "x");
        skipped.focusable = false;
        let mut c = htile()
            .push(Recorder::new(&log, "a"))
            .push(skipped)
            .push(Recorder::new(&log, "b"));
        let ctx = h.ctx(Rect::new(0.0, 0.0, 90.0, 10.0));
        let tab = KeyInfo::press(NamedKey::Tab);
        assert!(c.key(&ctx, &tab));
        assert_eq!(c.routing().focus, Some(0));
        assert!(c.key(&ctx, &tab));
        assert_eq!(c.routing().focus, Some(2));
        assert!(!c.key(&ctx, &tab));
        assert!(c.key(&ctx, &tab.clone().with_modifiers(Modifiers::SHIFT)));
        assert_eq!(c.routing().focus, Some(0));
        c.text(&ctx, TextInfo { codepoint: 'q', modifiers: Modifiers::NONE });
        assert_eq!(log.borrow().last().map(String::as_str), Some("a:text q"));
    }

    #[test]
    fn focus_end_then_begin_restores_previous_child() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut c = htile().push(Recorder::new(&log, "a")).push(Recorder::new(&log, "b"));
        c.dispatch.focus = Some(1);
        assert!(c.focus(FocusRequest::End));
        assert_eq!(c.routing().focus, None);
        assert!(c.focus(FocusRequest::Begin));
        assert_eq!(c.routing().focus, Some(1));
    }

    #[test]
    fn removing_child_drops_later_roles() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut c = htile()
            .push(Recorder::new(&log, "a"))
            .push(Recorder::new(&log, "b"))
            .push(Recorder::new(&log, "c"));
        c.dispatch.focus = Some(2);
        c.dispatch.hover = Some(0);
        assert!(c.remove(1).is_some());
        assert_eq!(c.routing().focus, None);
        assert_eq!(c.routing().hover, Some(0));
        assert!(c.remove(7).is_none());
        c.truncate(0);
        assert!(c.is_empty());
    }

    #[test]
    fn flow_wraps_rows_and_requests_relayout() {
        let h = Harness::new();
        let mut c = flow()
            .push(fixed(50.0, 10.0))
            .push(fixed(60.0, 10.0))
            .push(fixed(70.0, 10.0))
            .push(fixed(40.0, 10.0));
        let ctx = h.ctx(Rect::new(0.0, 0.0, 120.0, 100.0));
        c.layout(&ctx);
        let Arrangement::Flow(state) = c.arrangement() else {
            panic!("not a flow");
        };
        assert_eq!(state.rows(), &[0..2, 2..4]);
        assert_eq!(c.bounds_of(&ctx, 2), Some(Rect::new(0.0, 10.0, 70.0, 10.0)));
        assert_eq!(c.limits(&h.basic()).min, Size::new(70.0, 20.0));
        assert_eq!(h.state.scheduler.borrow().pending(), 1);

        // Same width and children: no new partition, no new request.
        c.layout(&ctx);
        assert_eq!(h.state.scheduler.borrow().pending(), 1);
    }

    #[test]
    fn flow_reflows_after_mutation() {
        let h = Harness::new();
        let mut c = flow().push(fixed(50.0, 10.0)).push(fixed(60.0, 10.0));
        let ctx = h.ctx(Rect::new(0.0, 0.0, 120.0, 100.0));
        c.layout(&ctx);
        c.append(Box::new(fixed(30.0, 10.0)));
        c.layout(&ctx);
        let Arrangement::Flow(state) = c.arrangement() else {
            panic!("not a flow");
        };
        assert_eq!(state.rows(), &[0..2, 2..3]);
    }

    trait WithHeight: Sized {
        fn with_height(self, h: f32) -> crate::proxy::Proxy<crate::proxy::FixedSize>;
    }

    impl<E: Element + 'static> WithHeight for E {
        fn with_height(self, h: f32) -> crate::proxy::Proxy<crate::proxy::FixedSize> {
            crate::proxy::vsize(h, self)
        }
    }
}
