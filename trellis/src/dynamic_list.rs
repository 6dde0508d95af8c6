//! Virtualized list for very large row counts.
//!
//! A [`DynamicList`] asks a [`Composer`] for the row count and row extents,
//! keeps a cumulative position table, and materializes row elements only
//! for the rows that intersect the visible viewport plus a small lookahead
//! on each edge. Rows leaving the window are dropped; rows entering it are
//! composed afresh.
//!
//! # Architecture
//!
//! ```text
//! Composer ──size/line_height──► Table (pos, size, generation per row)
//!          ──compose(i)────────► rows: BTreeMap<index, Row>   (window only)
//! viewport ∩ bounds ──partition_point──► window
//! ```
//!
//! The table is rebuilt lazily from the first row whose entry is stale.
//! A row's extent is re-queried only when its generation differs from the
//! table's, so a single `invalidate_row` costs one `line_height` call plus
//! a position sweep.
//!
//! Positions accumulate in `f64`: a million 25 px rows run past the range
//! where `f32` holds whole pixels. Row rectangles are formed relative to the
//! list origin before narrowing back to `f32`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::ops::Range;

use crate::composite::dispatch::{self, ChildSet, DispatchState};
use crate::context::{BasicContext, Context};
use crate::element::{Element, ElementPtr, Hit};
use crate::event::{CursorTracking, FocusRequest, KeyInfo, MouseButton, TextInfo};
use crate::layout::ViewLimits;
use crate::payload::DropInfo;
use crate::primitives::{Axis, Point, Rect, Size};

/// Rows kept beyond each edge of the visible range.
pub const DEFAULT_LOOKAHEAD: usize = 1;

/// Source of rows for a [`DynamicList`].
pub trait Composer {
    /// Number of rows.
    fn size(&self) -> usize;

    /// Build the element for row `index`. Only called for `index < size()`.
    fn compose(&self, index: usize) -> ElementPtr;

    /// Cross-axis (min, max) extent of the list.
    fn width_limits(&self, ctx: &BasicContext) -> (f32, f32);

    /// Main-axis extent of row `index`.
    fn line_height(&self, index: usize, ctx: &BasicContext) -> f32;

    /// Change the row count, for composers that own it.
    fn resize(&mut self, _n: usize) {}
}

type ComposeFn = Box<dyn Fn(usize) -> ElementPtr>;

/// Rows of one constant extent.
pub struct FixedCellComposer {
    count: usize,
    line_height: f32,
    width: (f32, f32),
    compose: ComposeFn,
}

impl FixedCellComposer {
    pub fn new(
        count: usize,
        line_height: f32,
        width: (f32, f32),
        compose: impl Fn(usize) -> ElementPtr + 'static,
    ) -> Self {
        Self {
            count,
            line_height,
            width,
            compose: Box::new(compose),
        }
    }
}

impl Composer for FixedCellComposer {
    fn size(&self) -> usize {
        self.count
    }

    fn compose(&self, index: usize) -> ElementPtr {
        (self.compose)(index)
    }

    fn width_limits(&self, _ctx: &BasicContext) -> (f32, f32) {
        self.width
    }

    fn line_height(&self, _index: usize, _ctx: &BasicContext) -> f32 {
        self.line_height
    }

    fn resize(&mut self, n: usize) {
        self.count = n;
    }
}

/// Rows whose extent comes from a closure.
pub struct FnComposer {
    count: usize,
    width: (f32, f32),
    height: Box<dyn Fn(usize) -> f32>,
    compose: ComposeFn,
}

impl FnComposer {
    pub fn new(
        count: usize,
        width: (f32, f32),
        height: impl Fn(usize) -> f32 + 'static,
        compose: impl Fn(usize) -> ElementPtr + 'static,
    ) -> Self {
        Self {
            count,
            width,
            height: Box::new(height),
            compose: Box::new(compose),
        }
    }
}

impl Composer for FnComposer {
    fn size(&self) -> usize {
        self.count
    }

    fn compose(&self, index: usize) -> ElementPtr {
        (self.compose)(index)
    }

    fn width_limits(&self, _ctx: &BasicContext) -> (f32, f32) {
        self.width
    }

    fn line_height(&self, index: usize, _ctx: &BasicContext) -> f32 {
        (self.height)(index).max(0.0)
    }

    fn resize(&mut self, n: usize) {
        self.count = n;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Cell {
    pos: f64,
    size: f32,
    generation: u64,
}

impl Cell {
    fn end(&self) -> f64 {
        self.pos + f64::from(self.size)
    }

    /// Span of this row inside `bounds`, whose leading edge is the list start.
    fn span(&self, bounds: Rect, axis: Axis) -> Rect {
        let start = f64::from(bounds.start(axis)) + self.pos;
        bounds.with_span(axis, start as f32, self.size)
    }
}

#[derive(Debug)]
struct Table {
    cells: Vec<Cell>,
    /// Leading cells whose positions are current.
    valid: usize,
    generation: u64,
}

impl Table {
    fn new() -> Self {
        Self {
            cells: Vec::new(),
            valid: 0,
            generation: 1,
        }
    }

    fn is_current(&self, count: usize) -> bool {
        self.cells.len() == count && self.valid == count
    }

    fn rebuild(&mut self, composer: &dyn Composer, ctx: &BasicContext) {
        let n = composer.size();
        self.cells.resize(n, Cell::default());
        self.valid = self.valid.min(n);
        if self.valid == n {
            return;
        }

        let from = self.valid;
        let mut pos = from.checked_sub(1).map_or(0.0, |i| self.cells[i].end());
        let mut measured = 0usize;
        for (i, cell) in self.cells.iter_mut().enumerate().skip(from) {
            if cell.generation != self.generation {
                cell.size = composer.line_height(i, ctx);
                cell.generation = self.generation;
                measured += 1;
            }
            cell.pos = pos;
            pos += f64::from(cell.size);
        }
        self.valid = n;
        tracing::trace!(from, measured, rows = n, extent = pos, "row table rebuilt");
    }

    fn extent(&self) -> f64 {
        self.cells.last().map_or(0.0, Cell::end)
    }

    fn invalidate_row(&mut self, index: usize) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell.generation = 0;
            self.valid = self.valid.min(index);
        }
    }

    fn invalidate_all(&mut self) {
        self.generation += 1;
        self.valid = 0;
    }
}

struct Row {
    element: ElementPtr,
    layout_id: u64,
}

pub struct DynamicList {
    composer: Box<dyn Composer>,
    axis: Axis,
    lookahead: usize,
    table: RefCell<Table>,
    rows: BTreeMap<usize, Row>,
    window: Range<usize>,
    /// Bumped when the list's own size changes; rows laid out under an
    /// older id are laid out again before use.
    layout_id: u64,
    laid_out_size: Option<Size>,
    last_window: Option<(Rect, Rect)>,
    dispatch: DispatchState,
}

impl DynamicList {
    pub fn new(composer: impl Composer + 'static) -> Self {
        Self {
            composer: Box::new(composer),
            axis: Axis::Vertical,
            lookahead: DEFAULT_LOOKAHEAD,
            table: RefCell::new(Table::new()),
            rows: BTreeMap::new(),
            window: 0..0,
            layout_id: 1,
            laid_out_size: None,
            last_window: None,
            dispatch: DispatchState::default(),
        }
    }

    /// Lay rows out left to right instead of top to bottom.
    pub fn horizontal(mut self) -> Self {
        self.axis = Axis::Horizontal;
        self
    }

    pub fn lookahead(mut self, rows: usize) -> Self {
        self.lookahead = rows;
        self
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn composer(&self) -> &dyn Composer {
        self.composer.as_ref()
    }

    /// Rows currently materialized, lookahead included.
    pub fn visible_range(&self) -> Range<usize> {
        self.window.clone()
    }

    pub fn is_materialized(&self, index: usize) -> bool {
        self.rows.contains_key(&index)
    }

    pub fn materialized(&self) -> usize {
        self.rows.len()
    }

    /// The extent of row `index` changed; re-measure it on the next pass.
    pub fn invalidate_row(&mut self, index: usize) {
        self.table.get_mut().invalidate_row(index);
        if let Some(row) = self.rows.get_mut(&index) {
            row.layout_id = 0;
        }
        self.last_window = None;
    }

    /// Every row may have changed: re-measure and re-compose everything.
    pub fn invalidate_all(&mut self) {
        self.table.get_mut().invalidate_all();
        self.rows.clear();
        self.window = 0..0;
        self.dispatch = DispatchState::default();
        self.last_window = None;
        tracing::debug!("dynamic list invalidated");
    }

    /// Change the row count. Rows at or beyond `n` are released.
    pub fn resize(&mut self, n: usize) {
        self.composer.resize(n);
        let table = self.table.get_mut();
        table.cells.truncate(n);
        table.valid = table.valid.min(n);
        self.rows.retain(|&i, _| i < n);
        self.window = self.window.start.min(n)..self.window.end.min(n);
        self.dispatch.invalidate_from(n);
        self.last_window = None;
        tracing::debug!(rows = n, "dynamic list resized");
    }

    /// Absolute bounds of row `index` under `ctx`, materialized or not.
    pub fn bounds_of(&self, ctx: &Context, index: usize) -> Option<Rect> {
        let table = self.table.borrow();
        let cell = table.cells.get(index)?;
        Some(cell.span(ctx.bounds, self.axis))
    }

    fn ensure_table(&self, ctx: &BasicContext) {
        let count = self.composer.size();
        if !self.table.borrow().is_current(count) {
            self.table.borrow_mut().rebuild(self.composer.as_ref(), ctx);
        }
    }

    /// Row range intersecting the visible part of `ctx.bounds`, widened by
    /// the lookahead.
    fn compute_window(&self, ctx: &Context) -> Range<usize> {
        let Some(visible) = ctx.viewport.intersection(&ctx.bounds) else {
            return 0..0;
        };
        let origin = f64::from(ctx.bounds.start(self.axis));
        let start = f64::from(visible.start(self.axis)) - origin;
        let end = start + f64::from(visible.extent(self.axis));
        let table = self.table.borrow();
        let first = table.cells.partition_point(|c| c.end() <= start);
        let last = table.cells.partition_point(|c| c.pos < end);
        let n = table.cells.len();
        first.saturating_sub(self.lookahead).min(n)..(last + self.lookahead).min(n)
    }

    fn update_window(&mut self, ctx: &Context) {
        self.ensure_table(&ctx.basic());
        let size = ctx.bounds.size();
        if self.laid_out_size != Some(size) {
            self.laid_out_size = Some(size);
            self.layout_id += 1;
        }

        let window = self.compute_window(ctx);
        if window != self.window {
            let before = self.rows.len();
            self.rows.retain(|i, _| window.contains(i));
            let keep = window.clone();
            self.dispatch.retain(|i| keep.contains(&i));
            tracing::debug!(
                from = ?self.window,
                to = ?window,
                evicted = before - self.rows.len(),
                "dynamic list window moved"
            );
            self.window = window.clone();
        }

        for i in window {
            let Some(bounds) = self.bounds_of(ctx, i) else {
                continue;
            };
            let row = self.rows.entry(i).or_insert_with(|| Row {
                element: self.composer.compose(i),
                layout_id: 0,
            });
            if row.layout_id != self.layout_id {
                row.element.layout(&ctx.child(i, bounds));
                row.layout_id = self.layout_id;
            }
        }
        self.last_window = Some((ctx.bounds, ctx.viewport));
    }

    fn ensure_window(&mut self, ctx: &Context) {
        if self.last_window != Some((ctx.bounds, ctx.viewport)) {
            self.update_window(ctx);
        }
    }
}

impl ChildSet for DynamicList {
    fn element(&self, index: usize) -> Option<&ElementPtr> {
        self.rows.get(&index).map(|r| &r.element)
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut ElementPtr> {
        self.rows.get_mut(&index).map(|r| &mut r.element)
    }

    fn child_bounds(&self, ctx: &Context, index: usize) -> Option<Rect> {
        if !self.rows.contains_key(&index) {
            return None;
        }
        self.bounds_of(ctx, index)
    }

    fn hit_order(&self) -> Vec<usize> {
        self.rows.keys().copied().collect()
    }

    fn focus_order(&self) -> Vec<usize> {
        self.rows.keys().copied().collect()
    }

    fn dispatch_state(&mut self) -> &mut DispatchState {
        &mut self.dispatch
    }

    fn dispatch_state_ref(&self) -> &DispatchState {
        &self.dispatch
    }
}

impl Element for DynamicList {
    fn limits(&self, ctx: &BasicContext) -> ViewLimits {
        if self.composer.size() == 0 {
            return ViewLimits::fixed(Size::ZERO);
        }
        self.ensure_table(ctx);
        let main = self.table.borrow().extent() as f32;
        let (cross_min, cross_max) = self.composer.width_limits(ctx);
        ViewLimits::new(
            Size::from_axis(self.axis, main, cross_min),
            Size::from_axis(self.axis, main, cross_max),
        )
    }

    fn hit_test(&self, ctx: &Context, p: Point) -> Option<Hit> {
        if !ctx.bounds.contains(p) {
            return None;
        }
        dispatch::hit_test(self, ctx, p)
    }

    fn layout(&mut self, ctx: &Context) {
        self.update_window(ctx);
    }

    fn draw(&mut self, ctx: &Context) {
        self.ensure_window(ctx);
        for (&i, row) in self.rows.iter_mut() {
            let table = self.table.borrow();
            let Some(cell) = table.cells.get(i) else {
                continue;
            };
            let bounds = cell.span(ctx.bounds, self.axis);
            drop(table);
            if bounds.intersects(&ctx.viewport) {
                row.element.draw(&ctx.child(i, bounds));
            }
        }
    }

    fn click(&mut self, ctx: &Context, btn: MouseButton) -> bool {
        self.ensure_window(ctx);
        dispatch::click(self, ctx, btn)
    }

    fn drag(&mut self, ctx: &Context, btn: MouseButton) {
        self.ensure_window(ctx);
        dispatch::drag(self, ctx, btn)
    }

    fn key(&mut self, ctx: &Context, k: &KeyInfo) -> bool {
        self.ensure_window(ctx);
        dispatch::key(self, ctx, k)
    }

    fn text(&mut self, ctx: &Context, info: TextInfo) -> bool {
        self.ensure_window(ctx);
        dispatch::text(self, ctx, info)
    }

    fn cursor(&mut self, ctx: &Context, p: Point, status: CursorTracking) -> bool {
        self.ensure_window(ctx);
        dispatch::cursor(self, ctx, p, status)
    }

    fn scroll(&mut self, ctx: &Context, dir: Point, p: Point) -> bool {
        self.ensure_window(ctx);
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
        self.ensure_window(ctx);
        dispatch::track_drop(self, ctx, info, status)
    }

    fn drop_payload(&mut self, ctx: &Context, info: &DropInfo) -> bool {
        self.ensure_window(ctx);
        dispatch::drop_payload(self, ctx, info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::Harness;
    use crate::element::Rectangle;
    use crate::primitives::Color;
    use crate::proxy::vscroller;
    use std::cell::Cell as Counter;
    use std::rc::Rc;

    fn rows(count: usize) -> FixedCellComposer {
        FixedCellComposer::new(count, 25.0, (100.0, 400.0), |_| {
            Box::new(Rectangle::new(Color::WHITE))
        })
    }

    fn scrolled(list: &mut DynamicList, h: &Harness, offset: f32) {
        let bounds = Rect::new(0.0, -offset, 200.0, 2_500_000.0);
        let ctx = h
            .ctx(bounds)
            .with_viewport(Rect::new(0.0, 0.0, 200.0, 500.0));
        list.layout(&ctx);
    }

    #[test]
    fn limits_cover_all_rows() {
        let h = Harness::new();
        let list = DynamicList::new(rows(100_000));
        let limits = list.limits(&h.basic());
        assert_eq!(limits.min, Size::new(100.0, 2_500_000.0));
        assert_eq!(limits.max, Size::new(400.0, 2_500_000.0));
        assert_eq!(DynamicList::new(rows(0)).limits(&h.basic()), ViewLimits::fixed(Size::ZERO));
    }

    #[test]
    fn window_follows_scroll_offset() {
        let h = Harness::new();
        let mut list = DynamicList::new(rows(100_000));
        scrolled(&mut list, &h, 1250.0);
        assert_eq!(list.visible_range(), 49..71);
        assert_eq!(list.materialized(), 22);
        assert!(list.is_materialized(49));
        assert!(!list.is_materialized(48));

        scrolled(&mut list, &h, 0.0);
        assert_eq!(list.visible_range(), 0..21);
        assert!(!list.is_materialized(49));
        assert_eq!(list.materialized(), 21);
    }

    #[test]
    fn million_rows_keep_whole_pixel_positions() {
        let h = Harness::new();
        let mut list = DynamicList::new(rows(1_000_000));
        assert_eq!(list.limits(&h.basic()).min.height, 25_000_000.0);

        let offset = 24_999_500.0;
        let bounds = Rect::new(0.0, -offset, 200.0, 25_000_000.0);
        let ctx = h.ctx(bounds).with_viewport(Rect::new(0.0, 0.0, 200.0, 500.0));
        list.layout(&ctx);
        assert_eq!(list.visible_range(), 999_979..1_000_000);

        assert_eq!(list.bounds_of(&ctx, 999_999), Some(Rect::new(0.0, 475.0, 200.0, 25.0)));
        assert_eq!(list.bounds_of(&ctx, 999_998), Some(Rect::new(0.0, 450.0, 200.0, 25.0)));
        let path = |y| list.hit_test(&ctx, Point::new(10.0, y)).map(|h| h.path);
        assert_eq!(path(475.0), Some(vec![999_999]));
        assert_eq!(path(474.5), Some(vec![999_998]));
    }

    #[test]
    fn zero_lookahead_is_exact() {
        let h = Harness::new();
        let mut list = DynamicList::new(rows(100_000)).lookahead(0);
        scrolled(&mut list, &h, 1250.0);
        assert_eq!(list.visible_range(), 50..70);
    }

    #[test]
    fn rows_compose_only_when_entering() {
        let h = Harness::new();
        let composed = Rc::new(Counter::new(0));
        let c = composed.clone();
        let mut list = DynamicList::new(FixedCellComposer::new(1000, 25.0, (0.0, 100.0), move |_| {
            c.set(c.get() + 1);
            Box::new(Rectangle::new(Color::WHITE))
        }))
        .lookahead(0);
        scrolled(&mut list, &h, 0.0);
        assert_eq!(composed.get(), 20);
        scrolled(&mut list, &h, 25.0);
        assert_eq!(composed.get(), 21);
    }

    #[test]
    fn invalidated_row_is_remeasured() {
        let h = Harness::new();
        let tall = Rc::new(Counter::new(25.0f32));
        let t = tall.clone();
        let mut list = DynamicList::new(FnComposer::new(
            10,
            (0.0, 100.0),
            move |i| if i == 3 { t.get() } else { 25.0 },
            |_| Box::new(Rectangle::new(Color::WHITE)),
        ));
        assert_eq!(list.limits(&h.basic()).min.height, 250.0);
        tall.set(75.0);
        assert_eq!(list.limits(&h.basic()).min.height, 250.0);
        list.invalidate_row(3);
        assert_eq!(list.limits(&h.basic()).min.height, 300.0);
        let ctx = h.ctx(Rect::new(0.0, 0.0, 100.0, 300.0));
        assert_eq!(list.bounds_of(&ctx, 4), Some(Rect::new(0.0, 150.0, 100.0, 25.0)));
    }

    #[test]
    fn resize_releases_rows_past_new_count() {
        let h = Harness::new();
        let mut list = DynamicList::new(rows(100));
        scrolled(&mut list, &h, 0.0);
        assert!(list.is_materialized(15));
        list.resize(10);
        assert!(!list.is_materialized(15));
        assert_eq!(list.limits(&h.basic()).min.height, 250.0);
        list.resize(40);
        assert_eq!(list.limits(&h.basic()).min.height, 1000.0);
    }

    #[test]
    fn hits_only_reach_materialized_rows() {
        let h = Harness::new();
        let mut list = DynamicList::new(rows(100)).lookahead(0);
        let bounds = Rect::new(0.0, 0.0, 200.0, 2500.0);
        let ctx = h.ctx(bounds).with_viewport(Rect::new(0.0, 0.0, 200.0, 100.0));
        list.layout(&ctx);
        let hit = list.hit_test(&ctx, Point::new(10.0, 60.0));
        assert_eq!(hit.map(|h| h.path), Some(vec![2]));
        assert_eq!(list.hit_test(&ctx, Point::new(10.0, 1000.0)), None);
    }

    #[test]
    fn scroller_drives_the_window() {
        let h = Harness::new();
        let mut s = vscroller(DynamicList::new(rows(100_000)));
        let ctx = h.ctx(Rect::new(0.0, 0.0, 200.0, 500.0));
        s.layout(&ctx);
        s.policy_mut().set_offset(Point::new(0.0, 1250.0));
        s.draw(&ctx);
        let fills = h.canvas.borrow().filled();
        // Rows 50..70 are painted; the lookahead rows lie outside the clip.
        let rows: Vec<Rect> = fills.iter().filter(|r| r.width == 200.0).copied().collect();
        assert_eq!(rows.len(), 20);
        assert_eq!(rows[0], Rect::new(0.0, 0.0, 200.0, 25.0));
    }
}
