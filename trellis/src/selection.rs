//! Single and multiple selection over the items of a composite.
//!
//! A [`SelectionList`] wraps a [`Composite`] and owns the selection state.
//! A plain click selects one item, a shift-click extends from the anchor
//! and a command-click toggles. The arrow keys move the selection (shift
//! extends it) and command-A selects everything. Items learn their state
//! through `set_value(Value::Bool(_))`; wrap them in [`selectable`] to get
//! a highlight.
//!
//! Arrow navigation does not scroll an enclosing port. Owners that need it
//! call the port's `scroll_into_view` with the item's bounds.

use crate::composite::Composite;
use crate::context::{BasicContext, Context};
use crate::element::{Element, Hit, Value};
use crate::event::{
    CursorTracking, FocusRequest, Key, KeyAction, KeyInfo, MouseButton, NamedKey, TextInfo,
};
use crate::layout::{ViewLimits, ViewStretch};
use crate::payload::DropInfo;
use crate::primitives::Point;
use crate::proxy::{Proxy, ProxyPolicy};

/// Receives the anchor and moving end after every change, or `None` once
/// nothing is selected.
type SelectHandler = Box<dyn FnMut(Option<(usize, usize)>)>;

pub struct SelectionList {
    list: Composite,
    selected: Vec<bool>,
    anchor: Option<usize>,
    end: Option<usize>,
    multi: bool,
    on_select: Option<SelectHandler>,
}

impl SelectionList {
    pub fn new(list: Composite, multi: bool) -> Self {
        let selected = vec![false; list.len()];
        Self {
            list,
            selected,
            anchor: None,
            end: None,
            multi,
            on_select: None,
        }
    }

    pub fn on_select(mut self, f: impl FnMut(Option<(usize, usize)>) + 'static) -> Self {
        self.on_select = Some(Box::new(f));
        self
    }

    pub fn list(&self) -> &Composite {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut Composite {
        &mut self.list
    }

    pub fn is_multi_select(&self) -> bool {
        self.multi
    }

    /// Selected item indices, ascending.
    pub fn selection(&self) -> Vec<usize> {
        self.selected
            .iter()
            .enumerate()
            .filter_map(|(i, on)| on.then_some(i))
            .collect()
    }

    /// Anchor and moving end of the current selection.
    pub fn range(&self) -> Option<(usize, usize)> {
        self.anchor.zip(self.end)
    }

    /// Replace the selection. Indices past the last item are ignored.
    pub fn set_selection(&mut self, indices: &[usize]) {
        self.sync();
        self.clear_marks();
        for &i in indices {
            self.mark(i, true);
        }
        let selection = self.selection();
        self.anchor = selection.first().copied();
        self.end = selection.last().copied();
    }

    /// Select every item. Single-select lists ignore this.
    pub fn select_all(&mut self) {
        if self.mark_all() {
            self.notify();
        }
    }

    pub fn select_none(&mut self) {
        self.sync();
        self.clear_marks();
        self.anchor = None;
        self.end = None;
        self.notify();
    }

    /// Follow structural changes made through `list_mut`.
    fn sync(&mut self) {
        let n = self.list.len();
        self.selected.resize(n, false);
        if self.anchor.is_some_and(|a| a >= n) || self.end.is_some_and(|e| e >= n) {
            self.anchor = None;
            self.end = None;
        }
    }

    fn mark(&mut self, index: usize, on: bool) {
        let Some(slot) = self.selected.get_mut(index) else {
            return;
        };
        if *slot != on {
            *slot = on;
            if let Some(item) = self.list.child_mut(index) {
                item.set_value(Value::Bool(on));
            }
        }
    }

    fn clear_marks(&mut self) {
        for i in 0..self.selected.len() {
            self.mark(i, false);
        }
    }

    fn mark_all(&mut self) -> bool {
        self.sync();
        let n = self.selected.len();
        if !self.multi || n == 0 {
            return false;
        }
        for i in 0..n {
            self.mark(i, true);
        }
        self.anchor = Some(0);
        self.end = Some(n - 1);
        true
    }

    fn select_only(&mut self, index: usize) {
        self.clear_marks();
        self.mark(index, true);
        self.anchor = Some(index);
        self.end = Some(index);
    }

    fn toggle(&mut self, index: usize) {
        if !self.multi {
            if let Some(a) = self.anchor.filter(|&a| a != index) {
                self.mark(a, false);
            }
        }
        let on = !self.selected.get(index).copied().unwrap_or(true);
        self.mark(index, on);
        if on {
            self.anchor = Some(index);
            self.end = Some(index);
        }
        if !self.selected.contains(&true) {
            self.anchor = None;
            self.end = None;
        }
    }

    /// Select everything between the anchor and `index`, dropping the
    /// previous extension.
    fn extend_to(&mut self, index: usize) {
        let start = self.anchor.unwrap_or(0);
        let end = self.end.unwrap_or(start);
        for i in start.min(end)..=start.max(end) {
            self.mark(i, false);
        }
        for i in start.min(index)..=start.max(index) {
            self.mark(i, true);
        }
        self.anchor = Some(start);
        self.end = Some(index);
    }

    /// Move the moving end one item. With nothing selected, down starts at
    /// the first item and up at the last.
    fn step(&mut self, forward: bool, extend: bool) -> bool {
        let n = self.selected.len();
        if n == 0 {
            return false;
        }
        let next = match self.end {
            None if forward => 0,
            None => n - 1,
            Some(e) if forward && e + 1 < n => e + 1,
            Some(e) if !forward && e > 0 => e - 1,
            // At the edge: nothing moves, but the key is ours.
            Some(_) => return true,
        };
        if extend && self.end.is_some() {
            self.extend_to(next);
        } else {
            self.select_only(next);
        }
        true
    }

    fn notify(&mut self) {
        let range = self.range();
        tracing::debug!(?range, "selection changed");
        if let Some(f) = self.on_select.as_mut() {
            f(range);
        }
    }
}

impl Element for SelectionList {
    fn limits(&self, ctx: &BasicContext) -> ViewLimits {
        self.list.limits(ctx)
    }

    fn stretch(&self) -> ViewStretch {
        self.list.stretch()
    }

    fn hit_test(&self, ctx: &Context, p: Point) -> Option<Hit> {
        self.list.hit_test(ctx, p)
    }

    fn draw(&mut self, ctx: &Context) {
        self.list.draw(ctx)
    }

    fn layout(&mut self, ctx: &Context) {
        self.list.layout(ctx)
    }

    fn click(&mut self, ctx: &Context, btn: MouseButton) -> bool {
        if self.list.click(ctx, btn) {
            return true;
        }
        self.sync();
        let Some(index) = self
            .list
            .hit_test(ctx, btn.pos)
            .and_then(|hit| hit.path.first().copied())
        else {
            return false;
        };

        let handled = if btn.modifiers.command() {
            if btn.down {
                self.toggle(index);
            }
            btn.down
        } else if self.multi && btn.modifiers.shift {
            if btn.down {
                self.extend_to(index);
            }
            btn.down
        } else {
            if btn.down {
                self.select_only(index);
            }
            true
        };
        if handled && btn.down {
            ctx.refresh();
            self.notify();
        }
        handled
    }

    fn drag(&mut self, ctx: &Context, btn: MouseButton) {
        self.list.drag(ctx, btn)
    }

    fn key(&mut self, ctx: &Context, k: &KeyInfo) -> bool {
        if self.list.key(ctx, k) {
            return true;
        }
        if k.action == KeyAction::Release {
            return false;
        }
        self.sync();
        let extend = self.multi && k.modifiers.shift;
        let handled = match &k.key {
            Key::Character(c) if c.eq_ignore_ascii_case(&'a') && k.modifiers.command() => {
                self.mark_all()
            }
            Key::Named(NamedKey::ArrowDown) => self.step(true, extend),
            Key::Named(NamedKey::ArrowUp) => self.step(false, extend),
            _ => false,
        };
        if handled {
            ctx.refresh();
            self.notify();
        }
        handled
    }

    fn text(&mut self, ctx: &Context, info: TextInfo) -> bool {
        self.list.text(ctx, info)
    }

    fn cursor(&mut self, ctx: &Context, p: Point, status: CursorTracking) -> bool {
        self.list.cursor(ctx, p, status)
    }

    fn scroll(&mut self, ctx: &Context, dir: Point, p: Point) -> bool {
        self.list.scroll(ctx, dir, p)
    }

    fn wants_focus(&self) -> bool {
        true
    }

    fn focus(&mut self, req: FocusRequest) -> bool {
        self.list.focus(req);
        true
    }

    fn is_control(&self) -> bool {
        true
    }

    fn track_drop(&mut self, ctx: &Context, info: &DropInfo, status: CursorTracking) {
        self.list.track_drop(ctx, info, status)
    }

    fn drop_payload(&mut self, ctx: &Context, info: &DropInfo) -> bool {
        self.list.drop_payload(ctx, info)
    }
}

/// Multi-select list over `list`'s items.
pub fn selection_list(list: Composite) -> SelectionList {
    SelectionList::new(list, true)
}

/// Paints the theme's selection color behind a selected subject. Takes
/// `Value::Bool` as its selection state and passes other values through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selectable {
    selected: bool,
}

impl ProxyPolicy for Selectable {
    fn draw(&mut self, ctx: &Context, subject: &mut dyn Element) {
        if self.selected {
            let mut cnv = ctx.canvas.borrow_mut();
            cnv.begin_path();
            cnv.rect(ctx.parent_bounds());
            cnv.fill_style(ctx.theme.selection_color);
            cnv.fill();
        }
        subject.draw(ctx);
    }

    fn set_value(&mut self, subject: &mut dyn Element, value: Value) {
        match value {
            Value::Bool(on) => self.selected = on,
            other => subject.set_value(other),
        }
    }
}

impl Proxy<Selectable> {
    pub fn is_selected(&self) -> bool {
        self.policy().selected
    }
}

pub fn selectable(subject: impl Element + 'static) -> Proxy<Selectable> {
    Proxy::new(Selectable::default(), subject)
}
