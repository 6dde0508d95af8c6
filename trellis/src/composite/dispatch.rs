//! Event routing shared by every multi-child element.
//!
//! A container exposes its children through [`ChildSet`]; the free
//! functions here implement hit testing, click/drag tracking, hover
//! enter/leave, the keyboard focus chain and drop routing once, for
//! stacked, layered and flowed composites and for the dynamic list.
//! Per-container routing state lives in [`DispatchState`], keyed by child
//! index.

use crate::context::Context;
use crate::element::{ElementPtr, Hit};
use crate::event::{CursorTracking, FocusRequest, KeyInfo, MouseButton, NamedKey, TextInfo};
use crate::payload::DropInfo;
use crate::primitives::{Point, Rect};

/// Indices of the children currently holding some routing role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchState {
    pub focus: Option<usize>,
    pub saved_focus: Option<usize>,
    /// Child that accepted the last button press; receives drags and the
    /// matching release.
    pub click_tracking: Option<usize>,
    /// Child under the pointer at the last cursor event.
    pub hover: Option<usize>,
    /// Child under the pointer during a drag-and-drop.
    pub drop_hover: Option<usize>,
}

impl DispatchState {
    /// Forget every role held by a child at or after `index`.
    pub fn invalidate_from(&mut self, index: usize) {
        self.retain(|i| i < index);
    }

    /// Keep only the roles whose child index satisfies `keep`.
    pub fn retain(&mut self, keep: impl Fn(usize) -> bool) {
        for slot in [
            &mut self.focus,
            &mut self.saved_focus,
            &mut self.click_tracking,
            &mut self.hover,
            &mut self.drop_hover,
        ] {
            if slot.is_some_and(|i| !keep(i)) {
                *slot = None;
            }
        }
    }
}

/// A container's view of its children for routing.
pub(crate) trait ChildSet {
    fn element(&self, index: usize) -> Option<&ElementPtr>;
    fn element_mut(&mut self, index: usize) -> Option<&mut ElementPtr>;
    /// Absolute bounds of child `index` under `ctx`, if laid out.
    fn child_bounds(&self, ctx: &Context, index: usize) -> Option<Rect>;
    /// Children that can receive pointer events, topmost first.
    fn hit_order(&self) -> Vec<usize>;
    /// Children in keyboard traversal order.
    fn focus_order(&self) -> Vec<usize>;
    fn dispatch_state(&mut self) -> &mut DispatchState;
    fn dispatch_state_ref(&self) -> &DispatchState;
}

pub(crate) fn hit_test<C: ChildSet + ?Sized>(set: &C, ctx: &Context, p: Point) -> Option<Hit> {
    for i in set.hit_order() {
        let (Some(b), Some(child)) = (set.child_bounds(ctx, i), set.element(i)) else {
            continue;
        };
        if let Some(hit) = child.hit_test(&ctx.child(i, b), p) {
            return Some(hit.within(i));
        }
    }
    None
}

/// Topmost interactive child accepting `p`, with its bounds.
pub(crate) fn hit_control<C: ChildSet + ?Sized>(
    set: &C,
    ctx: &Context,
    p: Point,
) -> Option<(usize, Rect)> {
    set.hit_order().into_iter().find_map(|i| {
        let b = set.child_bounds(ctx, i)?;
        let child = set.element(i)?;
        (child.is_control() && child.hit_test(&ctx.child(i, b), p).is_some()).then_some((i, b))
    })
}

fn move_focus<C: ChildSet + ?Sized>(set: &mut C, to: usize) {
    let from = set.dispatch_state_ref().focus;
    if from == Some(to) {
        return;
    }
    if let Some(f) = from {
        if let Some(old) = set.element_mut(f) {
            old.focus(FocusRequest::End);
        }
    }
    if let Some(child) = set.element_mut(to) {
        child.focus(FocusRequest::Begin);
    }
    set.dispatch_state().focus = Some(to);
    tracing::debug!(?from, to, "focus moved");
}

pub(crate) fn click<C: ChildSet + ?Sized>(set: &mut C, ctx: &Context, btn: MouseButton) -> bool {
    let target = if btn.down {
        hit_control(set, ctx, btn.pos)
    } else {
        match set.dispatch_state().click_tracking.take() {
            Some(i) => set.child_bounds(ctx, i).map(|b| (i, b)),
            None => hit_control(set, ctx, btn.pos),
        }
    };
    let Some((i, b)) = target else {
        return false;
    };
    if btn.down && set.element(i).is_some_and(|c| c.wants_focus()) {
        move_focus(set, i);
    }
    let handled = match set.element_mut(i) {
        Some(child) => child.click(&ctx.child(i, b), btn),
        None => false,
    };
    if btn.down && handled {
        set.dispatch_state().click_tracking = Some(i);
    }
    handled
}

pub(crate) fn drag<C: ChildSet + ?Sized>(set: &mut C, ctx: &Context, btn: MouseButton) {
    let Some(i) = set.dispatch_state_ref().click_tracking else {
        return;
    };
    let Some(b) = set.child_bounds(ctx, i) else {
        return;
    };
    if let Some(child) = set.element_mut(i) {
        child.drag(&ctx.child(i, b), btn);
    }
}

pub(crate) fn key<C: ChildSet + ?Sized>(set: &mut C, ctx: &Context, k: &KeyInfo) -> bool {
    let is_tab = k.is_pressed(NamedKey::Tab);
    let focus = set.dispatch_state_ref().focus;
    let candidates = match focus {
        Some(f) => vec![f],
        None => set.focus_order(),
    };
    for i in candidates {
        let Some(b) = set.child_bounds(ctx, i) else {
            continue;
        };
        if set
            .element_mut(i)
            .is_some_and(|child| child.key(&ctx.child(i, b), k))
        {
            // A tab handled below us moved the focus into that child.
            if is_tab && focus.is_none() {
                set.dispatch_state().focus = Some(i);
            }
            return true;
        }
    }
    if is_tab {
        return tab(set, k.modifiers.shift);
    }
    false
}

/// Move focus to the next (or previous) child that wants it. Does not
/// wrap: at the end of the chain it returns false so an enclosing
/// container can move on. Entering a chain with nothing focused always
/// starts from the first child, shift or not.
fn tab<C: ChildSet + ?Sized>(set: &mut C, backward: bool) -> bool {
    let focus = set.dispatch_state_ref().focus;
    let mut order: Vec<usize> = set
        .focus_order()
        .into_iter()
        .filter(|&i| set.element(i).is_some_and(|c| c.wants_focus()))
        .collect();
    if backward && focus.is_some() {
        order.reverse();
    }
    let next = match focus {
        Some(f) => order
            .iter()
            .position(|&i| i == f)
            .and_then(|pos| order.get(pos + 1).copied()),
        None => order.first().copied(),
    };
    match next {
        Some(i) => {
            move_focus(set, i);
            true
        }
        None => false,
    }
}

pub(crate) fn text<C: ChildSet + ?Sized>(set: &mut C, ctx: &Context, info: TextInfo) -> bool {
    let Some(f) = set.dispatch_state_ref().focus else {
        return false;
    };
    let Some(b) = set.child_bounds(ctx, f) else {
        return false;
    };
    set.element_mut(f)
        .is_some_and(|child| child.text(&ctx.child(f, b), info))
}

fn leave<C: ChildSet + ?Sized>(set: &mut C, ctx: &Context, i: usize, p: Point) {
    if let Some(b) = set.child_bounds(ctx, i) {
        if let Some(child) = set.element_mut(i) {
            child.cursor(&ctx.child(i, b), p, CursorTracking::Leaving);
        }
    }
}

pub(crate) fn cursor<C: ChildSet + ?Sized>(
    set: &mut C,
    ctx: &Context,
    p: Point,
    status: CursorTracking,
) -> bool {
    let previous = set.dispatch_state_ref().hover;
    if status == CursorTracking::Leaving {
        if let Some(prev) = set.dispatch_state().hover.take() {
            leave(set, ctx, prev, p);
        }
        return false;
    }
    let hit = hit_control(set, ctx, p);
    let current = hit.map(|(i, _)| i);
    if let Some(prev) = previous.filter(|&prev| Some(prev) != current) {
        leave(set, ctx, prev, p);
    }
    set.dispatch_state().hover = current;
    let Some((i, b)) = hit else {
        return false;
    };
    let status = if previous == Some(i) {
        status
    } else {
        CursorTracking::Entering
    };
    set.element_mut(i)
        .is_some_and(|child| child.cursor(&ctx.child(i, b), p, status))
}

pub(crate) fn scroll<C: ChildSet + ?Sized>(set: &mut C, ctx: &Context, dir: Point, p: Point) -> bool {
    let Some((i, b)) = hit_control(set, ctx, p) else {
        return false;
    };
    set.element_mut(i)
        .is_some_and(|child| child.scroll(&ctx.child(i, b), dir, p))
}

pub(crate) fn focus<C: ChildSet + ?Sized>(set: &mut C, req: FocusRequest) -> bool {
    match req {
        FocusRequest::Begin => {
            let target = {
                let shared: &C = set;
                let wants = |i: usize| shared.element(i).is_some_and(|c| c.wants_focus());
                shared
                    .dispatch_state_ref()
                    .saved_focus
                    .filter(|&i| wants(i))
                    .or_else(|| shared.focus_order().into_iter().find(|&i| wants(i)))
            };
            let Some(i) = target else {
                return false;
            };
            set.dispatch_state().focus = Some(i);
            if let Some(child) = set.element_mut(i) {
                child.focus(FocusRequest::Begin);
            }
            true
        }
        FocusRequest::End => {
            if let Some(f) = set.dispatch_state().focus.take() {
                if let Some(child) = set.element_mut(f) {
                    child.focus(FocusRequest::End);
                }
                set.dispatch_state().saved_focus = Some(f);
            }
            true
        }
    }
}

pub(crate) fn wants_focus<C: ChildSet + ?Sized>(set: &C) -> bool {
    set.focus_order()
        .into_iter()
        .any(|i| set.element(i).is_some_and(|c| c.wants_focus()))
}

pub(crate) fn is_control<C: ChildSet + ?Sized>(set: &C) -> bool {
    set.hit_order()
        .into_iter()
        .any(|i| set.element(i).is_some_and(|c| c.is_control()))
}

pub(crate) fn track_drop<C: ChildSet + ?Sized>(
    set: &mut C,
    ctx: &Context,
    info: &DropInfo,
    status: CursorTracking,
) {
    let previous = set.dispatch_state_ref().drop_hover;
    let notify = |set: &mut C, i: usize, status: CursorTracking| {
        if let Some(b) = set.child_bounds(ctx, i) {
            if let Some(child) = set.element_mut(i) {
                child.track_drop(&ctx.child(i, b), info, status);
            }
        }
    };
    if status == CursorTracking::Leaving {
        if let Some(prev) = set.dispatch_state().drop_hover.take() {
            notify(set, prev, CursorTracking::Leaving);
        }
        return;
    }
    let current = hit_control(set, ctx, info.position).map(|(i, _)| i);
    if let Some(prev) = previous.filter(|&prev| Some(prev) != current) {
        notify(set, prev, CursorTracking::Leaving);
    }
    set.dispatch_state().drop_hover = current;
    if let Some(i) = current {
        let status = if previous == Some(i) {
            status
        } else {
            CursorTracking::Entering
        };
        notify(set, i, status);
    }
}

pub(crate) fn drop_payload<C: ChildSet + ?Sized>(set: &mut C, ctx: &Context, info: &DropInfo) -> bool {
    set.dispatch_state().drop_hover = None;
    let Some((i, b)) = hit_control(set, ctx, info.position) else {
        return false;
    };
    set.element_mut(i)
        .is_some_and(|child| child.drop_payload(&ctx.child(i, b), info))
}
