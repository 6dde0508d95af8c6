//! Generational arena for elements shared outside the tree.
//!
//! Most elements are owned by their parent. When application code needs to
//! keep talking to an element after handing it to the tree (an animated
//! progress bar, a popup shared between a button and a layer), it inserts
//! the element here and places a [`Shared`] handle in the tree instead.
//! Handles carry a generation, so a handle outliving its element is
//! detected instead of reaching a reused slot.
//!
//! While a `&mut` call runs on an arena element, the element is checked
//! out of its slot. The arena is therefore never borrowed across a call
//! into element code that might reach the arena again.

use crate::context::{BasicContext, Context};
use crate::element::{Element, ElementPtr, Hit};
use crate::error::{Error, Result};
use crate::event::{CursorTracking, KeyInfo, MouseButton, TextInfo};
use crate::layout::ViewLimits;
use crate::payload::DropInfo;
use crate::primitives::{Point, Size};

/// Stable handle to an arena element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId {
    pub index: u32,
    pub generation: u32,
}

enum Entry {
    Free { next_free: Option<u32> },
    Present(ElementPtr),
    CheckedOut { removed: bool },
}

struct Slot {
    generation: u32,
    entry: Entry,
}

#[derive(Default)]
pub struct ElementArena {
    slots: Vec<Slot>,
    free_head: Option<u32>,
    len: usize,
}

impl ElementArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, element: ElementPtr) -> ElementId {
        self.len += 1;
        if let Some(index) = self.free_head {
            let slot = &mut self.slots[index as usize];
            if let Entry::Free { next_free } = slot.entry {
                self.free_head = next_free;
            }
            slot.entry = Entry::Present(element);
            return ElementId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entry: Entry::Present(element),
        });
        ElementId {
            index,
            generation: 0,
        }
    }

    fn slot(&self, id: ElementId) -> Option<&Slot> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
    }

    fn slot_mut(&mut self, id: ElementId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
    }

    fn release(&mut self, index: u32) {
        let slot = &mut self.slots[index as usize];
        slot.generation = slot.generation.wrapping_add(1);
        slot.entry = Entry::Free {
            next_free: self.free_head,
        };
        self.free_head = Some(index);
        self.len -= 1;
    }

    /// Remove an element. An element that is currently checked out is
    /// dropped when it is restored. Returns the element if it was present.
    pub fn remove(&mut self, id: ElementId) -> Result<Option<ElementPtr>> {
        let Some(slot) = self.slot_mut(id) else {
            return Err(stale(id));
        };
        match std::mem::replace(&mut slot.entry, Entry::CheckedOut { removed: true }) {
            Entry::Present(element) => {
                self.release(id.index);
                Ok(Some(element))
            }
            Entry::CheckedOut { .. } => Ok(None),
            free @ Entry::Free { .. } => {
                slot.entry = free;
                Err(stale(id))
            }
        }
    }

    /// Whether `id` still names a live element (present or checked out).
    pub fn contains(&self, id: ElementId) -> bool {
        self.slot(id).is_some_and(|s| match s.entry {
            Entry::Present(_) => true,
            Entry::CheckedOut { removed } => !removed,
            Entry::Free { .. } => false,
        })
    }

    pub fn check(&self, id: ElementId) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(stale(id))
        }
    }

    /// Run `f` on a present element.
    pub fn with<R>(&self, id: ElementId, f: impl FnOnce(&dyn Element) -> R) -> Option<R> {
        match &self.slot(id)?.entry {
            Entry::Present(e) => Some(f(e.as_ref())),
            _ => None,
        }
    }

    pub fn with_mut<R>(
        &mut self,
        id: ElementId,
        f: impl FnOnce(&mut dyn Element) -> R,
    ) -> Option<R> {
        match &mut self.slot_mut(id)?.entry {
            Entry::Present(e) => Some(f(e.as_mut())),
            _ => None,
        }
    }

    /// Take an element out of its slot for the duration of a call.
    pub fn checkout(&mut self, id: ElementId) -> Option<ElementPtr> {
        let slot = self.slot_mut(id)?;
        match std::mem::replace(&mut slot.entry, Entry::CheckedOut { removed: false }) {
            Entry::Present(e) => Some(e),
            other => {
                slot.entry = other;
                None
            }
        }
    }

    /// Put a checked-out element back. If it was removed meanwhile, it is
    /// dropped here.
    pub fn restore(&mut self, id: ElementId, element: ElementPtr) {
        let Some(slot) = self.slot_mut(id) else {
            tracing::warn!(index = id.index, "restoring element into a stale slot");
            return;
        };
        match slot.entry {
            Entry::CheckedOut { removed: false } => slot.entry = Entry::Present(element),
            Entry::CheckedOut { removed: true } => {
                tracing::debug!(index = id.index, "dropping element removed while in use");
                self.release(id.index);
            }
            _ => tracing::warn!(index = id.index, "restore without checkout"),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

fn stale(id: ElementId) -> Error {
    Error::StaleHandle {
        index: id.index,
        generation: id.generation,
    }
}

/// Tree node standing in for an arena element.
///
/// A stale handle renders as empty space with zero limits.
pub struct Shared {
    id: ElementId,
}

impl Shared {
    pub fn new(id: ElementId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    fn run<R>(&self, ctx: &Context, f: impl FnOnce(&mut ElementPtr) -> R) -> Option<R> {
        let arena = &ctx.view.arena;
        let Some(mut element) = arena.borrow_mut().checkout(self.id) else {
            tracing::warn!(index = self.id.index, "shared element unavailable");
            return None;
        };
        let result = f(&mut element);
        arena.borrow_mut().restore(self.id, element);
        Some(result)
    }
}

impl Element for Shared {
    fn limits(&self, ctx: &BasicContext) -> ViewLimits {
        ctx.view
            .arena
            .borrow()
            .with(self.id, |e| e.limits(ctx))
            .unwrap_or(ViewLimits::fixed(Size::ZERO))
    }

    fn hit_test(&self, ctx: &Context, p: Point) -> Option<Hit> {
        ctx.view
            .arena
            .borrow()
            .with(self.id, |e| e.hit_test(ctx, p))
            .flatten()
    }

    fn draw(&mut self, ctx: &Context) {
        self.run(ctx, |e| e.draw(ctx));
    }

    fn layout(&mut self, ctx: &Context) {
        self.run(ctx, |e| e.layout(ctx));
    }

    fn click(&mut self, ctx: &Context, btn: MouseButton) -> bool {
        self.run(ctx, |e| e.click(ctx, btn)).unwrap_or(false)
    }

    fn drag(&mut self, ctx: &Context, btn: MouseButton) {
        self.run(ctx, |e| e.drag(ctx, btn));
    }

    fn key(&mut self, ctx: &Context, k: &KeyInfo) -> bool {
        self.run(ctx, |e| e.key(ctx, k)).unwrap_or(false)
    }

    fn text(&mut self, ctx: &Context, info: TextInfo) -> bool {
        self.run(ctx, |e| e.text(ctx, info)).unwrap_or(false)
    }

    fn cursor(&mut self, ctx: &Context, p: Point, status: CursorTracking) -> bool {
        self.run(ctx, |e| e.cursor(ctx, p, status)).unwrap_or(false)
    }

    fn scroll(&mut self, ctx: &Context, dir: Point, p: Point) -> bool {
        self.run(ctx, |e| e.scroll(ctx, dir, p)).unwrap_or(false)
    }

    fn is_control(&self) -> bool {
        // Without a context the arena is out of reach; let dispatch try us.
        true
    }

    fn track_drop(&mut self, ctx: &Context, info: &DropInfo, status: CursorTracking) {
        self.run(ctx, |e| e.track_drop(ctx, info, status));
    }

    fn drop_payload(&mut self, ctx: &Context, info: &DropInfo) -> bool {
        self.run(ctx, |e| e.drop_payload(ctx, info)).unwrap_or(false)
    }
}
