//! The view: owner of the root element and entry point for the host.
//!
//! The host event loop calls [`View::resize`] on size changes, then
//! [`View::draw`] or [`View::draw_dirty`] per frame, and the input methods
//! per event. Timers go through [`View::poll`]/[`View::advance`], which run
//! scheduled tasks against the view.
//!
//! Services that elements reach through their context (scheduler, dirty
//! region, cursor position, host, shared-element arena) live in
//! [`ViewState`], which is borrowed immutably by every context. Mutation
//! goes through `Cell`/`RefCell`, and no borrow is held across a call into
//! element code.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::arena::{ElementArena, ElementId};
use crate::canvas::Canvas;
use crate::context::{BasicContext, Context};
use crate::element::{Element, ElementPtr};
use crate::error::Result;
use crate::event::{CursorKind, CursorTracking, FocusRequest, KeyInfo, MouseButton, TextInfo};
use crate::payload::DropInfo;
use crate::primitives::{Point, Rect, Size};
use crate::scheduler::{Scheduler, TaskHandle};
use crate::theme::Theme;

pub type SharedCanvas = Rc<RefCell<dyn Canvas>>;

/// Platform services the core consumes from the host.
pub trait Host {
    fn set_cursor(&mut self, kind: CursorKind);
    fn clipboard(&self) -> String;
    fn set_clipboard(&mut self, text: &str);
}

/// Host without a window system. Remembers the last cursor request and
/// keeps a private clipboard.
#[derive(Debug, Default)]
pub struct NullHost {
    pub cursor: CursorKind,
    pub clipboard: String,
}

impl Host for NullHost {
    fn set_cursor(&mut self, kind: CursorKind) {
        self.cursor = kind;
    }

    fn clipboard(&self) -> String {
        self.clipboard.clone()
    }

    fn set_clipboard(&mut self, text: &str) {
        self.clipboard = text.to_owned();
    }
}

pub struct ViewState {
    pub(crate) scheduler: RefCell<Scheduler>,
    pub(crate) arena: RefCell<ElementArena>,
    dirty: Cell<Option<Rect>>,
    bounds: Cell<Rect>,
    cursor_pos: Cell<Point>,
    host: RefCell<Box<dyn Host>>,
}

impl ViewState {
    pub fn new(host: Box<dyn Host>) -> Self {
        Self {
            scheduler: RefCell::new(Scheduler::new()),
            arena: RefCell::new(ElementArena::new()),
            dirty: Cell::new(None),
            bounds: Cell::new(Rect::ZERO),
            cursor_pos: Cell::new(Point::ORIGIN),
            host: RefCell::new(host),
        }
    }

    /// Run `task` on the view after `delay`.
    pub fn post(&self, delay: Duration, task: impl FnOnce(&mut View) + 'static) -> TaskHandle {
        self.scheduler.borrow_mut().post(delay, Box::new(task))
    }

    /// Run `task` after `delay` under an existing cancellation token.
    pub fn post_with(
        &self,
        delay: Duration,
        handle: TaskHandle,
        task: impl FnOnce(&mut View) + 'static,
    ) {
        self.scheduler
            .borrow_mut()
            .post_with(delay, handle, Box::new(task));
    }

    /// Mark `area` for redraw.
    pub fn refresh(&self, area: Rect) {
        let dirty = match self.dirty.get() {
            Some(r) => r.union(&area),
            None => area,
        };
        self.dirty.set(Some(dirty));
    }

    pub fn refresh_all(&self) {
        self.refresh(self.bounds.get());
    }

    /// Take the accumulated dirty region.
    pub fn take_dirty(&self) -> Option<Rect> {
        self.dirty.take()
    }

    pub fn bounds(&self) -> Rect {
        self.bounds.get()
    }

    /// Last pointer position seen by the view.
    pub fn cursor_pos(&self) -> Point {
        self.cursor_pos.get()
    }

    pub fn set_cursor(&self, kind: CursorKind) {
        self.host.borrow_mut().set_cursor(kind);
    }

    pub fn clipboard(&self) -> String {
        self.host.borrow().clipboard()
    }

    pub fn set_clipboard(&self, text: &str) {
        self.host.borrow_mut().set_clipboard(text);
    }

    /// Whether an arena element is still alive.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.arena.borrow().contains(id)
    }
}

pub struct View {
    root: ElementPtr,
    state: ViewState,
    theme: Theme,
    canvas: SharedCanvas,
    bounds: Rect,
    needs_layout: bool,
    tracking: bool,
}

impl View {
    pub fn new(root: impl Element + 'static, canvas: SharedCanvas) -> Self {
        Self::with_host(root, canvas, Box::new(NullHost::default()))
    }

    pub fn with_host(root: impl Element + 'static, canvas: SharedCanvas, host: Box<dyn Host>) -> Self {
        Self {
            root: Box::new(root),
            state: ViewState::new(host),
            theme: Theme::default(),
            canvas,
            bounds: Rect::ZERO,
            needs_layout: true,
            tracking: false,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self.needs_layout = true;
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn root(&self) -> &dyn Element {
        self.root.as_ref()
    }

    pub fn root_mut(&mut self) -> &mut ElementPtr {
        &mut self.root
    }

    /// Limits of the root element in this view's context.
    pub fn root_limits(&self) -> crate::layout::ViewLimits {
        self.root.limits(&self.basic())
    }

    fn basic(&self) -> BasicContext<'_> {
        BasicContext::new(&self.state, &*self.canvas, &self.theme)
    }

    pub fn resize(&mut self, size: Size) {
        let bounds = Rect::new(0.0, 0.0, size.width, size.height);
        if bounds != self.bounds {
            tracing::debug!(width = size.width, height = size.height, "view resized");
            self.bounds = bounds;
            self.state.bounds.set(bounds);
            self.needs_layout = true;
            self.state.refresh_all();
        }
    }

    pub fn layout(&mut self) {
        let basic = BasicContext::new(&self.state, &*self.canvas, &self.theme);
        let ctx = Context::new(basic, self.bounds);
        self.root.layout(&ctx);
        self.needs_layout = false;
        tracing::trace!(bounds = ?self.bounds, "view layout");
    }

    /// Schedule a layout before the next draw or event.
    pub fn relayout(&mut self) {
        self.needs_layout = true;
        self.state.refresh_all();
    }

    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    /// Draw everything.
    pub fn draw(&mut self) {
        self.state.take_dirty();
        self.draw_region(self.bounds);
    }

    /// Draw the accumulated dirty region, if any.
    pub fn draw_dirty(&mut self) -> bool {
        match self.state.take_dirty() {
            Some(region) => {
                self.draw_region(region);
                true
            }
            None => false,
        }
    }

    fn draw_region(&mut self, region: Rect) {
        if self.needs_layout {
            self.layout();
        }
        let Some(viewport) = region.intersection(&self.bounds) else {
            return;
        };
        {
            let mut cnv = self.canvas.borrow_mut();
            cnv.save();
            cnv.begin_path();
            cnv.rect(viewport);
            cnv.clip();
        }
        let basic = BasicContext::new(&self.state, &*self.canvas, &self.theme);
        let ctx = Context::new(basic, self.bounds).with_viewport(viewport);
        self.root.draw(&ctx);
        self.canvas.borrow_mut().restore();
    }

    fn dispatch<R>(&mut self, f: impl FnOnce(&mut ElementPtr, &Context<'_>) -> R) -> R {
        if self.needs_layout {
            self.layout();
        }
        let basic = BasicContext::new(&self.state, &*self.canvas, &self.theme);
        let ctx = Context::new(basic, self.bounds);
        f(&mut self.root, &ctx)
    }

    pub fn click(&mut self, btn: MouseButton) -> bool {
        self.state.cursor_pos.set(btn.pos);
        let handled = self.dispatch(|root, ctx| root.click(ctx, btn));
        self.tracking = btn.down && handled;
        handled
    }

    /// Pointer motion with a button held. Ignored unless a click is being
    /// tracked.
    pub fn drag(&mut self, btn: MouseButton) {
        self.state.cursor_pos.set(btn.pos);
        if self.tracking {
            self.dispatch(|root, ctx| root.drag(ctx, btn));
        }
    }

    pub fn cursor(&mut self, p: Point, status: CursorTracking) -> bool {
        self.state.cursor_pos.set(p);
        self.dispatch(|root, ctx| root.cursor(ctx, p, status))
    }

    pub fn scroll(&mut self, dir: Point, p: Point) -> bool {
        self.dispatch(|root, ctx| root.scroll(ctx, dir, p))
    }

    pub fn key(&mut self, k: &KeyInfo) -> bool {
        self.dispatch(|root, ctx| root.key(ctx, k))
    }

    pub fn text(&mut self, info: TextInfo) -> bool {
        self.dispatch(|root, ctx| root.text(ctx, info))
    }

    pub fn focus(&mut self, req: FocusRequest) -> bool {
        self.root.focus(req)
    }

    pub fn track_drop(&mut self, info: &DropInfo, status: CursorTracking) {
        self.dispatch(|root, ctx| root.track_drop(ctx, info, status));
    }

    pub fn drop_payload(&mut self, info: &DropInfo) -> bool {
        self.dispatch(|root, ctx| root.drop_payload(ctx, info))
    }

    pub fn refresh(&self, area: Rect) {
        self.state.refresh(area);
    }

    pub fn refresh_all(&self) {
        self.state.refresh_all();
    }

    pub fn take_dirty(&self) -> Option<Rect> {
        self.state.take_dirty()
    }

    pub fn post(&self, delay: Duration, task: impl FnOnce(&mut View) + 'static) -> TaskHandle {
        self.state.post(delay, task)
    }

    /// Logical time of the scheduler clock.
    pub fn now(&self) -> Duration {
        self.state.scheduler.borrow().now()
    }

    /// When the earliest pending task falls due. Hosts sleep until then.
    pub fn next_due(&self) -> Option<Duration> {
        self.state.scheduler.borrow().next_due()
    }

    /// Number of tasks waiting to run.
    pub fn pending_tasks(&self) -> usize {
        self.state.scheduler.borrow().pending()
    }

    /// Move the clock to `now` and run every task that was due when the
    /// poll started. Returns how many tasks ran.
    pub fn poll(&mut self, now: Duration) -> usize {
        let horizon = {
            let mut scheduler = self.state.scheduler.borrow_mut();
            scheduler.advance_to(now);
            scheduler.horizon()
        };
        let mut ran = 0;
        loop {
            let task = self.state.scheduler.borrow_mut().pop_due(horizon);
            let Some(task) = task else { break };
            task(self);
            ran += 1;
        }
        if ran > 0 {
            tracing::debug!(ran, ?now, "scheduler turn");
        }
        ran
    }

    pub fn advance(&mut self, dt: Duration) -> usize {
        let now = self.now() + dt;
        self.poll(now)
    }

    /// Move an element into the arena. Place a [`crate::Shared`] with the
    /// returned id in the tree to display it.
    pub fn insert_shared(&mut self, element: impl Element + 'static) -> ElementId {
        self.state.arena.borrow_mut().insert(Box::new(element))
    }

    pub fn remove_shared(&mut self, id: ElementId) -> Result<Option<ElementPtr>> {
        let removed = self.state.arena.borrow_mut().remove(id)?;
        self.state.refresh_all();
        Ok(removed)
    }

    /// Run `f` on an arena element. `None` if the id is stale.
    pub fn with_shared_mut<R>(
        &mut self,
        id: ElementId,
        f: impl FnOnce(&mut dyn Element) -> R,
    ) -> Option<R> {
        let mut element = self.state.arena.borrow_mut().checkout(id)?;
        let result = f(element.as_mut());
        self.state.arena.borrow_mut().restore(id, element);
        Some(result)
    }

    /// Step an arena element every `interval` until the element is removed,
    /// `step` returns false, or the returned token is cancelled.
    pub fn animate(
        &self,
        id: ElementId,
        interval: Duration,
        step: impl FnMut(&mut dyn Element) -> bool + 'static,
    ) -> TaskHandle {
        let handle = TaskHandle::new();
        schedule_frame(&self.state, id, interval, handle.clone(), Box::new(step));
        handle
    }
}

type StepFn = Box<dyn FnMut(&mut dyn Element) -> bool>;

fn schedule_frame(state: &ViewState, id: ElementId, interval: Duration, handle: TaskHandle, mut step: StepFn) {
    let token = handle.clone();
    state.post_with(interval, handle, move |view: &mut View| {
        let Some(keep_going) = view.with_shared_mut(id, |e| step(e)) else {
            tracing::debug!(index = id.index, "animation target gone");
            return;
        };
        view.refresh_all();
        if keep_going && !token.is_cancelled() {
            schedule_frame(&view.state, id, interval, token, step);
        }
    });
}
