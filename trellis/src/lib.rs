//! Trellis: a retained-mode element toolkit core.
//!
//! Applications build a tree of lightweight elements (leaves, proxies that
//! decorate one subject, composites that arrange many) and hand the root to
//! a [`View`]. The host drives the view: size changes trigger a layout,
//! frames draw the dirty region onto a [`Canvas`], and input events are
//! routed down the tree to the element that handles them.
//!
//! # Architecture
//!
//! ```text
//! host loop ──► View ──► root element
//!                 │        ├─ Composite   (tiles, grids, layer, deck, flow)
//!                 │        ├─ Proxy<P>    (margin, size, align, port, dial, ...)
//!                 │        ├─ DynamicList (virtualized rows from a Composer)
//!                 │        ├─ SelectionList (selection over a composite's items)
//!                 │        └─ leaves      (Rectangle, Label, Knob, Slider, ...)
//!                 ├─ ViewState: scheduler, dirty region, arena, host services
//!                 └─ Theme
//! ```
//!
//! Layout is two-phase. `limits` reports each element's size envelope
//! bottom-up; `layout` assigns bounds top-down. Bounds are not stored in
//! the elements themselves: every call receives a [`Context`] carrying the
//! bounds the parent allocated, so hit testing always agrees with the last
//! layout.
//!
//! Everything runs on the host's thread. Deferred work (animation frames,
//! relayout requested during layout) goes through [`View::post`] and runs
//! on the next [`View::poll`].

pub mod arena;
pub mod canvas;
pub mod composite;
pub mod context;
pub mod dynamic_list;
pub mod element;
pub mod error;
pub mod event;
pub mod layout;
pub mod payload;
pub mod primitives;
pub mod proxy;
pub mod scheduler;
pub mod selection;
pub mod theme;
pub mod view;

pub use arena::{ElementArena, ElementId, Shared};
pub use canvas::{Canvas, DrawCommand, Font, RecordingCanvas, TextMetrics};
pub use composite::{
    Arrangement, Composite, DispatchState, FlowState, deck, flow, hgrid, htile, layer, vgrid,
    vtile,
};
pub use context::{BasicContext, Context};
pub use dynamic_list::{Composer, DynamicList, FixedCellComposer, FnComposer};
pub use element::{
    Dial, DialState, Element, ElementPtr, Empty, Hit, Knob, Label, ProgressBar, Rectangle,
    Slider, Spacer, Value, dial,
};
pub use error::{Error, Result};
pub use event::{
    ButtonKind, CursorKind, CursorTracking, FocusRequest, Key, KeyAction, KeyInfo, Modifiers,
    MouseButton, NamedKey, TextInfo,
};
pub use layout::{FULL_EXTENT, ViewLimits, ViewStretch};
pub use payload::{DropInfo, Payload, PayloadData};
pub use primitives::{Axis, Color, Insets, Point, Rect, Size};
pub use proxy::{Proxy, ProxyPolicy};
pub use scheduler::TaskHandle;
pub use selection::{Selectable, SelectionList, selectable, selection_list};
pub use theme::{DialMode, Theme};
pub use view::{Host, NullHost, SharedCanvas, View, ViewState};
