//! End-to-end behavior of element trees driven through a `View`.
//!
//! Every test builds a tree, hands it to a view backed by a recording
//! canvas, and observes the result through the canvas, callbacks, or a hit
//! test against the view's last layout.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use trellis::canvas::DrawCommand;
use trellis::proxy::{popup, vscroller, vsize};
use trellis::{
    BasicContext, Color, Composite, Context, CursorTracking, DialMode, Element, Empty, FULL_EXTENT,
    FixedCellComposer, FocusRequest, KeyInfo, Knob, Modifiers, MouseButton, NamedKey, Point,
    RecordingCanvas, Rect, Rectangle, SharedCanvas, Size, Slider, Spacer, Theme, View,
    ViewLimits, deck, dial, flow, htile, layer, vtile,
};
use trellis::dynamic_list::DynamicList;

fn recording(w: f32, h: f32) -> (Rc<RefCell<RecordingCanvas>>, SharedCanvas) {
    let canvas = Rc::new(RefCell::new(RecordingCanvas::new(Rect::new(0.0, 0.0, w, h))));
    let shared: SharedCanvas = canvas.clone();
    (canvas, shared)
}

fn hit_path(view: &View, canvas: &SharedCanvas, p: Point) -> Option<Vec<usize>> {
    let basic = BasicContext::new(view.state(), &**canvas, view.theme());
    let ctx = Context::new(basic, view.bounds());
    view.root().hit_test(&ctx, p).map(|hit| hit.path)
}

fn rigid(color: Color, height: f32) -> Rectangle {
    Rectangle::new(color).with_limits(ViewLimits::new(
        Size::new(0.0, height),
        Size::new(FULL_EXTENT, height),
    ))
}

/// Focus sink that logs focus transitions.
struct Field {
    name: &'static str,
    log: Rc<RefCell<Vec<String>>>,
}

impl Field {
    fn new(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Self {
        Self {
            name,
            log: log.clone(),
        }
    }
}

impl Element for Field {
    fn limits(&self, _ctx: &BasicContext) -> ViewLimits {
        ViewLimits::fixed(Size::new(40.0, 20.0))
    }

    fn wants_focus(&self) -> bool {
        true
    }

    fn focus(&mut self, req: FocusRequest) -> bool {
        self.log.borrow_mut().push(format!("{}:{req:?}", self.name));
        true
    }

    fn click(&mut self, _ctx: &Context, _btn: MouseButton) -> bool {
        true
    }

    fn is_control(&self) -> bool {
        true
    }
}

#[test]
fn stacked_limits_sum_along_the_axis() {
    let (_, canvas) = recording(100.0, 100.0);
    let root = vtile()
        .push(rigid(Color::WHITE, 10.0))
        .push(rigid(Color::WHITE, 20.0))
        .push(rigid(Color::WHITE, 30.0));
    let view = View::new(root, canvas);
    let limits = view.root_limits();
    assert_eq!(limits.min.height, 60.0);
    assert_eq!(limits.max.height, 60.0);
}

#[test]
fn layout_is_stable_and_respects_envelopes() {
    let (rec, canvas) = recording(300.0, 40.0);
    let root = htile()
        .push(Rectangle::fixed(Color::WHITE, 50.0, 40.0))
        .push(Spacer::horizontal(10.0))
        .push(Rectangle::new(Color::BLACK).with_limits(ViewLimits::new(
            Size::new(20.0, 10.0),
            Size::new(100.0, 40.0),
        )));
    let mut view = View::new(root, canvas);
    view.resize(Size::new(300.0, 40.0));
    view.draw();
    let first = rec.borrow().filled();
    rec.borrow_mut().clear();
    view.relayout();
    view.draw();
    assert_eq!(rec.borrow().filled(), first);

    // The bounded rectangle stops at its maximum; the spacer takes the rest.
    assert_eq!(first, vec![
        Rect::new(0.0, 0.0, 50.0, 40.0),
        Rect::new(200.0, 0.0, 100.0, 40.0),
    ]);
}

fn mixed(c: Composite) -> Composite {
    c.push(Rectangle::fixed(Color::WHITE, 30.0, 20.0))
        .push(Rectangle::new(Color::BLACK).with_limits(ViewLimits::new(
            Size::new(10.0, 5.0),
            Size::new(60.0, 40.0),
        )))
        .push(Rectangle::new(Color::WHITE))
        .push(vsize(12.0, Rectangle::new(Color::BLACK)))
}

#[test]
fn every_arrangement_keeps_children_inside_their_envelopes() {
    let (_, canvas) = recording(200.0, 150.0);
    let view = View::new(Empty, canvas.clone());
    let basic = BasicContext::new(view.state(), &*canvas, view.theme());
    let bounds = Rect::new(5.0, 5.0, 200.0, 150.0);

    for (name, mut c) in [
        ("vtile", mixed(vtile())),
        ("htile", mixed(htile())),
        ("layer", mixed(layer())),
        ("deck", mixed(deck())),
        ("flow", mixed(flow())),
    ] {
        let ctx = Context::new(basic, bounds);
        c.layout(&ctx);
        for i in 0..c.len() {
            let child_bounds = c.bounds_of(&ctx, i).expect("laid out");
            let limits = c.child(i).expect("child").limits(&basic);
            assert!(
                limits.contains(child_bounds.size()),
                "{name} child {i}: {child_bounds:?} outside {limits:?}"
            );
        }
    }
}

#[test]
fn port_content_stays_inside_its_envelope() {
    let (rec, canvas) = recording(200.0, 300.0);
    let content = Rectangle::new(Color::WHITE).with_limits(ViewLimits::new(
        Size::new(50.0, 600.0),
        Size::new(100.0, 800.0),
    ));
    let mut view = View::new(vscroller(content), canvas);
    view.resize(Size::new(200.0, 300.0));
    view.draw();
    let sizes: Vec<Size> = rec.borrow().filled().iter().map(Rect::size).collect();
    assert!(sizes.contains(&Size::new(100.0, 600.0)), "{sizes:?}");
}

#[test]
fn a_point_in_a_stack_hits_exactly_one_child() {
    let (_, canvas) = recording(50.0, 30.0);
    let root = vtile()
        .push(rigid(Color::WHITE, 10.0))
        .push(rigid(Color::WHITE, 10.0))
        .push(rigid(Color::WHITE, 10.0));
    let mut view = View::new(root, canvas.clone());
    view.resize(Size::new(50.0, 30.0));
    view.draw();
    assert_eq!(hit_path(&view, &canvas, Point::new(5.0, 5.0)), Some(vec![0]));
    assert_eq!(hit_path(&view, &canvas, Point::new(5.0, 10.0)), Some(vec![1]));
    assert_eq!(hit_path(&view, &canvas, Point::new(5.0, 29.0)), Some(vec![2]));
    assert_eq!(hit_path(&view, &canvas, Point::new(5.0, 31.0)), None);
}

#[test]
fn layers_resolve_hits_top_down() {
    let (_, canvas) = recording(50.0, 50.0);
    let root = layer()
        .push(Rectangle::new(Color::BLACK))
        .push(Rectangle::fixed(Color::WHITE, 20.0, 20.0));
    let mut view = View::new(root, canvas.clone());
    view.resize(Size::new(50.0, 50.0));
    view.draw();
    assert_eq!(hit_path(&view, &canvas, Point::new(10.0, 10.0)), Some(vec![1]));
    assert_eq!(hit_path(&view, &canvas, Point::new(40.0, 40.0)), Some(vec![0]));
}

#[test]
fn deck_shows_only_the_selected_page() {
    let (rec, canvas) = recording(50.0, 50.0);
    let red = Color::rgb(1.0, 0.0, 0.0);
    let blue = Color::rgb(0.0, 0.0, 1.0);
    let mut pages = deck()
        .push(Rectangle::new(red))
        .push(Rectangle::new(blue));
    pages.select(1);
    let mut view = View::new(pages, canvas);
    view.resize(Size::new(50.0, 50.0));
    view.draw();
    let colors: Vec<Color> = rec
        .borrow()
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Fill { color, .. } => Some(*color),
            _ => None,
        })
        .collect();
    assert_eq!(colors, vec![blue]);
}

#[test]
fn slider_drag_round_trip() {
    let (_, canvas) = recording(110.0, 20.0);
    let seen = Rc::new(Cell::new(-1.0));
    let s = seen.clone();
    let slider = Slider::new(
        Rectangle::fixed(Color::WHITE, 10.0, 20.0),
        rigid(Color::BLACK, 4.0).with_limits(ViewLimits::new(
            Size::new(50.0, 4.0),
            Size::new(FULL_EXTENT, 4.0),
        )),
        0.0,
    )
    .on_change(move |v| s.set(v));
    let mut view = View::new(slider, canvas);
    view.resize(Size::new(110.0, 20.0));
    view.draw();

    // Motion without a press is not a drag.
    view.drag(MouseButton::press(Point::new(60.0, 10.0)));
    assert_eq!(seen.get(), -1.0);

    assert!(view.click(MouseButton::press(Point::new(5.0, 10.0))));
    view.drag(MouseButton::press(Point::new(55.0, 10.0)));
    assert!((seen.get() - 0.5).abs() < 1e-6);
    assert!(view.click(MouseButton::release(Point::new(55.0, 10.0))));
    assert!((seen.get() - 0.5).abs() < 1e-6);

    // After release, motion is ignored again.
    view.drag(MouseButton::press(Point::new(100.0, 10.0)));
    assert!((seen.get() - 0.5).abs() < 1e-6);
}

#[test]
fn radial_dial_never_jumps_across_the_dead_zone() {
    let (_, canvas) = recording(100.0, 100.0);
    let theme = Theme {
        dial_mode: DialMode::Radial,
        ..Theme::default()
    };
    let max_delta = f64::from(theme.dial_max_delta);
    let values = Rc::new(RefCell::new(vec![0.04]));
    let v = values.clone();
    let knob = dial(Knob::new(100.0), 0.04).on_change(move |x| v.borrow_mut().push(x));
    let mut view = View::new(knob, canvas).with_theme(theme);
    view.resize(Size::new(100.0, 100.0));

    assert!(view.click(MouseButton::press(Point::new(10.0, 90.0))));
    // Just left of the bottom dead zone, then across it to the far end.
    view.drag(MouseButton::press(Point::new(11.0, 90.0)));
    view.drag(MouseButton::press(Point::new(90.0, 90.0)));
    view.drag(MouseButton::press(Point::new(60.0, 95.0)));
    view.click(MouseButton::release(Point::new(60.0, 95.0)));

    let values = values.borrow();
    for pair in values.windows(2) {
        assert!((pair[1] - pair[0]).abs() <= max_delta, "jump {pair:?}");
    }
    assert!(values.last().is_some_and(|v| *v < 0.1));
}

#[test]
fn tab_walks_nested_composites_in_order() {
    let (_, canvas) = recording(200.0, 100.0);
    let log = Rc::new(RefCell::new(Vec::new()));
    let root = vtile()
        .push(htile().push(Field::new("a", &log)).push(Field::new("b", &log)))
        .push(Field::new("c", &log));
    let mut view = View::new(root, canvas);
    view.resize(Size::new(200.0, 100.0));

    let tab = KeyInfo::press(NamedKey::Tab);
    assert!(view.key(&tab));
    assert!(view.key(&tab));
    assert!(view.key(&tab));
    // End of the chain: no wrap.
    assert!(!view.key(&tab));
    assert!(view.key(&tab.clone().with_modifiers(Modifiers::SHIFT)));

    assert_eq!(
        *log.borrow(),
        vec!["a:Begin", "a:End", "b:Begin", "b:End", "c:Begin", "c:End", "b:Begin"]
    );
}

#[test]
fn shift_tab_from_nothing_focused_starts_at_the_first_field() {
    let (_, canvas) = recording(200.0, 100.0);
    let log = Rc::new(RefCell::new(Vec::new()));
    let root = vtile()
        .push(Field::new("a", &log))
        .push(Field::new("b", &log));
    let mut view = View::new(root, canvas);
    view.resize(Size::new(200.0, 100.0));

    let shift_tab = KeyInfo::press(NamedKey::Tab).with_modifiers(Modifiers::SHIFT);
    assert!(view.key(&shift_tab));
    assert_eq!(*log.borrow(), vec!["a:Begin"]);
    // Now focused, shift walks backward and runs off the front.
    assert!(!view.key(&shift_tab));
}

#[test]
fn open_popup_swallows_the_first_outside_press() {
    let (_, canvas) = recording(200.0, 100.0);
    let log = Rc::new(RefCell::new(Vec::new()));
    let dismissed = Rc::new(Cell::new(0));
    let d = dismissed.clone();
    let mut menu = popup(None, Rectangle::fixed(Color::WHITE, 20.0, 20.0))
        .on_dismiss(move || d.set(d.get() + 1));
    menu.open();
    let root = layer().push(Field::new("a", &log)).push(menu);
    let mut view = View::new(root, canvas);
    view.resize(Size::new(200.0, 100.0));
    view.draw();

    let field = Point::new(10.0, 10.0);
    assert!(view.click(MouseButton::press(field)));
    view.click(MouseButton::release(field));
    assert_eq!(dismissed.get(), 1);
    assert!(log.borrow().is_empty());

    assert!(view.click(MouseButton::press(field)));
    assert_eq!(*log.borrow(), vec!["a:Begin"]);
    assert_eq!(dismissed.get(), 1);
}

#[test]
fn clicking_a_control_moves_focus_to_it() {
    let (_, canvas) = recording(80.0, 20.0);
    let log = Rc::new(RefCell::new(Vec::new()));
    let root = htile().push(Field::new("a", &log)).push(Field::new("b", &log));
    let mut view = View::new(root, canvas);
    view.resize(Size::new(80.0, 20.0));
    view.click(MouseButton::press(Point::new(50.0, 10.0)));
    view.click(MouseButton::release(Point::new(50.0, 10.0)));
    view.click(MouseButton::press(Point::new(10.0, 10.0)));
    assert_eq!(*log.borrow(), vec!["b:Begin", "b:End", "a:Begin"]);
}

#[test]
fn scroller_materializes_only_the_visible_rows() {
    let (rec, canvas) = recording(200.0, 500.0);
    let composed = Rc::new(Cell::new(0usize));
    let c = composed.clone();
    let rows = FixedCellComposer::new(100_000, 25.0, (100.0, FULL_EXTENT), move |_| {
        c.set(c.get() + 1);
        Box::new(Rectangle::new(Color::WHITE))
    });
    let mut view = View::new(vscroller(DynamicList::new(rows)), canvas);
    view.resize(Size::new(200.0, 500.0));
    view.draw();
    // Twenty visible rows plus one of lookahead below.
    assert_eq!(composed.get(), 21);

    rec.borrow_mut().clear();
    assert!(view.scroll(Point::new(0.0, -1250.0), Point::new(50.0, 50.0)));
    assert!(view.draw_dirty());
    // Rows 49..71 are all new.
    assert_eq!(composed.get(), 43);
    let painted = rec
        .borrow()
        .filled()
        .into_iter()
        .filter(|r| r.width == 200.0)
        .count();
    assert_eq!(painted, 20);
}

#[test]
fn hover_enters_and_leaves_children() {
    let (_, canvas) = recording(100.0, 20.0);
    let log = Rc::new(RefCell::new(Vec::new()));

    struct Hover(&'static str, Rc<RefCell<Vec<String>>>);
    impl Element for Hover {
        fn cursor(&mut self, _ctx: &Context, _p: Point, status: CursorTracking) -> bool {
            self.1.borrow_mut().push(format!("{}:{status:?}", self.0));
            true
        }
        fn is_control(&self) -> bool {
            true
        }
    }

    let root = htile()
        .push(Hover("left", log.clone()))
        .push(vsize(20.0, Hover("right", log.clone())));
    let mut view = View::new(root, canvas);
    view.resize(Size::new(100.0, 20.0));
    view.cursor(Point::new(10.0, 10.0), CursorTracking::Entering);
    view.cursor(Point::new(12.0, 10.0), CursorTracking::Hovering);
    view.cursor(Point::new(90.0, 10.0), CursorTracking::Hovering);
    view.cursor(Point::new(90.0, 10.0), CursorTracking::Leaving);
    assert_eq!(
        *log.borrow(),
        vec![
            "left:Entering",
            "left:Hovering",
            "left:Leaving",
            "right:Entering",
            "right:Leaving",
        ]
    );
}
