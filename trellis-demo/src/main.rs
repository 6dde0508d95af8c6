//! Headless walkthrough of the trellis element toolkit.
//!
//! Builds a small control panel (dial, slider, animated progress bar, drop
//! target and a 100k-row virtualized list), then drives it with synthetic
//! input and timer ticks against a recording canvas. Pass a theme JSON file
//! as the first argument to override the defaults. Set `RUST_LOG=debug` to
//! watch focus changes, reflows and list window moves.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use trellis::layout::FULL_EXTENT;
use trellis::payload::URI_LIST;
use trellis::proxy::{align_center, drop_box, hsize, margin, vscroller, vsize};
use trellis::{
    Color, Composite, CursorTracking, DropInfo, DynamicList, ElementId, Empty, FixedCellComposer,
    Insets, KeyInfo, Knob, Label, MouseButton, NamedKey, Payload, Point, ProgressBar,
    RecordingCanvas, Rect, Rectangle, Shared, SharedCanvas, Size, Slider, Theme, Value, View,
    ViewLimits, dial, flow, htile, vtile,
};

const WIDTH: f32 = 640.0;
const HEIGHT: f32 = 480.0;
const FRAME: Duration = Duration::from_millis(16);

fn slider_track() -> Rectangle {
    Rectangle::new(Color::rgb8(0x40, 0x40, 0x40)).with_limits(ViewLimits::new(
        Size::new(100.0, 4.0),
        Size::new(FULL_EXTENT, 4.0),
    ))
}

fn build(progress: ElementId, dropped: Rc<RefCell<Vec<String>>>) -> Composite {
    let controls = htile()
        .push(margin(
            Insets::all(10.0),
            dial(Knob::new(48.0), 0.5).on_change(|v| tracing::info!(value = v, "dial")),
        ))
        .push(margin(
            Insets::all(10.0),
            Slider::new(
                Rectangle::fixed(Color::WHITE, 12.0, 24.0),
                slider_track(),
                0.25,
            )
            .on_change(|v| tracing::info!(value = v, "slider")),
        ));

    let tags = ["layout", "hit test", "focus", "drag", "scroll", "drop", "theme"]
        .into_iter()
        .fold(flow(), |f, tag| f.push(margin(Insets::all(4.0), Label::new(tag))));

    let target = drop_box(align_center(Label::new("Drop files here"))).on_drop(move |payload| {
        match payload.file_paths() {
            Ok(paths) if !paths.is_empty() => {
                let mut log = dropped.borrow_mut();
                log.extend(paths.iter().map(|p| p.display().to_string()));
                true
            }
            Ok(_) => false,
            Err(err) => {
                tracing::warn!(%err, "rejected drop");
                false
            }
        }
    });

    let rows = FixedCellComposer::new(100_000, 24.0, (200.0, FULL_EXTENT), |i| {
        Box::new(hsize(WIDTH, Label::new(format!("Row {i}"))))
    });

    vtile()
        .push(margin(Insets::all(10.0), Label::new("Trellis").font_size(20.0)))
        .push(controls)
        .push(tags)
        .push(margin(Insets::new(10.0, 0.0, 10.0, 0.0), vsize(6.0, Shared::new(progress))))
        .push(vsize(60.0, target))
        .push(vscroller(DynamicList::new(rows)))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let theme = match std::env::args().nth(1) {
        Some(path) => Theme::load(&path)?,
        None => Theme::default(),
    };

    let recording = Rc::new(RefCell::new(RecordingCanvas::new(Rect::new(
        0.0, 0.0, WIDTH, HEIGHT,
    ))));
    let canvas: SharedCanvas = recording.clone();
    let mut view = View::new(Empty, canvas).with_theme(theme);

    let progress = view.insert_shared(ProgressBar::new());
    let dropped = Rc::new(RefCell::new(Vec::new()));
    *view.root_mut() = Box::new(build(progress, dropped.clone()));

    view.resize(Size::new(WIDTH, HEIGHT));
    view.draw();
    tracing::info!(
        commands = recording.borrow().commands().len(),
        limits = ?view.root_limits(),
        "first frame"
    );

    let mut fraction = 0.0;
    view.animate(progress, FRAME, move |e| {
        fraction += 0.1;
        e.set_value(Value::Double(fraction));
        fraction < 1.0
    });

    // Tab into the panel, turn the dial by dragging, wheel through the list.
    view.key(&KeyInfo::press(NamedKey::Tab));
    let knob = Point::new(34.0, 80.0);
    if view.click(MouseButton::press(knob)) {
        view.drag(MouseButton::press(knob).at(Point::new(74.0, 60.0)));
        view.click(MouseButton::release(Point::new(74.0, 60.0)));
    }
    let list = Point::new(100.0, HEIGHT - 40.0);
    view.cursor(list, CursorTracking::Entering);
    view.scroll(Point::new(0.0, -2400.0), list);

    let files = Payload::new().text(URI_LIST, "file:///tmp/notes%20today.txt\r\n");
    let over_target = Point::new(WIDTH / 2.0, 230.0);
    let drop = DropInfo::new(files, over_target);
    view.track_drop(&drop, CursorTracking::Entering);
    let accepted = view.drop_payload(&drop);
    tracing::info!(accepted, files = ?dropped.borrow(), "drop delivered");

    // Sleep-until-due host loop: jump the clock to the next task each turn.
    let mut frames = 0;
    while let Some(due) = view.next_due() {
        recording.borrow_mut().clear();
        view.poll(due);
        if view.draw_dirty() {
            frames += 1;
        }
    }
    tracing::info!(
        frames,
        pending = view.pending_tasks(),
        elapsed = ?view.now(),
        "animation finished"
    );
    Ok(())
}
