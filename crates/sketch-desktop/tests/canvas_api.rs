//! Public canvas API exercised without opening a window.
//!
//! Canvas state is per thread and the test harness runs each test on its
//! own thread, so tests do not see each other's canvases.

use pretty_assertions::assert_eq;
use sketch_desktop::*;
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn drawing_on_open_and_closed_canvases() {
    let cv = Canvas::new(600, 400, CYAN);
    cv.draw_line(0, 0, 600, 400, BLACK, DEFAULT_LINE_THICKNESS);
    cv.draw_rect(50, 50, 500, 300, BLACK, 10);
    cv.draw_arc(300, 200, 100, 45, 135, RED, 5);
    cv.draw_arc(300, 200, 80, 0, FULL_TURN, BLUE, FILL);
    cv.draw_text(5, 17, "0", BLACK, Some(18));
    assert_eq!((cv.width(), cv.height(), cv.background()), (600, 400, CYAN));

    cv.close();
    assert!(!cv.is_open());
    // Drawing on a closed canvas is a no-op.
    cv.draw_circle(10, 10, 5, RED, FILL);
    cv.erase();
}

#[test]
fn finish_hook_runs_when_last_canvas_closes() {
    let finished = Rc::new(Cell::new(false));
    let f = finished.clone();
    on_finish(move || f.set(true));

    let a = Canvas::with_size(100, 100);
    let b = Canvas::with_size(50, 40);
    a.close();
    assert!(!finished.get());
    b.close();
    assert!(finished.get());
}

#[test]
fn timers_stop_with_their_canvas() {
    let cv = Canvas::with_size(10, 10);
    let progress = cv.on_time_progress(1000, |_| {});
    cv.on_time(10_500, move || progress.stop());
    assert_eq!(cv.active_timers(), 2);
    cv.close();
    assert_eq!(cv.active_timers(), 0);
    assert!(!progress.is_active());
}

#[test]
fn missing_sound_plays_silently_but_load_keeps_reporting() {
    let err = play_sound("no-such-clip-here").unwrap_err();
    assert!(matches!(err, CanvasError::SoundNotFound(ref f) if f == "no-such-clip-here.wav"));
    assert!(play_sound("no-such-clip-here").is_ok());
    let err = load_sounds(&["no-such-clip-here"]).unwrap_err();
    assert!(matches!(err, CanvasError::SoundNotFound(ref f) if f == "no-such-clip-here.wav"));
}

#[test]
fn config_file_is_read_as_json() {
    let path = std::env::temp_dir().join(format!("sketchpad-config-{}.json", std::process::id()));
    std::fs::write(&path, r##"{ "title": "Demo", "background": "#202020" }"##).unwrap();
    let config = load_config(&path).unwrap();
    assert_eq!(config.title, "Demo");
    assert_eq!(config.background, Color::new(0x202020));
    assert_eq!(config.gap, 5);
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(load_config(&path), Err(CanvasError::Io(_))));
}

#[test]
fn key_names_from_window_keys() {
    use winit::keyboard::{Key, NamedKey};
    let q = key_event(&Key::Character("q".into())).unwrap();
    assert_eq!(q.code, 81);
    assert_eq!(key_event(&Key::Named(NamedKey::Escape)).unwrap().code, ESCAPE_CODE);
}
