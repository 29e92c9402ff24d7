//! Demo program, exported as the wasm start function with `--features demo`.

use crate::*;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() -> std::result::Result<(), JsValue> {
    init_logging(log::LevelFilter::Info);
    on_start(run).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn run() {
    let cv = Canvas::new(600, 400, CYAN);
    cv.on_mouse_down(move |mouse| {
        cv.draw_circle(mouse.x, mouse.y, 10, RED, 5);
        if let Err(err) = play_sound("click") {
            log::warn!("{err}");
        }
    });
    cv.on_mouse_move(move |mouse| {
        if mouse.down {
            cv.draw_circle(mouse.x, mouse.y, 1, BLUE, 1);
        }
    });
    cv.on_key_pressed(move |key| {
        match key.ch {
            ' ' => cv.erase(),
            ESCAPE => cv.close(),
            _ => {}
        }
        log::info!("Key: {:?}={} {} {}", key.ch, key.ch as u32, key.code, key.text);
    });

    let progress = cv.on_time_progress(1000, move |elapsed| {
        cv.draw_rect(0, 0, 30, 25, Color::new(0xAAAAAA), FILL);
        cv.draw_text(5, 17, &(elapsed / 1000).to_string(), BLACK, Some(18));
    });

    let (w, h) = (cv.width(), cv.height());
    cv.draw_rect(50, 50, w - 100, h - 100, BLACK, 10);
    cv.draw_line(0, 0, w, h, BLACK, DEFAULT_LINE_THICKNESS);
    cv.draw_line(0, h, w, 0, BLACK, DEFAULT_LINE_THICKNESS);
    cv.draw_circle(0, 0, 300, Color::new(0x7777FF), 10);
    cv.draw_arc(w / 2, h / 2, 100, 0, 90, Color::new(0x7777FF), FILL);
    cv.draw_arc(w / 2, h / 2, 50, 90, 270, Color::new(0xFF7777), 5);

    cv.on_time(10_500, move || {
        progress.stop();
        cv.erase();
    });
}
