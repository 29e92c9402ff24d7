//! Sketchpad demo: click to draw rings, drag to doodle, space erases,
//! `q` or Escape closes.
//!
//! Run with `RUST_LOG=debug cargo run -p sketch-desktop --example demo`.

use sketch_desktop::*;

fn main() -> Result<()> {
    env_logger::init();

    Window::new()
        .on_start(|| {
            let cv = Canvas::new(600, 400, CYAN);
            if let Err(err) = load_sounds(&["click"]) {
                log::warn!("{err}");
            }

            cv.on_mouse_down(move |mouse| {
                cv.draw_circle(mouse.x, mouse.y, 10, RED, 5);
                let _ = play_sound("click");
            });
            cv.on_mouse_move(move |mouse| {
                if mouse.down {
                    cv.draw_circle(mouse.x, mouse.y, 1, BLUE, 1);
                }
            });
            cv.on_key_pressed(move |key| {
                match key.ch {
                    ' ' => cv.erase(),
                    'q' | 'Q' | ESCAPE => cv.close(),
                    _ => {}
                }
                println!("Key: {:?}={} {} {}", key.ch, key.ch as u32, key.code, key.text);
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

            on_finish(|| log::info!("bye"));
        })
        .run()
}
