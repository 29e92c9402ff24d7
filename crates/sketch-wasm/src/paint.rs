//! Draw ops → Canvas2D calls.

use sketch_core::{ArcSweep, DrawOp, Paint, Shape, WindowConfig};
use std::f64::consts::TAU;
use web_sys::CanvasRenderingContext2d;

/// Longest text run drawn by `fill_text`, in pixels.
pub const TEXT_MAX_WIDTH: f64 = 400.0;

/// Paint one op. The font family comes from `config` when the op changes
/// the font size.
pub(crate) fn paint_op(ctx: &CanvasRenderingContext2d, op: &DrawOp, config: &WindowConfig) {
    let css = op.color.to_css();
    let paint = op.paint();
    log::trace!("PAINT {:?} {css} {paint:?}", op.shape);

    match &op.shape {
        Shape::Circle { cx, cy, radius } => {
            ctx.begin_path();
            let _ = ctx.arc(*cx as f64, *cy as f64, *radius as f64, 0.0, TAU);
            finish_path(ctx, &css, paint);
        }

        Shape::Arc {
            cx,
            cy,
            radius,
            start_deg,
            end_deg,
        } => {
            let sweep = ArcSweep::from_degrees(*start_deg, *end_deg);
            let (x, y, r) = (*cx as f64, *cy as f64, *radius as f64);
            ctx.begin_path();
            if paint == Paint::Fill {
                ctx.move_to(x, y);
            }
            let _ = ctx.arc_with_anticlockwise(x, y, r, sweep.start, sweep.end(), sweep.anticlockwise());
            if paint == Paint::Fill {
                ctx.close_path();
            }
            finish_path(ctx, &css, paint);
        }

        Shape::Rect {
            x,
            y,
            width,
            height,
        } => {
            let (x, y, w, h) = (*x as f64, *y as f64, *width as f64, *height as f64);
            match paint {
                Paint::Fill => {
                    ctx.set_fill_style_str(&css);
                    ctx.fill_rect(x, y, w, h);
                }
                Paint::Stroke(width) => {
                    ctx.set_stroke_style_str(&css);
                    ctx.set_line_width(width as f64);
                    ctx.stroke_rect(x, y, w, h);
                }
            }
        }

        Shape::Line { x0, y0, x1, y1 } => {
            ctx.begin_path();
            ctx.move_to(*x0 as f64, *y0 as f64);
            ctx.line_to(*x1 as f64, *y1 as f64);
            finish_path(ctx, &css, paint);
        }

        Shape::Text {
            x,
            y,
            text,
            font_size,
        } => {
            if let Some(size) = font_size {
                ctx.set_font(&config.css_font(*size));
            }
            ctx.set_fill_style_str(&css);
            ctx.set_text_align("left");
            let _ = ctx.fill_text_with_max_width(text, *x as f64, *y as f64, TEXT_MAX_WIDTH);
        }
    }
}

fn finish_path(ctx: &CanvasRenderingContext2d, css: &str, paint: Paint) {
    match paint {
        Paint::Fill => {
            ctx.set_fill_style_str(css);
            ctx.fill();
        }
        Paint::Stroke(width) => {
            ctx.set_stroke_style_str(css);
            ctx.set_line_width(width as f64);
            ctx.stroke();
        }
    }
}
