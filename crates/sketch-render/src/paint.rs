//! Draw ops → Vello drawing commands.
//!
//! Each canvas call becomes one fill or stroke on a `vello::Scene`.
//! Rasterization and anti-aliasing are left to Vello.

use crate::text::GlyphFont;
use kurbo::{Affine, Arc, Cap, Circle, CircleSegment, Join, Line, Point, Rect, Stroke, Vec2};
use peniko::{Color, Fill};
use sketch_core::{ArcSweep, DrawOp, Paint, Shape};
use vello::Scene;

/// Paint one op into `scene`. `font_size` is the canvas' current font size
/// (already updated for this op); text is skipped when no font is loaded.
pub fn paint_op(scene: &mut Scene, op: &DrawOp, font_size: u32, font: Option<&GlyphFont>) {
    let color = to_peniko(op.color);
    let paint = op.paint();

    match &op.shape {
        Shape::Circle { cx, cy, radius } => {
            let shape = Circle::new(point(*cx, *cy), *radius as f64);
            draw_shape(scene, &shape, color, paint);
        }

        Shape::Arc {
            cx,
            cy,
            radius,
            start_deg,
            end_deg,
        } => {
            let sweep = ArcSweep::from_degrees(*start_deg, *end_deg);
            let center = point(*cx, *cy);
            let r = *radius as f64;
            match paint {
                Paint::Fill => {
                    let pie = CircleSegment::new(center, r, 0.0, sweep.start, sweep.sweep);
                    draw_shape(scene, &pie, color, paint);
                }
                Paint::Stroke(_) => {
                    let arc = Arc {
                        center,
                        radii: Vec2::new(r, r),
                        start_angle: sweep.start,
                        sweep_angle: sweep.sweep,
                        x_rotation: 0.0,
                    };
                    draw_shape(scene, &arc, color, paint);
                }
            }
        }

        Shape::Rect {
            x,
            y,
            width,
            height,
        } => {
            let shape = Rect::new(
                *x as f64,
                *y as f64,
                (*x as f64) + (*width as f64),
                (*y as f64) + (*height as f64),
            );
            draw_shape(scene, &shape, color, paint);
        }

        Shape::Line { x0, y0, x1, y1 } => {
            let shape = Line::new(point(*x0, *y0), point(*x1, *y1));
            draw_shape(scene, &shape, color, paint);
        }

        Shape::Text { x, y, text, .. } => match font {
            Some(font) => font.draw(scene, point(*x, *y), text, font_size as f32, color),
            None => log::trace!("TEXT {text:?} at ({x}, {y}) skipped: no font loaded"),
        },
    }
}

// ─── Fill and stroke ─────────────────────────────────────────────────────────

fn draw_shape<S: kurbo::Shape>(scene: &mut Scene, shape: &S, color: Color, paint: Paint) {
    match paint {
        Paint::Fill => scene.fill(Fill::NonZero, Affine::IDENTITY, color, None, shape),
        Paint::Stroke(width) => {
            scene.stroke(&stroke_style(width), Affine::IDENTITY, color, None, shape)
        }
    }
}

/// Square caps and miter joins, matching the usual desktop 2D stroke defaults.
pub fn stroke_style(width: u32) -> Stroke {
    Stroke::new(width.max(1) as f64)
        .with_caps(Cap::Square)
        .with_join(Join::Miter)
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

pub fn to_peniko(color: sketch_core::Color) -> Color {
    Color::from_rgb8(color.red(), color.green(), color.blue())
}

fn point(x: i32, y: i32) -> Point {
    Point::new(x as f64, y as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketch_core::{BLACK, FILL, RED};

    fn op(shape: Shape, thickness: u32) -> DrawOp {
        DrawOp::new(shape, RED, thickness)
    }

    #[test]
    fn every_shape_encodes_something() {
        let shapes = [
            Shape::Circle {
                cx: 10,
                cy: 10,
                radius: 5,
            },
            Shape::Arc {
                cx: 300,
                cy: 200,
                radius: 100,
                start_deg: 0,
                end_deg: 90,
            },
            Shape::Rect {
                x: 50,
                y: 50,
                width: 500,
                height: 300,
            },
            Shape::Line {
                x0: 0,
                y0: 0,
                x1: 600,
                y1: 400,
            },
        ];
        for shape in shapes {
            for thickness in [FILL, 5] {
                let mut scene = Scene::new();
                paint_op(&mut scene, &op(shape.clone(), thickness), 32, None);
                assert!(!scene.encoding().is_empty(), "{shape:?} / {thickness}");
            }
        }
    }

    #[test]
    fn text_without_font_is_skipped() {
        let mut scene = Scene::new();
        let text = Shape::Text {
            x: 5,
            y: 17,
            text: "10".into(),
            font_size: Some(18),
        };
        paint_op(&mut scene, &DrawOp::new(text, BLACK, FILL), 18, None);
        assert!(scene.encoding().is_empty());
    }

    #[test]
    fn stroke_width_has_a_floor() {
        assert_eq!(stroke_style(0).width, 1.0);
        assert_eq!(stroke_style(10).width, 10.0);
        assert_eq!(stroke_style(3).start_cap, Cap::Square);
    }

    #[test]
    fn colors_keep_channels() {
        let c = to_peniko(sketch_core::Color::new(0x7777FF));
        assert_eq!(c.components, Color::from_rgb8(0x77, 0x77, 0xFF).components);
        assert_eq!(c.components[3], 1.0);
    }
}
