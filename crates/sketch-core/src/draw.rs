//! Draw operations and the `Draw` trait shared by every backend.
//!
//! A backend only has to accept [`DrawOp`] values through [`Draw::submit`];
//! the shape-specific entry points (`draw_circle`, `draw_rect`, ...) are
//! provided on top of it.

use crate::color::Color;

/// Thickness value meaning "fill the shape instead of stroking it".
pub const FILL: u32 = 0;
pub const DEFAULT_LINE_THICKNESS: u32 = 3;
/// Default end angle of `draw_arc`: a full turn.
pub const FULL_TURN: i32 = 360;
pub const DEFAULT_FONT_SIZE: u32 = 32;
pub const DEFAULT_FONT_FAMILY: &str = "verdana";

/// Geometry of a single draw call, in integer canvas pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Circle {
        cx: i32,
        cy: i32,
        radius: i32,
    },
    /// Angles in degrees, counter-clockwise from 3 o'clock as seen on screen.
    Arc {
        cx: i32,
        cy: i32,
        radius: i32,
        start_deg: i32,
        end_deg: i32,
    },
    Rect {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    Line {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
    },
    /// `y` is the text baseline.
    Text {
        x: i32,
        y: i32,
        text: String,
        font_size: Option<u32>,
    },
}

/// How a shape is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Fill,
    /// Stroke width in pixels, at least 1.
    Stroke(u32),
}

/// One drawing call: shape, color and thickness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOp {
    pub shape: Shape,
    pub color: Color,
    pub thickness: u32,
}

impl DrawOp {
    pub fn new(shape: Shape, color: Color, thickness: u32) -> Self {
        Self {
            shape,
            color,
            thickness,
        }
    }

    /// Lines are always stroked (thickness 0 is a hairline), text is always
    /// filled, everything else fills at thickness 0.
    pub fn paint(&self) -> Paint {
        match self.shape {
            Shape::Line { .. } => Paint::Stroke(self.thickness.max(1)),
            Shape::Text { .. } => Paint::Fill,
            _ if self.thickness == FILL => Paint::Fill,
            _ => Paint::Stroke(self.thickness),
        }
    }

    /// `true` for an opaque fill covering the whole `width` x `height` area.
    pub fn covers(&self, width: i32, height: i32) -> bool {
        match self.shape {
            Shape::Rect {
                x,
                y,
                width: w,
                height: h,
            } => {
                self.paint() == Paint::Fill
                    && x <= 0
                    && y <= 0
                    && x.saturating_add(w) >= width
                    && y.saturating_add(h) >= height
            }
            _ => false,
        }
    }
}

/// Arc angles converted to the y-down, clockwise-positive radians used by
/// both 2D backends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSweep {
    pub start: f64,
    pub sweep: f64,
}

impl ArcSweep {
    pub fn from_degrees(start_deg: i32, end_deg: i32) -> Self {
        let start = -(start_deg as f64).to_radians();
        let sweep = -((end_deg as f64) - (start_deg as f64)).to_radians();
        Self { start, sweep }
    }

    pub fn end(&self) -> f64 {
        self.start + self.sweep
    }

    /// Direction flag for APIs taking `(start, end, anticlockwise)`.
    pub fn anticlockwise(&self) -> bool {
        self.sweep < 0.0
    }
}

/// The drawing surface of a canvas.
///
/// Receivers are `&self`: canvas handles are shared between the caller and
/// the handlers it registers, so backends keep their state behind interior
/// mutability.
pub trait Draw {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    fn background(&self) -> Color;

    /// Render one operation.
    fn submit(&self, op: DrawOp);

    /// Paint the whole canvas with its background color.
    fn erase(&self) {
        let shape = Shape::Rect {
            x: 0,
            y: 0,
            width: self.width(),
            height: self.height(),
        };
        self.submit(DrawOp::new(shape, self.background(), FILL));
    }

    /// A solid disc when `thickness` is [`FILL`], else a circumference.
    fn draw_circle(&self, cx: i32, cy: i32, radius: i32, color: Color, thickness: u32) {
        self.submit(DrawOp::new(Shape::Circle { cx, cy, radius }, color, thickness));
    }

    /// A pie slice when `thickness` is [`FILL`], else an arc. Pass
    /// [`FULL_TURN`] as `end_deg` for the default end.
    #[allow(clippy::too_many_arguments)]
    fn draw_arc(
        &self,
        cx: i32,
        cy: i32,
        radius: i32,
        start_deg: i32,
        end_deg: i32,
        color: Color,
        thickness: u32,
    ) {
        let shape = Shape::Arc {
            cx,
            cy,
            radius,
            start_deg,
            end_deg,
        };
        self.submit(DrawOp::new(shape, color, thickness));
    }

    fn draw_rect(&self, x: i32, y: i32, width: i32, height: i32, color: Color, thickness: u32) {
        let shape = Shape::Rect {
            x,
            y,
            width,
            height,
        };
        self.submit(DrawOp::new(shape, color, thickness));
    }

    /// Text with its baseline at `y`. `Some(font_size)` changes the canvas
    /// font size for this and later calls.
    fn draw_text(&self, x: i32, y: i32, text: &str, color: Color, font_size: Option<u32>) {
        let shape = Shape::Text {
            x,
            y,
            text: text.to_string(),
            font_size,
        };
        self.submit(DrawOp::new(shape, color, FILL));
    }

    fn draw_line(&self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color, thickness: u32) {
        self.submit(DrawOp::new(Shape::Line { x0, y0, x1, y1 }, color, thickness));
    }
}

/// Free-function form of [`Draw::erase`].
pub fn erase(canvas: &impl Draw) {
    canvas.erase();
}
