//! Retained per-canvas drawing.
//!
//! A desktop canvas keeps everything drawn since its last full-cover fill
//! in a Vello scene; the window composes all layers every frame.

use crate::layout::Placement;
use crate::paint::paint_op;
use crate::text::GlyphFont;
use kurbo::{Affine, Rect};
use peniko::Mix;
use sketch_core::{DrawOp, Shape};
use vello::Scene;

pub struct Layer {
    width: i32,
    height: i32,
    scene: Scene,
    font_size: u32,
    ops: usize,
}

impl Layer {
    pub fn new(width: i32, height: i32, font_size: u32) -> Self {
        Self {
            width,
            height,
            scene: Scene::new(),
            font_size,
            ops: 0,
        }
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    /// Ops retained since the last full-cover fill (including it).
    pub fn op_count(&self) -> usize {
        self.ops
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn apply(&mut self, op: &DrawOp, font: Option<&GlyphFont>) {
        if op.covers(self.width, self.height) {
            self.scene.reset();
            self.ops = 0;
        }
        if let Shape::Text {
            font_size: Some(size),
            ..
        } = op.shape
        {
            self.font_size = size;
        }
        log::trace!("PAINT {:?} {:?} t={}", op.shape, op.color, op.thickness);
        paint_op(&mut self.scene, op, self.font_size, font);
        self.ops += 1;
    }
}

/// Append every layer at its placement, clipped to its own bounds and
/// scaled from logical to physical pixels.
pub fn compose<'a>(target: &mut Scene, layers: impl IntoIterator<Item = (&'a Layer, Placement)>, scale: f64) {
    for (layer, at) in layers {
        let transform = Affine::scale(scale) * Affine::translate((at.x, at.y));
        let clip = Rect::new(0.0, 0.0, at.width, at.height);
        target.push_layer(Mix::Clip, 1.0, transform, &clip);
        target.append(layer.scene(), Some(transform));
        target.pop_layer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sketch_core::{BLACK, CYAN, DrawOp, FILL, Shape};

    fn rect(x: i32, y: i32, w: i32, h: i32, thickness: u32) -> DrawOp {
        DrawOp::new(
            Shape::Rect {
                x,
                y,
                width: w,
                height: h,
            },
            CYAN,
            thickness,
        )
    }

    #[test]
    fn full_cover_fill_discards_history() {
        let mut layer = Layer::new(600, 400, 32);
        layer.apply(&rect(0, 0, 600, 400, FILL), None);
        layer.apply(&rect(50, 50, 500, 300, 10), None);
        layer.apply(&rect(0, 0, 30, 25, FILL), None);
        assert_eq!(layer.op_count(), 3);

        layer.apply(&rect(0, 0, 600, 400, FILL), None);
        assert_eq!(layer.op_count(), 1);
        assert!(!layer.scene().encoding().is_empty());
    }

    #[test]
    fn text_font_size_persists() {
        let mut layer = Layer::new(100, 100, 32);
        let text = |size| {
            DrawOp::new(
                Shape::Text {
                    x: 5,
                    y: 17,
                    text: "1".into(),
                    font_size: size,
                },
                BLACK,
                FILL,
            )
        };
        layer.apply(&text(Some(18)), None);
        assert_eq!(layer.font_size(), 18);
        layer.apply(&text(None), None);
        assert_eq!(layer.font_size(), 18);
    }

    #[test]
    fn compose_appends_each_layer() {
        let mut a = Layer::new(10, 10, 32);
        a.apply(&rect(0, 0, 10, 10, FILL), None);
        let b = Layer::new(10, 10, 32);
        let mut target = Scene::new();
        let at = |x| Placement {
            x,
            y: 5.0,
            width: 10.0,
            height: 10.0,
        };
        compose(&mut target, [(&a, at(5.0)), (&b, at(20.0))], 1.0);
        assert!(!target.encoding().is_empty());
    }
}
