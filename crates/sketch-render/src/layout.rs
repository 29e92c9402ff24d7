//! Flow layout of canvases inside the window, and pointer hit testing.
//!
//! Canvases sit left to right in creation order, vertically centered in a
//! single row, with a fixed gap around and between them. The window is
//! always sized to fit, so the row never wraps.

/// Where one canvas lands, in logical window pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Placement {
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    /// Window position → canvas-local integer pixels.
    pub fn to_local(&self, px: f64, py: f64) -> (i32, i32) {
        ((px - self.x).floor() as i32, (py - self.y).floor() as i32)
    }
}

/// Result of laying out a row of canvases.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrangement {
    pub placements: Vec<Placement>,
    pub width: f64,
    pub height: f64,
}

pub fn flow_layout(sizes: &[(i32, i32)], gap: f64) -> Arrangement {
    let row_height = sizes.iter().map(|&(_, h)| h.max(0) as f64).fold(0.0, f64::max);
    let mut x = gap;
    let placements = sizes
        .iter()
        .map(|&(w, h)| {
            let (w, h) = (w.max(0) as f64, h.max(0) as f64);
            let at = Placement {
                x,
                y: gap + ((row_height - h) / 2.0).floor(),
                width: w,
                height: h,
            };
            x += w + gap;
            at
        })
        .collect();
    Arrangement {
        placements,
        width: x,
        height: row_height + 2.0 * gap,
    }
}

/// Index of the canvas under (px, py) and the point in its local pixels.
/// Returns `None` over the gaps.
pub fn hit_test(placements: &[Placement], px: f64, py: f64) -> Option<(usize, i32, i32)> {
    // Later canvases are painted last, so check them first
    placements
        .iter()
        .enumerate()
        .rev()
        .find(|(_, p)| p.contains(px, py))
        .map(|(i, p)| {
            let (x, y) = p.to_local(px, py);
            (i, x, y)
        })
}
