//! Vello painter for the desktop backend.
//!
//! Turns [`sketch_core::DrawOp`]s into retained per-canvas scenes and lays
//! canvases out inside the window.

pub mod layer;
pub mod layout;
pub mod paint;
pub mod text;

pub use layer::{Layer, compose};
pub use layout::{Arrangement, Placement, flow_layout, hit_test};
pub use paint::{paint_op, to_peniko};
pub use text::GlyphFont;
