//! Platform-independent core of the Sketchpad canvas library.
//!
//! Holds everything both backends agree on: colors, input events, draw
//! operations and the [`Draw`] trait, single-listener slots, the timer
//! queue, the open-canvas registry, sound naming, configuration and errors.

pub mod color;
pub mod config;
pub mod draw;
pub mod error;
pub mod event;
pub mod handler;
pub mod registry;
pub mod sound;
pub mod timer;

pub use color::*;
pub use config::WindowConfig;
pub use draw::{
    ArcSweep, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_LINE_THICKNESS, Draw, DrawOp, FILL,
    FULL_TURN, Paint, Shape, erase,
};
pub use error::{CanvasError, Result};
pub use event::*;
pub use handler::{Handler, HandlerSlot, Lease};
pub use registry::{CloseOutcome, Registry};
pub use sound::sound_file_name;
pub use timer::{Cancelled, Fired, TimerId, TimerQueue};
