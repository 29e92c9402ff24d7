//! Registry of open canvases and the window-close protocol.
//!
//! One registry exists per UI thread. Closing the last canvas closes the
//! window; closing the window closes every canvas. While the window is
//! closing, individual `close` calls only stop timers and leave the
//! registry alone, so the window teardown can walk a stable list.

use std::fmt;

/// What a backend must do after [`Registry::close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The canvas was not open. Nothing to do.
    NotOpen,
    /// The window is closing: stop the canvas' timers only.
    StopTimers,
    /// Stop timers and detach the canvas from the window.
    Detach,
    /// Stop timers, detach, then close the window and run the finish hook.
    DetachLast,
}

impl CloseOutcome {
    pub fn stops_timers(self) -> bool {
        !matches!(self, CloseOutcome::NotOpen)
    }

    pub fn detaches(self) -> bool {
        matches!(self, CloseOutcome::Detach | CloseOutcome::DetachLast)
    }
}

pub struct Registry<K> {
    open: Vec<K>,
    closing: bool,
    on_finish: Option<Box<dyn FnOnce()>>,
}

impl<K: Copy + PartialEq> Registry<K> {
    pub fn new() -> Self {
        Self {
            open: Vec::new(),
            closing: false,
            on_finish: None,
        }
    }

    pub fn register(&mut self, key: K) {
        if !self.open.contains(&key) {
            self.open.push(key);
        }
    }

    pub fn contains(&self, key: K) -> bool {
        self.open.contains(&key)
    }

    /// Open canvases in creation order.
    pub fn open(&self) -> &[K] {
        &self.open
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn is_closing(&self) -> bool {
        self.closing
    }

    pub fn set_on_finish(&mut self, fx: Box<dyn FnOnce()>) {
        self.on_finish = Some(fx);
    }

    pub fn has_on_finish(&self) -> bool {
        self.on_finish.is_some()
    }

    /// The finish hook, at most once.
    pub fn take_on_finish(&mut self) -> Option<Box<dyn FnOnce()>> {
        self.on_finish.take()
    }

    pub fn close(&mut self, key: K) -> CloseOutcome {
        let Some(pos) = self.open.iter().position(|k| *k == key) else {
            return CloseOutcome::NotOpen;
        };
        if self.closing {
            return CloseOutcome::StopTimers;
        }
        self.open.remove(pos);
        if self.open.is_empty() {
            CloseOutcome::DetachLast
        } else {
            CloseOutcome::Detach
        }
    }

    /// Enter the closing state. Returns the canvases still open; the caller
    /// closes each of them and then calls [`Registry::clear`].
    pub fn begin_closing(&mut self) -> Vec<K> {
        self.closing = true;
        self.open.clone()
    }

    pub fn clear(&mut self) {
        self.open.clear();
    }
}

impl<K: Copy + PartialEq> Default for Registry<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug> fmt::Debug for Registry<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("open", &self.open)
            .field("closing", &self.closing)
            .field("on_finish", &self.on_finish.is_some())
            .finish()
    }
}
