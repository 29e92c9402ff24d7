//! Deadline queue for canvas timers.
//!
//! Drives the desktop event loop: the loop sleeps until
//! [`TimerQueue::next_deadline`], then pops due timers one at a time with
//! [`TimerQueue::pop_due`], runs them without holding any borrow, and hands
//! periodic ones back with [`TimerQueue::restore`]. A timer cancelled while
//! its handler runs is simply not restored.

use std::time::{Duration, Instant};

/// Identifies one registered timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

pub type PeriodicHandler = Box<dyn FnMut(u64)>;
pub type OnceHandler = Box<dyn FnOnce()>;

enum Action {
    Periodic(PeriodicHandler),
    Once(OnceHandler),
}

struct Entry<K> {
    id: TimerId,
    owner: K,
    due: Instant,
    started: Instant,
    period: Option<Duration>,
    action: Option<Action>,
}

/// A timer popped from the queue, ready to run.
pub enum Fired {
    Periodic {
        id: TimerId,
        /// Milliseconds since the timer was registered.
        elapsed_ms: u64,
        handler: PeriodicHandler,
    },
    Once {
        id: TimerId,
        handler: OnceHandler,
    },
}

/// A timer taken out of the queue by a cancel. Owns the handler (unless it
/// was running at the time); drop it after releasing any borrow of the
/// queue, since the handler's captures may reach back into it.
pub struct Cancelled {
    pub id: TimerId,
    _handler: Option<Action>,
}

pub struct TimerQueue<K> {
    entries: Vec<Entry<K>>,
    next_id: u64,
}

/// Shortest period accepted; keeps a zero period from spinning the loop.
const MIN_PERIOD: Duration = Duration::from_millis(1);

impl<K: Copy + PartialEq> TimerQueue<K> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    fn push(&mut self, owner: K, due: Instant, now: Instant, period: Option<Duration>, action: Action) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            owner,
            due,
            started: now,
            period,
            action: Some(action),
        });
        id
    }

    /// Register a periodic timer firing every `period`.
    pub fn every(&mut self, owner: K, period: Duration, now: Instant, handler: PeriodicHandler) -> TimerId {
        let period = period.max(MIN_PERIOD);
        self.push(owner, now + period, now, Some(period), Action::Periodic(handler))
    }

    /// Register a one-shot timer firing once after `delay`.
    pub fn after(&mut self, owner: K, delay: Duration, now: Instant, handler: OnceHandler) -> TimerId {
        self.push(owner, now + delay, now, None, Action::Once(handler))
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn cancel(&mut self, id: TimerId) -> Option<Cancelled> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        Some(Self::evict(self.entries.remove(pos)))
    }

    /// Cancel every timer of `owner`.
    pub fn cancel_owner(&mut self, owner: K) -> Vec<Cancelled> {
        let (gone, kept) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| e.owner == owner);
        self.entries = kept;
        gone.into_iter().map(Self::evict).collect()
    }

    fn evict(entry: Entry<K>) -> Cancelled {
        Cancelled {
            id: entry.id,
            _handler: entry.action,
        }
    }

    pub fn count_owner(&self, owner: K) -> usize {
        self.entries.iter().filter(|e| e.owner == owner).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest deadline among timers not currently running.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries
            .iter()
            .filter(|e| e.action.is_some())
            .map(|e| e.due)
            .min()
    }

    /// Take the earliest timer due at `now`. One-shot timers leave the
    /// queue; periodic timers are re-armed one period later (skipping
    /// missed ticks) and wait for [`TimerQueue::restore`].
    pub fn pop_due(&mut self, now: Instant) -> Option<Fired> {
        let pos = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.action.is_some() && e.due <= now)
            .min_by_key(|(_, e)| e.due)
            .map(|(i, _)| i)?;

        let Some(period) = self.entries[pos].period else {
            let entry = self.entries.remove(pos);
            log::trace!("timer {} fired once", entry.id.0);
            return match entry.action {
                Some(Action::Once(handler)) => Some(Fired::Once { id: entry.id, handler }),
                _ => None,
            };
        };

        let entry = &mut self.entries[pos];
        let mut due = entry.due + period;
        if due <= now {
            due = now + period;
        }
        entry.due = due;
        let elapsed_ms = now.saturating_duration_since(entry.started).as_millis() as u64;
        log::trace!("timer {} fired at {elapsed_ms} ms", entry.id.0);
        match entry.action.take() {
            Some(Action::Periodic(handler)) => Some(Fired::Periodic {
                id: entry.id,
                elapsed_ms,
                handler,
            }),
            other => {
                entry.action = other;
                None
            }
        }
    }

    /// Return a periodic handler after it ran. Handed back when the timer
    /// was cancelled meanwhile; the caller drops it.
    pub fn restore(
        &mut self,
        id: TimerId,
        handler: PeriodicHandler,
    ) -> Result<(), PeriodicHandler> {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) if entry.action.is_none() => {
                entry.action = Some(Action::Periodic(handler));
                Ok(())
            }
            _ => Err(handler),
        }
    }
}

impl<K: Copy + PartialEq> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}
