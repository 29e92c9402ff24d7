//! Integration tests: registry + timer queue + handler slots working
//! together the way a backend drives them.

use pretty_assertions::assert_eq;
use sketch_core::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Default)]
struct Host {
    registry: Registry<u32>,
    timers: TimerQueue<u32>,
    detached: Vec<u32>,
    window_closed: bool,
}

impl Host {
    fn close(&mut self, id: u32) {
        let outcome = self.registry.close(id);
        if outcome.stops_timers() {
            self.timers.cancel_owner(id);
        }
        if outcome.detaches() {
            self.detached.push(id);
        }
        if outcome == CloseOutcome::DetachLast {
            self.window_closed = true;
            if let Some(fx) = self.registry.take_on_finish() {
                fx();
            }
        }
    }

    fn close_window(&mut self) {
        if let Some(fx) = self.registry.take_on_finish() {
            fx();
        }
        for id in self.registry.begin_closing() {
            self.close(id);
        }
        self.registry.clear();
        self.window_closed = true;
    }
}

fn finish_counter(host: &mut Host) -> Rc<Cell<u32>> {
    let finished = Rc::new(Cell::new(0));
    let f = finished.clone();
    host.registry.set_on_finish(Box::new(move || f.set(f.get() + 1)));
    finished
}

#[test]
fn closing_canvases_one_by_one_closes_window_at_the_end() {
    let t0 = Instant::now();
    let mut host = Host::default();
    let finished = finish_counter(&mut host);
    host.registry.register(1);
    host.registry.register(2);
    host.timers.every(1, Duration::from_millis(1000), t0, Box::new(|_: u64| {}));
    host.timers.after(2, Duration::from_millis(500), t0, Box::new(|| {}));

    host.close(1);
    assert_eq!(host.timers.count_owner(1), 0);
    assert_eq!(host.timers.count_owner(2), 1);
    assert!(!host.window_closed);

    host.close(2);
    assert!(host.window_closed);
    assert!(host.timers.is_empty());
    assert_eq!(host.detached, vec![1, 2]);
    assert_eq!(finished.get(), 1);

    host.close(2);
    assert_eq!(finished.get(), 1);
}

#[test]
fn window_close_stops_everything_without_detaching() {
    let t0 = Instant::now();
    let mut host = Host::default();
    let finished = finish_counter(&mut host);
    for id in 1..=3 {
        host.registry.register(id);
        host.timers.every(id, Duration::from_millis(100), t0, Box::new(|_: u64| {}));
    }

    host.close_window();
    assert!(host.timers.is_empty());
    assert!(host.detached.is_empty());
    assert!(host.registry.is_empty());
    assert_eq!(finished.get(), 1);
}

#[test]
fn handler_can_replace_itself_while_running() {
    let slot: Rc<RefCell<HandlerSlot<MouseEvent>>> = Rc::new(RefCell::new(HandlerSlot::new()));
    let log = Rc::new(RefCell::new(Vec::new()));

    let (s, l) = (slot.clone(), log.clone());
    let _ = slot.borrow_mut().set(Some(Box::new(move |e: MouseEvent| {
        l.borrow_mut().push(format!("first {}", e.x));
        let l2 = l.clone();
        let _ = s.borrow_mut().set(Some(Box::new(move |e: MouseEvent| {
            l2.borrow_mut().push(format!("second {}", e.x));
        })));
    })));

    for x in [1, 2] {
        let lease = slot.borrow_mut().take();
        if let Some(mut lease) = lease {
            lease.call(MouseEvent::new(x, 0, true));
            let _ = slot.borrow_mut().restore(lease);
        }
    }
    assert_eq!(*log.borrow(), vec!["first 1".to_string(), "second 2".to_string()]);
}

#[test]
fn timer_stopping_itself_from_its_handler() {
    let t0 = Instant::now();
    let queue: Rc<RefCell<TimerQueue<u32>>> = Rc::new(RefCell::new(TimerQueue::new()));
    let ticks = Rc::new(Cell::new(0));
    let own_id = Rc::new(Cell::new(None));

    let (q, t, own) = (queue.clone(), ticks.clone(), own_id.clone());
    let id = queue.borrow_mut().every(
        1,
        Duration::from_millis(10),
        t0,
        Box::new(move |_: u64| {
            t.set(t.get() + 1);
            if let Some(id) = own.get() {
                let cancelled = q.borrow_mut().cancel(id);
                assert!(cancelled.is_some());
            }
        }),
    );
    own_id.set(Some(id));

    for step in 1..=3 {
        let now = t0 + Duration::from_millis(10 * step);
        let fired = queue.borrow_mut().pop_due(now);
        if let Some(Fired::Periodic {
            id,
            elapsed_ms,
            mut handler,
        }) = fired
        {
            handler(elapsed_ms);
            let stale = queue.borrow_mut().restore(id, handler).err();
            drop(stale);
        }
    }
    assert_eq!(ticks.get(), 1);
    assert!(queue.borrow().is_empty());
}
