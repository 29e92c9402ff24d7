//! Single-listener slots.
//!
//! Each canvas holds at most one handler per event kind. Registering a new
//! handler replaces the old one. Dispatch leases the handler out of its slot
//! so it can run while the canvas state is not borrowed; a lease is only
//! returned if nobody replaced or cleared the slot in the meantime.

/// A boxed event handler.
pub type Handler<E> = Box<dyn FnMut(E)>;

pub struct HandlerSlot<E> {
    handler: Option<Handler<E>>,
    generation: u64,
    leased: bool,
}

/// A handler taken out of its slot for one dispatch.
pub struct Lease<E> {
    handler: Handler<E>,
    generation: u64,
}

impl<E> Lease<E> {
    pub fn call(&mut self, event: E) {
        (self.handler)(event);
    }
}

impl<E> HandlerSlot<E> {
    pub fn new() -> Self {
        Self {
            handler: None,
            generation: 0,
            leased: false,
        }
    }

    /// Replace the handler. `None` removes it. Returns the previous
    /// handler so the caller can drop it outside any shared borrow.
    #[must_use]
    pub fn set(&mut self, handler: Option<Handler<E>>) -> Option<Handler<E>> {
        self.generation += 1;
        self.leased = false;
        std::mem::replace(&mut self.handler, handler)
    }

    #[must_use]
    pub fn clear(&mut self) -> Option<Handler<E>> {
        self.set(None)
    }

    /// A handler is registered (possibly out on lease).
    pub fn is_set(&self) -> bool {
        self.handler.is_some() || self.leased
    }

    pub fn take(&mut self) -> Option<Lease<E>> {
        let handler = self.handler.take()?;
        self.leased = true;
        Some(Lease {
            handler,
            generation: self.generation,
        })
    }

    /// Put a leased handler back. Hands the lease back when the slot
    /// changed while it was out; the caller drops it.
    pub fn restore(&mut self, lease: Lease<E>) -> Result<(), Lease<E>> {
        if lease.generation != self.generation || self.handler.is_some() {
            return Err(lease);
        }
        self.handler = Some(lease.handler);
        self.leased = false;
        Ok(())
    }
}

impl<E> Default for HandlerSlot<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn replacing_drops_previous_handler() {
        let hits = Rc::new(Cell::new(0));
        let mut slot: HandlerSlot<i32> = HandlerSlot::new();

        let h = hits.clone();
        let _ = slot.set(Some(Box::new(move |n: i32| h.set(h.get() + n))));
        let h = hits.clone();
        let old = slot.set(Some(Box::new(move |n: i32| h.set(h.get() + 10 * n))));
        assert!(old.is_some());
        drop(old);
        assert_eq!(Rc::strong_count(&hits), 2);

        let mut lease = slot.take().unwrap();
        lease.call(1);
        assert!(slot.restore(lease).is_ok());
        assert_eq!(hits.get(), 10);
    }

    #[test]
    fn lease_is_not_restored_over_replacement() {
        let mut slot: HandlerSlot<()> = HandlerSlot::new();
        let _ = slot.set(Some(Box::new(|_: ()| {})));

        let lease = slot.take().unwrap();
        assert!(slot.is_set());
        assert!(slot.set(Some(Box::new(|_: ()| {}))).is_none());
        assert!(slot.restore(lease).is_err());
        assert!(slot.is_set());
    }

    #[test]
    fn lease_is_not_restored_after_clear() {
        let mut slot: HandlerSlot<()> = HandlerSlot::new();
        let _ = slot.set(Some(Box::new(|_: ()| {})));
        let lease = slot.take().unwrap();
        assert!(slot.clear().is_none());
        assert!(slot.restore(lease).is_err());
        assert!(!slot.is_set());
        assert!(slot.take().is_none());
    }
}
