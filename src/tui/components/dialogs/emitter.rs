//! Event emission capability shared by dialogs and overlays
//!
//! Components own an [`Emitter`] and expose it through the [`Emits`] trait
//! rather than inheriting subscribe/emit behaviour.

use tokio::sync::mpsc;

/// Handle returned by [`Emitter::on`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Returns false once the listener has nowhere to deliver to
type Handler<E> = Box<dyn FnMut(&E) -> bool>;

struct Listener<E> {
    id: ListenerId,
    once: bool,
    handler: Handler<E>,
}

/// Single-threaded list of event listeners
pub struct Emitter<E> {
    listeners: Vec<Listener<E>>,
    next_id: u64,
}

impl<E> Emitter<E> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    fn push(&mut self, once: bool, handler: Handler<E>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener { id, once, handler });
        id
    }

    /// Register a listener for every emitted event
    pub fn on(&mut self, mut handler: impl FnMut(&E) + 'static) -> ListenerId {
        self.push(false, Box::new(move |event: &E| {
            handler(event);
            true
        }))
    }

    /// Register a listener that stays subscribed while it returns true
    pub fn on_while(&mut self, handler: impl FnMut(&E) -> bool + 'static) -> ListenerId {
        self.push(false, Box::new(handler))
    }

    /// Register a listener that is dropped after its first call
    pub fn once(&mut self, mut handler: impl FnMut(&E) + 'static) -> ListenerId {
        self.push(true, Box::new(move |event: &E| {
            handler(event);
            false
        }))
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|listener| listener.id != id);
        self.listeners.len() != before
    }

    /// Call every listener in registration order, dropping the ones that
    /// are done
    pub fn emit(&mut self, event: &E) {
        self.listeners
            .retain_mut(|listener| (listener.handler)(event) && !listener.once);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<E: Clone + 'static> Emitter<E> {
    /// Forward every event into an unbounded channel. The listener goes away
    /// with the first event emitted after the receiver is dropped.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<E> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.on_while(move |event: &E| sender.send(event.clone()).is_ok());
        receiver
    }
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Components that emit events of type `E`
pub trait Emits<E: Clone + 'static> {
    /// Access the owned emitter
    fn emitter(&mut self) -> &mut Emitter<E>;

    fn on(&mut self, handler: impl FnMut(&E) + 'static) -> ListenerId
    where
        Self: Sized,
    {
        self.emitter().on(handler)
    }

    fn once(&mut self, handler: impl FnMut(&E) + 'static) -> ListenerId
    where
        Self: Sized,
    {
        self.emitter().once(handler)
    }

    fn on_while(&mut self, handler: impl FnMut(&E) -> bool + 'static) -> ListenerId
    where
        Self: Sized,
    {
        self.emitter().on_while(handler)
    }

    fn off(&mut self, id: ListenerId) -> bool {
        self.emitter().off(id)
    }

    fn subscribe(&mut self) -> mpsc::UnboundedReceiver<E> {
        self.emitter().subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_on_and_off() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut emitter = Emitter::new();

        let sink = seen.clone();
        let id = emitter.on(move |n: &u32| sink.borrow_mut().push(*n));
        emitter.emit(&1);
        assert!(emitter.off(id));
        assert!(!emitter.off(id));
        emitter.emit(&2);

        assert_eq!(*seen.borrow(), vec![1]);
    }

    #[test]
    fn test_once_fires_once() {
        let count = Rc::new(RefCell::new(0));
        let mut emitter = Emitter::new();
        let c = count.clone();
        emitter.once(move |_: &()| *c.borrow_mut() += 1);

        emitter.emit(&());
        emitter.emit(&());

        assert_eq!(*count.borrow(), 1);
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn test_dropped_receivers_are_pruned() {
        let mut emitter = Emitter::new();
        for _ in 0..3 {
            drop(emitter.subscribe());
        }
        let live = emitter.subscribe();
        assert_eq!(emitter.listener_count(), 4);

        emitter.emit(&1u32);
        assert_eq!(emitter.listener_count(), 1);
        drop(live);
        emitter.emit(&2u32);
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn test_on_while_stops_on_false() {
        let calls = Rc::new(RefCell::new(0));
        let mut emitter = Emitter::new();
        let c = calls.clone();
        emitter.on_while(move |_: &()| {
            *c.borrow_mut() += 1;
            *c.borrow() < 2
        });
        for _ in 0..4 {
            emitter.emit(&());
        }
        assert_eq!(*calls.borrow(), 2);
    }

    #[test]
    fn test_subscribe_forwards() {
        let mut emitter = Emitter::new();
        let mut rx = emitter.subscribe();
        emitter.emit(&"show".to_string());
        assert_eq!(rx.try_recv().unwrap(), "show");
        assert!(rx.try_recv().is_err());
    }
}
