//! # Event Bus
//!
//! Plain value events dispatched by type: any `'static` type is an event,
//! listeners subscribe per type and receive a shared reference during
//! [`send`](EventBus::send). Events are not queued; sending dispatches
//! synchronously to every listener for that type, in subscription order.

use std::any::{Any, TypeId};

/// Identifies a subscription so it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u32);

struct Listener {
    id: ListenerId,
    event_type: TypeId,
    callback: Box<dyn FnMut(&dyn Any)>,
}

#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
    next_id: u32,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to every event of type `E`.
    pub fn on<E: 'static>(&mut self, mut handler: impl FnMut(&E) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            event_type: TypeId::of::<E>(),
            callback: Box::new(move |event| {
                if let Some(event) = event.downcast_ref::<E>() {
                    handler(event);
                }
            }),
        });
        id
    }

    /// Remove a subscription. Returns whether it existed.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    /// Dispatch an event to every listener subscribed to its type.
    pub fn send<E: 'static>(&mut self, event: E) {
        let event_type = TypeId::of::<E>();
        for listener in &mut self.listeners {
            if listener.event_type == event_type {
                (listener.callback)(&event);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, PartialEq)]
    struct Scored(u32);

    struct Paused;

    #[test]
    fn listeners_only_see_their_event_type() {
        let mut bus = EventBus::new();
        let scores = Rc::new(RefCell::new(Vec::new()));
        let pauses = Rc::new(RefCell::new(0));

        let scores_seen = scores.clone();
        bus.on(move |event: &Scored| scores_seen.borrow_mut().push(event.0));
        let pauses_seen = pauses.clone();
        bus.on(move |_: &Paused| *pauses_seen.borrow_mut() += 1);

        bus.send(Scored(10));
        bus.send(Paused);
        bus.send(Scored(25));

        assert_eq!(*scores.borrow(), vec![10, 25]);
        assert_eq!(*pauses.borrow(), 1);
    }

    #[test]
    fn listeners_run_in_subscription_order() {
        let mut bus = EventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let first = order.clone();
        bus.on(move |_: &Paused| first.borrow_mut().push("first"));
        let second = order.clone();
        bus.on(move |_: &Paused| second.borrow_mut().push("second"));

        bus.send(Paused);
        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn removed_listeners_stop_receiving() {
        let mut bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));

        let seen = count.clone();
        let id = bus.on(move |_: &Paused| *seen.borrow_mut() += 1);

        bus.send(Paused);
        assert!(bus.off(id));
        bus.send(Paused);

        assert_eq!(*count.borrow(), 1);
        assert!(!bus.off(id));
    }
}
