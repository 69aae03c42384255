//! Event registration and synchronous dispatch
//!
//! Key principles:
//! - Registration system (only notify handlers interested in an event type)
//! - Handlers are invoked immediately, in registration order
//! - Every registration yields a [`HandlerId`] that can later remove it
//!
//! Dispatch happens on the caller's thread inside the frame callback that
//! raised the event, so there is no queue and no locking.

use crate::ecs::Entity;
use std::collections::HashMap;
use std::hash::Hash;

/// Identifies one registered handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

/// Event handler trait
///
/// `source` is the entity whose component raised the event.
pub trait EventHandler<E>: Send + Sync {
    /// Handle an event
    fn on_event(&mut self, source: Entity, event: &E);
}

impl<E, F> EventHandler<E> for F
where
    F: FnMut(Entity, &E) + Send + Sync,
{
    fn on_event(&mut self, source: Entity, event: &E) {
        self(source, event);
    }
}

/// Multicast dispatcher keyed by event type
pub struct EventDispatcher<K, E> {
    handlers: HashMap<K, Vec<(HandlerId, Box<dyn EventHandler<E>>)>>,
    next_id: u64,
}

impl<K: Copy + Eq + Hash, E> EventDispatcher<K, E> {
    /// Create a new dispatcher with no handlers
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            next_id: 0,
        }
    }

    /// Register a handler for a specific event type
    pub fn register_handler(&mut self, event_type: K, handler: Box<dyn EventHandler<E>>) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers.entry(event_type).or_default().push((id, handler));
        id
    }

    /// Remove a handler wherever it is registered
    ///
    /// Returns `false` when the id is unknown (e.g. already removed).
    pub fn unregister_handler(&mut self, id: HandlerId) -> bool {
        for handlers in self.handlers.values_mut() {
            if let Some(index) = handlers.iter().position(|(handler_id, _)| *handler_id == id) {
                handlers.remove(index);
                return true;
            }
        }
        false
    }

    /// Number of handlers registered for an event type
    pub fn handler_count(&self, event_type: K) -> usize {
        self.handlers.get(&event_type).map_or(0, Vec::len)
    }

    /// Invoke every handler registered for `event_type`
    ///
    /// Returns how many handlers ran; zero when nobody listens.
    pub fn dispatch(&mut self, event_type: K, source: Entity, event: &E) -> usize {
        match self.handlers.get_mut(&event_type) {
            Some(handlers) => {
                for (_, handler) in handlers.iter_mut() {
                    handler.on_event(source, event);
                }
                handlers.len()
            }
            None => 0,
        }
    }
}

impl<K: Copy + Eq + Hash, E> Default for EventDispatcher<K, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: std::fmt::Debug, E> std::fmt::Debug for EventDispatcher<K, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: Vec<(&K, usize)> = self.handlers.iter().map(|(k, v)| (k, v.len())).collect();
        f.debug_struct("EventDispatcher").field("handlers", &counts).finish()
    }
}
