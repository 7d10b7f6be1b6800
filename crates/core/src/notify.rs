//! Event fan-out to registered handlers.

use crate::id::SubscriptionId;
use std::fmt;
use std::sync::Arc;

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// A list of handlers interested in events of type `E`.
///
/// Handlers run synchronously, in the order they subscribed.
pub struct Notifier<E> {
    handlers: Vec<(SubscriptionId, Handler<E>)>,
}

impl<E> Notifier<E> {
    /// Create an empty notifier.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register a handler.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers.push((id, Arc::new(handler)));
        id
    }

    /// Remove a handler. Returns `false` if it was not registered here.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sid, _)| *sid != id);
        self.handlers.len() != before
    }

    /// Deliver an event to every handler. Returns how many were called.
    pub fn notify(&self, event: &E) -> usize {
        for (_, handler) in &self.handlers {
            handler(event);
        }
        self.handlers.len()
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// No handlers registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<E> Default for Notifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Notifier<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_notify_in_subscription_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut notifier = Notifier::<u32>::new();

        let s = seen.clone();
        notifier.subscribe(move |e| s.lock().unwrap().push(("first", *e)));
        let s = seen.clone();
        notifier.subscribe(move |e| s.lock().unwrap().push(("second", *e)));

        assert_eq!(notifier.notify(&7), 2);
        assert_eq!(*seen.lock().unwrap(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut notifier = Notifier::<()>::new();
        let id = notifier.subscribe(|_| {});
        assert_eq!(notifier.len(), 1);

        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        assert!(notifier.is_empty());
        assert_eq!(notifier.notify(&()), 0);
    }
}
