//! Session listener registry.

use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::error;

use crate::backend::{SessionListener, Subscription};
use crate::models::Session;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: BTreeMap<u64, SessionListener>,
}

/// Listeners keyed by a monotonically increasing id, so iteration order is
/// registration order.
#[derive(Clone, Default)]
pub(crate) struct SessionListeners {
    inner: Arc<Mutex<Registry>>,
}

impl SessionListeners {
    /// Add `listener` and return a handle that removes it.
    pub(crate) fn register(&self, listener: SessionListener) -> Subscription {
        let id = {
            let mut registry = self.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.listeners.insert(id, listener);
            id
        };

        let registry: Weak<Mutex<Registry>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .listeners
                    .remove(&id);
            }
        })
    }

    /// Call every registered listener with `session`.
    ///
    /// The lock is released before any listener runs.
    pub(crate) fn notify(&self, session: Option<&Session>) {
        let listeners: Vec<SessionListener> = self.lock().listeners.values().cloned().collect();
        for listener in listeners {
            invoke(&listener, session);
        }
    }

    /// Number of registered listeners.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Run one listener, containing any panic it raises.
pub(crate) fn invoke(listener: &SessionListener, session: Option<&Session>) {
    if catch_unwind(AssertUnwindSafe(|| listener(session))).is_err() {
        error!("Session listener panicked");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting(counter: &Arc<AtomicUsize>) -> SessionListener {
        let counter = Arc::clone(counter);
        Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_notify_in_registration_order() {
        let listeners = SessionListeners::default();
        let order = Arc::new(Mutex::new(Vec::new()));

        for n in 0..3 {
            let order = Arc::clone(&order);
            let _sub = listeners.register(Arc::new(move |_| order.lock().unwrap().push(n)));
        }

        listeners.notify(None);
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_unsubscribed_listener_not_called() {
        let listeners = SessionListeners::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let sub = listeners.register(counting(&calls));
        sub.unsubscribe();
        listeners.notify(None);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(listeners.len(), 0);
    }

    #[test]
    fn test_panicking_listener_does_not_stop_others() {
        let listeners = SessionListeners::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let _bad = listeners.register(Arc::new(|_| panic!("listener failure")));
        let _good = listeners.register(counting(&calls));

        listeners.notify(None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_after_registry_dropped() {
        let listeners = SessionListeners::default();
        let sub = listeners.register(Arc::new(|_| {}));
        drop(listeners);
        sub.unsubscribe();
    }

    #[test]
    fn test_listener_may_unsubscribe_during_notify() {
        let listeners = SessionListeners::default();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let inner = Arc::clone(&slot);
        let sub = listeners.register(Arc::new(move |_| {
            if let Some(sub) = inner.lock().unwrap().take() {
                sub.unsubscribe();
            }
        }));
        *slot.lock().unwrap() = Some(sub);

        listeners.notify(None);
        assert_eq!(listeners.len(), 0);
    }
}
