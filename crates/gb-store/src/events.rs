//! Change notification for stores.
//!
//! Listeners run synchronously on the thread that changed the store, after
//! the change is applied and the store lock is released, so a listener may
//! read the store it is subscribed to.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use gb_core::EntityId;
use parking_lot::RwLock;

/// What changed in a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The collection was replaced wholesale.
    Replaced {
        /// New size.
        count: usize,
    },
    /// An entity was appended, or replaced under an existing id.
    Inserted(EntityId),
    /// An entity was patched.
    Updated(EntityId),
    /// An entity was removed.
    Deleted(EntityId),
    /// The collection was emptied.
    Cleared,
    /// The busy flag flipped.
    LoadingChanged(bool),
    /// The recorded error was set or cleared.
    ErrorChanged,
    /// The cache was stamped (`true`) or invalidated (`false`).
    CacheChanged {
        /// Whether the store now counts as fresh.
        fresh: bool,
    },
    /// Query, sort, filters or pagination changed. Results are not
    /// rematerialized until the next search.
    CriteriaChanged,
    /// Search results were rematerialized.
    SearchChanged {
        /// Number of results.
        total: usize,
    },
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

/// Registered listeners of one store.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: AtomicU64,
    entries: RwLock<Vec<(SubscriptionId, Listener)>>,
}

impl Listeners {
    pub(crate) fn subscribe(
        &self,
        listener: impl Fn(&StoreEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.write().push((id, Arc::new(listener)));
        id
    }

    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|(entry, _)| *entry != id);
        entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Calls every listener. The registry lock is released first, so a
    /// listener may subscribe or unsubscribe.
    pub(crate) fn emit(&self, event: &StoreEvent) {
        let snapshot: Vec<Listener> = self
            .entries
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_emit_and_unsubscribe() {
        let listeners = Listeners::default();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let id = listeners.subscribe(move |event| sink.lock().push(event.clone()));

        listeners.emit(&StoreEvent::Cleared);
        assert!(listeners.unsubscribe(id));
        assert!(!listeners.unsubscribe(id));
        listeners.emit(&StoreEvent::LoadingChanged(true));

        assert_eq!(*seen.lock(), vec![StoreEvent::Cleared]);
        assert_eq!(listeners.len(), 0);
    }

    #[test]
    fn test_listener_may_subscribe_during_emit() {
        let listeners = Arc::new(Listeners::default());
        let inner = Arc::clone(&listeners);
        listeners.subscribe(move |_| {
            inner.subscribe(|_| {});
        });

        listeners.emit(&StoreEvent::Cleared);
        assert_eq!(listeners.len(), 2);
    }
}
