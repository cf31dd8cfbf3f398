//! # Subscription registry keyed by event type.
//!
//! [`EventRegistry`] owns every subscription and answers the bus's matching
//! queries. It is the only place subscription lists are mutated.
//!
//! ## Architecture
//! ```text
//! subscribe::<E>(config, subscriber)
//!     │
//!     ▼
//! RwLock<HashMap<TypeId, Vec<Arc<SubscriptionState>>>>
//!     │                        (per-key list kept sorted by (order, seq))
//!     ├─► subscribed::<E>() / subscriptions::<E>()  — queries
//!     ├─► unsubscribe_if(predicate)                 — bulk removal
//!     └─► snapshot(key)                             — dispatch input (bus)
//! ```
//!
//! ## Rules
//! - Per-key lists are insertion-sorted by `(order, seq)`; dispatch never
//!   sorts a single key's list.
//! - Locks guard map access only. Subscriber code never runs under a
//!   registry lock, and `unsubscribe_if` evaluates its predicate on a
//!   snapshot outside the lock, so predicates and subscribers may call
//!   back into the registry freely.
//! - Subscriptions added while a post is in flight are first seen by the
//!   next post.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::config::EventConfig;
use crate::events::Event;
use crate::subscribers::{Subscribe, Typed};

use super::subscription::{EventSubscription, SubscriptionState};

/// Shared registry storage. Handles hold a `Weak` to it so disposal keeps
/// working while the registry is alive and degrades to a no-op after.
pub(crate) struct Shared {
    subscriptions: RwLock<HashMap<TypeId, Vec<Arc<SubscriptionState>>>>,
    seq: AtomicU64,
}

impl Shared {
    /// Removes one subscription record, pruning its key when empty.
    pub(crate) fn remove(&self, state: &Arc<SubscriptionState>) {
        let mut map = self.subscriptions.write();
        if let Some(list) = map.get_mut(&state.key()) {
            list.retain(|s| !Arc::ptr_eq(s, state));
            if list.is_empty() {
                map.remove(&state.key());
            }
        }
    }
}

/// Thread-safe subscription store.
///
/// Cloning is cheap (Arc-backed); clones share the same subscriptions.
/// A bus holds its own clone, so one registry can feed several buses.
#[derive(Clone)]
pub struct EventRegistry {
    shared: Arc<Shared>,
}

impl EventRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                subscriptions: RwLock::new(HashMap::new()),
                seq: AtomicU64::new(0),
            }),
        }
    }

    /// Registers `subscriber` for events of type `E` with the default
    /// [`EventConfig`].
    pub fn subscribe<E, S>(&self, subscriber: S) -> EventSubscription
    where
        E: Event,
        S: Subscribe<E> + 'static,
    {
        self.subscribe_with(EventConfig::default(), subscriber)
    }

    /// Registers `subscriber` for events of type `E`.
    ///
    /// The returned handle can be kept to [`dispose`](EventSubscription::dispose)
    /// the subscription later; dropping it changes nothing.
    pub fn subscribe_with<E, S>(&self, config: EventConfig, subscriber: S) -> EventSubscription
    where
        E: Event,
        S: Subscribe<E> + 'static,
    {
        let seq = self.shared.seq.fetch_add(1, Ordering::Relaxed);
        let state = Arc::new(SubscriptionState::new(
            TypeId::of::<E>(),
            config,
            seq,
            Box::new(Typed::<E, S>::new(subscriber)),
        ));

        let mut map = self.shared.subscriptions.write();
        let list = map.entry(TypeId::of::<E>()).or_default();
        // New entries carry the highest seq, so among equal orders they land last.
        let at = list.partition_point(|s| s.config().order <= config.order);
        list.insert(at, Arc::clone(&state));
        drop(map);

        self.handle(&state)
    }

    /// Whether at least one live subscription exists for `E`.
    pub fn subscribed<E: Event>(&self) -> bool {
        let map = self.shared.subscriptions.read();
        map.get(&TypeId::of::<E>())
            .is_some_and(|list| list.iter().any(|s| s.is_active()))
    }

    /// Snapshot of the live subscriptions for `E`, sorted by `(order, seq)`.
    pub fn subscriptions<E: Event>(&self) -> Vec<EventSubscription> {
        self.snapshot(TypeId::of::<E>())
            .iter()
            .filter(|s| s.is_active())
            .map(|s| self.handle(s))
            .collect()
    }

    /// Removes every subscription for which `predicate` returns true.
    ///
    /// The predicate runs on a snapshot, outside the registry lock, and may
    /// inspect the handle freely (type key, config, subscriber name).
    pub fn unsubscribe_if<F>(&self, mut predicate: F)
    where
        F: FnMut(&EventSubscription) -> bool,
    {
        let all: Vec<Arc<SubscriptionState>> = {
            let map = self.shared.subscriptions.read();
            map.values().flatten().cloned().collect()
        };

        let mut matched: Vec<Arc<SubscriptionState>> = Vec::new();
        for state in &all {
            if predicate(&self.handle(state)) {
                state.deactivate();
                matched.push(Arc::clone(state));
            }
        }
        if matched.is_empty() {
            return;
        }

        let mut map = self.shared.subscriptions.write();
        for list in map.values_mut() {
            list.retain(|s| !matched.iter().any(|m| Arc::ptr_eq(m, s)));
        }
        map.retain(|_, list| !list.is_empty());
    }

    /// Number of live subscriptions across all event types.
    pub fn len(&self) -> usize {
        let map = self.shared.subscriptions.read();
        map.values()
            .flatten()
            .filter(|s| s.is_active())
            .count()
    }

    /// True if no live subscriptions exist.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw per-key snapshot for dispatch; includes records the bus must
    /// recheck for liveness before invoking.
    pub(crate) fn snapshot(&self, key: TypeId) -> Vec<Arc<SubscriptionState>> {
        let map = self.shared.subscriptions.read();
        map.get(&key).cloned().unwrap_or_default()
    }

    pub(crate) fn handle(&self, state: &Arc<SubscriptionState>) -> EventSubscription {
        EventSubscription::new(Arc::clone(state), Arc::downgrade(&self.shared))
    }
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::new()
    }
}
