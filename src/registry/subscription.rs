//! # Subscription state and the public [`EventSubscription`] handle.
//!
//! The registry stores [`SubscriptionState`] values; callers hold
//! [`EventSubscription`] — a cheap cloneable handle that can inspect the
//! subscription and dispose of it.
//!
//! ## Liveness
//! Disposal flips an atomic flag *before* removing the entry from the
//! registry, and the bus rechecks the flag immediately before every
//! invocation. A subscription disposed mid-dispatch is therefore never
//! invoked again, even if the dispatch snapshotted the list earlier.

use std::any::TypeId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use crate::config::EventConfig;
use crate::subscribers::ErasedSubscribe;

use super::registry::Shared;

/// Internal per-subscription record owned by the registry.
pub(crate) struct SubscriptionState {
    key: TypeId,
    config: EventConfig,
    seq: u64,
    active: AtomicBool,
    subscriber: Box<dyn ErasedSubscribe>,
}

impl SubscriptionState {
    pub(crate) fn new(
        key: TypeId,
        config: EventConfig,
        seq: u64,
        subscriber: Box<dyn ErasedSubscribe>,
    ) -> Self {
        Self {
            key,
            config,
            seq,
            active: AtomicBool::new(true),
            subscriber,
        }
    }

    /// Type key this subscription is registered under.
    #[inline]
    pub(crate) fn key(&self) -> TypeId {
        self.key
    }

    #[inline]
    pub(crate) fn config(&self) -> EventConfig {
        self.config
    }

    /// Registration sequence; the tiebreaker for equal `order` values.
    #[inline]
    pub(crate) fn seq(&self) -> u64 {
        self.seq
    }

    #[inline]
    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
    }

    #[inline]
    pub(crate) fn subscriber(&self) -> &dyn ErasedSubscribe {
        self.subscriber.as_ref()
    }
}

/// Handle to a registered subscription.
///
/// Cloning is cheap (Arc-backed). The handle stays valid after the
/// registry is dropped; operations on it then become no-ops.
#[derive(Clone)]
pub struct EventSubscription {
    state: Arc<SubscriptionState>,
    registry: Weak<Shared>,
}

impl EventSubscription {
    pub(crate) fn new(state: Arc<SubscriptionState>, registry: Weak<Shared>) -> Self {
        Self { state, registry }
    }

    /// The event type key this subscription was registered for.
    pub fn event_type(&self) -> TypeId {
        self.state.key()
    }

    /// The configuration attached at registration time.
    pub fn config(&self) -> EventConfig {
        self.state.config()
    }

    /// The subscriber's name (see [`Subscribe::name`](crate::Subscribe::name)).
    pub fn subscriber_name(&self) -> &str {
        self.state.subscriber().name()
    }

    /// Whether the subscription is still registered.
    pub fn active(&self) -> bool {
        self.state.is_active()
    }

    /// Removes the subscription from its registry.
    ///
    /// Idempotent; safe to call from inside a subscriber or after the
    /// registry itself is gone. In-flight dispatches stop delivering to
    /// this subscription immediately.
    pub fn dispose(&self) {
        self.state.deactivate();
        if let Some(shared) = self.registry.upgrade() {
            shared.remove(&self.state);
        }
    }
}

impl std::fmt::Debug for EventSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSubscription")
            .field("event_type", &self.state.key())
            .field("subscriber", &self.subscriber_name())
            .field("order", &self.state.config().order)
            .field("active", &self.active())
            .finish()
    }
}
