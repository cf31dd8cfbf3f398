//! # Typed event subscriber trait.
//!
//! Provides [`Subscribe`] — the extension point for plugging handlers into
//! the bus. A subscriber is registered for one event type `E` and receives
//! `&E` for every matching post.
//!
//! ## Rules
//! - Subscribers run sequentially in configured order; a slow subscriber
//!   delays the ones after it in the same dispatch.
//! - Returning an error does not stop dispatch: the bus reports it to the
//!   [`FaultHandler`](crate::FaultHandler) and moves on.
//! - Panics are caught and reported the same way.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use std::any::Any;
//! use evbus::{Event, Subscribe, SubscriberError};
//!
//! #[derive(Debug)]
//! struct OrderPlaced {
//!     total_cents: u64,
//! }
//!
//! impl Event for OrderPlaced {
//!     fn as_any(&self) -> &(dyn Any + Send + Sync) {
//!         self
//!     }
//! }
//!
//! struct Metrics;
//!
//! #[async_trait]
//! impl Subscribe<OrderPlaced> for Metrics {
//!     async fn on_event(&self, event: &OrderPlaced) -> Result<(), SubscriberError> {
//!         // export a metric, etc.
//!         let _ = event.total_cents;
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "metrics"
//!     }
//! }
//! ```

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SubscriberError;
use crate::events::Event;

/// Handler for events of type `E`.
///
/// ### Implementation requirements
/// - Avoid blocking the executor; use async I/O.
/// - Prefer returning [`SubscriberError`] over panicking — both are
///   isolated, but errors carry intent.
#[async_trait]
pub trait Subscribe<E: Event>: Send + Sync {
    /// Processes a single event.
    ///
    /// Called in dispatch order from within the posting task.
    async fn on_event(&self, event: &E) -> Result<(), SubscriberError>;

    /// Returns the subscriber name used in fault reports and for
    /// predicate-based unsubscription.
    ///
    /// Prefer short, descriptive names (e.g., "metrics", "audit"). The
    /// default uses `type_name::<Self>()`, which can be verbose.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

#[async_trait]
impl<E: Event, S: Subscribe<E> + ?Sized> Subscribe<E> for Arc<S> {
    async fn on_event(&self, event: &E) -> Result<(), SubscriberError> {
        (**self).on_event(event).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Type-erased subscriber stored by the registry.
///
/// The registry keys subscriptions by `TypeId`, so at dispatch time the
/// event arrives as `&dyn Any`; this trait hides the downcast back to the
/// concrete event type.
#[async_trait]
pub(crate) trait ErasedSubscribe: Send + Sync {
    async fn on_event_any(&self, view: &(dyn Any + Send + Sync)) -> Result<(), SubscriberError>;

    fn name(&self) -> &str;
}

/// Adapter pairing a typed subscriber with its event type.
pub(crate) struct Typed<E, S> {
    subscriber: S,
    _marker: PhantomData<fn(&E)>,
}

impl<E, S> Typed<E, S> {
    pub(crate) fn new(subscriber: S) -> Self {
        Self {
            subscriber,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<E, S> ErasedSubscribe for Typed<E, S>
where
    E: Event,
    S: Subscribe<E> + 'static,
{
    async fn on_event_any(&self, view: &(dyn Any + Send + Sync)) -> Result<(), SubscriberError> {
        // The registry only routes views keyed by E, so the downcast holds;
        // a mismatch is ignored rather than escalated.
        match view.downcast_ref::<E>() {
            Some(event) => self.subscriber.on_event(event).await,
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        self.subscriber.name()
    }
}
