//! # Function-backed subscriber (`SubscriberFn`)
//!
//! [`SubscriberFn`] wraps a plain closure `F: Fn(&E)` so small handlers do
//! not need a struct and a trait impl. The closure is synchronous and
//! infallible; subscribers that await or report errors implement
//! [`Subscribe`] directly.
//!
//! ## Example
//! ```rust
//! use std::any::Any;
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use evbus::{Event, EventRegistry, SubscriberFn};
//!
//! #[derive(Debug, Default)]
//! struct Tick {
//!     seen: AtomicU32,
//! }
//!
//! impl Event for Tick {
//!     fn as_any(&self) -> &(dyn Any + Send + Sync) {
//!         self
//!     }
//! }
//!
//! let registry = EventRegistry::new();
//! let subscription = registry.subscribe(SubscriberFn::new("count", |tick: &Tick| {
//!     tick.seen.fetch_add(1, Ordering::Relaxed);
//! }));
//! assert_eq!(subscription.subscriber_name(), "count");
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SubscriberError;
use crate::events::Event;

use super::Subscribe;

/// Function-backed subscriber implementation.
#[derive(Debug)]
pub struct SubscriberFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> SubscriberFn<F> {
    /// Creates a new function-backed subscriber.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the subscriber and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<E, F> Subscribe<E> for SubscriberFn<F>
where
    E: Event,
    F: Fn(&E) + Send + Sync + 'static, // Fn, not FnMut: shared across dispatches
{
    async fn on_event(&self, event: &E) -> Result<(), SubscriberError> {
        (self.f)(event);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
