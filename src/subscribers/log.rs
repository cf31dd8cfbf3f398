//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogSubscriber`] emits every received event through `tracing` at info
//! level. Primarily useful for development, debugging, and examples.
//!
//! ## Output
//! ```text
//! INFO evbus: event received event_type="demo::MessagePosted" event=MessagePosted { .. }
//! ```

use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;

use crate::error::SubscriberError;
use crate::events::Event;

use super::Subscribe;

/// Tracing-backed logging subscriber for events of type `E`.
///
/// Enabled via the `logging` feature. Not intended for production use —
/// implement a custom [`Subscribe`] for structured logging or metrics
/// collection.
#[derive(Debug, Default)]
pub struct LogSubscriber<E> {
    _marker: PhantomData<fn(&E)>,
}

impl<E> LogSubscriber<E> {
    /// Creates a new logging subscriber.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<E: Event + Debug> Subscribe<E> for LogSubscriber<E> {
    async fn on_event(&self, event: &E) -> Result<(), SubscriberError> {
        tracing::info!(
            event_type = std::any::type_name::<E>(),
            event = ?event,
            "event received"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
