//! # The posting seam: [`EventBus`].
//!
//! The trait is the integration point for code that posts events without
//! caring how dispatch is implemented; [`SimpleEventBus`](super::SimpleEventBus)
//! is the standard implementation.

use async_trait::async_trait;

use crate::events::Event;

/// An event bus.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Posts an event to all matching subscriptions.
    async fn post(&self, event: &dyn Event) {
        self.post_at(event, None).await;
    }

    /// Posts an event, restricted to subscriptions at the given order.
    ///
    /// With `order = Some(o)` only subscriptions whose configured
    /// [`order`](crate::EventConfig::order) equals `o` are invoked; with
    /// `None` every matching subscription is.
    async fn post_at(&self, event: &dyn Event, order: Option<i32>);
}
