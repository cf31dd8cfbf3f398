//! # Fault handling: what happens when a subscriber fails.
//!
//! A dispatch never aborts because one subscriber misbehaved. Returned
//! errors and caught panics are converted into [`SubscriberError`] values
//! and pushed through the bus's [`FaultHandler`], then dispatch continues.
//!
//! ## Rules
//! - Handlers are synchronous and must be fast; they run inline between
//!   subscriber invocations.
//! - Handlers must not panic. [`PanicFaultHandler`] does so on purpose and
//!   is only meant for tests, where a fault should fail the test.

use crate::error::SubscriberError;
use crate::events::Event;
use crate::registry::EventSubscription;

/// Receives subscriber failures during dispatch.
pub trait FaultHandler: Send + Sync {
    /// Handles one fault.
    ///
    /// `subscription` identifies the failing subscriber; `event` is the
    /// event that was being delivered when the fault occurred.
    fn on_fault(&self, subscription: &EventSubscription, event: &dyn Event, error: &SubscriberError);
}

/// Default fault handler: emits a `tracing` warning and moves on.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFaultHandler;

impl FaultHandler for LogFaultHandler {
    fn on_fault(
        &self,
        subscription: &EventSubscription,
        _event: &dyn Event,
        error: &SubscriberError,
    ) {
        tracing::warn!(
            subscriber = subscription.subscriber_name(),
            fault = error.as_label(),
            "subscriber fault: {}",
            error.as_message()
        );
    }
}

/// Fault handler that escalates every fault to a panic.
///
/// Useful in tests: any subscriber failure fails the test instead of being
/// logged away.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicFaultHandler;

impl FaultHandler for PanicFaultHandler {
    fn on_fault(
        &self,
        subscription: &EventSubscription,
        _event: &dyn Event,
        error: &SubscriberError,
    ) {
        panic!(
            "subscriber '{}' faulted: {}",
            subscription.subscriber_name(),
            error.as_message()
        );
    }
}
