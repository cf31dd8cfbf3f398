//! Error types used by the event bus.
//!
//! [`SubscriberError`] classifies what went wrong inside a single subscriber
//! during dispatch. Subscriber failures never abort a dispatch; they are
//! routed to the bus's [`FaultHandler`](crate::FaultHandler) together with
//! the offending subscription.

use thiserror::Error;

/// # Errors produced by subscriber invocations.
///
/// A failing subscriber affects only itself: the bus reports the error to
/// its fault handler and continues with the remaining subscriptions.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SubscriberError {
    /// Subscriber returned an error from [`Subscribe::on_event`](crate::Subscribe::on_event).
    #[error("subscriber failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Subscriber panicked while handling an event; the panic was caught.
    #[error("subscriber panicked: {info}")]
    Panicked {
        /// The captured panic payload, rendered as text.
        info: String,
    },
}

impl SubscriberError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use evbus::SubscriberError;
    ///
    /// let err = SubscriberError::Fail { error: "boom".into() };
    /// assert_eq!(err.as_label(), "subscriber_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SubscriberError::Fail { .. } => "subscriber_failed",
            SubscriberError::Panicked { .. } => "subscriber_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SubscriberError::Fail { error } => format!("error: {error}"),
            SubscriberError::Panicked { info } => format!("panic: {info}"),
        }
    }
}
