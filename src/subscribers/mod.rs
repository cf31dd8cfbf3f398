//! Subscriber surface: the [`Subscribe`] trait and its helpers.
//!
//! ## Contents
//! - [`Subscribe`] typed async handler trait
//! - [`SubscriberFn`] closure-backed subscriber for small handlers
//! - [`LogSubscriber`] tracing-backed reference subscriber (feature `logging`)

mod subscriber;
mod subscriber_fn;

#[cfg(feature = "logging")]
mod log;

pub use subscriber::Subscribe;
pub use subscriber_fn::SubscriberFn;

#[cfg(feature = "logging")]
pub use log::LogSubscriber;

pub(crate) use subscriber::{ErasedSubscribe, Typed};
