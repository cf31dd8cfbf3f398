//! Event data model: typing, widening views, cancellation.
//!
//! ## Contents
//! - [`Event`] the trait all posted values implement
//! - [`EventView`] a typed view used for widened delivery
//! - [`Cancellable`], [`CancelFlag`] opt-in cancellation state
//!
//! See `bus/` for how these are consumed during dispatch.

mod event;

pub use event::{CancelFlag, Cancellable, Event, EventView};
