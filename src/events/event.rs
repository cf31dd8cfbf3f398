//! # The event abstraction: typing, widening, cancellation.
//!
//! [`Event`] is the trait all posted values implement. It does three jobs:
//! - anchors the value to a concrete [`TypeId`] (the *primary key* used for
//!   subscription matching),
//! - lets an event expose additional typed [`views`](Event::views) of
//!   itself so subscribers of another event type can observe it (widening),
//! - lets an event opt into [`cancellation`](Event::as_cancellable).
//!
//! ## Widening
//! There is no subtype polymorphism between event structs; an event that
//! should also reach subscribers of another type *embeds* a value of that
//! type and hands out a view:
//! ```rust
//! use std::any::Any;
//! use evbus::{Event, EventView};
//!
//! #[derive(Debug, Default)]
//! struct JobFinished {
//!     job: String,
//! }
//!
//! impl Event for JobFinished {
//!     fn as_any(&self) -> &(dyn Any + Send + Sync) {
//!         self
//!     }
//! }
//!
//! /// Also delivered to `JobFinished` subscribers via its embedded view.
//! #[derive(Debug, Default)]
//! struct JobFailed {
//!     finished: JobFinished,
//!     error: String,
//! }
//!
//! impl Event for JobFailed {
//!     fn as_any(&self) -> &(dyn Any + Send + Sync) {
//!         self
//!     }
//!
//!     fn views(&self) -> Vec<EventView<'_>> {
//!         vec![EventView::of(&self.finished)]
//!     }
//! }
//! ```
//!
//! ## Cancellation
//! Subscribers share the event (`&E`), so cancellation state is interior:
//! embed a [`CancelFlag`] and surface it through
//! [`Event::as_cancellable`]. The bus rechecks the flag before every
//! invocation, which is what makes "cancel for everyone after me" work
//! within a single dispatch.

use std::any::{Any, TypeId};
use std::sync::atomic::{AtomicBool, Ordering};

/// An event deliverable through the bus.
///
/// Implementors must be `Send + Sync` because a posted event is shared with
/// every matching subscriber; any mutable state on the event (counters,
/// cancellation) must use interior mutability.
pub trait Event: Any + Send + Sync {
    /// Returns `self` as [`Any`] for subscription matching and downcasting.
    ///
    /// The implementation is always `self`:
    /// ```ignore
    /// fn as_any(&self) -> &(dyn Any + Send + Sync) {
    ///     self
    /// }
    /// ```
    fn as_any(&self) -> &(dyn Any + Send + Sync);

    /// Additional typed views this event is deliverable as.
    ///
    /// Subscribers registered for a view's type receive the view value.
    /// Subscriptions configured with
    /// [`exact`](crate::EventConfig::exact) never receive these.
    ///
    /// Default: none.
    fn views(&self) -> Vec<EventView<'_>> {
        Vec::new()
    }

    /// Returns the event's cancellation state, if it has one.
    ///
    /// Events that cannot be cancelled return `None` (the default); the
    /// bus then treats them as never cancelled.
    fn as_cancellable(&self) -> Option<&dyn Cancellable> {
        None
    }
}

/// A typed view of an event: the type key it is deliverable under, plus the
/// reference presented to subscribers of that type.
#[derive(Clone, Copy)]
pub struct EventView<'a> {
    key: TypeId,
    view: &'a (dyn Any + Send + Sync),
}

impl<'a> EventView<'a> {
    /// Creates a view delivering `view` to subscribers of `T`.
    pub fn of<T: Event>(view: &'a T) -> Self {
        Self {
            key: TypeId::of::<T>(),
            view,
        }
    }

    /// The type key this view is delivered under.
    #[inline]
    pub fn key(&self) -> TypeId {
        self.key
    }

    /// The value presented to subscribers of [`key`](EventView::key).
    #[inline]
    pub fn view(&self) -> &'a (dyn Any + Send + Sync) {
        self.view
    }
}

/// Cancellation state of an event.
///
/// Operates through `&self` so subscribers can cancel the event they were
/// handed. See [`CancelFlag`] for the standard storage.
pub trait Cancellable: Send + Sync {
    /// Whether the event has been cancelled.
    fn cancelled(&self) -> bool;

    /// Sets the cancellation state.
    fn set_cancelled(&self, cancelled: bool);
}

/// Atomic cancellation flag for embedding in event structs.
///
/// ```rust
/// use std::any::Any;
/// use evbus::{CancelFlag, Cancellable, Event};
///
/// #[derive(Debug, Default)]
/// struct MessagePosted {
///     text: String,
///     cancel: CancelFlag,
/// }
///
/// impl Event for MessagePosted {
///     fn as_any(&self) -> &(dyn Any + Send + Sync) {
///         self
///     }
///
///     fn as_cancellable(&self) -> Option<&dyn Cancellable> {
///         Some(&self.cancel)
///     }
/// }
/// ```
#[derive(Debug, Default)]
pub struct CancelFlag(AtomicBool);

impl CancelFlag {
    /// Creates a flag in the not-cancelled state.
    pub fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Whether the flag is set.
    #[inline]
    pub fn cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Sets or clears the flag.
    #[inline]
    pub fn set(&self, cancelled: bool) {
        self.0.store(cancelled, Ordering::Release);
    }
}

impl Cancellable for CancelFlag {
    fn cancelled(&self) -> bool {
        CancelFlag::cancelled(self)
    }

    fn set_cancelled(&self, cancelled: bool) {
        self.set(cancelled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Plain;

    impl Event for Plain {
        fn as_any(&self) -> &(dyn Any + Send + Sync) {
            self
        }
    }

    #[test]
    fn test_cancel_flag_round_trip() {
        let flag = CancelFlag::new();
        assert!(!flag.cancelled());
        flag.set(true);
        assert!(flag.cancelled());
        flag.set(false);
        assert!(!flag.cancelled());
    }

    #[test]
    fn test_event_defaults() {
        let event = Plain;
        assert!(event.views().is_empty());
        assert!(event.as_cancellable().is_none());
        assert_eq!(event.as_any().type_id(), TypeId::of::<Plain>());
    }

    #[test]
    fn test_view_carries_key_of_target_type() {
        let inner = Plain;
        let view = EventView::of(&inner);
        assert_eq!(view.key(), TypeId::of::<Plain>());
        assert!(view.view().downcast_ref::<Plain>().is_some());
    }
}
