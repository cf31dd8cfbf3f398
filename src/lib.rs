//! # evbus
//!
//! **evbus** is a typed in-process event bus for Rust.
//!
//! It provides a subscription registry keyed by event type, ordered
//! sequential dispatch, opt-in event cancellation, and fault isolation so
//! a misbehaving subscriber can never break delivery for the rest. The
//! crate is designed as a building block: it owns no runtime, spawns no
//! tasks, and performs no I/O.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ Subscribe<A> │   │ Subscribe<A> │   │ Subscribe<B> │
//!     │ (handler #1) │   │ (handler #2) │   │ (handler #3) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼ subscribe        ▼ subscribe        ▼ subscribe
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EventRegistry                                                    │
//! │  TypeId(A) → [sub#1, sub#2]   (sorted by (order, seq))            │
//! │  TypeId(B) → [sub#3]                                              │
//! └───────────────────────────────┬───────────────────────────────────┘
//!                                 │ snapshot(keys)
//!        post(&event).await       ▼
//! Caller ──────────────► SimpleEventBus
//!                            │
//!                            ├─► delivery keys: concrete type + views()
//!                            ├─► merge matches by (order, seq)
//!                            └─► invoke sequentially, isolating faults
//!                                  ├─ Err / panic ──► FaultHandler
//!                                  └─ cancellation rechecked per subscriber
//! ```
//!
//! ### Dispatch lifecycle
//! ```text
//! post(&event)
//!   ├─► collect subscriptions for the event's type and each views() entry
//!   ├─► for each, in (order, seq) order:
//!   │     ├─ disposed?                        → skip
//!   │     ├─ exact and delivery is widened?   → skip
//!   │     ├─ order filter mismatch?           → skip
//!   │     ├─ cancelled and declines?          → skip
//!   │     └─ subscriber.on_event(&event).await
//!   │           └─ Err / panic → FaultHandler, dispatch continues
//!   └─► returns once every matching subscriber ran
//! ```
//!
//! ## Features
//! | Area              | Description                                                      | Key types / traits                     |
//! |-------------------|------------------------------------------------------------------|----------------------------------------|
//! | **Events**        | Typed events with opt-in widening views and cancellation.        | [`Event`], [`EventView`], [`CancelFlag`] |
//! | **Subscribers**   | Async handlers, closure-backed for small cases.                  | [`Subscribe`], [`SubscriberFn`]        |
//! | **Registry**      | Type-keyed subscription store with disposable handles.           | [`EventRegistry`], [`EventSubscription`] |
//! | **Dispatch**      | Ordered sequential posting, order-filtered posting.              | [`EventBus`], [`SimpleEventBus`]       |
//! | **Configuration** | Per-subscription order / cancelled-delivery / exact matching.    | [`EventConfig`]                        |
//! | **Faults**        | Subscriber errors and panics isolated and reported out-of-band.  | [`FaultHandler`], [`SubscriberError`]  |
//!
//! ## Optional features
//! - `logging`: exports a simple tracing-backed [`LogSubscriber`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::any::Any;
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use evbus::{Event, EventBus, EventConfig, EventRegistry, SimpleEventBus, SubscriberFn};
//!
//! #[derive(Debug, Default)]
//! struct UserRegistered {
//!     greeted: AtomicU32,
//! }
//!
//! impl Event for UserRegistered {
//!     fn as_any(&self) -> &(dyn Any + Send + Sync) {
//!         self
//!     }
//! }
//!
//! let registry = EventRegistry::new();
//!
//! // Runs first (lower order), regardless of registration order.
//! registry.subscribe_with(
//!     EventConfig::default().with_order(-10),
//!     SubscriberFn::new("greeter", |event: &UserRegistered| {
//!         event.greeted.fetch_add(1, Ordering::Relaxed);
//!     }),
//! );
//!
//! let bus = SimpleEventBus::new(registry.clone());
//!
//! futures::executor::block_on(async {
//!     let event = UserRegistered::default();
//!     bus.post(&event).await;
//!     assert_eq!(event.greeted.load(Ordering::Relaxed), 1);
//! });
//! ```

mod bus;
mod config;
mod error;
mod events;
mod registry;
mod subscribers;

// ---- Public re-exports ----

pub use bus::{EventBus, FaultHandler, LogFaultHandler, PanicFaultHandler, SimpleEventBus};
pub use config::EventConfig;
pub use error::SubscriberError;
pub use events::{CancelFlag, Cancellable, Event, EventView};
pub use registry::{EventRegistry, EventSubscription};
pub use subscribers::{Subscribe, SubscriberFn};

// Optional: expose a simple tracing-backed logging subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogSubscriber;
