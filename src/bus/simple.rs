//! # SimpleEventBus: ordered, fault-isolated dispatch.
//!
//! [`SimpleEventBus`] resolves a posted event against the registry and
//! invokes every matching subscriber sequentially.
//!
//! ## Dispatch
//! ```text
//! post(&event)
//!     │
//!     ├─► delivery keys: concrete type, then each views() entry (deduped)
//!     ├─► snapshot matching subscriptions per key (registry lock released)
//!     ├─► merge by (order, seq)
//!     └─► for each subscription, in order:
//!           ├─ skip if disposed since the snapshot
//!           ├─ skip if exact and this delivery is a widened view
//!           ├─ skip if posting at a specific order and it differs
//!           ├─ skip if event cancelled and subscription declines cancelled
//!           └─ await subscriber
//!                ├─ Ok(())  → continue
//!                ├─ Err(e)  → fault handler, continue
//!                └─ panic   → caught, fault handler, continue
//! ```
//!
//! ## Rules
//! - Acceptance is evaluated immediately before each invocation, so a
//!   subscriber that cancels the event suppresses later
//!   decline-cancelled subscriptions within the same dispatch.
//! - No registry lock is held while subscribers run; subscribers may
//!   subscribe, dispose, or post freely. Subscriptions added during a
//!   dispatch are first seen by the next post.
//! - Distinct posts may run concurrently from different tasks; each works
//!   on its own snapshot.

use std::any::{Any, TypeId};
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;

use crate::error::SubscriberError;
use crate::events::Event;
use crate::registry::{EventRegistry, SubscriptionState};

use super::fault::{FaultHandler, LogFaultHandler};
use super::post::EventBus;

/// The standard [`EventBus`] implementation.
pub struct SimpleEventBus {
    registry: EventRegistry,
    faults: Arc<dyn FaultHandler>,
}

impl SimpleEventBus {
    /// Creates a bus over `registry`, reporting faults through
    /// [`LogFaultHandler`].
    pub fn new(registry: EventRegistry) -> Self {
        Self::with_faults(registry, Arc::new(LogFaultHandler))
    }

    /// Creates a bus with an explicit fault handler.
    pub fn with_faults(registry: EventRegistry, faults: Arc<dyn FaultHandler>) -> Self {
        Self { registry, faults }
    }

    /// The registry this bus dispatches from.
    pub fn registry(&self) -> &EventRegistry {
        &self.registry
    }

    fn accepts(
        &self,
        state: &SubscriptionState,
        event: &dyn Event,
        primary: TypeId,
        order: Option<i32>,
    ) -> bool {
        if !state.is_active() {
            return false;
        }
        let config = state.config();

        if config.exact && state.key() != primary {
            return false;
        }

        if let Some(order) = order {
            if config.order != order {
                return false;
            }
        }

        if !config.accepts_cancelled {
            if let Some(cancellable) = event.as_cancellable() {
                if cancellable.cancelled() {
                    return false;
                }
            }
        }

        true
    }

    fn report(&self, state: &Arc<SubscriptionState>, event: &dyn Event, error: SubscriberError) {
        let subscription = self.registry.handle(state);
        self.faults.on_fault(&subscription, event, &error);
    }
}

#[async_trait]
impl EventBus for SimpleEventBus {
    async fn post_at(&self, event: &dyn Event, order: Option<i32>) {
        let primary = event.as_any().type_id();
        let views = event.views();

        let mut deliveries: Vec<(Arc<SubscriptionState>, &(dyn Any + Send + Sync))> = Vec::new();
        let mut seen: Vec<TypeId> = Vec::with_capacity(1 + views.len());

        seen.push(primary);
        for state in self.registry.snapshot(primary) {
            deliveries.push((state, event.as_any()));
        }
        for view in &views {
            if seen.contains(&view.key()) {
                continue;
            }
            seen.push(view.key());
            for state in self.registry.snapshot(view.key()) {
                deliveries.push((state, view.view()));
            }
        }
        if deliveries.is_empty() {
            return;
        }
        // Per-key lists arrive sorted; the merge re-establishes the global order.
        deliveries.sort_by_key(|(state, _)| (state.config().order, state.seq()));

        for (state, view) in deliveries {
            if !self.accepts(&state, event, primary, order) {
                continue;
            }

            let invocation = state.subscriber().on_event_any(view);
            match std::panic::AssertUnwindSafe(invocation).catch_unwind().await {
                Ok(Ok(())) => {}
                Ok(Err(error)) => self.report(&state, event, error),
                Err(panic) => self.report(
                    &state,
                    event,
                    SubscriberError::Panicked {
                        info: panic_message(&panic),
                    },
                ),
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::fault::PanicFaultHandler;
    use crate::config::EventConfig;
    use crate::events::{CancelFlag, Cancellable, EventView};
    use crate::subscribers::{Subscribe, SubscriberFn};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, Default)]
    struct TestEvent {
        touches: AtomicU32,
        cancel: CancelFlag,
    }

    impl TestEvent {
        fn touch(&self) {
            self.touches.fetch_add(1, Ordering::Relaxed);
        }

        fn touches(&self) -> u32 {
            self.touches.load(Ordering::Relaxed)
        }
    }

    impl Event for TestEvent {
        fn as_any(&self) -> &(dyn Any + Send + Sync) {
            self
        }

        fn as_cancellable(&self) -> Option<&dyn Cancellable> {
            Some(&self.cancel)
        }
    }

    /// Wraps a [`TestEvent`] and widens to it, standing in for the
    /// "more specific event" case.
    #[derive(Debug, Default)]
    struct WrappedEvent {
        inner: TestEvent,
    }

    impl Event for WrappedEvent {
        fn as_any(&self) -> &(dyn Any + Send + Sync) {
            self
        }

        fn views(&self) -> Vec<EventView<'_>> {
            vec![EventView::of(&self.inner)]
        }

        fn as_cancellable(&self) -> Option<&dyn Cancellable> {
            Some(&self.inner.cancel)
        }
    }

    fn strict_bus(registry: &EventRegistry) -> SimpleEventBus {
        SimpleEventBus::with_faults(registry.clone(), Arc::new(PanicFaultHandler))
    }

    fn toucher(name: &'static str) -> SubscriberFn<impl Fn(&TestEvent) + Send + Sync + 'static> {
        SubscriberFn::new(name, |event: &TestEvent| event.touch())
    }

    #[tokio::test]
    async fn test_subscribe_post_dispose_post() {
        let registry = EventRegistry::new();
        let bus = strict_bus(&registry);
        assert!(!registry.subscribed::<TestEvent>());

        let subscription = registry.subscribe(toucher("touch"));
        assert!(registry.subscribed::<TestEvent>());

        let event = TestEvent::default();
        bus.post(&event).await;
        assert_eq!(event.touches(), 1);

        subscription.dispose();
        assert!(!registry.subscribed::<TestEvent>());

        bus.post(&event).await;
        assert_eq!(event.touches(), 1);
    }

    #[tokio::test]
    async fn test_widened_event_reaches_view_subscribers() {
        let registry = EventRegistry::new();
        let bus = strict_bus(&registry);

        registry.subscribe(toucher("base"));
        registry.subscribe(SubscriberFn::new("wrapped", |event: &WrappedEvent| {
            event.inner.touch();
        }));

        let plain = TestEvent::default();
        bus.post(&plain).await;
        assert_eq!(plain.touches(), 1);

        let wrapped = WrappedEvent::default();
        bus.post(&wrapped).await;
        assert_eq!(wrapped.inner.touches(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_event_skipped_when_declined() {
        let registry = EventRegistry::new();
        let bus = strict_bus(&registry);

        registry.subscribe_with(
            EventConfig::default().with_accepts_cancelled(false),
            toucher("no-cancelled"),
        );

        let event = TestEvent::default();
        bus.post(&event).await;
        assert_eq!(event.touches(), 1);

        event.cancel.set(true);
        bus.post(&event).await;
        assert_eq!(event.touches(), 1);
    }

    #[tokio::test]
    async fn test_cancellation_mid_dispatch_suppresses_later_decliners() {
        let registry = EventRegistry::new();
        let bus = strict_bus(&registry);

        registry.subscribe_with(
            EventConfig::default().with_order(-1),
            SubscriberFn::new("canceller", |event: &TestEvent| event.cancel.set(true)),
        );
        registry.subscribe_with(
            EventConfig::default().with_accepts_cancelled(false),
            toucher("declines-cancelled"),
        );
        registry.subscribe_with(EventConfig::default().with_order(1), toucher("tolerant"));

        let event = TestEvent::default();
        bus.post(&event).await;
        // only the tolerant subscriber ran after cancellation
        assert_eq!(event.touches(), 1);
        assert!(event.cancel.cancelled());
    }

    #[tokio::test]
    async fn test_exact_subscription_skips_widened_views() {
        let registry = EventRegistry::new();
        let bus = strict_bus(&registry);

        registry.subscribe_with(EventConfig::default().with_exact(true), toucher("exact"));

        let plain = TestEvent::default();
        bus.post(&plain).await;
        assert_eq!(plain.touches(), 1);

        let wrapped = WrappedEvent::default();
        bus.post(&wrapped).await;
        assert_eq!(wrapped.inner.touches(), 0);
    }

    #[tokio::test]
    async fn test_unsubscribe_all() {
        let registry = EventRegistry::new();
        let bus = strict_bus(&registry);

        registry.subscribe(toucher("touch"));
        registry.unsubscribe_if(|_| true);
        assert!(!registry.subscribed::<TestEvent>());

        let event = TestEvent::default();
        bus.post(&event).await;
        assert_eq!(event.touches(), 0);
    }

    #[tokio::test]
    async fn test_unsubscribe_by_name_keeps_the_rest() {
        let registry = EventRegistry::new();
        let bus = strict_bus(&registry);

        registry.subscribe(toucher("first"));
        registry.subscribe(toucher("second"));

        let event = TestEvent::default();
        bus.post(&event).await;
        assert_eq!(event.touches(), 2);

        registry.unsubscribe_if(|s| s.subscriber_name() == "second");
        assert!(registry.subscribed::<TestEvent>());

        bus.post(&event).await;
        assert_eq!(event.touches(), 3);
    }

    #[tokio::test]
    async fn test_dispatch_order_and_registration_ties() {
        let registry = EventRegistry::new();
        let bus = strict_bus(&registry);
        let log: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

        for (name, order) in [("late", 10), ("tie-1", 0), ("early", -5), ("tie-2", 0)] {
            let log = Arc::clone(&log);
            registry.subscribe_with(
                EventConfig::default().with_order(order),
                SubscriberFn::new(name, move |_: &TestEvent| log.lock().push(name)),
            );
        }

        bus.post(&TestEvent::default()).await;
        assert_eq!(*log.lock(), ["early", "tie-1", "tie-2", "late"]);
    }

    #[tokio::test]
    async fn test_post_at_invokes_only_matching_order() {
        let registry = EventRegistry::new();
        let bus = strict_bus(&registry);
        let log: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

        for (name, order) in [("zero", 0), ("five", 5)] {
            let log = Arc::clone(&log);
            registry.subscribe_with(
                EventConfig::default().with_order(order),
                SubscriberFn::new(name, move |_: &TestEvent| log.lock().push(name)),
            );
        }

        bus.post_at(&TestEvent::default(), Some(5)).await;
        assert_eq!(*log.lock(), ["five"]);

        bus.post(&TestEvent::default()).await;
        assert_eq!(*log.lock(), ["five", "zero", "five"]);
    }

    #[tokio::test]
    async fn test_faults_are_isolated_and_reported() {
        struct FailingSubscriber;

        #[async_trait]
        impl Subscribe<TestEvent> for FailingSubscriber {
            async fn on_event(&self, _event: &TestEvent) -> Result<(), SubscriberError> {
                Err(SubscriberError::Fail {
                    error: "boom".into(),
                })
            }

            fn name(&self) -> &str {
                "failing"
            }
        }

        #[derive(Default)]
        struct CollectingFaultHandler {
            seen: Mutex<Vec<String>>,
        }

        impl FaultHandler for CollectingFaultHandler {
            fn on_fault(
                &self,
                subscription: &crate::registry::EventSubscription,
                _event: &dyn Event,
                error: &SubscriberError,
            ) {
                self.seen
                    .lock()
                    .push(format!("{}:{}", subscription.subscriber_name(), error.as_label()));
            }
        }

        let registry = EventRegistry::new();
        let faults = Arc::new(CollectingFaultHandler::default());
        let bus = SimpleEventBus::with_faults(registry.clone(), Arc::clone(&faults) as _);

        registry.subscribe_with(EventConfig::default().with_order(0), FailingSubscriber);
        registry.subscribe_with(
            EventConfig::default().with_order(1),
            SubscriberFn::new("panicking", |_: &TestEvent| panic!("kaboom")),
        );
        registry.subscribe_with(EventConfig::default().with_order(2), toucher("survivor"));

        let event = TestEvent::default();
        bus.post(&event).await;

        assert_eq!(event.touches(), 1);
        assert_eq!(
            *faults.seen.lock(),
            [
                "failing:subscriber_failed".to_string(),
                "panicking:subscriber_panicked".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_subscription_added_during_dispatch_waits_for_next_post() {
        let registry = EventRegistry::new();
        let bus = strict_bus(&registry);

        let inner = registry.clone();
        registry.subscribe(SubscriberFn::new("expander", move |event: &TestEvent| {
            event.touch();
            inner.subscribe(toucher("nested"));
        }));

        let event = TestEvent::default();
        bus.post(&event).await;
        assert_eq!(event.touches(), 1);

        bus.post(&event).await;
        // expander again, plus the subscriber it registered last time
        assert_eq!(event.touches(), 3);
    }

    #[tokio::test]
    async fn test_dispose_mid_dispatch_prevents_invocation() {
        let registry = EventRegistry::new();
        let bus = strict_bus(&registry);

        let victim = registry.subscribe_with(EventConfig::default().with_order(1), toucher("victim"));
        registry.subscribe_with(
            EventConfig::default().with_order(0),
            SubscriberFn::new("assassin", move |_: &TestEvent| victim.dispose()),
        );

        let event = TestEvent::default();
        bus.post(&event).await;
        assert_eq!(event.touches(), 0);
    }

    #[tokio::test]
    async fn test_post_with_no_subscribers_is_noop() {
        let registry = EventRegistry::new();
        let bus = strict_bus(&registry);

        let event = TestEvent::default();
        bus.post(&event).await;
        bus.post_at(&event, Some(7)).await;
        assert_eq!(event.touches(), 0);
    }
}
