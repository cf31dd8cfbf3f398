//! # Example: demo
//!
//! Minimal end-to-end walkthrough.
//!
//! Shows how to:
//! - Define an [`Event`] type.
//! - Register a closure-backed subscriber ([`SubscriberFn`]) and a manual
//!   [`Subscribe`] implementation.
//! - Post events through [`SimpleEventBus`] and dispose a subscription.
//!
//! ## Run
//! ```bash
//! cargo run --example demo
//! ```

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use evbus::{Event, EventBus, EventRegistry, SimpleEventBus, Subscribe, SubscriberError, SubscriberFn};

/// A user signed up.
#[derive(Debug)]
struct UserRegistered {
    name: String,
}

impl Event for UserRegistered {
    fn as_any(&self) -> &(dyn Any + Send + Sync) {
        self
    }
}

/// Counts registrations; in real life you could export metrics,
/// ship logs, or trigger alerts.
#[derive(Default)]
struct RegistrationCounter {
    total: AtomicU64,
}

#[async_trait]
impl Subscribe<UserRegistered> for RegistrationCounter {
    async fn on_event(&self, event: &UserRegistered) -> Result<(), SubscriberError> {
        let total = self.total.fetch_add(1, Ordering::Relaxed) + 1;
        println!("[counter] {} registered ({total} total)", event.name);
        Ok(())
    }

    fn name(&self) -> &str {
        "counter"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let registry = EventRegistry::new();

    registry.subscribe(RegistrationCounter::default());
    let greeter = registry.subscribe(SubscriberFn::new("greeter", |event: &UserRegistered| {
        println!("[greeter] welcome, {}!", event.name);
    }));

    let bus = SimpleEventBus::new(registry.clone());

    bus.post(&UserRegistered {
        name: "ada".to_string(),
    })
    .await;

    // The greeter goes away; the counter keeps running.
    greeter.dispose();

    bus.post(&UserRegistered {
        name: "grace".to_string(),
    })
    .await;

    println!("live subscriptions: {}", registry.len());
    Ok(())
}
