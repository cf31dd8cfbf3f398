//! # Example: priorities
//!
//! Demonstrates dispatch ordering and widened delivery.
//!
//! Shows how to:
//! - Control invocation order with [`EventConfig::with_order`] (lower runs
//!   earlier, ties run in registration order).
//! - Widen an event to another type with [`Event::views`] so subscribers
//!   of the embedded type observe it too.
//! - Keep a subscription out of widened deliveries with
//!   [`EventConfig::with_exact`].
//!
//! ## Run
//! ```bash
//! cargo run --example priorities
//! ```

use std::any::Any;

use evbus::{Event, EventBus, EventConfig, EventRegistry, EventView, SimpleEventBus, SubscriberFn};

/// A job finished, successfully or not.
#[derive(Debug, Default)]
struct JobFinished {
    job: String,
}

impl Event for JobFinished {
    fn as_any(&self) -> &(dyn Any + Send + Sync) {
        self
    }
}

/// A job failed. Also delivered to [`JobFinished`] subscribers through its
/// embedded view.
#[derive(Debug, Default)]
struct JobFailed {
    finished: JobFinished,
    error: String,
}

impl Event for JobFailed {
    fn as_any(&self) -> &(dyn Any + Send + Sync) {
        self
    }

    fn views(&self) -> Vec<EventView<'_>> {
        vec![EventView::of(&self.finished)]
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let registry = EventRegistry::new();

    // Runs before everything else on JobFinished deliveries.
    registry.subscribe_with(
        EventConfig::default().with_order(-10),
        SubscriberFn::new("audit", |event: &JobFinished| {
            println!("[audit]    finished: {}", event.job);
        }),
    );

    // Default order; receives both direct posts and widened views.
    registry.subscribe(SubscriberFn::new("cleanup", |event: &JobFinished| {
        println!("[cleanup]  releasing resources of {}", event.job);
    }));

    // Exact: never sees JobFailed's widened view.
    registry.subscribe_with(
        EventConfig::default().with_exact(true).with_order(10),
        SubscriberFn::new("archiver", |event: &JobFinished| {
            println!("[archiver] archiving {} (direct posts only)", event.job);
        }),
    );

    registry.subscribe(SubscriberFn::new("pager", |event: &JobFailed| {
        println!("[pager]    {} failed: {}", event.finished.job, event.error);
    }));

    let bus = SimpleEventBus::new(registry.clone());

    println!("--- posting JobFinished ---");
    bus.post(&JobFinished {
        job: "backup".to_string(),
    })
    .await;

    println!("--- posting JobFailed (widens to JobFinished) ---");
    bus.post(&JobFailed {
        finished: JobFinished {
            job: "reindex".to_string(),
        },
        error: "disk full".to_string(),
    })
    .await;

    Ok(())
}
