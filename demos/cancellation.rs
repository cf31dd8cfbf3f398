//! # Example: cancellation
//!
//! A small moderation pipeline built on cancellable events.
//!
//! Shows how to:
//! - Embed a [`CancelFlag`] and surface it via [`Event::as_cancellable`].
//! - Cancel an event from an early subscriber so later subscriptions with
//!   `accepts_cancelled = false` are skipped.
//! - Attach the `logging`-gated [`LogSubscriber`] for visibility.
//!
//! ## Run
//! Requires the `logging` feature to export [`LogSubscriber`].
//! ```bash
//! cargo run --example cancellation --features logging
//! ```

use std::any::Any;

use evbus::{
    CancelFlag, Cancellable, Event, EventBus, EventConfig, EventRegistry, LogSubscriber,
    SimpleEventBus, SubscriberFn,
};

/// A chat message arrived and awaits delivery.
#[derive(Debug, Default)]
struct MessagePosted {
    text: String,
    cancel: CancelFlag,
}

impl Event for MessagePosted {
    fn as_any(&self) -> &(dyn Any + Send + Sync) {
        self
    }

    fn as_cancellable(&self) -> Option<&dyn Cancellable> {
        Some(&self.cancel)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let registry = EventRegistry::new();

    // Moderation runs first and may cancel the message.
    registry.subscribe_with(
        EventConfig::default().with_order(-10),
        SubscriberFn::new("moderation", |event: &MessagePosted| {
            if event.text.contains("spam") {
                println!("[moderation] dropping message: {:?}", event.text);
                event.cancel.set(true);
            }
        }),
    );

    // Delivery declines cancelled messages.
    registry.subscribe_with(
        EventConfig::default().with_accepts_cancelled(false),
        SubscriberFn::new("delivery", |event: &MessagePosted| {
            println!("[delivery]   -> {}", event.text);
        }),
    );

    // The log subscriber sees everything, cancelled or not.
    registry.subscribe_with(
        EventConfig::default().with_order(100),
        LogSubscriber::<MessagePosted>::new(),
    );

    let bus = SimpleEventBus::new(registry.clone());

    for text in ["hello there", "buy spam now", "how are you?"] {
        bus.post(&MessagePosted {
            text: text.to_string(),
            cancel: CancelFlag::new(),
        })
        .await;
    }

    Ok(())
}
