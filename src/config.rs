//! # Per-subscription dispatch configuration.
//!
//! Provides [`EventConfig`] — the settings attached to a subscription at
//! registration time. The bus consults these settings before every
//! invocation, so configuration is evaluated against the *current* state of
//! the event (a subscriber earlier in the same dispatch may have cancelled
//! it).
//!
//! ## Field semantics
//! - `order`: signed dispatch priority; lower values run earlier
//! - `accepts_cancelled`: whether the subscription still receives events
//!   that have been cancelled
//! - `exact`: whether the subscription only accepts events posted under
//!   their own type, rejecting widened views
//!
//! ## Example
//! ```rust
//! use evbus::EventConfig;
//!
//! let config = EventConfig::default()
//!     .with_order(-10)
//!     .with_accepts_cancelled(false);
//!
//! assert_eq!(config.order, -10);
//! assert!(!config.accepts_cancelled);
//! assert!(!config.exact);
//! ```

/// Configuration applied to a single subscription.
///
/// All fields are public; prefer [`EventConfig::default`] plus the
/// with-style setters over struct literals so new fields pick up their
/// defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventConfig {
    /// Dispatch priority. Lower values run earlier; ties run in
    /// registration order. Default: [`EventConfig::DEFAULT_ORDER`].
    pub order: i32,

    /// Whether the subscription receives events that report themselves as
    /// cancelled. Checked immediately before each invocation, so a
    /// cancellation earlier in the same dispatch suppresses delivery.
    /// Default: [`EventConfig::DEFAULT_ACCEPTS_CANCELLED`].
    pub accepts_cancelled: bool,

    /// Whether the subscription only accepts events delivered under their
    /// own concrete type. An exact subscription never receives widened
    /// views (see [`Event::views`](crate::Event::views)).
    /// Default: [`EventConfig::DEFAULT_EXACT`].
    pub exact: bool,
}

impl EventConfig {
    /// The default value for [`EventConfig::order`].
    pub const DEFAULT_ORDER: i32 = 0;
    /// The default value for [`EventConfig::accepts_cancelled`].
    pub const DEFAULT_ACCEPTS_CANCELLED: bool = true;
    /// The default value for [`EventConfig::exact`].
    pub const DEFAULT_EXACT: bool = false;

    /// Creates a configuration with every field given explicitly.
    pub fn new(order: i32, accepts_cancelled: bool, exact: bool) -> Self {
        Self {
            order,
            accepts_cancelled,
            exact,
        }
    }

    /// Sets the dispatch priority.
    #[inline]
    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Sets whether cancelled events are accepted.
    #[inline]
    #[must_use]
    pub fn with_accepts_cancelled(mut self, accepts_cancelled: bool) -> Self {
        self.accepts_cancelled = accepts_cancelled;
        self
    }

    /// Sets whether only exact-type deliveries are accepted.
    #[inline]
    #[must_use]
    pub fn with_exact(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }
}

impl Default for EventConfig {
    /// Default configuration:
    ///
    /// - `order = 0`
    /// - `accepts_cancelled = true`
    /// - `exact = false`
    fn default() -> Self {
        Self {
            order: Self::DEFAULT_ORDER,
            accepts_cancelled: Self::DEFAULT_ACCEPTS_CANCELLED,
            exact: Self::DEFAULT_EXACT,
        }
    }
}
