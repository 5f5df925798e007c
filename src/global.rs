//! Process-wide default registry
//!
//! Thin wrappers over a lazily created `PubSub` for callers that do not
//! need isolated registries. Create a `PubSub` directly for anything else.
//!
//! The default registry has no runtime of its own: outside a tokio runtime
//! [`publish`] schedules nothing and returns 0.

use crate::registry::PubSub;
use crate::types::{Callbacks, Handle, Subscribed, Subscriptions};
use serde_json::Value;
use std::sync::LazyLock;

static DEFAULT_REGISTRY: LazyLock<PubSub> = LazyLock::new(PubSub::new);

/// The shared default registry
pub fn registry() -> &'static PubSub {
    &DEFAULT_REGISTRY
}

/// See [`PubSub::subscribe`]
pub fn subscribe(
    subscriptions: impl Into<Subscriptions>,
    callbacks: impl Into<Callbacks>,
) -> Subscribed {
    registry().subscribe(subscriptions, callbacks)
}

/// See [`PubSub::unsubscribe`]
pub fn unsubscribe(subscriptions: impl Into<Subscriptions>, callbacks: impl Into<Callbacks>) -> bool {
    registry().unsubscribe(subscriptions, callbacks)
}

/// See [`PubSub::unsubscribe_handle`]
pub fn unsubscribe_handle(handle: &Handle) -> bool {
    registry().unsubscribe_handle(handle)
}

/// See [`PubSub::publish`]
pub fn publish(subscriptions: impl Into<Subscriptions>, args: Vec<Value>) -> usize {
    registry().publish(subscriptions, args)
}

/// See [`PubSub::clear`]
pub fn clear(subscriptions: impl Into<Subscriptions>) {
    registry().clear(subscriptions)
}

/// See [`PubSub::clear_all`]
pub fn clear_all() {
    registry().clear_all()
}

/// See [`PubSub::version`]
pub fn get_version() -> &'static str {
    crate::VERSION
}
