//! Subscription registry
//!
//! `PubSub` owns the table of subscription name → ordered callbacks and
//! implements subscribe, unsubscribe, publish and clear on top of it.
//! Publishing is deferred: every matching callback is scheduled as its own
//! tokio task and runs after the publishing call returns.

use crate::config::PubSubConfig;
use crate::error::{PubSubError, Result};
use crate::types::{is_valid_name, Callback, Callbacks, Handle, Subscribed, Subscriptions};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::runtime::Handle as RuntimeHandle;
use uuid::Uuid;

type Table = HashMap<String, Vec<Callback>>;

/// In-process publish/subscribe registry
///
/// Thread-safe via an internal lock. The lock is never held while callbacks
/// run, so callbacks may call back into the registry.
pub struct PubSub {
    id: Uuid,
    config: PubSubConfig,

    /// Runtime used to schedule callbacks; falls back to the caller's runtime
    runtime: Option<RuntimeHandle>,

    /// Subscription name → callbacks in registration order
    subscribers: RwLock<Table>,
}

impl PubSub {
    /// Create an empty registry with the default configuration
    pub fn new() -> Self {
        Self::build(PubSubConfig::default())
    }

    /// Create an empty registry from a validated configuration
    pub fn with_config(config: PubSubConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: PubSubConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            runtime: None,
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    /// Schedule callbacks on `runtime` instead of the caller's runtime
    ///
    /// Lets synchronous code publish without entering a runtime context.
    pub fn with_runtime(mut self, runtime: RuntimeHandle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Identifier of this registry
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &PubSubConfig {
        &self.config
    }

    /// Version of the crate
    pub fn version(&self) -> &'static str {
        crate::VERSION
    }

    // Poisoning only happens if a thread panicked while holding the lock;
    // the table is never left half-updated, so keep using it.
    fn read(&self) -> RwLockReadGuard<'_, Table> {
        self.subscribers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Table> {
        self.subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// True if `handle` is a live handle, i.e. not the error handle
    ///
    /// Handles are not tied to the registry that minted them: a handle
    /// passed to another registry addresses the same subscription name there.
    pub fn is_handle(&self, handle: &Handle) -> bool {
        handle.subscription().is_some_and(is_valid_name)
            && handle.callback().is_some()
    }

    /// Resolve a subscriptions argument to an ordered list of names
    ///
    /// Returns `None` when the argument addresses nothing resolvable: an
    /// invalid name or the error handle.
    /// An empty list resolves to `Some(vec![])`.
    pub fn normalize(&self, subscriptions: &Subscriptions) -> Option<Vec<String>> {
        match subscriptions {
            Subscriptions::Handle(handle) if self.is_handle(handle) => {
                handle.subscription().map(|name| vec![name.to_string()])
            }
            Subscriptions::Name(name) if is_valid_name(name) => Some(vec![name.clone()]),
            Subscriptions::Names(names) => Some(names.clone()),
            _ => None,
        }
    }

    /// True if `name` has at least one callback registered
    pub fn is_subscribed(&self, name: &str) -> bool {
        self.subscriber_count(name) > 0
    }

    /// Number of callbacks registered under `name`
    pub fn subscriber_count(&self, name: &str) -> usize {
        if !is_valid_name(name) {
            return 0;
        }
        self.read().get(name).map_or(0, Vec::len)
    }

    /// Register callbacks under subscription names
    ///
    /// Accepts a single name with a single callback, which yields
    /// `Subscribed::One`, or parallel lists of names and callbacks, which
    /// yield `Subscribed::Many`. List entries with an invalid name or a
    /// missing callback are skipped, as are (name, callback) pairs that are
    /// already registered. If nothing was registered the error handle is
    /// returned instead.
    pub fn subscribe(
        &self,
        subscriptions: impl Into<Subscriptions>,
        callbacks: impl Into<Callbacks>,
    ) -> Subscribed {
        let (names, callbacks, scalar) = match (subscriptions.into(), callbacks.into()) {
            (Subscriptions::Name(name), Callbacks::One(callback)) if is_valid_name(&name) => {
                (vec![name], vec![Some(callback)], true)
            }
            (Subscriptions::Names(names), Callbacks::Many(callbacks))
                if names.len() == callbacks.len() =>
            {
                (names, callbacks, false)
            }
            _ => {
                tracing::debug!(
                    registry = %self.config.label,
                    "Subscribe rejected: arguments are not a name/callback pair or equal-length lists"
                );
                return Subscribed::Many(vec![Handle::error()]);
            }
        };

        let mut handles = Vec::with_capacity(names.len());
        {
            let mut table = self.write();
            for (name, callback) in names.into_iter().zip(callbacks) {
                let Some(callback) = callback else {
                    continue;
                };
                if !is_valid_name(&name) {
                    continue;
                }

                let registered = table.entry(name.clone()).or_default();
                if registered.contains(&callback) {
                    continue;
                }
                registered.push(callback.clone());
                handles.push(Handle::mint(name, callback));
            }
        }

        tracing::debug!(
            registry = %self.config.label,
            subscriptions = ?handles.iter().filter_map(Handle::subscription).collect::<Vec<_>>(),
            "Subscribed"
        );

        if handles.is_empty() {
            return if scalar {
                Subscribed::One(Handle::error())
            } else {
                Subscribed::Many(vec![Handle::error()])
            };
        }

        if scalar {
            Subscribed::One(handles.swap_remove(0))
        } else {
            Subscribed::Many(handles)
        }
    }

    /// Remove callbacks from subscription names
    ///
    /// Accepts a handle (the callbacks argument is then ignored), a single
    /// name with a single callback, or parallel lists. Returns `false` for
    /// the error handle and for mismatched arguments; otherwise `true`,
    /// whether or not anything was actually registered.
    pub fn unsubscribe(
        &self,
        subscriptions: impl Into<Subscriptions>,
        callbacks: impl Into<Callbacks>,
    ) -> bool {
        let (names, callbacks) = match (subscriptions.into(), callbacks.into()) {
            (Subscriptions::Handle(handle), _) if handle.is_error() => {
                tracing::debug!(
                    registry = %self.config.label,
                    "Unsubscribe rejected: error handle"
                );
                return false;
            }
            (Subscriptions::Handle(handle), _) if self.is_handle(&handle) => {
                match (handle.subscription(), handle.callback()) {
                    (Some(name), Some(callback)) => {
                        (vec![name.to_string()], vec![Some(callback.clone())])
                    }
                    _ => return false,
                }
            }
            (Subscriptions::Name(name), Callbacks::One(callback)) if is_valid_name(&name) => {
                (vec![name], vec![Some(callback)])
            }
            (Subscriptions::Names(names), Callbacks::Many(callbacks))
                if names.len() == callbacks.len() =>
            {
                (names, callbacks)
            }
            _ => return false,
        };

        let mut removed = 0usize;
        {
            let mut table = self.write();
            for (name, callback) in names.iter().zip(callbacks) {
                let Some(callback) = callback else {
                    continue;
                };
                let Some(registered) = table.get_mut(name.as_str()) else {
                    continue;
                };
                if let Some(index) = registered.iter().position(|c| *c == callback) {
                    registered.remove(index);
                    removed += 1;
                }
            }
        }

        tracing::debug!(
            registry = %self.config.label,
            subscriptions = ?names,
            removed,
            "Unsubscribed"
        );

        true
    }

    /// Remove the single registration a handle refers to
    pub fn unsubscribe_handle(&self, handle: &Handle) -> bool {
        self.unsubscribe(handle, Callbacks::Absent)
    }

    /// Publish to subscriptions, returning the number of callbacks scheduled
    ///
    /// Each callback receives `args` followed by the resolved subscription
    /// names joined with the configured separator. When no runtime is
    /// available nothing is scheduled and 0 is returned.
    pub fn publish(&self, subscriptions: impl Into<Subscriptions>, args: Vec<Value>) -> usize {
        match self.try_publish(subscriptions, args) {
            Ok(scheduled) => scheduled,
            Err(e) => {
                tracing::warn!(
                    registry = %self.config.label,
                    error = %e,
                    "Publish dropped"
                );
                0
            }
        }
    }

    /// Publish to subscriptions, failing if callbacks cannot be scheduled
    pub fn try_publish(
        &self,
        subscriptions: impl Into<Subscriptions>,
        mut args: Vec<Value>,
    ) -> Result<usize> {
        let Some(names) = self.normalize(&subscriptions.into()) else {
            return Ok(0);
        };
        let joined = names.join(self.config.separator.as_str());

        let callbacks: Vec<Callback> = {
            let table = self.read();
            names
                .iter()
                .filter_map(|name| table.get(name.as_str()))
                .flatten()
                .cloned()
                .collect()
        };

        if callbacks.is_empty() {
            return Ok(0);
        }

        let runtime = match &self.runtime {
            Some(runtime) => runtime.clone(),
            None => RuntimeHandle::try_current().map_err(|_| PubSubError::NoRuntime {
                subscriptions: joined.clone(),
                pending: callbacks.len(),
            })?,
        };

        args.push(Value::String(joined.clone()));
        let args: Arc<[Value]> = args.into();

        let scheduled = callbacks.len();
        for callback in callbacks {
            let args = Arc::clone(&args);
            // Detached: the registry never awaits or inspects the outcome.
            runtime.spawn(async move { callback.call(&args) });
        }

        tracing::debug!(
            registry = %self.config.label,
            subscriptions = %joined,
            scheduled,
            "Published"
        );

        Ok(scheduled)
    }

    /// Empty the callback lists of the addressed subscriptions
    ///
    /// An argument that does not resolve to a list of names resets the
    /// whole table, like `clear_all`.
    pub fn clear(&self, subscriptions: impl Into<Subscriptions>) {
        let Some(names) = self.normalize(&subscriptions.into()) else {
            self.clear_all();
            return;
        };

        let mut table = self.write();
        for name in &names {
            if let Some(registered) = table.get_mut(name.as_str()) {
                registered.clear();
            }
        }

        tracing::debug!(
            registry = %self.config.label,
            subscriptions = ?names,
            "Subscriptions cleared"
        );
    }

    /// Remove every subscription
    pub fn clear_all(&self) {
        *self.write() = HashMap::new();
        tracing::debug!(registry = %self.config.label, "Registry cleared");
    }
}

impl Default for PubSub {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PubSub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PubSub")
            .field("id", &self.id)
            .field("label", &self.config.label)
            .field("subscriptions", &self.read().len())
            .finish()
    }
}
