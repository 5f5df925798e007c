//! Argument and handle types for the a3s-pubsub registry
//!
//! Callers may address subscriptions by a single name, a list of names or an
//! opaque handle returned from a prior subscribe call. Callbacks are passed
//! singly or as a list parallel to the names.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type CallbackFn = dyn Fn(&[Value]) + Send + Sync + 'static;

/// A subscriber callback
///
/// Receives the published arguments followed by the joined subscription
/// names. Two `Callback`s are equal only when they share the same
/// underlying closure, so clone a `Callback` to refer to it again.
#[derive(Clone)]
pub struct Callback(Arc<CallbackFn>);

impl Callback {
    /// Wrap a closure as a callback
    pub fn new(f: impl Fn(&[Value]) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invoke the callback with the given arguments
    pub fn call(&self, args: &[Value]) {
        (self.0)(args)
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0) as *const ()
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for Callback {}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", self.addr())
    }
}

/// Opaque token for one (subscription, callback) registration
///
/// Only a `PubSub` registry can mint a handle. Any registry accepts a live
/// handle and resolves it to its subscription name. A failed subscribe call
/// returns the error handle, which every registry operation rejects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Handle {
    registration: Option<Registration>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Registration {
    subscription: String,
    callback: Callback,
}

impl Handle {
    pub(crate) fn error() -> Self {
        Self { registration: None }
    }

    pub(crate) fn mint(subscription: String, callback: Callback) -> Self {
        Self {
            registration: Some(Registration {
                subscription,
                callback,
            }),
        }
    }

    /// True if this is the error handle returned by a failed subscribe
    pub fn is_error(&self) -> bool {
        self.registration.is_none()
    }

    /// Subscription name this handle refers to
    pub fn subscription(&self) -> Option<&str> {
        self.registration.as_ref().map(|r| r.subscription.as_str())
    }

    /// Callback this handle refers to
    pub fn callback(&self) -> Option<&Callback> {
        self.registration.as_ref().map(|r| &r.callback)
    }
}

/// Result of a subscribe call
///
/// `One` is returned when a single name and a single callback were passed,
/// `Many` when parallel lists were passed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Subscribed {
    One(Handle),
    Many(Vec<Handle>),
}

impl Subscribed {
    /// True if the subscribe call registered nothing
    pub fn is_error(&self) -> bool {
        match self {
            Subscribed::One(handle) => handle.is_error(),
            Subscribed::Many(handles) => handles.len() == 1 && handles[0].is_error(),
        }
    }

    /// The single handle of a scalar subscribe call
    pub fn as_handle(&self) -> Option<&Handle> {
        match self {
            Subscribed::One(handle) => Some(handle),
            Subscribed::Many(_) => None,
        }
    }

    /// All returned handles, in registration order
    pub fn handles(&self) -> &[Handle] {
        match self {
            Subscribed::One(handle) => std::slice::from_ref(handle),
            Subscribed::Many(handles) => handles,
        }
    }

    pub fn into_handles(self) -> Vec<Handle> {
        match self {
            Subscribed::One(handle) => vec![handle],
            Subscribed::Many(handles) => handles,
        }
    }
}

/// Which subscriptions an operation addresses
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Subscriptions {
    /// A single subscription name
    Name(String),
    /// An ordered list of subscription names
    Names(Vec<String>),
    /// The subscription a handle was minted for
    Handle(Handle),
}

impl From<&str> for Subscriptions {
    fn from(name: &str) -> Self {
        Subscriptions::Name(name.to_string())
    }
}

impl From<String> for Subscriptions {
    fn from(name: String) -> Self {
        Subscriptions::Name(name)
    }
}

impl From<Vec<String>> for Subscriptions {
    fn from(names: Vec<String>) -> Self {
        Subscriptions::Names(names)
    }
}

impl From<Vec<&str>> for Subscriptions {
    fn from(names: Vec<&str>) -> Self {
        Subscriptions::Names(names.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Subscriptions {
    fn from(names: &[&str]) -> Self {
        Subscriptions::Names(names.iter().map(|n| n.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Subscriptions {
    fn from(names: [&str; N]) -> Self {
        Subscriptions::Names(names.iter().map(|n| n.to_string()).collect())
    }
}

impl From<Handle> for Subscriptions {
    fn from(handle: Handle) -> Self {
        Subscriptions::Handle(handle)
    }
}

impl From<&Handle> for Subscriptions {
    fn from(handle: &Handle) -> Self {
        Subscriptions::Handle(handle.clone())
    }
}

/// Callbacks passed alongside the subscription names
///
/// A `None` entry in `Many` stands for a value that is not callable; the
/// registry skips it together with the name at the same index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Callbacks {
    One(Callback),
    Many(Vec<Option<Callback>>),
    /// No callbacks argument (e.g. when unsubscribing by handle)
    Absent,
}

impl From<Callback> for Callbacks {
    fn from(callback: Callback) -> Self {
        Callbacks::One(callback)
    }
}

impl From<&Callback> for Callbacks {
    fn from(callback: &Callback) -> Self {
        Callbacks::One(callback.clone())
    }
}

impl From<Vec<Callback>> for Callbacks {
    fn from(callbacks: Vec<Callback>) -> Self {
        Callbacks::Many(callbacks.into_iter().map(Some).collect())
    }
}

impl From<Vec<Option<Callback>>> for Callbacks {
    fn from(callbacks: Vec<Option<Callback>>) -> Self {
        Callbacks::Many(callbacks)
    }
}

/// True if `name` is non-empty after trimming whitespace
pub fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty()
}

/// True if a callback is present
pub fn is_callable(callback: Option<&Callback>) -> bool {
    callback.is_some()
}
