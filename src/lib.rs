//! # a3s-pubsub
//!
//! In-process publish/subscribe registry for the A3S ecosystem.
//!
//! ## Overview
//!
//! Callers register callbacks under named subscriptions, publish to one or
//! more names with a list of JSON arguments, and unsubscribe later using the
//! opaque handle returned from `subscribe`.
//!
//! ## Quick Start
//!
//! ```rust
//! use a3s_pubsub::{Callback, PubSub};
//!
//! # async fn example() {
//! let pubsub = PubSub::new();
//!
//! let subscribed = pubsub.subscribe(
//!     "market.forex",
//!     Callback::new(|args| println!("received {:?}", args)),
//! );
//!
//! // Callbacks run on the tokio runtime after publish returns;
//! // each receives [7.35, "market.forex"]
//! let scheduled = pubsub.publish("market.forex", vec![serde_json::json!(7.35)]);
//! assert_eq!(scheduled, 1);
//!
//! if let Some(handle) = subscribed.as_handle() {
//!     pubsub.unsubscribe_handle(handle);
//! }
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **PubSub** — the subscription table and its operations
//! - **Subscriptions** / **Callbacks** — accepted argument shapes
//! - **Handle** — capability for one (subscription, callback) registration
//! - **global** — optional process-wide default registry

pub mod config;
pub mod error;
pub mod global;
pub mod registry;
pub mod types;

/// Version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export core types
pub use config::PubSubConfig;
pub use error::{PubSubError, Result};
pub use registry::PubSub;
pub use types::{is_callable, is_valid_name, Callback, Callbacks, Handle, Subscribed, Subscriptions};
