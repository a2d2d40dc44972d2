//! Cheddit event bus and push notification delivery.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`] -- the domain events published after a write commits.
//! - [`delivery`] -- the [`PushTransport`] seam and its Web Push implementation.
//! - [`NotificationDispatcher`] -- background task that turns new-query events
//!   into best-effort pushes to the document owner.

pub mod bus;
pub mod delivery;
pub mod dispatcher;

pub use bus::{EventBus, PlatformEvent, QueryCreated};
pub use delivery::web_push::WebPushTransport;
pub use delivery::{PushError, PushTransport};
pub use dispatcher::{DispatchOutcome, NotificationDispatcher};
