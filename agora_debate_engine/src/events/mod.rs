//! Stateless async pub-sub hooks.
//!
//! The engine never pushes notifications itself; it publishes events and lets subscribers react.
//! The outer notification service registers a hook for [`DebateCreatedEvent`] to tell a user they
//! have been drawn into a debate, and the searching client registers one for [`MatchFoundEvent`].
//! Publishing is fire-and-forget: a failed or missing subscriber is logged and swallowed, and
//! never fails the operation that raised the event.
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::{DebateCreatedEvent, DebateFinishedEvent, MatchFoundEvent};
pub use hooks::{EventHandlers, EventHooks, EventProducers};
