//! # Agora Debate Engine
//!
//! The Agora Debate Engine is the core of a peer debate platform: users declare stances on
//! topics, a matchmaker pairs opposing users into debates, and a stage state machine walks each
//! debate through an introduction, two rebuttals and a conclusion with strict turn alternation.
//! This library contains that core logic only; it is UI- and transport-agnostic.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@traits`] and the SQLite backend). Backends implement
//!    the traits in [`mod@traits`] to act as a store for the engine. You should never need to
//!    access the database directly; use the public API instead. The exception is the data types
//!    used in the database, which are defined in the `db_types` module and are public.
//! 2. The engine public API ([`MatchmakerApi`], [`MatchScheduler`], [`DebateFlowApi`]). This
//!    provides the public-facing functionality: searching for opponents, and submitting and
//!    reading debate entries.
//!
//! The engine also provides a set of events that can be subscribed to. These events are emitted
//! when certain actions occur within the engine. For example, when the matchmaker draws a user
//! into a new debate a `DebateCreatedEvent` is emitted, which is where a push-notification
//! service hooks in.
mod ade_api;
pub mod db_types;
pub mod events;
pub mod helpers;
mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use ade_api::{
    debate_flow_api::DebateFlowApi,
    debate_objects::{DebateProgress, DebateWithEntries},
    errors::MatchmakerError,
    match_objects::{MatchOutcome, MatchResult},
    match_scheduler::{MatchScheduler, DEFAULT_SEARCH_PERIOD},
    matchmaker_api::MatchmakerApi,
};
pub use traits::{
    AcceptedEntry,
    DebateApiError,
    DebateGatewayDatabase,
    DebateManagement,
    StanceApiError,
    StanceManagement,
    SubmitOutcome,
    SubmitRejection,
};
