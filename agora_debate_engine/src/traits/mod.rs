//! # Backend contracts
//!
//! This module defines the interface contracts that storage *backends* must expose in order to
//! drive the Agora debate engine.
//!
//! ## Stances
//! A stance records a user's declared position on a topic. The matchmaker scans stances to find a
//! user whose position opposes the searcher's on a shared topic.
//!
//! ## Debates
//! A debate is the owning record for a four-stage exchange between two participants. Its entries
//! are the per-stage submissions, and its status only ever moves forward.
//!
//! ## Traits
//! * [`StanceManagement`] provides stance and topic reference-data queries and upserts.
//! * [`DebateManagement`] provides read-side queries over debates and their entries.
//! * [`DebateGatewayDatabase`] defines the highest level of behaviour: idempotent debate creation
//!   and the transactional submit/advance write path.
//!
//! All methods return `Send` futures so backends can be driven from multi-threaded tokio tasks
//! (the match scheduler in particular).
mod data_objects;
mod debate_gateway_database;
mod debate_management;
mod stance_management;

pub use data_objects::{AcceptedEntry, SubmitOutcome, SubmitRejection};
pub use debate_gateway_database::DebateGatewayDatabase;
pub use debate_management::{DebateApiError, DebateManagement};
pub use stance_management::{StanceApiError, StanceManagement};
