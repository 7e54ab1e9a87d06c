//! The public engine APIs.
//!
//! * [`MatchmakerApi`](matchmaker_api::MatchmakerApi) pairs users with opposite stances into
//!   debates.
//! * [`MatchScheduler`](match_scheduler::MatchScheduler) runs the matchmaker as a recurring,
//!   cancellable background task.
//! * [`DebateFlowApi`](debate_flow_api::DebateFlowApi) drives a debate through its four stages.
//! * [`debate_objects`] holds the pure stage-progression logic shared by the api layer and the
//!   backends' transactional write paths.
pub mod debate_flow_api;
pub mod debate_objects;
pub mod errors;
pub mod match_objects;
pub mod match_scheduler;
pub mod matchmaker_api;
