mod ids;

pub use ids::{DebateId, DebateIdParseError, UserId};
