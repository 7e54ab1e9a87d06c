use ade_common::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db_types::Debate;

/// Raised when the matchmaker creates a debate. The payload addresses the *opponent* (the user
/// who did not run the search) so a push-notification subscriber can tell them about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateCreatedEvent {
    pub debate: Debate,
    pub target_user: UserId,
    pub topic_name: String,
    pub created_at: DateTime<Utc>,
}

impl DebateCreatedEvent {
    pub fn new(debate: Debate, target_user: UserId, topic_name: String) -> Self {
        Self { debate, target_user, topic_name, created_at: Utc::now() }
    }
}

/// Raised on the searcher's side when a scheduled search attempt lands a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFoundEvent {
    pub user_id: UserId,
    pub debate: Debate,
    pub topic_name: String,
    /// False when the opponent's own search created the debate first.
    pub newly_created: bool,
}

/// Raised when a submission completes the conclusion stage and the debate reaches `Finished`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateFinishedEvent {
    pub debate: Debate,
    pub finished_at: DateTime<Utc>,
}

impl DebateFinishedEvent {
    pub fn new(debate: Debate) -> Self {
        Self { debate, finished_at: Utc::now() }
    }
}

#[cfg(test)]
mod test {
    use ade_common::DebateId;

    use super::*;
    use crate::db_types::DebateStatusType;

    fn debate() -> Debate {
        Debate {
            id: DebateId(3),
            title: "Debate: AI ethics".to_string(),
            description: String::new(),
            author_user_id: Some(UserId::from("alice")),
            participant_favor: UserId::from("alice"),
            participant_contra: UserId::from("bob"),
            status: DebateStatusType::Pending,
            category: Some("matchmaking".to_string()),
            match_key: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn created_event_serialises_as_a_push_payload() {
        let event = DebateCreatedEvent::new(debate(), UserId::from("bob"), "AI ethics".to_string());
        let payload = serde_json::to_value(&event).unwrap();
        assert_eq!(payload["target_user"], "bob");
        assert_eq!(payload["topic_name"], "AI ethics");
        assert_eq!(payload["debate"]["id"], 3);
        assert!(payload["created_at"].is_string());
    }
}
