use serde::{Deserialize, Serialize};

use ade_common::UserId;

use crate::db_types::{Debate, DebateEntry, DebateStage, Position};

/// A debate together with its entries in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateWithEntries {
    pub debate: Debate,
    pub entries: Vec<DebateEntry>,
}

/// The stage state machine, computed from a debate's stored entries.
///
/// The entry list is the single source of truth for progression: a stage is complete when both
/// positions have an entry for it, the current stage is the first incomplete one in play order,
/// and the debate is finished once no incomplete stage remains. `DebateProgress` does no I/O, so
/// the same logic serves the api layer and the backends' transactional write paths.
#[derive(Debug, Clone)]
pub struct DebateProgress {
    entries: Vec<DebateEntry>,
}

impl DebateProgress {
    pub fn new(entries: Vec<DebateEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[DebateEntry] {
        &self.entries
    }

    /// The entry occupying the given `(stage, position)` slot, if the slot is filled.
    pub fn entry_for(&self, stage: DebateStage, position: Position) -> Option<&DebateEntry> {
        self.entries.iter().find(|e| e.stage == stage && e.position == position)
    }

    /// A stage is complete iff entries exist for both positions at that stage.
    pub fn is_stage_complete(&self, stage: DebateStage) -> bool {
        self.entry_for(stage, Position::Favor).is_some() && self.entry_for(stage, Position::Against).is_some()
    }

    /// The first stage, in play order, that is not yet complete. `None` means every stage is
    /// complete and the debate is finished.
    pub fn current_stage(&self) -> Option<DebateStage> {
        DebateStage::ALL.into_iter().find(|stage| !self.is_stage_complete(*stage))
    }

    pub fn is_finished(&self) -> bool {
        self.current_stage().is_none()
    }

    /// A user may submit iff they are a participant, the debate is not finished, and their
    /// position has no entry at the current stage yet.
    pub fn is_users_turn(&self, debate: &Debate, user_id: &UserId) -> bool {
        let Some(position) = debate.position_of(user_id) else {
            return false;
        };
        match self.current_stage() {
            Some(stage) => self.entry_for(stage, position).is_none(),
            None => false,
        }
    }

    /// The entry a participant holding `own_position` responds to at the given stage: the
    /// opposing position's entry from the immediately preceding stage. `None` for the intro
    /// stage, and `None` while the opponent has not filled that slot.
    pub fn entry_to_refute(&self, stage: DebateStage, own_position: Position) -> Option<&DebateEntry> {
        let preceding = stage.preceding()?;
        self.entry_for(preceding, own_position.opposite())
    }
}

#[cfg(test)]
mod test {
    use ade_common::DebateId;
    use chrono::Utc;

    use super::*;
    use crate::db_types::DebateStatusType;

    fn debate() -> Debate {
        Debate {
            id: DebateId(7),
            title: "AI ethics".to_string(),
            description: String::new(),
            author_user_id: None,
            participant_favor: UserId::from("alice"),
            participant_contra: UserId::from("bob"),
            status: DebateStatusType::Pending,
            category: Some("matchmaking".to_string()),
            match_key: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn entry(id: i64, stage: DebateStage, position: Position) -> DebateEntry {
        let user = match position {
            Position::Favor => "alice",
            Position::Against => "bob",
        };
        DebateEntry {
            id,
            debate_id: DebateId(7),
            user_id: UserId::from(user),
            stage,
            position,
            content: format!("entry {id}"),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_debate_starts_at_intro() {
        let progress = DebateProgress::new(vec![]);
        assert_eq!(progress.current_stage(), Some(DebateStage::Intro));
        assert!(!progress.is_stage_complete(DebateStage::Intro));
        assert!(!progress.is_finished());
    }

    #[test]
    fn stage_completes_only_with_both_positions() {
        let progress = DebateProgress::new(vec![entry(1, DebateStage::Intro, Position::Favor)]);
        assert!(!progress.is_stage_complete(DebateStage::Intro));
        assert_eq!(progress.current_stage(), Some(DebateStage::Intro));

        let progress = DebateProgress::new(vec![
            entry(1, DebateStage::Intro, Position::Favor),
            entry(2, DebateStage::Intro, Position::Against),
        ]);
        assert!(progress.is_stage_complete(DebateStage::Intro));
        assert_eq!(progress.current_stage(), Some(DebateStage::Rebuttal1));
    }

    #[test]
    fn turn_alternates_within_a_stage() {
        let debate = debate();
        let progress = DebateProgress::new(vec![entry(1, DebateStage::Intro, Position::Favor)]);
        assert!(!progress.is_users_turn(&debate, &UserId::from("alice")));
        assert!(progress.is_users_turn(&debate, &UserId::from("bob")));
        // outsiders never get a turn
        assert!(!progress.is_users_turn(&debate, &UserId::from("carol")));
    }

    #[test]
    fn finished_debate_has_no_turns() {
        let mut entries = Vec::new();
        let mut id = 0;
        for stage in DebateStage::ALL {
            for position in [Position::Favor, Position::Against] {
                id += 1;
                entries.push(entry(id, stage, position));
            }
        }
        let progress = DebateProgress::new(entries);
        assert!(progress.is_finished());
        let debate = debate();
        assert!(!progress.is_users_turn(&debate, &UserId::from("alice")));
        assert!(!progress.is_users_turn(&debate, &UserId::from("bob")));
    }

    #[test]
    fn refutation_targets_the_preceding_stage() {
        let entries = vec![
            entry(1, DebateStage::Intro, Position::Favor),
            entry(2, DebateStage::Intro, Position::Against),
            entry(3, DebateStage::Rebuttal1, Position::Favor),
            entry(4, DebateStage::Rebuttal1, Position::Against),
        ];
        let progress = DebateProgress::new(entries);
        // nothing precedes the intro
        assert!(progress.entry_to_refute(DebateStage::Intro, Position::Favor).is_none());
        // at rebuttal 1, favor refutes the against intro
        let target = progress.entry_to_refute(DebateStage::Rebuttal1, Position::Favor).unwrap();
        assert_eq!(target.stage, DebateStage::Intro);
        assert_eq!(target.position, Position::Against);
        // at rebuttal 2, against refutes the favor entry from rebuttal 1
        let target = progress.entry_to_refute(DebateStage::Rebuttal2, Position::Against).unwrap();
        assert_eq!(target.stage, DebateStage::Rebuttal1);
        assert_eq!(target.position, Position::Favor);
        // conclusion refutes rebuttal 2, which has no entries yet
        assert!(progress.entry_to_refute(DebateStage::Conclusion, Position::Favor).is_none());
    }
}
