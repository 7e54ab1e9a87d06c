use std::{fmt::Display, str::FromStr};

use ade_common::{DebateId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Unrecognized value: {0}")]
pub struct UnrecognizedValue(String);

impl UnrecognizedValue {
    pub fn new<S: Display>(field: &str, value: S) -> Self {
        Self(format!("{value} is not a valid {field}"))
    }
}

//--------------------------------------      StanceValue     --------------------------------------------------------
/// A user's declared position on a topic. `Neutral` stances are stored, but never matched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum StanceValue {
    Favor,
    Against,
    Neutral,
}

impl StanceValue {
    /// The stance value an opponent must hold. Neutral has no opposite.
    pub fn opposite(self) -> Option<StanceValue> {
        match self {
            StanceValue::Favor => Some(StanceValue::Against),
            StanceValue::Against => Some(StanceValue::Favor),
            StanceValue::Neutral => None,
        }
    }

    /// The debate position this stance maps onto. Neutral maps to none.
    pub fn position(self) -> Option<Position> {
        match self {
            StanceValue::Favor => Some(Position::Favor),
            StanceValue::Against => Some(Position::Against),
            StanceValue::Neutral => None,
        }
    }

    pub fn is_matchable(self) -> bool {
        self != StanceValue::Neutral
    }
}

impl Display for StanceValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StanceValue::Favor => write!(f, "Favor"),
            StanceValue::Against => write!(f, "Against"),
            StanceValue::Neutral => write!(f, "Neutral"),
        }
    }
}

impl FromStr for StanceValue {
    type Err = UnrecognizedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Favor" => Ok(Self::Favor),
            "Against" => Ok(Self::Against),
            "Neutral" => Ok(Self::Neutral),
            s => Err(UnrecognizedValue::new("stance value", s)),
        }
    }
}

//--------------------------------------       Position       --------------------------------------------------------
/// The side a participant argues in a debate. Unlike [`StanceValue`], there is no neutral position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
pub enum Position {
    Favor,
    Against,
}

impl Position {
    pub fn opposite(self) -> Position {
        match self {
            Position::Favor => Position::Against,
            Position::Against => Position::Favor,
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Favor => write!(f, "Favor"),
            Position::Against => write!(f, "Against"),
        }
    }
}

impl FromStr for Position {
    type Err = UnrecognizedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Favor" => Ok(Self::Favor),
            "Against" => Ok(Self::Against),
            s => Err(UnrecognizedValue::new("position", s)),
        }
    }
}

//--------------------------------------      DebateStage     --------------------------------------------------------
/// The four ordered stages of a debate. A stage is complete once both positions have submitted an
/// entry for it, and the debate is finished once all four stages are complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
pub enum DebateStage {
    Intro,
    Rebuttal1,
    Rebuttal2,
    Conclusion,
}

impl DebateStage {
    /// All stages, in play order.
    pub const ALL: [DebateStage; 4] =
        [DebateStage::Intro, DebateStage::Rebuttal1, DebateStage::Rebuttal2, DebateStage::Conclusion];

    pub fn next(self) -> Option<DebateStage> {
        match self {
            DebateStage::Intro => Some(DebateStage::Rebuttal1),
            DebateStage::Rebuttal1 => Some(DebateStage::Rebuttal2),
            DebateStage::Rebuttal2 => Some(DebateStage::Conclusion),
            DebateStage::Conclusion => None,
        }
    }

    /// The stage whose entries this stage responds to. Intro responds to nothing.
    pub fn preceding(self) -> Option<DebateStage> {
        match self {
            DebateStage::Intro => None,
            DebateStage::Rebuttal1 => Some(DebateStage::Intro),
            DebateStage::Rebuttal2 => Some(DebateStage::Rebuttal1),
            DebateStage::Conclusion => Some(DebateStage::Rebuttal2),
        }
    }
}

impl Display for DebateStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DebateStage::Intro => write!(f, "Intro"),
            DebateStage::Rebuttal1 => write!(f, "Rebuttal1"),
            DebateStage::Rebuttal2 => write!(f, "Rebuttal2"),
            DebateStage::Conclusion => write!(f, "Conclusion"),
        }
    }
}

impl FromStr for DebateStage {
    type Err = UnrecognizedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Intro" => Ok(Self::Intro),
            "Rebuttal1" => Ok(Self::Rebuttal1),
            "Rebuttal2" => Ok(Self::Rebuttal2),
            "Conclusion" => Ok(Self::Conclusion),
            s => Err(UnrecognizedValue::new("debate stage", s)),
        }
    }
}

//--------------------------------------    DebateStatusType  --------------------------------------------------------
/// Lifecycle status of a debate. The status only ever moves forward:
/// Pending → Intro → Rebuttal1 → Rebuttal2 → Conclusion → Finished.
///
/// `Pending` is a freshly matched debate with no entries yet. The stage-named statuses track the
/// stage currently being played; completing a stage advances the status to the next stage name,
/// and completing the conclusion moves the debate to `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum DebateStatusType {
    Pending,
    Intro,
    Rebuttal1,
    Rebuttal2,
    Conclusion,
    Finished,
}

impl DebateStatusType {
    /// Position in the forward-only status order. Used to refuse regressions.
    pub fn ordinal(self) -> u8 {
        match self {
            DebateStatusType::Pending => 0,
            DebateStatusType::Intro => 1,
            DebateStatusType::Rebuttal1 => 2,
            DebateStatusType::Rebuttal2 => 3,
            DebateStatusType::Conclusion => 4,
            DebateStatusType::Finished => 5,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == DebateStatusType::Finished
    }

    /// The status a debate holds once the given stage is complete.
    pub fn after_stage(stage: DebateStage) -> DebateStatusType {
        match stage.next() {
            Some(next) => next.into(),
            None => DebateStatusType::Finished,
        }
    }
}

impl From<DebateStage> for DebateStatusType {
    fn from(stage: DebateStage) -> Self {
        match stage {
            DebateStage::Intro => DebateStatusType::Intro,
            DebateStage::Rebuttal1 => DebateStatusType::Rebuttal1,
            DebateStage::Rebuttal2 => DebateStatusType::Rebuttal2,
            DebateStage::Conclusion => DebateStatusType::Conclusion,
        }
    }
}

impl Display for DebateStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DebateStatusType::Pending => write!(f, "Pending"),
            DebateStatusType::Intro => write!(f, "Intro"),
            DebateStatusType::Rebuttal1 => write!(f, "Rebuttal1"),
            DebateStatusType::Rebuttal2 => write!(f, "Rebuttal2"),
            DebateStatusType::Conclusion => write!(f, "Conclusion"),
            DebateStatusType::Finished => write!(f, "Finished"),
        }
    }
}

impl FromStr for DebateStatusType {
    type Err = UnrecognizedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Intro" => Ok(Self::Intro),
            "Rebuttal1" => Ok(Self::Rebuttal1),
            "Rebuttal2" => Ok(Self::Rebuttal2),
            "Conclusion" => Ok(Self::Conclusion),
            "Finished" => Ok(Self::Finished),
            s => Err(UnrecognizedValue::new("debate status", s)),
        }
    }
}

//--------------------------------------        Topic         --------------------------------------------------------
/// Immutable reference data describing something users can take a stance on. Seeded once.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    pub description: String,
}

impl Topic {
    pub fn new<S1: Into<String>, S2: Into<String>>(name: S1, description: S2) -> Self {
        Self { name: name.into(), description: description.into() }
    }
}

//--------------------------------------        Stance        --------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Stance {
    pub id: i64,
    pub user_id: UserId,
    pub topic_name: String,
    pub value: StanceValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewStance {
    pub user_id: UserId,
    pub topic_name: String,
    pub value: StanceValue,
}

impl NewStance {
    pub fn new<S: Into<String>>(user_id: UserId, topic_name: S, value: StanceValue) -> Self {
        Self { user_id, topic_name: topic_name.into(), value }
    }
}

//--------------------------------------        Debate        --------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Debate {
    pub id: DebateId,
    pub title: String,
    pub description: String,
    pub author_user_id: Option<UserId>,
    pub participant_favor: UserId,
    pub participant_contra: UserId,
    pub status: DebateStatusType,
    pub category: Option<String>,
    pub match_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Debate {
    /// The position the given user argues, or `None` if they are not a participant.
    pub fn position_of(&self, user_id: &UserId) -> Option<Position> {
        if *user_id == self.participant_favor {
            Some(Position::Favor)
        } else if *user_id == self.participant_contra {
            Some(Position::Against)
        } else {
            None
        }
    }

    /// The other participant, or `None` if the given user is not a participant.
    pub fn opponent_of(&self, user_id: &UserId) -> Option<&UserId> {
        match self.position_of(user_id)? {
            Position::Favor => Some(&self.participant_contra),
            Position::Against => Some(&self.participant_favor),
        }
    }

    pub fn participant(&self, position: Position) -> &UserId {
        match position {
            Position::Favor => &self.participant_favor,
            Position::Against => &self.participant_contra,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewDebate {
    pub title: String,
    pub description: String,
    pub author_user_id: Option<UserId>,
    pub participant_favor: UserId,
    pub participant_contra: UserId,
    pub category: Option<String>,
    /// When set, debate creation is idempotent on this key.
    pub match_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewDebate {
    pub fn new<S: Into<String>>(title: S, participant_favor: UserId, participant_contra: UserId) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            author_user_id: None,
            participant_favor,
            participant_contra,
            category: None,
            match_key: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_author(mut self, author: UserId) -> Self {
        self.author_user_id = Some(author);
        self
    }

    pub fn with_category<S: Into<String>>(mut self, category: S) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_match_key<S: Into<String>>(mut self, key: S) -> Self {
        self.match_key = Some(key.into());
        self
    }
}

//--------------------------------------      DebateEntry     --------------------------------------------------------
/// One participant's submission for one stage of a debate. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct DebateEntry {
    pub id: i64,
    pub debate_id: DebateId,
    pub user_id: UserId,
    pub stage: DebateStage,
    pub position: Position,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A submission request. The stage and position are not supplied by the caller; the engine derives
/// them from the debate's participants and its existing entries at write time.
#[derive(Debug, Clone)]
pub struct NewDebateEntry {
    pub debate_id: DebateId,
    pub user_id: UserId,
    pub content: String,
}

impl NewDebateEntry {
    pub fn new<S: Into<String>>(debate_id: DebateId, user_id: UserId, content: S) -> Self {
        Self { debate_id, user_id, content: content.into() }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn stage_order_is_fixed() {
        assert_eq!(DebateStage::Intro.next(), Some(DebateStage::Rebuttal1));
        assert_eq!(DebateStage::Rebuttal1.next(), Some(DebateStage::Rebuttal2));
        assert_eq!(DebateStage::Rebuttal2.next(), Some(DebateStage::Conclusion));
        assert_eq!(DebateStage::Conclusion.next(), None);
        assert_eq!(DebateStage::Intro.preceding(), None);
        assert_eq!(DebateStage::Conclusion.preceding(), Some(DebateStage::Rebuttal2));
    }

    #[test]
    fn status_after_stage_completion() {
        assert_eq!(DebateStatusType::after_stage(DebateStage::Intro), DebateStatusType::Rebuttal1);
        assert_eq!(DebateStatusType::after_stage(DebateStage::Conclusion), DebateStatusType::Finished);
        assert!(DebateStatusType::Finished.is_terminal());
        assert!(!DebateStatusType::Conclusion.is_terminal());
    }

    #[test]
    fn status_ordinals_are_monotonic() {
        let statuses = [
            DebateStatusType::Pending,
            DebateStatusType::Intro,
            DebateStatusType::Rebuttal1,
            DebateStatusType::Rebuttal2,
            DebateStatusType::Conclusion,
            DebateStatusType::Finished,
        ];
        for pair in statuses.windows(2) {
            assert!(pair[0].ordinal() < pair[1].ordinal());
        }
    }

    #[test]
    fn neutral_has_no_opposite() {
        assert_eq!(StanceValue::Favor.opposite(), Some(StanceValue::Against));
        assert_eq!(StanceValue::Against.opposite(), Some(StanceValue::Favor));
        assert_eq!(StanceValue::Neutral.opposite(), None);
        assert_eq!(StanceValue::Neutral.position(), None);
    }

    #[test]
    fn unrecognized_values_are_errors_not_defaults() {
        assert!("Maybe".parse::<StanceValue>().is_err());
        assert!("Rebuttal3".parse::<DebateStage>().is_err());
        assert!("Open".parse::<DebateStatusType>().is_err());
        assert!("Neutral".parse::<Position>().is_err());
    }

    #[test]
    fn debate_position_lookup() {
        let debate = Debate {
            id: DebateId(1),
            title: "t".to_string(),
            description: String::new(),
            author_user_id: None,
            participant_favor: UserId::from("alice"),
            participant_contra: UserId::from("bob"),
            status: DebateStatusType::Pending,
            category: None,
            match_key: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(debate.position_of(&UserId::from("alice")), Some(Position::Favor));
        assert_eq!(debate.position_of(&UserId::from("bob")), Some(Position::Against));
        assert_eq!(debate.position_of(&UserId::from("carol")), None);
        assert_eq!(debate.opponent_of(&UserId::from("alice")), Some(&UserId::from("bob")));
        assert_eq!(debate.opponent_of(&UserId::from("carol")), None);
    }
}
