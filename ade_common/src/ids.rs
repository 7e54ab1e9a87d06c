use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

//--------------------------------------        UserId        --------------------------------------------------------
/// A lightweight wrapper around the string identifying a user account.
///
/// The engine never interprets the value; it is whatever identifier the outer auth layer hands out.
#[derive(Clone, Debug, Type, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct UserId(pub String);

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<S: Into<String>> From<S> for UserId {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------       DebateId       --------------------------------------------------------
/// The database-assigned identifier for a debate.
#[derive(Clone, Copy, Debug, Type, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct DebateId(pub i64);

impl Display for DebateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<i64> for DebateId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid debate id: {0}")]
pub struct DebateIdParseError(String);

impl FromStr for DebateId {
    type Err = DebateIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim_start_matches('#').parse::<i64>().map(Self).map_err(|_| DebateIdParseError(s.to_string()))
    }
}

impl DebateId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn user_id_round_trip() {
        let id = UserId::from("alice");
        assert_eq!(id.as_str(), "alice");
        assert_eq!(id.to_string(), "alice");
    }

    #[test]
    fn debate_id_parses_with_or_without_hash() {
        assert_eq!("42".parse::<DebateId>().unwrap(), DebateId(42));
        assert_eq!("#42".parse::<DebateId>().unwrap(), DebateId(42));
        assert_eq!(DebateId(42).to_string(), "#42");
        assert!("forty-two".parse::<DebateId>().is_err());
    }
}
