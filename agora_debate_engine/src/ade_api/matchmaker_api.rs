use std::fmt::Debug;

use ade_common::UserId;
use log::*;

use crate::{
    ade_api::{
        errors::MatchmakerError,
        match_objects::{MatchOutcome, MatchResult},
    },
    db_types::{Debate, NewDebate, Stance, StanceValue},
    events::{DebateCreatedEvent, EventProducers, MatchFoundEvent},
    helpers::matchmaking_key,
    traits::{DebateGatewayDatabase, StanceManagement},
};

/// `MatchmakerApi` pairs a searching user with an opponent holding the opposite stance on a
/// shared topic, and materialises the resulting debate.
pub struct MatchmakerApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for MatchmakerApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MatchmakerApi")
    }
}

impl<B> MatchmakerApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }
}

impl<B> MatchmakerApi<B>
where B: DebateGatewayDatabase + StanceManagement
{
    /// Runs a single bounded search attempt for the given user.
    ///
    /// The user's stances are walked in topic order; for each, the store is asked for other users
    /// holding the opposite value on that topic, and the first candidate found wins (first-match,
    /// not best-match). The favor/contra assignment comes from the *searcher's own* stance value.
    ///
    /// Debate creation is idempotent on the pairing key, so when both halves of a pair search at
    /// the same time they converge on a single debate; only the search that actually inserted the
    /// row notifies the opponent.
    ///
    /// A user with no non-neutral stance gets [`MatchmakerError::NoStancesAvailable`], which is
    /// terminal for the search loop. Finding nobody to oppose is the transient
    /// [`MatchOutcome::NoMatch`].
    pub async fn search(&self, user_id: &UserId) -> Result<MatchOutcome, MatchmakerError> {
        let stances: Vec<Stance> = self
            .db
            .fetch_stances_for_user(user_id)
            .await?
            .into_iter()
            .filter(|s| s.value.is_matchable())
            .collect();
        if stances.is_empty() {
            debug!("🤝 {user_id} has nothing to debate about");
            return Err(MatchmakerError::NoStancesAvailable(user_id.clone()));
        }
        trace!("🤝 Searching a match for {user_id} across {} stances", stances.len());
        for stance in stances {
            let Some(wanted) = stance.value.opposite() else {
                continue;
            };
            let candidates = self.db.fetch_opposing_stances(&stance.topic_name, wanted, user_id).await?;
            let Some(candidate) = candidates.into_iter().next() else {
                continue;
            };
            return self.pair_up(user_id, &stance, candidate).await;
        }
        trace!("🤝 No opponent available for {user_id} this attempt");
        Ok(MatchOutcome::NoMatch)
    }

    async fn pair_up(
        &self,
        user_id: &UserId,
        stance: &Stance,
        candidate: Stance,
    ) -> Result<MatchOutcome, MatchmakerError> {
        let topic_name = stance.topic_name.as_str();
        let opponent = candidate.user_id.clone();
        // the searcher's own stance decides which side of the table they sit on
        let (favor, contra) = match stance.value {
            StanceValue::Favor => (user_id.clone(), opponent.clone()),
            _ => (opponent.clone(), user_id.clone()),
        };
        let key = matchmaking_key(topic_name, user_id, &opponent);
        let new_debate = NewDebate::new(format!("Debate: {topic_name}"), favor.clone(), contra.clone())
            .with_description(format!("{favor} argues in favor, {contra} argues against on '{topic_name}'"))
            .with_author(user_id.clone())
            .with_category("matchmaking")
            .with_match_key(key);
        let (debate, newly_created) = self.db.create_debate(new_debate).await?;
        if newly_created {
            info!("🤝 Matched {user_id} against {opponent} on '{topic_name}' in debate {}", debate.id);
            self.call_debate_created_hook(&debate, &opponent, topic_name).await;
        } else {
            debug!("🤝 {user_id} adopted existing debate {} with {opponent} on '{topic_name}'", debate.id);
        }
        Ok(MatchOutcome::Matched(MatchResult { debate, opponent, topic_name: topic_name.to_string(), newly_created }))
    }

    /// Best-effort opponent notification. Delivery failure is the subscriber's problem, never
    /// the matchmaker's.
    async fn call_debate_created_hook(&self, debate: &Debate, opponent: &UserId, topic_name: &str) {
        for producer in &self.producers.debate_created_producer {
            debug!("🤝 Notifying debate-created subscribers for {opponent}");
            let event = DebateCreatedEvent::new(debate.clone(), opponent.clone(), topic_name.to_string());
            producer.publish_event(event).await;
        }
    }

    /// Publishes a searcher-side match event. Used by the scheduler once an attempt lands.
    pub async fn notify_match_found(&self, result: &MatchResult, user_id: &UserId) {
        for producer in &self.producers.match_found_producer {
            let event = MatchFoundEvent {
                user_id: user_id.clone(),
                debate: result.debate.clone(),
                topic_name: result.topic_name.clone(),
                newly_created: result.newly_created,
            };
            producer.publish_event(event).await;
        }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }
}
