use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use ade_common::UserId;
use log::*;
use tokio::{task::JoinHandle, time::MissedTickBehavior};

use crate::{
    ade_api::{match_objects::MatchOutcome, matchmaker_api::MatchmakerApi},
    traits::{DebateGatewayDatabase, StanceManagement},
};

/// How often a searching user retries by default.
pub const DEFAULT_SEARCH_PERIOD: Duration = Duration::from_secs(3);

/// A recurring, cancellable background search for one user.
///
/// The scheduler owns a single tokio task that performs one bounded
/// [`search`](MatchmakerApi::search) attempt per tick, so at most one attempt is ever in flight
/// for this handle. The task retires itself when an attempt lands a match (raising
/// [`MatchFoundEvent`](crate::events::MatchFoundEvent) for the searcher) or when the user turns
/// out to have nothing to match on; transient failures and empty attempts leave it ticking.
///
/// [`stop`](MatchScheduler::stop) flips a shared flag: it is idempotent, may be called from any
/// task or thread, and guarantees that no further attempt starts. An attempt already in flight
/// runs to completion; the task then exits at its next tick.
pub struct MatchScheduler {
    searching: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl MatchScheduler {
    pub fn spawn<B>(api: MatchmakerApi<B>, user_id: UserId, period: Duration) -> Self
    where B: DebateGatewayDatabase + StanceManagement + Send + Sync + 'static {
        let searching = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&searching);
        let handle = tokio::spawn(async move {
            let mut timer = tokio::time::interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                timer.tick().await;
                if !flag.load(Ordering::SeqCst) {
                    break;
                }
                match api.search(&user_id).await {
                    Ok(MatchOutcome::Matched(result)) => {
                        info!("🤝 Search for {user_id} landed debate {}", result.debate.id);
                        api.notify_match_found(&result, &user_id).await;
                        flag.store(false, Ordering::SeqCst);
                        break;
                    },
                    Ok(MatchOutcome::NoMatch) => {
                        trace!("🤝 Nothing for {user_id} this tick");
                    },
                    Err(e) if e.is_transient() => {
                        warn!("🤝 Search attempt for {user_id} failed, retrying next tick: {e}");
                    },
                    Err(e) => {
                        info!("🤝 Stopping search for {user_id}: {e}");
                        flag.store(false, Ordering::SeqCst);
                        break;
                    },
                }
            }
            debug!("🤝 Search task for {user_id} exited");
        });
        Self { searching, handle }
    }

    /// True while further attempts are scheduled.
    pub fn is_searching(&self) -> bool {
        self.searching.load(Ordering::SeqCst)
    }

    /// Cancels future attempts. Idempotent: stopping an already-stopped search is a no-op.
    pub fn stop(&self) {
        if self.searching.swap(false, Ordering::SeqCst) {
            debug!("🤝 Search cancelled");
        }
    }

    /// Waits for the search task to exit. Mostly useful in tests and orderly shutdown paths.
    pub async fn join(self) {
        if let Err(e) = self.handle.await {
            warn!("🤝 Search task did not shut down cleanly: {e}");
        }
    }
}
