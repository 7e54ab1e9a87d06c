use std::{future::Future, pin::Pin};

use ade_common::UserId;
use agora_debate_engine::{
    db_types::{Debate, DebateStage, DebateStatusType, NewDebate, Position},
    events::{EventHandlers, EventHooks, EventProducers},
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    DebateApiError,
    DebateFlowApi,
    DebateGatewayDatabase,
    SqliteDatabase,
    SubmitOutcome,
    SubmitRejection,
};
use log::error;
use sqlx::{migrate::MigrateDatabase, Sqlite};

async fn setup() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database")
}

async fn tear_down(mut db: SqliteDatabase) {
    let url = db.url().to_string();
    if let Err(e) = db.close().await {
        error!("🚀️ Failed to close database: {e}");
    }
    let _ = Sqlite::drop_database(&url).await;
}

async fn manual_debate(db: &SqliteDatabase, favor: &UserId, contra: &UserId) -> Debate {
    let new_debate =
        NewDebate::new("Debate: AI ethics", favor.clone(), contra.clone()).with_description("manually arranged");
    let (debate, created) = db.create_debate(new_debate).await.expect("Error creating debate");
    assert!(created);
    debate
}

#[tokio::test]
async fn four_stage_walkthrough() {
    let db = setup().await;
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");
    let debate = manual_debate(&db, &alice, &bob).await;
    assert_eq!(debate.status, DebateStatusType::Pending);
    let api = DebateFlowApi::new(db.clone(), EventProducers::default());

    // the intro has nothing to refute
    let target = api.entry_to_refute(debate.id, &alice, DebateStage::Intro).await.unwrap();
    assert!(target.is_none());

    // alice opens and the debate moves into play
    let accepted =
        api.submit_entry(debate.id, &alice, "opening for").await.unwrap().accepted().expect("intro should be accepted");
    assert_eq!(accepted.entry.stage, DebateStage::Intro);
    assert_eq!(accepted.entry.position, Position::Favor);
    assert!(!accepted.stage_completed);
    assert_eq!(accepted.new_status, DebateStatusType::Intro);

    // bob answers and the intro completes
    let accepted = api.submit_entry(debate.id, &bob, "opening against").await.unwrap().accepted().unwrap();
    assert_eq!(accepted.entry.position, Position::Against);
    assert!(accepted.stage_completed);
    assert_eq!(accepted.new_status, DebateStatusType::Rebuttal1);

    // first rebuttals refute the opposing intros
    let target = api.entry_to_refute(debate.id, &alice, DebateStage::Rebuttal1).await.unwrap().unwrap();
    assert_eq!((target.stage, target.position), (DebateStage::Intro, Position::Against));
    assert_eq!(target.content, "opening against");
    api.submit_entry(debate.id, &alice, "first rebuttal for").await.unwrap().accepted().unwrap();
    let accepted = api.submit_entry(debate.id, &bob, "first rebuttal against").await.unwrap().accepted().unwrap();
    assert_eq!(accepted.new_status, DebateStatusType::Rebuttal2);

    // second rebuttals refute the first
    let target = api.entry_to_refute(debate.id, &bob, DebateStage::Rebuttal2).await.unwrap().unwrap();
    assert_eq!(target.content, "first rebuttal for");
    api.submit_entry(debate.id, &bob, "second rebuttal against").await.unwrap().accepted().unwrap();
    let accepted = api.submit_entry(debate.id, &alice, "second rebuttal for").await.unwrap().accepted().unwrap();
    assert_eq!(accepted.new_status, DebateStatusType::Conclusion);

    // conclusions respond to the second rebuttals and finish the debate
    let target = api.entry_to_refute(debate.id, &alice, DebateStage::Conclusion).await.unwrap().unwrap();
    assert_eq!((target.stage, target.position), (DebateStage::Rebuttal2, Position::Against));
    api.submit_entry(debate.id, &alice, "closing for").await.unwrap().accepted().unwrap();
    let accepted = api.submit_entry(debate.id, &bob, "closing against").await.unwrap().accepted().unwrap();
    assert!(accepted.stage_completed);
    assert_eq!(accepted.new_status, DebateStatusType::Finished);

    let replay = api.debate_with_entries(debate.id).await.unwrap().unwrap();
    assert_eq!(replay.debate.status, DebateStatusType::Finished);
    assert_eq!(replay.entries.len(), 8);

    // a finished debate takes no more entries, from either side
    let outcome = api.submit_entry(debate.id, &alice, "one more word").await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Rejected(SubmitRejection::DebateFinished));
    let outcome = api.submit_entry(debate.id, &bob, "me too").await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Rejected(SubmitRejection::DebateFinished));

    tear_down(db).await;
}

#[tokio::test]
async fn a_debate_needs_two_distinct_participants() {
    let db = setup().await;
    let alice = UserId::from("alice");
    let err = db.create_debate(NewDebate::new("Debate: solipsism", alice.clone(), alice.clone())).await.unwrap_err();
    assert!(matches!(err, DebateApiError::ParticipantsNotDistinct));
    tear_down(db).await;
}

#[tokio::test]
async fn empty_content_is_rejected_without_a_write() {
    let db = setup().await;
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");
    let debate = manual_debate(&db, &alice, &bob).await;
    let api = DebateFlowApi::new(db.clone(), EventProducers::default());

    for content in ["", "   ", "\n\t"] {
        let outcome = api.submit_entry(debate.id, &alice, content).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Rejected(SubmitRejection::EmptyContent));
    }
    let replay = api.debate_with_entries(debate.id).await.unwrap().unwrap();
    assert!(replay.entries.is_empty());
    assert_eq!(replay.debate.status, DebateStatusType::Pending);

    tear_down(db).await;
}

#[tokio::test]
async fn turns_alternate_within_a_stage() {
    let db = setup().await;
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");
    let debate = manual_debate(&db, &alice, &bob).await;
    let api = DebateFlowApi::new(db.clone(), EventProducers::default());

    assert!(api.is_users_turn(debate.id, &alice).await.unwrap());
    assert!(api.is_users_turn(debate.id, &bob).await.unwrap());

    api.submit_entry(debate.id, &alice, "opening for").await.unwrap().accepted().unwrap();
    assert!(!api.is_users_turn(debate.id, &alice).await.unwrap());
    assert!(api.is_users_turn(debate.id, &bob).await.unwrap());

    // the favor slot for the intro is taken; alice must wait for the stage to advance
    let outcome = api.submit_entry(debate.id, &alice, "impatient follow-up").await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Rejected(SubmitRejection::NotYourTurn));

    api.submit_entry(debate.id, &bob, "opening against").await.unwrap().accepted().unwrap();
    // stage advanced, so it is alice's turn again
    assert!(api.is_users_turn(debate.id, &alice).await.unwrap());
    api.submit_entry(debate.id, &alice, "first rebuttal for").await.unwrap().accepted().unwrap();

    tear_down(db).await;
}

#[tokio::test]
async fn outsiders_cannot_submit() {
    let db = setup().await;
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");
    let carol = UserId::from("carol");
    let debate = manual_debate(&db, &alice, &bob).await;
    let api = DebateFlowApi::new(db.clone(), EventProducers::default());

    let outcome = api.submit_entry(debate.id, &carol, "let me in").await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Rejected(SubmitRejection::NotAParticipant));
    assert!(!api.is_users_turn(debate.id, &carol).await.unwrap());
    assert!(api.entry_to_refute(debate.id, &carol, DebateStage::Rebuttal1).await.unwrap().is_none());

    tear_down(db).await;
}

#[tokio::test]
async fn advance_if_complete_is_idempotent() {
    let db = setup().await;
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");
    let debate = manual_debate(&db, &alice, &bob).await;
    let api = DebateFlowApi::new(db.clone(), EventProducers::default());

    // incomplete stage: no write, no advance
    assert!(!api.advance_if_complete(debate.id, DebateStage::Intro).await.unwrap());

    // plant both intro entries directly so the status check lags behind the entry rows
    for (user, position) in [(&alice, Position::Favor), (&bob, Position::Against)] {
        sqlx::query(
            "INSERT INTO debate_entries (debate_id, user_id, stage, position, content) VALUES ($1, $2, $3, $4, 'seeded')",
        )
        .bind(debate.id)
        .bind(user)
        .bind(DebateStage::Intro)
        .bind(position)
        .execute(db.pool())
        .await
        .unwrap();
    }
    assert!(api.is_stage_complete(debate.id, DebateStage::Intro).await.unwrap());

    // the first check advances, every replay is a no-op
    assert!(api.advance_if_complete(debate.id, DebateStage::Intro).await.unwrap());
    assert!(!api.advance_if_complete(debate.id, DebateStage::Intro).await.unwrap());
    assert!(!api.advance_if_complete(debate.id, DebateStage::Intro).await.unwrap());

    let replay = api.debate_with_entries(debate.id).await.unwrap().unwrap();
    assert_eq!(replay.debate.status, DebateStatusType::Rebuttal1);

    tear_down(db).await;
}

#[tokio::test]
async fn corrupted_status_surfaces_as_an_error() {
    let db = setup().await;
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");
    let debate = manual_debate(&db, &alice, &bob).await;
    let api = DebateFlowApi::new(db.clone(), EventProducers::default());

    sqlx::query("UPDATE debates SET status = 'Archived' WHERE id = $1").bind(debate.id).execute(db.pool()).await.unwrap();

    // an unknown stored status is a decode error, never a silent default
    assert!(api.debate_with_entries(debate.id).await.is_err());

    tear_down(db).await;
}

#[tokio::test]
async fn finished_hook_fires_when_the_conclusion_completes() {
    let db = setup().await;
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");
    let debate = manual_debate(&db, &alice, &bob).await;

    let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();
    let mut hooks = EventHooks::default();
    hooks.on_debate_finished(move |event| {
        let sender = sender.clone();
        Box::pin(async move {
            let _ = sender.send(event);
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    let handlers = EventHandlers::new(10, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let api = DebateFlowApi::new(db.clone(), producers);

    for (user, content) in [
        (&alice, "opening for"),
        (&bob, "opening against"),
        (&alice, "first rebuttal for"),
        (&bob, "first rebuttal against"),
        (&alice, "second rebuttal for"),
        (&bob, "second rebuttal against"),
        (&alice, "closing for"),
        (&bob, "closing against"),
    ] {
        api.submit_entry(debate.id, user, content).await.unwrap().accepted().unwrap();
    }

    let event = tokio::time::timeout(std::time::Duration::from_secs(5), receiver.recv())
        .await
        .expect("timed out waiting for the finished event")
        .expect("event channel closed");
    assert_eq!(event.debate.id, debate.id);
    assert_eq!(event.debate.status, DebateStatusType::Finished);

    tear_down(db).await;
}
