use repmax::core::history;
use repmax::core::session::{SessionController, SessionState, WorkoutSummary};
use repmax::core::ticker::ElapsedTimer;
use repmax::errors::AppError;
use repmax::models::workout::WorkoutSet;
use repmax::store::{DocumentStore, MemoryStore, SqliteStore};
use std::time::Duration;
use tokio::time::sleep;

mod common;
use common::new_user;

const TICK: Duration = Duration::from_secs(1);

#[tokio::test(start_paused = true)]
async fn raw_set_input_is_coerced_on_end() {
    let store = SqliteStore::open_in_memory().unwrap();
    let alice = new_user(&store, "alice@example.com").await;
    let mut session = SessionController::new(&store, alice.clone()).with_tick(TICK);

    session.start(None).await.unwrap();
    session.add_exercise("Bench Press").await.unwrap();
    session.add_set(0, "135", "5").await.unwrap();
    session.add_set(0, "", "abc").await.unwrap();
    let saved = session.end().await.unwrap();

    let expected = vec![
        WorkoutSet {
            weight: 135.0,
            reps: 5,
        },
        WorkoutSet {
            weight: 0.0,
            reps: 0,
        },
    ];
    assert_eq!(saved.exercises[0].sets, expected);

    let stored = store.get_workout(&saved.id).await.unwrap().unwrap();
    assert_eq!(stored.exercises[0].sets, expected);
    assert_eq!(stored.user_email, "alice@example.com");

    let user = store.get_user(&alice.user_id).await.unwrap().unwrap();
    assert!(user.ongoing_workout.is_none());
    assert!(matches!(session.state(), SessionState::Ended(_)));
}

#[tokio::test(start_paused = true)]
async fn abandoned_workout_resumes_exactly() {
    let store = SqliteStore::open_in_memory().unwrap();
    let alice = new_user(&store, "alice@example.com").await;

    let left_behind = {
        let mut first = SessionController::new(&store, alice.clone()).with_tick(TICK);
        first.start(None).await.unwrap();
        first.add_exercise("Squat").await.unwrap();
        first.add_set(0, "225", "3").await.unwrap();
        first.toggle_set(0, 0).await.unwrap();
        sleep(Duration::from_millis(5500)).await;
        first.suspend().await.unwrap();
        first.pending().cloned().unwrap()
    };
    assert_eq!(left_behind.elapsed_time, 5);

    let mut second = SessionController::new(&store, alice.clone()).with_tick(TICK);
    second.on_authenticated().await.unwrap();
    assert_eq!(second.pending(), Some(&left_behind));

    second.resume().await.unwrap();
    assert_eq!(second.exercises().unwrap(), left_behind.exercises.as_slice());
    assert!(second.exercises().unwrap()[0].sets[0].completed);
    assert_eq!(second.elapsed(), Some(5));

    sleep(Duration::from_millis(2500)).await;
    assert_eq!(second.elapsed(), Some(7));
}

#[tokio::test(start_paused = true)]
async fn abandoned_workout_can_be_ended_and_is_cleared() {
    let store = SqliteStore::open_in_memory().unwrap();
    let alice = new_user(&store, "alice@example.com").await;

    {
        let mut first = SessionController::new(&store, alice.clone()).with_tick(TICK);
        first.start(None).await.unwrap();
        first.add_exercise("Deadlift").await.unwrap();
        first.add_set(0, "315", "1").await.unwrap();
        // dropped without ending: the last mutation is what is persisted
    }

    let mut second = SessionController::new(&store, alice.clone()).with_tick(TICK);
    second.on_authenticated().await.unwrap();
    let saved = second.end_pending().await.unwrap();

    assert_eq!(saved.exercises[0].name, "Deadlift");
    assert_eq!(
        saved.exercises[0].sets,
        vec![WorkoutSet {
            weight: 315.0,
            reps: 1
        }]
    );
    assert!(matches!(second.state(), SessionState::Ended(_)));

    let user = store.get_user(&alice.user_id).await.unwrap().unwrap();
    assert!(user.ongoing_workout.is_none());
    assert_eq!(history::list_own(&store, &alice.user_id).await.unwrap().len(), 1);

    let mut third = SessionController::new(&store, alice).with_tick(TICK);
    assert!(matches!(
        third.on_authenticated().await.unwrap(),
        SessionState::Idle
    ));
}

#[tokio::test(start_paused = true)]
async fn start_is_refused_while_a_workout_is_pending() {
    let store = MemoryStore::new();
    let alice = new_user(&store, "alice@example.com").await;

    let mut first = SessionController::new(&store, alice.clone()).with_tick(TICK);
    first.start(None).await.unwrap();
    assert!(matches!(first.start(None).await, Err(AppError::SessionPending)));
    drop(first);

    // a fresh controller that has not looked at the store yet
    let mut second = SessionController::new(&store, alice).with_tick(TICK);
    assert!(matches!(second.start(None).await, Err(AppError::SessionPending)));
    assert!(second.pending().is_some());
    assert!(matches!(second.start(None).await, Err(AppError::SessionPending)));
}

#[tokio::test(start_paused = true)]
async fn failed_save_keeps_the_session_and_its_snapshot() {
    let store = MemoryStore::new();
    let alice = new_user(&store, "alice@example.com").await;
    let mut session = SessionController::new(&store, alice.clone()).with_tick(TICK);

    session.start(None).await.unwrap();
    session.add_exercise("Squat").await.unwrap();
    session.add_set(0, "185", "5").await.unwrap();

    store.fail_writes(true);
    let err = session.end().await.unwrap_err();
    assert!(err.is_remote());
    assert!(session.is_active());
    store.fail_writes(false);

    let user = store.get_user(&alice.user_id).await.unwrap().unwrap();
    let snapshot = user.ongoing_workout.expect("snapshot kept");
    assert_eq!(snapshot.exercises[0].sets[0].weight, "185");
    assert!(store.recent_workouts(10).await.unwrap().is_empty());

    session.end().await.unwrap();
    assert_eq!(store.recent_workouts(10).await.unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_mutation_is_not_committed() {
    let store = MemoryStore::new();
    let alice = new_user(&store, "alice@example.com").await;
    let mut session = SessionController::new(&store, alice).with_tick(TICK);
    session.start(None).await.unwrap();
    session.add_exercise("Squat").await.unwrap();

    store.fail_writes(true);
    assert!(session.add_set(0, "100", "10").await.is_err());
    store.fail_writes(false);

    assert!(session.exercises().unwrap()[0].sets.is_empty());
}

#[tokio::test(start_paused = true)]
async fn bad_indices_are_rejected() {
    let store = MemoryStore::new();
    let alice = new_user(&store, "alice@example.com").await;
    let mut session = SessionController::new(&store, alice).with_tick(TICK);
    session.start(None).await.unwrap();
    session.add_exercise("Squat").await.unwrap();

    assert!(matches!(
        session.add_set(3, "100", "5").await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        session.toggle_set(0, 0).await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        session.add_exercise("   ").await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn mutations_require_an_active_session() {
    let store = MemoryStore::new();
    let alice = new_user(&store, "alice@example.com").await;
    let mut session = SessionController::new(&store, alice).with_tick(TICK);

    assert!(matches!(
        session.add_exercise("Squat").await,
        Err(AppError::NoActiveSession)
    ));
    assert!(matches!(session.end().await, Err(AppError::NoActiveSession)));
    assert!(matches!(session.resume().await, Err(AppError::NotFound(_))));
}

#[tokio::test(start_paused = true)]
async fn edit_and_delete_sets() {
    let store = MemoryStore::new();
    let alice = new_user(&store, "alice@example.com").await;
    let mut session = SessionController::new(&store, alice.clone()).with_tick(TICK);
    session.start(None).await.unwrap();
    session.add_exercise("Squat").await.unwrap();
    session.add_set(0, "100", "5").await.unwrap();
    session.add_set(0, "110", "5").await.unwrap();

    session.update_set(0, 1, "120", "3").await.unwrap();
    session.delete_set(0, 0).await.unwrap();

    let sets = &session.exercises().unwrap()[0].sets;
    assert_eq!(sets.len(), 1);
    assert_eq!((sets[0].weight.as_str(), sets[0].reps.as_str()), ("120", "3"));

    let stored = store
        .get_user(&alice.user_id)
        .await
        .unwrap()
        .unwrap()
        .ongoing_workout
        .unwrap();
    assert_eq!(stored.exercises, session.exercises().unwrap());
}

#[tokio::test(start_paused = true)]
async fn catalog_names_are_canonical_and_others_remembered() {
    let store = MemoryStore::new();
    let alice = new_user(&store, "alice@example.com").await;
    let mut session = SessionController::new(&store, alice.clone()).with_tick(TICK);
    session.start(None).await.unwrap();

    session.add_exercise("bench press").await.unwrap();
    session.add_exercise("Cable Fly").await.unwrap();
    session.add_exercise("Cable Fly").await.unwrap();

    let names: Vec<_> = session
        .exercises()
        .unwrap()
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, ["Bench Press", "Cable Fly", "Cable Fly"]);

    let user = store.get_user(&alice.user_id).await.unwrap().unwrap();
    assert_eq!(user.custom_exercises, vec!["Cable Fly".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn timer_stops_when_the_session_ends() {
    let store = MemoryStore::new();
    let alice = new_user(&store, "alice@example.com").await;
    let mut session = SessionController::new(&store, alice).with_tick(TICK);
    session.start(None).await.unwrap();
    session.add_exercise("Squat").await.unwrap();
    session.add_set(0, "100", "5").await.unwrap();

    let reader = session.active().unwrap().timer().reader();
    sleep(Duration::from_millis(3500)).await;
    let saved = session.end().await.unwrap();
    assert_eq!(saved.duration, 3);

    sleep(Duration::from_secs(10)).await;
    assert_eq!(reader.seconds(), 3);

    let summary = WorkoutSummary::of(&saved);
    assert_eq!(summary.duration, "0 min 3 sec");
    assert_eq!(summary.exercise_count, 1);
    assert_eq!(summary.lines, vec!["1 x Squat".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn checkpoint_stores_the_running_clock() {
    let store = MemoryStore::new();
    let alice = new_user(&store, "alice@example.com").await;
    let mut session = SessionController::new(&store, alice.clone()).with_tick(TICK);
    session.start(None).await.unwrap();
    session.add_exercise("Squat").await.unwrap();

    sleep(Duration::from_millis(4500)).await;
    let written = session.checkpoint().await.unwrap();
    assert_eq!(written.elapsed_time, 4);

    let stored = store
        .get_user(&alice.user_id)
        .await
        .unwrap()
        .unwrap()
        .ongoing_workout
        .unwrap();
    assert_eq!(stored, written);
    assert!(session.is_active());

    session.end().await.unwrap();
    assert!(matches!(
        session.checkpoint().await,
        Err(AppError::NoActiveSession)
    ));
}

#[tokio::test(start_paused = true)]
async fn ticker_counts_from_its_initial_value() {
    let timer = ElapsedTimer::start(10, TICK);
    assert_eq!(timer.seconds(), 10);
    sleep(Duration::from_millis(2500)).await;
    assert_eq!(timer.seconds(), 12);
    assert!(timer.is_running());
}

#[tokio::test(start_paused = true)]
async fn stopped_ticker_no_longer_counts() {
    let timer = ElapsedTimer::start(0, TICK);
    let reader = timer.reader();
    sleep(Duration::from_millis(1500)).await;
    assert_eq!(timer.stop(), 1);

    sleep(Duration::from_secs(5)).await;
    assert_eq!(reader.seconds(), 1);
}

#[tokio::test(start_paused = true)]
async fn zero_tick_is_raised_to_the_minimum() {
    let timer = ElapsedTimer::start(0, Duration::ZERO);
    sleep(Duration::from_millis(5)).await;
    assert!(timer.is_running());
    assert!(timer.seconds() >= 1);

    let store = MemoryStore::new();
    let alice = new_user(&store, "alice@example.com").await;
    let mut session = SessionController::new(&store, alice).with_tick(Duration::ZERO);
    session.start(None).await.unwrap();
    sleep(Duration::from_millis(5)).await;
    assert!(session.active().unwrap().timer().is_running());
    assert!(session.elapsed().unwrap() >= 1);
}

#[tokio::test(start_paused = true)]
async fn custom_exercise_is_remembered_in_the_snapshot_write() {
    let store = MemoryStore::new();
    let alice = new_user(&store, "alice@example.com").await;
    let mut session = SessionController::new(&store, alice.clone()).with_tick(TICK);
    session.start(None).await.unwrap();

    // one write allowed: snapshot and custom list must share it
    store.fail_writes_after(1);
    session.add_exercise("Zercher Lunge").await.unwrap();
    store.fail_writes(false);

    let names: Vec<_> = session
        .exercises()
        .unwrap()
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, ["Zercher Lunge"]);

    let user = store.get_user(&alice.user_id).await.unwrap().unwrap();
    assert_eq!(user.custom_exercises, vec!["Zercher Lunge".to_string()]);
    assert_eq!(user.ongoing_workout.unwrap().exercises[0].name, "Zercher Lunge");
}

#[tokio::test(start_paused = true)]
async fn failed_custom_exercise_leaves_session_and_user_unchanged() {
    let store = MemoryStore::new();
    let alice = new_user(&store, "alice@example.com").await;
    let mut session = SessionController::new(&store, alice.clone()).with_tick(TICK);
    session.start(None).await.unwrap();

    store.fail_writes_after(0);
    let err = session.add_exercise("Zercher Lunge").await.unwrap_err();
    store.fail_writes(false);

    assert!(err.is_remote());
    assert!(session.exercises().unwrap().is_empty());
    let user = store.get_user(&alice.user_id).await.unwrap().unwrap();
    assert!(user.custom_exercises.is_empty());
    assert!(user.ongoing_workout.unwrap().exercises.is_empty());
}

#[tokio::test(start_paused = true)]
async fn saved_workout_ends_the_session_even_if_the_snapshot_stays() {
    let store = MemoryStore::new();
    let alice = new_user(&store, "alice@example.com").await;
    let mut session = SessionController::new(&store, alice.clone()).with_tick(TICK);
    session.start(None).await.unwrap();
    session.add_exercise("Squat").await.unwrap();
    session.add_set(0, "185", "5").await.unwrap();

    // the workout insert goes through, clearing the snapshot does not
    store.fail_writes_after(1);
    let err = session.end().await.unwrap_err();
    store.fail_writes(false);

    assert!(err.is_remote());
    assert!(!session.is_active());
    let SessionState::Ended(saved) = session.state() else {
        panic!("expected ended, got {}", session.state().name());
    };
    assert_eq!(saved.exercises[0].sets[0].weight, 185.0);
    assert_eq!(store.recent_workouts(10).await.unwrap().len(), 1);

    let user = store.get_user(&alice.user_id).await.unwrap().unwrap();
    assert!(user.ongoing_workout.is_some());

    let mut next = SessionController::new(&store, alice).with_tick(TICK);
    assert!(matches!(
        next.on_authenticated().await.unwrap(),
        SessionState::PendingResume(_)
    ));
}
