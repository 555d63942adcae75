use repmax::core::exercises;
use repmax::core::feed::FeedResolver;
use repmax::core::friends::{FriendGraph, FriendIdentifier};
use repmax::core::history;
use repmax::core::templates::TemplateBook;
use repmax::errors::AppError;
use repmax::models::catalog::CATALOG;
use repmax::models::{TemplateId, WorkoutId};
use repmax::store::{DocumentStore, SqliteStore};

mod common;
use common::{at, new_user, workout_doc};

#[tokio::test]
async fn deleting_removes_the_workout_from_its_owner_only() {
    let store = SqliteStore::open_in_memory().unwrap();
    let alice = new_user(&store, "alice@example.com").await;
    let bob = new_user(&store, "bob@example.com").await;
    FriendGraph::new(&store)
        .add_friend(&alice.user_id, &FriendIdentifier::parse("bob@example.com").unwrap())
        .await
        .unwrap();

    let mine = workout_doc(&alice, Some(at("2026-03-01T07:00:00Z")), "");
    let keep = workout_doc(&alice, Some(at("2026-03-02T07:00:00Z")), "");
    let his = workout_doc(&bob, Some(at("2026-03-03T07:00:00Z")), "");
    for doc in [&mine, &keep, &his] {
        store.insert_workout_doc(doc).unwrap();
    }

    history::delete(&store, &alice.user_id, &mine.id).await.unwrap();

    let alice_history = history::list_own(&store, &alice.user_id).await.unwrap();
    assert_eq!(alice_history.len(), 1);
    assert_eq!(alice_history[0].id, keep.id);

    let bob_history = history::list_own(&store, &bob.user_id).await.unwrap();
    assert_eq!(bob_history.len(), 1);
    assert_eq!(bob_history[0].id, his.id);

    let feed = FeedResolver::new(&store)
        .visible_workouts(&bob.user_id)
        .await
        .unwrap();
    assert!(!feed.iter().any(|w| w.id == mine.id));
    assert_eq!(feed.len(), 2);
}

#[tokio::test]
async fn someone_elses_workout_cannot_be_deleted() {
    let store = SqliteStore::open_in_memory().unwrap();
    let alice = new_user(&store, "alice@example.com").await;
    let bob = new_user(&store, "bob@example.com").await;
    let his = workout_doc(&bob, Some(at("2026-03-03T07:00:00Z")), "");
    store.insert_workout_doc(&his).unwrap();

    let err = history::delete(&store, &alice.user_id, &his.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(store.get_workout(&his.id).await.unwrap().is_some());

    let err = history::delete(&store, &alice.user_id, &WorkoutId::from("missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn history_is_newest_first() {
    let store = SqliteStore::open_in_memory().unwrap();
    let alice = new_user(&store, "alice@example.com").await;
    let older = workout_doc(&alice, Some(at("2026-01-01T07:00:00Z")), "");
    let newer = workout_doc(&alice, Some(at("2026-02-01T07:00:00Z")), "");
    store.insert_workout_doc(&older).unwrap();
    store.insert_workout_doc(&newer).unwrap();

    let ids: Vec<_> = history::list_own(&store, &alice.user_id)
        .await
        .unwrap()
        .into_iter()
        .map(|w| w.id)
        .collect();
    assert_eq!(ids, vec![newer.id, older.id]);
}

#[tokio::test]
async fn templates_round_trip_through_the_store() {
    let store = SqliteStore::open_in_memory().unwrap();
    let alice = new_user(&store, "alice@example.com").await;
    let bob = new_user(&store, "bob@example.com").await;
    let book = TemplateBook::new(&store, &alice.user_id);

    let push = book
        .create("Push Day", ["bench press", " ", "Cable Fly"])
        .await
        .unwrap();
    assert_eq!(push.exercises, vec!["Bench Press", "Cable Fly"]);

    assert_eq!(book.find("push day").await.unwrap().id, push.id);
    assert!(TemplateBook::new(&store, &bob.user_id).list().await.unwrap().is_empty());

    let entries = push.entries();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.sets.is_empty()));

    book.delete(&push.id).await.unwrap();
    assert!(book.list().await.unwrap().is_empty());
    assert!(matches!(
        book.delete(&push.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        book.delete(&TemplateId::from("nope")).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn templates_need_a_name_and_exercises() {
    let store = SqliteStore::open_in_memory().unwrap();
    let alice = new_user(&store, "alice@example.com").await;
    let book = TemplateBook::new(&store, &alice.user_id);

    assert!(matches!(
        book.create("  ", ["Squat"]).await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        book.create("Legs", Vec::<String>::new()).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn available_exercises_are_catalog_then_custom() {
    let store = SqliteStore::open_in_memory().unwrap();
    let alice = new_user(&store, "alice@example.com").await;

    exercises::remember_custom(&store, &alice.user_id, "Cable Fly").await.unwrap();
    exercises::remember_custom(&store, &alice.user_id, "Cable Fly").await.unwrap();
    exercises::remember_custom(&store, &alice.user_id, "squat").await.unwrap();

    let names = exercises::available(&store, &alice.user_id).await.unwrap();
    assert_eq!(names.len(), CATALOG.len() + 1);
    assert_eq!(names.last().map(String::as_str), Some("Cable Fly"));
}
