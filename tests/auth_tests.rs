use repmax::core::auth::{AuthSession, IdentityProvider, ensure_user_document};
use repmax::errors::AppError;
use repmax::store::{DocumentStore, SqliteStore};

fn store() -> SqliteStore {
    SqliteStore::open_in_memory().unwrap().with_password_cost(4)
}

#[tokio::test]
async fn sign_up_signs_in_and_persists() {
    let store = store();
    let ctx = store.sign_up("  Alice@Example.COM ", "secret1").await.unwrap();
    assert_eq!(ctx.email, "alice@example.com");

    assert_eq!(store.current_user().await.unwrap(), Some(ctx.clone()));

    store.sign_out().await.unwrap();
    assert_eq!(store.current_user().await.unwrap(), None);

    let again = store.sign_in("alice@example.com", "secret1").await.unwrap();
    assert_eq!(again, ctx);
}

#[tokio::test]
async fn bad_credentials_are_rejected() {
    let store = store();
    store.sign_up("alice@example.com", "secret1").await.unwrap();
    store.sign_out().await.unwrap();

    assert!(matches!(
        store.sign_in("alice@example.com", "wrong-password").await,
        Err(AppError::InvalidCredentials)
    ));
    assert!(matches!(
        store.sign_in("nobody@example.com", "secret1").await,
        Err(AppError::InvalidCredentials)
    ));
    assert_eq!(store.current_user().await.unwrap(), None);
}

#[tokio::test]
async fn sign_up_validates_input() {
    let store = store();
    assert!(matches!(
        store.sign_up("not-an-email", "secret1").await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        store.sign_up("alice@example.com", "123").await,
        Err(AppError::Validation(_))
    ));

    store.sign_up("alice@example.com", "secret1").await.unwrap();
    assert!(matches!(
        store.sign_up("ALICE@example.com", "secret2").await,
        Err(AppError::EmailTaken(_))
    ));
}

#[tokio::test]
async fn auth_changes_are_published_to_subscribers() {
    let store = store();
    let auth = AuthSession::new(&store);
    let mut rx = auth.subscribe();

    assert!(auth.restore().await.unwrap().is_none());
    assert!(matches!(auth.require(), Err(AppError::NotSignedIn)));

    let ctx = auth.sign_up("alice@example.com", "secret1").await.unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().clone(), Some(ctx.clone()));

    auth.sign_out().await.unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), None);
}

#[tokio::test]
async fn user_document_is_created_once() {
    let store = store();
    let ctx = store.sign_up("alice@example.com", "secret1").await.unwrap();

    let created = ensure_user_document(&store, &ctx).await.unwrap();
    store
        .update_user(&ctx.user_id, |u| {
            u.add_custom_exercise("Cable Fly");
        })
        .await
        .unwrap();
    let again = ensure_user_document(&store, &ctx).await.unwrap();

    assert_eq!(created.id, again.id);
    assert_eq!(created.email, again.email);
    assert_eq!(again.custom_exercises, vec!["Cable Fly".to_string()]);
}
