//! Identity: who is signed in, and how other components learn about it.
//!
//! The identity provider is a collaborator behind [`IdentityProvider`].
//! [`AuthSession`] owns the current [`SessionContext`] and publishes every
//! change on a watch channel; components call [`AuthSession::subscribe`]
//! instead of reading ambient global state. Dropping the receiver is the
//! unsubscribe.

use crate::errors::{AppError, AppResult};
use crate::models::user::{SessionContext, UserDoc};
use crate::store::DocumentStore;
use tokio::sync::watch;

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

#[allow(async_fn_in_trait)]
pub trait IdentityProvider {
    /// Create an account and sign it in.
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<SessionContext>;

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<SessionContext>;

    /// The persisted signed-in identity, if any.
    async fn current_user(&self) -> AppResult<Option<SessionContext>>;

    async fn sign_out(&self) -> AppResult<()>;
}

/// Trim and lowercase; reject anything that cannot be an address.
pub fn normalize_email(raw: &str) -> AppResult<String> {
    let email = raw.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(AppError::Validation(format!(
            "'{}' is not a valid email address",
            raw.trim()
        ))),
    }
}

pub fn validate_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Create the user's document on first authentication (idempotent).
pub async fn ensure_user_document<S: DocumentStore>(
    store: &S,
    ctx: &SessionContext,
) -> AppResult<UserDoc> {
    store.ensure_user(&ctx.user_id, &ctx.email).await
}

pub struct AuthSession<'a, P: IdentityProvider> {
    provider: &'a P,
    state: watch::Sender<Option<SessionContext>>,
}

impl<'a, P: IdentityProvider> AuthSession<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        let (state, _) = watch::channel(None);
        Self { provider, state }
    }

    /// Load the persisted identity and publish it. Call once on start.
    pub async fn restore(&self) -> AppResult<Option<SessionContext>> {
        let current = self.provider.current_user().await?;
        tracing::debug!(signed_in = current.is_some(), "auth state restored");
        self.publish(current.clone());
        Ok(current)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<SessionContext>> {
        self.state.subscribe()
    }

    pub fn current(&self) -> Option<SessionContext> {
        self.state.borrow().clone()
    }

    /// The signed-in context, or `NotSignedIn`.
    pub fn require(&self) -> AppResult<SessionContext> {
        self.current().ok_or(AppError::NotSignedIn)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> AppResult<SessionContext> {
        let ctx = self.provider.sign_up(email, password).await?;
        tracing::info!(user = %ctx.user_id, "account created");
        self.publish(Some(ctx.clone()));
        Ok(ctx)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<SessionContext> {
        let ctx = self.provider.sign_in(email, password).await?;
        tracing::info!(user = %ctx.user_id, "signed in");
        self.publish(Some(ctx.clone()));
        Ok(ctx)
    }

    pub async fn sign_out(&self) -> AppResult<()> {
        self.provider.sign_out().await?;
        self.publish(None);
        Ok(())
    }

    fn publish(&self, next: Option<SessionContext>) {
        self.state.send_replace(next);
    }
}
