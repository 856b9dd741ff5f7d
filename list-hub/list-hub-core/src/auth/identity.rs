//! Registration, login and token checks on top of the user store.

use crate::auth::{password, Hs256Tokens, TokenVerifier};
use crate::error::{HubError, HubResult};
use crate::storage::model::User;
use crate::storage::UserStore;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

pub struct IdentityService {
    users: Arc<dyn UserStore>,
    tokens: Arc<Hs256Tokens>,
}

impl IdentityService {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<Hs256Tokens>) -> Self {
        Self { users, tokens }
    }

    /// Create a user with a unique name.
    ///
    /// Uniqueness is checked with a read before the insert, so two concurrent
    /// registrations of the same name can both succeed.
    pub async fn register(&self, name: &str, password: &str) -> HubResult<Uuid> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HubError::validation("username must not be empty"));
        }
        if password.is_empty() {
            return Err(HubError::validation("password must not be empty"));
        }
        if self.users.find_by_name(name).await?.is_some() {
            return Err(HubError::Conflict("Username already in use".into()));
        }

        let pw = password.to_string();
        let hash = tokio::task::spawn_blocking(move || password::hash_password(&pw))
            .await
            .map_err(anyhow::Error::from)??;
        let user = User::new(name.to_string(), hash);
        let id = user.id;
        self.users.insert_user(user).await?;
        info!(user = %id, name, "user registered");
        Ok(id)
    }

    /// Verify credentials and issue an access token. Every failure is the
    /// same `NotAuthorized`.
    pub async fn login(&self, name: &str, password: &str) -> HubResult<Session> {
        let Some(user) = self.users.find_by_name(name.trim()).await? else {
            debug!(name, "login for unknown user");
            return Err(HubError::NotAuthorized);
        };

        let pw = password.to_string();
        let hash = user.password_hash.clone();
        let ok = tokio::task::spawn_blocking(move || password::verify_password(&pw, &hash))
            .await
            .map_err(anyhow::Error::from)?;
        if !ok {
            debug!(user = %user.id, "login with wrong password");
            return Err(HubError::NotAuthorized);
        }

        let token = self.tokens.issue(user.id)?;
        info!(user = %user.id, "user logged in");
        Ok(Session {
            user_id: user.id,
            username: user.name,
            token,
        })
    }

    pub async fn authenticate(&self, token: &str) -> HubResult<Uuid> {
        self.tokens
            .verify(token)
            .await
            .and_then(|c| c.user_id())
            .ok_or(HubError::NotAuthorized)
    }
}
