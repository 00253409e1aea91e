//! Auth Service
//!
//! Login, logout and session restore against `/auth/*`. The auth context
//! only ever holds a token the server has accepted.

use serde::de::IgnoredAny;

use super::client::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::logic::validation::validate_login;
use crate::models::{AuthPayload, AuthUser, LoginCredentials, TokenPayload, UserPayload};
use crate::session::AuthContext;

#[derive(Debug, Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn auth(&self) -> &AuthContext {
        self.client.auth()
    }

    /// Validate, authenticate, persist. Nothing is stored on failure.
    pub async fn login(&self, credentials: &LoginCredentials) -> ApiResult<AuthUser> {
        validate_login(credentials).map_err(ApiError::InvalidInput)?;

        let payload: AuthPayload = self
            .client
            .post(&["auth", "login"], credentials)
            .await?
            .into_data()?;

        self.auth().set_session(payload.token, payload.user.clone())?;
        tracing::info!("Logged in as {} ({})", payload.user.username, payload.user.role.as_str());
        Ok(payload.user)
    }

    /// Tell the server (best effort) and always drop the local session
    pub async fn logout(&self) -> ApiResult<()> {
        if self.auth().is_authenticated() {
            if let Err(e) = self.client.post_empty::<IgnoredAny>(&["auth", "logout"]).await {
                tracing::warn!("Logout request failed: {}", e);
            }
        }
        self.auth().clear_token()?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Load the persisted session and confirm it with the server.
    /// Returns the confirmed user, or `None` when there is no usable session.
    pub async fn restore_session(&self) -> ApiResult<Option<AuthUser>> {
        if !self.auth().restore()? {
            return Ok(None);
        }

        let confirmed = self
            .client
            .post_empty::<UserPayload>(&["auth", "validate-token"])
            .await
            .and_then(|response| response.into_data());

        match confirmed {
            Ok(UserPayload { user }) => {
                // Server copy wins over the cached one
                if let Some(token) = self.auth().token() {
                    self.auth().set_session(token, user.clone())?;
                }
                tracing::info!("Session restored for {}", user.username);
                Ok(Some(user))
            }
            Err(e) => {
                tracing::warn!("Stored session rejected: {}", e);
                self.auth().clear_token()?;
                Ok(None)
            }
        }
    }

    /// Exchange the current token for a fresh one; logs out on failure
    pub async fn refresh_token(&self) -> ApiResult<()> {
        let refreshed = self
            .client
            .post_empty::<TokenPayload>(&["auth", "refresh-token"])
            .await
            .and_then(|response| response.into_data());

        match refreshed {
            Ok(TokenPayload { token }) => {
                self.auth().set_token(token)?;
                tracing::debug!("Token refreshed");
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Token refresh failed: {}", e);
                self.logout().await?;
                Err(e)
            }
        }
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.auth().user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth().is_authenticated()
    }
}
