//! Auth flow controller.
//!
//! Runs the side effects of logging in and out: the login request, credential
//! persistence, best-effort revocation and restoring a persisted session.
//! State changes go through the [`SessionStore`](crate::SessionStore) so the
//! phase, the generation and the session state move together.

use crate::api::AuthApi;
use crate::context::SessionContext;
use crate::http::ApiClient;
use crate::model::{LoginRequest, UserProfile};
use crate::{AuthError, AuthResult};
use postboard_storage::Credential;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Used when a login fails without any message to show.
pub const LOGIN_FAILED_FALLBACK: &str = "Login failed";

/// How a login attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The session now belongs to this user.
    Authenticated(UserProfile),
    /// The attempt failed; the message was recorded in the session.
    Failed(String),
    /// A newer login or a logout happened first; nothing was committed.
    Superseded,
}

pub struct AuthFlowController {
    session: Arc<SessionContext>,
    auth_api: AuthApi,
    revoke_on_logout: bool,
}

impl AuthFlowController {
    pub fn new(session: Arc<SessionContext>, client: Arc<ApiClient>) -> Self {
        Self {
            session,
            auth_api: AuthApi::new(client),
            revoke_on_logout: false,
        }
    }

    /// Also call `POST /auth/logout` on explicit logout.
    pub fn with_revoke_on_logout(mut self, revoke: bool) -> Self {
        self.revoke_on_logout = revoke;
        self
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// Log in. Failures end up in the session's `error` field and in the
    /// returned outcome; this never fails itself.
    pub async fn login(&self, email: &str, password: &str) -> LoginOutcome {
        let request = LoginRequest::new(email, password);
        let ticket = self.session.store().begin_login(&request);
        debug!(generation = ticket.generation(), "Login started");

        match self.auth_api.login(&request).await {
            Ok(response) => {
                let credential =
                    Credential::new(response.access_token.clone(), response.refresh_token);
                let user = response.user;
                let committed = self.session.store().succeed_login(
                    ticket,
                    user.clone(),
                    response.access_token,
                    || self.session.tokens().save_credential(&credential),
                );
                if committed {
                    LoginOutcome::Authenticated(user)
                } else {
                    LoginOutcome::Superseded
                }
            }
            Err(e) => {
                let message = e.user_message(LOGIN_FAILED_FALLBACK);
                if self.session.store().fail_login(ticket, message.clone()) {
                    LoginOutcome::Failed(message)
                } else {
                    LoginOutcome::Superseded
                }
            }
        }
    }

    /// Log out locally, then revoke the token on the server if configured.
    ///
    /// The local session is gone before the revocation request starts, and a
    /// failed revocation is only logged.
    pub async fn logout(&self) {
        let token = self
            .session
            .store()
            .snapshot()
            .access_token()
            .map(str::to_string)
            .or_else(|| {
                self.session
                    .tokens()
                    .load_credential()
                    .map(|c| c.access_token)
            });

        self.session.logout_locally();
        info!("Logged out");

        if !self.revoke_on_logout {
            return;
        }
        let Some(token) = token else {
            return;
        };
        match self.auth_api.revoke(&token).await {
            Ok(()) => debug!("Token revoked"),
            Err(e) => warn!(error = %e, "Token revocation failed"),
        }
    }

    /// Adopt the persisted credential if the server still accepts it.
    ///
    /// A 401 clears the stale credential, unless a login or logout happened
    /// while the check was in flight. Any other failure keeps the credential
    /// for the next attempt.
    pub async fn restore_session(&self) -> bool {
        let Some(credential) = self.session.tokens().load_credential() else {
            debug!("No persisted session");
            return false;
        };
        let ticket = self.session.store().current_ticket();

        match self.auth_api.me_with_token(&credential.access_token).await {
            Ok(user) => self
                .session
                .store()
                .restore(ticket, user, credential.access_token),
            Err(AuthError::Unauthorized { .. }) => {
                let cleared = self
                    .session
                    .store()
                    .logout_if_current(ticket, || self.session.tokens().clear_credential());
                info!(cleared, "Persisted session was rejected");
                false
            }
            Err(e) => {
                warn!(error = %e, "Could not verify persisted session");
                false
            }
        }
    }

    /// Reload the current user's profile.
    pub async fn refresh_profile(&self) -> AuthResult<UserProfile> {
        if !self.session.store().snapshot().is_authenticated() {
            return Err(AuthError::NotLoggedIn);
        }
        let user = self.auth_api.me().await?;
        if !self.session.store().set_user(user.clone()) {
            return Err(AuthError::NotLoggedIn);
        }
        Ok(user)
    }
}
