//! Auth endpoints.

use crate::http::{decode, ApiClient};
use crate::model::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserProfile};
use crate::AuthResult;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Typed access to `/auth/*`.
#[derive(Clone)]
pub struct AuthApi {
    client: Arc<ApiClient>,
}

impl AuthApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// `POST /auth/login`. A 401 here rejects the submitted credentials and
    /// leaves the current session alone.
    pub async fn login(&self, request: &LoginRequest) -> AuthResult<LoginResponse> {
        debug!(email = %request.email, "Submitting credentials");
        let response = self
            .client
            .post_unhooked("/auth/login", request, None)
            .await?;
        decode(response).await
    }

    /// `GET /auth/me` for the current session.
    pub async fn me(&self) -> AuthResult<UserProfile> {
        self.client.get("/auth/me").await
    }

    /// `GET /auth/me` for a persisted `access_token` that is not the session's
    /// yet. A 401 here leaves the session alone.
    pub async fn me_with_token(&self, access_token: &str) -> AuthResult<UserProfile> {
        let response = self
            .client
            .get_unhooked("/auth/me", Some(access_token))
            .await?;
        decode(response).await
    }

    /// `POST /auth/refresh`.
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<RefreshResponse> {
        self.client
            .post("/auth/refresh", &RefreshRequest { refresh_token })
            .await
    }

    /// `POST /auth/logout` with an explicit token. The body of the answer is ignored.
    pub async fn revoke(&self, access_token: &str) -> AuthResult<()> {
        self.client
            .post_unhooked("/auth/logout", &json!({}), Some(access_token))
            .await?;
        Ok(())
    }
}
