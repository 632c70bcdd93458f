//! Shared setup for integration tests against a mock Postboard API.

#![allow(dead_code)]

use postboard_auth::{ApiClient, AuthFlowController, PostsApi, SessionContext};
use postboard_storage::{DurableStorage, StorageError, StorageResult};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::MockServer;

pub fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

/// A session, API client and controller wired to a mock server.
pub struct Harness {
    pub server: MockServer,
    pub session: Arc<SessionContext>,
    pub client: Arc<ApiClient>,
    pub controller: AuthFlowController,
}

impl Harness {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base = Url::parse(&server.uri()).unwrap();
        Self::with_base_url(server, base, SessionContext::in_memory())
    }

    /// Harness sharing `session`, e.g. one whose token store was pre-filled.
    pub async fn start_with_session(session: Arc<SessionContext>) -> Self {
        let server = MockServer::start().await;
        let base = Url::parse(&server.uri()).unwrap();
        Self::with_base_url(server, base, session)
    }

    fn with_base_url(server: MockServer, base: Url, session: Arc<SessionContext>) -> Self {
        let client = Arc::new(
            ApiClient::new(base, Duration::from_secs(5), session.clone()).unwrap(),
        );
        let controller = AuthFlowController::new(session.clone(), client.clone());
        Self {
            server,
            session,
            client,
            controller,
        }
    }

    pub fn posts(&self) -> PostsApi {
        PostsApi::new(self.client.clone())
    }
}

/// Durable medium that rejects every operation, like a read-only home dir.
pub struct FailingStorage;

impl DurableStorage for FailingStorage {
    fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Platform("read-only file system".to_string()))
    }

    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Platform("read-only file system".to_string()))
    }

    fn delete(&self, _key: &str) -> StorageResult<bool> {
        Err(StorageError::Platform("read-only file system".to_string()))
    }
}

pub fn user_json(id: &str) -> Value {
    json!({ "id": id, "email": format!("user{id}@example.com"), "role": "user" })
}

pub fn login_json(id: &str, access_token: &str, refresh_token: Option<&str>) -> Value {
    let mut body = json!({ "user": user_json(id), "accessToken": access_token });
    if let Some(refresh) = refresh_token {
        body["refreshToken"] = json!(refresh);
    }
    body
}
