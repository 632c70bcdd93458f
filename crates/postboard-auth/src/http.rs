//! HTTP client wrapper.
//!
//! Attaches the current bearer token to every request and turns a 401 on an
//! authorized request into a forced logout. The session it reads from and
//! notifies is injected at construction.

use crate::{AuthError, AuthResult};
use postboard_config_and_utils::Config;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Where the wrapper gets its bearer token and whom it tells about a 401.
pub trait AuthorizationSource: Send + Sync {
    /// Token to attach, read fresh for every request.
    fn bearer_token(&self) -> Option<String>;

    /// Called once for every 401 on an authorized request, before the error
    /// reaches the caller.
    fn on_unauthorized(&self);
}

/// Server error body. Only `message` is used.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum OnUnauthorized {
    ForceLogout,
    Propagate,
}

/// JSON API client bound to one base URL and one session.
pub struct ApiClient {
    http: Client,
    base_url: Url,
    auth: Arc<dyn AuthorizationSource>,
}

impl ApiClient {
    /// Create a client for `base_url`.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        auth: Arc<dyn AuthorizationSource>,
    ) -> AuthResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AuthError::Http)?;
        Ok(Self {
            http,
            base_url,
            auth,
        })
    }

    /// Create a client from the loaded configuration.
    pub fn from_config(config: &Config, auth: Arc<dyn AuthorizationSource>) -> AuthResult<Self> {
        let base_url = config
            .api_url()
            .map_err(|e| AuthError::Config(e.to_string()))?;
        Self::new(base_url, config.request_timeout(), auth)
    }

    /// Absolute URL for an API path such as `/posts/1`.
    pub fn endpoint(&self, path: &str) -> AuthResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Authorized GET returning JSON.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> AuthResult<T> {
        let token = self.auth.bearer_token();
        let response = self
            .execute::<()>(Method::GET, path, None, token, OnUnauthorized::ForceLogout)
            .await?;
        decode(response).await
    }

    /// Authorized POST with a JSON body, returning JSON.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> AuthResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let token = self.auth.bearer_token();
        let response = self
            .execute(Method::POST, path, Some(body), token, OnUnauthorized::ForceLogout)
            .await?;
        decode(response).await
    }

    /// GET with an explicit `token`. A 401 is returned without logging anyone
    /// out, for checking a credential that is not the session's yet.
    pub async fn get_unhooked(&self, path: &str, token: Option<&str>) -> AuthResult<Response> {
        self.execute::<()>(
            Method::GET,
            path,
            None,
            token.map(str::to_string),
            OnUnauthorized::Propagate,
        )
        .await
    }

    /// POST that is not about the current session: `token` is attached as
    /// given and a 401 is returned without logging anyone out.
    pub async fn post_unhooked<B>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> AuthResult<Response>
    where
        B: Serialize + ?Sized,
    {
        self.execute(
            Method::POST,
            path,
            Some(body),
            token.map(str::to_string),
            OnUnauthorized::Propagate,
        )
        .await
    }

    async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        token: Option<String>,
        on_unauthorized: OnUnauthorized,
    ) -> AuthResult<Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        debug!(method = %method, url = %url, authorized = token.is_some(), "API request");

        let mut request = self
            .http
            .request(method.clone(), url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        request = with_bearer(request, token.as_deref());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(AuthError::from_transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error = error_from_response(response).await;
        if status == StatusCode::UNAUTHORIZED && on_unauthorized == OnUnauthorized::ForceLogout {
            info!(method = %method, path = %path, "Request unauthorized, forcing logout");
            self.auth.on_unauthorized();
        } else {
            debug!(method = %method, path = %path, status = %status, "API request failed");
        }
        Err(error)
    }
}

fn with_bearer(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
        None => request,
    }
}

pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> AuthResult<T> {
    let bytes = response.bytes().await.map_err(AuthError::from_transport)?;
    Ok(serde_json::from_slice(&bytes)?)
}

async fn error_from_response(response: Response) -> AuthError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty());

    if status == StatusCode::UNAUTHORIZED {
        AuthError::Unauthorized { message }
    } else {
        AuthError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoSession;

    impl AuthorizationSource for NoSession {
        fn bearer_token(&self) -> Option<String> {
            None
        }

        fn on_unauthorized(&self) {}
    }

    fn client(base: &str) -> ApiClient {
        ApiClient::new(
            Url::parse(base).unwrap(),
            Duration::from_secs(5),
            Arc::new(NoSession),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let api = client("http://localhost:4000");
        assert_eq!(
            api.endpoint("/auth/login").unwrap().as_str(),
            "http://localhost:4000/auth/login"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let api = client("https://example.com/api/");
        assert_eq!(
            api.endpoint("posts/7").unwrap().as_str(),
            "https://example.com/api/posts/7"
        );
    }

    #[test]
    fn test_from_config_rejects_bad_url() {
        let config = Config {
            api_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            ApiClient::from_config(&config, Arc::new(NoSession)),
            Err(AuthError::Config(_))
        ));
    }
}
