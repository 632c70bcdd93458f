//! Posts endpoints.

use crate::http::ApiClient;
use crate::model::string_or_number;
use crate::AuthResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Used when a listing fails without any message to show.
pub const LOAD_POSTS_FALLBACK: &str = "Failed to load posts";

/// A post as returned by the API. Fields this client does not model are kept
/// in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number", skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "string_or_number")] String);

    Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(id)| id))
}

/// Typed access to `/posts`. Every call is authorized.
#[derive(Clone)]
pub struct PostsApi {
    client: Arc<ApiClient>,
}

impl PostsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// `GET /posts`.
    pub async fn list(&self) -> AuthResult<Vec<Post>> {
        self.client.get("/posts").await
    }

    /// `GET /posts/{id}`.
    pub async fn show(&self, id: &str) -> AuthResult<Post> {
        self.client.get(&format!("/posts/{id}")).await
    }
}
