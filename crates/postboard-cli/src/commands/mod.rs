//! CLI command implementations.

mod auth;
mod posts;

pub use auth::{login, logout, status, whoami};
pub use posts::{posts_list, posts_show};

use anyhow::{Context, Result};
use postboard_auth::{ApiClient, AuthFlowController, PostsApi, SessionContext};
use postboard_config_and_utils::{Config, Paths};
use std::sync::Arc;
use tracing::debug;

/// Everything a command needs, built once at startup.
pub struct App {
    pub config: Config,
    pub session: Arc<SessionContext>,
    pub controller: AuthFlowController,
    pub posts: PostsApi,
}

impl App {
    /// Wire the session, API client and controller, then restore any
    /// persisted session.
    pub async fn start(config: Config, paths: &Paths) -> Result<Self> {
        let session = SessionContext::open(paths);
        let client = Arc::new(
            ApiClient::from_config(&config, session.clone())
                .context("Failed to create API client")?,
        );
        let controller = AuthFlowController::new(session.clone(), client.clone())
            .with_revoke_on_logout(config.revoke_on_logout);

        let restored = controller.restore_session().await;
        debug!(restored, api_url = %config.api_url, "Client ready");

        Ok(Self {
            config,
            session,
            controller,
            posts: PostsApi::new(client),
        })
    }
}
