//! Session context: the token store and the session container, constructed
//! once at the application root and shared by `Arc`.

use crate::http::AuthorizationSource;
use crate::store::SessionStore;
use postboard_config_and_utils::Paths;
use postboard_storage::{create_token_store, TokenStore};
use std::sync::Arc;
use tracing::info;

pub struct SessionContext {
    store: SessionStore,
    tokens: TokenStore,
}

impl SessionContext {
    pub fn new(tokens: TokenStore) -> Arc<Self> {
        Arc::new(Self {
            store: SessionStore::new(),
            tokens,
        })
    }

    /// Context persisting credentials under `paths`.
    pub fn open(paths: &Paths) -> Arc<Self> {
        Self::new(create_token_store(paths))
    }

    /// Context whose credentials live only in memory.
    pub fn in_memory() -> Arc<Self> {
        Self::new(TokenStore::in_memory())
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Clear the persisted credential and reset the session.
    pub fn logout_locally(&self) {
        self.store.logout(|| self.tokens.clear_credential());
    }
}

impl AuthorizationSource for SessionContext {
    fn bearer_token(&self) -> Option<String> {
        self.store.snapshot().access_token().map(str::to_string)
    }

    fn on_unauthorized(&self) {
        info!("Session rejected by server, logging out");
        self.logout_locally();
    }
}
