//! Application state management

use std::sync::Arc;

use kith::graph::{GraphConfig, RelationshipEngine};
use kith::mail::{HttpMailer, Mailer, NullMailer};
use kith::storage::AccountStore;

use crate::api::auth_service::AuthService;
use crate::config::ServerConfig;

/// Application state shared across all handlers
#[derive(Debug)]
pub struct AppState {
    /// Account store backing both auth and the relationship engine
    pub store: Arc<dyn AccountStore>,

    /// Relationship engine over the store
    pub engine: RelationshipEngine,

    /// Server configuration
    pub config: ServerConfig,

    /// Authentication service
    pub auth_service: Option<AuthService>,

    /// Verification-mail collaborator
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Create new application state
    pub fn new(store: Arc<dyn AccountStore>, config: ServerConfig) -> Self {
        let engine = RelationshipEngine::new(
            store.clone(),
            GraphConfig {
                strict_guards: config.strict_relationship_guards,
            },
        );

        let mailer: Arc<dyn Mailer> = match &config.mail_relay_url {
            Some(url) => Arc::new(HttpMailer::new(url.clone())),
            None => Arc::new(NullMailer),
        };

        Self {
            store,
            engine,
            config,
            auth_service: None, // Will be set later if auth is enabled
            mailer,
        }
    }

    /// Set the authentication service (called after initialization if auth is enabled)
    pub fn set_auth_service(&mut self, auth_service: AuthService) {
        self.auth_service = Some(auth_service);
    }
}
