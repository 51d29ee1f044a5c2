use std::sync::Arc;

use crate::config::AppConfig;
use crate::mail::{DisabledMailer, Mailer};
use crate::repo::ContentStore;

/// Shared by every handler; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub content: ContentStore,
    pub mailer: Arc<dyn Mailer>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(content: ContentStore, mailer: Arc<dyn Mailer>, config: AppConfig) -> Self {
        Self {
            content,
            mailer,
            config: Arc::new(config),
        }
    }

    /// Memory store, no email relay.
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(ContentStore::memory(), Arc::new(DisabledMailer), config)
    }
}
