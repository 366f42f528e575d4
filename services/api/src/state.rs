//! Application state shared across handlers

use std::sync::Arc;

use common::{cache::KeyValueStore, token::TokenService};

use crate::repositories::{ProjectRepository, SettingsRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KeyValueStore>,
    pub token_service: TokenService,
    pub project_repository: ProjectRepository,
    pub settings_repository: SettingsRepository,
}

impl AppState {
    pub fn new(store: Arc<dyn KeyValueStore>, token_service: TokenService) -> Self {
        Self {
            project_repository: ProjectRepository::new(store.clone()),
            settings_repository: SettingsRepository::new(store.clone()),
            store,
            token_service,
        }
    }
}
