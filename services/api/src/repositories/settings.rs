//! Settings repository
//!
//! Each settings document lives under its own `settings:<kind>` key. Missing
//! documents read as their defaults.

use std::sync::Arc;

use common::{
    cache::{KeyValueStore, get_json, set_json},
    error::{StoreError, StoreResult},
    models::{SettingsBundle, SettingsDocument, SettingsKind},
};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

/// Settings repository
#[derive(Clone)]
pub struct SettingsRepository {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsRepository {
    /// Create a new settings repository
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All documents, each defaulted when absent
    pub async fn bundle(&self) -> StoreResult<SettingsBundle> {
        let defaults = SettingsBundle::default();

        Ok(SettingsBundle {
            themes: self
                .document(SettingsKind::Themes)
                .await?
                .unwrap_or(defaults.themes),
            backgrounds: self
                .document(SettingsKind::Backgrounds)
                .await?
                .unwrap_or(defaults.backgrounds),
            fonts: self
                .document(SettingsKind::Fonts)
                .await?
                .unwrap_or(defaults.fonts),
            season: self
                .document(SettingsKind::Season)
                .await?
                .unwrap_or(defaults.season),
        })
    }

    /// Replace one document
    pub async fn update(&self, document: &SettingsDocument) -> StoreResult<()> {
        let kind = document.kind();
        set_json(self.store.as_ref(), &kind.key(), &document.to_value()?).await?;

        info!("Updated {} settings", kind);
        Ok(())
    }

    /// A stored document that no longer parses reads as absent
    async fn document<T: DeserializeOwned>(&self, kind: SettingsKind) -> StoreResult<Option<T>> {
        match get_json(self.store.as_ref(), &kind.key()).await {
            Err(StoreError::Serialization(e)) => {
                warn!("Ignoring unreadable {} settings: {}", kind, e);
                Ok(None)
            }
            result => result,
        }
    }
}
