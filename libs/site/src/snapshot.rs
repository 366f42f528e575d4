//! The content the site renders from, as one document

use common::models::{Project, SettingsBundle};
use serde::{Deserialize, Serialize};

/// Projects plus settings, as fetched from the API or read from the cache
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(flatten)]
    pub settings: SettingsBundle,
}
