//! API models for request and response payloads

use chrono::{DateTime, Utc};
use common::models::{Category, Project, ProjectDetails, ProjectDraft, ProjectPatch, SettingsBundle};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Project fields as the admin panel sends them
///
/// Everything is optional here; [`ProjectPayload::into_draft`] and
/// [`ProjectPayload::into_patch`] decide what a request must carry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    pub id: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
    #[serde(flatten)]
    pub details: ProjectDetails,
    pub hidden: Option<bool>,
}

impl ProjectPayload {
    /// Validate as a new project; any `id` sent along is ignored
    pub fn into_draft(self) -> Result<ProjectDraft, String> {
        let (Some(title), Some(category)) = (non_empty(self.title), non_empty(self.category))
        else {
            return Err("Title and category are required".to_string());
        };

        Ok(ProjectDraft {
            title,
            category: category.parse::<Category>()?,
            details: self.details,
            hidden: self.hidden.unwrap_or(false),
        })
    }

    /// Validate as an update of the project named by `id`
    pub fn into_patch(self) -> Result<(String, ProjectPatch), String> {
        let id = non_empty(self.id).ok_or_else(|| "Project ID is required".to_string())?;

        let title = match self.title {
            Some(title) if title.trim().is_empty() => {
                return Err("Title must not be empty".to_string());
            }
            title => title,
        };
        let category = self
            .category
            .map(|category| category.parse::<Category>())
            .transpose()?;

        Ok((
            id,
            ProjectPatch {
                title,
                category,
                details: self.details,
                hidden: self.hidden,
            },
        ))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Body or query naming a single project
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectIdPayload {
    pub id: Option<String>,
}

/// New project order, as a permutation of the stored ids
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderRequest {
    pub ids: Option<Vec<String>>,
}

/// Settings update: `type` names the document, `data` replaces it
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsUpdateRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub data: Option<Value>,
}

/// Full backup of the site content
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupExport {
    pub projects: Vec<Project>,
    #[serde(flatten)]
    pub settings: SettingsBundle,
    pub exported_at: DateTime<Utc>,
}

/// Backup as uploaded for import; every part is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackupImport {
    pub projects: Option<Vec<Value>>,
    pub themes: Option<Value>,
    pub backgrounds: Option<Value>,
    pub fonts: Option<Value>,
    pub season: Option<Value>,
}

/// Outcome of an import
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub success: bool,
    pub imported: usize,
    pub skipped: usize,
}
