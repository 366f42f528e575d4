//! Content backup: export everything, import a previous export

use chrono::Utc;
use common::models::{ProjectDraft, SettingsDocument, SettingsKind};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    error::{ApiError, ApiResult},
    models::{BackupExport, BackupImport, ImportSummary, ProjectPayload},
    state::AppState,
};

/// Snapshot every project and settings document
pub async fn export(state: &AppState) -> ApiResult<BackupExport> {
    Ok(BackupExport {
        projects: state.project_repository.list().await?,
        settings: state.settings_repository.bundle().await?,
        exported_at: Utc::now(),
    })
}

/// Restore a backup
///
/// Settings documents are all validated before any is written. Projects are
/// then created one by one as new records; entries that do not validate are
/// skipped and counted.
pub async fn import(state: &AppState, backup: BackupImport) -> ApiResult<ImportSummary> {
    let sections = [
        (SettingsKind::Themes, backup.themes),
        (SettingsKind::Backgrounds, backup.backgrounds),
        (SettingsKind::Fonts, backup.fonts),
        (SettingsKind::Season, backup.season),
    ];

    let documents = sections
        .into_iter()
        .filter_map(|(kind, data)| data.filter(|data| !data.is_null()).map(|data| (kind, data)))
        .map(|(kind, data)| SettingsDocument::parse(kind, data))
        .collect::<Result<Vec<_>, _>>()
        .map_err(ApiError::BadRequest)?;

    for document in &documents {
        state.settings_repository.update(document).await?;
    }

    let mut imported = 0;
    let mut skipped = 0;
    for entry in backup.projects.unwrap_or_default() {
        match project_draft(entry) {
            Ok(draft) => {
                state.project_repository.create(draft).await?;
                imported += 1;
            }
            Err(reason) => {
                warn!("Skipping project in backup: {}", reason);
                skipped += 1;
            }
        }
    }

    info!(
        "Imported backup: {} settings documents, {} projects, {} skipped",
        documents.len(),
        imported,
        skipped
    );

    Ok(ImportSummary {
        success: true,
        imported,
        skipped,
    })
}

fn project_draft(entry: Value) -> Result<ProjectDraft, String> {
    serde_json::from_value::<ProjectPayload>(entry)
        .map_err(|e| e.to_string())?
        .into_draft()
}
