//! Content models shared by the api service and the site crate

pub mod project;
pub mod settings;

// Re-export for convenience
pub use project::{Category, Project, ProjectDetails, ProjectDraft, ProjectPatch};
pub use settings::{
    Backgrounds, Fonts, Season, SettingsBundle, SettingsDocument, SettingsKind, Theme, Themes,
    default_themes,
};
