//! Repositories over the key-value store

pub mod project;
pub mod settings;

pub use project::ProjectRepository;
pub use settings::SettingsRepository;
