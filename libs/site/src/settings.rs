//! The state the public site renders from
//!
//! [`SiteSettings::load`] picks exactly one source:
//!
//! 1. the API, when both public reads succeed; the result is written through
//!    to the local cache
//! 2. the local cache, only when the API fails
//! 3. built-in defaults, when neither is available
//!
//! Sources are never merged field by field. When the chosen source has no
//! visible projects, the bundled demo projects are shown instead.

use chrono::{Datelike, Local};
use common::models::{Fonts, Project, Season, Theme};
use tracing::{info, warn};

use crate::{
    defaults::default_projects,
    error::SiteResult,
    gallery::{GallerySection, gallery_sections},
    local::{CachedSettings, LocalCache},
    remote::RemoteSource,
    snapshot::Snapshot,
    theme::{css_variables, render_root_rule, resolve_theme},
};

/// Where the loaded content came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    Remote,
    Local,
    Defaults,
}

/// Loaded site content plus the visitor's auto-season preference
#[derive(Debug, Clone, PartialEq)]
pub struct SiteSettings {
    snapshot: Snapshot,
    auto_season: bool,
    source: ContentSource,
    demo_projects: bool,
}

impl SiteSettings {
    /// Load content from the API, falling back to the local cache
    ///
    /// Never fails: any source that cannot be read is logged and skipped.
    pub async fn load(remote: &RemoteSource, local: &LocalCache) -> SiteSettings {
        let cached = match local.load_async().await {
            Ok(cached) => cached,
            Err(e) => {
                warn!("Ignoring unreadable local cache {}: {}", local.path().display(), e);
                None
            }
        };
        let auto_season = cached.as_ref().is_none_or(|cached| cached.auto_season);

        let (snapshot, source) = match remote.snapshot().await {
            Ok(snapshot) => {
                let write_through = CachedSettings {
                    snapshot: snapshot.clone(),
                    auto_season,
                };
                if let Err(e) = local.store_async(write_through).await {
                    warn!("Failed to update local cache: {}", e);
                }
                (snapshot, ContentSource::Remote)
            }
            Err(e) => {
                warn!("API unavailable, falling back: {}", e);
                match cached {
                    Some(cached) => (cached.snapshot, ContentSource::Local),
                    None => (Snapshot::default(), ContentSource::Defaults),
                }
            }
        };

        info!("Loaded site content from {:?}", source);
        SiteSettings::from_snapshot(snapshot, auto_season, source)
    }

    /// Build the state from an already chosen snapshot
    pub fn from_snapshot(
        mut snapshot: Snapshot,
        auto_season: bool,
        source: ContentSource,
    ) -> SiteSettings {
        snapshot.projects.retain(|project| !project.hidden);

        let demo_projects = snapshot.projects.is_empty();
        if demo_projects {
            snapshot.projects = default_projects();
        }

        SiteSettings {
            snapshot,
            auto_season,
            source,
            demo_projects,
        }
    }

    /// Persist the current state to the local cache
    ///
    /// Demo projects are not written, so a later fallback still sees an empty
    /// project list rather than the demos.
    pub async fn save(&self, local: &LocalCache) -> SiteResult<()> {
        let mut snapshot = self.snapshot.clone();
        if self.demo_projects {
            snapshot.projects.clear();
        }

        local
            .store_async(CachedSettings {
                snapshot,
                auto_season: self.auto_season,
            })
            .await
    }

    pub fn source(&self) -> ContentSource {
        self.source
    }

    /// Whether the bundled demo projects stand in for real content
    pub fn uses_demo_projects(&self) -> bool {
        self.demo_projects
    }

    /// Visible projects, in display order
    pub fn projects(&self) -> &[Project] {
        &self.snapshot.projects
    }

    pub fn fonts(&self) -> &Fonts {
        &self.snapshot.settings.fonts
    }

    /// The season configured by the admin
    pub fn stored_season(&self) -> Season {
        self.snapshot.settings.season
    }

    pub fn auto_season(&self) -> bool {
        self.auto_season
    }

    pub fn set_auto_season(&mut self, enabled: bool) {
        self.auto_season = enabled;
    }

    /// Season in effect during calendar `month` (1 = January)
    pub fn active_season_at(&self, month: u32) -> Season {
        if self.auto_season {
            Season::from_month(month)
        } else {
            self.stored_season()
        }
    }

    /// Season in effect now, by local time
    pub fn active_season(&self) -> Season {
        self.active_season_at(Local::now().month())
    }

    /// Theme for `season`, falling back to the default theme
    pub fn theme_for(&self, season: Season) -> Theme {
        resolve_theme(&self.snapshot.settings.themes, season)
    }

    /// `:root` rule with the presentation variables for `season`
    pub fn css_for(&self, season: Season) -> String {
        render_root_rule(&css_variables(&self.theme_for(season), self.fonts()))
    }

    /// `:root` rule for the season in effect now
    pub fn css(&self) -> String {
        self.css_for(self.active_season())
    }

    /// Category sections of the page
    pub fn gallery(&self) -> Vec<GallerySection<'_>> {
        gallery_sections(&self.snapshot.projects, &self.snapshot.settings.backgrounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, routing::get};
    use chrono::Utc;
    use common::models::{
        Category, ProjectDetails, ProjectDraft, SettingsBundle, default_themes,
    };
    use tokio::net::TcpListener;

    fn project(id: &str, category: Category, hidden: bool) -> Project {
        Project::from_draft(
            id.to_string(),
            ProjectDraft {
                title: format!("Project {}", id),
                category,
                details: ProjectDetails::default(),
                hidden,
            },
            Utc::now(),
        )
    }

    /// Serve `projects` and `settings` on an ephemeral port
    async fn spawn_api(projects: Vec<Project>, settings: SettingsBundle) -> String {
        let app = Router::new()
            .route("/projects", get(move || async move { Json(projects) }))
            .route("/settings", get(move || async move { Json(settings) }));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    /// An address nothing listens on
    async fn unreachable_api() -> RemoteSource {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        RemoteSource::new(&format!("http://{}", addr), 1).unwrap()
    }

    #[tokio::test]
    async fn test_remote_wins_and_writes_through() {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalCache::new(dir.path().join("settings.json"));
        local
            .store(&CachedSettings {
                snapshot: Snapshot {
                    projects: vec![project("stale", Category::Reels, false)],
                    ..Snapshot::default()
                },
                auto_season: false,
            })
            .unwrap();

        let mut settings = SettingsBundle::default();
        settings.season = Season::Summer;
        let base_url = spawn_api(vec![project("p1", Category::Graphics, false)], settings).await;
        let remote = RemoteSource::new(&base_url, 5).unwrap();

        let site = SiteSettings::load(&remote, &local).await;

        assert_eq!(site.source(), ContentSource::Remote);
        assert_eq!(site.projects().len(), 1);
        assert_eq!(site.projects()[0].id, "p1");
        assert_eq!(site.stored_season(), Season::Summer);
        // Local preference survives a remote load
        assert!(!site.auto_season());

        let cached = local.load().unwrap().unwrap();
        assert_eq!(cached.snapshot.projects[0].id, "p1");
        assert_eq!(cached.snapshot.settings.season, Season::Summer);
        assert!(!cached.auto_season);
    }

    #[tokio::test]
    async fn test_local_cache_used_when_remote_fails() {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalCache::new(dir.path().join("settings.json"));
        let mut snapshot = Snapshot {
            projects: vec![project("cached", Category::Posters, false)],
            ..Snapshot::default()
        };
        snapshot.settings.season = Season::Rainy;
        local
            .store(&CachedSettings {
                snapshot,
                auto_season: false,
            })
            .unwrap();

        let site = SiteSettings::load(&unreachable_api().await, &local).await;

        assert_eq!(site.source(), ContentSource::Local);
        assert_eq!(site.projects()[0].id, "cached");
        assert_eq!(site.active_season_at(7), Season::Rainy);
    }

    #[tokio::test]
    async fn test_defaults_when_both_sources_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalCache::new(dir.path().join("settings.json"));

        let site = SiteSettings::load(&unreachable_api().await, &local).await;

        assert_eq!(site.source(), ContentSource::Defaults);
        assert!(site.uses_demo_projects());
        assert_eq!(site.projects().len(), 8);
        assert!(site.auto_season());
        assert!(local.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_error_status_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalCache::new(dir.path().join("settings.json"));

        // No routes: every read answers 404
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, Router::new()).await.unwrap();
        });
        let remote = RemoteSource::new(&format!("http://{}", addr), 5).unwrap();

        let site = SiteSettings::load(&remote, &local).await;
        assert_eq!(site.source(), ContentSource::Defaults);
    }

    #[test]
    fn test_hidden_projects_are_dropped() {
        let snapshot = Snapshot {
            projects: vec![
                project("shown", Category::Reels, false),
                project("hidden", Category::Reels, true),
            ],
            ..Snapshot::default()
        };
        let site = SiteSettings::from_snapshot(snapshot, true, ContentSource::Remote);

        assert!(!site.uses_demo_projects());
        let ids: Vec<&str> = site.projects().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["shown"]);
    }

    #[test]
    fn test_only_hidden_projects_shows_demos() {
        let snapshot = Snapshot {
            projects: vec![project("hidden", Category::Reels, true)],
            ..Snapshot::default()
        };
        let site = SiteSettings::from_snapshot(snapshot, true, ContentSource::Remote);

        assert!(site.uses_demo_projects());
        assert_eq!(site.projects().len(), 8);
    }

    #[test]
    fn test_active_season() {
        let mut snapshot = Snapshot::default();
        snapshot.settings.season = Season::Spring;
        let mut site = SiteSettings::from_snapshot(snapshot, true, ContentSource::Remote);

        assert_eq!(site.active_season_at(1), Season::Winter);
        assert_eq!(site.active_season_at(4), Season::Spring);
        assert_eq!(site.active_season_at(7), Season::Summer);
        assert_eq!(site.active_season_at(10), Season::Rainy);
        assert_eq!(site.active_season_at(12), Season::Winter);

        site.set_auto_season(false);
        assert_eq!(site.active_season_at(7), Season::Spring);
        assert_eq!(site.active_season(), Season::Spring);
    }

    #[test]
    fn test_css_uses_season_theme() {
        let site = SiteSettings::from_snapshot(Snapshot::default(), false, ContentSource::Defaults);
        let winter = &default_themes()[&Season::Winter];

        let css = site.css_for(Season::Winter);
        assert!(css.contains(&format!("--bg-primary: {};", winter.bg_primary)));
        assert!(css.contains("--font-heading: 'Syne', sans-serif;"));

        // Stored season is default, auto-season off
        assert!(site.css().contains("--bg-primary: #0a0a0b;"));
    }

    #[tokio::test]
    async fn test_save_keeps_demos_out_of_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalCache::new(dir.path().join("settings.json"));
        let mut site =
            SiteSettings::from_snapshot(Snapshot::default(), true, ContentSource::Defaults);
        site.set_auto_season(false);

        site.save(&local).await.unwrap();

        let cached = local.load().unwrap().unwrap();
        assert!(cached.snapshot.projects.is_empty());
        assert!(!cached.auto_season);
    }

    #[test]
    fn test_gallery_from_state() {
        let site = SiteSettings::from_snapshot(Snapshot::default(), true, ContentSource::Defaults);
        let sections = site.gallery();

        assert_eq!(sections.len(), 4);
        assert_eq!(sections[0].category, Category::Reels);
        assert_eq!(sections.iter().map(|s| s.total).sum::<usize>(), 8);
    }
}
