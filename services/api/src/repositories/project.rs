//! Project repository
//!
//! All projects live in one JSON array under [`PROJECTS_KEY`], in display
//! order. Every write rewrites the whole array. Writers in this process take
//! turns; writers in other processes still race, and the last write wins.

use std::{collections::HashSet, sync::Arc};

use chrono::Utc;
use common::{
    cache::{KeyValueStore, get_json, set_json},
    error::StoreResult,
    models::{Project, ProjectDraft, ProjectPatch},
};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

/// Key holding the project array
pub const PROJECTS_KEY: &str = "projects";

/// Project repository
#[derive(Clone)]
pub struct ProjectRepository {
    store: Arc<dyn KeyValueStore>,
    write_lock: Arc<Mutex<()>>,
}

impl ProjectRepository {
    /// Create a new project repository
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Every project, hidden ones included
    pub async fn list(&self) -> StoreResult<Vec<Project>> {
        Ok(get_json(self.store.as_ref(), PROJECTS_KEY)
            .await?
            .unwrap_or_default())
    }

    /// Projects visitors may see
    pub async fn list_public(&self) -> StoreResult<Vec<Project>> {
        let mut projects = self.list().await?;
        projects.retain(|project| !project.hidden);
        Ok(projects)
    }

    /// Append a new project with a fresh id and timestamps
    pub async fn create(&self, draft: ProjectDraft) -> StoreResult<Project> {
        let _guard = self.write_lock.lock().await;
        let mut projects = self.list().await?;

        let project = Project::from_draft(Uuid::new_v4().to_string(), draft, Utc::now());
        projects.push(project.clone());
        self.save(&projects).await?;

        info!("Created project {} ({})", project.id, project.title);
        Ok(project)
    }

    /// Merge `patch` into the project with `id`; `None` if there is none
    pub async fn update(&self, id: &str, patch: ProjectPatch) -> StoreResult<Option<Project>> {
        let _guard = self.write_lock.lock().await;
        let mut projects = self.list().await?;

        let Some(project) = projects.iter_mut().find(|project| project.id == id) else {
            return Ok(None);
        };
        project.apply(patch, Utc::now());
        let updated = project.clone();
        self.save(&projects).await?;

        info!("Updated project {}", id);
        Ok(Some(updated))
    }

    /// Remove the project with `id`; `false` if there is none
    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut projects = self.list().await?;

        let before = projects.len();
        projects.retain(|project| project.id != id);
        if projects.len() == before {
            return Ok(false);
        }
        self.save(&projects).await?;

        info!("Deleted project {}", id);
        Ok(true)
    }

    /// Rewrite the sequence in the order of `ids`
    ///
    /// Returns `None` unless `ids` names every stored project exactly once.
    pub async fn reorder(&self, ids: &[String]) -> StoreResult<Option<Vec<Project>>> {
        let _guard = self.write_lock.lock().await;
        let mut projects = self.list().await?;

        let unique: HashSet<&str> = ids.iter().map(String::as_str).collect();
        if ids.len() != projects.len()
            || unique.len() != ids.len()
            || projects.iter().any(|project| !unique.contains(project.id.as_str()))
        {
            return Ok(None);
        }

        projects.sort_by_key(|project| ids.iter().position(|id| *id == project.id));
        self.save(&projects).await?;

        info!("Reordered {} projects", projects.len());
        Ok(Some(projects))
    }

    async fn save(&self, projects: &[Project]) -> StoreResult<()> {
        set_json(self.store.as_ref(), PROJECTS_KEY, projects).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{
        cache::MemoryStore,
        models::{Category, ProjectDetails},
    };

    fn draft(title: &str, hidden: bool) -> ProjectDraft {
        ProjectDraft {
            title: title.to_string(),
            category: Category::Reels,
            details: ProjectDetails::default(),
            hidden,
        }
    }

    fn repository() -> ProjectRepository {
        ProjectRepository::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let repo = repository();
        assert!(repo.list().await.unwrap().is_empty());

        let first = repo.create(draft("First", false)).await.unwrap();
        let second = repo.create(draft("Second", true)).await.unwrap();
        assert_ne!(first.id, second.id);
        assert!(Uuid::parse_str(&first.id).is_ok());
        assert_eq!(first.created_at, first.updated_at);

        let all = repo.list().await.unwrap();
        assert_eq!(all, vec![first.clone(), second]);

        assert_eq!(repo.list_public().await.unwrap(), vec![first]);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = repository();
        let project = repo.create(draft("Original", false)).await.unwrap();

        let patch = ProjectPatch {
            title: Some("Renamed".to_string()),
            ..ProjectPatch::default()
        };
        let updated = repo.update(&project.id, patch.clone()).await.unwrap().unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.created_at, project.created_at);
        assert!(updated.updated_at >= project.updated_at);
        assert_eq!(repo.list().await.unwrap(), vec![updated]);

        assert_eq!(repo.update("missing", patch).await.unwrap(), None);

        assert!(!repo.delete("missing").await.unwrap());
        assert!(repo.delete(&project.id).await.unwrap());
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reorder() {
        let repo = repository();
        let a = repo.create(draft("A", false)).await.unwrap();
        let b = repo.create(draft("B", false)).await.unwrap();
        let c = repo.create(draft("C", true)).await.unwrap();

        let order = vec![c.id.clone(), a.id.clone(), b.id.clone()];
        let reordered = repo.reorder(&order).await.unwrap().unwrap();
        let titles: Vec<&str> = reordered.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["C", "A", "B"]);
        assert_eq!(repo.list().await.unwrap(), reordered);

        // Not a permutation: missing, duplicated or unknown ids
        assert_eq!(repo.reorder(&[a.id.clone(), b.id.clone()]).await.unwrap(), None);
        assert_eq!(
            repo.reorder(&[a.id.clone(), a.id.clone(), b.id.clone()])
                .await
                .unwrap(),
            None
        );
        assert_eq!(
            repo.reorder(&[a.id.clone(), b.id.clone(), "other".to_string()])
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_not_lost() {
        let repo = repository();
        let handles: Vec<_> = (0..10)
            .map(|n| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.create(draft(&format!("P{}", n), false)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(repo.list().await.unwrap().len(), 10);
    }
}
