//! Project records shown in the portfolio galleries

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Gallery a project belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Reels,
    Documentary,
    Graphics,
    Posters,
}

impl Category {
    /// Every category, in the order the site renders them
    pub const ALL: [Category; 4] = [
        Category::Reels,
        Category::Documentary,
        Category::Graphics,
        Category::Posters,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Reels => "REELS",
            Category::Documentary => "DOCUMENTARY",
            Category::Graphics => "GRAPHICS",
            Category::Posters => "POSTERS",
        }
    }

    /// Human-readable section title
    pub fn label(self) -> &'static str {
        match self {
            Category::Reels => "Reels",
            Category::Documentary => "Documentary",
            Category::Graphics => "Graphics Design",
            Category::Posters => "Posters",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == wanted)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// Optional descriptive fields of a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl ProjectDetails {
    /// Overwrite every field that is present in `other`
    pub fn merge(&mut self, other: ProjectDetails) {
        fn take<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut self.description, other.description);
        take(&mut self.resolution, other.resolution);
        take(&mut self.fps, other.fps);
        take(&mut self.year, other.year);
        take(&mut self.video_url, other.video_url);
        take(&mut self.thumbnail, other.thumbnail);
    }
}

/// A stored project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub category: Category,
    #[serde(flatten)]
    pub details: ProjectDetails,
    #[serde(default)]
    pub hidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new project
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDraft {
    pub title: String,
    pub category: Category,
    pub details: ProjectDetails,
    pub hidden: bool,
}

/// Validated partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub details: ProjectDetails,
    pub hidden: Option<bool>,
}

impl Project {
    /// Build a stored record from a draft
    pub fn from_draft(id: String, draft: ProjectDraft, now: DateTime<Utc>) -> Self {
        Project {
            id,
            title: draft.title,
            category: draft.category,
            details: draft.details,
            hidden: draft.hidden,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a patch into this record and bump `updated_at`
    pub fn apply(&mut self, patch: ProjectPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(hidden) = patch.hidden {
            self.hidden = hidden;
        }
        self.details.merge(patch.details);
        self.updated_at = now;
    }
}
