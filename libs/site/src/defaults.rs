//! Demo content shown when neither the API nor the cache has any projects

use chrono::{DateTime, TimeZone, Utc};
use common::models::{Category, Project, ProjectDetails};

const MIXKIT_PREVIEW: &str = "https://assets.mixkit.co/videos/preview";

struct Demo {
    title: &'static str,
    category: Category,
    description: &'static str,
    resolution: &'static str,
    fps: &'static str,
    video: &'static str,
}

const DEMOS: [Demo; 8] = [
    Demo {
        title: "Behind the Lens",
        category: Category::Documentary,
        description: "Award-winning short documentary",
        resolution: "4K",
        fps: "24fps",
        video: "mixkit-tree-with-yellow-flowers-1173-large.mp4",
    },
    Demo {
        title: "Product Launch",
        category: Category::Reels,
        description: "Social media campaign reel",
        resolution: "1080p",
        fps: "30fps",
        video: "mixkit-ink-swirling-in-water-134-large.mp4",
    },
    Demo {
        title: "Brand Identity",
        category: Category::Graphics,
        description: "Complete visual identity package",
        resolution: "4K",
        fps: "60fps",
        video: "mixkit-purple-and-golden-lights-1234-large.mp4",
    },
    Demo {
        title: "Event Highlights",
        category: Category::Reels,
        description: "Corporate event coverage",
        resolution: "4K",
        fps: "60fps",
        video: "mixkit-going-down-a-curved-highway-down-702-large.mp4",
    },
    Demo {
        title: "Nature Series",
        category: Category::Documentary,
        description: "Wildlife exploration episode",
        resolution: "4K",
        fps: "24fps",
        video: "mixkit-night-sky-with-stars-at-a-calm-lake-21464-large.mp4",
    },
    Demo {
        title: "Album Art",
        category: Category::Posters,
        description: "Music album cover design",
        resolution: "4K",
        fps: "60fps",
        video: "mixkit-waves-in-the-water-1164-large.mp4",
    },
    Demo {
        title: "Logo Animation",
        category: Category::Graphics,
        description: "Animated brand reveal",
        resolution: "4K",
        fps: "60fps",
        video: "mixkit-abstract-flowing-colorful-fluid-4007-large.mp4",
    },
    Demo {
        title: "Movie Poster",
        category: Category::Posters,
        description: "Film promotional artwork",
        resolution: "4K",
        fps: "60fps",
        video: "mixkit-aerial-view-of-city-traffic-at-night-11-large.mp4",
    },
];

/// The eight bundled demo projects, ids `default-1` to `default-8`
pub fn default_projects() -> Vec<Project> {
    let published: DateTime<Utc> = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default();

    DEMOS
        .iter()
        .enumerate()
        .map(|(index, demo)| Project {
            id: format!("default-{}", index + 1),
            title: demo.title.to_string(),
            category: demo.category,
            details: ProjectDetails {
                description: Some(demo.description.to_string()),
                resolution: Some(demo.resolution.to_string()),
                fps: Some(demo.fps.to_string()),
                year: Some(2024),
                video_url: Some(format!("{}/{}", MIXKIT_PREVIEW, demo.video)),
                thumbnail: None,
            },
            hidden: false,
            created_at: published,
            updated_at: published,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_projects() {
        let projects = default_projects();
        assert_eq!(projects.len(), 8);
        assert_eq!(projects[0].id, "default-1");
        assert_eq!(projects[0].title, "Behind the Lens");
        assert_eq!(projects[0].category, Category::Documentary);
        assert_eq!(
            projects[0].details.video_url.as_deref(),
            Some("https://assets.mixkit.co/videos/preview/mixkit-tree-with-yellow-flowers-1173-large.mp4")
        );

        // Two demos per gallery
        for category in Category::ALL {
            assert_eq!(projects.iter().filter(|p| p.category == category).count(), 2);
        }
    }
}
