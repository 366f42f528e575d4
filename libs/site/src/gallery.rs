//! Category galleries for the public page

use common::models::{Backgrounds, Category, Project};

/// Projects shown per category before "view more"
pub const ITEMS_PER_CATEGORY: usize = 3;

/// One category section of the page
#[derive(Debug, Clone, PartialEq)]
pub struct GallerySection<'a> {
    pub category: Category,
    pub label: &'static str,
    pub items: Vec<&'a Project>,
    pub total: usize,
    pub has_more: bool,
    pub background: Option<&'a str>,
}

/// Group projects into sections in fixed category order
///
/// Projects keep their stored order within a section. Hidden projects and
/// categories with nothing to show are left out.
pub fn gallery_sections<'a>(
    projects: &'a [Project],
    backgrounds: &'a Backgrounds,
) -> Vec<GallerySection<'a>> {
    Category::ALL
        .into_iter()
        .filter_map(|category| {
            let matching: Vec<&Project> = projects
                .iter()
                .filter(|project| project.category == category && !project.hidden)
                .collect();
            if matching.is_empty() {
                return None;
            }

            let total = matching.len();
            Some(GallerySection {
                category,
                label: category.label(),
                items: matching.into_iter().take(ITEMS_PER_CATEGORY).collect(),
                total,
                has_more: total > ITEMS_PER_CATEGORY,
                background: backgrounds
                    .get(&category)
                    .map(String::as_str)
                    .filter(|url| !url.trim().is_empty()),
            })
        })
        .collect()
}
