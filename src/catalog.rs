//! Lesson catalog - immutable lesson/category/badge mapping
//!
//! The catalog is loaded once at process start and injected into the
//! unlock evaluator. It is the single source of truth for which lessons
//! belong to which category and which badge a category awards.
//!
//! Catalogs are authored as category-grouped TOML:
//!
//! ```toml
//! [[categories]]
//! id = "ocean-literacy"
//! badge_name = "Ocean Scholar"
//! badge_icon = "🌊"
//! lessons = ["ocean-literacy-principle-1", "ocean-literacy-principle-2"]
//! ```
//!
//! Because badge metadata lives on the category, every lesson in a
//! category awards the same badge by construction. A lesson id may
//! appear in exactly one category; duplicates are rejected at load time.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ProgressError;

/// Bundled Pelagia catalog, compiled into the binary
const BUILTIN_CATALOG: &str = include_str!("../data/catalog.toml");

/// Flattened per-lesson view of a catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonRecord {
    pub lesson_id: String,
    pub category: String,
    pub badge_name: String,
    pub badge_icon: String,
}

/// Badge metadata for a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBadge {
    pub name: String,
    pub icon: String,
}

/// One category as stored in the catalog (authoring order preserved)
#[derive(Debug, Clone)]
struct CategoryEntry {
    id: String,
    badge: CategoryBadge,
    lessons: Vec<String>,
}

// ============================================================================
// TOML file format
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    categories: Vec<CategoryFile>,
}

#[derive(Debug, Clone, Deserialize)]
struct CategoryFile {
    id: String,
    badge_name: String,
    badge_icon: String,
    #[serde(default)]
    lessons: Vec<String>,
}

// ============================================================================
// Catalog
// ============================================================================

/// Immutable lesson/category/badge mapping
pub struct LessonCatalog {
    /// lesson id -> flattened record, for evaluator lookups
    lessons: HashMap<String, LessonRecord>,
    /// categories in authoring order
    categories: Vec<CategoryEntry>,
}

impl LessonCatalog {
    /// Parse and validate a category-grouped TOML catalog
    pub fn from_toml_str(input: &str) -> Result<Self, ProgressError> {
        let file: CatalogFile = toml::from_str(input)
            .map_err(|e| ProgressError::Catalog(format!("Parse failed: {}", e)))?;

        let mut lessons: HashMap<String, LessonRecord> = HashMap::new();
        let mut categories: Vec<CategoryEntry> = Vec::with_capacity(file.categories.len());

        for cat in file.categories {
            if cat.id.trim().is_empty() {
                return Err(ProgressError::Catalog("Category id must not be blank".into()));
            }
            if categories.iter().any(|c| c.id == cat.id) {
                return Err(ProgressError::Catalog(format!(
                    "Duplicate category id: {}",
                    cat.id
                )));
            }

            for lesson_id in &cat.lessons {
                if lesson_id.trim().is_empty() {
                    return Err(ProgressError::Catalog(format!(
                        "Blank lesson id in category {}",
                        cat.id
                    )));
                }
                if let Some(existing) = lessons.get(lesson_id) {
                    // One category per lesson. The upstream data set had a
                    // lesson id claimed by two categories; reject instead of
                    // guessing which one wins.
                    return Err(ProgressError::Catalog(format!(
                        "Lesson {} appears in both {} and {}",
                        lesson_id, existing.category, cat.id
                    )));
                }
                lessons.insert(
                    lesson_id.clone(),
                    LessonRecord {
                        lesson_id: lesson_id.clone(),
                        category: cat.id.clone(),
                        badge_name: cat.badge_name.clone(),
                        badge_icon: cat.badge_icon.clone(),
                    },
                );
            }

            categories.push(CategoryEntry {
                id: cat.id,
                badge: CategoryBadge {
                    name: cat.badge_name,
                    icon: cat.badge_icon,
                },
                lessons: cat.lessons,
            });
        }

        Ok(Self { lessons, categories })
    }

    /// Load a catalog from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ProgressError> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// The bundled Pelagia catalog
    pub fn builtin() -> Result<Self, ProgressError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Look up the catalog entry for a lesson
    pub fn get(&self, lesson_id: &str) -> Option<&LessonRecord> {
        self.lessons.get(lesson_id)
    }

    /// Whether a lesson exists in the catalog
    pub fn contains_lesson(&self, lesson_id: &str) -> bool {
        self.lessons.contains_key(lesson_id)
    }

    /// Lesson ids of a category, in authoring order.
    ///
    /// Returns an empty slice for an unknown category.
    pub fn category_lessons(&self, category: &str) -> &[String] {
        self.categories
            .iter()
            .find(|c| c.id == category)
            .map(|c| c.lessons.as_slice())
            .unwrap_or(&[])
    }

    /// Badge metadata for a category
    pub fn badge_for(&self, category: &str) -> Option<&CategoryBadge> {
        self.categories
            .iter()
            .find(|c| c.id == category)
            .map(|c| &c.badge)
    }

    /// Category ids in authoring order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.id.as_str())
    }

    /// Total number of lessons across all categories
    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }

    /// Number of categories
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }
}

impl std::fmt::Debug for LessonCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LessonCatalog")
            .field("categories", &self.category_count())
            .field("lessons", &self.lesson_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_category_toml() -> &'static str {
        r#"
        [[categories]]
        id = "ocean-literacy"
        badge_name = "Ocean Scholar"
        badge_icon = "🌊"
        lessons = ["ocean-literacy-principle-1", "ocean-literacy-principle-2"]

        [[categories]]
        id = "dive-safety"
        badge_name = "Safety Diver"
        badge_icon = "🤿"
        lessons = ["dive-safety-buddy-system"]
        "#
    }

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = LessonCatalog::builtin().expect("builtin catalog must parse");
        assert!(catalog.category_count() >= 4);
        assert!(catalog.contains_lesson("ocean-literacy-principle-7"));

        let record = catalog.get("ocean-literacy-principle-1").unwrap();
        assert_eq!(record.category, "ocean-literacy");
        assert_eq!(record.badge_name, "Ocean Scholar");
        assert_eq!(record.badge_icon, "🌊");
    }

    #[test]
    fn test_flattened_lesson_view() {
        let catalog = LessonCatalog::from_toml_str(two_category_toml()).unwrap();

        let record = catalog.get("dive-safety-buddy-system").unwrap();
        assert_eq!(record.lesson_id, "dive-safety-buddy-system");
        assert_eq!(record.category, "dive-safety");
        assert_eq!(record.badge_name, "Safety Diver");

        assert!(catalog.get("nonexistent-lesson").is_none());
    }

    #[test]
    fn test_category_lessons_preserve_order() {
        let catalog = LessonCatalog::from_toml_str(two_category_toml()).unwrap();
        assert_eq!(
            catalog.category_lessons("ocean-literacy"),
            &[
                "ocean-literacy-principle-1".to_string(),
                "ocean-literacy-principle-2".to_string(),
            ]
        );
        assert!(catalog.category_lessons("unknown-category").is_empty());
    }

    #[test]
    fn test_badge_for_category() {
        let catalog = LessonCatalog::from_toml_str(two_category_toml()).unwrap();
        let badge = catalog.badge_for("ocean-literacy").unwrap();
        assert_eq!(badge.name, "Ocean Scholar");
        assert_eq!(badge.icon, "🌊");
        assert!(catalog.badge_for("unknown-category").is_none());
    }

    #[test]
    fn test_categories_in_authoring_order() {
        let catalog = LessonCatalog::from_toml_str(two_category_toml()).unwrap();
        let ids: Vec<&str> = catalog.categories().collect();
        assert_eq!(ids, vec!["ocean-literacy", "dive-safety"]);
    }

    #[test]
    fn test_rejects_lesson_in_two_categories() {
        let toml = r#"
        [[categories]]
        id = "ocean-literacy"
        badge_name = "Ocean Scholar"
        badge_icon = "🌊"
        lessons = ["shared-lesson"]

        [[categories]]
        id = "human-ocean-interaction"
        badge_name = "Ocean Steward"
        badge_icon = "🌏"
        lessons = ["shared-lesson"]
        "#;
        let err = LessonCatalog::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ProgressError::Catalog(_)), "got {:?}", err);
        assert!(err.to_string().contains("shared-lesson"));
    }

    #[test]
    fn test_rejects_duplicate_category_id() {
        let toml = r#"
        [[categories]]
        id = "ocean-literacy"
        badge_name = "Ocean Scholar"
        badge_icon = "🌊"
        lessons = ["a"]

        [[categories]]
        id = "ocean-literacy"
        badge_name = "Ocean Scholar"
        badge_icon = "🌊"
        lessons = ["b"]
        "#;
        assert!(LessonCatalog::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_rejects_blank_ids() {
        let blank_category = r#"
        [[categories]]
        id = "  "
        badge_name = "Badge"
        badge_icon = "x"
        lessons = ["a"]
        "#;
        assert!(LessonCatalog::from_toml_str(blank_category).is_err());

        let blank_lesson = r#"
        [[categories]]
        id = "ocean-literacy"
        badge_name = "Badge"
        badge_icon = "x"
        lessons = [""]
        "#;
        assert!(LessonCatalog::from_toml_str(blank_lesson).is_err());
    }

    #[test]
    fn test_empty_category_allowed() {
        // Categories may be authored before their lessons exist; they simply
        // can never unlock until lessons are added.
        let toml = r#"
        [[categories]]
        id = "coming-soon"
        badge_name = "Pioneer"
        badge_icon = "🧭"
        lessons = []
        "#;
        let catalog = LessonCatalog::from_toml_str(toml).unwrap();
        assert_eq!(catalog.category_count(), 1);
        assert_eq!(catalog.lesson_count(), 0);
        assert!(catalog.category_lessons("coming-soon").is_empty());
    }
}
