//! Course catalog loading.
//!
//! The catalog maps course display names to the document files behind
//! them. It is read from ~/.config/tutor/config.toml when that file
//! exists; otherwise a built-in catalog of the bundled NCERT chapters is
//! used, so a fresh install works without any configuration.

use crate::paths::TutorPaths;
use once_cell::sync::Lazy;
use std::path::Path;
use tutor_core::config::{CatalogConfig, CourseConfig};
use tutor_core::error::{Result, TutorError};

static BUILTIN_COURSES: Lazy<Vec<CourseConfig>> = Lazy::new(|| {
    [
        ("Current Electricity", "current-electricity-ncert.pdf"),
        ("Ray Optics", "ray-optics-ncert.pdf"),
        ("Solutions", "solutions-ncert.pdf"),
        ("Matrices and Determinants", "matrices-ncert.pdf"),
    ]
    .into_iter()
    .map(|(name, document)| CourseConfig {
        name: name.to_string(),
        document: document.to_string(),
    })
    .collect()
});

/// The set of courses a student can chat about.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseCatalog {
    courses: Vec<CourseConfig>,
}

impl CourseCatalog {
    /// Loads the catalog from the default config file, falling back to the
    /// built-in course list when no config file exists.
    ///
    /// # Returns
    ///
    /// - `Ok(CourseCatalog)`: Parsed catalog, or the built-in one
    /// - `Err(TutorError::Config)`: Config directory could not be resolved
    /// - `Err(TutorError::Serialization)`: The file exists but is not valid TOML
    pub fn load() -> Result<Self> {
        let path = TutorPaths::config_file().map_err(|e| TutorError::config(e.to_string()))?;
        if path.exists() {
            Self::from_file(&path)
        } else {
            Ok(Self::builtin())
        }
    }

    /// Loads the catalog from a specific TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CatalogConfig = toml::from_str(&content)?;
        Ok(Self {
            courses: config.courses,
        })
    }

    /// Returns the built-in catalog of bundled NCERT chapters.
    pub fn builtin() -> Self {
        Self {
            courses: BUILTIN_COURSES.clone(),
        }
    }

    /// All configured courses, in catalog order.
    pub fn courses(&self) -> &[CourseConfig] {
        &self.courses
    }

    /// Returns the document identifier for a course display name.
    pub fn document_for(&self, name: &str) -> Option<&str> {
        self.courses
            .iter()
            .find(|course| course.name == name)
            .map(|course| course.document.as_str())
    }

    /// Number of configured courses.
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// True when no courses are configured.
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_catalog_has_bundled_courses() {
        let catalog = CourseCatalog::builtin();

        assert_eq!(catalog.len(), 4);
        assert_eq!(
            catalog.document_for("Current Electricity"),
            Some("current-electricity-ncert.pdf")
        );
        assert_eq!(
            catalog.document_for("Matrices and Determinants"),
            Some("matrices-ncert.pdf")
        );
    }

    #[test]
    fn test_document_for_unknown_course() {
        let catalog = CourseCatalog::builtin();

        assert_eq!(catalog.document_for("Thermodynamics"), None);
    }

    #[test]
    fn test_from_file_parses_course_entries() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let content = r#"
            [[course]]
            name = "Linear Algebra"
            document = "linear-algebra.pdf"

            [[course]]
            name = "Statistics"
            document = "statistics.txt"
        "#;
        fs::write(&path, content).unwrap();

        let catalog = CourseCatalog::from_file(&path).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.document_for("Linear Algebra"), Some("linear-algebra.pdf"));
        assert_eq!(catalog.document_for("Statistics"), Some("statistics.txt"));
    }

    #[test]
    fn test_from_file_without_courses_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "").unwrap();

        let catalog = CourseCatalog::from_file(&path).unwrap();

        assert!(catalog.is_empty());
    }

    #[test]
    fn test_from_file_rejects_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[[course]\nname = ").unwrap();

        let result = CourseCatalog::from_file(&path);

        assert!(matches!(
            result,
            Err(TutorError::Serialization { .. })
        ));
    }
}
