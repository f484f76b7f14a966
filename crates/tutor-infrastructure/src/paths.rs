//! Unified path management for tutor configuration files.
//!
//! All tutor configuration and secrets live in one per-user directory
//! resolved through the `dirs` crate, so every platform (Linux, macOS,
//! Windows) stores them in its conventional location.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for tutor.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/tutor/             # Config directory
/// ├── config.toml              # Course catalog
/// └── secret.json              # API keys and secrets
/// ```
pub struct TutorPaths;

impl TutorPaths {
    /// Returns the tutor configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/tutor/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("tutor"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the course catalog file.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config.toml
    /// - `Err(PathError)`: Could not determine path
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to secret.json
    /// - `Err(PathError)`: Could not determine path
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    /// Ensures the secret file exists, creating it with a template if it doesn't.
    ///
    /// The template carries empty placeholders for the Gemini and Supabase
    /// credentials using the SecretConfig type, so users can fill in the
    /// values without guessing the shape.
    ///
    /// # Security Note
    ///
    /// This function sets file permissions to 600 (user read/write only) on
    /// Unix systems.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to the secret file (existing or newly created)
    /// - `Err(std::io::Error)`: If file creation or permission setting fails
    pub fn ensure_secret_file() -> Result<PathBuf, std::io::Error> {
        let secret_path = Self::secret_file()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))?;

        // If file already exists, return the path
        if secret_path.exists() {
            return Ok(secret_path);
        }

        // Ensure parent directory exists
        if let Some(parent) = secret_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        use tutor_core::config::{GeminiSecret, SecretConfig, SupabaseSecret};

        let template_config = SecretConfig {
            gemini: Some(GeminiSecret {
                api_key: String::new(),
                model_name: Some("gemini-2.5-flash-preview-05-20".to_string()),
            }),
            supabase: Some(SupabaseSecret {
                url: String::new(),
                key: String::new(),
            }),
        };

        let template_json = serde_json::to_string_pretty(&template_config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

        std::fs::write(&secret_path, template_json)?;

        // Set file permissions to 600 (user read/write only) on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&secret_path, permissions)?;
        }

        Ok(secret_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir() {
        let config_dir = TutorPaths::config_dir().unwrap();
        assert!(config_dir.ends_with("tutor"));
    }

    #[test]
    fn test_config_file() {
        let config_file = TutorPaths::config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        // Verify it's under config_dir
        let config_dir = TutorPaths::config_dir().unwrap();
        assert!(config_file.starts_with(&config_dir));
    }

    #[test]
    fn test_secret_file() {
        let secret_file = TutorPaths::secret_file().unwrap();
        assert!(secret_file.ends_with("secret.json"));
        // Verify it's under config_dir
        let config_dir = TutorPaths::config_dir().unwrap();
        assert!(secret_file.starts_with(&config_dir));
    }
}
