//! Text generation gateway trait.
//!
//! Defines the single seam through which the application talks to a
//! language model.

use crate::error::Result;
use async_trait::async_trait;

/// An abstract gateway to a text-generation model.
///
/// Every model-derived string in the application (answers, classification
/// labels, skill level, generated questions) comes through this one method,
/// decoupling the services from the concrete HTTP client and keeping them
/// testable with scripted fakes.
///
/// # Implementation Notes
///
/// Implementations should return the model's text verbatim. Callers own
/// all post-processing (trimming, lower-casing, line splitting), so the
/// gateway must not normalize anything.
#[async_trait]
pub trait TextGateway: Send + Sync {
    /// Generates text for a prompt.
    ///
    /// # Arguments
    ///
    /// * `prompt` - The full prompt to send, already assembled
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The model's raw text response
    /// - `Err(TutorError::Gateway { .. })`: The call could not complete
    ///   (network, auth, quota). Callers degrade to an empty string plus a
    ///   user-visible notice; nothing retries automatically.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
