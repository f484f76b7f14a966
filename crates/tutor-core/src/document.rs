//! Course document store trait.

use crate::error::Result;

/// Supplies the extracted text of course documents.
///
/// A document identifier comes from the course catalog and is opaque to
/// callers; how the text is produced (PDF extraction, plain files) is an
/// implementation detail. Implementations must be deterministic: the same
/// identifier yields byte-identical text for the lifetime of the store, so
/// answer memoization keyed on the text stays valid.
pub trait DocumentStore: Send + Sync {
    /// Returns the full text behind `document_id`.
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The extracted document text
    /// - `Err(TutorError::NotFound { .. })`: No such document
    /// - `Err(TutorError::DocumentRead { .. })`: The document exists but
    ///   its text could not be extracted
    fn text(&self, document_id: &str) -> Result<String>;
}
