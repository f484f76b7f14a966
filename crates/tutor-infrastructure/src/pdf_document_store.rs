//! Course document extraction backed by files on disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tutor_core::document::DocumentStore;
use tutor_core::error::{Result, TutorError};

/// Document store that reads course files from a root directory.
///
/// `.pdf` files are run through text extraction; anything else is read as
/// plain UTF-8 text. Extracted text is cached per identifier for the
/// lifetime of the store, so a document is extracted once per process and
/// every later lookup returns byte-identical text.
pub struct PdfDocumentStore {
    root: PathBuf,
    cache: Mutex<HashMap<String, String>>,
}

impl PdfDocumentStore {
    /// Creates a store resolving relative identifiers against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn resolve(&self, document_id: &str) -> PathBuf {
        let path = Path::new(document_id);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl DocumentStore for PdfDocumentStore {
    fn text(&self, document_id: &str) -> Result<String> {
        {
            let cache = self
                .cache
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(text) = cache.get(document_id) {
                return Ok(text.clone());
            }
        }

        let path = self.resolve(document_id);
        if !path.exists() {
            return Err(TutorError::not_found("document", document_id));
        }

        tracing::debug!("Extracting course document: {:?}", path);
        let text = extract_text(document_id, &path)?;

        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.insert(document_id.to_string(), text.clone());
        Ok(text)
    }
}

fn extract_text(document_id: &str, path: &Path) -> Result<String> {
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        pdf_extract::extract_text(path)
            .map_err(|e| TutorError::document_read(document_id, e.to_string()))
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| TutorError::document_read(document_id, e.to_string()))
    }
}
