pub mod catalog;
pub mod paths;
pub mod pdf_document_store;
pub mod storage;
pub mod supabase_interaction_repository;

pub use crate::catalog::CourseCatalog;
pub use crate::pdf_document_store::PdfDocumentStore;
pub use crate::supabase_interaction_repository::SupabaseInteractionRepository;
