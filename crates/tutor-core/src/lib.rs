pub mod config;
pub mod document;
pub mod error;
pub mod frequency;
pub mod gateway;
pub mod interaction;
pub mod repository;
pub mod session;

// Re-export common error type
pub use error::{Result, TutorError};
