pub mod gemini_client;
pub mod prompts;

pub use gemini_client::{DEFAULT_GEMINI_MODEL, GeminiClient};
