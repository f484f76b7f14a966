//! Application services for the tutor chatbot.
//!
//! This crate composes the domain traits from `tutor-core` into the flows
//! the CLI drives: answering questions over a course document, labeling
//! them, and analyzing a session's history for frequent topics, question
//! types, skill level, and likely follow-up questions.

pub mod analysis_service;
pub mod answer_service;
pub mod chat_usecase;
pub mod classifier_service;

pub use analysis_service::{AnalysisOutcome, AnalysisReport, AnalysisService, MIN_INTERACTIONS};
pub use answer_service::{AnswerOutcome, AnswerService};
pub use chat_usecase::{AskOutcome, ChatUseCase, SessionStart};
pub use classifier_service::{ClassifierService, LabelOutcome};
