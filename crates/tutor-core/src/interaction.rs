//! Interaction domain models.
//!
//! This module contains the records the application accumulates while a
//! student chats about a course: answered questions and the follow-up
//! questions generated for them.

use serde::{Deserialize, Serialize};

/// One answered question within a session, together with the labels the
/// model assigned to it.
///
/// This is the unit the analysis pipeline aggregates over. The label fields
/// are free text straight from the model (normalized by the classifier, but
/// never validated against a closed set), so consumers must treat them as
/// opaque strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Session identifier the question was asked in (UUID format)
    pub session_id: String,
    /// Display name of the course the question was asked about
    pub course: String,
    /// The student's question, exactly as submitted
    pub question: String,
    /// The model's answer; empty when answer generation failed
    pub response: String,
    /// Lower-cased question type label ("fact", "reasoning", "memory", ...)
    pub question_type: String,
    /// Short topic label for the question
    pub topic: String,
}

/// A generated question a student might ask next, derived from their
/// interaction history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureQuestion {
    /// Session the generating analysis ran over (UUID format)
    pub session_id: String,
    /// Course the generating analysis ran over
    pub course: String,
    /// The generated question text
    pub question: String,
    /// Dominant topic the question was generated from
    pub topic: String,
    /// Dominant question type the question was generated from
    pub question_type: String,
}
