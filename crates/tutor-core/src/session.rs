//! Chat session state.

use crate::interaction::Interaction;

/// In-memory state for one chat over one course.
///
/// Holds everything the chat and analysis flows need between turns: the
/// extracted course text (so the document is read once per session) and the
/// interaction history. The history starts as whatever the repository
/// returned for the session (newest first) and each answered question is
/// appended after it; analysis consumes the list in exactly this order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSession {
    /// Session identifier (UUID format); reused across runs to resume
    pub session_id: String,
    /// Display name of the selected course
    pub course: String,
    /// Full extracted text of the course document
    pub course_content: String,
    /// Interactions known to this session, persisted and in-memory alike
    pub history: Vec<Interaction>,
}

impl ChatSession {
    /// Creates a session over already-extracted course content.
    pub fn new(
        session_id: impl Into<String>,
        course: impl Into<String>,
        course_content: impl Into<String>,
        history: Vec<Interaction>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            course: course.into(),
            course_content: course_content.into(),
            history,
        }
    }
}
