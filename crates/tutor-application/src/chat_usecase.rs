//! Chat session orchestration.
//!
//! This module wires the answer, classification, and analysis services into
//! the flow a terminal session drives: open a course, answer questions,
//! analyze the accumulated history on demand.

use crate::analysis_service::{AnalysisOutcome, AnalysisService};
use crate::answer_service::AnswerService;
use crate::classifier_service::ClassifierService;
use std::sync::Arc;
use tutor_core::document::DocumentStore;
use tutor_core::error::Result;
use tutor_core::gateway::TextGateway;
use tutor_core::interaction::Interaction;
use tutor_core::repository::InteractionRepository;
use tutor_core::session::ChatSession;

/// A freshly opened session, plus a notice when the persisted history
/// could not be loaded.
#[derive(Debug, Clone)]
pub struct SessionStart {
    pub session: ChatSession,
    pub warning: Option<String>,
}

/// The outcome of submitting one question.
#[derive(Debug, Clone, PartialEq)]
pub enum AskOutcome {
    /// The question was blank after trimming; nothing was sent or recorded.
    Blank,
    /// The question ran through the answer/classify/persist flow.
    Answered {
        interaction: Interaction,
        /// User-visible degradation notices collected along the way
        warnings: Vec<String>,
    },
}

/// Coordinates one student's chat over a course.
///
/// The usecase itself is stateless between calls; everything a session
/// accumulates lives in the [`ChatSession`] the caller holds. Questions
/// run strictly sequentially through answer, type, topic, and persistence,
/// and every failure along the way degrades to a warning rather than
/// aborting the turn.
pub struct ChatUseCase {
    /// Source of extracted course text
    documents: Arc<dyn DocumentStore>,
    /// Store for answered questions
    repository: Arc<dyn InteractionRepository>,
    /// Answering with per-(question, document) memoization
    answers: AnswerService,
    /// Question type and topic labeling
    classifier: ClassifierService,
    /// History analysis and follow-up question generation
    analysis: AnalysisService,
}

impl ChatUseCase {
    pub fn new(
        gateway: Arc<dyn TextGateway>,
        repository: Arc<dyn InteractionRepository>,
        documents: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            documents,
            repository: repository.clone(),
            answers: AnswerService::new(gateway.clone()),
            classifier: ClassifierService::new(gateway.clone()),
            analysis: AnalysisService::new(gateway, repository),
        }
    }

    /// Opens a session for `course`, extracting its document text and
    /// loading the persisted history (newest first).
    ///
    /// # Returns
    ///
    /// - `Ok(SessionStart)`: Session ready; `warning` is set when the
    ///   history could not be loaded (the chat starts empty instead)
    /// - `Err(_)`: The course document could not be read; without its text
    ///   there is nothing to chat about
    pub async fn open_session(
        &self,
        session_id: &str,
        course: &str,
        document_id: &str,
    ) -> Result<SessionStart> {
        let course_content = self.documents.text(document_id)?;

        let (history, warning) = match self.repository.history(session_id, course).await {
            Ok(history) => (history, None),
            Err(err) => {
                tracing::warn!("History load failed: {}", err);
                (
                    Vec::new(),
                    Some(format!("Could not load chat history: {err}")),
                )
            }
        };

        tracing::info!(
            "Opened session '{}' for course '{}' with {} past interactions",
            session_id,
            course,
            history.len()
        );
        Ok(SessionStart {
            session: ChatSession::new(session_id, course, course_content, history),
            warning,
        })
    }

    /// Runs the submit-question flow against the session's course text.
    ///
    /// The question is kept exactly as submitted (surrounding whitespace
    /// included) for prompting, memoization, and storage; only the blank
    /// check trims. A failed answer still yields an interaction with an
    /// empty response, which is persisted and appended like any other.
    pub async fn ask(&self, session: &mut ChatSession, question: &str) -> AskOutcome {
        if question.trim().is_empty() {
            return AskOutcome::Blank;
        }

        let mut warnings = Vec::new();

        let answer = self.answers.answer(question, &session.course_content).await;
        if let Some(warning) = answer.warning {
            warnings.push(warning);
        }

        let question_type = self.classifier.question_type(question).await;
        if let Some(warning) = question_type.warning {
            warnings.push(warning);
        }

        let topic = self.classifier.topic(question).await;
        if let Some(warning) = topic.warning {
            warnings.push(warning);
        }

        let interaction = Interaction {
            session_id: session.session_id.clone(),
            course: session.course.clone(),
            question: question.to_string(),
            response: answer.text,
            question_type: question_type.label,
            topic: topic.label,
        };

        if let Err(err) = self.repository.insert_interaction(&interaction).await {
            tracing::warn!("Interaction write failed: {}", err);
            warnings.push(format!("Could not save this interaction: {err}"));
        }

        session.history.push(interaction.clone());
        AskOutcome::Answered {
            interaction,
            warnings,
        }
    }

    /// Runs the analysis pipeline over the session's in-memory history.
    pub async fn analyze(&self, session: &ChatSession) -> AnalysisOutcome {
        self.analysis.analyze(&session.history).await
    }
}
