//! Question answering over course documents.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tutor_core::gateway::TextGateway;
use tutor_interaction::prompts;

/// The outcome of one answer attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    /// The model's answer, empty when the gateway call failed
    pub text: String,
    /// User-visible notice when the gateway call failed
    pub warning: Option<String>,
}

/// Answers questions against the full text of the selected course document.
///
/// Successful answers are memoized by the exact (question, document text)
/// pair for the lifetime of the service. The key is deliberately not
/// normalized: any whitespace or casing difference is a different question
/// and goes back to the model. Failed calls are not memoized, so asking the
/// same question again retries instead of replaying the failure.
pub struct AnswerService {
    /// Gateway every answer prompt is sent through
    gateway: Arc<dyn TextGateway>,
    /// Memoized answers keyed by (question, document text)
    cache: RwLock<HashMap<(String, String), String>>,
}

impl AnswerService {
    /// Creates a service with an empty answer cache.
    pub fn new(gateway: Arc<dyn TextGateway>) -> Self {
        Self {
            gateway,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Produces an answer for `question` against `document_text`.
    ///
    /// Never returns an error: a failed gateway call degrades to an empty
    /// answer plus a warning for the caller to display.
    pub async fn answer(&self, question: &str, document_text: &str) -> AnswerOutcome {
        let key = (question.to_string(), document_text.to_string());

        if let Some(cached) = self.cache.read().await.get(&key) {
            tracing::debug!("Answer served from cache for question '{}'", question);
            return AnswerOutcome {
                text: cached.clone(),
                warning: None,
            };
        }

        let prompt = prompts::answer_prompt(question, document_text);
        match self.gateway.generate(&prompt).await {
            Ok(text) => {
                let mut cache = self.cache.write().await;
                cache.insert(key, text.clone());
                AnswerOutcome {
                    text,
                    warning: None,
                }
            }
            Err(err) => {
                tracing::warn!("Answer generation failed: {}", err);
                AnswerOutcome {
                    text: String::new(),
                    warning: Some(format!("Error interacting with the model: {err}")),
                }
            }
        }
    }
}
