//! Question labeling (type and topic).

use std::sync::Arc;
use tutor_core::gateway::TextGateway;
use tutor_interaction::prompts;

/// The outcome of one labeling attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelOutcome {
    /// The normalized label, empty when the gateway call failed
    pub label: String,
    /// User-visible notice when the gateway call failed
    pub warning: Option<String>,
}

/// Labels a question's type and topic through the gateway.
///
/// The model's output is accepted as-is apart from normalization: the type
/// label is trimmed and lower-cased, the topic is only trimmed. Neither is
/// validated against a closed set, so an off-script model response simply
/// becomes a new label and flows through aggregation like any other.
pub struct ClassifierService {
    gateway: Arc<dyn TextGateway>,
}

impl ClassifierService {
    pub fn new(gateway: Arc<dyn TextGateway>) -> Self {
        Self { gateway }
    }

    /// Labels the question as fact, reasoning, memory, or whatever else the
    /// model decides to answer with.
    pub async fn question_type(&self, question: &str) -> LabelOutcome {
        match self
            .gateway
            .generate(&prompts::question_type_prompt(question))
            .await
        {
            Ok(text) => LabelOutcome {
                label: text.trim().to_lowercase(),
                warning: None,
            },
            Err(err) => {
                tracing::warn!("Question type classification failed: {}", err);
                LabelOutcome {
                    label: String::new(),
                    warning: Some(format!("Error interacting with the model: {err}")),
                }
            }
        }
    }

    /// Labels the question's topic in a few words.
    pub async fn topic(&self, question: &str) -> LabelOutcome {
        match self.gateway.generate(&prompts::topic_prompt(question)).await {
            Ok(text) => LabelOutcome {
                label: text.trim().to_string(),
                warning: None,
            },
            Err(err) => {
                tracing::warn!("Topic extraction failed: {}", err);
                LabelOutcome {
                    label: String::new(),
                    warning: Some(format!("Error interacting with the model: {err}")),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::Mutex;
    use tutor_core::error::{Result, TutorError};

    struct FixedGateway {
        calls: Mutex<Vec<String>>,
        response: std::result::Result<String, String>,
    }

    impl FixedGateway {
        fn ok(response: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                response: Ok(response.to_string()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                response: Err(message.to_string()),
            }
        }
    }

    #[async_trait]
    impl TextGateway for FixedGateway {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.calls.lock().await.push(prompt.to_string());
            self.response.clone().map_err(TutorError::gateway)
        }
    }

    #[tokio::test]
    async fn test_question_type_is_trimmed_and_lowercased() {
        let gateway = Arc::new(FixedGateway::ok("  Reasoning\n"));
        let service = ClassifierService::new(gateway.clone());

        let outcome = service.question_type("Why does current flow?").await;

        assert_eq!(outcome.label, "reasoning");
        assert!(outcome.warning.is_none());

        let calls = gateway.calls.lock().await;
        assert!(calls[0].contains("Classify the question"));
    }

    #[tokio::test]
    async fn test_topic_is_trimmed_but_keeps_case() {
        let gateway = Arc::new(FixedGateway::ok(" Ohm's Law \n"));
        let service = ClassifierService::new(gateway);

        let outcome = service.topic("What is Ohm's law?").await;

        assert_eq!(outcome.label, "Ohm's Law");
    }

    #[tokio::test]
    async fn test_off_script_label_is_kept_verbatim() {
        let gateway = Arc::new(FixedGateway::ok("Conceptual"));
        let service = ClassifierService::new(gateway);

        let outcome = service.question_type("Define resistance.").await;

        // No closed set: unexpected labels survive normalization.
        assert_eq!(outcome.label, "conceptual");
    }

    #[tokio::test]
    async fn test_failure_degrades_to_empty_label() {
        let gateway = Arc::new(FixedGateway::failing("connection reset"));
        let service = ClassifierService::new(gateway);

        let outcome = service.question_type("Define resistance.").await;

        assert_eq!(outcome.label, "");
        assert!(outcome.warning.expect("warning").contains("connection reset"));
    }
}
