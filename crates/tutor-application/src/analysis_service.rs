//! Interaction history analysis.
//!
//! This module derives insights from a session's accumulated interactions:
//! which topic and question type dominate, how skilled the student seems,
//! and which questions they are likely to ask next.

use std::sync::Arc;
use tutor_core::frequency::FrequencyTable;
use tutor_core::gateway::TextGateway;
use tutor_core::interaction::{FutureQuestion, Interaction};
use tutor_core::repository::InteractionRepository;
use tutor_interaction::prompts;

/// Minimum number of interactions before frequency statistics say anything.
pub const MIN_INTERACTIONS: usize = 4;

/// Derived insights over one session's interaction history.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// The topic with the highest count; first-seen wins ties
    pub most_frequent_topic: String,
    /// The question type with the highest count; first-seen wins ties
    pub most_frequent_type: String,
    /// The model's skill rating, trimmed but otherwise verbatim
    /// (typically of the form `Level: Intermediate`); empty when the
    /// gateway call failed
    pub skill_level: String,
    /// Generated candidate questions; empty when generation failed
    pub future_questions: Vec<String>,
}

/// The outcome of an analysis request.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// Not enough history for meaningful statistics. Nothing was sent to
    /// the gateway and nothing was written.
    InsufficientData { have: usize, need: usize },
    /// The pipeline ran to completion. `warnings` carries a notice for
    /// every degraded step (failed gateway call, failed row write).
    Completed {
        report: AnalysisReport,
        warnings: Vec<String>,
    },
}

/// Runs the analysis pipeline over a session's history.
///
/// Pipeline order matters and is observable through the gateway: the
/// skill-level call goes out first, against the questions in history order,
/// and only then are the frequency tables computed and the follow-up
/// questions generated. Generated questions are persisted one row at a
/// time with no rollback, so a failure part-way leaves earlier rows
/// committed.
pub struct AnalysisService {
    /// Gateway for the skill-level and question-generation calls
    gateway: Arc<dyn TextGateway>,
    /// Store the generated future questions are appended to
    repository: Arc<dyn InteractionRepository>,
}

impl AnalysisService {
    pub fn new(
        gateway: Arc<dyn TextGateway>,
        repository: Arc<dyn InteractionRepository>,
    ) -> Self {
        Self {
            gateway,
            repository,
        }
    }

    /// Analyzes `history` and persists the generated follow-up questions.
    ///
    /// Never returns an error: every fallible step degrades to an empty
    /// value plus a warning in the outcome.
    pub async fn analyze(&self, history: &[Interaction]) -> AnalysisOutcome {
        if history.len() < MIN_INTERACTIONS {
            return AnalysisOutcome::InsufficientData {
                have: history.len(),
                need: MIN_INTERACTIONS,
            };
        }

        let mut warnings = Vec::new();

        let questions: Vec<&str> = history
            .iter()
            .map(|interaction| interaction.question.as_str())
            .collect();
        let skill_level = match self
            .gateway
            .generate(&prompts::skill_level_prompt(&questions))
            .await
        {
            Ok(text) => text.trim().to_string(),
            Err(err) => {
                tracing::warn!("Skill level rating failed: {}", err);
                warnings.push(format!("Could not determine skill level: {err}"));
                String::new()
            }
        };

        let mut topics = FrequencyTable::new();
        let mut types = FrequencyTable::new();
        for interaction in history {
            topics.record(&interaction.topic);
            types.record(&interaction.question_type);
        }

        // Both tables hold at least MIN_INTERACTIONS records here.
        let most_frequent_topic = topics.most_frequent().unwrap_or_default().to_string();
        let most_frequent_type = types.most_frequent().unwrap_or_default().to_string();

        let future_questions = match self
            .gateway
            .generate(&prompts::future_questions_prompt(
                &most_frequent_topic,
                &most_frequent_type,
                &skill_level,
            ))
            .await
        {
            Ok(raw) => parse_question_lines(&raw),
            Err(err) => {
                tracing::warn!("Future question generation failed: {}", err);
                warnings.push(format!("Could not generate future questions: {err}"));
                Vec::new()
            }
        };

        for question in &future_questions {
            let row = FutureQuestion {
                session_id: history[0].session_id.clone(),
                course: history[0].course.clone(),
                question: question.clone(),
                topic: most_frequent_topic.clone(),
                question_type: most_frequent_type.clone(),
            };
            if let Err(err) = self.repository.insert_future_question(&row).await {
                tracing::warn!("Failed to save future question: {}", err);
                warnings.push(format!("Could not save a future question: {err}"));
            }
        }

        AnalysisOutcome::Completed {
            report: AnalysisReport {
                most_frequent_topic,
                most_frequent_type,
                skill_level,
                future_questions,
            },
            warnings,
        }
    }
}

/// Splits a raw model response into trimmed, non-empty question lines.
fn parse_question_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::Mutex;
    use tutor_core::error::{Result, TutorError};

    /// Gateway fake that answers by prompt content and records every call.
    struct RuleGateway {
        calls: Arc<Mutex<Vec<String>>>,
        rules: Vec<(&'static str, std::result::Result<&'static str, &'static str>)>,
    }

    impl RuleGateway {
        fn new(
            rules: Vec<(&'static str, std::result::Result<&'static str, &'static str>)>,
        ) -> Arc<Self> {
            Arc::new(Self {
                calls: Arc::new(Mutex::new(Vec::new())),
                rules,
            })
        }

        async fn calls(&self) -> Vec<String> {
            self.calls.lock().await.clone()
        }
    }

    #[async_trait]
    impl TextGateway for RuleGateway {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.calls.lock().await.push(prompt.to_string());
            for (pattern, result) in &self.rules {
                if prompt.contains(pattern) {
                    return result
                        .map(str::to_string)
                        .map_err(|message| TutorError::gateway(message.to_string()));
                }
            }
            Err(TutorError::internal(format!(
                "no rule matches prompt: {prompt}"
            )))
        }
    }

    /// Repository fake that records rows and can fail after N inserts.
    struct RecordingRepository {
        future_questions: Mutex<Vec<FutureQuestion>>,
        fail_future_inserts_after: Option<usize>,
    }

    impl RecordingRepository {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                future_questions: Mutex::new(Vec::new()),
                fail_future_inserts_after: None,
            })
        }

        fn failing_after(successes: usize) -> Arc<Self> {
            Arc::new(Self {
                future_questions: Mutex::new(Vec::new()),
                fail_future_inserts_after: Some(successes),
            })
        }

        async fn stored(&self) -> Vec<FutureQuestion> {
            self.future_questions.lock().await.clone()
        }
    }

    #[async_trait]
    impl InteractionRepository for RecordingRepository {
        async fn history(&self, _session_id: &str, _course: &str) -> Result<Vec<Interaction>> {
            Ok(Vec::new())
        }

        async fn insert_interaction(&self, _interaction: &Interaction) -> Result<()> {
            Ok(())
        }

        async fn insert_future_question(&self, question: &FutureQuestion) -> Result<()> {
            let mut stored = self.future_questions.lock().await;
            if let Some(limit) = self.fail_future_inserts_after {
                if stored.len() >= limit {
                    return Err(TutorError::data_access("insert rejected"));
                }
            }
            stored.push(question.clone());
            Ok(())
        }
    }

    fn interaction(question: &str, question_type: &str, topic: &str) -> Interaction {
        Interaction {
            session_id: "session-1".to_string(),
            course: "Current Electricity".to_string(),
            question: question.to_string(),
            response: "an answer".to_string(),
            question_type: question_type.to_string(),
            topic: topic.to_string(),
        }
    }

    fn sample_history() -> Vec<Interaction> {
        vec![
            interaction("What is Ohm's law?", "fact", "Ohm's Law"),
            interaction("Why does resistance rise?", "reasoning", "Ohm's Law"),
            interaction("State Kirchhoff's first rule.", "fact", "Kirchhoff's Rules"),
            interaction("What did we say about V?", "memory", "Ohm's Law"),
        ]
    }

    #[tokio::test]
    async fn test_fewer_than_four_interactions_refuses_analysis() {
        let gateway = RuleGateway::new(vec![]);
        let repository = RecordingRepository::new();
        let service = AnalysisService::new(gateway.clone(), repository.clone());

        let history = sample_history()[..3].to_vec();
        let outcome = service.analyze(&history).await;

        assert_eq!(
            outcome,
            AnalysisOutcome::InsufficientData { have: 3, need: 4 }
        );
        assert!(gateway.calls().await.is_empty());
        assert!(repository.stored().await.is_empty());
    }

    #[tokio::test]
    async fn test_full_pipeline_over_four_interactions() {
        let gateway = RuleGateway::new(vec![
            ("tutor assessing", Ok("Level: Intermediate\n")),
            (
                "generate 3 questions",
                Ok("How does temperature affect resistance?\n\nWhat limits Ohm's law?\nIs V always proportional to I?\n"),
            ),
        ]);
        let repository = RecordingRepository::new();
        let service = AnalysisService::new(gateway.clone(), repository.clone());

        let outcome = service.analyze(&sample_history()).await;

        let AnalysisOutcome::Completed { report, warnings } = outcome else {
            panic!("Expected completed analysis");
        };

        assert_eq!(report.most_frequent_topic, "Ohm's Law");
        assert_eq!(report.most_frequent_type, "fact");
        assert_eq!(report.skill_level, "Level: Intermediate");
        assert_eq!(
            report.future_questions,
            vec![
                "How does temperature affect resistance?",
                "What limits Ohm's law?",
                "Is V always proportional to I?",
            ]
        );
        assert!(warnings.is_empty());

        // The skill rating goes out before the question generation, and it
        // lists the questions in history order.
        let calls = gateway.calls().await;
        assert_eq!(calls.len(), 2);
        assert!(calls[0].contains("- What is Ohm's law?\n- Why does resistance rise?"));
        assert!(calls[1].contains("generate 3 questions"));
        assert!(calls[1].contains("Ohm's Law"));
        assert!(calls[1].contains("fact based"));
        assert!(calls[1].contains("user level: Level: Intermediate"));

        // Each generated question is stored with the winning labels.
        let stored = repository.stored().await;
        assert_eq!(stored.len(), 3);
        for row in &stored {
            assert_eq!(row.session_id, "session-1");
            assert_eq!(row.course, "Current Electricity");
            assert_eq!(row.topic, "Ohm's Law");
            assert_eq!(row.question_type, "fact");
        }
        assert_eq!(stored[0].question, "How does temperature affect resistance?");
    }

    #[tokio::test]
    async fn test_strict_majority_wins_both_tables() {
        let gateway = RuleGateway::new(vec![
            ("tutor assessing", Ok("Level: Beginner")),
            ("generate 3 questions", Ok("a\nb\nc")),
        ]);
        let repository = RecordingRepository::new();
        let service = AnalysisService::new(gateway, repository);

        let history = vec![
            interaction("What is Ohm's law?", "fact", "Ohm's Law"),
            interaction("State the unit of resistance.", "fact", "Ohm's Law"),
            interaction("What does V stand for?", "fact", "Ohm's Law"),
            interaction("Why do series circuits share current?", "reasoning", "Circuits"),
        ];
        let outcome = service.analyze(&history).await;

        let AnalysisOutcome::Completed { report, .. } = outcome else {
            panic!("Expected completed analysis");
        };
        assert_eq!(report.most_frequent_topic, "Ohm's Law");
        assert_eq!(report.most_frequent_type, "fact");
    }

    #[tokio::test]
    async fn test_skill_level_failure_degrades_but_pipeline_continues() {
        let gateway = RuleGateway::new(vec![
            ("tutor assessing", Err("rate limited")),
            ("generate 3 questions", Ok("One follow-up question")),
        ]);
        let repository = RecordingRepository::new();
        let service = AnalysisService::new(gateway, repository.clone());

        let outcome = service.analyze(&sample_history()).await;

        let AnalysisOutcome::Completed { report, warnings } = outcome else {
            panic!("Expected completed analysis");
        };
        assert_eq!(report.skill_level, "");
        assert_eq!(report.future_questions, vec!["One follow-up question"]);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("skill level"));
        assert_eq!(repository.stored().await.len(), 1);
    }

    #[tokio::test]
    async fn test_generation_failure_stores_nothing() {
        let gateway = RuleGateway::new(vec![
            ("tutor assessing", Ok("Level: Beginner")),
            ("generate 3 questions", Err("model unavailable")),
        ]);
        let repository = RecordingRepository::new();
        let service = AnalysisService::new(gateway, repository.clone());

        let outcome = service.analyze(&sample_history()).await;

        let AnalysisOutcome::Completed { report, warnings } = outcome else {
            panic!("Expected completed analysis");
        };
        assert!(report.future_questions.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("future questions"));
        assert!(repository.stored().await.is_empty());
    }

    #[tokio::test]
    async fn test_partial_insert_failure_keeps_earlier_rows() {
        let gateway = RuleGateway::new(vec![
            ("tutor assessing", Ok("Level: Advanced")),
            ("generate 3 questions", Ok("first\nsecond\nthird")),
        ]);
        let repository = RecordingRepository::failing_after(1);
        let service = AnalysisService::new(gateway, repository.clone());

        let outcome = service.analyze(&sample_history()).await;

        let AnalysisOutcome::Completed { report, warnings } = outcome else {
            panic!("Expected completed analysis");
        };

        // The report still carries all three questions; only persistence
        // degraded, one warning per failed row.
        assert_eq!(report.future_questions.len(), 3);
        assert_eq!(repository.stored().await.len(), 1);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.contains("future question")));
    }

    #[test]
    fn test_parse_question_lines_drops_blank_lines() {
        let parsed = parse_question_lines("  first \n\n\t\nsecond\r\nthird  \n");

        assert_eq!(parsed, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_parse_question_lines_of_empty_response() {
        assert!(parse_question_lines("").is_empty());
        assert!(parse_question_lines("\n\n").is_empty());
    }
}
