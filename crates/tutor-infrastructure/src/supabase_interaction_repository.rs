//! SupabaseInteractionRepository - hosted Postgres storage for interactions.
//!
//! This repository calls the project's PostgREST endpoint directly.
//! Configuration priority: ~/.config/tutor/secret.json > environment variables

use crate::storage::SecretStorage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use tutor_core::config::SecretConfig;
use tutor_core::error::{Result, TutorError};
use tutor_core::interaction::{FutureQuestion, Interaction};
use tutor_core::repository::InteractionRepository;

const INTERACTIONS_TABLE: &str = "interactions";
const FUTURE_QUESTIONS_TABLE: &str = "future_questions";

/// Repository implementation that stores rows in a Supabase project.
///
/// Both tables are append-only from the application's point of view; the
/// database assigns `created_at` on insert and the history query orders by
/// it, newest first.
#[derive(Clone)]
pub struct SupabaseInteractionRepository {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseInteractionRepository {
    /// Creates a repository for the given project URL and service key.
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        let base_url = url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            api_key: key.into(),
        }
    }

    /// Loads configuration from ~/.config/tutor/secret.json or environment variables.
    ///
    /// Priority:
    /// 1. ~/.config/tutor/secret.json, when its `supabase` entry is filled in
    /// 2. Environment variables (SUPABASE_URL, SUPABASE_KEY)
    pub fn try_from_env() -> Result<Self> {
        // Try loading from SecretStorage first
        if let Ok(storage) = SecretStorage::new() {
            if let Ok(secret_config) = storage.load() {
                if let Some((url, key)) = secret_credentials(secret_config) {
                    return Ok(Self::new(url, key));
                }
            }
        }

        // Fallback to environment variables
        let url = env::var("SUPABASE_URL").map_err(|_| {
            TutorError::config(
                "SUPABASE_URL not found in ~/.config/tutor/secret.json or environment variables",
            )
        })?;
        let key = env::var("SUPABASE_KEY").map_err(|_| {
            TutorError::config(
                "SUPABASE_KEY not found in ~/.config/tutor/secret.json or environment variables",
            )
        })?;

        Ok(Self::new(url, key))
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    async fn insert_row<T: Serialize>(&self, table: &str, row: &T) -> Result<()> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await
            .map_err(|err| {
                TutorError::data_access(format!("Insert into '{table}' failed: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Supabase error body".to_string());
            return Err(map_postgrest_error(table, status, body));
        }

        Ok(())
    }
}

#[async_trait]
impl InteractionRepository for SupabaseInteractionRepository {
    async fn history(&self, session_id: &str, course: &str) -> Result<Vec<Interaction>> {
        let session_filter = format!("eq.{session_id}");
        let course_filter = format!("eq.{course}");

        let response = self
            .client
            .get(self.table_url(INTERACTIONS_TABLE))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&[
                ("select", "*"),
                ("session_id", session_filter.as_str()),
                ("course", course_filter.as_str()),
                ("order", "created_at.desc"),
            ])
            .send()
            .await
            .map_err(|err| TutorError::data_access(format!("History query failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Supabase error body".to_string());
            return Err(map_postgrest_error(INTERACTIONS_TABLE, status, body));
        }

        let rows: Vec<InteractionRow> = response.json().await.map_err(|err| {
            TutorError::data_access(format!("Failed to parse history response: {err}"))
        })?;

        tracing::debug!(
            "Loaded {} interactions for session '{}', course '{}'",
            rows.len(),
            session_id,
            course
        );
        Ok(rows.into_iter().map(Interaction::from).collect())
    }

    async fn insert_interaction(&self, interaction: &Interaction) -> Result<()> {
        self.insert_row(INTERACTIONS_TABLE, &InteractionRow::from(interaction))
            .await
    }

    async fn insert_future_question(&self, question: &FutureQuestion) -> Result<()> {
        self.insert_row(FUTURE_QUESTIONS_TABLE, &FutureQuestionRow::from(question))
            .await
    }
}

/// Wire representation of an `interactions` row.
#[derive(Serialize, Deserialize)]
struct InteractionRow {
    session_id: String,
    course: String,
    question: String,
    response: String,
    question_type: String,
    topic: String,
    /// Assigned by the database; never sent on insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

impl From<&Interaction> for InteractionRow {
    fn from(interaction: &Interaction) -> Self {
        Self {
            session_id: interaction.session_id.clone(),
            course: interaction.course.clone(),
            question: interaction.question.clone(),
            response: interaction.response.clone(),
            question_type: interaction.question_type.clone(),
            topic: interaction.topic.clone(),
            created_at: None,
        }
    }
}

impl From<InteractionRow> for Interaction {
    fn from(row: InteractionRow) -> Self {
        Self {
            session_id: row.session_id,
            course: row.course,
            question: row.question,
            response: row.response,
            question_type: row.question_type,
            topic: row.topic,
        }
    }
}

/// Wire representation of a `future_questions` row.
#[derive(Serialize, Deserialize)]
struct FutureQuestionRow {
    session_id: String,
    course: String,
    question: String,
    topic: String,
    question_type: String,
}

impl From<&FutureQuestion> for FutureQuestionRow {
    fn from(question: &FutureQuestion) -> Self {
        Self {
            session_id: question.session_id.clone(),
            course: question.course.clone(),
            question: question.question.clone(),
            topic: question.topic.clone(),
            question_type: question.question_type.clone(),
        }
    }
}

/// Picks usable Supabase credentials out of a loaded secret file.
///
/// `ensure_secret_file` writes a template whose `url` and `key` are empty;
/// such an unfilled entry must not shadow the environment fallback, so both
/// values have to be non-empty.
fn secret_credentials(config: SecretConfig) -> Option<(String, String)> {
    let supabase = config.supabase?;
    if supabase.url.trim().is_empty() || supabase.key.trim().is_empty() {
        return None;
    }
    Some((supabase.url, supabase.key))
}

#[derive(Deserialize)]
struct PostgrestErrorBody {
    #[allow(dead_code)]
    code: Option<String>,
    message: Option<String>,
}

fn map_postgrest_error(table: &str, status: StatusCode, body: String) -> TutorError {
    let message = serde_json::from_str::<PostgrestErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.message)
        .unwrap_or(body);

    TutorError::data_access(format!(
        "Supabase request for '{table}' failed ({}): {message}",
        status.as_u16()
    ))
}
