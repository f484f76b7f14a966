//! Interaction repository trait.
//!
//! Defines the interface for persisting interaction records.

use crate::error::Result;
use crate::interaction::{FutureQuestion, Interaction};
use async_trait::async_trait;

/// An abstract, append-only store of interaction records.
///
/// This trait defines the contract for recording answered questions and
/// generated follow-up questions, decoupling the chat and analysis flows
/// from the specific storage mechanism (a hosted Postgres API in
/// production, in-memory fakes in tests).
///
/// # Implementation Notes
///
/// Rows are only ever inserted, one at a time. There is no update, no
/// delete, and no transaction spanning multiple inserts; a failure between
/// two inserts leaves the earlier rows committed.
#[async_trait]
pub trait InteractionRepository: Send + Sync {
    /// Loads the recorded interactions for a session and course.
    ///
    /// # Arguments
    ///
    /// * `session_id` - The session to load history for
    /// * `course` - The course the history belongs to
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Interaction>)`: Matching rows, newest first; empty when
    ///   the session has no recorded interactions
    /// - `Err(_)`: The store could not be queried
    async fn history(&self, session_id: &str, course: &str) -> Result<Vec<Interaction>>;

    /// Appends one interaction row.
    ///
    /// # Arguments
    ///
    /// * `interaction` - The answered question to record
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Row stored
    /// - `Err(_)`: The row could not be stored
    async fn insert_interaction(&self, interaction: &Interaction) -> Result<()>;

    /// Appends one generated future-question row.
    ///
    /// # Arguments
    ///
    /// * `question` - The generated question to record
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Row stored
    /// - `Err(_)`: The row could not be stored
    async fn insert_future_question(&self, question: &FutureQuestion) -> Result<()>;
}
