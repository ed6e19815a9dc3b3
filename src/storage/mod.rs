pub mod postgres;

pub use postgres::{DbStatus, QaStore};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A question record. `answers` is only populated by the
/// single-question fetch and is omitted from JSON when empty.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answers: Option<Vec<Answer>>,
}

/// An answer record owned by a question.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Answer {
    pub id: i64,
    pub question_id: i64,
    pub user_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
