//! Persistence gateway over a sqlx PostgreSQL pool.
//!
//! Each method is one storage round trip; answer creation is the one
//! exception (existence check, then insert). No caching, no batching.

use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use tracing::{info, warn};

use super::{Answer, Question};

/// Maximum connections for the pool. Kept low for a single small service.
const MAX_CONNECTIONS: u32 = 5;

/// Startup connection retry policy: bounded attempts, fixed delay.
const CONNECT_ATTEMPTS: u32 = 10;
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Upper bound on waiting for a pooled connection. Keeps a dead database
/// from stalling requests for the sqlx default of 30 seconds.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);

/// Database connectivity as reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbStatus {
    Connected,
    Disconnected,
    Error,
}

impl DbStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DbStatus::Connected => "connected",
            DbStatus::Disconnected => "disconnected",
            DbStatus::Error => "error",
        }
    }
}

/// Persistence gateway for questions and answers.
#[derive(Clone)]
pub struct QaStore {
    pool: PgPool,
}

impl QaStore {
    /// Connect to PostgreSQL, retrying up to [`CONNECT_ATTEMPTS`] times with
    /// a fixed delay. Exhausting the retries returns the last error; the
    /// caller treats that as fatal.
    pub async fn connect_with_retry(database_url: &str) -> Result<Self, sqlx::Error> {
        let mut last_err = None;

        for attempt in 1..=CONNECT_ATTEMPTS {
            match PgPoolOptions::new()
                .max_connections(MAX_CONNECTIONS)
                .acquire_timeout(ACQUIRE_TIMEOUT)
                .connect(database_url)
                .await
            {
                Ok(pool) => return Ok(Self { pool }),
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts = CONNECT_ATTEMPTS,
                        error = %e,
                        "Failed to connect to database"
                    );
                    last_err = Some(e);
                    if attempt < CONNECT_ATTEMPTS {
                        tokio::time::sleep(CONNECT_RETRY_DELAY).await;
                    }
                }
            }
        }

        Err(last_err.expect("at least one connection attempt was made"))
    }

    /// Build a store over a lazily-connecting pool. No connection is
    /// attempted until the first query.
    pub fn connect_lazy(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    /// Create the questions and answers tables if they are absent. Existing
    /// tables are left untouched.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS questions (
                id BIGSERIAL PRIMARY KEY,
                text TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Deleting a question deletes its answers.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS answers (
                id BIGSERIAL PRIMARY KEY,
                question_id BIGINT NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
                user_id TEXT NOT NULL,
                text TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_answers_question_id ON answers(question_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Log table existence and row counts as a startup sanity check.
    pub async fn log_table_stats(&self) -> Result<(), sqlx::Error> {
        for table in ["questions", "answers"] {
            let exists: bool = sqlx::query_scalar(
                "SELECT EXISTS (SELECT FROM information_schema.tables WHERE table_name = $1)",
            )
            .bind(table)
            .fetch_one(&self.pool)
            .await?;

            if exists {
                let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                    .fetch_one(&self.pool)
                    .await?;
                info!(table, rows = count, "Table ready");
            } else {
                warn!(table, "Table does not exist");
            }
        }
        Ok(())
    }

    /// Ping the database, distinguishing "no handle available" from a
    /// failed query on a live handle.
    pub async fn ping(&self) -> DbStatus {
        let mut conn = match self.pool.acquire().await {
            Ok(conn) => conn,
            Err(_) => return DbStatus::Error,
        };

        match sqlx::query("SELECT 1").execute(&mut *conn).await {
            Ok(_) => DbStatus::Connected,
            Err(_) => DbStatus::Disconnected,
        }
    }

    pub async fn list_questions(&self) -> Result<Vec<Question>, sqlx::Error> {
        sqlx::query_as::<_, Question>("SELECT id, text, created_at FROM questions ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn create_question(&self, text: &str) -> Result<Question, sqlx::Error> {
        sqlx::query_as::<_, Question>(
            "INSERT INTO questions (text, created_at) VALUES ($1, $2) RETURNING id, text, created_at",
        )
        .bind(text)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
    }

    /// Fetch a question together with its answers in a single LEFT JOIN
    /// query. Returns `None` when the question does not exist.
    pub async fn find_question_with_answers(
        &self,
        id: i64,
    ) -> Result<Option<Question>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT q.id, q.text, q.created_at,
                   a.id AS answer_id, a.user_id, a.text AS answer_text,
                   a.created_at AS answer_created_at
            FROM questions q
            LEFT JOIN answers a ON a.question_id = q.id
            WHERE q.id = $1
            ORDER BY a.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let Some(first) = rows.first() else {
            return Ok(None);
        };

        let mut question = Question {
            id: first.try_get("id")?,
            text: first.try_get("text")?,
            created_at: first.try_get("created_at")?,
            answers: None,
        };

        let mut answers = Vec::new();
        for row in &rows {
            if let Some(answer_id) = row.try_get::<Option<i64>, _>("answer_id")? {
                answers.push(Answer {
                    id: answer_id,
                    question_id: question.id,
                    user_id: row.try_get("user_id")?,
                    text: row.try_get("answer_text")?,
                    created_at: row.try_get("answer_created_at")?,
                });
            }
        }

        // Mirror the wire format: empty collections are omitted.
        if !answers.is_empty() {
            question.answers = Some(answers);
        }

        Ok(Some(question))
    }

    /// Delete a question (and, via cascade, its answers). Returns whether a
    /// row was actually removed.
    pub async fn delete_question(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn question_exists(&self, id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM questions WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn create_answer(
        &self,
        question_id: i64,
        user_id: &str,
        text: &str,
    ) -> Result<Answer, sqlx::Error> {
        sqlx::query_as::<_, Answer>(
            r#"
            INSERT INTO answers (question_id, user_id, text, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, question_id, user_id, text, created_at
            "#,
        )
        .bind(question_id)
        .bind(user_id)
        .bind(text)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
    }

    pub async fn find_answer(&self, id: i64) -> Result<Option<Answer>, sqlx::Error> {
        sqlx::query_as::<_, Answer>(
            "SELECT id, question_id, user_id, text, created_at FROM answers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete_answer(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM answers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests require a real database.
    // Run with: DATABASE_URL=postgres://... cargo test -- --ignored

    async fn test_store() -> QaStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let store = QaStore::connect_with_retry(&url)
            .await
            .expect("connection failed");
        store.ensure_schema().await.expect("schema setup failed");
        store
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn question_roundtrip() {
        let store = test_store().await;

        let start = Utc::now();
        let created = store.create_question("What is Rust?").await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.text, "What is Rust?");
        assert!(created.created_at >= start);

        let fetched = store
            .find_question_with_answers(created.id)
            .await
            .unwrap()
            .expect("question should exist");
        assert_eq!(fetched.id, created.id);
        assert!(fetched.answers.is_none());

        assert!(store.delete_question(created.id).await.unwrap());
        assert!(!store.delete_question(created.id).await.unwrap());
        assert!(store
            .find_question_with_answers(created.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn cascade_deletes_answers() {
        let store = test_store().await;

        let question = store.create_question("Cascade?").await.unwrap();
        let answer = store
            .create_answer(question.id, "user-1", "Yes.")
            .await
            .unwrap();
        assert_eq!(answer.question_id, question.id);

        assert!(store.delete_question(question.id).await.unwrap());
        assert!(store.find_answer(answer.id).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn answers_load_in_order() {
        let store = test_store().await;

        let question = store.create_question("Ordered?").await.unwrap();
        let first = store
            .create_answer(question.id, "user-1", "first")
            .await
            .unwrap();
        let second = store
            .create_answer(question.id, "user-2", "second")
            .await
            .unwrap();

        let fetched = store
            .find_question_with_answers(question.id)
            .await
            .unwrap()
            .unwrap();
        let answers = fetched.answers.expect("answers should be loaded");
        assert_eq!(
            answers.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );

        store.delete_question(question.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn missing_question_does_not_exist() {
        let store = test_store().await;
        assert!(!store.question_exists(999_999).await.unwrap());
    }
}
