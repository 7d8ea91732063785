//! Postgres-backed poll store implementation.
//!
//! Tables follow the conventional `<app>_<model>` naming (`polls_question`,
//! `polls_choice`) and are created by [`PostgresPollStore::migrate`].
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Io / Tls / PoolTimedOut / PoolClosed / WorkerCrashed | N/A | `Unavailable` |
//! | Database (foreign key violation) | `23503` | `Missing` |
//! | ColumnDecode / ColumnNotFound / Decode | N/A | `Decode` |
//! | Database (other) and everything else | Any other | `Query` |

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;
use tracing::instrument;

use pollsite_core::RecordId;
use pollsite_polls::{Choice, ChoiceId, NewChoice, NewQuestion, Question, QuestionId};

use super::r#trait::{EntityStore, PollStore, StoreError, StoreResult};
use crate::lookup::Lookup;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS polls_question (
        id BIGSERIAL PRIMARY KEY,
        question_text VARCHAR(200) NOT NULL,
        pub_date TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS polls_choice (
        id BIGSERIAL PRIMARY KEY,
        question_id BIGINT NOT NULL REFERENCES polls_question (id) ON DELETE CASCADE,
        choice_text VARCHAR(200) NOT NULL,
        votes BIGINT NOT NULL DEFAULT 0 CHECK (votes >= 0)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS polls_choice_question_id_idx ON polls_choice (question_id)",
    r#"
    CREATE INDEX IF NOT EXISTS polls_question_pub_date_idx
        ON polls_question (pub_date DESC, id DESC)
    "#,
];

/// Postgres-backed poll store.
///
/// Uses the SQLx connection pool, which is `Send + Sync` and shared across
/// requests. Vote counting is a single `UPDATE ... SET votes = votes + 1`
/// statement, so concurrent votes never lose increments.
#[derive(Debug, Clone)]
pub struct PostgresPollStore {
    pool: Arc<PgPool>,
}

impl PostgresPollStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect a pool to `database_url`.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the poll tables if they do not exist yet.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(*statement)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("migrate", e))?;
        }
        Ok(())
    }

    #[instrument(skip(self), fields(question_id = %id), err)]
    pub async fn load_question(&self, id: QuestionId) -> StoreResult<Option<Question>> {
        let row =
            sqlx::query("SELECT id, question_text, pub_date FROM polls_question WHERE id = $1")
                .bind(id.get())
                .fetch_optional(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("load_question", e))?;

        row.as_ref().map(question_from_row).transpose()
    }

    #[instrument(skip(self), fields(choice_id = %id), err)]
    pub async fn load_choice(&self, id: ChoiceId) -> StoreResult<Option<Choice>> {
        let row = sqlx::query(
            "SELECT id, question_id, choice_text, votes FROM polls_choice WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_choice", e))?;

        row.as_ref().map(choice_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    pub async fn load_questions(&self, limit: Option<i64>) -> StoreResult<Vec<Question>> {
        // LIMIT NULL means "no limit" in Postgres.
        let rows = sqlx::query(
            r#"
            SELECT id, question_text, pub_date
            FROM polls_question
            ORDER BY pub_date DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_questions", e))?;

        rows.iter().map(question_from_row).collect()
    }

    #[instrument(skip(self, new), err)]
    pub async fn insert_question_row(&self, new: NewQuestion) -> StoreResult<Question> {
        let row = sqlx::query(
            r#"
            INSERT INTO polls_question (question_text, pub_date)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(new.question_text())
        .bind(new.pub_date())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_question", e))?;

        let id = QuestionId::new(record_id(&row, "id")?);
        Ok(new.into_question(id))
    }

    #[instrument(skip(self, question), fields(question_id = %question.id_typed()), err)]
    pub async fn update_question_row(&self, question: &Question) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE polls_question SET question_text = $2, pub_date = $3 WHERE id = $1",
        )
        .bind(question.id_typed().get())
        .bind(question.question_text())
        .bind(question.pub_date())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_question", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing(format!(
                "question {} does not exist",
                question.id_typed()
            )));
        }
        Ok(())
    }

    #[instrument(skip(self, new), fields(question_id = %new.question_id()), err)]
    pub async fn insert_choice_row(&self, new: NewChoice) -> StoreResult<Choice> {
        let row = sqlx::query(
            r#"
            INSERT INTO polls_choice (question_id, choice_text, votes)
            VALUES ($1, $2, 0)
            RETURNING id
            "#,
        )
        .bind(new.question_id().get())
        .bind(new.choice_text())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("add_choice", e))?;

        let id = ChoiceId::new(record_id(&row, "id")?);
        Ok(new.into_choice(id))
    }

    #[instrument(skip(self), fields(question_id = %question_id), err)]
    pub async fn load_choices(&self, question_id: QuestionId) -> StoreResult<Vec<Choice>> {
        let rows = sqlx::query(
            r#"
            SELECT id, question_id, choice_text, votes
            FROM polls_choice
            WHERE question_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(question_id.get())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("choices_for", e))?;

        rows.iter().map(choice_from_row).collect()
    }

    #[instrument(skip(self), fields(question_id = %question_id, choice_id = %choice_id), err)]
    pub async fn increment_votes(
        &self,
        question_id: QuestionId,
        choice_id: ChoiceId,
    ) -> StoreResult<Option<Choice>> {
        let row = sqlx::query(
            r#"
            UPDATE polls_choice
            SET votes = votes + 1
            WHERE id = $1 AND question_id = $2
            RETURNING id, question_id, choice_text, votes
            "#,
        )
        .bind(choice_id.get())
        .bind(question_id.get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("record_vote", e))?;

        row.as_ref().map(choice_from_row).transpose()
    }
}

#[async_trait]
impl EntityStore<Question> for PostgresPollStore {
    async fn find_by_id(&self, id: &QuestionId) -> StoreResult<Option<Question>> {
        self.load_question(*id).await
    }
}

#[async_trait]
impl EntityStore<Choice> for PostgresPollStore {
    async fn find_by_id(&self, id: &ChoiceId) -> StoreResult<Option<Choice>> {
        self.load_choice(*id).await
    }
}

#[async_trait]
impl PollStore for PostgresPollStore {
    async fn all_questions(&self) -> StoreResult<Vec<Question>> {
        self.load_questions(None).await
    }

    async fn latest_questions(&self, limit: usize) -> StoreResult<Vec<Question>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.load_questions(Some(limit)).await
    }

    async fn insert_question(&self, new: NewQuestion) -> StoreResult<Question> {
        self.insert_question_row(new).await
    }

    async fn update_question(&self, question: &Question) -> StoreResult<()> {
        self.update_question_row(question).await
    }

    async fn add_choice(&self, new: NewChoice) -> StoreResult<Choice> {
        self.insert_choice_row(new).await
    }

    async fn choices_for(&self, question_id: QuestionId) -> StoreResult<Vec<Choice>> {
        self.load_choices(question_id).await
    }

    async fn record_vote(
        &self,
        question_id: QuestionId,
        choice_id: ChoiceId,
    ) -> StoreResult<Lookup<Choice>> {
        Ok(self.increment_votes(question_id, choice_id).await?.into())
    }
}

fn record_id(row: &PgRow, column: &str) -> StoreResult<RecordId> {
    let raw: i64 = row
        .try_get(column)
        .map_err(|e| map_sqlx_error("decode", e))?;
    Ok(RecordId::new(raw)?)
}

fn question_from_row(row: &PgRow) -> StoreResult<Question> {
    let id = QuestionId::new(record_id(row, "id")?);
    let text: String = row
        .try_get("question_text")
        .map_err(|e| map_sqlx_error("decode", e))?;
    let pub_date: DateTime<Utc> = row
        .try_get("pub_date")
        .map_err(|e| map_sqlx_error("decode", e))?;
    Ok(Question::from_parts(id, text, pub_date)?)
}

fn choice_from_row(row: &PgRow) -> StoreResult<Choice> {
    let id = ChoiceId::new(record_id(row, "id")?);
    let question_id = QuestionId::new(record_id(row, "question_id")?);
    let text: String = row
        .try_get("choice_text")
        .map_err(|e| map_sqlx_error("decode", e))?;
    let votes: i64 = row
        .try_get("votes")
        .map_err(|e| map_sqlx_error("decode", e))?;
    let votes = u64::try_from(votes)
        .map_err(|_| StoreError::Decode(format!("negative vote count {votes} for choice {id}")))?;
    Ok(Choice::from_parts(id, question_id, text, votes)?)
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("io error in {operation}: {e}")),
        sqlx::Error::Tls(e) => StoreError::Unavailable(format!("tls error in {operation}: {e}")),
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool timed out in {operation}"))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::WorkerCrashed => {
            StoreError::Unavailable(format!("connection worker crashed in {operation}"))
        }
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {operation}: {}", db_err.message());
            match db_err.code().as_deref() {
                // Foreign key violation: the parent row is gone.
                Some("23503") => StoreError::Missing(msg),
                _ => StoreError::Query(msg),
            }
        }
        e @ (sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_)) => StoreError::Decode(format!("{operation}: {e}")),
        other => StoreError::Query(format!("{operation}: {other}")),
    }
}
