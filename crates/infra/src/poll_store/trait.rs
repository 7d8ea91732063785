use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use pollsite_core::{DomainError, Entity};
use pollsite_polls::{Choice, ChoiceId, NewChoice, NewQuestion, Question, QuestionId};

use crate::lookup::Lookup;

/// Result type used by store implementations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation error.
///
/// These are **infrastructure faults**: the store could not answer. A record
/// that simply does not exist is never reported through this type on the
/// read path; readers get `None` / `Lookup::NotFound` instead.
///
/// ## Error Categories
///
/// - **Unavailable**: connection refused, pool exhausted or closed, lock poisoned
/// - **Query**: the backend rejected the statement
/// - **Decode**: a row could not be read back into Rust types
/// - **Invalid**: a stored row violates the domain rules
/// - **Missing**: a *write* referenced a record that does not exist
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("failed to decode row: {0}")]
    Decode(String),

    #[error("invalid record: {0}")]
    Invalid(#[from] DomainError),

    #[error("missing record: {0}")]
    Missing(String),
}

impl StoreError {
    /// True for faults caused by the backend being unreachable.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

/// Key-based retrieval of one entity type.
///
/// `Ok(None)` is the absence signal; `Err` is reserved for store faults.
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    async fn find_by_id(&self, id: &E::Id) -> StoreResult<Option<E>>;
}

/// Persistence boundary for polls: questions, their choices, and votes.
///
/// ## Ordering
///
/// - `all_questions` / `latest_questions`: newest `pub_date` first, ties broken
///   by the higher id first
/// - `choices_for`: ascending choice id (creation order)
///
/// ## Key assignment
///
/// Stores assign ids on insert, starting at 1 and increasing monotonically.
#[async_trait]
pub trait PollStore: EntityStore<Question> + EntityStore<Choice> {
    async fn all_questions(&self) -> StoreResult<Vec<Question>>;

    /// At most `limit` questions, newest first.
    async fn latest_questions(&self, limit: usize) -> StoreResult<Vec<Question>>;

    async fn insert_question(&self, new: NewQuestion) -> StoreResult<Question>;

    /// Persist changed fields of an existing question.
    ///
    /// Returns `StoreError::Missing` if the question was never inserted.
    async fn update_question(&self, question: &Question) -> StoreResult<()>;

    /// Returns `StoreError::Missing` if the parent question does not exist.
    async fn add_choice(&self, new: NewChoice) -> StoreResult<Choice>;

    async fn choices_for(&self, question_id: QuestionId) -> StoreResult<Vec<Choice>>;

    /// Atomically count one vote for `choice_id`.
    ///
    /// `NotFound` when the choice does not exist or belongs to another question.
    async fn record_vote(
        &self,
        question_id: QuestionId,
        choice_id: ChoiceId,
    ) -> StoreResult<Lookup<Choice>>;
}

#[async_trait]
impl<E, S> EntityStore<E> for Arc<S>
where
    E: Entity + 'static,
    S: EntityStore<E> + ?Sized,
{
    async fn find_by_id(&self, id: &E::Id) -> StoreResult<Option<E>> {
        EntityStore::<E>::find_by_id(&**self, id).await
    }
}

#[async_trait]
impl<S> PollStore for Arc<S>
where
    S: PollStore + ?Sized,
{
    async fn all_questions(&self) -> StoreResult<Vec<Question>> {
        (**self).all_questions().await
    }

    async fn latest_questions(&self, limit: usize) -> StoreResult<Vec<Question>> {
        (**self).latest_questions(limit).await
    }

    async fn insert_question(&self, new: NewQuestion) -> StoreResult<Question> {
        (**self).insert_question(new).await
    }

    async fn update_question(&self, question: &Question) -> StoreResult<()> {
        (**self).update_question(question).await
    }

    async fn add_choice(&self, new: NewChoice) -> StoreResult<Choice> {
        (**self).add_choice(new).await
    }

    async fn choices_for(&self, question_id: QuestionId) -> StoreResult<Vec<Choice>> {
        (**self).choices_for(question_id).await
    }

    async fn record_vote(
        &self,
        question_id: QuestionId,
        choice_id: ChoiceId,
    ) -> StoreResult<Lookup<Choice>> {
        (**self).record_vote(question_id, choice_id).await
    }
}
