//! Demo data for local runs.

use chrono::{DateTime, Utc};

use pollsite_polls::{NewChoice, NewQuestion, Question};

use crate::poll_store::{PollStore, StoreResult};

pub const DEMO_DRAFT_TEXT: &str = "What's going on?";
pub const DEMO_QUESTION_TEXT: &str = "Are there anything else?";
pub const DEMO_CHOICES: [&str; 3] = ["Not much", "The sky", "Just hacking again"];

/// Seed one demo poll published at `now`.
///
/// The question is created under a draft text, renamed, re-read by key and
/// given three choices. Seeding twice is a no-op: if a question with the demo
/// text already exists it is returned unchanged.
pub async fn seed_demo<S>(store: &S, now: DateTime<Utc>) -> StoreResult<Question>
where
    S: PollStore + ?Sized,
{
    let existing = store.all_questions().await?;
    tracing::info!(questions = existing.len(), "seeding demo poll");
    if let Some(q) = existing
        .into_iter()
        .find(|q| q.question_text() == DEMO_QUESTION_TEXT)
    {
        tracing::info!(question_id = %q.id_typed(), "demo poll already present");
        return Ok(q);
    }

    let mut question = store
        .insert_question(NewQuestion::new(DEMO_DRAFT_TEXT, now)?)
        .await?;

    question.set_question_text(DEMO_QUESTION_TEXT)?;
    store.update_question(&question).await?;

    for text in DEMO_CHOICES {
        store
            .add_choice(NewChoice::new(question.id_typed(), text)?)
            .await?;
    }

    tracing::info!(question_id = %question.id_typed(), "demo poll seeded");
    Ok(question)
}
