use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use pollsite_core::RecordId;
use pollsite_polls::{Choice, ChoiceId, NewChoice, NewQuestion, Question, QuestionId};

use super::r#trait::{EntityStore, PollStore, StoreError, StoreResult};
use crate::lookup::Lookup;

#[derive(Debug, Default)]
struct Tables {
    questions: BTreeMap<QuestionId, Question>,
    choices: BTreeMap<ChoiceId, Choice>,
    last_question_id: Option<RecordId>,
    last_choice_id: Option<RecordId>,
}

/// In-memory poll store.
///
/// Intended for tests/dev. Data lives as long as the store value.
#[derive(Debug, Default)]
pub struct InMemoryPollStore {
    tables: RwLock<Tables>,
}

impl InMemoryPollStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("in-memory poll store lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("in-memory poll store lock poisoned".into()))
    }
}

fn next_id(last: &mut Option<RecordId>) -> RecordId {
    let id = last.map(RecordId::next).unwrap_or(RecordId::FIRST);
    *last = Some(id);
    id
}

fn newest_first(questions: &mut [Question]) {
    questions.sort_by(|a, b| {
        b.pub_date()
            .cmp(&a.pub_date())
            .then_with(|| b.id_typed().cmp(&a.id_typed()))
    });
}

#[async_trait]
impl EntityStore<Question> for InMemoryPollStore {
    async fn find_by_id(&self, id: &QuestionId) -> StoreResult<Option<Question>> {
        Ok(self.read()?.questions.get(id).cloned())
    }
}

#[async_trait]
impl EntityStore<Choice> for InMemoryPollStore {
    async fn find_by_id(&self, id: &ChoiceId) -> StoreResult<Option<Choice>> {
        Ok(self.read()?.choices.get(id).cloned())
    }
}

#[async_trait]
impl PollStore for InMemoryPollStore {
    async fn all_questions(&self) -> StoreResult<Vec<Question>> {
        let mut questions: Vec<Question> = self.read()?.questions.values().cloned().collect();
        newest_first(&mut questions);
        Ok(questions)
    }

    async fn latest_questions(&self, limit: usize) -> StoreResult<Vec<Question>> {
        let mut questions = self.all_questions().await?;
        questions.truncate(limit);
        Ok(questions)
    }

    async fn insert_question(&self, new: NewQuestion) -> StoreResult<Question> {
        let mut tables = self.write()?;
        let id = QuestionId::new(next_id(&mut tables.last_question_id));
        let question = new.into_question(id);
        tables.questions.insert(id, question.clone());
        Ok(question)
    }

    async fn update_question(&self, question: &Question) -> StoreResult<()> {
        let mut tables = self.write()?;
        match tables.questions.get_mut(&question.id_typed()) {
            Some(slot) => {
                *slot = question.clone();
                Ok(())
            }
            None => Err(StoreError::Missing(format!(
                "question {} does not exist",
                question.id_typed()
            ))),
        }
    }

    async fn add_choice(&self, new: NewChoice) -> StoreResult<Choice> {
        let mut tables = self.write()?;
        if !tables.questions.contains_key(&new.question_id()) {
            return Err(StoreError::Missing(format!(
                "question {} does not exist",
                new.question_id()
            )));
        }
        let id = ChoiceId::new(next_id(&mut tables.last_choice_id));
        let choice = new.into_choice(id);
        tables.choices.insert(id, choice.clone());
        Ok(choice)
    }

    async fn choices_for(&self, question_id: QuestionId) -> StoreResult<Vec<Choice>> {
        // BTreeMap iteration is already in ascending id order.
        Ok(self
            .read()?
            .choices
            .values()
            .filter(|c| c.belongs_to(question_id))
            .cloned()
            .collect())
    }

    async fn record_vote(
        &self,
        question_id: QuestionId,
        choice_id: ChoiceId,
    ) -> StoreResult<Lookup<Choice>> {
        let mut tables = self.write()?;
        match tables.choices.get_mut(&choice_id) {
            Some(choice) if choice.belongs_to(question_id) => {
                choice.add_vote();
                Ok(Lookup::Found(choice.clone()))
            }
            _ => Ok(Lookup::NotFound),
        }
    }
}
