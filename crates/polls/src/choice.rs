use serde::{Deserialize, Serialize};

use pollsite_core::{DomainError, DomainResult, Entity, RecordId};

use crate::question::{validate_text, QuestionId};

/// Choice identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoiceId(pub RecordId);

impl ChoiceId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0.get()
    }
}

impl core::fmt::Display for ChoiceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for ChoiceId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// One answer option of a question, with its running vote count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    id: ChoiceId,
    question_id: QuestionId,
    choice_text: String,
    votes: u64,
}

impl Choice {
    pub fn from_parts(
        id: ChoiceId,
        question_id: QuestionId,
        choice_text: impl Into<String>,
        votes: u64,
    ) -> DomainResult<Self> {
        Ok(Self {
            id,
            question_id,
            choice_text: validate_text("choice_text", choice_text.into())?,
            votes,
        })
    }

    pub fn id_typed(&self) -> ChoiceId {
        self.id
    }

    pub fn question_id(&self) -> QuestionId {
        self.question_id
    }

    pub fn choice_text(&self) -> &str {
        &self.choice_text
    }

    pub fn votes(&self) -> u64 {
        self.votes
    }

    /// Count one more vote.
    pub fn add_vote(&mut self) {
        self.votes = self.votes.saturating_add(1);
    }

    /// True when this choice answers `question_id`.
    pub fn belongs_to(&self, question_id: QuestionId) -> bool {
        self.question_id == question_id
    }
}

impl Entity for Choice {
    type Id = ChoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A choice that has not been persisted yet. New choices start at zero votes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChoice {
    question_id: QuestionId,
    choice_text: String,
}

impl NewChoice {
    pub fn new(question_id: QuestionId, choice_text: impl Into<String>) -> DomainResult<Self> {
        Ok(Self {
            question_id,
            choice_text: validate_text("choice_text", choice_text.into())?,
        })
    }

    pub fn question_id(&self) -> QuestionId {
        self.question_id
    }

    pub fn choice_text(&self) -> &str {
        &self.choice_text
    }

    pub fn into_choice(self, id: ChoiceId) -> Choice {
        Choice {
            id,
            question_id: self.question_id,
            choice_text: self.choice_text,
            votes: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn qid(n: i64) -> QuestionId {
        QuestionId::new(RecordId::new(n).unwrap())
    }

    fn cid(n: i64) -> ChoiceId {
        ChoiceId::new(RecordId::new(n).unwrap())
    }

    #[test]
    fn new_choice_starts_without_votes() {
        let choice = NewChoice::new(qid(1), "Not much").unwrap().into_choice(cid(3));

        assert_eq!(choice.id_typed(), cid(3));
        assert_eq!(choice.question_id(), qid(1));
        assert_eq!(choice.choice_text(), "Not much");
        assert_eq!(choice.votes(), 0);
    }

    #[test]
    fn new_choice_rejects_empty_text() {
        assert!(matches!(
            NewChoice::new(qid(1), ""),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn belongs_to_compares_question() {
        let choice = Choice::from_parts(cid(1), qid(2), "The sky", 0).unwrap();
        assert!(choice.belongs_to(qid(2)));
        assert!(!choice.belongs_to(qid(3)));
    }

    #[test]
    fn add_vote_saturates() {
        let mut choice = Choice::from_parts(cid(1), qid(1), "max", u64::MAX).unwrap();
        choice.add_vote();
        assert_eq!(choice.votes(), u64::MAX);
    }

    proptest! {
        /// Property: n calls to add_vote add exactly n votes.
        #[test]
        fn add_vote_counts_each_call(start in 0u64..1_000_000, n in 0usize..200) {
            let mut choice = Choice::from_parts(cid(1), qid(1), "c", start).unwrap();
            for _ in 0..n {
                choice.add_vote();
            }
            prop_assert_eq!(choice.votes(), start + n as u64);
        }
    }
}
