use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use pollsite_core::{DomainError, DomainResult, Entity, RecordId};

use crate::MAX_TEXT_LEN;

/// Question identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub RecordId);

impl QuestionId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0.get()
    }
}

impl core::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for QuestionId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// A poll question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: QuestionId,
    question_text: String,
    pub_date: DateTime<Utc>,
}

impl Question {
    /// Materialize a question from stored parts, re-checking the text rules.
    pub fn from_parts(
        id: QuestionId,
        question_text: impl Into<String>,
        pub_date: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let question_text = validate_text("question_text", question_text.into())?;
        Ok(Self {
            id,
            question_text,
            pub_date,
        })
    }

    pub fn id_typed(&self) -> QuestionId {
        self.id
    }

    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    pub fn pub_date(&self) -> DateTime<Utc> {
        self.pub_date
    }

    /// Replace the question text (the store persists the change on update).
    pub fn set_question_text(&mut self, text: impl Into<String>) -> DomainResult<()> {
        self.question_text = validate_text("question_text", text.into())?;
        Ok(())
    }

    /// True when the question was published within the day before `now`.
    ///
    /// Questions dated in the future are not "recent".
    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        now - Duration::days(1) <= self.pub_date && self.pub_date <= now
    }
}

impl Entity for Question {
    type Id = QuestionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A question that has not been persisted yet (the store assigns the id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    question_text: String,
    pub_date: DateTime<Utc>,
}

impl NewQuestion {
    pub fn new(question_text: impl Into<String>, pub_date: DateTime<Utc>) -> DomainResult<Self> {
        Ok(Self {
            question_text: validate_text("question_text", question_text.into())?,
            pub_date,
        })
    }

    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    pub fn pub_date(&self) -> DateTime<Utc> {
        self.pub_date
    }

    /// Attach the id assigned by the store.
    pub fn into_question(self, id: QuestionId) -> Question {
        Question {
            id,
            question_text: self.question_text,
            pub_date: self.pub_date,
        }
    }
}

pub(crate) fn validate_text(field: &str, text: String) -> DomainResult<String> {
    if text.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} must not be empty")));
    }
    let len = text.chars().count();
    if len > MAX_TEXT_LEN {
        return Err(DomainError::validation(format!(
            "{field} is {len} characters long (max {MAX_TEXT_LEN})"
        )));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_question_id(n: i64) -> QuestionId {
        QuestionId::new(RecordId::new(n).unwrap())
    }

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn new_question_rejects_blank_text() {
        let err = NewQuestion::new("   ", test_time()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn new_question_rejects_text_over_limit() {
        let text = "q".repeat(MAX_TEXT_LEN + 1);
        assert!(NewQuestion::new(text, test_time()).is_err());

        let text = "q".repeat(MAX_TEXT_LEN);
        assert!(NewQuestion::new(text, test_time()).is_ok());
    }

    #[test]
    fn into_question_keeps_fields() {
        let q = NewQuestion::new("What's going on?", test_time())
            .unwrap()
            .into_question(test_question_id(1));

        assert_eq!(q.id_typed(), test_question_id(1));
        assert_eq!(q.question_text(), "What's going on?");
        assert_eq!(q.pub_date(), test_time());
    }

    #[test]
    fn set_question_text_validates() {
        let mut q =
            Question::from_parts(test_question_id(2), "What's going on?", test_time()).unwrap();

        q.set_question_text("Are there anything else?").unwrap();
        assert_eq!(q.question_text(), "Are there anything else?");

        assert!(q.set_question_text("").is_err());
        assert_eq!(q.question_text(), "Are there anything else?");
    }

    #[test]
    fn was_published_recently_with_future_question() {
        let now = test_time();
        let q =
            Question::from_parts(test_question_id(1), "future", now + Duration::days(30)).unwrap();
        assert!(!q.was_published_recently(now));
    }

    #[test]
    fn was_published_recently_with_old_question() {
        let now = test_time();
        let pub_date = now - Duration::days(1) - Duration::seconds(1);
        let q = Question::from_parts(test_question_id(1), "old", pub_date).unwrap();
        assert!(!q.was_published_recently(now));
    }

    #[test]
    fn was_published_recently_with_recent_question() {
        let now = test_time();
        let pub_date = now - Duration::hours(23) - Duration::minutes(59) - Duration::seconds(59);
        let q = Question::from_parts(test_question_id(1), "recent", pub_date).unwrap();
        assert!(q.was_published_recently(now));
    }

    #[test]
    fn question_id_parses_digits_only() {
        assert_eq!("2".parse::<QuestionId>().unwrap(), test_question_id(2));
        assert!("two".parse::<QuestionId>().is_err());
    }
}
