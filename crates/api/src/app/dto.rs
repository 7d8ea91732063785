use serde::{Deserialize, Serialize};

use pollsite_polls::{Choice, Question};

// -------------------------
// Form payloads
// -------------------------

/// Body of `POST /polls/{id}/vote/`.
///
/// `choice` stays a raw string so a missing or malformed value can be
/// answered with the detail page instead of a rejection.
#[derive(Debug, Deserialize)]
pub struct VoteForm {
    pub choice: Option<String>,
}

// -------------------------
// Template contexts
// -------------------------

#[derive(Debug, Serialize)]
pub struct IndexContext<'a> {
    pub latest_question_list: &'a [Question],
}

impl<'a> IndexContext<'a> {
    pub fn new(latest_question_list: &'a [Question]) -> Self {
        Self {
            latest_question_list,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DetailContext<'a> {
    pub question: &'a Question,
    pub choices: &'a [Choice],
    pub error_message: Option<&'a str>,
}

impl<'a> DetailContext<'a> {
    pub fn new(
        question: &'a Question,
        choices: &'a [Choice],
        error_message: Option<&'a str>,
    ) -> Self {
        Self {
            question,
            choices,
            error_message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChoiceResult<'a> {
    pub choice_text: &'a str,
    pub votes_label: String,
}

impl<'a> From<&'a Choice> for ChoiceResult<'a> {
    fn from(choice: &'a Choice) -> Self {
        Self {
            choice_text: choice.choice_text(),
            votes_label: votes_label(choice.votes()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResultsContext<'a> {
    pub question: &'a Question,
    pub choices: Vec<ChoiceResult<'a>>,
}

impl<'a> ResultsContext<'a> {
    pub fn new(question: &'a Question, choices: &'a [Choice]) -> Self {
        Self {
            question,
            choices: choices.iter().map(ChoiceResult::from).collect(),
        }
    }
}

pub fn votes_label(votes: u64) -> String {
    if votes == 1 {
        "1 vote".to_string()
    } else {
        format!("{votes} votes")
    }
}
