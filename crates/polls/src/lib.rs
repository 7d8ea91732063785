//! Polls domain module.
//!
//! This crate contains the poll schema (questions and their choices) and its
//! validation rules, implemented purely as domain logic (no IO, no HTTP, no
//! storage).

pub mod choice;
pub mod question;

/// Maximum length of question and choice texts, in characters.
pub const MAX_TEXT_LEN: usize = 200;

pub use choice::{Choice, ChoiceId, NewChoice};
pub use question::{NewQuestion, Question, QuestionId};
