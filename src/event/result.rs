//! Result snapshot and question content handed to the presentation layer

use serde::Serialize;

use crate::config::QuestionRecord;

/// Scoring snapshot at the moment of a choice
///
/// `complete` is true once no question remains after the one just answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub right_answers: u32,
    pub wrong_answers: u32,
    pub complete: bool,
}

impl QuizResult {
    #[inline]
    pub fn new(right_answers: u32, wrong_answers: u32, complete: bool) -> Self {
        Self {
            right_answers,
            wrong_answers,
            complete,
        }
    }

    /// Number of scored choices
    #[inline]
    pub fn total_answered(&self) -> u32 {
        self.right_answers.saturating_add(self.wrong_answers)
    }
}

/// Question content for rendering: text plus one label per option slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionView<'a> {
    pub text: &'a str,
    pub options: &'a [String],
}

impl<'a> From<&'a QuestionRecord> for QuestionView<'a> {
    fn from(record: &'a QuestionRecord) -> Self {
        Self {
            text: &record.text,
            options: record.options.as_slice(),
        }
    }
}
