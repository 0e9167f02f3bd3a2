//! Question record and question set structures

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::error::{QuizError, Result};

/// Fewest options a question may have
pub const MIN_OPTIONS: usize = 2;

/// Answer labels for a single question - four inline slots covers the usual layout
pub type OptionLabels = SmallVec<[String; 4]>;

/// A single question with its options and the 1-based index of the correct one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(rename = "question")]
    pub text: String,
    pub options: OptionLabels,
    /// 1-based; kept signed so malformed content survives loading and is
    /// rejected when drawn
    #[serde(rename = "correctOption", alias = "correct_option")]
    pub correct_index: i32,
}

impl QuestionRecord {
    pub fn new<I, S>(text: impl Into<String>, options: I, correct_index: i32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text: text.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct_index,
        }
    }

    /// Whether the 1-based `option_index` is the correct answer
    #[inline]
    pub fn is_correct(&self, option_index: usize) -> bool {
        i64::try_from(option_index).ok() == Some(i64::from(self.correct_index))
    }

    /// Check this record against the number of option slots of the presentation layer
    ///
    /// Fewer than two options is rejected whatever the layout; then the slot
    /// check runs before the answer index.
    pub fn validate(&self, option_slots: usize) -> Result<()> {
        if self.options.len() < MIN_OPTIONS {
            return Err(QuizError::TooFewOptions(self.options.len()));
        }
        if self.options.len() != option_slots {
            return Err(QuizError::StructuralMismatch {
                expected: option_slots,
                actual: self.options.len(),
            });
        }

        let max = self.options.len();
        let in_range = usize::try_from(self.correct_index)
            .map(|idx| (1..=max).contains(&idx))
            .unwrap_or(false);
        if !in_range {
            return Err(QuizError::OutOfRange {
                index: i64::from(self.correct_index),
                max,
            });
        }

        Ok(())
    }
}

/// Ordered question list as supplied by a loader
///
/// Deserializes from `{"questions": [{"question", "options", "correctOption"}, ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub questions: Vec<QuestionRecord>,
}

impl QuestionSet {
    pub fn new(questions: Vec<QuestionRecord>) -> Self {
        Self { questions }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load a question document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            QuizError::Io(format!("{}: {}", path.display(), e))
        })?;
        let set = Self::from_json(&text)?;
        log::debug!("loaded {} questions from {}", set.len(), path.display());
        Ok(set)
    }

    /// Validate every record up front, reporting the position of the first bad one
    pub fn validate(&self, option_slots: usize) -> std::result::Result<(), (usize, QuizError)> {
        self.questions
            .iter()
            .enumerate()
            .try_for_each(|(i, q)| q.validate(option_slots).map_err(|e| (i, e)))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[QuestionRecord] {
        &self.questions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QuestionRecord> {
        self.questions.iter()
    }
}

impl From<Vec<QuestionRecord>> for QuestionSet {
    fn from(questions: Vec<QuestionRecord>) -> Self {
        Self::new(questions)
    }
}

impl AsRef<[QuestionRecord]> for QuestionSet {
    fn as_ref(&self) -> &[QuestionRecord] {
        &self.questions
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a QuestionRecord;
    type IntoIter = std::slice::Iter<'a, QuestionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}
