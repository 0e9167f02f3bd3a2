//! Session configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::{QuestionSet, MIN_OPTIONS};
use crate::error::{QuizError, Result};

/// Default number of option slots in the presentation layout
pub const DEFAULT_OPTION_SLOTS: usize = 4;

/// Quiz session configuration
///
/// Accepts both camelCase and snake_case keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuizConfig {
    /// Number of questions per session, 0 = all
    #[serde(alias = "question_count")]
    pub question_count: usize,
    /// Allow repeated wrong attempts on the same question
    #[serde(alias = "multiple_attempts")]
    pub multiple_attempts: bool,
    /// Option buttons the presentation layer renders
    #[serde(alias = "option_slots")]
    pub option_slots: usize,
    #[serde(alias = "questions_path")]
    pub questions_path: Option<PathBuf>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_count: 0,
            multiple_attempts: false,
            option_slots: DEFAULT_OPTION_SLOTS,
            questions_path: None,
        }
    }
}

impl QuizConfig {
    pub fn new(option_slots: usize) -> Self {
        Self {
            option_slots,
            ..Default::default()
        }
    }

    pub fn with_question_count(mut self, count: usize) -> Self {
        self.question_count = count;
        self
    }

    pub fn with_multiple_attempts(mut self, allow: bool) -> Self {
        self.multiple_attempts = allow;
        self
    }

    pub fn with_questions_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.questions_path = Some(path.into());
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| QuizError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.option_slots < MIN_OPTIONS {
            return Err(QuizError::Configuration(format!(
                "option_slots must be at least {}, got {}",
                MIN_OPTIONS, self.option_slots
            )));
        }
        Ok(())
    }

    /// Load the question set named by `questions_path`
    pub fn questions(&self) -> Result<QuestionSet> {
        let path = self.questions_path.as_ref().ok_or_else(|| {
            QuizError::Configuration("questions_path is not set".to_string())
        })?;
        QuestionSet::load(path)
    }
}
