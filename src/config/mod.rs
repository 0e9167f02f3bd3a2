//! Configuration module for quiz data structures
//!
//! Question records, the question document loader and the session
//! configuration. With the `python` feature, question sets can also be
//! extracted straight from Python dicts.

mod question;
mod quiz;

pub use question::*;
pub use quiz::*;

#[cfg(feature = "python")]
pub use self::py::deserialize_questions;

#[cfg(feature = "python")]
mod py {
    use super::{QuestionRecord, QuestionSet};
    use crate::error::QuizError;
    use pyo3::types::{PyAnyMethods, PyDict, PyDictMethods, PyList, PyListMethods};
    use pyo3::Bound;

    /// Helper to get attribute from either dict or object
    fn get_attr<'py>(
        obj: &Bound<'py, pyo3::PyAny>,
        name: &str,
    ) -> pyo3::PyResult<Bound<'py, pyo3::PyAny>> {
        if let Ok(dict) = obj.downcast::<PyDict>() {
            dict.get_item(name)?
                .ok_or_else(|| pyo3::exceptions::PyKeyError::new_err(name.to_string()))
        } else {
            obj.getattr(name)
        }
    }

    /// Deserialize questions from a Python dict
    /// Expected format: {"questions": [{"question", "options", "correctOption"}, ...]}
    pub fn deserialize_questions(config: &Bound<'_, PyDict>) -> pyo3::PyResult<QuestionSet> {
        let list = config
            .get_item("questions")?
            .ok_or_else(|| QuizError::Deserialization("questions not found".to_string()))?;

        let list: Bound<'_, PyList> = list.extract()?;
        let mut questions = Vec::with_capacity(list.len());
        for item in list.iter() {
            questions.push(extract_question(&item)?);
        }

        Ok(QuestionSet::new(questions))
    }

    fn extract_question(obj: &Bound<'_, pyo3::PyAny>) -> pyo3::PyResult<QuestionRecord> {
        let text: String = get_attr(obj, "question")?.extract()?;
        let options: Vec<String> = get_attr(obj, "options")?.extract()?;
        // Support both "correctOption" and "correct_option" field names
        let correct_index: i32 = get_attr(obj, "correctOption")
            .or_else(|_| get_attr(obj, "correct_option"))?
            .extract()?;

        Ok(QuestionRecord::new(text, options, correct_index))
    }
}
