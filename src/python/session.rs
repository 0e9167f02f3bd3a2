//! QuizSession PyClass - a quiz session driven from Python
//!
//! Questions and results cross the boundary as plain dicts; result callbacks
//! are ordinary Python callables.

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use super::cached_questions;
use crate::config::{self, QuestionRecord, QuizConfig, DEFAULT_OPTION_SLOTS};
use crate::event::{QuizObserver, QuizResult, SubscriptionId};
use crate::session::QuizSession;

// ============================================================================
// Helper Functions
// ============================================================================

fn question_to_dict<'py>(py: Python<'py>, question: &QuestionRecord) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("question", &question.text)?;
    dict.set_item("options", PyList::new(py, question.options.as_slice())?)?;
    dict.set_item("correctOption", question.correct_index)?;
    Ok(dict)
}

fn result_to_dict<'py>(py: Python<'py>, result: QuizResult) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("rightAnswers", result.right_answers)?;
    dict.set_item("wrongAnswers", result.wrong_answers)?;
    dict.set_item("complete", result.complete)?;
    Ok(dict)
}

fn optional_question(py: Python<'_>, question: Option<&QuestionRecord>) -> PyResult<Py<PyAny>> {
    match question {
        Some(q) => Ok(question_to_dict(py, q)?.into_any().unbind()),
        None => Ok(py.None()),
    }
}

/// Python callable subscribed as an observer: `callback(is_correct, result_dict)`
struct PyResultCallback(Py<PyAny>);

impl QuizObserver for PyResultCallback {
    fn on_result(&mut self, is_correct: bool, result: QuizResult) {
        Python::attach(|py| {
            let outcome = result_to_dict(py, result)
                .and_then(|dict| self.0.call1(py, (is_correct, dict)).map(drop));
            if let Err(err) = outcome {
                log::error!("result callback raised: {}", err);
            }
        });
    }
}

// ============================================================================
// QuizSession PyClass
// ============================================================================

/// Quiz session over the cached question set (or an explicit one)
#[pyclass(name = "QuizSession", unsendable)]
pub struct PyQuizSession {
    inner: QuizSession,
}

#[pymethods]
impl PyQuizSession {
    #[new]
    #[pyo3(signature = (option_slots=DEFAULT_OPTION_SLOTS, multiple_attempts=false, question_count=0))]
    fn new(option_slots: usize, multiple_attempts: bool, question_count: usize) -> PyResult<Self> {
        let config = QuizConfig::new(option_slots)
            .with_multiple_attempts(multiple_attempts)
            .with_question_count(question_count);
        config.validate()?;
        Ok(Self {
            inner: QuizSession::new(config),
        })
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Shuffle the cached questions and stack `count` of them
    ///
    /// `count` defaults to the session's question_count; 0 means all.
    #[pyo3(signature = (count=None))]
    fn initialize(&mut self, count: Option<usize>) -> PyResult<()> {
        let questions = cached_questions()?;
        let guard = questions.read();
        let count = count.unwrap_or(self.inner.config().question_count);
        self.inner.initialize(&*guard, count)?;
        Ok(())
    }

    /// Same as `initialize` but with an explicit question dict
    #[pyo3(signature = (questions, count=None))]
    fn initialize_with(&mut self, questions: &Bound<'_, PyDict>, count: Option<usize>) -> PyResult<()> {
        let set = config::deserialize_questions(questions)?;
        let count = count.unwrap_or(self.inner.config().question_count);
        self.inner.initialize(&set, count)?;
        Ok(())
    }

    /// Draw the next question; None once the quiz is exhausted
    fn draw_next(&mut self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        let question = self.inner.draw_next()?;
        optional_question(py, question)
    }

    /// Re-roll the current question without scoring it
    fn refresh(&mut self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        let question = self.inner.refresh()?;
        optional_question(py, question)
    }

    // ------------------------------------------------------------------------
    // Scoring
    // ------------------------------------------------------------------------

    fn record_choice(&mut self, py: Python<'_>, is_correct: bool) -> PyResult<Py<PyAny>> {
        let result = self.inner.record_choice(is_correct)?;
        Ok(result_to_dict(py, result)?.into_any().unbind())
    }

    /// Score the 1-based option of the current question
    fn choose(&mut self, py: Python<'_>, option_index: usize) -> PyResult<Py<PyAny>> {
        let result = self.inner.choose(option_index)?;
        Ok(result_to_dict(py, result)?.into_any().unbind())
    }

    /// Register `callback(is_correct, result)`; returns an id for `unsubscribe`
    fn subscribe(&mut self, callback: Py<PyAny>) -> u64 {
        self.inner.subscribe(PyResultCallback(callback)).value()
    }

    fn unsubscribe(&mut self, id: u64) -> bool {
        self.inner.unsubscribe(SubscriptionId::from(id))
    }

    // ------------------------------------------------------------------------
    // Getter Properties
    // ------------------------------------------------------------------------

    #[getter]
    fn result(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        Ok(result_to_dict(py, self.inner.result())?.into_any().unbind())
    }

    #[getter]
    fn question_stack_count(&self) -> usize {
        self.inner.remaining()
    }

    #[getter]
    fn current_question(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        optional_question(py, self.inner.current())
    }

    #[getter]
    fn multiple_attempts(&self) -> bool {
        self.inner.config().multiple_attempts
    }

    #[setter]
    fn set_multiple_attempts(&mut self, allow: bool) {
        self.inner.set_multiple_attempts(allow);
    }
}
