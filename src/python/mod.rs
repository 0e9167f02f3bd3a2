//! Python bindings
//!
//! A Python presentation layer caches its question set once with
//! `init_questions` (or `load_questions`) and then drives any number of
//! `QuizSession` objects against it.

mod session;

pub use session::PyQuizSession;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::sync::Arc;

use crate::config::{self, QuestionSet};

// ============================================================================
// Cached Questions
// ============================================================================

/// Global cached question set
static CACHED_QUESTIONS: OnceCell<Arc<RwLock<QuestionSet>>> = OnceCell::new();

fn store_questions(questions: QuestionSet) {
    replace_questions(&CACHED_QUESTIONS, questions);
}

/// Install `questions` in `cell`, replacing any earlier set
///
/// The slot is created at most once; concurrent callers all write through
/// the same lock and the last writer wins.
fn replace_questions(cell: &OnceCell<Arc<RwLock<QuestionSet>>>, questions: QuestionSet) {
    let slot = cell.get_or_init(|| Arc::new(RwLock::new(QuestionSet::default())));
    *slot.write() = questions;
}

pub(crate) fn cached_questions() -> PyResult<Arc<RwLock<QuestionSet>>> {
    CACHED_QUESTIONS.get().cloned().ok_or_else(|| {
        PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(
            "Questions not initialized. Call init_questions() first.",
        )
    })
}

// ============================================================================
// Python Functions
// ============================================================================

/// Cache the question set (call once at startup, again to replace it)
///
/// # Arguments
/// * `questions` - Dict shaped like `{"questions": [{"question", "options", "correctOption"}, ...]}`
///
/// # Returns
/// Number of cached questions
#[pyfunction]
fn init_questions(questions: &Bound<'_, PyDict>) -> PyResult<usize> {
    let set = config::deserialize_questions(questions)?;
    let len = set.len();
    store_questions(set);
    Ok(len)
}

/// Cache the question set from a JSON document on disk
#[pyfunction]
fn load_questions(path: &str) -> PyResult<usize> {
    let set = QuestionSet::load(path)?;
    let len = set.len();
    store_questions(set);
    Ok(len)
}

/// Check if questions are cached
#[pyfunction]
fn is_questions_initialized() -> bool {
    CACHED_QUESTIONS.get().is_some()
}

// ============================================================================
// Python Module Definition
// ============================================================================

/// Python module definition
#[pymodule]
fn quiz_session_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(init_questions, m)?)?;
    m.add_function(wrap_pyfunction!(load_questions, m)?)?;
    m.add_function(wrap_pyfunction!(is_questions_initialized, m)?)?;
    m.add_class::<PyQuizSession>()?;
    Ok(())
}
