//! Quiz Session Core - quiz state machine
//!
//! Shuffles a question set into a draw stack, hands questions out one at a
//! time, scores choices and reports progress through [`QuizResult`]
//! snapshots. Presentation (rendering, timing, localization) stays with the
//! caller. Python bindings are available behind the `python` feature.
//!
//! ```
//! use quiz_session_core::{QuestionRecord, QuizConfig, QuizSession};
//!
//! let questions = vec![
//!     QuestionRecord::new("2 + 2?", ["3", "4"], 2),
//!     QuestionRecord::new("Capital of Italy?", ["Rome", "Milan"], 1),
//! ];
//!
//! let mut session = QuizSession::new(QuizConfig::new(2));
//! session.initialize(&questions, 0).unwrap();
//!
//! while let Some(question) = session.draw_next().unwrap() {
//!     let answer = question.correct_index as usize;
//!     let result = session.choose(answer).unwrap();
//!     if result.complete {
//!         assert_eq!(result.right_answers, 2);
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod session;

#[cfg(feature = "python")]
pub mod python;

pub use config::{QuestionRecord, QuestionSet, QuizConfig};
pub use error::{QuizError, Result};
pub use event::{QuestionView, QuizObserver, QuizResult, SubscriptionId};
pub use session::QuizSession;
