//! QuizSession - the quiz state machine
//!
//! Owns the draw stack, the current question, the running tally and the
//! observer registry. Every operation is synchronous. Failures never touch
//! the tally; a question that fails validation is dropped from the stack.
//! Timing between questions belongs to the caller.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::stack::DrawStack;
use crate::config::{QuestionRecord, QuizConfig};
use crate::error::{QuizError, Result};
use crate::event::{ObserverRegistry, QuestionView, QuizObserver, QuizResult, SubscriptionId};

/// One run of a quiz, from `initialize` until the draw stack is exhausted
#[derive(Debug)]
pub struct QuizSession<R = StdRng> {
    config: QuizConfig,
    /// `None` until `initialize` succeeds
    stack: Option<DrawStack>,
    current: Option<QuestionRecord>,
    right_answers: u32,
    wrong_answers: u32,
    complete: bool,
    /// Selection lockout for the current question
    locked: bool,
    observers: ObserverRegistry,
    rng: R,
}

impl QuizSession<StdRng> {
    /// Create an empty session seeded from OS entropy
    pub fn new(config: QuizConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl Default for QuizSession<StdRng> {
    fn default() -> Self {
        Self::new(QuizConfig::default())
    }
}

impl<R: Rng> QuizSession<R> {
    /// Create an empty session drawing randomness from `rng`
    pub fn with_rng(config: QuizConfig, rng: R) -> Self {
        Self {
            config,
            stack: None,
            current: None,
            right_answers: 0,
            wrong_answers: 0,
            complete: false,
            locked: false,
            observers: ObserverRegistry::new(),
            rng,
        }
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Shuffle `questions` and stack `count` of them (0 = all)
    ///
    /// Resets the tally, completion flag, current question and lockout. Does
    /// not draw.
    ///
    /// # Errors
    /// `QuizError::Configuration` if `questions` is empty.
    pub fn initialize<Q>(&mut self, questions: &Q, count: usize) -> Result<()>
    where
        Q: AsRef<[QuestionRecord]> + ?Sized,
    {
        let questions = questions.as_ref();
        if questions.is_empty() {
            log::error!("cannot initialize a quiz session with an empty question set");
            return Err(QuizError::Configuration(
                "Question set is empty".to_string(),
            ));
        }

        let stack = DrawStack::shuffled(questions, count, &mut self.rng);
        log::debug!(
            "quiz session initialized with {} of {} questions",
            stack.len(),
            questions.len()
        );

        self.stack = Some(stack);
        self.current = None;
        self.right_answers = 0;
        self.wrong_answers = 0;
        self.complete = false;
        self.locked = false;
        Ok(())
    }

    /// `initialize` with the configured question count
    pub fn initialize_from_config<Q>(&mut self, questions: &Q) -> Result<()>
    where
        Q: AsRef<[QuestionRecord]> + ?Sized,
    {
        let count = self.config.question_count;
        self.initialize(questions, count)
    }

    /// Initialize and immediately draw the first question
    pub fn setup<Q>(&mut self, questions: &Q, count: usize) -> Result<Option<&QuestionRecord>>
    where
        Q: AsRef<[QuestionRecord]> + ?Sized,
    {
        self.initialize(questions, count)?;
        self.draw_next()
    }

    // ------------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------------

    /// Pop the next question off the draw stack
    ///
    /// Returns `Ok(None)` once the stack is exhausted. A question that fails
    /// validation is discarded and the current question is cleared, so the
    /// stack still runs out and nothing stale can be scored. The tally is
    /// never touched.
    ///
    /// # Errors
    /// - `QuizError::Configuration` before `initialize`
    /// - `QuizError::TooFewOptions` if the question has fewer than two options
    /// - `QuizError::StructuralMismatch` if the option count differs from the option slots
    /// - `QuizError::OutOfRange` if the correct index is outside `1..=options`
    pub fn draw_next(&mut self) -> Result<Option<&QuestionRecord>> {
        let stack = self.stack.as_mut().ok_or_else(not_initialized)?;

        let Some(next) = stack.pop() else {
            log::warn!("question stack is empty");
            return Ok(None);
        };
        if let Err(err) = next.validate(self.config.option_slots) {
            log::error!("discarded question {:?}: {}", next.text, err);
            self.current = None;
            self.locked = false;
            return Err(err);
        }

        self.current = Some(next);
        self.locked = false;
        announce(&mut self.observers, self.current.as_ref());
        log::debug!("drew question, {} remaining", stack.len());

        Ok(self.current.as_ref())
    }

    /// Re-roll the current question without scoring it
    ///
    /// The current question goes back onto the stack, the remaining set is
    /// reshuffled and a question is drawn from it, so the previous question
    /// may come up again. Tally and completion are never touched. Returns
    /// `Ok(None)` with nothing changed if no other question remains.
    ///
    /// # Errors
    /// Same as `draw_next`: the drawn question is discarded, the rest of the
    /// reshuffled set (previous question included) stays on the stack and
    /// the current question is cleared.
    pub fn refresh(&mut self) -> Result<Option<&QuestionRecord>> {
        let stack = self.stack.as_mut().ok_or_else(not_initialized)?;

        if stack.is_empty() {
            log::warn!("question stack is empty, nothing to refresh into");
            return Ok(None);
        }

        let mut staged = stack.staged_reshuffle(self.current.as_ref(), &mut self.rng);
        let next = staged.pop();
        stack.commit(staged);
        self.locked = false;

        if let Some(question) = &next {
            if let Err(err) = question.validate(self.config.option_slots) {
                log::error!("discarded question {:?} on refresh: {}", question.text, err);
                self.current = None;
                return Err(err);
            }
        }

        self.current = next;
        announce(&mut self.observers, self.current.as_ref());
        log::debug!("refreshed question, {} remaining", stack.len());

        Ok(self.current.as_ref())
    }

    // ------------------------------------------------------------------------
    // Scoring
    // ------------------------------------------------------------------------

    /// Score a choice on the current question and notify observers
    ///
    /// Completion is decided by whether any question remains after this one.
    /// Without multiple attempts every choice locks the question until the
    /// next draw; with multiple attempts only a correct choice does.
    ///
    /// # Errors
    /// - `QuizError::Configuration` before `initialize` or before the first draw
    /// - `QuizError::SelectionLocked` if the question no longer accepts choices
    pub fn record_choice(&mut self, is_correct: bool) -> Result<QuizResult> {
        let remaining = self.stack.as_ref().ok_or_else(not_initialized)?.len();
        if self.current.is_none() {
            log::error!("choice recorded before any question was drawn");
            return Err(QuizError::Configuration(
                "No current question".to_string(),
            ));
        }
        if self.locked {
            log::warn!("choice ignored, selection is locked");
            return Err(QuizError::SelectionLocked);
        }

        if is_correct {
            self.right_answers = self.right_answers.saturating_add(1);
        } else {
            self.wrong_answers = self.wrong_answers.saturating_add(1);
        }
        self.complete = remaining == 0;
        self.locked = is_correct || !self.config.multiple_attempts;

        let result = self.result();
        log::debug!(
            "{} answer ({} right, {} wrong, complete: {})",
            if is_correct { "right" } else { "wrong" },
            result.right_answers,
            result.wrong_answers,
            result.complete
        );
        self.observers.notify_result(is_correct, result);

        Ok(result)
    }

    /// Score the 1-based option `option_index` of the current question
    ///
    /// # Errors
    /// `QuizError::OutOfRange` if the index is not one of the current options,
    /// plus everything `record_choice` returns.
    pub fn choose(&mut self, option_index: usize) -> Result<QuizResult> {
        if self.stack.is_none() {
            return Err(not_initialized());
        }
        let is_correct = match &self.current {
            Some(question) => {
                let max = question.options.len();
                if !(1..=max).contains(&option_index) {
                    return Err(QuizError::OutOfRange {
                        index: i64::try_from(option_index).unwrap_or(i64::MAX),
                        max,
                    });
                }
                question.is_correct(option_index)
            }
            None => {
                return Err(QuizError::Configuration(
                    "No current question".to_string(),
                ))
            }
        };

        self.record_choice(is_correct)
    }

    // ------------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------------

    pub fn subscribe<O>(&mut self, observer: O) -> SubscriptionId
    where
        O: QuizObserver + 'static,
    {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Snapshot of the tally without scoring anything
    #[inline]
    pub fn result(&self) -> QuizResult {
        QuizResult::new(self.right_answers, self.wrong_answers, self.complete)
    }

    #[inline]
    pub fn current(&self) -> Option<&QuestionRecord> {
        self.current.as_ref()
    }

    /// Questions left on the draw stack
    #[inline]
    pub fn remaining(&self) -> usize {
        self.stack.as_ref().map_or(0, DrawStack::len)
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.stack.is_some()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Whether the current question still accepts choices
    #[inline]
    pub fn accepts_choice(&self) -> bool {
        self.current.is_some() && !self.locked
    }

    #[inline]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn set_multiple_attempts(&mut self, allow: bool) {
        self.config.multiple_attempts = allow;
    }
}

fn not_initialized() -> QuizError {
    log::error!("questions are not set");
    QuizError::not_initialized()
}

fn announce(observers: &mut ObserverRegistry, current: Option<&QuestionRecord>) {
    if let Some(question) = current {
        observers.notify_question(&QuestionView::from(question));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    fn question(text: &str, correct: i32) -> QuestionRecord {
        QuestionRecord::new(text, ["a", "b", "c", "d"], correct)
    }

    fn three_questions() -> Vec<QuestionRecord> {
        vec![question("R1", 1), question("R2", 2), question("R3", 3)]
    }

    fn seeded(config: QuizConfig) -> QuizSession {
        QuizSession::with_rng(config, StdRng::seed_from_u64(0x5eed))
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut session = seeded(QuizConfig::default());
        session.initialize(&three_questions(), 3).unwrap();

        let mut drawn = HashSet::new();

        drawn.insert(session.draw_next().unwrap().unwrap().text.clone());
        assert_eq!(session.record_choice(true).unwrap(), QuizResult::new(1, 0, false));

        drawn.insert(session.draw_next().unwrap().unwrap().text.clone());
        assert_eq!(session.record_choice(false).unwrap(), QuizResult::new(1, 1, false));

        drawn.insert(session.draw_next().unwrap().unwrap().text.clone());
        assert_eq!(session.record_choice(true).unwrap(), QuizResult::new(2, 1, true));

        assert!(session.draw_next().unwrap().is_none());
        assert_eq!(drawn.len(), 3);
    }

    #[test]
    fn test_operations_before_initialize() {
        let mut session = seeded(QuizConfig::default());
        assert!(matches!(session.draw_next(), Err(QuizError::Configuration(_))));
        assert!(matches!(session.refresh(), Err(QuizError::Configuration(_))));
        assert!(matches!(
            session.record_choice(true),
            Err(QuizError::Configuration(_))
        ));
        assert!(matches!(session.choose(1), Err(QuizError::Configuration(_))));
        assert!(!session.is_initialized());
    }

    #[test]
    fn test_initialize_empty_set_keeps_previous_state() {
        let mut session = seeded(QuizConfig::default());
        session.initialize(&three_questions(), 0).unwrap();
        session.draw_next().unwrap();

        let empty: Vec<QuestionRecord> = Vec::new();
        assert!(matches!(
            session.initialize(&empty, 0),
            Err(QuizError::Configuration(_))
        ));
        assert_eq!(session.remaining(), 2);
        assert!(session.current().is_some());
    }

    #[test]
    fn test_initialize_does_not_draw() {
        let mut session = seeded(QuizConfig::default());
        session.initialize(&three_questions(), 2).unwrap();
        assert!(session.current().is_none());
        assert_eq!(session.remaining(), 2);
        assert!(matches!(
            session.record_choice(true),
            Err(QuizError::Configuration(_))
        ));
    }

    #[test]
    fn test_initialize_resets_tally() {
        let mut session = seeded(QuizConfig::default());
        session.setup(&three_questions(), 1).unwrap();
        let result = session.record_choice(true).unwrap();
        assert!(result.complete);

        session.initialize(&three_questions(), 0).unwrap();
        assert_eq!(session.result(), QuizResult::default());
        assert!(session.current().is_none());
        assert_eq!(session.remaining(), 3);
    }

    #[test]
    fn test_count_zero_and_oversized_use_all() {
        let mut session = seeded(QuizConfig::default());
        session.initialize(&three_questions(), 0).unwrap();
        assert_eq!(session.remaining(), 3);
        session.initialize(&three_questions(), 10).unwrap();
        assert_eq!(session.remaining(), 3);
    }

    #[test]
    fn test_setup_draws_first_question() {
        let mut session = seeded(QuizConfig::default());
        let first = session.setup(&three_questions(), 0).unwrap().cloned();
        assert!(first.is_some());
        assert_eq!(session.current(), first.as_ref());
        assert_eq!(session.remaining(), 2);
    }

    #[test]
    fn test_initialize_from_config_uses_question_count() {
        let mut session = seeded(QuizConfig::default().with_question_count(2));
        session.initialize_from_config(&three_questions()).unwrap();
        assert_eq!(session.remaining(), 2);
    }

    #[test]
    fn test_slot_mismatch_discards_question() {
        let mut session = seeded(QuizConfig::new(3));
        session.initialize(&three_questions(), 0).unwrap();

        let err = session.draw_next().unwrap_err();
        assert_eq!(
            err,
            QuizError::StructuralMismatch {
                expected: 3,
                actual: 4
            }
        );
        assert!(session.current().is_none());
        assert_eq!(session.remaining(), 2);
        assert_eq!(session.result(), QuizResult::default());
    }

    #[test]
    fn test_out_of_range_correct_index_rejected() {
        for bad in [0, 5, -1] {
            let mut session = seeded(QuizConfig::default());
            session.initialize(&[question("bad", bad)], 0).unwrap();

            assert_eq!(
                session.draw_next().unwrap_err(),
                QuizError::OutOfRange {
                    index: i64::from(bad),
                    max: 4
                }
            );
            assert!(session.current().is_none());
            assert_eq!(session.remaining(), 0);
            assert_eq!(session.result(), QuizResult::default());
            assert!(session.draw_next().unwrap().is_none());
        }
    }

    #[test]
    fn test_rejected_draw_clears_previous_question() {
        let mut session = seeded(QuizConfig::default().with_multiple_attempts(true));
        // Stack order is not shuffled for a single record, so stack the bad one first
        session.initialize(&[question("bad", 0)], 0).unwrap();
        session.stack.as_mut().unwrap().push(question("good", 1));

        assert_eq!(session.draw_next().unwrap().unwrap().text, "good");
        session.record_choice(false).unwrap();
        assert!(session.accepts_choice());

        assert!(matches!(
            session.draw_next(),
            Err(QuizError::OutOfRange { index: 0, max: 4 })
        ));
        assert!(session.current().is_none());
        assert!(!session.accepts_choice());
        assert!(matches!(
            session.record_choice(true),
            Err(QuizError::Configuration(_))
        ));
        assert!(matches!(session.choose(1), Err(QuizError::Configuration(_))));
        assert_eq!(session.result(), QuizResult::new(0, 1, false));
        assert!(session.draw_next().unwrap().is_none());
    }

    #[test]
    fn test_refresh_slot_mismatch_keeps_rest_of_pool() {
        let narrow = |text: &str| QuestionRecord::new(text, ["a", "b"], 1);
        let mut session = seeded(QuizConfig::default());
        session.initialize(&[narrow("stacked")], 0).unwrap();
        session.current = Some(narrow("shown"));

        assert_eq!(
            session.refresh().unwrap_err(),
            QuizError::StructuralMismatch {
                expected: 4,
                actual: 2
            }
        );
        assert!(session.current().is_none());
        assert_eq!(session.result(), QuizResult::default());

        // One of the two was drawn and dropped, the other is back in the pool
        assert_eq!(session.remaining(), 1);
        let left = &session.stack.as_ref().unwrap().as_slice()[0].text;
        assert!(left == "stacked" || left == "shown");
    }

    #[test]
    fn test_single_option_layout_rejected() {
        let mut session = seeded(QuizConfig::new(1));
        session
            .initialize(&[QuestionRecord::new("only", ["only"], 1)], 0)
            .unwrap();

        assert_eq!(
            session.draw_next().unwrap_err(),
            QuizError::TooFewOptions(1)
        );
        assert!(session.current().is_none());
    }

    #[test]
    fn test_single_attempt_locks_after_any_choice() {
        let mut session = seeded(QuizConfig::default());
        session.setup(&three_questions(), 0).unwrap();

        session.record_choice(false).unwrap();
        assert!(!session.accepts_choice());
        assert_eq!(session.record_choice(true), Err(QuizError::SelectionLocked));
        assert_eq!(session.result(), QuizResult::new(0, 1, false));

        session.draw_next().unwrap();
        assert!(session.accepts_choice());
        session.record_choice(true).unwrap();
    }

    #[test]
    fn test_multiple_attempts_until_correct() {
        let mut session = seeded(QuizConfig::default().with_multiple_attempts(true));
        session.setup(&three_questions(), 0).unwrap();

        session.record_choice(false).unwrap();
        session.record_choice(false).unwrap();
        assert!(session.accepts_choice());
        let result = session.record_choice(true).unwrap();
        assert_eq!(result, QuizResult::new(1, 2, false));
        assert_eq!(session.record_choice(false), Err(QuizError::SelectionLocked));
    }

    #[test]
    fn test_choose_resolves_correct_option() {
        let mut session = seeded(QuizConfig::default());
        let correct = session.setup(&three_questions(), 0).unwrap().unwrap().correct_index;

        let result = session.choose(correct as usize).unwrap();
        assert_eq!(result.right_answers, 1);

        session.draw_next().unwrap();
        let correct = session.current().unwrap().correct_index as usize;
        let wrong = if correct == 1 { 2 } else { 1 };
        let result = session.choose(wrong).unwrap();
        assert_eq!(result.wrong_answers, 1);
    }

    #[test]
    fn test_choose_out_of_range_is_not_scored() {
        let mut session = seeded(QuizConfig::default());
        session.setup(&three_questions(), 0).unwrap();

        assert_eq!(
            session.choose(0),
            Err(QuizError::OutOfRange { index: 0, max: 4 })
        );
        assert_eq!(
            session.choose(5),
            Err(QuizError::OutOfRange { index: 5, max: 4 })
        );
        assert_eq!(session.result(), QuizResult::default());
        assert!(session.accepts_choice());
    }

    #[test]
    fn test_refresh_keeps_score_and_question_count() {
        let mut session = seeded(QuizConfig::default());
        session.setup(&three_questions(), 0).unwrap();
        session.record_choice(true).unwrap();
        let before = session.result();

        for _ in 0..10 {
            assert!(session.refresh().unwrap().is_some());
            assert_eq!(session.result(), before);
            assert_eq!(session.remaining(), 2);
            assert!(session.accepts_choice());
        }
    }

    #[test]
    fn test_refresh_on_empty_stack() {
        let mut session = seeded(QuizConfig::default());
        session.setup(&[question("only", 1)], 0).unwrap();

        assert!(session.refresh().unwrap().is_none());
        assert_eq!(session.current().map(|q| q.text.as_str()), Some("only"));
    }

    #[test]
    fn test_refresh_before_first_draw() {
        let mut session = seeded(QuizConfig::default());
        session.initialize(&three_questions(), 0).unwrap();

        assert!(session.refresh().unwrap().is_some());
        assert_eq!(session.remaining(), 2);
    }

    #[test]
    fn test_observers_receive_results_and_questions() {
        let results = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&results);

        let mut session = seeded(QuizConfig::default());
        let id = session.subscribe(move |correct: bool, result: QuizResult| {
            sink.lock().unwrap().push((correct, result));
        });

        session.setup(&three_questions(), 2).unwrap();
        session.record_choice(false).unwrap();
        session.draw_next().unwrap();
        session.record_choice(true).unwrap();

        assert_eq!(
            results.lock().unwrap().as_slice(),
            [
                (false, QuizResult::new(0, 1, false)),
                (true, QuizResult::new(1, 1, true))
            ]
        );

        assert!(session.unsubscribe(id));
        session.initialize(&three_questions(), 0).unwrap();
        session.draw_next().unwrap();
        session.record_choice(true).unwrap();
        assert_eq!(results.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_failed_choice_does_not_notify() {
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);

        let mut session = seeded(QuizConfig::default());
        session.subscribe(move |_: bool, _: QuizResult| *sink.lock().unwrap() += 1);
        session.setup(&three_questions(), 0).unwrap();
        session.record_choice(true).unwrap();
        let _ = session.record_choice(true);
        let _ = session.choose(9);

        assert_eq!(*count.lock().unwrap(), 1);
    }
}
