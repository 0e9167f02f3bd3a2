//! Observer registry for choice results and drawn questions

use std::fmt;

use super::{QuestionView, QuizResult};

/// Listener for session notifications
///
/// Any `FnMut(bool, QuizResult) + Send` closure is an observer that only
/// cares about results.
pub trait QuizObserver: Send {
    /// Fired once per scored choice
    fn on_result(&mut self, is_correct: bool, result: QuizResult);

    /// Fired whenever a new question becomes current
    fn on_question(&mut self, _question: &QuestionView<'_>) {}
}

impl<F> QuizObserver for F
where
    F: FnMut(bool, QuizResult) + Send,
{
    fn on_result(&mut self, is_correct: bool, result: QuizResult) {
        self(is_correct, result)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for SubscriptionId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Observers in subscription order
#[derive(Default)]
pub struct ObserverRegistry {
    next_id: u64,
    observers: Vec<(SubscriptionId, Box<dyn QuizObserver>)>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<O>(&mut self, observer: O) -> SubscriptionId
    where
        O: QuizObserver + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    pub fn notify_result(&mut self, is_correct: bool, result: QuizResult) {
        for (_, observer) in &mut self.observers {
            observer.on_result(is_correct, result);
        }
    }

    pub fn notify_question(&mut self, question: &QuestionView<'_>) {
        for (_, observer) in &mut self.observers {
            observer.on_question(question);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("next_id", &self.next_id)
            .field("observers", &self.observers.len())
            .finish()
    }
}
