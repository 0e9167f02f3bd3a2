//! Draw stack - remaining questions, consumed last-in-first-out

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::QuestionRecord;

/// Number of questions a session draws for a requested `count`
///
/// 0, or anything at or above the set size, means the whole set.
#[inline]
pub fn effective_count(count: usize, available: usize) -> usize {
    if count > 0 && count < available {
        count
    } else {
        available
    }
}

/// Remaining questions; the last element is the top of the stack
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawStack {
    items: Vec<QuestionRecord>,
}

impl DrawStack {
    /// Shuffle a working copy of `questions` (Fisher-Yates) and stack the first
    /// `count` of them in order, so the last one taken is drawn first
    pub fn shuffled<R: Rng + ?Sized>(questions: &[QuestionRecord], count: usize, rng: &mut R) -> Self {
        let mut items = questions.to_vec();
        items.shuffle(rng);
        items.truncate(effective_count(count, questions.len()));
        Self { items }
    }

    /// Stage a reshuffle of the remaining questions plus `returned`, without
    /// touching the stack itself
    pub fn staged_reshuffle<R: Rng + ?Sized>(
        &self,
        returned: Option<&QuestionRecord>,
        rng: &mut R,
    ) -> Vec<QuestionRecord> {
        let mut staged = Vec::with_capacity(self.items.len() + 1);
        staged.extend_from_slice(&self.items);
        staged.extend(returned.cloned());
        staged.shuffle(rng);
        staged
    }

    /// Replace the stack contents with a previously staged order
    #[inline]
    pub fn commit(&mut self, staged: Vec<QuestionRecord>) {
        self.items = staged;
    }

    #[inline]
    pub fn peek(&self) -> Option<&QuestionRecord> {
        self.items.last()
    }

    #[inline]
    pub fn pop(&mut self) -> Option<QuestionRecord> {
        self.items.pop()
    }

    #[inline]
    pub fn push(&mut self, question: QuestionRecord) {
        self.items.push(question);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Questions from bottom to top
    #[inline]
    pub fn as_slice(&self) -> &[QuestionRecord] {
        &self.items
    }
}
