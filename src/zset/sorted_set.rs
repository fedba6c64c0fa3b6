use std::collections::HashMap;

use crate::zset::{
    skiplist::{Element, Iter, SkipList},
    ScoreRange, ZSetError,
};

/// What [`SortedSet::add`] did with the member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Inserted,
    Updated,
    /// The member already had this score.
    Unchanged,
}

/// A set of unique members ordered by score.
///
/// The skip list answers ordered queries while the table answers
/// `member → score` lookups in constant time. A member is in the table if
/// and only if it is in the list, with the same score.
#[derive(Debug, Default)]
pub struct SortedSet {
    dict: HashMap<String, f64>,
    list: SkipList,
}

impl SortedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set whose skip list level draws are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            dict: HashMap::new(),
            list: SkipList::with_seed(seed),
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Elements in ascending order.
    pub fn iter(&self) -> Iter<'_, rand::rngs::StdRng> {
        self.list.iter()
    }

    /// Inserts `member` or moves it to `score`.
    ///
    /// The skip list is ordered by score, so an update inserts the new node
    /// before deleting the old one rather than editing a score in place.
    /// Scores are compared bit for bit: moving between `0.0` and `-0.0` is an
    /// update that keeps the node where it is.
    pub fn add(&mut self, member: &str, score: f64) -> Result<AddOutcome, ZSetError> {
        if score.is_nan() {
            return Err(ZSetError::NotANumber);
        }

        match self.dict.get(member).copied() {
            Some(current) if current.to_bits() == score.to_bits() => Ok(AddOutcome::Unchanged),
            Some(current) if current == score => {
                self.list.replace_score(current, member, score);
                self.dict.insert(member.to_string(), score);
                Ok(AddOutcome::Updated)
            }
            Some(current) => {
                self.list.insert(member.to_string(), score)?;
                self.list.delete(current, member);
                self.dict.insert(member.to_string(), score);
                Ok(AddOutcome::Updated)
            }
            None => {
                self.dict.try_reserve(1)?;
                self.list.insert(member.to_string(), score)?;
                self.dict.insert(member.to_string(), score);
                Ok(AddOutcome::Inserted)
            }
        }
    }

    /// Removes `member`, returning whether it existed.
    pub fn remove(&mut self, member: &str) -> bool {
        let Some(score) = self.dict.remove(member) else {
            return false;
        };

        self.list.delete(score, member);
        true
    }

    pub fn score(&self, member: &str) -> Option<f64> {
        self.dict.get(member).copied()
    }

    /// 1-based rank of `member`; `reverse` counts from the highest score.
    pub fn rank(&self, member: &str, reverse: bool) -> Option<usize> {
        let score = self.score(member)?;
        let rank = self.list.rank_of(score, member)?;

        if reverse {
            Some(self.list.len() - rank + 1)
        } else {
            Some(rank)
        }
    }

    /// Elements ranked in `[start, stop)`, 1-based. With `reverse`, ranks
    /// count from the highest score and elements come out descending.
    pub fn range_by_rank(&self, start: usize, stop: usize, reverse: bool) -> Vec<Element> {
        let length = self.list.len();
        if start == 0 || start > length || start >= stop {
            return Vec::new();
        }

        let count = stop.min(length + 1) - start;
        let first_rank = if reverse { length - start + 1 } else { start };

        self.list
            .iter_from(self.list.get_by_rank(first_rank), reverse)
            .take(count)
            .cloned()
            .collect()
    }

    /// Elements whose score lies in `range`, skipping `offset` of them and
    /// returning at most `limit` (all remaining when `None`). With `reverse`
    /// the walk starts at the highest score.
    pub fn range_by_score(
        &self,
        range: &ScoreRange,
        offset: usize,
        limit: Option<usize>,
        reverse: bool,
    ) -> Vec<Element> {
        let start = if reverse {
            self.list.last_in_score_range(range)
        } else {
            self.list.first_in_score_range(range)
        };

        self.list
            .iter_from(start, reverse)
            .take_while(|element| range.contains(element.score))
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    /// Removes the elements ranked in `[start, stop)`, 1-based.
    pub fn remove_range_by_rank(&mut self, start: usize, stop: usize) -> Vec<Element> {
        let removed = self.list.remove_range_by_rank(start, stop);
        for element in &removed {
            self.dict.remove(&element.member);
        }
        removed
    }

    /// Removes every element whose score lies in `range`.
    pub fn remove_range_by_score(&mut self, range: &ScoreRange) -> Vec<Element> {
        let removed = self.list.remove_range_by_score(range);
        for element in &removed {
            self.dict.remove(&element.member);
        }
        removed
    }

    pub fn count(&self, range: &ScoreRange) -> usize {
        self.list
            .iter_from(self.list.first_in_score_range(range), false)
            .take_while(|element| !range.max.above(element.score))
            .count()
    }
}
