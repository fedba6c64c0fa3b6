//! Skip list ordering sorted set elements by `(score, member)`.
//!
//! Nodes live in an arena and refer to each other through [`NodeId`]
//! handles. Slot 0 is the header sentinel, which carries [`MAX_LEVEL`]
//! levels and no element. Every forward link records its span, the number of
//! level-0 hops it covers, so ranks can be accumulated while searching. A
//! link with no forward node spans the nodes remaining to the end of the
//! list, which is always 0 on level 0.

use std::cmp::Ordering;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::zset::{ScoreRange, ZSetError};

pub const MAX_LEVEL: usize = 16;

const PROMOTION_PROBABILITY: f64 = 0.25;
const HEADER: NodeId = 0;

/// Handle of a node inside a [`SkipList`] arena.
pub type NodeId = usize;

/// A member and its score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub member: String,
    pub score: f64,
}

impl Element {
    pub fn new(member: impl Into<String>, score: f64) -> Self {
        Self {
            member: member.into(),
            score,
        }
    }

    /// Orders this element against `(score, member)`: score first, member
    /// breaks ties.
    pub fn compare(&self, score: f64, member: &str) -> Ordering {
        self.score
            .partial_cmp(&score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.member.as_str().cmp(member))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Level {
    forward: Option<NodeId>,
    span: usize,
}

#[derive(Debug, Default)]
struct Node {
    element: Element,
    backward: Option<NodeId>,
    levels: Vec<Level>,
}

#[derive(Debug)]
pub struct SkipList<R = StdRng> {
    nodes: Vec<Node>,
    vacant: Vec<NodeId>,
    tail: Option<NodeId>,
    length: usize,
    level: usize,
    rng: R,
}

impl SkipList<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Builds a list whose level draws are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for SkipList<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> SkipList<R> {
    pub fn with_rng(rng: R) -> Self {
        let header = Node {
            element: Element::default(),
            backward: None,
            levels: vec![Level::default(); MAX_LEVEL],
        };

        Self {
            nodes: vec![header],
            vacant: Vec::new(),
            tail: None,
            length: 0,
            level: 1,
            rng,
        }
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn element(&self, id: NodeId) -> &Element {
        &self.nodes[id].element
    }

    /// The lowest ranked node.
    pub fn first(&self) -> Option<NodeId> {
        self.forward(HEADER, 0)
    }

    /// The highest ranked node.
    pub fn last(&self) -> Option<NodeId> {
        self.tail
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.forward(id, 0)
    }

    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].backward
    }

    pub fn iter(&self) -> Iter<'_, R> {
        self.iter_from(self.first(), false)
    }

    /// Walks from `start` towards higher ranks, or lower ranks when `reverse`.
    pub fn iter_from(&self, start: Option<NodeId>, reverse: bool) -> Iter<'_, R> {
        Iter {
            list: self,
            cursor: start,
            reverse,
        }
    }

    fn forward(&self, id: NodeId, level: usize) -> Option<NodeId> {
        self.nodes[id].levels[level].forward
    }

    fn span(&self, id: NodeId, level: usize) -> usize {
        self.nodes[id].levels[level].span
    }

    fn score(&self, id: NodeId) -> f64 {
        self.nodes[id].element.score
    }

    /// Finds, for every level in use, the last node ordered strictly before
    /// `(score, member)` together with its rank.
    fn find_predecessors(
        &self,
        score: f64,
        member: &str,
    ) -> ([NodeId; MAX_LEVEL], [usize; MAX_LEVEL]) {
        let mut update = [HEADER; MAX_LEVEL];
        let mut rank = [0usize; MAX_LEVEL];
        let mut x = HEADER;

        for i in (0..self.level).rev() {
            rank[i] = if i == self.level - 1 { 0 } else { rank[i + 1] };

            while let Some(next) = self.forward(x, i) {
                if self.nodes[next].element.compare(score, member) != Ordering::Less {
                    break;
                }

                rank[i] += self.span(x, i);
                x = next;
            }

            update[i] = x;
        }

        (update, rank)
    }

    /// Returns the node at the 1-based `rank`.
    pub fn get_by_rank(&self, rank: usize) -> Option<NodeId> {
        if rank == 0 || rank > self.length {
            return None;
        }

        let mut traversed = 0;
        let mut x = HEADER;

        for i in (0..self.level).rev() {
            while let Some(next) = self.forward(x, i) {
                let span = self.span(x, i);
                if traversed + span > rank {
                    break;
                }

                traversed += span;
                x = next;
            }

            if traversed == rank {
                return Some(x);
            }
        }

        None
    }

    /// Returns the 1-based rank of the element `(score, member)`.
    pub fn rank_of(&self, score: f64, member: &str) -> Option<usize> {
        let mut rank = 0;
        let mut x = HEADER;

        for i in (0..self.level).rev() {
            while let Some(next) = self.forward(x, i) {
                if self.nodes[next].element.compare(score, member) == Ordering::Greater {
                    break;
                }

                rank += self.span(x, i);
                x = next;
            }

            if x != HEADER && self.nodes[x].element.compare(score, member) == Ordering::Equal {
                return Some(rank);
            }
        }

        None
    }

    fn has_in_range(&self, range: &ScoreRange) -> bool {
        if range.is_empty() {
            return false;
        }

        let Some(tail) = self.tail else {
            return false;
        };
        if range.min.below(self.score(tail)) {
            return false;
        }

        let Some(first) = self.first() else {
            return false;
        };
        if range.max.above(self.score(first)) {
            return false;
        }

        true
    }

    /// Returns the lowest ranked node whose score lies in `range`.
    pub fn first_in_score_range(&self, range: &ScoreRange) -> Option<NodeId> {
        if !self.has_in_range(range) {
            return None;
        }

        let mut x = HEADER;
        for i in (0..self.level).rev() {
            // On upper levels the forward node may already be in range without
            // being the first one, so only skip nodes that are still below min.
            while let Some(next) = self.forward(x, i) {
                if !range.min.below(self.score(next)) {
                    break;
                }
                x = next;
            }
        }

        let candidate = self.forward(x, 0)?;
        if range.max.above(self.score(candidate)) {
            return None;
        }

        Some(candidate)
    }

    /// Returns the highest ranked node whose score lies in `range`.
    pub fn last_in_score_range(&self, range: &ScoreRange) -> Option<NodeId> {
        if !self.has_in_range(range) {
            return None;
        }

        let mut x = HEADER;
        for i in (0..self.level).rev() {
            while let Some(next) = self.forward(x, i) {
                if range.max.above(self.score(next)) {
                    break;
                }
                x = next;
            }
        }

        if x == HEADER || range.min.below(self.score(x)) {
            return None;
        }

        Some(x)
    }

    /// Deletes the node holding exactly `(score, member)`.
    pub fn delete(&mut self, score: f64, member: &str) -> Option<Element> {
        let (update, _) = self.find_predecessors(score, member);

        let candidate = self.forward(update[0], 0)?;
        if self.nodes[candidate].element.compare(score, member) != Ordering::Equal {
            return None;
        }

        Some(self.unlink(candidate, &update))
    }

    /// Gives the node holding `(score, member)` the score `new_score` without
    /// moving it. Only for scores that compare equal, such as `0.0` and `-0.0`.
    pub fn replace_score(&mut self, score: f64, member: &str, new_score: f64) -> bool {
        debug_assert!(score == new_score);

        let (update, _) = self.find_predecessors(score, member);

        let Some(candidate) = self.forward(update[0], 0) else {
            return false;
        };
        if self.nodes[candidate].element.compare(score, member) != Ordering::Equal {
            return false;
        }

        self.nodes[candidate].element.score = new_score;
        true
    }

    /// Removes the nodes ranked in `[start, stop)`, 1-based, and returns
    /// their elements in ascending order.
    pub fn remove_range_by_rank(&mut self, start: usize, stop: usize) -> Vec<Element> {
        let mut removed = Vec::new();
        if start == 0 || start >= stop {
            return removed;
        }

        let mut traversed = 0;
        let mut update = [HEADER; MAX_LEVEL];
        let mut x = HEADER;

        for i in (0..self.level).rev() {
            while let Some(next) = self.forward(x, i) {
                let span = self.span(x, i);
                if traversed + span >= start {
                    break;
                }

                traversed += span;
                x = next;
            }
            update[i] = x;
        }

        // Every removal in the batch shares the predecessors of the first
        // node: unlinking a node never moves the ones before it.
        traversed += 1;
        let mut cursor = self.forward(x, 0);
        while let Some(id) = cursor {
            if traversed >= stop {
                break;
            }

            cursor = self.forward(id, 0);
            removed.push(self.unlink(id, &update));
            traversed += 1;
        }

        removed
    }

    /// Removes every node whose score lies in `range` and returns their
    /// elements in ascending order.
    pub fn remove_range_by_score(&mut self, range: &ScoreRange) -> Vec<Element> {
        let mut removed = Vec::new();
        if range.is_empty() {
            return removed;
        }

        let mut update = [HEADER; MAX_LEVEL];
        let mut x = HEADER;

        for i in (0..self.level).rev() {
            while let Some(next) = self.forward(x, i) {
                if !range.min.below(self.score(next)) {
                    break;
                }
                x = next;
            }
            update[i] = x;
        }

        let mut cursor = self.forward(x, 0);
        while let Some(id) = cursor {
            if range.max.above(self.score(id)) {
                break;
            }

            cursor = self.forward(id, 0);
            removed.push(self.unlink(id, &update));
        }

        removed
    }

    /// Unlinks `id` given its predecessor on every level in use.
    fn unlink(&mut self, id: NodeId, update: &[NodeId; MAX_LEVEL]) -> Element {
        for (i, &predecessor) in update.iter().enumerate().take(self.level) {
            if self.forward(predecessor, i) == Some(id) {
                let target = self.nodes[id].levels[i];
                let level = &mut self.nodes[predecessor].levels[i];
                level.span = level.span + target.span - 1;
                level.forward = target.forward;
            } else {
                self.nodes[predecessor].levels[i].span -= 1;
            }
        }

        let backward = self.nodes[id].backward;
        match self.forward(id, 0) {
            Some(next) => self.nodes[next].backward = backward,
            None => self.tail = backward,
        }

        while self.level > 1 && self.forward(HEADER, self.level - 1).is_none() {
            self.level -= 1;
        }

        self.length -= 1;
        self.release(id)
    }

    fn allocate(&mut self, element: Element, height: usize) -> Result<NodeId, ZSetError> {
        let mut levels = Vec::new();
        levels.try_reserve_exact(height)?;
        levels.resize(height, Level::default());

        let node = Node {
            element,
            backward: None,
            levels,
        };

        match self.vacant.pop() {
            Some(id) => {
                self.nodes[id] = node;
                Ok(id)
            }
            None => {
                self.nodes.try_reserve(1)?;
                self.nodes.push(node);
                Ok(self.nodes.len() - 1)
            }
        }
    }

    fn release(&mut self, id: NodeId) -> Element {
        let node = std::mem::take(&mut self.nodes[id]);
        self.vacant.push(id);
        node.element
    }
}

impl<R: Rng> SkipList<R> {
    /// Inserts `(score, member)` and returns the new node.
    ///
    /// The member must not already be present; `SortedSet` guarantees this.
    /// The node is allocated before any link changes, so an allocation
    /// failure leaves the list untouched.
    pub fn insert(&mut self, member: String, score: f64) -> Result<NodeId, ZSetError> {
        let (mut update, mut rank) = self.find_predecessors(score, &member);

        let height = self.random_level();
        let id = self.allocate(Element { member, score }, height)?;

        if height > self.level {
            for i in self.level..height {
                rank[i] = 0;
                update[i] = HEADER;
                self.nodes[HEADER].levels[i].span = self.length;
            }
            self.level = height;
        }

        for i in 0..height {
            let predecessor = self.nodes[update[i]].levels[i];
            let hops = rank[0] - rank[i];

            self.nodes[id].levels[i] = Level {
                forward: predecessor.forward,
                span: predecessor.span - hops,
            };
            self.nodes[update[i]].levels[i] = Level {
                forward: Some(id),
                span: hops + 1,
            };
        }

        // Levels the new node does not reach now hop over one more node.
        for i in height..self.level {
            self.nodes[update[i]].levels[i].span += 1;
        }

        self.nodes[id].backward = if update[0] == HEADER {
            None
        } else {
            Some(update[0])
        };

        match self.forward(id, 0) {
            Some(next) => self.nodes[next].backward = Some(id),
            None => self.tail = Some(id),
        }

        self.length += 1;
        Ok(id)
    }

    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < MAX_LEVEL && self.rng.gen_bool(PROMOTION_PROBABILITY) {
            level += 1;
        }
        level
    }
}

pub struct Iter<'a, R> {
    list: &'a SkipList<R>,
    cursor: Option<NodeId>,
    reverse: bool,
}

impl<'a, R> Iterator for Iter<'a, R> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        self.cursor = if self.reverse {
            self.list.prev(id)
        } else {
            self.list.next(id)
        };
        Some(self.list.element(id))
    }
}
