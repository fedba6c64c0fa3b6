//! The sorted set data type: a skip list ordered by `(score, member)` paired
//! with a `member → score` table.
//!
//! Nothing in this module locks. Callers serialize writers and keep readers
//! away from a set while it is being mutated; the keyspace shards do this.

mod border;
mod error;
pub mod skiplist;
mod sorted_set;

pub use border::{ScoreBorder, ScoreRange};
pub use error::ZSetError;
pub use skiplist::{Element, SkipList, MAX_LEVEL};
pub use sorted_set::{AddOutcome, SortedSet};
