//! The sharded keyspace.
//!
//! Keys are spread across a fixed number of shards by hash, each behind its
//! own `RwLock`. Commands touching one key lock only that key's shard: read
//! commands share it, write commands hold it exclusively for the whole
//! mutation, so a sorted set is never observed half-spliced.

use std::{
    collections::{hash_map::DefaultHasher, HashMap},
    hash::{Hash, Hasher},
};

use thiserror::Error;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::zset::SortedSet;

pub const DEFAULT_SHARD_COUNT: usize = 16;

#[derive(Error, Debug, PartialEq, Clone)]
pub enum StoreError {
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,
}

#[derive(Debug)]
pub enum DataType {
    String(String),
    SortedSet(SortedSet),
}

impl DataType {
    /// The name reported by the TYPE command.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::String(_) => "string",
            DataType::SortedSet(_) => "zset",
        }
    }
}

/// The keys that hash to one shard.
#[derive(Debug, Default)]
pub struct Shard {
    entries: HashMap<String, DataType>,
}

impl Shard {
    pub fn get(&self, key: &str) -> Option<&DataType> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, value: DataType) {
        self.entries.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) -> Option<DataType> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DataType)> {
        self.entries.iter()
    }

    /// The sorted set stored at `key`, if any.
    pub fn sorted_set(&self, key: &str) -> Result<Option<&SortedSet>, StoreError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(DataType::SortedSet(set)) => Ok(Some(set)),
            Some(_) => Err(StoreError::WrongType),
        }
    }

    pub fn sorted_set_mut(&mut self, key: &str) -> Result<Option<&mut SortedSet>, StoreError> {
        match self.entries.get_mut(key) {
            None => Ok(None),
            Some(DataType::SortedSet(set)) => Ok(Some(set)),
            Some(_) => Err(StoreError::WrongType),
        }
    }

    /// The sorted set stored at `key`, created empty on first write.
    pub fn sorted_set_or_create(&mut self, key: &str) -> Result<&mut SortedSet, StoreError> {
        let value = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| DataType::SortedSet(SortedSet::new()));

        match value {
            DataType::SortedSet(set) => Ok(set),
            _ => Err(StoreError::WrongType),
        }
    }

    /// Drops `key` when it holds a sorted set that a removal left empty.
    pub fn remove_if_empty(&mut self, key: &str) {
        if let Some(DataType::SortedSet(set)) = self.entries.get(key) {
            if set.is_empty() {
                self.entries.remove(key);
            }
        }
    }
}

#[derive(Debug)]
pub struct KeyValueStore {
    shards: Vec<RwLock<Shard>>,
}

impl Default for KeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore {
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_SHARD_COUNT)
    }

    pub fn with_shards(shard_count: usize) -> Self {
        let shards = (0..shard_count.max(1))
            .map(|_| RwLock::new(Shard::default()))
            .collect();

        Self { shards }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard_index(&self, key: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % self.shards.len() as u64) as usize
    }

    /// Shared access to the shard holding `key`.
    pub async fn read(&self, key: &str) -> RwLockReadGuard<'_, Shard> {
        self.shards[self.shard_index(key)].read().await
    }

    /// Exclusive access to the shard holding `key`.
    pub async fn write(&self, key: &str) -> RwLockWriteGuard<'_, Shard> {
        self.shards[self.shard_index(key)].write().await
    }

    /// Shared access to every shard at once, taken in a fixed order.
    pub async fn read_all(&self) -> Vec<RwLockReadGuard<'_, Shard>> {
        let mut guards = Vec::with_capacity(self.shards.len());
        for shard in &self.shards {
            guards.push(shard.read().await);
        }
        guards
    }

    /// Number of keys across all shards.
    pub async fn len(&self) -> usize {
        let mut total = 0;
        for shard in &self.shards {
            total += shard.read().await.len();
        }
        total
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
