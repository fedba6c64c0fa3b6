//! A Redis-compatible server built around the sorted set.
//!
//! Sorted sets are stored as a skip list with a rank span on every forward
//! link, paired with a member-to-score table. On top of that sit:
//!
//! - The sorted set commands (ZADD, ZREM, ZSCORE, ZRANK, ZRANGE, ZRANGEBYSCORE, ...)
//! - A few generic commands (PING, ECHO, GET, SET, DEL, EXISTS, TYPE)
//! - An append-only file with background rewrite
//!
//! The keyspace is split into shards behind their own locks, and clients are
//! served concurrently with Tokio.

pub mod aof;
pub mod commands;
pub mod connection;
pub mod input;
pub mod key_value_store;
pub mod resp;
pub mod server;
pub mod zset;
