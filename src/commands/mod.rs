mod bgrewriteaof;
mod command_error;
mod command_handler;
mod del;
mod echo;
mod exists;
mod get;
mod ping;
mod set;
mod type_command;
mod zadd;
mod zcard;
mod zcount;
mod zrange;
mod zrangebyscore;
mod zrank;
mod zrem;
mod zremrangebyrank;
mod zremrangebyscore;
mod zscore;
pub mod zset_utils;

pub use command_error::CommandError;
pub use command_handler::CommandHandler;
