use crate::{
    commands::command_error::CommandError, key_value_store::KeyValueStore, resp::RespValue,
};

pub struct ZrankArguments {
    key: String,
    member: String,
}

impl ZrankArguments {
    pub fn parse(arguments: &[String], reverse: bool) -> Result<Self, CommandError> {
        if arguments.len() != 2 {
            let name = if reverse { "ZREVRANK" } else { "ZRANK" };
            return Err(CommandError::wrong_number_of_arguments(name));
        }

        Ok(Self {
            key: arguments[0].clone(),
            member: arguments[1].clone(),
        })
    }
}

/// Handles the Redis ZRANK and ZREVRANK commands.
///
/// Redis ranks are 0-based; `reverse` ranks from the highest score down.
/// Returns null when the key or member does not exist.
pub async fn zrank(
    store: &KeyValueStore,
    arguments: &[String],
    reverse: bool,
) -> Result<RespValue, CommandError> {
    let zrank_arguments = ZrankArguments::parse(arguments, reverse)?;

    let shard = store.read(&zrank_arguments.key).await;

    let rank = shard
        .sorted_set(&zrank_arguments.key)?
        .and_then(|set| set.rank(&zrank_arguments.member, reverse));

    match rank {
        Some(rank) => Ok(RespValue::Integer(rank as i64 - 1)),
        None => Ok(RespValue::NullBulkString),
    }
}
