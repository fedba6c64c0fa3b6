use crate::{
    commands::{command_error::CommandError, zset_utils::format_score},
    key_value_store::KeyValueStore,
    resp::RespValue,
};

pub struct ZscoreArguments {
    key: String,
    member: String,
}

impl ZscoreArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        if arguments.len() != 2 {
            return Err(CommandError::wrong_number_of_arguments("ZSCORE"));
        }

        Ok(Self {
            key: arguments[0].clone(),
            member: arguments[1].clone(),
        })
    }
}

/// Handles the Redis ZSCORE command.
///
/// Returns the member's score as a bulk string, or null when either the key
/// or the member does not exist.
pub async fn zscore(store: &KeyValueStore, arguments: &[String]) -> Result<RespValue, CommandError> {
    let zscore_arguments = ZscoreArguments::parse(arguments)?;

    let shard = store.read(&zscore_arguments.key).await;

    let score = shard
        .sorted_set(&zscore_arguments.key)?
        .and_then(|set| set.score(&zscore_arguments.member));

    match score {
        Some(score) => Ok(RespValue::BulkString(format_score(score))),
        None => Ok(RespValue::NullBulkString),
    }
}
