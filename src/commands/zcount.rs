use crate::{
    commands::{command_error::CommandError, zset_utils::parse_score_range},
    key_value_store::KeyValueStore,
    resp::RespValue,
};

/// Handles the Redis ZCOUNT command: the number of members whose score lies
/// between `min` and `max`.
pub async fn zcount(store: &KeyValueStore, arguments: &[String]) -> Result<RespValue, CommandError> {
    if arguments.len() != 3 {
        return Err(CommandError::wrong_number_of_arguments("ZCOUNT"));
    }

    let range = parse_score_range(&arguments[1], &arguments[2])?;

    let shard = store.read(&arguments[0]).await;
    let count = shard
        .sorted_set(&arguments[0])?
        .map_or(0, |set| set.count(&range));

    Ok(RespValue::Integer(count as i64))
}
