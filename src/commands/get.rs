use crate::{
    commands::command_error::CommandError,
    key_value_store::{DataType, KeyValueStore, StoreError},
    resp::RespValue,
};

/// Handles the Redis GET command.
///
/// # Returns
///
/// * `Ok(RespValue::BulkString)` - The value stored at the key
/// * `Ok(RespValue::NullBulkString)` - If the key does not exist
/// * `Err(CommandError::Store)` - If the key holds a sorted set
pub async fn get(store: &KeyValueStore, arguments: &[String]) -> Result<RespValue, CommandError> {
    if arguments.len() != 1 {
        return Err(CommandError::wrong_number_of_arguments("GET"));
    }

    let shard = store.read(&arguments[0]).await;

    match shard.get(&arguments[0]) {
        Some(DataType::String(value)) => Ok(RespValue::BulkString(value.clone())),
        Some(_) => Err(StoreError::WrongType.into()),
        None => Ok(RespValue::NullBulkString),
    }
}
