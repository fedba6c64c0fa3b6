use crate::{
    aof::Aof,
    commands::command_error::CommandError,
    key_value_store::{DataType, KeyValueStore},
    resp::RespValue,
};

/// Represents the parsed arguments for the SET command.
pub struct SetArguments {
    /// The key to store the value under
    key: String,
    /// The value to be stored under the given key
    value: String,
}

impl SetArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        if arguments.len() != 2 {
            return Err(CommandError::wrong_number_of_arguments("SET"));
        }

        Ok(Self {
            key: arguments[0].clone(),
            value: arguments[1].clone(),
        })
    }
}

/// Handles the Redis SET command.
///
/// Stores a string value, replacing whatever the key held before, sorted
/// sets included.
pub async fn set(
    store: &KeyValueStore,
    aof: Option<&Aof>,
    arguments: &[String],
) -> Result<RespValue, CommandError> {
    let set_arguments = SetArguments::parse(arguments)?;

    let mut shard = store.write(&set_arguments.key).await;
    shard.insert(set_arguments.key, DataType::String(set_arguments.value));

    if let Some(aof) = aof {
        aof.append(RespValue::command("SET", arguments));
    }

    Ok(RespValue::SimpleString("OK".to_string()))
}
