use crate::{
    commands::command_error::CommandError, key_value_store::KeyValueStore, resp::RespValue,
};

/// Handles the Redis EXISTS command. A key named twice is counted twice.
pub async fn exists(store: &KeyValueStore, arguments: &[String]) -> Result<RespValue, CommandError> {
    if arguments.is_empty() {
        return Err(CommandError::wrong_number_of_arguments("EXISTS"));
    }

    let mut count = 0;

    for key in arguments {
        if store.read(key).await.contains_key(key) {
            count += 1;
        }
    }

    Ok(RespValue::Integer(count))
}
