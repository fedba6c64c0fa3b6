use tracing::debug;

use crate::{
    aof::Aof, commands::command_error::CommandError, key_value_store::KeyValueStore,
    resp::RespValue,
};

/// Handles the Redis DEL command.
///
/// Each key is deleted under its own shard lock and logged on its own, so a
/// replayed log deletes exactly the keys that existed.
pub async fn del(
    store: &KeyValueStore,
    aof: Option<&Aof>,
    arguments: &[String],
) -> Result<RespValue, CommandError> {
    if arguments.is_empty() {
        return Err(CommandError::wrong_number_of_arguments("DEL"));
    }

    let mut deleted = 0;

    for key in arguments {
        let mut shard = store.write(key).await;

        if shard.remove(key).is_some() {
            deleted += 1;
            debug!(key = %key, "deleted key");

            if let Some(aof) = aof {
                aof.append(RespValue::command("DEL", std::slice::from_ref(key)));
            }
        }
    }

    Ok(RespValue::Integer(deleted))
}
