use crate::{
    aof::Aof, commands::command_error::CommandError, key_value_store::KeyValueStore,
    resp::RespValue,
};

/// Handles the Redis BGREWRITEAOF command.
///
/// The snapshot is taken before replying; writing it out and swapping the
/// file happens on the log writer task.
pub async fn bgrewriteaof(
    store: &KeyValueStore,
    aof: Option<&Aof>,
    arguments: &[String],
) -> Result<RespValue, CommandError> {
    if !arguments.is_empty() {
        return Err(CommandError::wrong_number_of_arguments("BGREWRITEAOF"));
    }

    let Some(aof) = aof else {
        return Err(CommandError::AppendOnlyDisabled);
    };

    aof.rewrite(store)
        .await
        .map_err(|err| CommandError::Persistence(err.to_string()))?;

    Ok(RespValue::SimpleString(
        "Background append only file rewriting started".to_string(),
    ))
}
