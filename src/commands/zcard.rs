use crate::{
    commands::command_error::CommandError, key_value_store::KeyValueStore, resp::RespValue,
};

pub async fn zcard(store: &KeyValueStore, arguments: &[String]) -> Result<RespValue, CommandError> {
    if arguments.len() != 1 {
        return Err(CommandError::wrong_number_of_arguments("ZCARD"));
    }

    let shard = store.read(&arguments[0]).await;
    let length = shard.sorted_set(&arguments[0])?.map_or(0, |set| set.len());

    Ok(RespValue::Integer(length as i64))
}
