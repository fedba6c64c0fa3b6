use crate::{
    aof::Aof, commands::command_error::CommandError, key_value_store::KeyValueStore,
    resp::RespValue,
};

pub struct ZremArguments {
    key: String,
    members: Vec<String>,
}

impl ZremArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        if arguments.len() < 2 {
            return Err(CommandError::wrong_number_of_arguments("ZREM"));
        }

        Ok(Self {
            key: arguments[0].clone(),
            members: arguments[1..].to_vec(),
        })
    }
}

/// Handles the Redis ZREM command.
///
/// Returns the number of members that were removed. A set left empty is
/// deleted from the keyspace.
pub async fn zrem(
    store: &KeyValueStore,
    aof: Option<&Aof>,
    arguments: &[String],
) -> Result<RespValue, CommandError> {
    let zrem_arguments = ZremArguments::parse(arguments)?;

    let mut shard = store.write(&zrem_arguments.key).await;
    let Some(set) = shard.sorted_set_mut(&zrem_arguments.key)? else {
        return Ok(RespValue::Integer(0));
    };

    let removed = zrem_arguments
        .members
        .iter()
        .filter(|member| set.remove(member))
        .count();

    shard.remove_if_empty(&zrem_arguments.key);

    if removed > 0 {
        if let Some(aof) = aof {
            aof.append(RespValue::command("ZREM", arguments));
        }
    }

    Ok(RespValue::Integer(removed as i64))
}
