use crate::{
    aof::Aof,
    commands::{
        command_error::CommandError,
        zset_utils::{parse_integer, rank_range},
    },
    key_value_store::KeyValueStore,
    resp::RespValue,
};

pub struct ZremRangeByRankArguments {
    key: String,
    start_index: i64,
    end_index: i64,
}

impl ZremRangeByRankArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        if arguments.len() != 3 {
            return Err(CommandError::wrong_number_of_arguments("ZREMRANGEBYRANK"));
        }

        Ok(Self {
            key: arguments[0].clone(),
            start_index: parse_integer(&arguments[1])?,
            end_index: parse_integer(&arguments[2])?,
        })
    }
}

/// Handles the Redis ZREMRANGEBYRANK command.
///
/// Indexes follow ZRANGE: 0-based, inclusive, negative from the end.
/// Returns the number of removed members.
pub async fn zremrangebyrank(
    store: &KeyValueStore,
    aof: Option<&Aof>,
    arguments: &[String],
) -> Result<RespValue, CommandError> {
    let rank_arguments = ZremRangeByRankArguments::parse(arguments)?;

    let mut shard = store.write(&rank_arguments.key).await;
    let Some(set) = shard.sorted_set_mut(&rank_arguments.key)? else {
        return Ok(RespValue::Integer(0));
    };

    let Ok((start, stop)) = rank_range(
        set.len(),
        rank_arguments.start_index,
        rank_arguments.end_index,
    ) else {
        return Ok(RespValue::Integer(0));
    };

    let removed = set.remove_range_by_rank(start, stop).len();
    shard.remove_if_empty(&rank_arguments.key);

    if removed > 0 {
        if let Some(aof) = aof {
            aof.append(RespValue::command("ZREMRANGEBYRANK", arguments));
        }
    }

    Ok(RespValue::Integer(removed as i64))
}
