use crate::{
    aof::Aof,
    commands::{command_error::CommandError, zset_utils::parse_score_range},
    key_value_store::KeyValueStore,
    resp::RespValue,
    zset::ScoreRange,
};

pub struct ZremRangeByScoreArguments {
    key: String,
    range: ScoreRange,
}

impl ZremRangeByScoreArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        if arguments.len() != 3 {
            return Err(CommandError::wrong_number_of_arguments("ZREMRANGEBYSCORE"));
        }

        Ok(Self {
            key: arguments[0].clone(),
            range: parse_score_range(&arguments[1], &arguments[2])?,
        })
    }
}

/// Handles the Redis ZREMRANGEBYSCORE command.
pub async fn zremrangebyscore(
    store: &KeyValueStore,
    aof: Option<&Aof>,
    arguments: &[String],
) -> Result<RespValue, CommandError> {
    let score_arguments = ZremRangeByScoreArguments::parse(arguments)?;

    let mut shard = store.write(&score_arguments.key).await;
    let Some(set) = shard.sorted_set_mut(&score_arguments.key)? else {
        return Ok(RespValue::Integer(0));
    };

    let removed = set.remove_range_by_score(&score_arguments.range).len();
    shard.remove_if_empty(&score_arguments.key);

    if removed > 0 {
        if let Some(aof) = aof {
            aof.append(RespValue::command("ZREMRANGEBYSCORE", arguments));
        }
    }

    Ok(RespValue::Integer(removed as i64))
}
