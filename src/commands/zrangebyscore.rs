use crate::{
    commands::{
        command_error::CommandError,
        zset_utils::{encode_elements, parse_integer, parse_score_range},
    },
    key_value_store::KeyValueStore,
    resp::RespValue,
    zset::ScoreRange,
};

/// Represents the parsed arguments for ZRANGEBYSCORE and ZREVRANGEBYSCORE.
pub struct ZrangeByScoreArguments {
    key: String,
    range: ScoreRange,
    with_scores: bool,
    offset: i64,
    /// Negative means every remaining element
    count: i64,
}

impl ZrangeByScoreArguments {
    /// Parses `key min max [WITHSCORES] [LIMIT offset count]`.
    ///
    /// The reverse form takes its borders as `max min`.
    pub fn parse(arguments: &[String], reverse: bool) -> Result<Self, CommandError> {
        if arguments.len() < 3 {
            let name = if reverse {
                "ZREVRANGEBYSCORE"
            } else {
                "ZRANGEBYSCORE"
            };
            return Err(CommandError::wrong_number_of_arguments(name));
        }

        let range = if reverse {
            parse_score_range(&arguments[2], &arguments[1])?
        } else {
            parse_score_range(&arguments[1], &arguments[2])?
        };

        let mut with_scores = false;
        let mut offset = 0;
        let mut count = -1;

        let mut options = arguments[3..].iter();
        while let Some(option) = options.next() {
            match option.to_uppercase().as_str() {
                "WITHSCORES" => with_scores = true,
                "LIMIT" => {
                    let (Some(offset_arg), Some(count_arg)) = (options.next(), options.next())
                    else {
                        return Err(CommandError::SyntaxError);
                    };

                    offset = parse_integer(offset_arg)?;
                    count = parse_integer(count_arg)?;
                }
                _ => return Err(CommandError::SyntaxError),
            }
        }

        Ok(Self {
            key: arguments[0].clone(),
            range,
            with_scores,
            offset,
            count,
        })
    }
}

/// Handles the Redis ZRANGEBYSCORE and ZREVRANGEBYSCORE commands.
pub async fn zrange_by_score(
    store: &KeyValueStore,
    arguments: &[String],
    reverse: bool,
) -> Result<RespValue, CommandError> {
    let range_arguments = ZrangeByScoreArguments::parse(arguments, reverse)?;

    let shard = store.read(&range_arguments.key).await;

    let Some(set) = shard.sorted_set(&range_arguments.key)? else {
        return Ok(RespValue::Array(Vec::new()));
    };

    if range_arguments.offset < 0 {
        return Ok(RespValue::Array(Vec::new()));
    }

    let limit = usize::try_from(range_arguments.count).ok();
    let elements = set.range_by_score(
        &range_arguments.range,
        range_arguments.offset as usize,
        limit,
        reverse,
    );

    Ok(encode_elements(elements, range_arguments.with_scores))
}
