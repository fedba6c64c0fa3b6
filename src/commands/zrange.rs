use crate::{
    commands::{
        command_error::CommandError,
        zset_utils::{encode_elements, parse_integer, rank_range},
    },
    key_value_store::KeyValueStore,
    resp::RespValue,
};

/// Represents the parsed arguments for the ZRANGE and ZREVRANGE commands.
pub struct ZrangeArguments {
    key: String,
    /// 0-based, negative values count from the end
    start_index: i64,
    /// 0-based and inclusive, negative values count from the end
    end_index: i64,
    with_scores: bool,
}

impl ZrangeArguments {
    pub fn parse(arguments: &[String], reverse: bool) -> Result<Self, CommandError> {
        if arguments.len() != 3 && arguments.len() != 4 {
            let name = if reverse { "ZREVRANGE" } else { "ZRANGE" };
            return Err(CommandError::wrong_number_of_arguments(name));
        }

        let start_index = parse_integer(&arguments[1])?;
        let end_index = parse_integer(&arguments[2])?;

        let with_scores = match arguments.get(3) {
            None => false,
            Some(option) if option.eq_ignore_ascii_case("WITHSCORES") => true,
            Some(_) => return Err(CommandError::SyntaxError),
        };

        Ok(Self {
            key: arguments[0].clone(),
            start_index,
            end_index,
            with_scores,
        })
    }
}

/// Handles the Redis ZRANGE and ZREVRANGE commands.
///
/// Returns the members between two indexes, inclusive, in ascending score
/// order or descending when `reverse`. Out of range indexes yield an empty
/// array.
///
/// # Examples
///
/// ```ignore
/// // ZRANGE fruit 0 -1 WITHSCORES
/// let result = zrange(&store, &args, false).await;
/// // Returns: *4\r\n$5\r\napple\r\n$1\r\n1\r\n$4\r\npear\r\n$1\r\n2\r\n
/// ```
pub async fn zrange(
    store: &KeyValueStore,
    arguments: &[String],
    reverse: bool,
) -> Result<RespValue, CommandError> {
    let zrange_arguments = ZrangeArguments::parse(arguments, reverse)?;

    let shard = store.read(&zrange_arguments.key).await;

    let Some(set) = shard.sorted_set(&zrange_arguments.key)? else {
        return Ok(RespValue::Array(Vec::new()));
    };

    let Ok((start, stop)) = rank_range(
        set.len(),
        zrange_arguments.start_index,
        zrange_arguments.end_index,
    ) else {
        return Ok(RespValue::Array(Vec::new()));
    };

    Ok(encode_elements(
        set.range_by_rank(start, stop, reverse),
        zrange_arguments.with_scores,
    ))
}
