use crate::{
    aof::Aof,
    commands::{
        command_error::CommandError,
        zset_utils::{format_score, parse_score},
    },
    key_value_store::KeyValueStore,
    resp::RespValue,
    zset::AddOutcome,
};

/// Represents the parsed arguments for the ZADD command.
pub struct ZaddArguments {
    key: String,
    /// `(score, member)` pairs in the order they were given
    elements: Vec<(f64, String)>,
}

impl ZaddArguments {
    /// Parses `key score member [score member ...]`.
    ///
    /// Every score is validated before anything is written, so a bad score
    /// anywhere in the command leaves the set untouched.
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        if arguments.len() < 3 {
            return Err(CommandError::wrong_number_of_arguments("ZADD"));
        }

        if (arguments.len() - 1) % 2 != 0 {
            return Err(CommandError::SyntaxError);
        }

        let elements = arguments[1..]
            .chunks(2)
            .map(|pair| -> Result<(f64, String), CommandError> {
                Ok((parse_score(&pair[0])?, pair[1].clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            key: arguments[0].clone(),
            elements,
        })
    }
}

/// Handles the Redis ZADD command.
///
/// Adds every member with its score, moving members that already exist.
/// Returns the number of members that were not in the set before.
pub async fn zadd(
    store: &KeyValueStore,
    aof: Option<&Aof>,
    arguments: &[String],
) -> Result<RespValue, CommandError> {
    let zadd_arguments = ZaddArguments::parse(arguments)?;

    add_elements(store, aof, &zadd_arguments)
        .await
        .map(RespValue::Integer)
}

/// Applies the pairs in order and logs the ones that changed the set.
///
/// If a pair fails, the pairs before it stay applied and are still logged,
/// so replaying the log rebuilds exactly what is in memory.
async fn add_elements(
    store: &KeyValueStore,
    aof: Option<&Aof>,
    arguments: &ZaddArguments,
) -> Result<i64, CommandError> {
    let mut shard = store.write(&arguments.key).await;
    let set = shard.sorted_set_or_create(&arguments.key)?;

    let mut added = 0;
    let mut applied = vec![arguments.key.clone()];
    let mut result: Result<(), CommandError> = Ok(());

    for (score, member) in &arguments.elements {
        match set.add(member, *score) {
            Ok(AddOutcome::Inserted) => added += 1,
            Ok(AddOutcome::Updated) => (),
            Ok(AddOutcome::Unchanged) => continue,
            Err(err) => {
                result = Err(err.into());
                break;
            }
        }
        applied.push(format_score(*score));
        applied.push(member.clone());
    }

    if applied.len() > 1 {
        if let Some(aof) = aof {
            aof.append(RespValue::command("ZADD", &applied));
        }
    }

    shard.remove_if_empty(&arguments.key);
    result.map(|()| added)
}
