use crate::{
    commands::command_error::CommandError, key_value_store::KeyValueStore, resp::RespValue,
};

pub struct TypeArguments {
    key: String,
}

impl TypeArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        if arguments.len() != 1 {
            return Err(CommandError::wrong_number_of_arguments("TYPE"));
        }

        Ok(Self {
            key: arguments[0].clone(),
        })
    }
}

pub async fn type_command(
    store: &KeyValueStore,
    arguments: &[String],
) -> Result<RespValue, CommandError> {
    let type_arguments = TypeArguments::parse(arguments)?;

    let shard = store.read(&type_arguments.key).await;

    let type_name = shard
        .get(&type_arguments.key)
        .map_or("none", |value| value.type_name());

    Ok(RespValue::SimpleString(type_name.to_string()))
}
