use thiserror::Error;

use crate::{key_value_store::StoreError, resp::RespValue, zset::ZSetError};

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("invalid command")]
    InvalidCommand,
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("wrong number of arguments for '{0}' command")]
    WrongNumberOfArguments(String),
    #[error("syntax error")]
    SyntaxError,
    #[error("value is not a valid float")]
    InvalidFloat,
    #[error("value is not an integer or out of range")]
    InvalidInteger,
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("{0}")]
    SortedSet(#[from] ZSetError),
    #[error("append only file is disabled")]
    AppendOnlyDisabled,
    #[error("background AOF rewrite failed: {0}")]
    Persistence(String),
    #[error("errors writing to the append only file")]
    AppendOnlyWriteFailed,
}

impl CommandError {
    pub fn wrong_number_of_arguments(command: &str) -> Self {
        CommandError::WrongNumberOfArguments(command.to_lowercase())
    }

    pub fn as_string(&self) -> String {
        match self {
            CommandError::InvalidCommand => {
                RespValue::Error("ERR Invalid command".to_string()).encode()
            }
            CommandError::UnknownCommand(name) => {
                RespValue::Error(format!("ERR unknown command '{}'", name)).encode()
            }
            CommandError::WrongNumberOfArguments(name) => RespValue::Error(format!(
                "ERR wrong number of arguments for '{}' command",
                name
            ))
            .encode(),
            CommandError::SyntaxError => RespValue::Error("ERR syntax error".to_string()).encode(),
            CommandError::InvalidFloat => {
                RespValue::Error("ERR value is not a valid float".to_string()).encode()
            }
            CommandError::InvalidInteger => {
                RespValue::Error("ERR value is not an integer or out of range".to_string())
                    .encode()
            }
            // WRONGTYPE carries its own error prefix.
            CommandError::Store(err) => RespValue::Error(err.to_string()).encode(),
            CommandError::SortedSet(err) => RespValue::Error(format!("ERR {}", err)).encode(),
            CommandError::AppendOnlyDisabled => {
                RespValue::Error("ERR Append only file is disabled".to_string()).encode()
            }
            CommandError::Persistence(msg) => {
                RespValue::Error(format!("ERR Background AOF rewrite failed: {}", msg)).encode()
            }
            CommandError::AppendOnlyWriteFailed => RespValue::Error(
                "MISCONF Errors writing to the AOF file, write commands are disabled until BGREWRITEAOF succeeds"
                    .to_string(),
            )
            .encode(),
        }
    }
}
