use crate::{commands::command_error::CommandError, resp::RespValue};

/// Handles the Redis ECHO command.
///
/// # Examples
///
/// ```ignore
/// // ECHO "hello world"
/// let result = echo(&["hello world".to_string()]);
/// // Returns: "$11\r\nhello world\r\n"
/// ```
pub fn echo(arguments: &[String]) -> Result<RespValue, CommandError> {
    if arguments.len() != 1 {
        return Err(CommandError::wrong_number_of_arguments("ECHO"));
    }

    Ok(RespValue::BulkString(arguments[0].clone()))
}
