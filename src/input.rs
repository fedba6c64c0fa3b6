//! Reading commands off a client stream.

use bytes::BytesMut;
use thiserror::Error;
use tokio::io::AsyncReadExt;

use crate::resp::{RespError, RespValue};

/// Errors that can occur while reading and parsing commands from a stream.
#[derive(Error, Debug, PartialEq)]
pub enum CommandReadError {
    #[error("I/O error: {0}")]
    IoError(String),
    #[error("Connection closed")]
    ConnectionClosed,
    #[error("RESP parse error: {0}")]
    RespParseError(#[from] RespError),
}

impl CommandReadError {
    pub fn as_string(&self) -> String {
        match self {
            CommandReadError::IoError(msg) => RespValue::Error(format!("ERR {}", msg)).encode(),
            CommandReadError::ConnectionClosed => {
                RespValue::Error("ERR connection closed".to_string()).encode()
            }
            CommandReadError::RespParseError(err) => err.as_string(),
        }
    }
}

/// Reads from `stream` until at least one complete RESP value is buffered,
/// then returns every complete value.
///
/// Bytes of a value that has not fully arrived stay in `buffer` for the next
/// call. Cancelling the future loses no data.
///
/// # Returns
///
/// * `Ok(Vec<RespValue>)` - One or more parsed values
/// * `Err(CommandReadError::IoError)` - If reading from the stream fails
/// * `Err(CommandReadError::ConnectionClosed)` - If the peer closed the stream
/// * `Err(CommandReadError::RespParseError)` - If the buffered bytes are not valid RESP
pub async fn read_and_parse_resp<R>(
    stream: &mut R,
    buffer: &mut BytesMut,
) -> Result<Vec<RespValue>, CommandReadError>
where
    R: AsyncReadExt + Unpin,
{
    loop {
        let values = RespValue::parse(buffer)?;
        if !values.is_empty() {
            return Ok(values);
        }

        let number_of_bytes = stream
            .read_buf(buffer)
            .await
            .map_err(|e| CommandReadError::IoError(e.to_string()))?;

        if number_of_bytes == 0 {
            return Err(CommandReadError::ConnectionClosed);
        }
    }
}
