//! The Redis Serialization Protocol (RESP).
//!
//! Frames are decoded from a growing [`BytesMut`] buffer: every complete
//! frame is consumed and returned, and a trailing partial frame is left in
//! the buffer until more bytes arrive.

use bytes::{Buf, BytesMut};
use thiserror::Error;

/// Largest bulk string a client may send, matching Redis' `proto-max-bulk-len`.
pub const MAX_BULK_LENGTH: usize = 512 * 1024 * 1024;
/// Largest number of elements in one array frame.
pub const MAX_ARRAY_LENGTH: usize = 1024 * 1024;
/// Arrays nested deeper than this are rejected.
pub const MAX_NESTING_DEPTH: usize = 8;

#[derive(Error, Debug, PartialEq, Clone)]
pub enum RespError {
    #[error("invalid UTF-8 sequence")]
    InvalidUtf8,
    #[error("unknown RESP type '{0}'")]
    UnknownRespType(char),
    #[error("failed to parse integer")]
    FailedToParseInteger,
    #[error("invalid bulk string")]
    InvalidBulkString,
    #[error("invalid array")]
    InvalidArray,
}

impl RespError {
    pub fn as_string(&self) -> String {
        RespValue::Error(format!("ERR Protocol error: {}", self)).encode()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
    SimpleString(String),
    Error(String),
    Integer(i64),
    BulkString(String),
    NullBulkString,
    Array(Vec<RespValue>),
}

impl RespValue {
    /// Decodes every complete frame at the front of `bytes`.
    pub fn parse(bytes: &mut BytesMut) -> Result<Vec<RespValue>, RespError> {
        let mut values = Vec::new();

        while let Some((value, consumed)) = Self::decode(&bytes[..], 0)? {
            bytes.advance(consumed);
            values.push(value);
        }

        Ok(values)
    }

    /// Decodes one frame, returning it with the number of bytes it used, or
    /// `None` when the frame is not complete yet. `depth` counts the arrays
    /// enclosing this frame.
    fn decode(buffer: &[u8], depth: usize) -> Result<Option<(RespValue, usize)>, RespError> {
        let Some(line_end) = find_line_end(buffer) else {
            return Ok(None);
        };

        if line_end == 0 {
            return Err(RespError::UnknownRespType('\r'));
        }

        let line = std::str::from_utf8(&buffer[1..line_end]).map_err(|_| RespError::InvalidUtf8)?;
        let consumed = line_end + 2;

        match buffer[0] {
            b'+' => Ok(Some((RespValue::SimpleString(line.to_string()), consumed))),
            b'-' => Ok(Some((RespValue::Error(line.to_string()), consumed))),
            b':' => {
                let value = line
                    .parse::<i64>()
                    .map_err(|_| RespError::FailedToParseInteger)?;
                Ok(Some((RespValue::Integer(value), consumed)))
            }
            b'$' => {
                let length = line
                    .parse::<i64>()
                    .map_err(|_| RespError::InvalidBulkString)?;

                if length == -1 {
                    return Ok(Some((RespValue::NullBulkString, consumed)));
                }

                let length = match usize::try_from(length) {
                    Ok(length) if length <= MAX_BULK_LENGTH => length,
                    _ => return Err(RespError::InvalidBulkString),
                };

                let end = consumed + length;
                if buffer.len() < end + 2 {
                    return Ok(None);
                }

                if &buffer[end..end + 2] != b"\r\n" {
                    return Err(RespError::InvalidBulkString);
                }

                let content =
                    std::str::from_utf8(&buffer[consumed..end]).map_err(|_| RespError::InvalidUtf8)?;

                Ok(Some((RespValue::BulkString(content.to_string()), end + 2)))
            }
            b'*' => {
                let length = line
                    .parse::<i64>()
                    .map_err(|_| RespError::InvalidArray)?;

                if length == -1 {
                    return Ok(Some((RespValue::NullBulkString, consumed)));
                }

                let length = match usize::try_from(length) {
                    Ok(length) if length <= MAX_ARRAY_LENGTH => length,
                    _ => return Err(RespError::InvalidArray),
                };

                if length > 0 && depth >= MAX_NESTING_DEPTH {
                    return Err(RespError::InvalidArray);
                }

                let mut elements = Vec::with_capacity(length.min(1024));
                let mut position = consumed;

                while elements.len() < length {
                    match Self::decode(&buffer[position..], depth + 1)? {
                        Some((element, used)) => {
                            elements.push(element);
                            position += used;
                        }
                        None => return Ok(None),
                    }
                }

                Ok(Some((RespValue::Array(elements), position)))
            }
            other => Err(RespError::UnknownRespType(other as char)),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            RespValue::SimpleString(s) => format!("+{}\r\n", s),
            RespValue::Error(e) => format!("-{}\r\n", e),
            RespValue::Integer(i) => format!(":{}\r\n", i),
            RespValue::BulkString(s) => format!("${}\r\n{}\r\n", s.len(), s),
            RespValue::NullBulkString => "$-1\r\n".to_string(),
            RespValue::Array(elements) => {
                let mut encoded = format!("*{}\r\n", elements.len());
                for element in elements {
                    encoded.push_str(&element.encode());
                }
                encoded
            }
        }
    }

    pub fn encode_array_from_strings(strings: Vec<String>) -> String {
        RespValue::Array(strings.into_iter().map(RespValue::BulkString).collect()).encode()
    }

    /// Builds the array form of a command as a client would send it.
    pub fn command(name: &str, arguments: &[String]) -> RespValue {
        let mut elements = Vec::with_capacity(arguments.len() + 1);
        elements.push(RespValue::BulkString(name.to_string()));
        elements.extend(arguments.iter().cloned().map(RespValue::BulkString));

        RespValue::Array(elements)
    }
}

fn find_line_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|window| window == b"\r\n")
}
