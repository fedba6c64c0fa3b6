use std::sync::Arc;

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};
use zedis::{
    aof::Aof,
    commands::{CommandError, CommandHandler},
    key_value_store::KeyValueStore,
    resp::RespValue,
};

/// Test utilities for simplifying Redis command tests
pub struct TestUtils;

/// Test environment containing the store and, optionally, an append only file
pub struct TestEnv {
    pub store: Arc<KeyValueStore>,
    pub aof: Option<Aof>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            store: Arc::new(KeyValueStore::new()),
            aof: None,
        }
    }

    pub fn with_aof(aof: Aof) -> Self {
        Self {
            store: Arc::new(KeyValueStore::new()),
            aof: Some(aof),
        }
    }

    /// Execute a command and return the encoded result
    pub async fn exec_command(&self, command: RespValue) -> Result<String, CommandError> {
        let command_handler = CommandHandler::new(command)?;

        command_handler
            .handle_command(&self.store, self.aof.as_ref())
            .await
            .map(|response| response.encode())
    }

    /// Execute a command and assert it succeeds with expected result
    pub async fn exec_command_immediate_success_response(
        &self,
        command: RespValue,
        expected_response: &str,
    ) {
        let result = self.exec_command(command.clone()).await;
        assert_eq!(
            result,
            Ok(expected_response.to_string()),
            "executing {:?}",
            command
        );
    }

    /// Execute a command and assert it fails
    pub async fn exec_command_immediate_error_response(
        &self,
        command: RespValue,
        expected_error: CommandError,
    ) {
        let result = self.exec_command(command.clone()).await;
        assert_eq!(result, Err(expected_error), "executing {:?}", command);
    }
}

impl TestUtils {
    /// Create any command from its name and arguments
    pub fn command(name: &str, arguments: &[&str]) -> RespValue {
        let arguments = arguments.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        RespValue::command(name, &arguments)
    }

    /// Create a PING command
    pub fn ping_command() -> RespValue {
        Self::command("PING", &[])
    }

    /// Create an ECHO command
    pub fn echo_command(message: &str) -> RespValue {
        Self::command("ECHO", &[message])
    }

    /// Create a GET command
    pub fn get_command(key: &str) -> RespValue {
        Self::command("GET", &[key])
    }

    /// Create a SET command
    pub fn set_command(key: &str, value: &str) -> RespValue {
        Self::command("SET", &[key, value])
    }

    /// Create a DEL command
    pub fn del_command(keys: &[&str]) -> RespValue {
        Self::command("DEL", keys)
    }

    /// Create an EXISTS command
    pub fn exists_command(keys: &[&str]) -> RespValue {
        Self::command("EXISTS", keys)
    }

    /// Create a TYPE command
    pub fn type_command(key: &str) -> RespValue {
        Self::command("TYPE", &[key])
    }

    /// Create a ZADD command from `(score, member)` pairs
    pub fn zadd_command(key: &str, elements: &[(&str, &str)]) -> RespValue {
        let mut arguments = vec![key];
        for &(score, member) in elements {
            arguments.push(score);
            arguments.push(member);
        }
        Self::command("ZADD", &arguments)
    }

    /// Create a ZREM command
    pub fn zrem_command(key: &str, members: &[&str]) -> RespValue {
        let mut arguments = vec![key];
        arguments.extend_from_slice(members);
        Self::command("ZREM", &arguments)
    }

    /// Create a ZSCORE command
    pub fn zscore_command(key: &str, member: &str) -> RespValue {
        Self::command("ZSCORE", &[key, member])
    }

    /// Create a ZRANK command
    pub fn zrank_command(key: &str, member: &str) -> RespValue {
        Self::command("ZRANK", &[key, member])
    }

    /// Create a ZREVRANK command
    pub fn zrevrank_command(key: &str, member: &str) -> RespValue {
        Self::command("ZREVRANK", &[key, member])
    }

    /// Create a ZRANGE command
    pub fn zrange_command(key: &str, start: i64, stop: i64) -> RespValue {
        Self::command("ZRANGE", &[key, &start.to_string(), &stop.to_string()])
    }

    /// Create a ZRANGE command with WITHSCORES
    pub fn zrange_command_with_scores(key: &str, start: i64, stop: i64) -> RespValue {
        Self::command(
            "ZRANGE",
            &[key, &start.to_string(), &stop.to_string(), "WITHSCORES"],
        )
    }

    /// Create a ZREVRANGE command
    pub fn zrevrange_command(key: &str, start: i64, stop: i64) -> RespValue {
        Self::command("ZREVRANGE", &[key, &start.to_string(), &stop.to_string()])
    }

    /// Create a ZRANGEBYSCORE command, options such as WITHSCORES or LIMIT go last
    pub fn zrangebyscore_command(key: &str, min: &str, max: &str, options: &[&str]) -> RespValue {
        let mut arguments = vec![key, min, max];
        arguments.extend_from_slice(options);
        Self::command("ZRANGEBYSCORE", &arguments)
    }

    /// Create a ZREVRANGEBYSCORE command
    pub fn zrevrangebyscore_command(
        key: &str,
        max: &str,
        min: &str,
        options: &[&str],
    ) -> RespValue {
        let mut arguments = vec![key, max, min];
        arguments.extend_from_slice(options);
        Self::command("ZREVRANGEBYSCORE", &arguments)
    }

    /// Create a ZREMRANGEBYRANK command
    pub fn zremrangebyrank_command(key: &str, start: i64, stop: i64) -> RespValue {
        Self::command(
            "ZREMRANGEBYRANK",
            &[key, &start.to_string(), &stop.to_string()],
        )
    }

    /// Create a ZREMRANGEBYSCORE command
    pub fn zremrangebyscore_command(key: &str, min: &str, max: &str) -> RespValue {
        Self::command("ZREMRANGEBYSCORE", &[key, min, max])
    }

    /// Create a ZCOUNT command
    pub fn zcount_command(key: &str, min: &str, max: &str) -> RespValue {
        Self::command("ZCOUNT", &[key, min, max])
    }

    /// Create a ZCARD command
    pub fn zcard_command(key: &str) -> RespValue {
        Self::command("ZCARD", &[key])
    }

    /// Create a BGREWRITEAOF command
    pub fn bgrewriteaof_command() -> RespValue {
        Self::command("BGREWRITEAOF", &[])
    }

    /// Create expected bulk string response
    pub fn expected_bulk_string(value: &str) -> String {
        format!("${}\r\n{}\r\n", value.len(), value)
    }

    /// Create expected integer response
    pub fn expected_integer(value: i64) -> String {
        format!(":{}\r\n", value)
    }

    /// Create expected simple string response
    pub fn expected_simple_string(value: &str) -> String {
        format!("+{}\r\n", value)
    }

    /// Create expected null response
    pub fn expected_null() -> String {
        "$-1\r\n".to_string()
    }

    /// Create expected bulk string array response
    pub fn expected_bulk_string_array(items: &[&str]) -> String {
        let mut response = format!("*{}\r\n", items.len());
        for item in items {
            response.push_str(&format!("${}\r\n{}\r\n", item.len(), item));
        }
        response
    }

    /// Send a command over a TCP connection and read back exactly the expected reply
    pub async fn send_command_and_receive(
        client: &mut TcpStream,
        command: RespValue,
        expected_response: &str,
    ) {
        client.write_all(command.encode().as_bytes()).await.unwrap();
        client.flush().await.unwrap();

        let mut response = vec![0; expected_response.len()];
        client.read_exact(&mut response).await.unwrap();

        assert_eq!(String::from_utf8(response).unwrap(), expected_response);
    }
}
