use crate::{
    aof::Aof,
    commands::{
        bgrewriteaof::bgrewriteaof, command_error::CommandError, del::del, echo::echo,
        exists::exists, get::get, ping::ping, set::set, type_command::type_command, zadd::zadd,
        zcard::zcard, zcount::zcount, zrange::zrange, zrangebyscore::zrange_by_score,
        zrank::zrank, zrem::zrem, zremrangebyrank::zremrangebyrank,
        zremrangebyscore::zremrangebyscore, zscore::zscore,
    },
    key_value_store::KeyValueStore,
    resp::RespValue,
};

/// Commands that change the keyspace and are refused while the append only
/// file cannot be written.
const WRITE_COMMANDS: [&str; 6] = [
    "SET",
    "DEL",
    "ZADD",
    "ZREM",
    "ZREMRANGEBYRANK",
    "ZREMRANGEBYSCORE",
];

/// A command name and its arguments, as decoded from one RESP array.
#[derive(Debug, PartialEq, Clone)]
pub struct CommandHandler {
    pub name: String,
    pub arguments: Vec<String>,
}

impl CommandHandler {
    /// Builds a handler from a client frame.
    ///
    /// The frame must be a non-empty array of bulk strings. The command name
    /// is matched case-insensitively.
    pub fn new(input: RespValue) -> Result<Self, CommandError> {
        let RespValue::Array(elements) = input else {
            return Err(CommandError::InvalidCommand);
        };

        let mut strings = elements.into_iter().map(|element| match element {
            RespValue::BulkString(s) => Ok(s),
            _ => Err(CommandError::InvalidCommand),
        });

        let name = match strings.next() {
            Some(name) => name?.to_uppercase(),
            None => return Err(CommandError::InvalidCommand),
        };

        let arguments = strings.collect::<Result<Vec<String>, CommandError>>()?;

        Ok(Self { name, arguments })
    }

    /// Runs the command against the store.
    ///
    /// Write commands forward themselves to `aof` when it is given and they
    /// changed something. They are refused while `aof` is unhealthy.
    pub async fn handle_command(
        &self,
        store: &KeyValueStore,
        aof: Option<&Aof>,
    ) -> Result<RespValue, CommandError> {
        let arguments = self.arguments.as_slice();

        if aof.is_some_and(|aof| !aof.is_healthy()) && WRITE_COMMANDS.contains(&self.name.as_str())
        {
            return Err(CommandError::AppendOnlyWriteFailed);
        }

        match self.name.as_str() {
            "PING" => ping(arguments),
            "ECHO" => echo(arguments),
            "GET" => get(store, arguments).await,
            "SET" => set(store, aof, arguments).await,
            "DEL" => del(store, aof, arguments).await,
            "EXISTS" => exists(store, arguments).await,
            "TYPE" => type_command(store, arguments).await,
            "ZADD" => zadd(store, aof, arguments).await,
            "ZREM" => zrem(store, aof, arguments).await,
            "ZSCORE" => zscore(store, arguments).await,
            "ZRANK" => zrank(store, arguments, false).await,
            "ZREVRANK" => zrank(store, arguments, true).await,
            "ZRANGE" => zrange(store, arguments, false).await,
            "ZREVRANGE" => zrange(store, arguments, true).await,
            "ZRANGEBYSCORE" => zrange_by_score(store, arguments, false).await,
            "ZREVRANGEBYSCORE" => zrange_by_score(store, arguments, true).await,
            "ZREMRANGEBYRANK" => zremrangebyrank(store, aof, arguments).await,
            "ZREMRANGEBYSCORE" => zremrangebyscore(store, aof, arguments).await,
            "ZCOUNT" => zcount(store, arguments).await,
            "ZCARD" => zcard(store, arguments).await,
            "BGREWRITEAOF" => bgrewriteaof(store, aof, arguments).await,
            _ => Err(CommandError::UnknownCommand(self.name.clone())),
        }
    }
}
