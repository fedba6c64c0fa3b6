use std::{future::Future, path::PathBuf, sync::Arc};

use serde::Deserialize;
use thiserror::Error;
use tokio::{
    net::TcpListener,
    sync::broadcast,
    task::{JoinError, JoinSet},
};
use tracing::{error, info, Level};

use crate::{
    aof::{Aof, AppendFsync},
    connection::handle_client_connection,
    key_value_store::{KeyValueStore, DEFAULT_SHARD_COUNT},
};

#[derive(Error, Debug, PartialEq)]
pub enum CliError {
    #[error("Invalid command line flag")]
    InvalidCommandLineFlag,
    #[error("Invalid command line flag value")]
    InvalidCommandLineFlagValue,
    #[error("Invalid config file: {0}")]
    InvalidConfigFile(String),
}

const FLAGS: [&str; 8] = [
    "--config",
    "--port",
    "--dir",
    "--appendonly",
    "--appendfilename",
    "--appendfsync",
    "--loglevel",
    "--shards",
];

/// Settings read from a YAML file given with `--config`. Every field is
/// optional and named after the flag that overrides it.
///
/// ```yaml
/// port: 7000
/// dir: /var/lib/zedis
/// appendonly: true
/// appendfsync: "no"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub port: Option<u32>,
    pub dir: Option<PathBuf>,
    pub appendonly: Option<bool>,
    pub appendfilename: Option<String>,
    pub appendfsync: Option<String>,
    pub loglevel: Option<String>,
    pub shards: Option<usize>,
}

impl FileConfig {
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, CliError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::InvalidConfigFile(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, CliError> {
        // An empty document deserializes as unit, not as a map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| CliError::InvalidConfigFile(e.to_string()))
    }

    /// The settings as `(flag, value)` pairs, in the form the command line uses.
    fn into_flags(self) -> Vec<(&'static str, String)> {
        let mut flags = Vec::new();

        if let Some(port) = self.port {
            flags.push(("--port", port.to_string()));
        }
        if let Some(dir) = self.dir {
            flags.push(("--dir", dir.to_string_lossy().into_owned()));
        }
        if let Some(append_only) = self.appendonly {
            flags.push(("--appendonly", if append_only { "yes" } else { "no" }.to_string()));
        }
        if let Some(name) = self.appendfilename {
            flags.push(("--appendfilename", name));
        }
        if let Some(fsync) = self.appendfsync {
            flags.push(("--appendfsync", fsync));
        }
        if let Some(level) = self.loglevel {
            flags.push(("--loglevel", level));
        }
        if let Some(shards) = self.shards {
            flags.push(("--shards", shards.to_string()));
        }

        flags
    }
}

/// Server configuration, read from an optional YAML file and the command line.
#[derive(Debug)]
pub struct RedisServer {
    pub port: u32,
    /// Directory holding the append only file
    pub dir: PathBuf,
    pub append_only: bool,
    pub append_filename: String,
    pub append_fsync: AppendFsync,
    pub log_level: Level,
    pub shards: usize,
}

impl RedisServer {
    /// Parses the process arguments. The first item is the program name.
    ///
    /// # Flags
    ///
    /// * `--config <path>`: YAML file with any of the settings below.
    ///   Flags given on the command line win over the file.
    /// * `--port <1-65535>` (6379)
    /// * `--dir <path>` (`.`)
    /// * `--appendonly yes|no` (no)
    /// * `--appendfilename <name>` (`appendonly.aof`)
    /// * `--appendfsync always|no` (always)
    /// * `--loglevel error|warn|info|debug|trace` (info)
    /// * `--shards <n>` (16)
    pub fn new<I: IntoIterator<Item = String>>(command_line_args: I) -> Result<Self, CliError> {
        let mut iter = command_line_args.into_iter().skip(1);
        let mut flags = Vec::new();
        let mut config_path = None;

        while let Some(arg) = iter.next() {
            let Some(value) = iter.next() else {
                return Err(if FLAGS.contains(&arg.as_str()) {
                    CliError::InvalidCommandLineFlagValue
                } else {
                    CliError::InvalidCommandLineFlag
                });
            };

            match arg.as_str() {
                "--config" => config_path = Some(PathBuf::from(value)),
                _ if FLAGS.contains(&arg.as_str()) => flags.push((arg, value)),
                _ => return Err(CliError::InvalidCommandLineFlag),
            }
        }

        let mut server = RedisServer::default();

        if let Some(path) = config_path {
            for (flag, value) in FileConfig::from_file(&path)?.into_flags() {
                server.apply_flag(flag, value).map_err(|_| {
                    CliError::InvalidConfigFile(format!(
                        "{}: invalid value for {}",
                        path.display(),
                        flag.trim_start_matches("--")
                    ))
                })?;
            }
        }

        for (flag, value) in flags {
            server.apply_flag(&flag, value)?;
        }

        Ok(server)
    }

    fn apply_flag(&mut self, flag: &str, value: String) -> Result<(), CliError> {
        match flag {
            "--port" => {
                let port_number = value
                    .parse::<u32>()
                    .map_err(|_| CliError::InvalidCommandLineFlagValue)?;

                if !(1..=65535).contains(&port_number) {
                    return Err(CliError::InvalidCommandLineFlagValue);
                }

                self.port = port_number;
            }
            "--dir" => self.dir = PathBuf::from(value),
            "--appendonly" => {
                self.append_only = match value.to_lowercase().as_str() {
                    "yes" => true,
                    "no" => false,
                    _ => return Err(CliError::InvalidCommandLineFlagValue),
                };
            }
            "--appendfilename" => {
                if value.is_empty() || value.contains('/') {
                    return Err(CliError::InvalidCommandLineFlagValue);
                }
                self.append_filename = value;
            }
            "--appendfsync" => {
                self.append_fsync = value
                    .parse()
                    .map_err(|_| CliError::InvalidCommandLineFlagValue)?;
            }
            "--loglevel" => {
                self.log_level = value
                    .parse()
                    .map_err(|_| CliError::InvalidCommandLineFlagValue)?;
            }
            "--shards" => {
                self.shards = match value.parse::<usize>() {
                    Ok(shards) if shards > 0 => shards,
                    _ => return Err(CliError::InvalidCommandLineFlagValue),
                };
            }
            _ => return Err(CliError::InvalidCommandLineFlag),
        }

        Ok(())
    }

    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// Where the append only file lives: `<dir>/<appendfilename>`.
    pub fn aof_path(&self) -> PathBuf {
        self.dir.join(&self.append_filename)
    }
}

impl Default for RedisServer {
    fn default() -> Self {
        Self {
            port: 6379,
            dir: PathBuf::from("."),
            append_only: false,
            append_filename: "appendonly.aof".to_string(),
            append_fsync: AppendFsync::Always,
            log_level: Level::INFO,
            shards: DEFAULT_SHARD_COUNT,
        }
    }
}

/// Accepts clients on `listener` until `shutdown` resolves.
///
/// Each client runs on its own task. On shutdown the clients are told to
/// stop, and this returns once every one of them has finished.
pub async fn serve(
    listener: TcpListener,
    store: Arc<KeyValueStore>,
    aof: Option<Aof>,
    shutdown: impl Future<Output = ()>,
) {
    let (notify_shutdown, _) = broadcast::channel::<()>(1);
    let mut connections = JoinSet::new();

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("shutdown requested, no longer accepting connections");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, client_address)) => {
                    connections.spawn(handle_client_connection(
                        stream,
                        client_address,
                        Arc::clone(&store),
                        aof.clone(),
                        notify_shutdown.subscribe(),
                    ));
                }
                Err(e) => error!("failed to accept connection: {}", e),
            },
            // Reap finished connections.
            Some(result) = connections.join_next(), if !connections.is_empty() => {
                log_connection_result(result);
            }
        }
    }

    let _ = notify_shutdown.send(());

    while let Some(result) = connections.join_next().await {
        log_connection_result(result);
    }

    info!("all connections closed");
}

fn log_connection_result(result: Result<(), JoinError>) {
    if let Err(e) = result {
        error!("connection task failed: {}", e);
    }
}

/// Resolves once the process receives SIGINT, SIGTERM, SIGQUIT or SIGHUP.
///
/// The handlers are installed before this returns, so a signal that arrives
/// before the future is first polled is not lost.
#[cfg(unix)]
pub fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut quit = signal(SignalKind::quit())?;
    let mut hangup = signal(SignalKind::hangup())?;

    Ok(async move {
        let name = tokio::select! {
            _ = interrupt.recv() => "SIGINT",
            _ = terminate.recv() => "SIGTERM",
            _ = quit.recv() => "SIGQUIT",
            _ = hangup.recv() => "SIGHUP",
        };
        info!(signal = name, "received shutdown signal");
    })
}

#[cfg(not(unix))]
pub fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    Ok(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for ctrl-c: {}", e);
        }
    })
}
