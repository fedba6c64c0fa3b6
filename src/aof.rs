//! The append-only file.
//!
//! Every successful write command is re-encoded as a RESP array and handed to
//! a single writer task over a channel. Commands are sent while the shard
//! lock of the key they touched is still held, so for any one key the log
//! order is the order the writes were applied in.
//!
//! A rewrite snapshots the whole keyspace under every shard read lock and
//! queues the snapshot behind the writes already sent. The writer swaps in
//! the compacted file, and the writes that follow land in the new file.
//!
//! If an append fails the log no longer matches memory. The handle then
//! reports itself unhealthy and write commands are refused until a rewrite
//! has written a complete snapshot.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    str::FromStr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use bytes::BytesMut;
use thiserror::Error;
use tokio::{
    fs::{self, File, OpenOptions},
    io::AsyncWriteExt,
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tracing::{error, info, warn};

use crate::{
    commands::{zset_utils::format_score, CommandHandler},
    key_value_store::{DataType, KeyValueStore, Shard},
    resp::{RespError, RespValue},
};

/// Members per ZADD when a large set is written out by a rewrite.
const REWRITE_ITEMS_PER_COMMAND: usize = 64;

#[derive(Error, Debug)]
pub enum AofError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt append only file: {0}")]
    Corrupt(#[from] RespError),
    #[error("failed to replay command {command}: {reason}")]
    Replay { command: String, reason: String },
    #[error("append only file writer has stopped")]
    WriterClosed,
}

/// When the writer forces appended data to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendFsync {
    /// `sync_data` after every command.
    Always,
    /// Leave it to the operating system.
    No,
}

impl FromStr for AppendFsync {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "always" => Ok(AppendFsync::Always),
            "no" => Ok(AppendFsync::No),
            _ => Err(()),
        }
    }
}

enum AofMessage {
    Append(RespValue),
    Rewrite {
        commands: Vec<RespValue>,
        done: oneshot::Sender<Result<(), String>>,
    },
}

/// Handle to the writer task. Cloned into every connection.
///
/// The writer exits once every handle is dropped and the queue is drained.
#[derive(Debug, Clone)]
pub struct Aof {
    sender: mpsc::UnboundedSender<AofMessage>,
    healthy: Arc<AtomicBool>,
}

impl Aof {
    /// Opens (or creates) the log at `path` and starts the writer task.
    pub async fn open(
        path: impl Into<PathBuf>,
        fsync: AppendFsync,
    ) -> Result<(Self, JoinHandle<()>), AofError> {
        let path = path.into();
        let file = open_for_append(&path).await?;

        let (sender, receiver) = mpsc::unbounded_channel();
        let healthy = Arc::new(AtomicBool::new(true));

        let writer = AofWriter {
            path,
            file,
            fsync,
            healthy: Arc::clone(&healthy),
        };
        let handle = tokio::spawn(writer.run(receiver));

        Ok((Self { sender, healthy }, handle))
    }

    /// False once an append has failed, until the next successful rewrite.
    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Acquire)
    }

    /// Queues a command for the log.
    pub fn append(&self, command: RespValue) {
        if self.sender.send(AofMessage::Append(command)).is_err() {
            error!("append only file writer has stopped, command not logged");
        }
    }

    /// Snapshots `store` and queues a rewrite of the log.
    ///
    /// Returns once the snapshot is queued. The receiver resolves when the
    /// writer has swapped in the new file, with the failure reason if it
    /// could not.
    pub async fn rewrite(
        &self,
        store: &KeyValueStore,
    ) -> Result<oneshot::Receiver<Result<(), String>>, AofError> {
        let shards = store.read_all().await;
        let commands = snapshot_commands(shards.iter().map(|shard| &**shard));

        let (done, receiver) = oneshot::channel();
        self.sender
            .send(AofMessage::Rewrite { commands, done })
            .map_err(|_| AofError::WriterClosed)?;

        drop(shards);
        Ok(receiver)
    }
}

struct AofWriter {
    path: PathBuf,
    file: File,
    fsync: AppendFsync,
    healthy: Arc<AtomicBool>,
}

impl AofWriter {
    async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<AofMessage>) {
        while let Some(message) = receiver.recv().await {
            match message {
                AofMessage::Append(command) => {
                    if let Err(err) = self.write(&command).await {
                        error!(path = %self.path.display(), "failed to append command: {}", err);

                        if self.healthy.swap(false, Ordering::AcqRel) {
                            error!("refusing write commands until BGREWRITEAOF succeeds");
                        }
                    }
                }
                AofMessage::Rewrite { commands, done } => {
                    let result = self.rewrite(&commands).await;

                    match &result {
                        Ok(()) => {
                            info!(
                                path = %self.path.display(),
                                commands = commands.len(),
                                "append only file rewritten"
                            );
                            self.healthy.store(true, Ordering::Release);
                        }
                        Err(err) => error!(path = %self.path.display(), "rewrite failed: {}", err),
                    }

                    let _ = done.send(result.map_err(|err| err.to_string()));
                }
            }
        }

        if let Err(err) = self.file.sync_all().await {
            error!(path = %self.path.display(), "failed to sync append only file: {}", err);
        }
    }

    async fn write(&mut self, command: &RespValue) -> Result<(), AofError> {
        self.file.write_all(command.encode().as_bytes()).await?;
        self.file.flush().await?;

        if self.fsync == AppendFsync::Always {
            self.file.sync_data().await?;
        }

        Ok(())
    }

    /// Writes `commands` to a temporary file, renames it over the log and
    /// reopens the log for appending. On failure the old log stays in use.
    async fn rewrite(&mut self, commands: &[RespValue]) -> Result<(), AofError> {
        let temp_path = temp_path(&self.path);

        let mut temp = File::create(&temp_path).await?;
        let mut contents = String::new();
        for command in commands {
            contents.push_str(&command.encode());
        }
        temp.write_all(contents.as_bytes()).await?;
        temp.sync_all().await?;
        drop(temp);

        if let Err(err) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(err.into());
        }

        self.file = open_for_append(&self.path).await?;
        Ok(())
    }
}

async fn open_for_append(path: &Path) -> Result<File, AofError> {
    Ok(OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".rewrite");
    path.with_file_name(name)
}

/// The shortest command list that rebuilds the given shards.
pub fn snapshot_commands<'a>(shards: impl IntoIterator<Item = &'a Shard>) -> Vec<RespValue> {
    let mut commands = Vec::new();

    for shard in shards {
        for (key, value) in shard.iter() {
            match value {
                DataType::String(value) => {
                    commands.push(RespValue::command("SET", &[key.clone(), value.clone()]));
                }
                DataType::SortedSet(set) => {
                    let elements = set.iter().collect::<Vec<_>>();

                    for chunk in elements.chunks(REWRITE_ITEMS_PER_COMMAND) {
                        let mut arguments = Vec::with_capacity(chunk.len() * 2 + 1);
                        arguments.push(key.clone());
                        for element in chunk {
                            arguments.push(format_score(element.score));
                            arguments.push(element.member.clone());
                        }
                        commands.push(RespValue::command("ZADD", &arguments));
                    }
                }
            }
        }
    }

    commands
}

/// Replays the log at `path` into `store`, returning the number of commands
/// applied. A missing file is an empty log.
///
/// A trailing partial command, left by a crash mid-write, is skipped with a
/// warning. Anything else that fails to decode or apply is an error.
pub async fn load(path: &Path, store: &KeyValueStore) -> Result<usize, AofError> {
    let contents = match fs::read(path).await {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(0),
        Err(err) => return Err(err.into()),
    };

    let mut buffer = BytesMut::from(&contents[..]);
    let commands = RespValue::parse(&mut buffer)?;

    if !buffer.is_empty() {
        warn!(
            path = %path.display(),
            bytes = buffer.len(),
            "append only file ends with a truncated command, ignoring it"
        );
    }

    let count = commands.len();

    for command in commands {
        let description = command.encode();
        let handler = CommandHandler::new(command).map_err(|err| AofError::Replay {
            command: description.clone(),
            reason: err.to_string(),
        })?;

        handler
            .handle_command(store, None)
            .await
            .map_err(|err| AofError::Replay {
                command: description,
                reason: err.to_string(),
            })?;
    }

    info!(path = %path.display(), commands = count, "append only file loaded");
    Ok(count)
}
