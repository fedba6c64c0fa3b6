use std::{env, sync::Arc};

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use zedis::{
    aof::{self, Aof},
    key_value_store::KeyValueStore,
    server::{serve, shutdown_signal, RedisServer},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let server = RedisServer::new(env::args()).context("failed to parse command line")?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(server.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install log subscriber")?;

    let store = Arc::new(KeyValueStore::with_shards(server.shards));

    let (aof, writer) = if server.append_only {
        let path = server.aof_path();
        aof::load(&path, &store)
            .await
            .with_context(|| format!("failed to load {}", path.display()))?;

        let (aof, writer) = Aof::open(&path, server.append_fsync)
            .await
            .with_context(|| format!("failed to open {}", path.display()))?;
        (Some(aof), Some(writer))
    } else {
        (None, None)
    };

    let listener = TcpListener::bind(server.address())
        .await
        .with_context(|| format!("failed to bind {}", server.address()))?;
    info!(address = %server.address(), "server listening");

    let shutdown = shutdown_signal().context("failed to install signal handlers")?;
    serve(listener, store, aof, shutdown).await;

    // Every handle is gone once serve returns; wait for the writer to drain.
    if let Some(writer) = writer {
        writer.await.context("append only file writer panicked")?;
    }

    info!("server stopped");
    Ok(())
}
