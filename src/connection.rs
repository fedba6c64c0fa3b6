use std::{net::SocketAddr, sync::Arc};

use bytes::BytesMut;
use tokio::{io::AsyncWriteExt, net::TcpStream, sync::broadcast};
use tracing::{debug, info, warn};

use crate::{
    aof::Aof,
    commands::CommandHandler,
    input::{read_and_parse_resp, CommandReadError},
    key_value_store::KeyValueStore,
};

/// Serves one client until it disconnects, sends bad RESP, or the server
/// shuts down.
///
/// Shutdown is only observed between reads, so a command that has started
/// always finishes and gets its reply.
pub async fn handle_client_connection(
    mut stream: TcpStream,
    client_address: SocketAddr,
    store: Arc<KeyValueStore>,
    aof: Option<Aof>,
    mut shutdown: broadcast::Receiver<()>,
) {
    info!(client = %client_address, "client connected");

    let mut buffer = BytesMut::with_capacity(4096);

    loop {
        let parsed_input = tokio::select! {
            _ = shutdown.recv() => {
                debug!(client = %client_address, "closing connection for shutdown");
                break;
            }
            result = read_and_parse_resp(&mut stream, &mut buffer) => result,
        };

        let parsed_input = match parsed_input {
            Ok(values) => values,
            Err(CommandReadError::ConnectionClosed) => break,
            Err(e) => {
                warn!(client = %client_address, "closing connection: {}", e);
                let _ = stream.write_all(e.as_string().as_bytes()).await;
                break;
            }
        };

        for input in parsed_input {
            let response = match CommandHandler::new(input) {
                Ok(handler) => match handler.handle_command(&store, aof.as_ref()).await {
                    Ok(response) => response.encode(),
                    Err(e) => {
                        debug!(client = %client_address, command = %handler.name, "command failed: {}", e);
                        e.as_string()
                    }
                },
                Err(e) => e.as_string(),
            };

            if let Err(e) = stream.write_all(response.as_bytes()).await {
                warn!(client = %client_address, "error writing to stream: {}", e);
                return;
            }
        }
    }

    info!(client = %client_address, "client disconnected");
}
