use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::EnvFilter;

use crate::codec::FrameCodec;
use crate::commands::Command;
use crate::config::Config;
use crate::connection::Connection;
use crate::context::Context;
use crate::frame::Frame;
use crate::store::Store;
use crate::transaction::Transaction;
use crate::Error;

pub async fn run(config: Config) -> Result<(), Error> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| debug!("Failed to initialize global tracing: {}", e));

    let snapshot = config.snapshot();
    // The handle is held, not read, for as long as the server runs.
    let _snapshot_file = snapshot.open().await.map_err(|e| {
        error!(path = %snapshot.path().display(), "Failed to open snapshot file: {}", e);
        e
    })?;

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .map_err(|e| {
            error!(host = %config.host, port = config.port, "Failed to bind: {}", e);
            e
        })?;

    let ctx = Context::new(Store::new(), snapshot);

    serve(listener, ctx, FrameCodec::new(config.max_frame_size)).await
}

/// Accepts connections forever, handling each one on its own task.
pub async fn serve(listener: TcpListener, ctx: Context, codec: FrameCodec) -> Result<(), Error> {
    info!("Server listening on {}", listener.local_addr()?);

    loop {
        let (socket, client_address) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("Failed to accept connection: {}", e);
                continue;
            }
        };
        info!("Accepted connection from {:?}", client_address);

        let conn = Connection::with_codec(socket, codec.clone());
        let ctx = ctx.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(conn, client_address, ctx).await {
                error!("Connection ended with an error: {}", e);
            }
        });
    }
}

#[instrument(
    name = "connection",
    skip(conn, ctx),
    fields(connection_id, client_address)
)]
pub async fn handle_connection<T>(
    mut conn: Connection<T>,
    client_address: SocketAddr,
    ctx: Context,
) -> Result<(), Error>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    tracing::Span::current()
        .record("connection_id", tracing::field::display(&conn.id))
        .record("client_address", tracing::field::display(&client_address));

    let mut transaction = Transaction::new();

    loop {
        let frame = match conn.read_frame().await {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read frame: {}", e);
                // Best effort, the connection is dropped either way.
                let _ = conn.write_frame(Frame::generic_error(&e)).await;
                return Err(e);
            }
        };

        debug!("Received frame from client: {}", frame);

        let reply = match frame {
            Frame::Array(_) => match Command::try_from(frame) {
                Ok(command) => {
                    debug!(command = command.name(), "Executing command");
                    transaction.handle(command, &ctx)
                }
                Err(e) => Frame::generic_error(e),
            },
            _ => Frame::generic_error("invalid request"),
        };

        debug!("Sending response to client: {}", reply);
        conn.write_frame(reply).await?;
    }

    info!("Connection closed");
    Ok(())
}
