use crate::constants::{ACCEPT_BACKOFF, MAX_LINE_LENGTH};
use crate::core_command::Outcome;
use crate::core_error::error::CommandError;
use crate::server::ServerContext;
use crate::session::Session;
use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::net::{TcpListener, TcpStream};

/// Source of incoming client connections.
#[async_trait]
pub trait Acceptor: Send {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    async fn accept(&mut self) -> io::Result<(Self::Stream, SocketAddr)>;
}

#[async_trait]
impl Acceptor for TcpListener {
    type Stream = TcpStream;

    async fn accept(&mut self) -> io::Result<(TcpStream, SocketAddr)> {
        TcpListener::accept(self).await
    }
}

/// Accepts connections and spawns one handler task per client.
///
/// Stops when `shutdown` completes or, if `limit` is set, once that many
/// connections were accepted. Failed accepts are logged and retried after a
/// short pause. The
/// acceptor is dropped on return, which closes a TCP listener; handlers
/// already running are left alone. Returns the number of accepted
/// connections.
pub async fn serve<A, F>(
    mut acceptor: A,
    context: Arc<ServerContext>,
    shutdown: F,
    limit: Option<usize>,
) -> usize
where
    A: Acceptor,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut accepted = 0;

    loop {
        if limit.is_some_and(|max| accepted >= max) {
            info!("Accept limit of {} connections reached.", accepted);
            break;
        }

        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested, no longer accepting connections.");
                break;
            }
            result = acceptor.accept() => match result {
                Ok((stream, addr)) => {
                    accepted += 1;
                    info!("New connection from {}", addr);

                    let context = Arc::clone(&context);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, context).await {
                            warn!("Connection error for {}: {:?}", addr, e);
                        }
                        info!("Connection closed for {}", addr);
                    });
                }
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            },
        }
    }

    accepted
}

/// Drives one client: greeting, then one command per line until the client
/// disconnects, the stream fails, or it sends `quit`.
///
/// The write half is shut down on every exit path.
pub async fn handle_connection<S>(stream: S, context: Arc<ServerContext>) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(reader);
    let mut session = Session::new(Arc::clone(&context.root), Arc::clone(&context.jail));

    let result = run_session(&mut session, &mut reader, &mut writer, &context.banner).await;

    if let Err(e) = writer.shutdown().await {
        debug!("Failed to shut down client stream: {}", e);
    }
    result
}

async fn run_session<R, W>(
    session: &mut Session,
    reader: &mut R,
    writer: &mut W,
    banner: &str,
) -> Result<()>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    session
        .greet(writer, banner)
        .await
        .context("Failed to send greeting")?;

    let mut buf = Vec::new();
    loop {
        let outcome = match read_client_line(reader, &mut buf)
            .await
            .context("Failed to read from client")?
        {
            ClientLine::Line(line) => {
                debug!("User input: {}", line);
                session.execute(writer, &line).await
            }
            ClientLine::TooLong => {
                warn!("Discarded input line over {} bytes", MAX_LINE_LENGTH);
                session
                    .reject(writer, CommandError::LineTooLong(MAX_LINE_LENGTH))
                    .await
            }
            ClientLine::Eof => break,
        }
        .context("Failed to write response")?;

        if let Outcome::Quit = outcome {
            info!("Client quit from {}", session.relative_path());
            return Ok(());
        }
    }

    info!("Client disconnected");
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum ClientLine {
    Line(String),
    TooLong,
    Eof,
}

/// Reads one line of at most `MAX_LINE_LENGTH` bytes, terminator included.
///
/// Invalid UTF-8 is replaced rather than rejected. An overlong line is
/// drained up to its newline and reported as `TooLong`, so the next read
/// starts on a fresh line.
async fn read_client_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<ClientLine>
where
    R: AsyncBufRead + Unpin + Send,
{
    buf.clear();
    let read = (&mut *reader)
        .take(MAX_LINE_LENGTH as u64)
        .read_until(b'\n', buf)
        .await?;
    if read == 0 {
        return Ok(ClientLine::Eof);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    } else if read >= MAX_LINE_LENGTH {
        skip_rest_of_line(reader).await?;
        return Ok(ClientLine::TooLong);
    }

    Ok(ClientLine::Line(String::from_utf8_lossy(buf).into_owned()))
}

async fn skip_rest_of_line<R>(reader: &mut R) -> io::Result<()>
where
    R: AsyncBufRead + Unpin + Send,
{
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(());
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(end) => {
                reader.consume(end + 1);
                return Ok(());
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}
