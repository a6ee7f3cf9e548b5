// Connection handler and accept loop, driven over in-memory and TCP streams

use super::network::{handle_connection, serve, Acceptor};
use crate::constants::{ACCEPT_BACKOFF, DEFAULT_BANNER, MAX_LINE_LENGTH};
use crate::core_jail::{LexicalJail, Root};
use crate::server::ServerContext;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{timeout, Instant};

fn sandbox() -> (TempDir, Arc<ServerContext>) {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("tt")).unwrap();
    std::fs::write(dir.path().join("test.txt"), b"some text\n").unwrap();
    let root = Root::open(dir.path().to_str().unwrap()).unwrap();
    let context = ServerContext {
        root: Arc::new(root),
        jail: Arc::new(LexicalJail),
        banner: DEFAULT_BANNER.to_string(),
    };
    (dir, Arc::new(context))
}

async fn read_to_end<S: AsyncRead + Unpin>(stream: &mut S) -> String {
    let mut out = Vec::new();
    timeout(Duration::from_secs(5), stream.read_to_end(&mut out))
        .await
        .expect("connection was not closed")
        .unwrap();
    String::from_utf8(out).unwrap()
}

/// Hands out scripted connections, then waits forever.
struct ScriptedAcceptor {
    script: VecDeque<io::Result<DuplexStream>>,
    accepted: usize,
}

impl ScriptedAcceptor {
    fn new(script: Vec<io::Result<DuplexStream>>) -> Self {
        Self {
            script: script.into(),
            accepted: 0,
        }
    }
}

#[async_trait]
impl Acceptor for ScriptedAcceptor {
    type Stream = DuplexStream;

    async fn accept(&mut self) -> io::Result<(DuplexStream, SocketAddr)> {
        match self.script.pop_front() {
            Some(result) => {
                let stream = result?;
                self.accepted += 1;
                let addr = SocketAddr::from(([127, 0, 0, 1], 40000 + self.accepted as u16));
                Ok((stream, addr))
            }
            None => std::future::pending().await,
        }
    }
}

#[tokio::test]
async fn test_handler_closes_on_eof() {
    let (_dir, context) = sandbox();
    let (mut client, server) = tokio::io::duplex(64 * 1024);

    let handler = tokio::spawn(handle_connection(server, context));
    client.shutdown().await.unwrap();

    let out = read_to_end(&mut client).await;
    assert!(out.contains("Welcome"));
    assert!(out.ends_with("$ / > "));
    handler.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_handler_session_script() {
    let (_dir, context) = sandbox();
    let (mut client, server) = tokio::io::duplex(64 * 1024);

    let handler = tokio::spawn(handle_connection(server, context));
    client
        .write_all(b"ls\r\ncd tt\ncd ..\ncat test.txt\nfoobar\nquit\nls\n")
        .await
        .unwrap();

    let out = read_to_end(&mut client).await;
    assert!(out.contains("test.txt"));
    assert!(out.contains("$ /tt > "));
    assert!(out.contains("some text\n$ / > "));
    assert!(out.contains("Invalid command: foobar"));
    // quit closes the connection; the trailing ls is never run
    assert!(out.ends_with("Bye!\n$ / > "));
    assert_eq!(out.matches("Type").count(), 1);
    handler.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_handler_survives_invalid_utf8() {
    let (_dir, context) = sandbox();
    let (mut client, server) = tokio::io::duplex(64 * 1024);

    let handler = tokio::spawn(handle_connection(server, context));
    client.write_all(b"cat caf\xe9.txt\nls\n").await.unwrap();
    client.shutdown().await.unwrap();

    let out = read_to_end(&mut client).await;
    assert!(out.contains("Can't open the file"));
    assert!(out.contains("test.txt"));
    assert!(out.ends_with("$ / > "));
    handler.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_handler_rejects_overlong_line() {
    let (_dir, context) = sandbox();
    let (mut client, server) = tokio::io::duplex(64 * 1024);

    let handler = tokio::spawn(handle_connection(server, context));
    let mut input = vec![b'a'; MAX_LINE_LENGTH + 10];
    input.extend(b"\nls\n");
    client.write_all(&input).await.unwrap();
    client.shutdown().await.unwrap();

    let out = read_to_end(&mut client).await;
    assert!(out.contains("Line too long"));
    assert!(!out.contains("Invalid command"));
    assert!(out.contains("test.txt"));
    assert!(out.ends_with("$ / > "));
    handler.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_handler_overlong_line_without_newline() {
    let (_dir, context) = sandbox();
    let (mut client, server) = tokio::io::duplex(64 * 1024);

    let handler = tokio::spawn(handle_connection(server, context));
    client
        .write_all(&vec![b'a'; MAX_LINE_LENGTH * 3])
        .await
        .unwrap();
    client.shutdown().await.unwrap();

    let out = read_to_end(&mut client).await;
    assert!(out.ends_with("Line too long\n$ / > "));
    handler.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let (_dir, context) = sandbox();
    let (mut first, first_server) = tokio::io::duplex(64 * 1024);
    let (mut second, second_server) = tokio::io::duplex(64 * 1024);

    tokio::spawn(handle_connection(first_server, Arc::clone(&context)));
    tokio::spawn(handle_connection(second_server, Arc::clone(&context)));

    first.write_all(b"cd tt\n").await.unwrap();
    first.shutdown().await.unwrap();
    second.write_all(b"ls\n").await.unwrap();
    second.shutdown().await.unwrap();

    assert!(read_to_end(&mut first).await.ends_with("$ /tt > "));
    assert!(read_to_end(&mut second).await.ends_with("$ / > "));
}

#[tokio::test]
async fn test_serve_skips_failed_accepts_and_honors_limit() {
    let (_dir, context) = sandbox();
    let (mut first, first_server) = tokio::io::duplex(64 * 1024);
    let (mut second, second_server) = tokio::io::duplex(64 * 1024);

    let acceptor = ScriptedAcceptor::new(vec![
        Err(io::Error::new(io::ErrorKind::ConnectionAborted, "aborted")),
        Ok(first_server),
        Err(io::Error::new(io::ErrorKind::Other, "No more accept")),
        Ok(second_server),
    ]);

    let started = Instant::now();
    let accepted = timeout(
        Duration::from_secs(5),
        serve(acceptor, context, std::future::pending(), Some(2)),
    )
    .await
    .unwrap();
    assert_eq!(accepted, 2);
    // each failure pauses the loop before the next accept
    assert!(started.elapsed() >= ACCEPT_BACKOFF * 2);

    for client in [&mut first, &mut second] {
        client.write_all(b"quit\n").await.unwrap();
        assert!(read_to_end(client).await.ends_with("Bye!\n$ / > "));
    }
}

#[tokio::test]
async fn test_serve_stops_on_shutdown() {
    let (_dir, context) = sandbox();
    let acceptor = ScriptedAcceptor::new(Vec::new());

    let accepted = timeout(
        Duration::from_secs(5),
        serve(acceptor, context, async {}, None),
    )
    .await
    .unwrap();
    assert_eq!(accepted, 0);
}

#[tokio::test]
async fn test_serve_over_tcp() {
    let (_dir, context) = sandbox();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(serve(listener, context, std::future::pending(), Some(1)));

    let mut client = TcpStream::connect(addr).await.unwrap();
    client.write_all(b"cd tt\nquit\n").await.unwrap();
    let out = read_to_end(&mut client).await;
    assert!(out.contains("$ /tt > "));
    assert!(out.ends_with("Bye!\n$ /tt > "));

    assert_eq!(server.await.unwrap(), 1);
    // the listener was dropped when the loop ended
    assert!(TcpStream::connect(addr).await.is_err());
}
