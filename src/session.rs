use crate::constants::HELP_TEXT;
use crate::core_command::handlers::dispatch;
use crate::core_command::Outcome;
use crate::core_error::error::CommandError;
use crate::core_jail::{PathJail, Root};
use crate::helpers::send_response;
use log::{debug, warn};
use std::fmt;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Per-connection state: the shared sandbox root and this client's
/// working path.
///
/// A session is owned by exactly one connection task and never shared, so
/// none of its state is synchronized.
pub struct Session {
    root: Arc<Root>,
    current_path: String,
    jail: Arc<dyn PathJail>,
}

impl Session {
    /// Starts a session at the sandbox root.
    pub fn new(root: Arc<Root>, jail: Arc<dyn PathJail>) -> Self {
        let current_path = root.as_str().to_string();
        Self {
            root,
            current_path,
            jail,
        }
    }

    pub fn root(&self) -> &Root {
        &self.root
    }

    pub fn jail(&self) -> &dyn PathJail {
        &*self.jail
    }

    /// Absolute working path, always the root or below it.
    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    pub(crate) fn set_current_path(&mut self, path: String) {
        debug_assert!(self.root.contains(&path), "{} escapes the root", path);
        self.current_path = path;
    }

    /// Working path as the client sees it.
    pub fn relative_path(&self) -> String {
        self.root.relative(&self.current_path)
    }

    pub fn prompt(&self) -> String {
        format!("$ {} > ", self.relative_path())
    }

    /// Writes the banner, the help text and the first prompt.
    pub async fn greet<W>(&self, writer: &mut W, banner: &str) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        let greeting = format!("\n{}\nWelcome.\n{}{}", banner, HELP_TEXT, self.prompt());
        send_response(writer, greeting.as_bytes()).await?;
        writer.flush().await
    }

    /// Executes one raw input line and writes its response followed by the
    /// prompt.
    ///
    /// Command failures are reported to the client and returned as
    /// `Outcome::Rejected`; only a failing client stream yields `Err`.
    pub async fn execute<W>(&mut self, writer: &mut W, line: &str) -> std::io::Result<Outcome>
    where
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        debug!("Executing command: {}", line);

        let outcome = match dispatch(writer, self, line).await {
            Ok(outcome) => outcome,
            Err(CommandError::Io(e)) => return Err(e),
            Err(e) => {
                warn!("Command {:?} rejected: {}", line.trim(), e);
                return self.reject(writer, e).await;
            }
        };

        send_response(writer, self.prompt().as_bytes()).await?;
        writer.flush().await?;
        Ok(outcome)
    }

    /// Reports `error` to the client, followed by the prompt.
    pub async fn reject<W>(&self, writer: &mut W, error: CommandError) -> std::io::Result<Outcome>
    where
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        send_response(writer, error.to_client_message().as_bytes()).await?;
        send_response(writer, self.prompt().as_bytes()).await?;
        writer.flush().await?;
        Ok(Outcome::Rejected(error))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("root", &self.root)
            .field("current_path", &self.current_path)
            .finish_non_exhaustive()
    }
}
