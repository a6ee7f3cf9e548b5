use crate::constants::MAX_CAT_SIZE;
use crate::core_command::Outcome;
use crate::core_error::error::CommandError;
use crate::session::Session;
use log::{info, warn};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWrite};

/// Handles the `cat` command.
///
/// Streams the file verbatim when it is a regular file of at most 1 MiB.
/// Every check happens before the first byte is written, so a rejected file
/// produces no partial output.
pub async fn handle_cat_command<W>(
    writer: &mut W,
    session: &Session,
    target: &str,
) -> Result<Outcome, CommandError>
where
    W: AsyncWrite + Unpin + Send + ?Sized,
{
    let cant_open = |reason: String| {
        warn!("Can't open {:?}: {}", target, reason);
        CommandError::CantOpen(target.to_string())
    };

    let path = session
        .jail()
        .resolve(session.root(), session.current_path(), target)
        .await
        .map_err(|e| cant_open(e.to_string()))?;

    let file = File::open(&path)
        .await
        .map_err(|e| cant_open(e.to_string()))?;
    let metadata = file
        .metadata()
        .await
        .map_err(|e| cant_open(e.to_string()))?;

    if metadata.is_dir() {
        return Err(cant_open("is a directory".to_string()));
    }
    if metadata.len() > MAX_CAT_SIZE {
        warn!("Refusing to send {}: {} bytes", path, metadata.len());
        return Err(CommandError::FileTooBig(target.to_string(), metadata.len()));
    }

    // The cap also holds if the file grows after the size check.
    let mut limited = file.take(MAX_CAT_SIZE);
    let sent = tokio::io::copy(&mut limited, writer).await?;
    info!("File transfer completed successfully: {} ({} bytes)", path, sent);

    Ok(Outcome::Completed)
}
