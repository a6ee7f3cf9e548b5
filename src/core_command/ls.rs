use crate::constants::{NAME_DISPLAY_WIDTH, NAME_TRUNCATION_MARKER};
use crate::core_command::Outcome;
use crate::core_error::error::CommandError;
use crate::helpers::{cut, render_table, send_response, to_size};
use crate::session::Session;
use log::{debug, warn};
use std::io;
use tokio::io::AsyncWrite;

/// One row of a listing, read fresh from the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
}

impl DirectoryEntry {
    fn kind(&self) -> &'static str {
        if self.is_dir {
            "dir"
        } else {
            "file"
        }
    }
}

/// Handles the `ls` command: lists the working directory as a table.
pub async fn handle_ls_command<W>(
    writer: &mut W,
    session: &Session,
) -> Result<Outcome, CommandError>
where
    W: AsyncWrite + Unpin + Send + ?Sized,
{
    let path = session.current_path();
    let entries = read_entries(path).await.map_err(|e| {
        warn!("Failed to list {}: {}", path, e);
        CommandError::InvalidPath(session.relative_path())
    })?;
    debug!("Listing {} entries of {}", entries.len(), path);

    send_response(writer, format_listing(&entries).as_bytes()).await?;
    Ok(Outcome::Completed)
}

/// Reads the entries of `path`, sorted by name.
pub async fn read_entries(path: &str) -> io::Result<Vec<DirectoryEntry>> {
    let mut dir = tokio::fs::read_dir(path).await?;
    let mut entries = Vec::new();
    while let Some(entry) = dir.next_entry().await? {
        let metadata = entry.metadata().await?;
        entries.push(DirectoryEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: metadata.is_dir(),
            size: metadata.len(),
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

pub fn format_listing(entries: &[DirectoryEntry]) -> String {
    let mut rows = Vec::with_capacity(entries.len() + 2);
    rows.push(vec!["Type".to_string(), "Size".to_string(), "Name".to_string()]);
    rows.push(vec!["====".to_string(), "====".to_string(), "====".to_string()]);
    for entry in entries {
        rows.push(vec![
            entry.kind().to_string(),
            to_size(entry.size),
            cut(&entry.name, NAME_DISPLAY_WIDTH, NAME_TRUNCATION_MARKER),
        ]);
    }
    render_table(&rows)
}
