use crate::constants::{SIZE_TOO_BIG, SIZE_UNITS};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Pads a cell with spaces up to `width` characters.
pub fn pad_cell(cell: &str, width: usize) -> String {
    let mut padded = String::with_capacity(width.max(cell.len()));
    padded.push_str(cell);
    let mut len = cell.chars().count();
    while len < width {
        padded.push(' '); // Pad with spaces up to the desired width
        len += 1;
    }
    padded
}

/// Splits a raw input line into whitespace-separated tokens.
pub fn split_command(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Cuts `name` to `max` characters and appends `marker` when it was longer.
pub fn cut(name: &str, max: usize, marker: &str) -> String {
    match name.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}{}", &name[..byte_idx], marker),
        None => name.to_string(),
    }
}

/// Renders a byte count in the first unit it fits in, right-aligned.
///
/// `1023` is `1023B `, `1024` is `   1KB`, anything from 1024^5 up is `   big`.
pub fn to_size(size: u64) -> String {
    for (i, unit) in SIZE_UNITS.iter().enumerate() {
        let unit_base = 1024u64.pow(i as u32);
        if size < unit_base.saturating_mul(1024) {
            return format!("{:>4}{}", size / unit_base, unit);
        }
    }
    SIZE_TOO_BIG.to_string()
}

/// Lays out rows as an aligned text table.
///
/// Every column but the last is padded to its widest cell plus two spaces;
/// the last column is written as is.
pub fn render_table(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut table = String::new();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i + 1 == row.len() {
                table.push_str(cell);
            } else {
                table.push_str(&pad_cell(cell, widths[i] + 2));
            }
        }
        table.push('\n');
    }
    table
}

/// Sends a response to the client.
pub async fn send_response<W>(writer: &mut W, message: &[u8]) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    writer.write_all(message).await?;
    Ok(())
}
