use crate::core_jail::{JailError, Root};
use async_trait::async_trait;
use log::debug;
use tokio::fs::File;

/// Maps a client-supplied path fragment onto an existing location under the
/// sandbox root.
///
/// Implementations never touch session state: on `Err` the caller keeps the
/// path it already had.
#[async_trait]
pub trait PathJail: Send + Sync {
    async fn resolve(&self, root: &Root, current: &str, fragment: &str)
        -> Result<String, JailError>;
}

/// Lexical jail: normalizes path strings and probes the result by opening it.
///
/// Symlinks inside the root are followed by the probe but not inspected, so a
/// link pointing outside the root is reachable.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexicalJail;

#[async_trait]
impl PathJail for LexicalJail {
    async fn resolve(
        &self,
        root: &Root,
        current: &str,
        fragment: &str,
    ) -> Result<String, JailError> {
        let candidate = jail_path(root, current, fragment);

        // The handle only proves existence; it is dropped right away.
        match File::open(&candidate).await {
            Ok(_) => {
                debug!("Resolved {:?} from {} to {}", fragment, current, candidate);
                Ok(candidate)
            }
            Err(source) => Err(JailError::NotFound {
                path: candidate,
                source,
            }),
        }
    }
}

/// Computes the jailed absolute path for `fragment`, without touching the
/// filesystem.
pub fn jail_path(root: &Root, current: &str, fragment: &str) -> String {
    let relative = root.relative(current);
    let joined = join_clean(&[root.as_str(), &relative, fragment]);

    let jailed = if root.contains(&joined) {
        joined
    } else {
        join_clean(&[root.as_str(), &joined])
    };

    // Only the part below the root is stripped of "..", so a root whose own
    // name contains ".." is kept intact. The strip never introduces a parent
    // segment, so the final clean only drops separators and "." left behind.
    let below = root.relative(&jailed).replace("..", "");
    join_clean(&[root.as_str(), &below])
}

/// Joins non-empty elements with `/` and normalizes the result.
pub fn join_clean(elements: &[&str]) -> String {
    let joined = elements
        .iter()
        .filter(|e| !e.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");
    clean_path(&joined)
}

/// Lexical path normalization.
///
/// Collapses repeated separators, drops `.` segments and resolves `..`
/// against the segments before it. A rooted path never climbs above `/`;
/// an unrooted one keeps its leading `..` segments. Empty input yields `.`.
pub fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            name => segments.push(name),
        }
    }

    let body = segments.join("/");
    match (rooted, body.is_empty()) {
        (true, _) => format!("/{}", body),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}
