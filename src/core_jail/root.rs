use crate::constants::DEFAULT_ROOT_DIR;
use crate::core_jail::JailError;
use log::debug;
use std::fs::File;
use std::path::Path;

/// The sandbox boundary: an absolute, canonical directory path.
///
/// Built once at startup and shared read-only by every session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root(String);

impl Root {
    /// Opens the configured root directory.
    ///
    /// The raw value is trimmed and a blank value falls back to `./public`.
    /// The directory must exist and be openable; it is then canonicalized so
    /// every later comparison works on one absolute spelling.
    pub fn open(raw: &str) -> Result<Self, JailError> {
        let trimmed = raw.trim();
        let raw = if trimmed.is_empty() {
            DEFAULT_ROOT_DIR
        } else {
            trimmed
        };

        let unavailable = |source| JailError::RootUnavailable {
            path: raw.to_string(),
            source,
        };
        File::open(raw).map_err(unavailable)?;
        let canonical = Path::new(raw).canonicalize().map_err(unavailable)?;
        let root = canonical
            .into_os_string()
            .into_string()
            .map_err(|os| JailError::RootNotUtf8(os.into()))?;

        debug!("Sandbox root {} resolved to {}", raw, root);
        Ok(Self(root))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `path` is the root itself or lexically nested under it.
    pub fn contains(&self, path: &str) -> bool {
        if self.0 == "/" {
            return path.starts_with('/');
        }
        match path.strip_prefix(self.0.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// The client-facing form of an absolute path: root stripped from the
    /// front, `/` when nothing is left.
    pub fn relative(&self, path: &str) -> String {
        if self.0 == "/" {
            return path.to_string();
        }
        match path.strip_prefix(self.0.as_str()) {
            Some("") | None => "/".to_string(),
            Some(rest) => rest.to_string(),
        }
    }
}

#[cfg(test)]
impl Root {
    pub fn from_canonical(path: &str) -> Self {
        Self(path.to_string())
    }
}
