use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JailError {
    #[error("Sandbox root {path} can't be opened: {source}")]
    RootUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Sandbox root is not valid UTF-8: {0:?}")]
    RootNotUtf8(PathBuf),

    #[error("Path {path} doesn't exist under the sandbox: {source}")]
    NotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
