// Path jailing: maps client paths onto the sandbox root
pub mod error;
pub mod resolver;
pub mod root;

pub use error::JailError;
pub use resolver::{LexicalJail, PathJail};
pub use root::Root;
