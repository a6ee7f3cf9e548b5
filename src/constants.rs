// src/constants.rs

use std::time::Duration;

pub const DEFAULT_LISTEN_ADDRESS: &str = "localhost:8021";
pub const DEFAULT_ROOT_DIR: &str = "./public";

/// Longest input line accepted from a client, line terminator included.
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Pause after a failed accept before trying again.
pub const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Largest file `cat` will stream (1 MiB).
pub const MAX_CAT_SIZE: u64 = 1024 * 1024;

/// Names longer than this are cut in `ls` output.
pub const NAME_DISPLAY_WIDTH: usize = 40;
pub const NAME_TRUNCATION_MARKER: &str = "..";

pub const SIZE_UNITS: [&str; 5] = ["B ", "KB", "MB", "GB", "TB"];
pub const SIZE_TOO_BIG: &str = "   big";

pub const DEFAULT_BANNER: &str = "┻┳|
┳┻| _
┻┳| •.•)
┳┻|⊂ﾉ
┻┳|";

pub const HELP_TEXT: &str = "Available commands:
    - ls
    - cd <folder>
    - cat <file>
    - quit
";

pub const FAREWELL: &str = "Bye!\n";
