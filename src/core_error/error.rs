// Client-visible errors for the command interpreter
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Missing or invalid argument for {0}")]
    MissingArgument(&'static str),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Can't open {0}")]
    CantOpen(String),

    #[error("File too big: {0} ({1} bytes)")]
    FileTooBig(String, u64),

    #[error("Input line longer than {0} bytes")]
    LineTooLong(usize),

    /// The client stream failed; ends the connection instead of being reported.
    #[error("Client stream error: {0}")]
    Io(#[from] std::io::Error),
}

impl CommandError {
    /// Text sent to the client, terminated by a newline.
    ///
    /// Only the offending command token is echoed back; resolved filesystem
    /// paths stay in the server log.
    pub fn to_client_message(&self) -> String {
        match self {
            CommandError::InvalidCommand(token) => {
                format!("(╯°□°）╯︵ ┻━┻\nInvalid command: {}\n", token)
            }
            CommandError::MissingArgument(_) => "ಠ_ಠ\nMissing or invalid argument\n".to_string(),
            CommandError::InvalidPath(_) => "¯\\_(ツ)_/¯\nInvalid path\n".to_string(),
            CommandError::CantOpen(_) => "ಠ_ಠ\nCan't open the file\n".to_string(),
            CommandError::FileTooBig(..) => "¯\\_(ツ)_/¯\nThe file is too big\n".to_string(),
            CommandError::LineTooLong(_) => "ಠ_ಠ\nLine too long\n".to_string(),
            CommandError::Io(_) => "¯\\_(ツ)_/¯\nAn error occurred\n".to_string(),
        }
    }
}
