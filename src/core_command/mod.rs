// Here's the list of the commands implemented
pub mod cat;
pub mod cd;
pub mod command;
pub mod handlers;
pub mod ls;
pub mod quit;

use crate::core_error::error::CommandError;

/// What a single input line did to the session.
#[derive(Debug)]
pub enum Outcome {
    Completed,
    Rejected(CommandError),
    Quit,
}

