use crate::core_error::error::CommandError;
use std::str::FromStr;

#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum Command {
    Ls,
    Cd,
    Cat,
    Quit,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ls => "ls",
            Command::Cd => "cd",
            Command::Cat => "cat",
            Command::Quit => "quit",
        }
    }

    /// Number of arguments the command takes, `None` when any count is fine.
    pub fn arity(&self) -> Option<usize> {
        match self {
            Command::Ls => Some(0),
            Command::Cd | Command::Cat => Some(1),
            Command::Quit => None,
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "ls" => Ok(Command::Ls),
            "cd" => Ok(Command::Cd),
            "cat" => Ok(Command::Cat),
            "quit" => Ok(Command::Quit),
            other => Err(CommandError::InvalidCommand(other.to_string())),
        }
    }
}
