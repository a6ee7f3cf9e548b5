use crate::core_command::cat::handle_cat_command;
use crate::core_command::cd::handle_cd_command;
use crate::core_command::command::Command;
use crate::core_command::ls::handle_ls_command;
use crate::core_command::quit::handle_quit_command;
use crate::core_command::Outcome;
use crate::core_error::error::CommandError;
use crate::helpers::split_command;
use crate::session::Session;
use tokio::io::AsyncWrite;

/// Shown in the error message when the line held no command at all.
const EMPTY_TOKEN: &str = "<empty>";

/// Splits one input line into a known command and its arguments, checking
/// the argument count.
pub fn parse_line(line: &str) -> Result<(Command, Vec<&str>), CommandError> {
    let mut tokens = split_command(line);
    if tokens.is_empty() {
        return Err(CommandError::InvalidCommand(EMPTY_TOKEN.to_string()));
    }

    let command: Command = tokens.remove(0).parse()?;
    match command.arity() {
        Some(expected) if expected != tokens.len() => {
            Err(CommandError::MissingArgument(command.name()))
        }
        _ => Ok((command, tokens)),
    }
}

/// Runs one input line against the session, writing the command's response
/// but not the prompt.
pub async fn dispatch<W>(
    writer: &mut W,
    session: &mut Session,
    line: &str,
) -> Result<Outcome, CommandError>
where
    W: AsyncWrite + Unpin + Send + ?Sized,
{
    let (command, args) = parse_line(line)?;
    match command {
        Command::Ls => handle_ls_command(writer, session).await,
        Command::Cd => handle_cd_command(session, args[0]).await,
        Command::Cat => handle_cat_command(writer, session, args[0]).await,
        Command::Quit => handle_quit_command(writer).await,
    }
}
