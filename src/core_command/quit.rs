use crate::constants::FAREWELL;
use crate::core_command::Outcome;
use crate::core_error::error::CommandError;
use crate::helpers::send_response;
use log::info;
use tokio::io::AsyncWrite;

/// Handles the `quit` command.
///
/// Only says goodbye; closing the stream is left to the connection handler,
/// which stops reading once it sees `Outcome::Quit`.
pub async fn handle_quit_command<W>(writer: &mut W) -> Result<Outcome, CommandError>
where
    W: AsyncWrite + Unpin + Send + ?Sized,
{
    info!("Received quit command.");
    send_response(writer, FAREWELL.as_bytes()).await?;
    Ok(Outcome::Quit)
}
