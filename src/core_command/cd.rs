use crate::core_command::Outcome;
use crate::core_error::error::CommandError;
use crate::session::Session;
use log::{info, warn};

/// Handles the `cd` command.
///
/// The target goes through the session's path jail; the working path only
/// changes when the jail accepts it.
pub async fn handle_cd_command(
    session: &mut Session,
    target: &str,
) -> Result<Outcome, CommandError> {
    let resolved = session
        .jail()
        .resolve(session.root(), session.current_path(), target)
        .await;

    match resolved {
        Ok(path) => {
            session.set_current_path(path);
            info!("Directory successfully changed to: {}", session.relative_path());
            Ok(Outcome::Completed)
        }
        Err(e) => {
            warn!("Failed to change directory to {:?}: {}", target, e);
            Err(CommandError::InvalidPath(target.to_string()))
        }
    }
}
