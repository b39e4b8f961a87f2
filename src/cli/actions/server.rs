use crate::{api, cli::actions::Action, identity};
use anyhow::Result;
use secrecy::ExposeSecret;

/// Handle the server action
///
/// # Errors
/// Returns an error if the store cannot be opened or the server fails.
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            max_connections,
            globals,
        } => {
            let store = identity::open_store(dsn.expose_secret(), max_connections).await?;

            api::new(port, store, globals).await?;
        }
    }

    Ok(())
}
