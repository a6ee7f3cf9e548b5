use crate::config::Config;
use crate::core_jail::{LexicalJail, PathJail, Root};
use crate::core_network::network;
use anyhow::{Context, Result};
use log::{error, info};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Read-only state shared by the accept loop and every connection.
pub struct ServerContext {
    pub root: Arc<Root>,
    pub jail: Arc<dyn PathJail>,
    pub banner: String,
}

impl ServerContext {
    /// Opens the sandbox root and loads the banner.
    ///
    /// Fails when the root directory is missing or can't be opened.
    pub fn from_config(config: &Config) -> Result<Self> {
        let root = Root::open(&config.server.root_dir)
            .with_context(|| format!("Invalid sandbox root: {}", config.server.root_dir))?;
        let banner = config.load_banner()?;

        Ok(Self {
            root: Arc::new(root),
            jail: Arc::new(LexicalJail),
            banner,
        })
    }
}

/// Runs the server until an interrupt signal is received.
///
/// The sandbox root is checked before the listener is bound, so a bad root
/// aborts startup without ever accepting a connection.
pub async fn run(config: Config) -> Result<()> {
    info!("Starting server with config:");
    config.log();

    let context = Arc::new(ServerContext::from_config(&config)?);
    info!("Starting with root folder:\n\t> {}", context.root.as_str());

    let listener = TcpListener::bind(&config.server.listen_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen_address))?;
    info!("Server listening on {}", listener.local_addr()?);

    let accepted = network::serve(listener, context, shutdown_signal(), None).await;
    info!("Server stopped after {} connections.", accepted);

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Exiting now..."),
        Err(e) => {
            // Without a signal handler the server keeps running until killed.
            error!("Failed to listen for the interrupt signal: {}", e);
            std::future::pending::<()>().await
        }
    }
}
