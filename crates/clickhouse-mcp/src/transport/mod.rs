//! Transport layer
//!
//! Supports the streaming HTTP transport (default) and stdio for local use.
//! The authentication gate only exists on the HTTP transport; stdio has no
//! requests to intercept.

mod http;

use std::future::Future;

use rmcp::ServiceExt;
use rmcp::transport::io::stdio;

use crate::auth::AuthState;
use crate::config::{Config, TransportMode};
use crate::server::ServerHandler;
use crate::{Error, Result};

/// Run the MCP server with the configured transport
pub async fn run_transport(
    handler: ServerHandler,
    config: &Config,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    match config.transport.mode {
        TransportMode::Stdio => run_stdio(handler).await,
        TransportMode::Http => {
            let auth_state = AuthState::new(config.token_secret.as_deref());
            http::run_http(
                handler,
                auth_state,
                config.transport.http_host,
                config.transport.http_port,
                shutdown,
            )
            .await
        }
    }
}

async fn run_stdio(handler: ServerHandler) -> Result<()> {
    let transport = stdio();
    let server = handler
        .serve(transport)
        .await
        .map_err(|e| Error::Transport(format!("Failed to start stdio transport: {e}")))?;

    server
        .waiting()
        .await
        .map_err(|e| Error::Transport(format!("Stdio transport error: {e}")))?;

    Ok(())
}
