//! Streaming HTTP transport

use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::{Router, middleware};
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthState, access_gate};
use crate::server::ServerHandler;
use crate::{Error, Result};

/// Name advertised by the public descriptor route
const SERVICE_NAME: &str = "clickhouse-mcp";

/// Static descriptor served on the public root route
#[derive(Debug, Serialize)]
struct ServiceDescriptor {
    status: &'static str,
    service: &'static str,
    endpoints: &'static [&'static str],
}

/// Run the streaming HTTP server with the access gate layered over all routes
pub async fn run_http(
    handler: ServerHandler,
    auth_state: AuthState,
    host: IpAddr,
    port: u16,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr = SocketAddr::new(host, port);
    let cancellation_token = CancellationToken::new();
    let token_clone = cancellation_token.clone();

    if !auth_state.is_configured() {
        tracing::warn!(
            "ACCESS_TOKEN_SECRET is not set; the streaming tool route will \
             answer 500 until a signing secret is provisioned"
        );
    }

    let session_manager = Arc::new(LocalSessionManager::default());
    let config = StreamableHttpServerConfig::default().with_cancellation_token(token_clone);

    let mcp_service =
        StreamableHttpService::new(move || Ok(handler.clone()), session_manager, config);

    let app = Router::new()
        .route("/", get(descriptor_handler))
        .nest_service("/sse", mcp_service)
        .layer(middleware::from_fn_with_state(auth_state, access_gate))
        .layer(TraceLayer::new_for_http());

    tracing::info!("HTTP server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Transport(format!("Failed to bind to {addr}: {e}")))?;

    tokio::spawn(async move {
        shutdown.await;
        cancellation_token.cancel();
    });

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Transport(format!("HTTP server error: {e}")))?;

    tracing::info!("HTTP server shutdown complete");
    Ok(())
}

async fn descriptor_handler() -> impl IntoResponse {
    Json(ServiceDescriptor {
        status: "online",
        service: SERVICE_NAME,
        endpoints: &["/sse"],
    })
}
