use std::net::IpAddr;
use std::sync::Arc;

use clap::Parser;
use clickhouse_mcp::config::TransportMode;
use clickhouse_mcp::observability::init_logging;
use clickhouse_mcp::transport::run_transport;
use clickhouse_mcp::{ClickHouseExecutor, Config, ServerHandler};

#[derive(Parser, Debug)]
#[command(name = "clickhouse-mcp")]
#[command(about = "MCP server exposing a read-only SQL query tool for ClickHouse", long_about = None)]
#[command(version)]
struct Args {
    /// Transport mode (stdio or http)
    #[arg(long, env = "MCP_TRANSPORT", default_value = "http")]
    transport: TransportMode,

    /// HTTP bind host (when transport=http)
    #[arg(long, env = "MCP_HTTP_HOST")]
    http_host: Option<IpAddr>,

    /// HTTP bind port (when transport=http)
    #[arg(long, env = "MCP_HTTP_PORT")]
    http_port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable JSON logging output
    #[arg(long, env = "MCP_JSON_LOGS")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Database and token settings are environment-only; the CLI covers
    // transport and logging.
    let mut config = Config::from_env()?;
    config.transport.mode = args.transport;
    if let Some(host) = args.http_host {
        config.transport.http_host = host;
    }
    if let Some(port) = args.http_port {
        config.transport.http_port = port;
    }
    if args.verbose {
        config.log_level = "debug".to_string();
    }
    config.json_logs = config.json_logs || args.json_logs;

    init_logging(&config.log_level, config.json_logs);

    let executor = Arc::new(ClickHouseExecutor::new(&config.clickhouse));
    let handler = ServerHandler::new(executor);

    tracing::info!("Starting MCP server for ClickHouse");
    tracing::info!("Transport: {:?}", config.transport.mode);
    tracing::info!(
        "Database: {} on {}",
        config.clickhouse.database,
        config.clickhouse.host
    );
    if config.transport.mode == TransportMode::Http {
        tracing::info!(
            "Listening on {}:{}",
            config.transport.http_host,
            config.transport.http_port
        );
    }

    let shutdown = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        tracing::info!("Shutdown signal received");
    };

    run_transport(handler, &config, shutdown)
        .await
        .map_err(Into::into)
}
