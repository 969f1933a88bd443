//! Environment-sourced configuration
//!
//! All process configuration is read once at startup and assembled into an
//! explicit [`Config`] value that is passed into component constructors.
//! Business logic never performs ambient environment lookups.

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::{Error, Result};

/// Environment variable names
mod vars {
    pub const CLICKHOUSE_HOSTNAME: &str = "CLICKHOUSE_HOSTNAME";
    pub const CLICKHOUSE_PORT: &str = "CLICKHOUSE_PORT";
    pub const CLICKHOUSE_USERNAME: &str = "CLICKHOUSE_USERNAME";
    pub const CLICKHOUSE_PASSWORD: &str = "CLICKHOUSE_PASSWORD";
    pub const CLICKHOUSE_DBNAME: &str = "CLICKHOUSE_DBNAME";
    pub const ACCESS_TOKEN_SECRET: &str = "ACCESS_TOKEN_SECRET";
    pub const MCP_HTTP_HOST: &str = "MCP_HTTP_HOST";
    pub const MCP_HTTP_PORT: &str = "MCP_HTTP_PORT";
    pub const RUST_LOG: &str = "RUST_LOG";
    pub const MCP_JSON_LOGS: &str = "MCP_JSON_LOGS";
}

/// Default HTTPS port of the ClickHouse HTTP interface
const DEFAULT_CLICKHOUSE_PORT: u16 = 8443;

/// Default listening port for the streaming HTTP transport
pub const DEFAULT_HTTP_PORT: u16 = 8081;

/// ClickHouse connection settings
///
/// The HTTP interface is always reached over TLS, matching the database's
/// secure port. Plain-text connections are not supported.
#[derive(Debug, Clone)]
pub struct ClickHouseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl ClickHouseConfig {
    /// Base URL of the HTTPS interface
    #[must_use]
    pub fn url(&self) -> String {
        format!("https://{}:{}/", self.host, self.port)
    }
}

/// Transport selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransportMode {
    Stdio,
    #[default]
    Http,
}

impl FromStr for TransportMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "stdio" => Ok(Self::Stdio),
            "http" => Ok(Self::Http),
            other => Err(Error::Config(format!("Unknown transport mode: {other}"))),
        }
    }
}

/// Transport settings
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub mode: TransportMode,
    pub http_host: IpAddr,
    pub http_port: u16,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            mode: TransportMode::default(),
            http_host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            http_port: DEFAULT_HTTP_PORT,
        }
    }
}

/// Complete process configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub clickhouse: ClickHouseConfig,
    /// HS256 signing secret for bearer tokens. Absence is tolerated at
    /// startup; gated routes then answer 500 until the secret is provisioned.
    pub token_secret: Option<String>,
    pub transport: TransportConfig,
    pub log_level: String,
    pub json_logs: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let host = require_var(vars::CLICKHOUSE_HOSTNAME)?;
        let database = require_var(vars::CLICKHOUSE_DBNAME)?;

        let port = env::var(vars::CLICKHOUSE_PORT)
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_CLICKHOUSE_PORT);

        let user =
            env::var(vars::CLICKHOUSE_USERNAME).unwrap_or_else(|_| "default".to_string());
        let password = env::var(vars::CLICKHOUSE_PASSWORD).unwrap_or_default();

        let token_secret = env::var(vars::ACCESS_TOKEN_SECRET)
            .ok()
            .filter(|s| !s.is_empty());

        // MCP_TRANSPORT is read by the CLI layer, which owns mode selection;
        // only the bind address and port are picked up here.
        let mut transport = TransportConfig::default();

        if let Ok(host_str) = env::var(vars::MCP_HTTP_HOST)
            && let Ok(addr) = host_str.parse::<IpAddr>()
        {
            transport.http_host = addr;
        }
        if let Ok(port_str) = env::var(vars::MCP_HTTP_PORT)
            && let Ok(p) = port_str.parse::<u16>()
        {
            transport.http_port = p;
        }

        let log_level = env::var(vars::RUST_LOG).unwrap_or_else(|_| "info".to_string());
        let json_logs = env::var(vars::MCP_JSON_LOGS)
            .map(|v| parse_bool(&v))
            .unwrap_or(false);

        Ok(Self {
            clickhouse: ClickHouseConfig {
                host,
                port,
                user,
                password,
                database,
            },
            token_secret,
            transport,
            log_level,
            json_logs,
        })
    }
}

fn require_var(name: &str) -> Result<String> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Config(format!("{name} environment variable is required")))
}

fn parse_bool(s: &str) -> bool {
    matches!(s.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn with_env_vars<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = ENV_MUTEX.lock().unwrap();

        let old_values: Vec<_> = vars.iter().map(|(k, _)| (*k, env::var(k).ok())).collect();

        for (key, value) in vars {
            match value {
                // SAFETY: We hold a mutex lock to ensure no concurrent modifications
                Some(v) => unsafe { env::set_var(key, v) },
                None => unsafe { env::remove_var(key) },
            }
        }

        let result = f();

        for (key, old_value) in old_values {
            match old_value {
                // SAFETY: We hold a mutex lock to ensure no concurrent modifications
                Some(v) => unsafe { env::set_var(key, v) },
                None => unsafe { env::remove_var(key) },
            }
        }

        result
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("1"));
        assert!(parse_bool("yes"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn test_transport_mode_parse() {
        assert_eq!("stdio".parse::<TransportMode>().unwrap(), TransportMode::Stdio);
        assert_eq!("http".parse::<TransportMode>().unwrap(), TransportMode::Http);
        assert_eq!("HTTP".parse::<TransportMode>().unwrap(), TransportMode::Http);
        assert!("carrier-pigeon".parse::<TransportMode>().is_err());
    }

    #[test]
    fn test_clickhouse_url() {
        let config = ClickHouseConfig {
            host: "ch.example.com".to_string(),
            port: 8443,
            user: "default".to_string(),
            password: String::new(),
            database: "analytics".to_string(),
        };
        assert_eq!(config.url(), "https://ch.example.com:8443/");
    }

    #[test]
    fn test_from_env_minimal() {
        with_env_vars(
            &[
                ("CLICKHOUSE_HOSTNAME", Some("ch.example.com")),
                ("CLICKHOUSE_DBNAME", Some("analytics")),
                ("CLICKHOUSE_PORT", None),
                ("CLICKHOUSE_USERNAME", None),
                ("CLICKHOUSE_PASSWORD", None),
                ("ACCESS_TOKEN_SECRET", None),
                ("MCP_HTTP_HOST", None),
                ("MCP_HTTP_PORT", None),
                ("MCP_JSON_LOGS", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.clickhouse.host, "ch.example.com");
                assert_eq!(config.clickhouse.port, DEFAULT_CLICKHOUSE_PORT);
                assert_eq!(config.clickhouse.user, "default");
                assert_eq!(config.clickhouse.database, "analytics");
                assert!(config.token_secret.is_none());
                assert_eq!(config.transport.mode, TransportMode::Http);
                assert_eq!(config.transport.http_port, DEFAULT_HTTP_PORT);
            },
        );
    }

    #[test]
    fn test_from_env_missing_hostname() {
        with_env_vars(
            &[
                ("CLICKHOUSE_HOSTNAME", None),
                ("CLICKHOUSE_DBNAME", Some("analytics")),
            ],
            || {
                let result = Config::from_env();
                assert!(matches!(result, Err(Error::Config(_))));
            },
        );
    }

    #[test]
    fn test_from_env_full() {
        with_env_vars(
            &[
                ("CLICKHOUSE_HOSTNAME", Some("ch.internal")),
                ("CLICKHOUSE_DBNAME", Some("core_db")),
                ("CLICKHOUSE_PORT", Some("9443")),
                ("CLICKHOUSE_USERNAME", Some("reader")),
                ("CLICKHOUSE_PASSWORD", Some("hunter2")),
                ("ACCESS_TOKEN_SECRET", Some("s3cret")),
                ("MCP_HTTP_HOST", Some("127.0.0.1")),
                ("MCP_HTTP_PORT", Some("9090")),
                ("MCP_JSON_LOGS", Some("true")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.clickhouse.port, 9443);
                assert_eq!(config.clickhouse.user, "reader");
                assert_eq!(config.clickhouse.password, "hunter2");
                assert_eq!(config.token_secret.as_deref(), Some("s3cret"));
                assert_eq!(
                    config.transport.http_host,
                    "127.0.0.1".parse::<IpAddr>().unwrap()
                );
                assert_eq!(config.transport.http_port, 9090);
                assert!(config.json_logs);
            },
        );
    }

    #[test]
    fn test_transport_mode_env_var_left_to_cli() {
        // Mode selection belongs to the CLI layer; the env loader must not
        // consume MCP_TRANSPORT a second time.
        with_env_vars(
            &[
                ("CLICKHOUSE_HOSTNAME", Some("ch")),
                ("CLICKHOUSE_DBNAME", Some("db")),
                ("MCP_TRANSPORT", Some("stdio")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.transport.mode, TransportMode::Http);
            },
        );
    }

    #[test]
    fn test_empty_secret_treated_as_absent() {
        with_env_vars(
            &[
                ("CLICKHOUSE_HOSTNAME", Some("ch")),
                ("CLICKHOUSE_DBNAME", Some("db")),
                ("ACCESS_TOKEN_SECRET", Some("")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert!(config.token_secret.is_none());
            },
        );
    }
}
