//! Query execution against the ClickHouse HTTP interface

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::config::ClickHouseConfig;
use crate::{Error, Result};

/// A single result row, column name to scalar value
pub type Row = serde_json::Map<String, JsonValue>;

/// Seam between the tool pipeline and the database client, so the pipeline
/// can be exercised against a mock
#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// Run an accepted query, returning rows in database order
    async fn execute(&self, sql: &str) -> Result<Vec<Row>>;
}

/// Column metadata returned alongside `JSONCompact` results
#[derive(Debug, Deserialize)]
struct ColumnMeta {
    name: String,
}

/// Shape of a `JSONCompact` response body
#[derive(Debug, Deserialize)]
struct CompactResponse {
    meta: Vec<ColumnMeta>,
    data: Vec<Vec<JsonValue>>,
}

/// Executor speaking the ClickHouse HTTP interface over TLS
///
/// One instance is built at startup and shared across all in-flight tool
/// calls; `reqwest::Client` pools connections internally and is safe for
/// concurrent use, so no extra locking is layered on top.
pub struct ClickHouseExecutor {
    http: reqwest::Client,
    url: String,
    user: String,
    password: String,
    database: String,
}

impl std::fmt::Debug for ClickHouseExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickHouseExecutor")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("database", &self.database)
            .finish()
    }
}

impl ClickHouseExecutor {
    #[must_use]
    pub fn new(config: &ClickHouseConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: config.url(),
            user: config.user.clone(),
            password: config.password.clone(),
            database: config.database.clone(),
        }
    }

    async fn run(&self, sql: &str) -> Result<Vec<Row>> {
        tracing::info!("Executing query: {}", query_target(sql));

        let response = self
            .http
            .post(&self.url)
            .query(&[
                ("database", self.database.as_str()),
                ("default_format", "JSONCompact"),
            ])
            .header("X-ClickHouse-User", &self.user)
            .header("X-ClickHouse-Key", &self.password)
            .body(sql.to_string())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::Query(body.trim().to_string()));
        }

        let parsed: CompactResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Query(format!("Malformed response from database: {e}")))?;

        Ok(zip_rows(&parsed.meta, parsed.data))
    }
}

#[async_trait]
impl QueryBackend for ClickHouseExecutor {
    async fn execute(&self, sql: &str) -> Result<Vec<Row>> {
        self.run(sql).await
    }
}

/// Zip each data tuple with the column names into a Row, preserving the
/// database's row order
fn zip_rows(meta: &[ColumnMeta], data: Vec<Vec<JsonValue>>) -> Vec<Row> {
    data.into_iter()
        .map(|tuple| {
            meta.iter()
                .map(|col| col.name.clone())
                .zip(tuple)
                .collect()
        })
        .collect()
}

/// Log target for a query: the portion after the first FROM when present,
/// otherwise the whole query. Keeps verbose column lists out of the logs
/// while still recording what was queried.
fn query_target(sql: &str) -> &str {
    sql.as_bytes()
        .windows(4)
        .position(|w| w.eq_ignore_ascii_case(b"FROM"))
        .and_then(|idx| sql.get(idx + 4..))
        .map_or_else(|| sql.trim(), str::trim)
}
