//! MCP server implementation

use std::fmt;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{ErrorData, ServerHandler as RmcpServerHandler, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::executor::QueryBackend;
use crate::security::{QueryGuard, Verdict};

/// Result type for MCP tool handlers returning structured JSON data
pub type ToolResult<T> = Result<Json<T>, ErrorData>;

/// Parameters for the `query_clickhouse` tool
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QueryParams {
    /// SQL SELECT query to run against the ClickHouse database
    #[schemars(
        description = "A SQL SELECT query to execute against the ClickHouse database. \
                       Only SELECT statements are permitted. The query must not contain \
                       INSERT, UPDATE, DELETE, DROP, CREATE, ALTER, or TRUNCATE statements."
    )]
    pub sql_query: String,
}

pub struct ServerHandler {
    backend: Arc<dyn QueryBackend>,
    query_guard: QueryGuard,
    tool_router: ToolRouter<Self>,
}

impl Clone for ServerHandler {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            query_guard: self.query_guard,
            tool_router: Self::tool_router(),
        }
    }
}

impl fmt::Debug for ServerHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerHandler")
            .field("backend", &"<QueryBackend>")
            .field("query_guard", &self.query_guard)
            .field("tool_router", &"<ToolRouter>")
            .finish()
    }
}

impl ServerHandler {
    pub fn new(backend: Arc<dyn QueryBackend>) -> Self {
        Self {
            backend,
            query_guard: QueryGuard::new(),
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl ServerHandler {
    #[tool(
        description = "Execute a read-only SQL query against the ClickHouse database. \
                       Returns a list of row objects keyed by column name, or an object \
                       with a single `error` key when the query is rejected or fails."
    )]
    async fn query_clickhouse(
        &self,
        Parameters(params): Parameters<QueryParams>,
    ) -> ToolResult<JsonValue> {
        let outcome =
            run_query(&self.query_guard, self.backend.as_ref(), &params.sql_query).await;
        Ok(Json(outcome))
    }
}

/// Guard-then-execute pipeline shared by the tool handler.
///
/// Every failure branch terminates in an `{error: message}` value; a raw
/// error is never surfaced to the transport.
pub async fn run_query(
    guard: &QueryGuard,
    backend: &dyn QueryBackend,
    sql: &str,
) -> JsonValue {
    match guard.check(sql) {
        Verdict::Rejected(reason) => serde_json::json!({ "error": reason }),
        Verdict::Accepted => match backend.execute(sql).await {
            Ok(rows) => JsonValue::Array(rows.into_iter().map(JsonValue::Object).collect()),
            Err(e) => serde_json::json!({ "error": e.tool_message() }),
        },
    }
}

#[tool_handler]
impl RmcpServerHandler for ServerHandler {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build()).with_instructions(
            "MCP server for ClickHouse. Provides a single tool to run read-only \
             SELECT queries against the analytical database.",
        )
    }
}
