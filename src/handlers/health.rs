use crate::protocol::ToolResult;

/// Health check; requires no credential and touches no transcript data.
pub async fn handle() -> ToolResult {
    ToolResult::text(r#"{"status":"ok","service":"transcript-mcp"}"#)
}
