pub mod health;

use crate::config::ServerConfig;
use crate::protocol::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, QueryErrorResponse, ToolCallParams, ToolResult,
};
use crate::query::{self, QueryError, QueryReply};

/// The tool catalogue advertised by discovery on both surfaces.
///
/// Discovery requires no credential; only execution does. `dateFrom` and
/// `dateTo` are advertised for compatibility but perform no filtering.
pub fn tool_catalogue() -> serde_json::Value {
    serde_json::json!([
        {
            "name": "searchTranscripts",
            "description": "Search call transcripts for specific topics or keywords",
            "inputSchema": {
                "type": "object",
                "required": ["query"],
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query for transcript content"
                    },
                    "clientFilter": {
                        "type": "string",
                        "description": "Optional: Filter by client name"
                    },
                    "dateFrom": {
                        "type": "string",
                        "description": "Optional: Start date (YYYY-MM-DD). Accepted but not applied."
                    },
                    "dateTo": {
                        "type": "string",
                        "description": "Optional: End date (YYYY-MM-DD). Accepted but not applied."
                    }
                }
            }
        },
        {
            "name": "getTranscriptDetails",
            "description": "Get full details of a specific transcript",
            "inputSchema": {
                "type": "object",
                "required": ["transcriptId"],
                "properties": {
                    "transcriptId": {
                        "type": "string",
                        "description": "ID of the transcript to retrieve"
                    }
                }
            }
        },
        {
            "name": "listRecentCalls",
            "description": "List recent client calls",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "limit": {
                        "type": "number",
                        "description": "Number of recent calls to return (default: 10)",
                        "default": 10
                    }
                }
            }
        }
    ])
}

/// Dispatch a JSON-RPC request to the appropriate handler.
///
/// Returns `None` for notifications (no response required).
pub async fn dispatch(req: &JsonRpcRequest, config: &ServerConfig) -> Option<JsonRpcResponse> {
    match req.method.as_str() {
        "initialize" => {
            let result = serde_json::json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "mcp-transcript-server",
                    "version": env!("CARGO_PKG_VERSION")
                }
            });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        "notifications/initialized" => None,

        "ping" => Some(JsonRpcResponse::success(req.id.clone(), serde_json::json!({}))),

        "tools/list" => {
            let result = serde_json::json!({ "tools": tool_catalogue() });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        "tools/call" => {
            let params: ToolCallParams = match &req.params {
                Some(v) => match serde_json::from_value(v.clone()) {
                    Ok(p) => p,
                    Err(e) => {
                        return Some(JsonRpcResponse::error(
                            req.id.clone(),
                            JsonRpcError::invalid_params(format!(
                                "Invalid tools/call params: {e}"
                            )),
                        ));
                    }
                },
                None => {
                    return Some(JsonRpcResponse::error(
                        req.id.clone(),
                        JsonRpcError::invalid_params("Missing params for tools/call"),
                    ));
                }
            };

            let tool_result = dispatch_tool_call(&params, config).await;
            let result_json = match serde_json::to_value(&tool_result) {
                Ok(v) => v,
                Err(e) => {
                    return Some(JsonRpcResponse::error(
                        req.id.clone(),
                        JsonRpcError::internal_error(format!("Serialization failed: {e}")),
                    ));
                }
            };
            Some(JsonRpcResponse::success(req.id.clone(), result_json))
        }

        _ => Some(JsonRpcResponse::error(
            req.id.clone(),
            JsonRpcError::method_not_found(&req.method),
        )),
    }
}

/// Execute a single tool call. Authentication happens here, before any
/// store access; discovery methods above never reach this point.
async fn dispatch_tool_call(params: &ToolCallParams, config: &ServerConfig) -> ToolResult {
    if params.name == "health" {
        return health::handle().await;
    }

    let identity = match &config.stdio_credential {
        Some(credential) => config.identities.authenticate(credential),
        None => {
            tracing::warn!("tools/call without a configured credential");
            None
        }
    };

    let identity = match identity {
        Some(i) => i,
        None => return ToolResult::from(&QueryError::Unauthenticated),
    };

    tracing::info!(email = %identity.email, tool = %params.name, "tool call");

    match query::execute(identity, &config.store, &params.name, params.arguments.as_ref()) {
        Ok(reply) => reply_to_tool_result(&reply),
        Err(err) => ToolResult::from(&err),
    }
}

fn reply_to_tool_result(reply: &QueryReply) -> ToolResult {
    match serde_json::to_string_pretty(reply) {
        Ok(json) => ToolResult::text(json),
        Err(e) => {
            tracing::error!("serialization failed: {e}");
            QueryErrorResponse::from(&QueryError::Internal(e.to_string())).into()
        }
    }
}
