use serde::{Deserialize, Serialize};

use crate::query::QueryError;

use super::request::RpcId;

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 response layer
// ---------------------------------------------------------------------------

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RpcId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<RpcId>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<RpcId>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// JSON-RPC 2.0 error object (protocol-level errors).
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcError {
    pub fn parse_error() -> Self {
        Self { code: -32700, message: "Parse error".into(), data: None }
    }

    pub fn invalid_request() -> Self {
        Self { code: -32600, message: "Invalid Request".into(), data: None }
    }

    pub fn invalid_request_with(detail: impl Into<String>) -> Self {
        Self { code: -32600, message: detail.into(), data: None }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: format!("Method not found: {method}"),
            data: None,
        }
    }

    pub fn invalid_params(detail: impl Into<String>) -> Self {
        Self { code: -32602, message: detail.into(), data: None }
    }

    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self { code: -32603, message: detail.into(), data: None }
    }
}

// ---------------------------------------------------------------------------
// MCP tool result layer (returned inside a *successful* JSON-RPC response)
// ---------------------------------------------------------------------------

/// MCP tool call result wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    pub content: Vec<ToolResultContent>,
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

/// A single content block inside a tool result.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResultContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolResultContent {
                content_type: "text".into(),
                text: text.into(),
            }],
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolResultContent {
                content_type: "text".into(),
                text: text.into(),
            }],
            is_error: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Domain error wire shape, shared by both transports
// ---------------------------------------------------------------------------

/// Machine-readable error code carried in every failure body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryErrorCode {
    Unauthenticated,
    AccessDenied,
    NotFound,
    UnknownOperation,
    InvalidArgument,
    InternalError,
}

impl QueryErrorCode {
    /// HTTP status the HTTP transport maps this code to.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Unauthenticated => 401,
            Self::AccessDenied => 403,
            Self::NotFound | Self::UnknownOperation => 404,
            Self::InvalidArgument => 400,
            Self::InternalError => 500,
        }
    }

    /// JSON-RPC 2.0 error code, for failures surfaced at protocol level.
    pub fn json_rpc_code(&self) -> i32 {
        match self {
            Self::InvalidArgument => -32602,
            Self::InternalError => -32603,
            _ => -32602,
        }
    }
}

/// Error payload inside the wire envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryErrorBody {
    pub code: QueryErrorCode,
    pub message: String,
}

/// Top-level failure body: `{"error":{"code","message"}}` on both surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryErrorResponse {
    pub error: QueryErrorBody,
}

impl QueryErrorResponse {
    pub fn new(code: QueryErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: QueryErrorBody {
                code,
                message: message.into(),
            },
        }
    }

    pub fn code(&self) -> QueryErrorCode {
        self.error.code
    }
}

impl From<&QueryError> for QueryErrorResponse {
    fn from(err: &QueryError) -> Self {
        let code = match err {
            QueryError::Unauthenticated => QueryErrorCode::Unauthenticated,
            QueryError::AccessDenied(_) => QueryErrorCode::AccessDenied,
            QueryError::NotFound(_) => QueryErrorCode::NotFound,
            QueryError::UnknownOperation(_) => QueryErrorCode::UnknownOperation,
            QueryError::InvalidArgument { .. } => QueryErrorCode::InvalidArgument,
            QueryError::Internal(_) => QueryErrorCode::InternalError,
        };
        Self::new(code, err.to_string())
    }
}

/// Convert a domain failure into a tool result with `isError: true`.
///
/// The text content is the JSON-serialized error body, preserving the
/// structured code for clients that inspect tool output.
impl From<QueryErrorResponse> for ToolResult {
    fn from(resp: QueryErrorResponse) -> Self {
        match serde_json::to_string(&resp) {
            Ok(json) => Self::error(json),
            Err(e) => Self::error(format!(r#"{{"error":{{"code":"internal_error","message":"{e}"}}}}"#)),
        }
    }
}

impl From<&QueryError> for ToolResult {
    fn from(err: &QueryError) -> Self {
        QueryErrorResponse::from(err).into()
    }
}
