pub mod request;
pub mod response;

pub use request::{JsonRpcRequest, RpcId, ToolCallParams};
pub use response::{
    JsonRpcError, JsonRpcResponse, QueryErrorBody, QueryErrorCode, QueryErrorResponse, ToolResult,
    ToolResultContent,
};
