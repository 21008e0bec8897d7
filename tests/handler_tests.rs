//! JSON-RPC dispatch tests for the stdio MCP surface.
//!
//! Tests drive `handlers::dispatch` directly with a test ServerConfig and
//! verify discovery, the authentication gate on `tools/call`, and the tool
//! result shapes.

use std::net::SocketAddr;

use mcp_transcript_server::access::IdentityTable;
use mcp_transcript_server::config::ServerConfig;
use mcp_transcript_server::handlers;
use mcp_transcript_server::protocol::{JsonRpcRequest, RpcId};
use mcp_transcript_server::store::TranscriptStore;

fn test_config(credential: Option<&str>) -> ServerConfig {
    ServerConfig {
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        stdio_credential: credential.map(String::from),
        identities: IdentityTable::demo(),
        store: TranscriptStore::demo(),
    }
}

fn request(method: &str, params: Option<serde_json::Value>) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".into(),
        id: Some(RpcId::Number(1)),
        method: method.into(),
        params,
    }
}

fn tool_call(name: &str, arguments: serde_json::Value) -> JsonRpcRequest {
    request(
        "tools/call",
        Some(serde_json::json!({ "name": name, "arguments": arguments })),
    )
}

/// Extract the tool-result text and isError flag from a dispatch response.
fn tool_result(response: mcp_transcript_server::protocol::JsonRpcResponse) -> (String, bool) {
    let result = response.result.expect("tools/call must produce a result");
    let text = result["content"][0]["text"].as_str().unwrap().to_string();
    let is_error = result["isError"].as_bool().unwrap_or(false);
    (text, is_error)
}

// ---------------------------------------------------------------------------
// Discovery and protocol methods
// ---------------------------------------------------------------------------

#[tokio::test]
async fn initialize_reports_server_info() {
    let config = test_config(None);
    let response = handlers::dispatch(&request("initialize", None), &config)
        .await
        .unwrap();
    let result = response.result.unwrap();

    assert_eq!(result["protocolVersion"].as_str().unwrap(), "2024-11-05");
    assert_eq!(
        result["serverInfo"]["name"].as_str().unwrap(),
        "mcp-transcript-server"
    );
}

#[tokio::test]
async fn initialized_notification_produces_no_response() {
    let config = test_config(None);
    let response = handlers::dispatch(&request("notifications/initialized", None), &config).await;
    assert!(response.is_none());
}

#[tokio::test]
async fn ping_returns_empty_object() {
    let config = test_config(None);
    let response = handlers::dispatch(&request("ping", None), &config)
        .await
        .unwrap();
    assert_eq!(response.result.unwrap(), serde_json::json!({}));
}

#[tokio::test]
async fn tools_list_requires_no_credential_and_advertises_three_tools() {
    let config = test_config(None);
    let response = handlers::dispatch(&request("tools/list", None), &config)
        .await
        .unwrap();
    let result = response.result.unwrap();
    let tools = result["tools"].as_array().unwrap();

    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec!["searchTranscripts", "getTranscriptDetails", "listRecentCalls"]
    );
}

#[tokio::test]
async fn unknown_method_is_method_not_found() {
    let config = test_config(None);
    let response = handlers::dispatch(&request("tools/delete", None), &config)
        .await
        .unwrap();
    assert_eq!(response.error.unwrap().code, -32601);
}

// ---------------------------------------------------------------------------
// tools/call authentication gate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn tool_call_without_credential_is_unauthenticated() {
    let config = test_config(None);
    let response = handlers::dispatch(
        &tool_call("searchTranscripts", serde_json::json!({ "query": "forecasting" })),
        &config,
    )
    .await
    .unwrap();

    let (text, is_error) = tool_result(response);
    assert!(is_error);
    let body: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["error"]["code"].as_str().unwrap(), "unauthenticated");
}

#[tokio::test]
async fn tool_call_with_unknown_credential_is_unauthenticated() {
    let config = test_config(Some("not-a-real-key"));
    let response = handlers::dispatch(
        &tool_call("listRecentCalls", serde_json::json!({})),
        &config,
    )
    .await
    .unwrap();

    let (text, is_error) = tool_result(response);
    assert!(is_error);
    let body: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["error"]["code"].as_str().unwrap(), "unauthenticated");
}

// ---------------------------------------------------------------------------
// tools/call execution
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_returns_scoped_matches() {
    let config = test_config(Some("acc-john-key-002"));
    let response = handlers::dispatch(
        &tool_call("searchTranscripts", serde_json::json!({ "query": "forecasting" })),
        &config,
    )
    .await
    .unwrap();

    let (text, is_error) = tool_result(response);
    assert!(!is_error);
    let results: serde_json::Value = serde_json::from_str(&text).unwrap();
    let ids: Vec<&str> = results
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["transcript-001", "transcript-003"]);
}

#[tokio::test]
async fn details_outside_scope_is_access_denied() {
    // Sarah's key only sees Client Z; transcript-001 belongs to Client X.
    let config = test_config(Some("acc-sarah-key-003"));
    let response = handlers::dispatch(
        &tool_call(
            "getTranscriptDetails",
            serde_json::json!({ "transcriptId": "transcript-001" }),
        ),
        &config,
    )
    .await
    .unwrap();

    let (text, is_error) = tool_result(response);
    assert!(is_error);
    let body: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["error"]["code"].as_str().unwrap(), "access_denied");
}

#[tokio::test]
async fn details_returns_full_record() {
    let config = test_config(Some("acc-demo-key-001"));
    let response = handlers::dispatch(
        &tool_call(
            "getTranscriptDetails",
            serde_json::json!({ "transcriptId": "transcript-002" }),
        ),
        &config,
    )
    .await
    .unwrap();

    let (text, is_error) = tool_result(response);
    assert!(!is_error);
    let transcript: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(transcript["id"].as_str().unwrap(), "transcript-002");
    assert_eq!(transcript["clientName"].as_str().unwrap(), "Client Y");
    assert!(transcript["chunks"].as_array().unwrap().len() > 0);
}

#[tokio::test]
async fn list_recent_respects_limit_and_store_order() {
    let config = test_config(Some("acc-demo-key-001"));
    let response = handlers::dispatch(
        &tool_call("listRecentCalls", serde_json::json!({ "limit": 2 })),
        &config,
    )
    .await
    .unwrap();

    let (text, is_error) = tool_result(response);
    assert!(!is_error);
    let results: serde_json::Value = serde_json::from_str(&text).unwrap();
    let ids: Vec<&str> = results
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["transcript-001", "transcript-002"]);
}

#[tokio::test]
async fn unknown_tool_is_a_tool_error() {
    let config = test_config(Some("acc-demo-key-001"));
    let response = handlers::dispatch(
        &tool_call("dropAllTranscripts", serde_json::json!({})),
        &config,
    )
    .await
    .unwrap();

    let (text, is_error) = tool_result(response);
    assert!(is_error);
    let body: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["error"]["code"].as_str().unwrap(), "unknown_operation");
}

#[tokio::test]
async fn missing_required_argument_is_invalid_argument() {
    let config = test_config(Some("acc-demo-key-001"));
    let response = handlers::dispatch(
        &tool_call("searchTranscripts", serde_json::json!({})),
        &config,
    )
    .await
    .unwrap();

    let (text, is_error) = tool_result(response);
    assert!(is_error);
    let body: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["error"]["code"].as_str().unwrap(), "invalid_argument");
}

#[tokio::test]
async fn repeated_calls_are_byte_identical() {
    let config = test_config(Some("acc-john-key-002"));
    let req = tool_call("searchTranscripts", serde_json::json!({ "query": "forecasting" }));

    let (text_a, _) = tool_result(handlers::dispatch(&req, &config).await.unwrap());
    let (text_b, _) = tool_result(handlers::dispatch(&req, &config).await.unwrap());
    assert_eq!(text_a, text_b);
}
