//! HTTP/JSON surface: the same query engine behind bearer-authenticated
//! REST-ish endpoints, for callers that do not speak MCP stdio.
//!
//! Discovery (`GET /health`, `GET /mcp`, `POST /mcp` with a `tools/list`
//! body) requires no credential; everything under `/mcp/tools` and
//! `/mcp/me` authenticates before touching the store.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::access::CallerIdentity;
use crate::config::ServerConfig;
use crate::handlers;
use crate::protocol::{QueryErrorCode, QueryErrorResponse};
use crate::query::{self, QueryError, QueryReply};

type HttpError = (StatusCode, Json<QueryErrorResponse>);

/// Build the router. Separated from [`serve`] so tests can drive it with
/// `tower::ServiceExt::oneshot` without binding a socket.
pub fn router(config: Arc<ServerConfig>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/mcp", get(mcp_info).post(mcp_discovery))
        .route("/mcp/me", get(me))
        .route("/mcp/tools/:tool_name", post(call_tool))
        .layer(CorsLayer::permissive())
        .with_state(config)
}

/// Bind and serve until ctrl-c.
pub async fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.bind_addr;
    let app = router(Arc::new(config));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("transcript server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "transcript-mcp" }))
}

async fn mcp_info() -> Json<Value> {
    Json(json!({
        "name": "mcp-transcript-server",
        "version": env!("CARGO_PKG_VERSION"),
        "capabilities": {
            "tools": {}
        }
    }))
}

/// `POST /mcp` serves unauthenticated tool discovery only; anything else on
/// this endpoint requires the authenticated tool routes.
async fn mcp_discovery(Json(body): Json<Value>) -> Response {
    if body.get("method").and_then(Value::as_str) == Some("tools/list") {
        Json(json!({ "tools": handlers::tool_catalogue() })).into_response()
    } else {
        error_response(&QueryError::Unauthenticated).into_response()
    }
}

/// Echo the authenticated identity; used to verify a key works.
async fn me(
    State(config): State<Arc<ServerConfig>>,
    headers: HeaderMap,
) -> Result<Json<Value>, HttpError> {
    let identity = authenticate(&config, &headers)?;
    Ok(Json(json!({ "authenticated": true, "user": identity })))
}

async fn call_tool(
    State(config): State<Arc<ServerConfig>>,
    Path(tool_name): Path<String>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, HttpError> {
    let identity = authenticate(&config, &headers)?;

    tracing::info!(email = %identity.email, tool = %tool_name, "tool call");

    let arguments = body.map(|Json(v)| v);
    match query::execute(identity, &config.store, &tool_name, arguments.as_ref()) {
        Ok(QueryReply::Transcripts(results)) => Ok(Json(json!({
            "success": true,
            "tool": tool_name,
            "resultCount": results.len(),
            "results": results,
        }))),
        Ok(QueryReply::Transcript(transcript)) => Ok(Json(json!({
            "success": true,
            "tool": tool_name,
            "result": transcript,
        }))),
        Err(err) => Err(error_response(&err)),
    }
}

fn authenticate<'a>(
    config: &'a ServerConfig,
    headers: &HeaderMap,
) -> Result<&'a CallerIdentity, HttpError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    config
        .identities
        .authenticate_bearer(header)
        .ok_or_else(|| error_response(&QueryError::Unauthenticated))
}

fn error_response(err: &QueryError) -> HttpError {
    let body = QueryErrorResponse::from(err);
    (status_for(body.code()), Json(body))
}

fn status_for(code: QueryErrorCode) -> StatusCode {
    StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
