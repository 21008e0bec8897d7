//! MCP server and HTTP gateway for a catalogue of call transcripts.
//!
//! Exposes `searchTranscripts`, `getTranscriptDetails`, and `listRecentCalls`
//! over JSON-RPC 2.0 stdio transport, compatible with any MCP-aware AI agent,
//! and over a bearer-authenticated HTTP/JSON surface. Every operation is
//! scoped to the clients the presented API key is allowed to see.

pub mod access;
pub mod config;
pub mod handlers;
pub mod http;
pub mod protocol;
pub mod query;
pub mod server;
pub mod store;

pub mod schema;
