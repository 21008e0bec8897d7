use std::net::SocketAddr;

use crate::access::IdentityTable;
use crate::store::TranscriptStore;

/// Default HTTP bind address when `TRANSCRIPT_BIND_ADDR` is unset.
const DEFAULT_BIND: ([u8; 4], u16) = ([127, 0, 0, 1], 3400);

/// Server configuration: environment settings plus the constructed identity
/// table and transcript store. Built once at startup and shared read-only by
/// every call; tests construct it directly with their own tables and
/// fixtures.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Credential the stdio transport presents for `tools/call`. Discovery
    /// works without it; tool execution fails unauthenticated without it.
    pub stdio_credential: Option<String>,
    pub identities: IdentityTable,
    pub store: TranscriptStore,
}

impl ServerConfig {
    /// Load configuration from environment.
    ///
    /// - `TRANSCRIPT_BIND_ADDR` (optional, default `127.0.0.1:3400`) — HTTP bind address
    /// - `TRANSCRIPT_API_KEYS` (optional) — path to a JSON file mapping API key
    ///   to identity; the built-in demo table is used when unset
    /// - `TRANSCRIPT_API_KEY` (optional) — credential for stdio tool execution
    pub fn from_env() -> Result<Self, String> {
        let bind_addr = match std::env::var("TRANSCRIPT_BIND_ADDR") {
            Ok(val) => val
                .parse::<SocketAddr>()
                .map_err(|_| format!("TRANSCRIPT_BIND_ADDR is not a valid socket address: {val}"))?,
            Err(_) => SocketAddr::from(DEFAULT_BIND),
        };

        let identities = match std::env::var("TRANSCRIPT_API_KEYS") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)
                    .map_err(|e| format!("cannot read TRANSCRIPT_API_KEYS file {path}: {e}"))?;
                serde_json::from_str::<IdentityTable>(&raw)
                    .map_err(|e| format!("invalid identity table in {path}: {e}"))?
            }
            Err(_) => IdentityTable::demo(),
        };

        Ok(Self {
            bind_addr,
            stdio_credential: std::env::var("TRANSCRIPT_API_KEY").ok(),
            identities,
            store: TranscriptStore::demo(),
        })
    }
}
