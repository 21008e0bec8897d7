//! The authorization-scoped query engine.
//!
//! Every operation starts from the caller's *visible set* — the subset of the
//! store their client scope permits — before any operation-specific filter is
//! applied. Both transports normalize inbound calls into
//! `(operation name, arguments, caller identity)` and feed [`execute`], so
//! scoping can never be bypassed by one surface drifting from the other.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::access::CallerIdentity;
use crate::store::{Transcript, TranscriptStore};

/// Default number of entries returned by `listRecentCalls`.
pub const DEFAULT_LIMIT: i64 = 10;

/// Upper bound for `listRecentCalls.limit`.
pub const MAX_LIMIT: i64 = 100;

/// Structured failure of an operation. The engine never panics for any
/// reachable input; every outcome is one of these or a success.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Authentication required")]
    Unauthenticated,
    #[error("You don't have access to {0}")]
    AccessDenied(String),
    #[error("Transcript not found: {0}")]
    NotFound(String),
    #[error("Unknown tool: {0}")]
    UnknownOperation(String),
    #[error("Invalid arguments for {operation}: {message}")]
    InvalidArgument { operation: String, message: String },
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Arguments for `searchTranscripts`.
///
/// `date_from`/`date_to` are accepted for interface compatibility but have
/// no filtering effect; date-range filtering was declared upstream and never
/// implemented, and that behavior is preserved here on purpose.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTranscriptsArgs {
    pub query: String,
    #[serde(default)]
    pub client_filter: Option<String>,
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
}

/// Arguments for `getTranscriptDetails`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTranscriptDetailsArgs {
    pub transcript_id: String,
}

/// Arguments for `listRecentCalls`. A non-numeric `limit` falls back to the
/// default rather than erroring, matching the permissive upstream contract.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListRecentCallsArgs {
    #[serde(default, deserialize_with = "lenient_limit")]
    pub limit: Option<i64>,
}

impl ListRecentCallsArgs {
    /// Resolve `limit` to its effective value: absent, non-numeric, or
    /// non-positive input defaults to 10; anything above 100 clamps to 100.
    pub fn effective_limit(&self) -> usize {
        match self.limit {
            Some(n) if n >= 1 => n.min(MAX_LIMIT) as usize,
            _ => DEFAULT_LIMIT as usize,
        }
    }
}

fn lenient_limit<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64)))
}

/// Successful outcome of an operation: a scoped list or a single record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryReply {
    Transcripts(Vec<Transcript>),
    Transcript(Transcript),
}

/// The transcripts `identity` is permitted to see, in store order.
pub fn visible_set<'a>(
    identity: &CallerIdentity,
    store: &'a TranscriptStore,
) -> Vec<&'a Transcript> {
    store
        .all()
        .iter()
        .filter(|t| identity.can_access_client(&t.client_name))
        .collect()
}

/// `searchTranscripts`: case-insensitive substring match over content bodies
/// within the visible set. An explicit `clientFilter` the caller cannot see
/// is a hard access-denied failure, not a silent empty result.
pub fn search_transcripts(
    identity: &CallerIdentity,
    store: &TranscriptStore,
    args: &SearchTranscriptsArgs,
) -> Result<Vec<Transcript>, QueryError> {
    let mut survivors = visible_set(identity, store);

    if !args.query.is_empty() {
        let needle = args.query.to_lowercase();
        survivors.retain(|t| t.content.to_lowercase().contains(&needle));
    }

    if let Some(client) = &args.client_filter {
        if !identity.can_access_client(client) {
            return Err(QueryError::AccessDenied(client.clone()));
        }
        survivors.retain(|t| &t.client_name == client);
    }

    Ok(survivors.into_iter().cloned().collect())
}

/// `getTranscriptDetails`: exact-id lookup across the *entire* store so that
/// "does not exist" and "exists but forbidden" stay distinguishable.
pub fn get_transcript_details(
    identity: &CallerIdentity,
    store: &TranscriptStore,
    args: &GetTranscriptDetailsArgs,
) -> Result<Transcript, QueryError> {
    let transcript = store
        .get(&args.transcript_id)
        .ok_or_else(|| QueryError::NotFound(args.transcript_id.clone()))?;

    if !identity.can_access_client(&transcript.client_name) {
        return Err(QueryError::AccessDenied(transcript.client_name.clone()));
    }

    Ok(transcript.clone())
}

/// `listRecentCalls`: first `limit` entries of the visible set. Store order
/// stands in for recency; there is no explicit date sort, preserving the
/// upstream behavior verbatim.
pub fn list_recent_calls(
    identity: &CallerIdentity,
    store: &TranscriptStore,
    args: &ListRecentCallsArgs,
) -> Vec<Transcript> {
    visible_set(identity, store)
        .into_iter()
        .take(args.effective_limit())
        .cloned()
        .collect()
}

/// Dispatch an operation by name. This is the single normalization point
/// shared by the stdio and HTTP transports.
pub fn execute(
    identity: &CallerIdentity,
    store: &TranscriptStore,
    operation: &str,
    arguments: Option<&Value>,
) -> Result<QueryReply, QueryError> {
    match operation {
        "searchTranscripts" => {
            let args: SearchTranscriptsArgs = parse_args(operation, arguments)?;
            search_transcripts(identity, store, &args).map(QueryReply::Transcripts)
        }
        "getTranscriptDetails" => {
            let args: GetTranscriptDetailsArgs = parse_args(operation, arguments)?;
            get_transcript_details(identity, store, &args).map(QueryReply::Transcript)
        }
        "listRecentCalls" => {
            let args: ListRecentCallsArgs = parse_args(operation, arguments)?;
            Ok(QueryReply::Transcripts(list_recent_calls(
                identity, store, &args,
            )))
        }
        _ => Err(QueryError::UnknownOperation(operation.to_string())),
    }
}

/// Parse an operation's arguments at the engine boundary. Absent arguments
/// are treated as an empty object so operations with only optional fields
/// work without them; missing required fields surface as `InvalidArgument`.
fn parse_args<T: DeserializeOwned>(
    operation: &str,
    arguments: Option<&Value>,
) -> Result<T, QueryError> {
    let value = arguments
        .cloned()
        .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
    serde_json::from_value(value).map_err(|e| QueryError::InvalidArgument {
        operation: operation.to_string(),
        message: e.to_string(),
    })
}
