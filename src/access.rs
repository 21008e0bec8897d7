//! Access control: credential authentication and client-scope checks.
//!
//! Credentials are opaque bearer strings mapped to identities by a static
//! table built at startup. Authentication is exact string equality — no
//! hashing, no expiry. Missing header, malformed scheme, and unknown token
//! are indistinguishable to the caller; only internal logs record which case
//! occurred.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Access level attached to an identity. `write` and `admin` are not
/// differentiated by authorization logic today; `admin` identities carry
/// wildcard client scope by convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Read,
    Write,
    Admin,
}

/// The set of clients an identity may see: everything, or an explicit list.
///
/// On the wire this is a string array where `"*"` anywhere means wildcard,
/// matching the original key-table format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub enum ClientScope {
    All,
    Named(Vec<String>),
}

impl From<Vec<String>> for ClientScope {
    fn from(names: Vec<String>) -> Self {
        if names.iter().any(|n| n == "*") {
            Self::All
        } else {
            Self::Named(names)
        }
    }
}

impl From<ClientScope> for Vec<String> {
    fn from(scope: ClientScope) -> Self {
        match scope {
            ClientScope::All => vec!["*".into()],
            ClientScope::Named(names) => names,
        }
    }
}

impl ClientScope {
    fn describe(&self) -> String {
        match self {
            Self::All => "*".into(),
            Self::Named(names) => names.join(", "),
        }
    }
}

/// The resolved principal behind a presented credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerIdentity {
    pub email: String,
    pub allowed_clients: ClientScope,
    pub access_level: AccessLevel,
}

impl CallerIdentity {
    /// True iff this identity may see `client_name`. Wildcard scope passes
    /// everything; explicit scope is a verbatim, case-sensitive match.
    pub fn can_access_client(&self, client_name: &str) -> bool {
        match &self.allowed_clients {
            ClientScope::All => true,
            ClientScope::Named(names) => names.iter().any(|n| n == client_name),
        }
    }
}

/// Static credential → identity table, constructed once at startup and
/// injected wherever authentication happens (no global singleton).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct IdentityTable {
    identities: HashMap<String, CallerIdentity>,
}

impl IdentityTable {
    pub fn new(identities: HashMap<String, CallerIdentity>) -> Self {
        Self { identities }
    }

    /// Authenticate a raw credential string. Logs the outcome for the audit
    /// trail; the `None` result never distinguishes unknown from malformed.
    pub fn authenticate(&self, credential: &str) -> Option<&CallerIdentity> {
        match self.identities.get(credential) {
            Some(identity) => {
                tracing::info!(
                    email = %identity.email,
                    access_level = ?identity.access_level,
                    clients = %identity.allowed_clients.describe(),
                    "authenticated"
                );
                Some(identity)
            }
            None => {
                let prefix: String = credential.chars().take(10).collect();
                tracing::warn!("invalid API key: {prefix}...");
                None
            }
        }
    }

    /// Authenticate from a raw `Authorization` header value. Missing header
    /// and non-Bearer schemes fail the same way an unknown token does.
    pub fn authenticate_bearer(&self, header: Option<&str>) -> Option<&CallerIdentity> {
        let token = match header.and_then(|h| h.strip_prefix("Bearer ")) {
            Some(t) => t,
            None => {
                tracing::warn!("no bearer token provided");
                return None;
            }
        };
        self.authenticate(token)
    }

    /// The built-in demo table: three keys mirroring the original deployment.
    pub fn demo() -> Self {
        let mut identities = HashMap::new();
        identities.insert(
            "acc-demo-key-001".into(),
            CallerIdentity {
                email: "demo@accfinance.com".into(),
                allowed_clients: ClientScope::All,
                access_level: AccessLevel::Admin,
            },
        );
        identities.insert(
            "acc-john-key-002".into(),
            CallerIdentity {
                email: "john@accfinance.com".into(),
                allowed_clients: ClientScope::Named(vec!["Client X".into(), "Client Y".into()]),
                access_level: AccessLevel::Read,
            },
        );
        identities.insert(
            "acc-sarah-key-003".into(),
            CallerIdentity {
                email: "sarah@accfinance.com".into(),
                allowed_clients: ClientScope::Named(vec!["Client Z".into()]),
                access_level: AccessLevel::Read,
            },
        );
        Self { identities }
    }
}
