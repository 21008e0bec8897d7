//! Transcript data model and the read-only in-memory store.
//!
//! The store is loaded once at startup and never mutated afterwards; every
//! query operation is a pure read over it. Store order is significant: it is
//! the tie-break for search results and the "most-recent-first" ordering
//! `listRecentCalls` relies on.

use serde::{Deserialize, Serialize};

/// A single speech segment within a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptChunk {
    pub speaker: String,
    pub text: String,
    pub timestamp: String,
}

/// One call-transcript record. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    pub id: String,
    pub client_name: String,
    /// ISO-8601 calendar date (`YYYY-MM-DD`).
    pub date: String,
    pub participants: Vec<String>,
    pub content: String,
    pub chunks: Vec<TranscriptChunk>,
    pub action_items: Vec<String>,
}

/// Read-only collection of transcripts, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct TranscriptStore {
    transcripts: Vec<Transcript>,
}

impl TranscriptStore {
    pub fn new(transcripts: Vec<Transcript>) -> Self {
        Self { transcripts }
    }

    /// All transcripts in store order.
    pub fn all(&self) -> &[Transcript] {
        &self.transcripts
    }

    /// Exact-id lookup across the entire store, ignoring any access scope.
    pub fn get(&self, id: &str) -> Option<&Transcript> {
        self.transcripts.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.transcripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }

    /// The built-in demo fixture: three transcripts across two clients.
    pub fn demo() -> Self {
        Self::new(vec![
            Transcript {
                id: "transcript-001".into(),
                client_name: "Client X".into(),
                date: "2024-10-15".into(),
                participants: vec!["John (ACC)".into(), "Sarah (Client X)".into()],
                content: "Discussion about Q4 forecasting concerns. The CFO expressed worry about accuracy...".into(),
                chunks: vec![TranscriptChunk {
                    speaker: "Sarah".into(),
                    text: "We are concerned about forecasting accuracy for Q4".into(),
                    timestamp: "00:05:23".into(),
                }],
                action_items: vec![
                    "Review forecasting models by month-end".into(),
                    "Schedule follow-up for November".into(),
                ],
            },
            Transcript {
                id: "transcript-002".into(),
                client_name: "Client Y".into(),
                date: "2024-10-20".into(),
                participants: vec!["John (ACC)".into(), "Mike (Client Y)".into()],
                content: "Pipeline review and cash flow planning for next quarter...".into(),
                chunks: vec![TranscriptChunk {
                    speaker: "Mike".into(),
                    text: "Our cash flow projections need adjustment based on new contracts".into(),
                    timestamp: "00:10:45".into(),
                }],
                action_items: vec![
                    "Update cash flow model".into(),
                    "Send revised projections by Friday".into(),
                ],
            },
            Transcript {
                id: "transcript-003".into(),
                client_name: "Client X".into(),
                date: "2024-10-22".into(),
                participants: vec![
                    "John (ACC)".into(),
                    "Sarah (Client X)".into(),
                    "Tom (Client X CFO)".into(),
                ],
                content: "Follow-up on forecasting models. CFO wants better predictive accuracy by year-end...".into(),
                chunks: vec![TranscriptChunk {
                    speaker: "Tom".into(),
                    text: "We need those improved forecasting models implemented before Q4 close".into(),
                    timestamp: "00:15:30".into(),
                }],
                action_items: vec![
                    "Implement new forecasting algorithm".into(),
                    "Training session for Client X team".into(),
                ],
            },
        ])
    }
}
