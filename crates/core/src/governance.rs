//! Governance log events and records.
//!
//! Every pipeline step that produces an audit record goes through one of
//! these event types. The order in which they are written is observable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline events written to the governance log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GovernanceEvent {
    ProblemReceived,
    RetrievalDone,
    RiskScored,
    DocsRequested,
    PacketComposed,
}

impl GovernanceEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            GovernanceEvent::ProblemReceived => "problem_received",
            GovernanceEvent::RetrievalDone => "retrieval_done",
            GovernanceEvent::RiskScored => "risk_scored",
            GovernanceEvent::DocsRequested => "docs_requested",
            GovernanceEvent::PacketComposed => "packet_composed",
        }
    }
}

impl fmt::Display for GovernanceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Acknowledgement returned by the governance logger for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceLogRecord {
    pub event_type: String,
    pub log_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_hash: Option<String>,
}

impl GovernanceLogRecord {
    pub fn new(event_type: impl Into<String>, log_id: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            log_id: log_id.into(),
            payload_hash: None,
        }
    }

    pub fn with_payload_hash(mut self, hash: impl Into<String>) -> Self {
        self.payload_hash = Some(hash.into());
        self
    }
}
