//! Deterministic in-process collaborators for the CLI.
//!
//! A one-chunk policy corpus, a fixed scorer, an HTML composer, a document
//! requester and an in-memory governance log. Enough to run the full
//! pipeline without any external service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use loanrisk_core::{
    Attributes, Collaborators, Direction, DocumentRequester, GovernanceLog, GovernanceLogRecord,
    PacketComposer, PolicyChunk, PolicyLookup, PolicyRetriever, ReasonCode, Result, RiskFeature,
    RiskScoreResult, RiskScorer,
};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// The sample application used when no `--input` is given.
pub fn sample_application() -> Attributes {
    let sample = json!({
        "application_id": "APP-123",
        "borrower": {
            "credit_score": 645,
            "dti": 0.46,
            "employment_type": "self_employed",
            "income_verified": false
        },
        "loan": {
            "amount": 250000,
            "term_months": 60,
            "collateral_required": true
        },
        "region": "CA",
        "product": "smb_term"
    });
    match sample {
        Value::Object(map) => map,
        _ => Attributes::new(),
    }
}

/// Build the full demo collaborator set around `governance_log`.
pub fn collaborators(governance_log: Arc<InMemoryGovernanceLog>) -> Collaborators {
    let corpus = Arc::new(PolicyCorpus::demo());
    Collaborators {
        policy_retriever: corpus.clone(),
        risk_scorer: Arc::new(FixedScorer),
        policy_lookup: corpus,
        packet_composer: Arc::new(HtmlComposer),
        document_requester: Arc::new(TicketingDocumentRequester),
        governance_log,
        interest_resolver: None,
    }
}

/// A static list of chunks serving both search and id lookup.
pub struct PolicyCorpus {
    chunks: Vec<PolicyChunk>,
}

impl PolicyCorpus {
    pub fn demo() -> Self {
        let metadata = json!({
            "guidance": "Tier-based interest premium",
            "interest_band": {
                "min_apr": 7.25,
                "max_apr": 9.5,
                "policy_reference": "POL-INT-2024-1",
                "conditions": ["Auto-pay enrollment"]
            },
            "required_documents": ["Signed personal financial statement"]
        });
        let chunk = PolicyChunk::new(
            "chunk-001",
            "SMB Term Lending Manual",
            "4.2",
            "For high-risk SMB borrowers, apply a premium between 7.25% and 9.5% APR contingent on auto-pay enrollment.",
        );
        let chunk = match metadata {
            Value::Object(map) => chunk.with_metadata(map),
            _ => chunk,
        };
        Self { chunks: vec![chunk] }
    }
}

#[async_trait]
impl PolicyRetriever for PolicyCorpus {
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<PolicyChunk>> {
        tracing::debug!(query, top_k, "Searching demo policy corpus");
        Ok(self.chunks.iter().take(top_k).cloned().collect())
    }
}

#[async_trait]
impl PolicyLookup for PolicyCorpus {
    async fn by_ids(&self, ids: &[String]) -> Result<HashMap<String, PolicyChunk>> {
        Ok(self
            .chunks
            .iter()
            .filter(|chunk| ids.contains(&chunk.chunk_id))
            .map(|chunk| (chunk.chunk_id.clone(), chunk.clone()))
            .collect())
    }
}

/// Always scores 72, echoing the borrower's credit score and DTI as features.
pub struct FixedScorer;

#[async_trait]
impl RiskScorer for FixedScorer {
    async fn score(&self, request: Attributes) -> Result<RiskScoreResult> {
        let borrower = request.get("borrower").and_then(Value::as_object);
        let attr = |key: &str, default: Value| {
            borrower
                .and_then(|b| b.get(key))
                .cloned()
                .unwrap_or(default)
        };

        Ok(RiskScoreResult {
            score: 72.0,
            features: vec![
                RiskFeature {
                    code: "CREDIT_SCORE".into(),
                    description: "Credit score below 680".into(),
                    value: attr("credit_score", json!(0)),
                    direction: Direction::Increase,
                    weight: 0.27,
                },
                RiskFeature {
                    code: "DTI_RATIO".into(),
                    description: "Debt-to-income ratio above 40%".into(),
                    value: attr("dti", json!(0.0)),
                    direction: Direction::Increase,
                    weight: 0.19,
                },
            ],
            reason_codes: vec![
                ReasonCode::new("CREDIT_SCORE", "Credit score below tier threshold"),
                ReasonCode::new("DTI_RATIO", "Elevated debt-to-income ratio"),
            ],
        })
    }
}

/// Renders the packet payload as a small HTML summary.
pub struct HtmlComposer;

#[async_trait]
impl PacketComposer for HtmlComposer {
    async fn compose(&self, payload: Attributes) -> Result<Attributes> {
        let score = payload.get("risk_score").unwrap_or(&Value::Null);
        let mut html = String::from("<h1>Loan Assessment</h1>");
        html.push_str(&format!(
            "<p>Risk Score: {} ({})</p>",
            score["value"],
            score["tier"].as_str().unwrap_or_default()
        ));
        html.push_str("<ul>");
        for reason in payload.get("reasons").and_then(Value::as_array).into_iter().flatten() {
            html.push_str(&format!(
                "<li>{}: {}</li>",
                reason["label"].as_str().unwrap_or_default(),
                reason["detail"].as_str().unwrap_or_default()
            ));
        }
        html.push_str("</ul>");

        let mut packet = Attributes::new();
        packet.insert("format".into(), "html".into());
        packet.insert("content".into(), html.into());
        Ok(packet)
    }
}

/// Opens a document request ticket with a fresh id.
pub struct TicketingDocumentRequester;

#[async_trait]
impl DocumentRequester for TicketingDocumentRequester {
    async fn request(&self, documents: &[String]) -> Result<Attributes> {
        let request_id = format!("doc-req-{}", uuid::Uuid::new_v4());
        tracing::info!(%request_id, documents = documents.len(), "Document request opened");

        let mut ticket = Attributes::new();
        ticket.insert("requested".into(), json!(documents));
        ticket.insert("request_id".into(), request_id.into());
        ticket.insert("requested_at".into(), Utc::now().to_rfc3339().into());
        Ok(ticket)
    }
}

/// One appended governance event.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub log_id: String,
    pub event_type: String,
    pub payload: Attributes,
    pub payload_hash: String,
    pub recorded_at: DateTime<Utc>,
}

/// Append-only governance log with sequential `log-N` ids.
pub struct InMemoryGovernanceLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl InMemoryGovernanceLog {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

/// Hex SHA-256 of the payload's JSON encoding.
pub fn payload_hash(payload: &Attributes) -> Result<String> {
    let bytes = serde_json::to_vec(payload)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

#[async_trait]
impl GovernanceLog for InMemoryGovernanceLog {
    async fn log(&self, event_type: &str, payload: Attributes) -> Result<GovernanceLogRecord> {
        let hash = payload_hash(&payload)?;
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| loanrisk_core::CollaboratorError::Unavailable("governance log".into()))?;

        let log_id = format!("log-{}", entries.len() + 1);
        entries.push(LogEntry {
            log_id: log_id.clone(),
            event_type: event_type.to_string(),
            payload,
            payload_hash: hash.clone(),
            recorded_at: Utc::now(),
        });
        tracing::debug!(%log_id, event_type, "Governance event appended");

        Ok(GovernanceLogRecord::new(event_type, log_id).with_payload_hash(hash))
    }
}
