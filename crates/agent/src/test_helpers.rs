//! Shared test doubles for assistant tests.

use async_trait::async_trait;
use loanrisk_core::{
    Attributes, CollaboratorError, Collaborators, Direction, DocumentRequester, GovernanceLog,
    GovernanceLogRecord, InterestBand, InterestPolicyResolver, LoanApplication, PacketComposer,
    PolicyChunk, PolicyLookup, PolicyRetriever, ReasonCode, Result, RiskFeature, RiskScoreResult,
    RiskScorer, RiskTier,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::Arc;

pub fn attrs(value: Value) -> Attributes {
    serde_json::from_value(value).unwrap()
}

pub fn policy_chunk(id: &str, metadata: Value) -> PolicyChunk {
    PolicyChunk::new(
        id,
        "SMB Lending Policy",
        "3.1",
        "Loans flagged as medium risk must document collateral and may carry 6%-8.5% APR.",
    )
    .with_metadata(attrs(metadata))
}

/// The chunk from the medium-tier scenario: guidance, a band and one required document.
pub fn scenario_chunk() -> PolicyChunk {
    policy_chunk(
        "chunk-xyz",
        json!({
            "guidance": "Documented collateral required",
            "interest_band": {
                "min_apr": 6.0,
                "max_apr": 8.5,
                "policy_reference": "POL-APR-01",
                "conditions": ["Manual review"]
            },
            "required_documents": ["Collateral appraisal report"]
        }),
    )
}

pub fn application(borrower: Value, loan: Value) -> LoanApplication {
    LoanApplication::new("APP-001", attrs(borrower), attrs(loan), "NY", "smb_term")
}

/// Self-employed, unverified income, collateral required without documents.
pub fn scenario_application() -> LoanApplication {
    application(
        json!({"credit_score": 610, "income_verified": false, "employment_type": "self_employed"}),
        json!({"collateral_required": true}),
    )
}

/// Returns a fixed chunk list, truncated to `top_k`.
pub struct StaticRetriever {
    chunks: Mutex<Vec<PolicyChunk>>,
    calls: Mutex<Vec<(String, usize)>>,
}

impl StaticRetriever {
    pub fn new(chunks: Vec<PolicyChunk>) -> Self {
        Self {
            chunks: Mutex::new(chunks),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_chunks(&self, chunks: Vec<PolicyChunk>) {
        *self.chunks.lock().unwrap() = chunks;
    }

    pub fn last_call(&self) -> Option<(String, usize)> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl PolicyRetriever for StaticRetriever {
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<PolicyChunk>> {
        self.calls.lock().unwrap().push((query.to_string(), top_k));
        Ok(self.chunks.lock().unwrap().iter().take(top_k).cloned().collect())
    }
}

pub struct StaticScorer {
    pub result: Mutex<RiskScoreResult>,
}

impl StaticScorer {
    /// Score 55 with a single `CREDIT_SCORE` reason.
    pub fn medium() -> Self {
        Self {
            result: Mutex::new(RiskScoreResult {
                score: 55.0,
                features: vec![RiskFeature {
                    code: "CREDIT_SCORE".into(),
                    description: "Credit score below internal target".into(),
                    value: json!(610),
                    direction: Direction::Increase,
                    weight: 0.21,
                }],
                reason_codes: vec![ReasonCode::new("CREDIT_SCORE", "Credit score below target")],
            }),
        }
    }
}

#[async_trait]
impl RiskScorer for StaticScorer {
    async fn score(&self, _request: Attributes) -> Result<RiskScoreResult> {
        Ok(self.result.lock().unwrap().clone())
    }
}

/// Resolves ids against a fixed canonical set.
pub struct StaticLookup {
    chunks: Mutex<Vec<PolicyChunk>>,
    calls: Mutex<usize>,
}

impl StaticLookup {
    pub fn new(chunks: Vec<PolicyChunk>) -> Self {
        Self {
            chunks: Mutex::new(chunks),
            calls: Mutex::new(0),
        }
    }

    pub fn set_chunks(&self, chunks: Vec<PolicyChunk>) {
        *self.chunks.lock().unwrap() = chunks;
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl PolicyLookup for StaticLookup {
    async fn by_ids(&self, ids: &[String]) -> Result<HashMap<String, PolicyChunk>> {
        *self.calls.lock().unwrap() += 1;
        Ok(self
            .chunks
            .lock()
            .unwrap()
            .iter()
            .filter(|c| ids.contains(&c.chunk_id))
            .map(|c| (c.chunk_id.clone(), c.clone()))
            .collect())
    }
}

pub struct HtmlComposer;

#[async_trait]
impl PacketComposer for HtmlComposer {
    async fn compose(&self, _payload: Attributes) -> Result<Attributes> {
        Ok(attrs(json!({"format": "html", "content": "ok"})))
    }
}

pub struct FailingComposer;

#[async_trait]
impl PacketComposer for FailingComposer {
    async fn compose(&self, _payload: Attributes) -> Result<Attributes> {
        Err(CollaboratorError::failed("packet composer", "channel offline").into())
    }
}

pub struct RecordingDocs {
    calls: Mutex<Vec<Vec<String>>>,
}

impl RecordingDocs {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl DocumentRequester for RecordingDocs {
    async fn request(&self, documents: &[String]) -> Result<Attributes> {
        self.calls.lock().unwrap().push(documents.to_vec());
        Ok(attrs(json!({"requested": documents, "request_id": "doc-req-1"})))
    }
}

/// Records every event and hands out sequential `log-N` ids.
pub struct RecordingGovernanceLog {
    events: Mutex<Vec<(String, Attributes)>>,
}

impl RecordingGovernanceLog {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<(String, Attributes)> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_types(&self) -> Vec<String> {
        self.events().into_iter().map(|(event, _)| event).collect()
    }
}

#[async_trait]
impl GovernanceLog for RecordingGovernanceLog {
    async fn log(&self, event_type: &str, payload: Attributes) -> Result<GovernanceLogRecord> {
        let mut events = self.events.lock().unwrap();
        events.push((event_type.to_string(), payload));
        Ok(GovernanceLogRecord::new(event_type, format!("log-{}", events.len())))
    }
}

pub struct FixedResolver {
    band: Option<InterestBand>,
    tiers: Mutex<Vec<RiskTier>>,
}

impl FixedResolver {
    pub fn new(band: Option<InterestBand>) -> Self {
        Self {
            band,
            tiers: Mutex::new(Vec::new()),
        }
    }

    pub fn seen_tiers(&self) -> Vec<RiskTier> {
        self.tiers.lock().unwrap().clone()
    }
}

#[async_trait]
impl InterestPolicyResolver for FixedResolver {
    async fn resolve(&self, _chunks: &[PolicyChunk], tier: RiskTier) -> Result<Option<InterestBand>> {
        self.tiers.lock().unwrap().push(tier);
        Ok(self.band.clone())
    }
}

/// A complete set of recording collaborators for the medium-tier scenario.
pub struct Fixture {
    pub retriever: Arc<StaticRetriever>,
    pub risk: Arc<StaticScorer>,
    pub lookup: Arc<StaticLookup>,
    pub documents: Arc<RecordingDocs>,
    pub governance: Arc<RecordingGovernanceLog>,
}

impl Fixture {
    pub fn standard() -> Self {
        Self {
            retriever: Arc::new(StaticRetriever::new(vec![scenario_chunk()])),
            risk: Arc::new(StaticScorer::medium()),
            lookup: Arc::new(StaticLookup::new(vec![scenario_chunk()])),
            documents: Arc::new(RecordingDocs::new()),
            governance: Arc::new(RecordingGovernanceLog::new()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            policy_retriever: self.retriever.clone(),
            risk_scorer: self.risk.clone(),
            policy_lookup: self.lookup.clone(),
            packet_composer: Arc::new(HtmlComposer),
            document_requester: self.documents.clone(),
            governance_log: self.governance.clone(),
            interest_resolver: None,
        }
    }
}
