//! End-to-end integration tests for the loan risk assistant.
//!
//! These tests run the medium-tier scenario through the whole pipeline,
//! first with in-process collaborators and then through the tool adapter
//! layer, where every collaborator call crosses a tool host.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use loanrisk_agent::LoanRiskAssistant;
use loanrisk_core::{
    Attributes, Collaborators, Direction, DocumentRequester, Error, GovernanceLog,
    GovernanceLogRecord, InterestBand, InterestPolicyResolver, LoanApplication, PacketComposer,
    PolicyChunk, PolicyLookup, PolicyRetriever, ReasonCode, Result, RiskFeature, RiskScoreResult,
    RiskScorer, RiskTier, ToolError, ToolHost, ToolPayload, ToolRegistry,
};
use loanrisk_tools::{LoanRiskToolAgent, default_registry};
use serde_json::{Value, json};

// ── Bank collaborators ───────────────────────────────────────────────────

fn map(value: Value) -> Attributes {
    serde_json::from_value(value).unwrap()
}

fn policy_chunk(title: &str) -> PolicyChunk {
    PolicyChunk::new(
        "chunk-xyz",
        title,
        "3.1",
        "Loans flagged as medium risk must document collateral and may carry 6%-8.5% APR.",
    )
    .with_metadata(map(json!({
        "guidance": "Documented collateral required",
        "interest_band": {
            "min_apr": 6.0,
            "max_apr": 8.5,
            "policy_reference": "POL-APR-01",
            "conditions": ["Manual review"]
        },
        "required_documents": ["Collateral appraisal report"]
    })))
}

struct BankPolicies;

#[async_trait]
impl PolicyRetriever for BankPolicies {
    async fn retrieve(&self, _query: &str, top_k: usize) -> Result<Vec<PolicyChunk>> {
        Ok(std::iter::once(policy_chunk("SMB Lending Policy")).take(top_k.min(1)).collect())
    }
}

#[async_trait]
impl PolicyLookup for BankPolicies {
    async fn by_ids(&self, ids: &[String]) -> Result<HashMap<String, PolicyChunk>> {
        Ok(ids
            .iter()
            .map(|id| {
                let mut chunk = policy_chunk("SMB Lending Policy (canonical)");
                chunk.chunk_id = id.clone();
                (id.clone(), chunk)
            })
            .collect())
    }
}

struct BankScorer;

#[async_trait]
impl RiskScorer for BankScorer {
    async fn score(&self, request: Attributes) -> Result<RiskScoreResult> {
        let credit_score = request
            .get("borrower")
            .and_then(|b| b.get("credit_score"))
            .cloned()
            .unwrap_or(json!(0));
        Ok(RiskScoreResult {
            score: 55.0,
            features: vec![RiskFeature {
                code: "CREDIT_SCORE".into(),
                description: "Credit score below internal target".into(),
                value: credit_score,
                direction: Direction::Increase,
                weight: 0.21,
            }],
            reason_codes: vec![ReasonCode::new("CREDIT_SCORE", "Credit score below target")],
        })
    }
}

struct BankComposer;

#[async_trait]
impl PacketComposer for BankComposer {
    async fn compose(&self, payload: Attributes) -> Result<Attributes> {
        Ok(map(json!({"format": "html", "payload": payload})))
    }
}

struct CrmDocuments;

#[async_trait]
impl DocumentRequester for CrmDocuments {
    async fn request(&self, documents: &[String]) -> Result<Attributes> {
        Ok(map(json!({"requested": documents, "crm_ticket": "CRM-12345"})))
    }
}

#[derive(Default)]
struct BankLog {
    events: Mutex<Vec<(String, Attributes)>>,
}

impl BankLog {
    fn event_types(&self) -> Vec<String> {
        self.events.lock().unwrap().iter().map(|(e, _)| e.clone()).collect()
    }

    fn payload(&self, index: usize) -> Attributes {
        self.events.lock().unwrap()[index].1.clone()
    }
}

#[async_trait]
impl GovernanceLog for BankLog {
    async fn log(&self, event_type: &str, payload: Attributes) -> Result<GovernanceLogRecord> {
        let mut events = self.events.lock().unwrap();
        events.push((event_type.to_string(), payload));
        Ok(GovernanceLogRecord::new(event_type, format!("log-{}", events.len())))
    }
}

struct PremiumResolver;

#[async_trait]
impl InterestPolicyResolver for PremiumResolver {
    async fn resolve(&self, _chunks: &[PolicyChunk], tier: RiskTier) -> Result<Option<InterestBand>> {
        Ok(Some(InterestBand {
            min_apr: 9.0,
            max_apr: 10.756,
            policy_reference: format!("PREMIUM-{tier}"),
            conditions: vec!["Quarterly review".into()],
        }))
    }
}

fn bank(log: Arc<BankLog>) -> Collaborators {
    let policies = Arc::new(BankPolicies);
    Collaborators {
        policy_retriever: policies.clone(),
        risk_scorer: Arc::new(BankScorer),
        policy_lookup: policies,
        packet_composer: Arc::new(BankComposer),
        document_requester: Arc::new(CrmDocuments),
        governance_log: log,
        interest_resolver: None,
    }
}

fn scenario_request() -> ToolPayload {
    map(json!({
        "application_id": "APP-001",
        "borrower": {"credit_score": 610, "income_verified": false, "employment_type": "self_employed"},
        "loan": {"collateral_required": true},
        "region": "NY",
        "product": "smb_term"
    }))
}

// ── Counting host ────────────────────────────────────────────────────────

/// A tool host that counts invocations per tool name.
struct CountingHost {
    registry: ToolRegistry,
    calls: Mutex<HashMap<String, usize>>,
}

impl CountingHost {
    fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            calls: Mutex::new(HashMap::new()),
        }
    }

    fn tool_names(&self) -> Vec<String> {
        self.registry.names().into_iter().map(String::from).collect()
    }

    fn count(&self, tool: &str) -> usize {
        self.calls.lock().unwrap().get(tool).copied().unwrap_or(0)
    }
}

#[async_trait]
impl ToolHost for CountingHost {
    async fn invoke_tool(&self, name: &str, request: ToolPayload) -> Result<ToolPayload> {
        *self.calls.lock().unwrap().entry(name.to_string()).or_default() += 1;
        self.registry.invoke_tool(name, request).await
    }
}

fn agent_over(collaborators: &Collaborators) -> (Arc<CountingHost>, LoanRiskToolAgent) {
    let host = Arc::new(CountingHost::new(default_registry(collaborators)));
    let agent = LoanRiskToolAgent::new(host.clone(), host.tool_names(), 5);
    (host, agent)
}

// ── Direct pipeline ──────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_direct_medium_tier_scenario() {
    let log = Arc::new(BankLog::default());
    let assistant = LoanRiskAssistant::new(bank(log.clone()));
    let application: LoanApplication =
        serde_json::from_value(Value::Object(scenario_request())).unwrap();

    let result = assistant.assess(&application).await.unwrap();

    assert_eq!(result.risk_score.value, 55.0);
    assert_eq!(result.risk_score.tier, RiskTier::Med);
    assert_eq!(
        result.interest_rate_suggestion.as_ref().unwrap().band_apr_percent,
        [6.0, 8.5]
    );
    assert!(!result.compliance.policy_gap);
    assert_eq!(
        result.requested_documents,
        vec![
            "Collateral appraisal report",
            "Collateral ownership evidence",
            "Most recent 2 years of tax returns",
            "Recent income verification (e.g., pay stubs or bank statements)",
            "Updated credit bureau report",
        ]
    );
    assert_eq!(result.policy_citations[0].title, "SMB Lending Policy (canonical)");
    assert_eq!(result.reasons[0].detail, "Credit score below target: feature value 610 raised risk");
    assert_eq!(result.reasons[1].label, "Documented collateral required");
    assert_eq!(result.governance_log_ids, vec!["log-1", "log-2", "log-3", "log-4", "log-5"]);

    // No recognised id key in the CRM response.
    assert_eq!(log.payload(3)["tool_response_id"], Value::Null);
}

// ── Through the tool adapter layer ───────────────────────────────────────

#[tokio::test]
async fn e2e_tool_host_runs_same_scenario() {
    let log = Arc::new(BankLog::default());
    let (host, agent) = agent_over(&bank(log.clone()));

    let response = agent.run(scenario_request()).await.unwrap();

    assert_eq!(response["risk_score"]["value"], json!(55.0));
    assert_eq!(response["risk_score"]["tier"], json!("Med"));
    assert_eq!(response["risk_score"]["scale"], json!("0-100"));
    assert_eq!(response["interest_rate_suggestion"]["band_apr_percent"], json!([6.0, 8.5]));
    let documents = response["requested_documents"].as_array().unwrap();
    assert!(documents.contains(&json!("Collateral ownership evidence")));
    assert!(documents.contains(&json!("Collateral appraisal report")));
    assert_eq!(response["compliance"]["policy_gap"], json!(false));
    assert_eq!(response["user_packet"]["format"], json!("html"));

    // Application fields are echoed alongside the result.
    assert_eq!(response["region"], json!("NY"));
    assert_eq!(response["borrower"]["credit_score"], json!(610));

    assert_eq!(host.count("policy_docs_retriever"), 1);
    assert_eq!(host.count("risk_scoring_api"), 1);
    assert_eq!(host.count("get_policy_by_id"), 1);
    assert_eq!(host.count("request_additional_docs"), 1);
    assert_eq!(host.count("compose_user_packet"), 1);
    assert_eq!(host.count("governance_log"), 5);
    assert_eq!(host.count("interest_policy_resolver"), 0);
    assert_eq!(
        log.event_types(),
        vec!["problem_received", "retrieval_done", "risk_scored", "docs_requested", "packet_composed"]
    );
}

#[tokio::test]
async fn e2e_tool_host_and_direct_agree() {
    let direct_log = Arc::new(BankLog::default());
    let assistant = LoanRiskAssistant::new(bank(direct_log));
    let application: LoanApplication =
        serde_json::from_value(Value::Object(scenario_request())).unwrap();
    let direct = assistant.assess(&application).await.unwrap().to_map().unwrap();

    let (_host, agent) = agent_over(&bank(Arc::new(BankLog::default())));
    let hosted = agent.run(scenario_request()).await.unwrap();

    for key in ["risk_score", "reasons", "policy_citations", "requested_documents", "interest_rate_suggestion", "compliance", "governance_log_ids"] {
        assert_eq!(hosted[key], direct[key], "mismatch on {key}");
    }
}

#[tokio::test]
async fn e2e_resolver_tool_overrides_band() {
    let collaborators = bank(Arc::new(BankLog::default())).with_interest_resolver(Arc::new(PremiumResolver));
    let (host, agent) = agent_over(&collaborators);

    let response = agent.run(scenario_request()).await.unwrap();

    assert_eq!(host.count("interest_policy_resolver"), 1);
    assert_eq!(response["interest_rate_suggestion"]["band_apr_percent"], json!([9.0, 10.76]));
    assert_eq!(response["interest_rate_suggestion"]["basis"], json!("PREMIUM-Med"));
}

#[tokio::test]
async fn e2e_resolver_ignored_when_not_advertised() {
    let collaborators = bank(Arc::new(BankLog::default())).with_interest_resolver(Arc::new(PremiumResolver));
    let host = Arc::new(CountingHost::new(default_registry(&collaborators)));
    let advertised: Vec<String> = host
        .tool_names()
        .into_iter()
        .filter(|name| name != "interest_policy_resolver")
        .collect();
    let agent = LoanRiskToolAgent::new(host.clone(), advertised, 5);

    let response = agent.run(scenario_request()).await.unwrap();

    assert_eq!(host.count("interest_policy_resolver"), 0);
    assert_eq!(response["interest_rate_suggestion"]["basis"], json!("POL-APR-01"));
}

#[tokio::test]
async fn e2e_missing_application_field_is_reported() {
    let (host, agent) = agent_over(&bank(Arc::new(BankLog::default())));
    let mut request = scenario_request();
    request.remove("borrower");

    let err = agent.run(request).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Tool(ToolError::MissingField { ref tool, ref field })
            if tool == "loan_risk_assistant" && field == "borrower"
    ));
    assert_eq!(host.count("governance_log"), 0);
}

#[tokio::test]
async fn e2e_host_without_required_tool_fails() {
    let collaborators = bank(Arc::new(BankLog::default()));
    let mut registry = ToolRegistry::new();
    loanrisk_tools::register_collaborators(&mut registry, &collaborators);
    let full_names: Vec<String> = registry.names().into_iter().map(String::from).collect();

    // A host that only offers the governance log.
    let mut partial = ToolRegistry::new();
    partial.register(Box::new(loanrisk_tools::governance_log::GovernanceLogTool::new(
        collaborators.governance_log.clone(),
    )));
    let agent = LoanRiskToolAgent::new(Arc::new(partial), full_names, 5);

    let err = agent.run(scenario_request()).await.unwrap_err();
    assert!(matches!(err, Error::Tool(ToolError::NotFound(ref name)) if name == "policy_docs_retriever"));
}
