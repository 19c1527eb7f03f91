//! Tool adapters for the loan risk assistant.
//!
//! Every collaborator role is exposed as a named [`Tool`] with a
//! string-keyed request/response map, and [`LoanRiskToolAgent`] runs the
//! assistant against any [`ToolHost`] offering those tools. This layer
//! only translates shapes; no decision logic lives here.
//!
//! [`Tool`]: loanrisk_core::Tool
//! [`ToolHost`]: loanrisk_core::ToolHost

pub mod codec;
pub mod compose_user_packet;
pub mod get_policy_by_id;
pub mod governance_log;
pub mod interest_policy_resolver;
pub mod policy_docs_retriever;
pub mod remote;
pub mod request_additional_docs;
pub mod risk_scoring_api;
pub mod tool_agent;

use loanrisk_core::{Collaborators, ToolRegistry};

pub use tool_agent::LoanRiskToolAgent;

pub const POLICY_DOCS_RETRIEVER: &str = "policy_docs_retriever";
pub const RISK_SCORING_API: &str = "risk_scoring_api";
pub const GET_POLICY_BY_ID: &str = "get_policy_by_id";
pub const COMPOSE_USER_PACKET: &str = "compose_user_packet";
pub const REQUEST_ADDITIONAL_DOCS: &str = "request_additional_docs";
pub const GOVERNANCE_LOG: &str = "governance_log";
pub const INTEREST_POLICY_RESOLVER: &str = "interest_policy_resolver";

/// Name reported in field errors raised while parsing a `run` request.
pub const ASSISTANT_TOOL: &str = "loan_risk_assistant";

/// Register one tool per collaborator. The resolver tool is only added when
/// the collaborators carry a resolver.
pub fn register_collaborators(registry: &mut ToolRegistry, collaborators: &Collaborators) {
    registry.register(Box::new(policy_docs_retriever::PolicyDocsRetrieverTool::new(
        collaborators.policy_retriever.clone(),
    )));
    registry.register(Box::new(risk_scoring_api::RiskScoringApiTool::new(
        collaborators.risk_scorer.clone(),
    )));
    registry.register(Box::new(get_policy_by_id::GetPolicyByIdTool::new(
        collaborators.policy_lookup.clone(),
    )));
    registry.register(Box::new(compose_user_packet::ComposeUserPacketTool::new(
        collaborators.packet_composer.clone(),
    )));
    registry.register(Box::new(request_additional_docs::RequestAdditionalDocsTool::new(
        collaborators.document_requester.clone(),
    )));
    registry.register(Box::new(governance_log::GovernanceLogTool::new(
        collaborators.governance_log.clone(),
    )));
    if let Some(resolver) = &collaborators.interest_resolver {
        registry.register(Box::new(
            interest_policy_resolver::InterestPolicyResolverTool::new(resolver.clone()),
        ));
    }
}

/// Create a tool registry exposing `collaborators`.
pub fn default_registry(collaborators: &Collaborators) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    register_collaborators(&mut registry, collaborators);
    registry
}
