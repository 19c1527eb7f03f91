//! Collaborator traits: the external services an assessment depends on.
//!
//! Each role is one trait. Implementations live elsewhere: in-process
//! bindings, or the tool-host proxies in `loanrisk-tools`. All of them must
//! be safe to call from concurrent assessments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::application::Attributes;
use crate::error::Result;
use crate::governance::GovernanceLogRecord;
use crate::policy::{InterestBand, PolicyChunk};
use crate::risk::{RiskScoreResult, RiskTier};

/// Search the policy corpus.
#[async_trait]
pub trait PolicyRetriever: Send + Sync {
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<PolicyChunk>>;
}

/// Score a loan application.
#[async_trait]
pub trait RiskScorer: Send + Sync {
    async fn score(&self, request: Attributes) -> Result<RiskScoreResult>;
}

/// Resolve canonical chunks by id. Missing ids are simply absent from the result.
#[async_trait]
pub trait PolicyLookup: Send + Sync {
    async fn by_ids(&self, ids: &[String]) -> Result<HashMap<String, PolicyChunk>>;
}

/// Render the outbound user packet for a delivery channel.
#[async_trait]
pub trait PacketComposer: Send + Sync {
    async fn compose(&self, payload: Attributes) -> Result<Attributes>;
}

/// Trigger the document collection workflow.
#[async_trait]
pub trait DocumentRequester: Send + Sync {
    async fn request(&self, documents: &[String]) -> Result<Attributes>;
}

/// Append one event to the governance log.
#[async_trait]
pub trait GovernanceLog: Send + Sync {
    async fn log(&self, event_type: &str, payload: Attributes) -> Result<GovernanceLogRecord>;
}

/// Optional override for interest band selection.
#[async_trait]
pub trait InterestPolicyResolver: Send + Sync {
    async fn resolve(&self, chunks: &[PolicyChunk], tier: RiskTier) -> Result<Option<InterestBand>>;
}

/// The full set of collaborators injected into the assistant.
#[derive(Clone)]
pub struct Collaborators {
    pub policy_retriever: Arc<dyn PolicyRetriever>,
    pub risk_scorer: Arc<dyn RiskScorer>,
    pub policy_lookup: Arc<dyn PolicyLookup>,
    pub packet_composer: Arc<dyn PacketComposer>,
    pub document_requester: Arc<dyn DocumentRequester>,
    pub governance_log: Arc<dyn GovernanceLog>,
    pub interest_resolver: Option<Arc<dyn InterestPolicyResolver>>,
}

impl Collaborators {
    pub fn with_interest_resolver(mut self, resolver: Arc<dyn InterestPolicyResolver>) -> Self {
        self.interest_resolver = Some(resolver);
        self
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("interest_resolver", &self.interest_resolver.is_some())
            .finish_non_exhaustive()
    }
}
