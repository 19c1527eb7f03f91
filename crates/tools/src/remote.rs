//! Collaborators backed by a tool host.
//!
//! Each trait method encodes the native call as a wire request, invokes the named
//! tool on the host and decodes the response. Host errors pass through
//! unchanged.

use async_trait::async_trait;
use loanrisk_core::{
    Attributes, DocumentRequester, GovernanceLog, GovernanceLogRecord, InterestBand,
    InterestPolicyResolver, PacketComposer, PolicyChunk, PolicyLookup, PolicyRetriever, Result,
    RiskScoreResult, RiskScorer, RiskTier, ToolHost, ToolPayload,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

use crate::codec::{self, Reader};
use crate::{
    COMPOSE_USER_PACKET, GET_POLICY_BY_ID, GOVERNANCE_LOG, INTEREST_POLICY_RESOLVER,
    POLICY_DOCS_RETRIEVER, REQUEST_ADDITIONAL_DOCS, RISK_SCORING_API,
};

/// Every collaborator role, served by one tool host.
#[derive(Clone)]
pub struct HostCollaborator {
    host: Arc<dyn ToolHost>,
}

impl HostCollaborator {
    pub fn new(host: Arc<dyn ToolHost>) -> Self {
        Self { host }
    }

    async fn call(&self, tool: &str, request: serde_json::Value) -> Result<ToolPayload> {
        let request: ToolPayload = serde_json::from_value(request)?;
        tracing::debug!(tool, "Forwarding collaborator call to tool host");
        self.host.invoke_tool(tool, request).await
    }
}

#[async_trait]
impl PolicyRetriever for HostCollaborator {
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<PolicyChunk>> {
        let response = self.call(POLICY_DOCS_RETRIEVER, json!({"query": query, "top_k": top_k})).await?;
        Ok(codec::policy_chunks(&Reader::new(POLICY_DOCS_RETRIEVER, &response), "chunks", true)?)
    }
}

#[async_trait]
impl RiskScorer for HostCollaborator {
    async fn score(&self, request: Attributes) -> Result<RiskScoreResult> {
        let response = self.call(RISK_SCORING_API, json!({"payload": request})).await?;
        Ok(codec::risk_score_result(&Reader::new(RISK_SCORING_API, &response))?)
    }
}

#[async_trait]
impl PolicyLookup for HostCollaborator {
    async fn by_ids(&self, ids: &[String]) -> Result<HashMap<String, PolicyChunk>> {
        let response = self.call(GET_POLICY_BY_ID, json!({"ids": ids})).await?;
        let chunks = codec::policy_chunks(&Reader::new(GET_POLICY_BY_ID, &response), "chunks", true)?;
        Ok(chunks
            .into_iter()
            .map(|chunk| (chunk.chunk_id.clone(), chunk))
            .collect())
    }
}

#[async_trait]
impl PacketComposer for HostCollaborator {
    async fn compose(&self, payload: Attributes) -> Result<Attributes> {
        let response = self.call(COMPOSE_USER_PACKET, json!({"data": payload})).await?;
        Ok(Reader::new(COMPOSE_USER_PACKET, &response).object("packet")?.clone())
    }
}

#[async_trait]
impl DocumentRequester for HostCollaborator {
    async fn request(&self, documents: &[String]) -> Result<Attributes> {
        let response = self.call(REQUEST_ADDITIONAL_DOCS, json!({"documents": documents})).await?;
        Ok(Reader::new(REQUEST_ADDITIONAL_DOCS, &response).object("request")?.clone())
    }
}

#[async_trait]
impl GovernanceLog for HostCollaborator {
    async fn log(&self, event_type: &str, payload: Attributes) -> Result<GovernanceLogRecord> {
        let response = self
            .call(GOVERNANCE_LOG, json!({"event_type": event_type, "payload": payload}))
            .await?;
        Ok(codec::governance_record(&Reader::new(GOVERNANCE_LOG, &response))?)
    }
}

#[async_trait]
impl InterestPolicyResolver for HostCollaborator {
    async fn resolve(&self, chunks: &[PolicyChunk], tier: RiskTier) -> Result<Option<InterestBand>> {
        let response = self
            .call(INTEREST_POLICY_RESOLVER, json!({"policy_chunks": chunks, "risk_tier": tier.as_str()}))
            .await?;
        let r = Reader::new(INTEREST_POLICY_RESOLVER, &response);
        // A falsy band (absent, null or empty) means the host has no override.
        match r.optional_object("band")? {
            Some(band) if !band.is_empty() => {
                Ok(Some(codec::interest_band(&Reader::new(INTEREST_POLICY_RESOLVER, band))?))
            }
            _ => Ok(None),
        }
    }
}
