//! The assessment pipeline.
//!
//! # Flow
//!
//! 1. Log `problem_received`
//! 2. Retrieve policy chunks, log `retrieval_done`
//! 3. Score the application, log `risk_scored`
//! 4. Resolve canonical chunks
//! 5. Derive tier, reasons and requested documents; request documents and
//!    log `docs_requested` when any are needed
//! 6. Select an interest band
//! 7. Compose the user packet, log `packet_composed`
//! 8. Return the structured result
//!
//! Every collaborator call is awaited before the next one starts, so the
//! governance log ids come back in pipeline order. Any collaborator error
//! aborts the assessment.

use loanrisk_config::AssessmentConfig;
use loanrisk_core::assessment::SCORE_SCALE;
use loanrisk_core::{
    AssessmentResult, Attributes, Collaborators, Compliance, GovernanceEvent, InterestBand,
    InterestRateSuggestion, LoanApplication, PacketScore, PolicyChunk, Result, RiskScoreSummary,
    RiskTier, UserPacketPayload,
};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::decision;

/// Default number of policy chunks requested from the retriever.
pub const DEFAULT_POLICY_TOP_K: usize = 5;

/// Coordinates one assessment across all collaborators.
///
/// Holds no mutable state; a single instance can serve concurrent assessments.
#[derive(Debug, Clone)]
pub struct LoanRiskAssistant {
    collaborators: Collaborators,
    policy_top_k: usize,
}

impl LoanRiskAssistant {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            policy_top_k: DEFAULT_POLICY_TOP_K,
        }
    }

    pub fn from_config(collaborators: Collaborators, config: &AssessmentConfig) -> Self {
        Self::new(collaborators).with_policy_top_k(config.policy_top_k)
    }

    pub fn with_policy_top_k(mut self, top_k: usize) -> Self {
        self.policy_top_k = top_k;
        self
    }

    pub fn policy_top_k(&self) -> usize {
        self.policy_top_k
    }

    /// Run the end-to-end assessment for a single application.
    pub async fn assess(&self, application: &LoanApplication) -> Result<AssessmentResult> {
        let c = &self.collaborators;
        let app_id = application.application_id.as_str();
        let mut log_ids: Vec<String> = Vec::new();

        info!(application_id = %app_id, region = %application.region, product = %application.product, "Assessment started");

        // ── Receipt ──
        log_ids.push(
            self.log(
                GovernanceEvent::ProblemReceived,
                json!({
                    "application_id": app_id,
                    "region": application.region,
                    "product": application.product,
                    "redactions": true,
                }),
            )
            .await?,
        );

        // ── Retrieval ──
        let query = decision::build_policy_query(application);
        let retrieved = c.policy_retriever.retrieve(&query, self.policy_top_k).await?;
        let chunk_ids: Vec<String> = retrieved.iter().map(|chunk| chunk.chunk_id.clone()).collect();
        debug!(chunks = retrieved.len(), "Policy chunks retrieved");
        log_ids.push(
            self.log(
                GovernanceEvent::RetrievalDone,
                json!({
                    "application_id": app_id,
                    "query": query,
                    "chunk_ids": chunk_ids,
                }),
            )
            .await?,
        );

        // ── Scoring ──
        let risk = c.risk_scorer.score(decision::build_risk_request(application)).await?;
        let score = risk.validated_score()?;
        let reason_codes: Vec<&str> = risk.reason_codes.iter().map(|r| r.code.as_str()).collect();
        debug!(score, reason_codes = reason_codes.len(), "Application scored");
        log_ids.push(
            self.log(
                GovernanceEvent::RiskScored,
                json!({
                    "application_id": app_id,
                    "risk_score": score,
                    "reason_codes": reason_codes,
                }),
            )
            .await?,
        );

        // ── Canonical policy ──
        let resolved = self.resolve_chunks(retrieved, &chunk_ids).await?;
        let tier = RiskTier::from_score(score);
        let reasons = decision::build_reasons(&risk, &resolved);
        let policy_citations = decision::build_policy_citations(&resolved);

        // ── Documents ──
        let requested_documents =
            decision::determine_requested_documents(application, &risk, &resolved);
        if !requested_documents.is_empty() {
            let response = c.document_requester.request(&requested_documents).await?;
            let request_id = decision::extract_request_id(&response);
            debug!(documents = requested_documents.len(), request_id = ?request_id, "Documents requested");
            log_ids.push(
                self.log(
                    GovernanceEvent::DocsRequested,
                    json!({
                        "application_id": app_id,
                        "requested_documents": requested_documents,
                        "tool_response_id": request_id,
                    }),
                )
                .await?,
            );
        }

        // ── Pricing ──
        let interest_band = self.determine_interest_band(&resolved, tier).await?;
        let policy_gap = interest_band.is_none();
        if policy_gap {
            warn!(application_id = %app_id, tier = %tier, "No interest band found; flagging policy gap");
        }

        // ── Packet ──
        let payload = UserPacketPayload {
            application_id: app_id.to_string(),
            risk_score: PacketScore { value: score, tier },
            reasons: reasons.clone(),
            requested_documents: requested_documents.clone(),
            policy_citations: policy_citations.clone(),
            interest_band: interest_band.clone(),
        };
        let payload = payload.to_map()?;
        let payload_keys = UserPacketPayload::KEYS;
        let user_packet = c.packet_composer.compose(payload).await?;
        log_ids.push(
            self.log(
                GovernanceEvent::PacketComposed,
                json!({
                    "application_id": app_id,
                    "payload_keys": payload_keys,
                }),
            )
            .await?,
        );

        info!(application_id = %app_id, tier = %tier, policy_gap, log_entries = log_ids.len(), "Assessment complete");

        Ok(AssessmentResult {
            application_id: app_id.to_string(),
            risk_score: RiskScoreSummary {
                value: score,
                scale: SCORE_SCALE.to_string(),
                tier,
            },
            reasons,
            policy_citations,
            requested_documents,
            interest_rate_suggestion: interest_band.as_ref().map(InterestRateSuggestion::from),
            compliance: Compliance {
                region: application.region.clone(),
                product: application.product.clone(),
                policy_gap,
            },
            governance_log_ids: log_ids,
            user_packet,
        })
    }

    async fn log(&self, event: GovernanceEvent, payload: Value) -> Result<String> {
        let payload: Attributes = serde_json::from_value(payload)?;
        let record = self.collaborators.governance_log.log(event.as_str(), payload).await?;
        debug!(event = %event, log_id = %record.log_id, "Governance event recorded");
        Ok(record.log_id)
    }

    async fn resolve_chunks(
        &self,
        retrieved: Vec<PolicyChunk>,
        chunk_ids: &[String],
    ) -> Result<Vec<PolicyChunk>> {
        if retrieved.is_empty() {
            return Ok(retrieved);
        }
        let canonical = self.collaborators.policy_lookup.by_ids(chunk_ids).await?;
        Ok(decision::merge_canonical(retrieved, canonical))
    }

    async fn determine_interest_band(
        &self,
        chunks: &[PolicyChunk],
        tier: RiskTier,
    ) -> Result<Option<InterestBand>> {
        if let Some(resolver) = &self.collaborators.interest_resolver {
            if let Some(band) = resolver.resolve(chunks, tier).await? {
                debug!(basis = %band.policy_reference, "Interest band from resolver");
                return Ok(Some(band));
            }
        }
        Ok(decision::interest_band_from_chunks(chunks)?)
    }
}
