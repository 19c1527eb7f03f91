//! Assessment output types.
//!
//! Field names here are the wire format of the result map and the user
//! packet payload; they must not be renamed.

use serde::{Deserialize, Serialize};

use crate::application::Attributes;
use crate::policy::InterestBand;
use crate::risk::RiskTier;

/// Fixed scale label reported next to the score.
pub const SCORE_SCALE: &str = "0-100";

/// Where a reason entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonSourceKind {
    Feature,
    Policy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonSource {
    #[serde(rename = "type")]
    pub kind: ReasonSourceKind,
    pub id_or_code: String,
}

/// One explanation entry in the assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    pub label: String,
    pub detail: String,
    pub source: ReasonSource,
}

impl Reason {
    pub fn from_feature(label: impl Into<String>, detail: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            detail: detail.into(),
            source: ReasonSource {
                kind: ReasonSourceKind::Feature,
                id_or_code: code.into(),
            },
        }
    }

    pub fn from_policy(label: impl Into<String>, detail: impl Into<String>, chunk_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            detail: detail.into(),
            source: ReasonSource {
                kind: ReasonSourceKind::Policy,
                id_or_code: chunk_id.into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyCitation {
    pub chunk_id: String,
    pub title: String,
    pub section: String,
    pub quote: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScoreSummary {
    pub value: f64,
    pub scale: String,
    pub tier: RiskTier,
}

/// Pricing suggestion with bounds rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestRateSuggestion {
    pub band_apr_percent: [f64; 2],
    pub basis: String,
    pub conditions: Vec<String>,
}

impl From<&InterestBand> for InterestRateSuggestion {
    fn from(band: &InterestBand) -> Self {
        Self {
            band_apr_percent: [round2(band.min_apr), round2(band.max_apr)],
            basis: band.policy_reference.clone(),
            conditions: band.conditions.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compliance {
    pub region: String,
    pub product: String,
    pub policy_gap: bool,
}

/// Score block inside the user packet payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketScore {
    pub value: f64,
    pub tier: RiskTier,
}

/// Payload handed to the packet composer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPacketPayload {
    pub application_id: String,
    pub risk_score: PacketScore,
    pub reasons: Vec<Reason>,
    pub requested_documents: Vec<String>,
    pub policy_citations: Vec<PolicyCitation>,
    pub interest_band: Option<InterestBand>,
}

/// The full structured result of one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub application_id: String,
    pub risk_score: RiskScoreSummary,
    pub reasons: Vec<Reason>,
    pub policy_citations: Vec<PolicyCitation>,
    pub requested_documents: Vec<String>,
    pub interest_rate_suggestion: Option<InterestRateSuggestion>,
    pub compliance: Compliance,
    pub governance_log_ids: Vec<String>,
    pub user_packet: Attributes,
}

impl AssessmentResult {
    /// The result as an open map (the adapter layer's response shape).
    pub fn to_map(&self) -> crate::Result<Attributes> {
        to_attributes(self)
    }
}

impl UserPacketPayload {
    /// Field names in declaration order.
    pub const KEYS: [&'static str; 6] = [
        "application_id",
        "risk_score",
        "reasons",
        "requested_documents",
        "policy_citations",
        "interest_band",
    ];

    pub fn to_map(&self) -> crate::Result<Attributes> {
        to_attributes(self)
    }
}

fn to_attributes<T: Serialize>(value: &T) -> crate::Result<Attributes> {
    Ok(serde_json::from_value(serde_json::to_value(value)?)?)
}

/// Round to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
