//! Risk scoring output and the tier derived from it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Lower bound (inclusive) of the `Med` tier.
pub const MED_TIER_FLOOR: f64 = 34.0;
/// Lower bound (inclusive) of the `High` tier.
pub const HIGH_TIER_FLOOR: f64 = 67.0;

/// Which way a feature pushed the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Direction {
    Increase,
    Decrease,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Increase => "increase",
            Direction::Decrease => "decrease",
        }
    }

    /// Verb used in reason detail text.
    pub fn effect(&self) -> &'static str {
        match self {
            Direction::Increase => "raised",
            Direction::Decrease => "reduced",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "increase" => Ok(Direction::Increase),
            "decrease" => Ok(Direction::Decrease),
            other => Err(format!("unknown direction '{other}', expected increase or decrease")),
        }
    }
}

impl TryFrom<String> for Direction {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Direction> for String {
    fn from(d: Direction) -> Self {
        d.as_str().to_string()
    }
}

/// Feature contribution returned by the scoring service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFeature {
    pub code: String,
    pub description: String,
    #[serde(default)]
    pub value: Value,
    pub direction: Direction,
    pub weight: f64,
}

/// Structured reason code; paired with a feature by `code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonCode {
    pub code: String,
    pub description: String,
}

impl ReasonCode {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

/// Output of a single scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScoreResult {
    pub score: f64,
    #[serde(default)]
    pub features: Vec<RiskFeature>,
    #[serde(default)]
    pub reason_codes: Vec<ReasonCode>,
}

impl RiskScoreResult {
    /// The score, checked to be finite and on the 0-100 scale.
    pub fn validated_score(&self) -> Result<f64, ValidationError> {
        if !self.score.is_finite() {
            return Err(ValidationError::NonFiniteScore);
        }
        if !(0.0..=100.0).contains(&self.score) {
            return Err(ValidationError::ScoreOutOfRange(self.score));
        }
        Ok(self.score)
    }

    pub fn feature(&self, code: &str) -> Option<&RiskFeature> {
        self.features.iter().find(|f| f.code == code)
    }
}

/// Coarse risk bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Med,
    High,
}

impl RiskTier {
    /// Upper bounds are exclusive: 34 is `Med`, 67 is `High`.
    pub fn from_score(score: f64) -> Self {
        if score < MED_TIER_FLOOR {
            RiskTier::Low
        } else if score < HIGH_TIER_FLOOR {
            RiskTier::Med
        } else {
            RiskTier::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Med => "Med",
            RiskTier::High => "High",
        }
    }
}

impl FromStr for RiskTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(RiskTier::Low),
            "med" | "medium" => Ok(RiskTier::Med),
            "high" => Ok(RiskTier::High),
            other => Err(format!("unknown risk tier '{other}', expected Low, Med or High")),
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
