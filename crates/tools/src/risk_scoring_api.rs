//! `risk_scoring_api`: the risk scorer exposed as a tool.

use async_trait::async_trait;
use loanrisk_core::{Result, RiskScorer, Tool, ToolPayload};
use std::sync::Arc;

use crate::RISK_SCORING_API;
use crate::codec::{self, Reader};

pub struct RiskScoringApiTool {
    scorer: Arc<dyn RiskScorer>,
}

impl RiskScoringApiTool {
    pub fn new(scorer: Arc<dyn RiskScorer>) -> Self {
        Self { scorer }
    }
}

#[async_trait]
impl Tool for RiskScoringApiTool {
    fn name(&self) -> &str {
        RISK_SCORING_API
    }

    fn description(&self) -> &str {
        "Call the bank's risk scoring service."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "payload": {
                    "type": "object",
                    "description": "Scoring request: application_id, borrower, loan, region, product and optional context"
                }
            },
            "required": ["payload"]
        })
    }

    fn output_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "score": { "type": "number", "minimum": 0, "maximum": 100 },
                "features": { "type": "array", "items": { "type": "object" } },
                "reason_codes": { "type": "array", "items": { "type": "object" } }
            },
            "required": ["score"]
        })
    }

    async fn invoke(&self, request: ToolPayload) -> Result<ToolPayload> {
        let payload = Reader::new(RISK_SCORING_API, &request).object("payload")?.clone();
        let result = self.scorer.score(payload).await?;
        codec::encode_map(&result)
    }
}
