//! `governance_log`: the audit trail exposed as a tool.

use async_trait::async_trait;
use loanrisk_core::{GovernanceLog, Result, Tool, ToolPayload};
use std::sync::Arc;

use crate::GOVERNANCE_LOG;
use crate::codec::{self, Reader};

pub struct GovernanceLogTool {
    log: Arc<dyn GovernanceLog>,
}

impl GovernanceLogTool {
    pub fn new(log: Arc<dyn GovernanceLog>) -> Self {
        Self { log }
    }
}

#[async_trait]
impl Tool for GovernanceLogTool {
    fn name(&self) -> &str {
        GOVERNANCE_LOG
    }

    fn description(&self) -> &str {
        "Write an event to the governance log."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "event_type": { "type": "string" },
                "payload": { "type": "object" }
            },
            "required": ["event_type"]
        })
    }

    fn output_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "event_type": { "type": "string" },
                "log_id": { "type": "string" },
                "payload_hash": { "type": "string" }
            },
            "required": ["event_type", "log_id"]
        })
    }

    async fn invoke(&self, request: ToolPayload) -> Result<ToolPayload> {
        let r = Reader::new(GOVERNANCE_LOG, &request);
        let event_type = r.str("event_type")?;
        let payload = r.optional_object("payload")?.cloned().unwrap_or_default();

        let record = self.log.log(event_type, payload).await?;
        codec::encode_map(&record)
    }
}
