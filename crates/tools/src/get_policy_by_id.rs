//! `get_policy_by_id`: canonical chunk lookup exposed as a tool.

use async_trait::async_trait;
use loanrisk_core::{PolicyLookup, Result, Tool, ToolPayload};
use std::sync::Arc;

use crate::GET_POLICY_BY_ID;
use crate::codec::{self, Reader};

pub struct GetPolicyByIdTool {
    lookup: Arc<dyn PolicyLookup>,
}

impl GetPolicyByIdTool {
    pub fn new(lookup: Arc<dyn PolicyLookup>) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl Tool for GetPolicyByIdTool {
    fn name(&self) -> &str {
        GET_POLICY_BY_ID
    }

    fn description(&self) -> &str {
        "Resolve canonical policy chunks by identifier."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "ids": { "type": "array", "items": { "type": "string" } }
            },
            "required": ["ids"]
        })
    }

    fn output_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "chunks": { "type": "array", "items": { "type": "object" } }
            },
            "required": ["chunks"]
        })
    }

    async fn invoke(&self, request: ToolPayload) -> Result<ToolPayload> {
        let ids = Reader::new(GET_POLICY_BY_ID, &request).string_list("ids")?;
        let mut resolved = self.lookup.by_ids(&ids).await?;

        // Unknown ids are dropped; the rest keep request order.
        let chunks: Vec<_> = ids.iter().filter_map(|id| resolved.remove(id)).collect();

        let mut response = ToolPayload::new();
        response.insert("chunks".into(), codec::encode(&chunks)?);
        Ok(response)
    }
}
