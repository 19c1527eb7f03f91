//! `request_additional_docs`: the document workflow trigger exposed as a tool.

use async_trait::async_trait;
use loanrisk_core::{DocumentRequester, Result, Tool, ToolPayload};
use std::sync::Arc;

use crate::REQUEST_ADDITIONAL_DOCS;
use crate::codec::Reader;

pub struct RequestAdditionalDocsTool {
    requester: Arc<dyn DocumentRequester>,
}

impl RequestAdditionalDocsTool {
    pub fn new(requester: Arc<dyn DocumentRequester>) -> Self {
        Self { requester }
    }
}

#[async_trait]
impl Tool for RequestAdditionalDocsTool {
    fn name(&self) -> &str {
        REQUEST_ADDITIONAL_DOCS
    }

    fn description(&self) -> &str {
        "Trigger the document collection workflow."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "documents": { "type": "array", "items": { "type": "string" } }
            },
            "required": ["documents"]
        })
    }

    fn output_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "request": { "type": "object" }
            },
            "required": ["request"]
        })
    }

    async fn invoke(&self, request: ToolPayload) -> Result<ToolPayload> {
        let documents = Reader::new(REQUEST_ADDITIONAL_DOCS, &request).string_list("documents")?;
        let ticket = self.requester.request(&documents).await?;

        let mut response = ToolPayload::new();
        response.insert("request".into(), ticket.into());
        Ok(response)
    }
}
