//! `policy_docs_retriever`: policy search exposed as a tool.

use async_trait::async_trait;
use loanrisk_agent::DEFAULT_POLICY_TOP_K;
use loanrisk_core::{PolicyRetriever, Result, Tool, ToolPayload};
use std::sync::Arc;

use crate::POLICY_DOCS_RETRIEVER;
use crate::codec::{self, Reader};

pub struct PolicyDocsRetrieverTool {
    retriever: Arc<dyn PolicyRetriever>,
}

impl PolicyDocsRetrieverTool {
    pub fn new(retriever: Arc<dyn PolicyRetriever>) -> Self {
        Self { retriever }
    }
}

#[async_trait]
impl Tool for PolicyDocsRetrieverTool {
    fn name(&self) -> &str {
        POLICY_DOCS_RETRIEVER
    }

    fn description(&self) -> &str {
        "Retrieve policy chunks relevant to a loan application query."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Free-text policy search query"
                },
                "top_k": {
                    "type": "integer",
                    "description": "Maximum number of chunks to return",
                    "default": DEFAULT_POLICY_TOP_K
                }
            },
            "required": ["query"]
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
        let r = Reader::new(POLICY_DOCS_RETRIEVER, &request);
        let query = r.str("query")?;
        let top_k = r.optional_usize("top_k")?.unwrap_or(DEFAULT_POLICY_TOP_K);

        let chunks = self.retriever.retrieve(query, top_k).await?;

        let mut response = ToolPayload::new();
        response.insert("chunks".into(), codec::encode(&chunks)?);
        Ok(response)
    }
}
