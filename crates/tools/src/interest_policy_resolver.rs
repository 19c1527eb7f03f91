//! `interest_policy_resolver`: the optional band override exposed as a tool.

use async_trait::async_trait;
use loanrisk_core::{InterestPolicyResolver, Result, Tool, ToolPayload};
use serde_json::Value;
use std::sync::Arc;

use crate::INTEREST_POLICY_RESOLVER;
use crate::codec::{self, Reader};

pub struct InterestPolicyResolverTool {
    resolver: Arc<dyn InterestPolicyResolver>,
}

impl InterestPolicyResolverTool {
    pub fn new(resolver: Arc<dyn InterestPolicyResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl Tool for InterestPolicyResolverTool {
    fn name(&self) -> &str {
        INTEREST_POLICY_RESOLVER
    }

    fn description(&self) -> &str {
        "Derive an interest band from the resolved policies."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "policy_chunks": { "type": "array", "items": { "type": "object" } },
                "risk_tier": { "type": "string", "enum": ["Low", "Med", "High"] }
            },
            "required": ["risk_tier"]
        })
    }

    fn output_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "band": { "type": ["object", "null"] }
            },
            "required": ["band"]
        })
    }

    async fn invoke(&self, request: ToolPayload) -> Result<ToolPayload> {
        let r = Reader::new(INTEREST_POLICY_RESOLVER, &request);
        let chunks = codec::policy_chunks(&r, "policy_chunks", false)?;
        let tier = codec::risk_tier(&r, "risk_tier")?;

        let band = match self.resolver.resolve(&chunks, tier).await? {
            Some(band) => codec::encode(&band)?,
            None => Value::Null,
        };

        let mut response = ToolPayload::new();
        response.insert("band".into(), band);
        Ok(response)
    }
}
