//! `compose_user_packet`: the packet composer exposed as a tool.

use async_trait::async_trait;
use loanrisk_core::{PacketComposer, Result, Tool, ToolPayload};
use std::sync::Arc;

use crate::COMPOSE_USER_PACKET;
use crate::codec::Reader;

pub struct ComposeUserPacketTool {
    composer: Arc<dyn PacketComposer>,
}

impl ComposeUserPacketTool {
    pub fn new(composer: Arc<dyn PacketComposer>) -> Self {
        Self { composer }
    }
}

#[async_trait]
impl Tool for ComposeUserPacketTool {
    fn name(&self) -> &str {
        COMPOSE_USER_PACKET
    }

    fn description(&self) -> &str {
        "Compose a channel specific packet from the assessment payload."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "data": { "type": "object" }
            },
            "required": ["data"]
        })
    }

    fn output_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "packet": { "type": "object" }
            },
            "required": ["packet"]
        })
    }

    async fn invoke(&self, request: ToolPayload) -> Result<ToolPayload> {
        let data = Reader::new(COMPOSE_USER_PACKET, &request).object("data")?.clone();
        let packet = self.composer.compose(data).await?;

        let mut response = ToolPayload::new();
        response.insert("packet".into(), packet.into());
        Ok(response)
    }
}
