//! Tool trait: the string-keyed invocation boundary.
//!
//! A tool takes a JSON object and returns a JSON object. Collaborators are
//! exposed to external invocation hosts as tools, and a host that only
//! speaks tools can drive the assistant through the same shape.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::application::Attributes;
use crate::error::{Result, ToolError};

/// Request and response body of a tool invocation.
pub type ToolPayload = Attributes;

/// Metadata describing a tool to an invocation host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
    pub output_schema: serde_json::Value,
}

/// The core Tool trait.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "policy_docs_retriever").
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema of the request map.
    fn input_schema(&self) -> serde_json::Value;

    /// JSON Schema of the response map.
    fn output_schema(&self) -> serde_json::Value;

    /// Invoke the tool with a request map.
    async fn invoke(&self, request: ToolPayload) -> Result<ToolPayload>;

    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
            output_schema: self.output_schema(),
        }
    }
}

/// Anything that can invoke a named tool.
#[async_trait]
pub trait ToolHost: Send + Sync {
    async fn invoke_tool(&self, name: &str, request: ToolPayload) -> Result<ToolPayload>;
}

/// A registry of available tools, keyed by name.
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// All tool definitions, ordered by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    /// List all registered tool names, ordered.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolHost for ToolRegistry {
    async fn invoke_tool(&self, name: &str, request: ToolPayload) -> Result<ToolPayload> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        tracing::debug!(tool = %name, "Invoking tool");
        tool.invoke(request).await
    }
}
