//! `loanrisk run`: Drive the assessment through the tool adapter layer.
//!
//! The demo collaborators are registered as tools, and the host-driven agent
//! reaches them only through `invoke_tool`.

use loanrisk_config::AppConfig;
use loanrisk_core::ToolHost;
use loanrisk_tools::LoanRiskToolAgent;
use std::path::Path;
use std::sync::Arc;

use crate::demo::{self, InMemoryGovernanceLog};

pub async fn run(config: &AppConfig, input: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let request = super::read_application(input)?;

    let log = Arc::new(InMemoryGovernanceLog::new());
    let registry = loanrisk_tools::default_registry(&demo::collaborators(log.clone()));
    let tool_names: Vec<String> = registry.names().into_iter().map(String::from).collect();
    tracing::debug!(tools = ?tool_names, "Tool host ready");

    let host: Arc<dyn ToolHost> = Arc::new(registry);
    let agent = LoanRiskToolAgent::new(host, &tool_names, config.assessment.policy_top_k);

    let response = agent.run(request).await?;
    super::trace_trail(&log);

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
