//! `loanrisk assess`: Run one assessment against the demo collaborators.

use loanrisk_agent::LoanRiskAssistant;
use loanrisk_config::AppConfig;
use loanrisk_core::LoanApplication;
use std::path::Path;
use std::sync::Arc;

use crate::demo::{self, InMemoryGovernanceLog};

pub async fn run(config: &AppConfig, input: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let map = super::read_application(input)?;
    let application: LoanApplication = serde_json::from_value(map.into())
        .map_err(|e| format!("Invalid loan application: {e}"))?;

    let log = Arc::new(InMemoryGovernanceLog::new());
    let assistant =
        LoanRiskAssistant::from_config(demo::collaborators(log.clone()), &config.assessment);

    let result = assistant.assess(&application).await?;
    super::trace_trail(&log);

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
