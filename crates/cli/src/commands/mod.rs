//! Subcommand implementations.

pub mod assess;
pub mod config_cmd;
pub mod run;
pub mod tools;

use loanrisk_core::Attributes;
use std::path::Path;

use crate::demo::{self, InMemoryGovernanceLog};

/// Read an application map from `input`, or the built-in sample.
pub fn read_application(input: Option<&Path>) -> Result<Attributes, Box<dyn std::error::Error>> {
    let Some(path) = input else {
        tracing::info!("No input given, using the sample application");
        return Ok(demo::sample_application());
    };

    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let map: Attributes = serde_json::from_str(&content)
        .map_err(|e| format!("{} is not a JSON object: {e}", path.display()))?;
    Ok(map)
}

/// Dump the governance trail at debug level.
pub fn trace_trail(log: &InMemoryGovernanceLog) {
    for entry in log.entries() {
        tracing::debug!(
            log_id = %entry.log_id,
            event_type = %entry.event_type,
            payload_hash = %entry.payload_hash,
            payload_keys = entry.payload.len(),
            recorded_at = %entry.recorded_at.to_rfc3339(),
            "Governance trail"
        );
    }
}
