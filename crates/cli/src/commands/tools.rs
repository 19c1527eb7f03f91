//! `loanrisk tools`: List the tools a host would see.

use std::sync::Arc;

use crate::demo::{self, InMemoryGovernanceLog};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let registry = loanrisk_tools::default_registry(&demo::collaborators(Arc::new(
        InMemoryGovernanceLog::new(),
    )));

    println!("{}", serde_json::to_string_pretty(&registry.definitions())?);
    Ok(())
}
