//! The loan risk assessment orchestrator.
//!
//! [`LoanRiskAssistant`] runs one application through a fixed sequence of
//! collaborator calls:
//!
//! 1. **Receive** the application and open a governance trail
//! 2. **Retrieve** policy chunks for the region and product
//! 3. **Score** the application with the risk service
//! 4. **Decide** tier, reasons, documents and interest band
//! 5. **Compose** the user packet
//!
//! The decision rules live in [`decision`] as pure functions.

pub mod assistant;
pub mod decision;

#[cfg(test)]
mod test_helpers;

pub use assistant::{DEFAULT_POLICY_TOP_K, LoanRiskAssistant};
