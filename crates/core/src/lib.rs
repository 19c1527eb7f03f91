//! # Loan Risk Core
//!
//! Domain types, collaborator traits, and error definitions for the loan
//! risk assistant. This crate has no runtime dependencies; it defines the
//! model that the orchestrator and the tool adapter layer build against.
//!
//! ## Design
//!
//! Every external service is a trait here. Implementations live in their
//! respective crates, which keeps the orchestrator testable with in-process
//! stand-ins and lets a tool host supply the same roles remotely.

pub mod application;
pub mod assessment;
pub mod collaborator;
pub mod error;
pub mod governance;
pub mod policy;
pub mod risk;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use application::{Attributes, LoanApplication};
pub use assessment::{
    AssessmentResult, Compliance, InterestRateSuggestion, PacketScore, PolicyCitation, Reason,
    ReasonSource, ReasonSourceKind, RiskScoreSummary, UserPacketPayload,
};
pub use collaborator::{
    Collaborators, DocumentRequester, GovernanceLog, InterestPolicyResolver, PacketComposer,
    PolicyLookup, PolicyRetriever, RiskScorer,
};
pub use error::{CollaboratorError, Error, Result, ToolError, ValidationError};
pub use governance::{GovernanceEvent, GovernanceLogRecord};
pub use policy::{InterestBand, PolicyChunk};
pub use risk::{Direction, ReasonCode, RiskFeature, RiskScoreResult, RiskTier};
pub use tool::{Tool, ToolDefinition, ToolHost, ToolPayload, ToolRegistry};
