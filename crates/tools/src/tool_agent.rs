//! Drive the assistant from a generic tool host.
//!
//! [`LoanRiskToolAgent`] wires a host-backed collaborator into a
//! [`LoanRiskAssistant`] and accepts applications as wire maps, so any
//! runtime that can invoke named tools can run an assessment.

use loanrisk_agent::LoanRiskAssistant;
use loanrisk_core::{Collaborators, Result, ToolHost, ToolPayload};
use serde_json::Value;
use std::sync::Arc;

use crate::codec::{self, Reader};
use crate::remote::HostCollaborator;
use crate::{ASSISTANT_TOOL, INTEREST_POLICY_RESOLVER};

pub struct LoanRiskToolAgent {
    assistant: LoanRiskAssistant,
}

impl LoanRiskToolAgent {
    /// Build an agent over `host`.
    ///
    /// `available_tools` lists the tool names the host offers; the interest
    /// resolver is only wired when it includes `interest_policy_resolver`.
    pub fn new<I, S>(host: Arc<dyn ToolHost>, available_tools: I, policy_top_k: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let has_resolver = available_tools
            .into_iter()
            .any(|name| name.as_ref() == INTEREST_POLICY_RESOLVER);

        let remote = Arc::new(HostCollaborator::new(host));
        let mut collaborators = Collaborators {
            policy_retriever: remote.clone(),
            risk_scorer: remote.clone(),
            policy_lookup: remote.clone(),
            packet_composer: remote.clone(),
            document_requester: remote.clone(),
            governance_log: remote.clone(),
            interest_resolver: None,
        };
        if has_resolver {
            collaborators = collaborators.with_interest_resolver(remote);
        }
        tracing::debug!(has_resolver, policy_top_k, "Tool agent wired to host");

        Self {
            assistant: LoanRiskAssistant::new(collaborators).with_policy_top_k(policy_top_k),
        }
    }

    pub fn assistant(&self) -> &LoanRiskAssistant {
        &self.assistant
    }

    /// Assess the application carried in `request`.
    ///
    /// The response holds the application's own fields followed by the
    /// assessment result; result keys win on collision.
    pub async fn run(&self, request: ToolPayload) -> Result<ToolPayload> {
        let application = codec::loan_application(&Reader::new(ASSISTANT_TOOL, &request))?;
        let result = self.assistant.assess(&application).await?;

        let mut response = codec::encode_map(&application)?;
        if !response.contains_key("context") {
            response.insert("context".into(), Value::Null);
        }
        response.extend(result.to_map()?);
        Ok(response)
    }
}
