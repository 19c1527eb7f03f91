//! Decision logic: pure functions over one assessment's inputs.
//!
//! Nothing here calls a collaborator; the assistant feeds these functions
//! the outputs of earlier pipeline steps.

use std::collections::{BTreeSet, HashMap};

use loanrisk_core::application::{attr_truthy, is_truthy, render_value};
use loanrisk_core::policy::QUOTE_WORD_LIMIT;
use loanrisk_core::{
    Attributes, InterestBand, LoanApplication, PolicyChunk, PolicyCitation, Reason,
    RiskFeature, RiskScoreResult, ValidationError,
};

/// Terms appended to every policy query after region and product.
pub const POLICY_QUERY_TERMS: [&str; 3] = ["risk tiering", "interest band", "documentation"];

pub const MAX_REASONS: usize = 8;
pub const MAX_CITATIONS: usize = 5;

pub const DOC_TAX_RETURNS: &str = "Most recent 2 years of tax returns";
pub const DOC_INCOME_VERIFICATION: &str =
    "Recent income verification (e.g., pay stubs or bank statements)";
pub const DOC_COLLATERAL_OWNERSHIP: &str = "Collateral ownership evidence";
pub const DOC_DEBT_SCHEDULE: &str = "Detailed debt obligation schedule";
pub const DOC_CREDIT_REPORT: &str = "Updated credit bureau report";

/// Response keys checked, in order, for a document request identifier.
pub const REQUEST_ID_KEYS: [&str; 5] = ["request_id", "id", "identifier", "response_id", "log_id"];

/// Region, product, the fixed terms, then `key:value` context pairs.
pub fn build_policy_query(application: &LoanApplication) -> String {
    let base = [application.region.as_str(), application.product.as_str()]
        .into_iter()
        .chain(POLICY_QUERY_TERMS)
        .map(str::to_string);
    let context = application
        .context_entries()
        .map(|(key, value)| format!("{key}:{}", render_value(value)));

    base.chain(context)
        .filter(|term| !term.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The request map sent to the scoring service.
pub fn build_risk_request(application: &LoanApplication) -> Attributes {
    let mut request = Attributes::new();
    request.insert("application_id".into(), application.application_id.clone().into());
    request.insert("borrower".into(), application.borrower.clone().into());
    request.insert("loan".into(), application.loan.clone().into());
    request.insert("region".into(), application.region.clone().into());
    request.insert("product".into(), application.product.clone().into());
    if let Some(context) = &application.context {
        request.insert("context".into(), context.clone().into());
    }
    request
}

/// Replace each retrieved chunk with its canonical version when one exists.
pub fn merge_canonical(
    retrieved: Vec<PolicyChunk>,
    canonical: HashMap<String, PolicyChunk>,
) -> Vec<PolicyChunk> {
    retrieved
        .into_iter()
        .map(|chunk| match canonical.get(&chunk.chunk_id) {
            Some(resolved) => resolved.clone(),
            None => {
                tracing::warn!(chunk_id = %chunk.chunk_id, "No canonical chunk, keeping retrieved copy");
                chunk
            }
        })
        .collect()
}

/// Feature-backed reasons first, then policy guidance, capped at [`MAX_REASONS`].
pub fn build_reasons(risk: &RiskScoreResult, chunks: &[PolicyChunk]) -> Vec<Reason> {
    let features: HashMap<&str, &RiskFeature> =
        risk.features.iter().map(|f| (f.code.as_str(), f)).collect();

    let feature_reasons = risk.reason_codes.iter().map(|reason| {
        let detail = match features.get(reason.code.as_str()) {
            // Values keep their JSON rendering so strings read quoted.
            Some(feature) => format!(
                "{}: feature value {} {} risk",
                reason.description,
                feature.value,
                feature.direction.effect()
            ),
            None => reason.description.clone(),
        };
        Reason::from_feature(&reason.description, detail, &reason.code)
    });

    let policy_reasons = chunks.iter().filter_map(|chunk| {
        chunk
            .guidance()
            .map(|label| Reason::from_policy(label, chunk.quote(QUOTE_WORD_LIMIT), &chunk.chunk_id))
    });

    feature_reasons.chain(policy_reasons).take(MAX_REASONS).collect()
}

/// The sorted, deduplicated set of documents to request from the borrower.
pub fn determine_requested_documents(
    application: &LoanApplication,
    risk: &RiskScoreResult,
    chunks: &[PolicyChunk],
) -> Vec<String> {
    let mut documents: BTreeSet<String> = BTreeSet::new();
    let borrower = &application.borrower;
    let loan = &application.loan;

    if borrower.get("employment_type").and_then(|v| v.as_str()) == Some("self_employed") {
        documents.insert(DOC_TAX_RETURNS.into());
    }
    if !attr_truthy(borrower, "income_verified") {
        documents.insert(DOC_INCOME_VERIFICATION.into());
    }
    if attr_truthy(loan, "collateral_required") && !attr_truthy(loan, "collateral_documents") {
        documents.insert(DOC_COLLATERAL_OWNERSHIP.into());
    }

    for reason in &risk.reason_codes {
        let code = reason.code.to_ascii_uppercase();
        if code.starts_with("DTI") {
            documents.insert(DOC_DEBT_SCHEDULE.into());
        }
        if code.starts_with("CREDIT") {
            documents.insert(DOC_CREDIT_REPORT.into());
        }
    }

    for chunk in chunks {
        documents.extend(chunk.required_documents().map(str::to_string));
    }

    documents.into_iter().collect()
}

/// First truthy identifier in a document request response, by [`REQUEST_ID_KEYS`] priority.
pub fn extract_request_id(response: &Attributes) -> Option<String> {
    REQUEST_ID_KEYS
        .iter()
        .filter_map(|key| response.get(*key))
        .find(|value| is_truthy(value))
        .map(render_value)
}

/// The first chunk, in order, carrying a complete interest band.
pub fn interest_band_from_chunks(chunks: &[PolicyChunk]) -> Result<Option<InterestBand>, ValidationError> {
    for chunk in chunks {
        if let Some(band) = chunk.interest_band()? {
            return Ok(Some(band));
        }
    }
    Ok(None)
}

pub fn build_policy_citations(chunks: &[PolicyChunk]) -> Vec<PolicyCitation> {
    chunks
        .iter()
        .take(MAX_CITATIONS)
        .map(|chunk| PolicyCitation {
            chunk_id: chunk.chunk_id.clone(),
            title: chunk.title.clone(),
            section: chunk.section.clone(),
            quote: chunk.quote(QUOTE_WORD_LIMIT),
        })
        .collect()
}
