//! Loan application input and helpers over open attribute maps.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Open string-keyed attribute map (borrower, loan, context, metadata).
pub type Attributes = serde_json::Map<String, Value>;

/// Minimal loan application passed to one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub application_id: String,

    /// Borrower attributes (`credit_score`, `dti`, `employment_type`, `income_verified`, ...)
    pub borrower: Attributes,

    /// Loan attributes (`amount`, `collateral_required`, `collateral_documents`, ...)
    pub loan: Attributes,

    pub region: String,

    pub product: String,

    /// Free-form context, folded into the policy query and the scoring request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Attributes>,
}

impl LoanApplication {
    pub fn new(
        application_id: impl Into<String>,
        borrower: Attributes,
        loan: Attributes,
        region: impl Into<String>,
        product: impl Into<String>,
    ) -> Self {
        Self {
            application_id: application_id.into(),
            borrower,
            loan,
            region: region.into(),
            product: product.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: Attributes) -> Self {
        self.context = Some(context);
        self
    }

    /// Context entries, or nothing when the application carries no context.
    pub fn context_entries(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.context.iter().flat_map(|c| c.iter())
    }
}

/// Truthiness of an open-map value.
///
/// `null`, `false`, `0`, `""`, `[]` and `{}` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Truthiness of a key in an attribute map; a missing key is falsy.
pub fn attr_truthy(attrs: &Attributes, key: &str) -> bool {
    attrs.get(key).is_some_and(is_truthy)
}

/// Render a scalar for free text: strings verbatim, everything else as JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
