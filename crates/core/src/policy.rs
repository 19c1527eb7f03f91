//! Policy chunks and interest bands.
//!
//! A policy chunk is a retrieved unit of policy text. Its metadata may carry
//! a `guidance` string, a `required_documents` list and an `interest_band`
//! sub-structure; the accessors here are the only places those keys are read.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::{Attributes, is_truthy, render_value};
use crate::error::ValidationError;

/// Default word limit for citation quotes.
pub const QUOTE_WORD_LIMIT: usize = 50;

/// A retrieved unit of policy text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyChunk {
    pub chunk_id: String,
    pub title: String,
    pub section: String,
    pub text: String,
    #[serde(default)]
    pub metadata: Attributes,
}

impl PolicyChunk {
    pub fn new(
        chunk_id: impl Into<String>,
        title: impl Into<String>,
        section: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            chunk_id: chunk_id.into(),
            title: title.into(),
            section: section.into(),
            text: text.into(),
            metadata: Attributes::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Attributes) -> Self {
        self.metadata = metadata;
        self
    }

    /// The chunk text truncated to `word_limit` words.
    pub fn quote(&self, word_limit: usize) -> String {
        quote(&self.text, word_limit)
    }

    /// Guidance label, if the chunk carries a `guidance` key.
    pub fn guidance(&self) -> Option<String> {
        match self.metadata.get("guidance")? {
            Value::Null => Some("Policy guidance".to_string()),
            other => Some(render_value(other)),
        }
    }

    /// Documents listed under `required_documents`. Non-string entries are skipped.
    pub fn required_documents(&self) -> impl Iterator<Item = &str> {
        self.metadata
            .get("required_documents")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|doc| {
                let doc = doc.as_str();
                if doc.is_none() {
                    tracing::debug!("Skipping non-string required document entry");
                }
                doc
            })
    }

    /// The interest band embedded in this chunk's metadata, if complete.
    ///
    /// Returns `Ok(None)` when the sub-structure is absent or either bound is
    /// missing or null. A bound that is present but not a finite number is a
    /// validation fault.
    pub fn interest_band(&self) -> Result<Option<InterestBand>, ValidationError> {
        let Some(band) = self.metadata.get("interest_band") else {
            return Ok(None);
        };
        if !is_truthy(band) {
            return Ok(None);
        }
        let Some(band) = band.as_object() else {
            return Ok(None);
        };

        let context = format!("chunk {} interest_band", self.chunk_id);
        let (Some(min), Some(max)) = (non_null(band, "min_apr"), non_null(band, "max_apr")) else {
            return Ok(None);
        };
        let min_apr = finite_number(min, &context, "min_apr")?;
        let max_apr = finite_number(max, &context, "max_apr")?;

        let policy_reference = non_null(band, "policy_reference")
            .map(render_value)
            .unwrap_or_else(|| self.chunk_id.clone());
        let conditions = band
            .get("conditions")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(render_value).collect())
            .unwrap_or_default();

        Ok(Some(InterestBand {
            min_apr,
            max_apr,
            policy_reference,
            conditions,
        }))
    }
}

fn non_null<'a>(map: &'a Attributes, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}

/// Convert a JSON value to a finite `f64`, or fail naming the field.
pub fn finite_number(value: &Value, context: &str, field: &str) -> Result<f64, ValidationError> {
    value
        .as_f64()
        .filter(|f| f.is_finite())
        .ok_or_else(|| ValidationError::InvalidNumber {
            context: context.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        })
}

/// Truncate `text` to its first `word_limit` whitespace-separated words.
///
/// Text at or under the limit is returned verbatim, whitespace included.
pub fn quote(text: &str, word_limit: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= word_limit {
        return text.to_string();
    }
    words[..word_limit].join(" ")
}

/// A policy-backed APR range suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestBand {
    pub min_apr: f64,
    pub max_apr: f64,
    pub policy_reference: String,
    #[serde(default)]
    pub conditions: Vec<String>,
}
