//! Map ⇄ entity translation for the tool wire format.
//!
//! Decoding is strict: a required key that is absent fails with
//! [`ToolError::MissingField`], a key holding the wrong JSON type fails with
//! [`ToolError::InvalidField`]. Nested fields are reported by path, for
//! example `chunks[2].text`. Encoding goes through the entities' serde
//! derives, whose field names are the wire names.

use loanrisk_core::{
    Attributes, Direction, GovernanceLogRecord, InterestBand, LoanApplication, PolicyChunk,
    ReasonCode, RiskFeature, RiskScoreResult, RiskTier, ToolError,
};
use serde::Serialize;
use serde_json::Value;

/// Typed field access over one wire map.
pub struct Reader<'a> {
    tool: &'a str,
    map: &'a Attributes,
    path: String,
}

impl<'a> Reader<'a> {
    pub fn new(tool: &'a str, map: &'a Attributes) -> Self {
        Self {
            tool,
            map,
            path: String::new(),
        }
    }

    fn nested(&self, path: String, map: &'a Attributes) -> Self {
        Self {
            tool: self.tool,
            map,
            path,
        }
    }

    fn field(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{name}", self.path)
        }
    }

    fn invalid(&self, name: &str, reason: impl Into<String>) -> ToolError {
        ToolError::invalid(self.tool, &self.field(name), reason)
    }

    pub fn value(&self, name: &str) -> Result<&'a Value, ToolError> {
        self.map
            .get(name)
            .ok_or_else(|| ToolError::missing(self.tool, &self.field(name)))
    }

    /// Absent and `null` both read as `None`.
    pub fn optional(&self, name: &str) -> Option<&'a Value> {
        self.map.get(name).filter(|v| !v.is_null())
    }

    pub fn str(&self, name: &str) -> Result<&'a str, ToolError> {
        self.value(name)?
            .as_str()
            .ok_or_else(|| self.invalid(name, "expected a string"))
    }

    pub fn number(&self, name: &str) -> Result<f64, ToolError> {
        self.value(name)?
            .as_f64()
            .ok_or_else(|| self.invalid(name, "expected a number"))
    }

    pub fn object(&self, name: &str) -> Result<&'a Attributes, ToolError> {
        self.value(name)?
            .as_object()
            .ok_or_else(|| self.invalid(name, "expected an object"))
    }

    pub fn optional_object(&self, name: &str) -> Result<Option<&'a Attributes>, ToolError> {
        self.optional(name)
            .map(|v| v.as_object().ok_or_else(|| self.invalid(name, "expected an object")))
            .transpose()
    }

    pub fn optional_usize(&self, name: &str) -> Result<Option<usize>, ToolError> {
        self.optional(name)
            .map(|v| {
                v.as_u64()
                    .map(|n| n as usize)
                    .ok_or_else(|| self.invalid(name, "expected a non-negative integer"))
            })
            .transpose()
    }

    fn list(&self, name: &str, required: bool) -> Result<&'a [Value], ToolError> {
        let value = if required {
            Some(self.value(name)?)
        } else {
            self.optional(name)
        };
        match value {
            None => Ok(&[]),
            Some(v) => v
                .as_array()
                .map(Vec::as_slice)
                .ok_or_else(|| self.invalid(name, "expected an array")),
        }
    }

    pub fn string_list(&self, name: &str) -> Result<Vec<String>, ToolError> {
        self.strings(name, true)
    }

    pub fn optional_string_list(&self, name: &str) -> Result<Vec<String>, ToolError> {
        self.strings(name, false)
    }

    fn strings(&self, name: &str, required: bool) -> Result<Vec<String>, ToolError> {
        self.list(name, required)?
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.invalid(&format!("{name}[{i}]"), "expected a string"))
            })
            .collect()
    }

    /// One reader per element of an array of objects.
    pub fn objects(&self, name: &str, required: bool) -> Result<Vec<Reader<'a>>, ToolError> {
        self.list(name, required)?
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let path = self.field(&format!("{name}[{i}]"));
                item.as_object()
                    .map(|map| self.nested(path.clone(), map))
                    .ok_or_else(|| ToolError::invalid(self.tool, &path, "expected an object"))
            })
            .collect()
    }
}

pub fn policy_chunk(r: &Reader<'_>) -> Result<PolicyChunk, ToolError> {
    let chunk = PolicyChunk::new(r.str("chunk_id")?, r.str("title")?, r.str("section")?, r.str("text")?);
    Ok(match r.optional_object("metadata")? {
        Some(metadata) => chunk.with_metadata(metadata.clone()),
        None => chunk,
    })
}

/// Decode the chunk list stored under `field`.
pub fn policy_chunks(r: &Reader<'_>, field: &str, required: bool) -> Result<Vec<PolicyChunk>, ToolError> {
    r.objects(field, required)?.iter().map(policy_chunk).collect()
}

pub fn risk_feature(r: &Reader<'_>) -> Result<RiskFeature, ToolError> {
    let direction: Direction = r
        .str("direction")?
        .parse()
        .map_err(|reason: String| r.invalid("direction", reason))?;
    Ok(RiskFeature {
        code: r.str("code")?.to_string(),
        description: r.str("description")?.to_string(),
        value: r.map.get("value").cloned().unwrap_or(Value::Null),
        direction,
        weight: r.number("weight")?,
    })
}

pub fn reason_code(r: &Reader<'_>) -> Result<ReasonCode, ToolError> {
    Ok(ReasonCode::new(r.str("code")?, r.str("description")?))
}

pub fn risk_score_result(r: &Reader<'_>) -> Result<RiskScoreResult, ToolError> {
    Ok(RiskScoreResult {
        score: r.number("score")?,
        features: r
            .objects("features", false)?
            .iter()
            .map(risk_feature)
            .collect::<Result<_, _>>()?,
        reason_codes: r
            .objects("reason_codes", false)?
            .iter()
            .map(reason_code)
            .collect::<Result<_, _>>()?,
    })
}

pub fn interest_band(r: &Reader<'_>) -> Result<InterestBand, ToolError> {
    Ok(InterestBand {
        min_apr: r.number("min_apr")?,
        max_apr: r.number("max_apr")?,
        policy_reference: r.str("policy_reference")?.to_string(),
        conditions: r.optional_string_list("conditions")?,
    })
}

pub fn governance_record(r: &Reader<'_>) -> Result<GovernanceLogRecord, ToolError> {
    let record = GovernanceLogRecord::new(r.str("event_type")?, r.str("log_id")?);
    Ok(match r.optional("payload_hash") {
        Some(hash) => record.with_payload_hash(
            hash.as_str()
                .ok_or_else(|| r.invalid("payload_hash", "expected a string"))?,
        ),
        None => record,
    })
}

pub fn risk_tier(r: &Reader<'_>, field: &str) -> Result<RiskTier, ToolError> {
    r.str(field)?
        .parse()
        .map_err(|reason: String| r.invalid(field, reason))
}

/// `{application_id, borrower, loan, region, product, context?}`.
pub fn loan_application(r: &Reader<'_>) -> Result<LoanApplication, ToolError> {
    let application = LoanApplication::new(
        r.str("application_id")?,
        r.object("borrower")?.clone(),
        r.object("loan")?.clone(),
        r.str("region")?,
        r.str("product")?,
    );
    Ok(match r.optional_object("context")? {
        Some(context) => application.with_context(context.clone()),
        None => application,
    })
}

/// Serialize an entity into a wire value.
pub fn encode<T: Serialize + ?Sized>(entity: &T) -> loanrisk_core::Result<Value> {
    Ok(serde_json::to_value(entity)?)
}

/// Serialize an entity whose wire form is a map.
pub fn encode_map<T: Serialize + ?Sized>(entity: &T) -> loanrisk_core::Result<Attributes> {
    Ok(serde_json::from_value(encode(entity)?)?)
}
