use crate::domain::errors::SchemaError;
use crate::domain::models::{Entry, Record, REQUIRED_FIELDS};
use serde_json::Value;

const OPTIONAL_FIELDS: [&str; 6] = [
    "complexity_indicators",
    "cultural_tradition",
    "cross_references",
    "notes",
    "source",
    "batch_id",
];

pub struct BatchOutcome {
    pub valid: Vec<Record>,
    pub errors: Vec<SchemaError>,
}

/// Collapse whitespace runs to single spaces and trim.
pub fn normalize_text(value: Option<&Value>) -> String {
    let raw = match value {
        None | Some(Value::Null) => return String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn validate_record(raw: &Entry, index: usize) -> Result<Record, SchemaError> {
    let [domain, pratijna, hetu, udaharana, upanaya, nigamana, grounding_authority] =
        REQUIRED_FIELDS.map(|k| normalize_text(raw.get(k)));

    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .zip([
            &domain,
            &pratijna,
            &hetu,
            &udaharana,
            &upanaya,
            &nigamana,
            &grounding_authority,
        ])
        .filter(|(_, v)| v.is_empty())
        .map(|(k, _)| k.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SchemaError { index, missing });
    }

    let id = match raw.get("id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => uuid::Uuid::new_v4().to_string(),
    };

    let [complexity_indicators, cultural_tradition, cross_references, notes, source, batch_id] =
        OPTIONAL_FIELDS.map(|k| raw.get(k).cloned());

    Ok(Record {
        domain,
        pratijna,
        hetu,
        udaharana,
        upanaya,
        nigamana,
        grounding_authority,
        id,
        complexity_indicators,
        cultural_tradition,
        cross_references,
        notes,
        source,
        batch_id,
    })
}

pub fn validate_batch(raws: &[Entry]) -> BatchOutcome {
    let mut valid = Vec::new();
    let mut errors = Vec::new();
    for (i, raw) in raws.iter().enumerate() {
        match validate_record(raw, i) {
            Ok(r) => valid.push(r),
            Err(e) => {
                tracing::debug!(index = i, missing = ?e.missing, "rejected record");
                errors.push(e);
            }
        }
    }
    BatchOutcome { valid, errors }
}

/// Parse submitted text: a JSON array when it starts with `[`, otherwise one
/// JSON object per line.
pub fn parse_payload(text: &str) -> anyhow::Result<Vec<Entry>> {
    if text.trim_start().starts_with('[') {
        let data: Value = serde_json::from_str(text)?;
        let Value::Array(items) = data else {
            anyhow::bail!("top-level JSON must be an array");
        };
        return Ok(items
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect());
    }
    Ok(super::storage::parse_jsonl(std::path::Path::new("<input>"), text)?)
}
