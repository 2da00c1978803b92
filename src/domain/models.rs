use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record as it sits on disk: one JSON object, field order preserved.
pub type Entry = Map<String, Value>;

pub const REQUIRED_FIELDS: [&str; 7] = [
    "domain",
    "pratijna",
    "hetu",
    "udaharana",
    "upanaya",
    "nigamana",
    "grounding_authority",
];

/// The five steps of the syllogism, used for the complexity proxy.
pub const NARRATIVE_FIELDS: [&str; 5] = ["pratijna", "hetu", "udaharana", "upanaya", "nigamana"];

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub ok: bool,
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

/// A validated syllogism record.
///
/// Required fields are whitespace-normalized and non-empty. Optional
/// metadata is carried through exactly as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub domain: String,
    pub pratijna: String,
    pub hetu: String,
    pub udaharana: String,
    pub upanaya: String,
    pub nigamana: String,
    pub grounding_authority: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity_indicators: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cultural_tradition: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_references: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<Value>,
}

impl Record {
    pub fn to_entry(&self) -> anyhow::Result<Entry> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => anyhow::bail!("record serialized to non-object: {}", other),
        }
    }
}

/// String view of an entry field the way the pipeline reads it: strings as-is,
/// null/absent as empty, other scalars as their JSON text.
pub fn field_text(entry: &Entry, key: &str) -> String {
    match entry.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn entry_id(entry: &Entry) -> String {
    field_text(entry, "id").trim().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub non_western_share: f64,
    pub specificity_share: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            non_western_share: 0.25,
            specificity_share: 0.90,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingDetail {
    pub index: usize,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ValidationVerdict {
    pub round: String,
    pub file: String,
    pub total: usize,
    pub schema_ok: bool,
    pub missing_details: Vec<MissingDetail>,
    pub non_western_share: f64,
    pub specificity_share: f64,
    pub avg_chars_across_steps: f64,
    pub thresholds: Thresholds,
    pub passes: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validated_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitError {
    pub index: usize,
    pub missing: Vec<String>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitSummary {
    pub round: String,
    pub input_items: usize,
    pub validated: usize,
    pub errors: Vec<SubmitError>,
    pub global_staging: String,
    pub round_pretty: String,
    pub round_clean: String,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinalizeSummary {
    pub round: String,
    pub approved_snapshot: String,
    pub snapshot_count: usize,
    pub snapshot_sha256: String,
    pub merged_into_clean: usize,
    pub skipped_existing: usize,
    pub clean_file: String,
    pub forced: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MergeCounts {
    pub merged: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexMapping {
    pub pretty_index_input: usize,
    pub base: String,
    pub normalized_index: usize,
    pub mapped_clean_line: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids_match: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ConvertReport {
    pub input: String,
    pub output: String,
    pub records: usize,
}

#[derive(Debug, Serialize)]
pub struct SyncReport {
    pub round: String,
    pub from: String,
    pub records: usize,
    pub file_pretty: String,
    pub file_clean: String,
}

#[derive(Debug, Serialize)]
pub struct EnrichReport {
    pub round: String,
    pub changed: usize,
    pub total: usize,
    pub file_pretty: String,
    pub file_clean: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TraditionCounts {
    #[serde(rename = "Non-Western")]
    pub non_western: usize,
    #[serde(rename = "Western")]
    pub western: usize,
    #[serde(rename = "Unknown")]
    pub unknown: usize,
    pub other: usize,
}

#[derive(Debug, Serialize)]
pub struct LabelReport {
    pub target: String,
    pub total: usize,
    pub classified: usize,
    pub batched: usize,
    pub distribution: TraditionCounts,
    pub batch_assignments: std::collections::BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagingStatus {
    pub file: String,
    pub total: usize,
    pub unclassified: usize,
    pub unbatched: usize,
}

#[derive(Debug, Serialize)]
pub struct CheckOutcome {
    pub id: String,
    pub passed: usize,
    pub checks: std::collections::BTreeMap<String, bool>,
    pub approved: bool,
}

#[derive(Debug, Serialize)]
pub struct IntegrateReport {
    pub batch: String,
    pub processed: usize,
    pub approved: usize,
    pub skipped_existing: usize,
    pub previous_size: usize,
    pub final_size: usize,
    pub backup: Option<String>,
    pub corpus: String,
    pub outcomes: Vec<CheckOutcome>,
}

/// Checks used when integrating a staged batch straight into the canonical
/// corpus. The default profile targets the Pāṇinian grammar batches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationProfile {
    pub domain_markers: Vec<String>,
    pub authority_markers: Vec<String>,
    pub technical_terms: Vec<String>,
    pub cultural_tradition: String,
}

impl Default for IntegrationProfile {
    fn default() -> Self {
        let owned = |xs: &[&str]| -> Vec<String> { xs.iter().map(|s| s.to_string()).collect() };
        Self {
            domain_markers: owned(&["Sanskrit", "Pāṇinian Grammar"]),
            authority_markers: owned(&["Pāṇinian Grammar", "Aṣṭādhyāyī"]),
            technical_terms: owned(&[
                "vibhakti", "kāraka", "samāsa", "pratyaya", "sandhi", "lakāra", "pada",
            ]),
            cultural_tradition: "Non-Western".to_string(),
        }
    }
}
