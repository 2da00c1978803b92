use serde::Serialize;
use std::path::PathBuf;

/// A record that is missing one or more required fields.
///
/// `index` is the record's position in its submitted batch (0-based).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("item {index}: missing fields: {}", .missing.join(", "))]
pub struct SchemaError {
    pub index: usize,
    pub missing: Vec<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum CurateError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("validation did not pass for round {round}; use --force to override")]
    ValidationFailed { round: String },
    #[error("could not parse validation result {}: {reason}", .path.display())]
    MalformedVerdict { path: PathBuf, reason: String },
    #[error("no validation result at {}; run validate first or use --force", .path.display())]
    MissingVerdict { path: PathBuf },
    #[error("no records found in round {round}")]
    EmptyRound { round: String },
    #[error("round not found: {round}")]
    RoundNotFound { round: String },
    #[error("index {index} out of range for {len} records ({base}-based)")]
    IndexOutOfRange {
        index: usize,
        len: usize,
        base: &'static str,
    },
    #[error("{}:{line}: malformed JSON line: {reason}", .path.display())]
    MalformedLine {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("config error: {0}")]
    Config(String),
}

impl CurateError {
    pub fn kind(&self) -> &'static str {
        match self {
            CurateError::Schema(_) => "schema_error",
            CurateError::ValidationFailed { .. } => "validation_failed",
            CurateError::MalformedVerdict { .. } => "malformed_verdict",
            CurateError::MissingVerdict { .. } => "missing_verdict",
            CurateError::EmptyRound { .. } => "empty_round",
            CurateError::RoundNotFound { .. } => "round_not_found",
            CurateError::IndexOutOfRange { .. } => "index_out_of_range",
            CurateError::MalformedLine { .. } => "malformed_line",
            CurateError::Config(_) => "config_error",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CurateError::ValidationFailed { .. } => 3,
            CurateError::MalformedVerdict { .. } => 4,
            CurateError::EmptyRound { .. } => 5,
            CurateError::RoundNotFound { .. } => 6,
            CurateError::IndexOutOfRange { .. } => 7,
            CurateError::MissingVerdict { .. } => 8,
            CurateError::Schema(_) | CurateError::MalformedLine { .. } | CurateError::Config(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_lists_every_missing_field() {
        let err = SchemaError {
            index: 3,
            missing: vec!["hetu".to_string(), "nigamana".to_string()],
        };
        assert_eq!(err.to_string(), "item 3: missing fields: hetu, nigamana");
    }

    #[test]
    fn blocking_finalize_errors_have_distinct_exit_codes() {
        let codes = [
            CurateError::ValidationFailed { round: "r".into() }.exit_code(),
            CurateError::MalformedVerdict {
                path: PathBuf::from("v.json"),
                reason: "eof".into(),
            }
            .exit_code(),
            CurateError::EmptyRound { round: "r".into() }.exit_code(),
            CurateError::RoundNotFound { round: "r".into() }.exit_code(),
        ];
        let mut dedup = codes.to_vec();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), codes.len());
        assert!(codes.iter().all(|c| *c > 1));
    }
}
