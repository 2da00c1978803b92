use crate::domain::errors::CurateError;
use crate::domain::models::{
    field_text, Entry, MissingDetail, Thresholds, ValidationVerdict, NARRATIVE_FIELDS,
    REQUIRED_FIELDS,
};
use crate::services::storage::write_atomic;
use std::path::Path;

/// Traditions that count toward the diversity share, besides any label
/// containing "non" (e.g. "Non-Western").
const NON_MAJORITY_TRADITIONS: [&str; 8] = [
    "indian", "chinese", "islamic", "buddhist", "jain", "hindu", "confucian", "taoist",
];

pub fn missing_fields(entry: &Entry) -> Vec<String> {
    REQUIRED_FIELDS
        .iter()
        .filter(|k| field_text(entry, k).trim().is_empty())
        .map(|k| k.to_string())
        .collect()
}

pub fn is_non_majority(tradition: &str) -> bool {
    let t = tradition.trim().to_lowercase();
    if t.is_empty() {
        return false;
    }
    t.contains("non") || NON_MAJORITY_TRADITIONS.contains(&t.as_str())
}

/// A citation is specific when it carries a URL and a named source, written
/// either as `Category / Name` or with a colon.
pub fn has_specific_source(grounding_authority: &str) -> bool {
    let s = grounding_authority.trim().to_lowercase();
    (s.contains("http://") || s.contains("https://")) && (s.contains(" / ") || s.contains(':'))
}

fn round_to(v: f64, places: i32) -> f64 {
    let f = 10f64.powi(places);
    (v * f).round() / f
}

pub fn validate_round(
    round: &str,
    file: &Path,
    entries: &[Entry],
    thresholds: &Thresholds,
    max_violations: usize,
) -> ValidationVerdict {
    let total = entries.len();
    let mut missing_details = Vec::new();
    let mut schema_ok = true;
    let mut non_majority = 0usize;
    let mut specific = 0usize;
    let mut char_sum = 0usize;

    for (index, e) in entries.iter().enumerate() {
        let missing = missing_fields(e);
        if !missing.is_empty() {
            schema_ok = false;
            if missing_details.len() < max_violations {
                missing_details.push(MissingDetail { index, missing });
            }
        }
        if is_non_majority(&field_text(e, "cultural_tradition")) {
            non_majority += 1;
        }
        if has_specific_source(&field_text(e, "grounding_authority")) {
            specific += 1;
        }
        char_sum += NARRATIVE_FIELDS
            .iter()
            .map(|k| field_text(e, k).trim().chars().count())
            .sum::<usize>();
    }

    let share = |n: usize| if total == 0 { 0.0 } else { n as f64 / total as f64 };
    let non_western_share = share(non_majority);
    let specificity_share = share(specific);
    let avg_chars = share(char_sum);

    let passes = schema_ok
        && non_western_share >= thresholds.non_western_share
        && specificity_share >= thresholds.specificity_share;

    tracing::info!(
        round,
        total,
        schema_ok,
        non_western_share,
        specificity_share,
        passes,
        "round validated"
    );

    ValidationVerdict {
        round: round.to_string(),
        file: file.display().to_string(),
        total,
        schema_ok,
        missing_details,
        non_western_share: round_to(non_western_share, 3),
        specificity_share: round_to(specificity_share, 3),
        avg_chars_across_steps: round_to(avg_chars, 1),
        thresholds: *thresholds,
        passes,
        validated_at: Some(chrono::Utc::now().to_rfc3339()),
    }
}

pub fn save_verdict(path: &Path, verdict: &ValidationVerdict) -> anyhow::Result<()> {
    write_atomic(path, serde_json::to_string_pretty(verdict)?.as_bytes())
}

/// `Ok(None)` when no verdict has been written; `MalformedVerdict` when one
/// exists but cannot be read as a verdict object.
pub fn load_verdict(path: &Path) -> anyhow::Result<Option<ValidationVerdict>> {
    if !path.exists() {
        return Ok(None);
    }
    let malformed = |reason: String| CurateError::MalformedVerdict {
        path: path.to_path_buf(),
        reason,
    };
    let raw = std::fs::read_to_string(path).map_err(|e| malformed(e.to_string()))?;
    let verdict: ValidationVerdict =
        serde_json::from_str(&raw).map_err(|e| malformed(e.to_string()))?;
    Ok(Some(verdict))
}
