//! Direct integration of a staged batch into the canonical corpus.
//!
//! Entries of one batch are scored against an [`IntegrationProfile`]; those
//! passing at least `min_checks` checks are stamped and appended to the
//! corpus through [`corpus::rewrite_with`], which keeps a backup of the
//! previous corpus.

use crate::domain::models::{
    entry_id, field_text, CheckOutcome, Entry, IntegrateReport, IntegrationProfile,
};
use crate::services::corpus;
use crate::services::round_validator::missing_fields;
use crate::services::storage::read_jsonl_strict;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_MIN_CHECKS: usize = 2;
pub const DEFAULT_STAGING_ROUND: u32 = 2;

#[derive(Debug, Clone)]
pub struct IntegrateOptions {
    pub batch: String,
    pub min_checks: usize,
    pub staging_round: u32,
}

pub fn run_checks(entry: &Entry, profile: &IntegrationProfile) -> BTreeMap<String, bool> {
    let domain = field_text(entry, "domain");
    let authority = field_text(entry, "grounding_authority");
    let content = format!(
        "{} {}",
        field_text(entry, "pratijna"),
        field_text(entry, "hetu")
    );

    let mut checks = BTreeMap::new();
    checks.insert("schema".to_string(), missing_fields(entry).is_empty());
    checks.insert(
        "domain".to_string(),
        profile.domain_markers.iter().all(|m| domain.contains(m.as_str())),
    );
    checks.insert(
        "authority".to_string(),
        profile
            .authority_markers
            .iter()
            .all(|m| authority.contains(m.as_str())),
    );
    checks.insert(
        "complexity".to_string(),
        profile
            .technical_terms
            .iter()
            .any(|t| content.contains(t.as_str())),
    );
    checks.insert(
        "structure".to_string(),
        field_text(entry, "upanaya").chars().count() > 20
            && field_text(entry, "nigamana").chars().count() > 10,
    );
    checks
}

pub fn integrate(
    staging: &Path,
    corpus_path: &Path,
    profile: &IntegrationProfile,
    opts: &IntegrateOptions,
) -> anyhow::Result<IntegrateReport> {
    let staged: Vec<Entry> = read_jsonl_strict(staging)?
        .into_iter()
        .filter(|e| field_text(e, "batch_id") == opts.batch)
        .collect();
    let mut existing = corpus::load_ids(corpus_path)?;
    let validation_date = chrono::Utc::now().to_rfc3339();

    let mut outcomes = Vec::new();
    let mut approved = Vec::new();
    for (i, mut e) in staged.into_iter().enumerate() {
        let checks = run_checks(&e, profile);
        let passed = checks.values().filter(|ok| **ok).count();
        let ok = passed >= opts.min_checks;
        let id = Some(entry_id(&e))
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("entry_{}", i));
        tracing::debug!(id = %id, passed, approved = ok, "scored staged entry");
        outcomes.push(CheckOutcome {
            id,
            passed,
            checks,
            approved: ok,
        });
        if ok {
            e.insert("staging_status".into(), Value::String("approved".into()));
            e.insert("staging_round".into(), Value::from(opts.staging_round));
            e.insert(
                "validation_date".into(),
                Value::String(validation_date.clone()),
            );
            e.insert(
                "cultural_tradition".into(),
                Value::String(profile.cultural_tradition.clone()),
            );
            approved.push(e);
        }
    }

    let approved_count = approved.len();
    let (fresh, skipped_existing) = corpus::partition_new(&mut existing, &approved);

    let (previous_size, final_size, backup) = if fresh.is_empty() {
        let size = corpus::load_entries(corpus_path)?.len();
        tracing::info!(batch = %opts.batch, "nothing to integrate");
        (size, size, None)
    } else {
        let r = corpus::rewrite_with(corpus_path, &fresh)?;
        (r.previous_size, r.final_size, r.backup)
    };

    Ok(IntegrateReport {
        batch: opts.batch.clone(),
        processed: outcomes.len(),
        approved: approved_count,
        skipped_existing,
        previous_size,
        final_size,
        backup: backup.map(|b| b.display().to_string()),
        corpus: corpus_path.display().to_string(),
        outcomes,
    })
}
