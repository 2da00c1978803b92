use crate::config::Config;
use crate::domain::errors::CurateError;
use crate::domain::models::FinalizeSummary;
use crate::services::corpus::{apply_merge, plan_merge};
use crate::services::round_store::RoundStore;
use crate::services::round_validator::load_verdict;
use crate::services::storage::{sha256_file, write_jsonl};
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct FinalizeOptions {
    /// Snapshot file name inside the approved directory.
    pub output: Option<String>,
    pub merge: bool,
    pub force: bool,
}

pub fn snapshot_name(round: &str, date: chrono::NaiveDate) -> String {
    format!("approved_{}_{}.jsonl", date.format("%Y%m%d"), round)
}

/// Check the persisted verdict. Skipped entirely when `force` is set.
fn check_gate(cfg: &Config, store: &RoundStore, force: bool) -> anyhow::Result<()> {
    if force {
        tracing::warn!(round = store.round(), "finalize forced; verdict not consulted");
        return Ok(());
    }
    let path = store.verdict_path();
    match load_verdict(&path)? {
        Some(v) if !v.passes => Err(CurateError::ValidationFailed {
            round: store.round().to_string(),
        }
        .into()),
        Some(_) => Ok(()),
        None if cfg.require_verdict => Err(CurateError::MissingVerdict { path }.into()),
        None => Ok(()),
    }
}

pub fn finalize(
    cfg: &Config,
    round: &str,
    opts: &FinalizeOptions,
) -> anyhow::Result<FinalizeSummary> {
    let store = RoundStore::open(&cfg.rounds_dir, round);
    if !store.exists() {
        return Err(CurateError::RoundNotFound {
            round: round.to_string(),
        }
        .into());
    }
    check_gate(cfg, &store, opts.force)?;

    let items = store.read();
    if items.is_empty() {
        return Err(CurateError::EmptyRound {
            round: round.to_string(),
        }
        .into());
    }

    // The corpus is read before anything is written.
    let plan = if opts.merge {
        Some(plan_merge(&cfg.canonical_corpus, &items)?)
    } else {
        None
    };

    let name = opts
        .output
        .clone()
        .unwrap_or_else(|| snapshot_name(round, chrono::Utc::now().date_naive()));
    let snapshot: PathBuf = cfg.approved_dir.join(name);
    write_jsonl(&snapshot, &items)?;
    let digest = sha256_file(&snapshot)?;
    tracing::info!(round, snapshot = %snapshot.display(), count = items.len(), "approved snapshot written");

    let counts = match plan {
        Some(plan) => apply_merge(&cfg.canonical_corpus, plan)?,
        None => Default::default(),
    };

    Ok(FinalizeSummary {
        round: round.to_string(),
        approved_snapshot: snapshot.display().to_string(),
        snapshot_count: items.len(),
        snapshot_sha256: digest,
        merged_into_clean: counts.merged,
        skipped_existing: counts.skipped,
        clean_file: cfg.canonical_corpus.display().to_string(),
        forced: opts.force,
    })
}
