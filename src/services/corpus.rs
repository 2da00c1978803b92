//! The canonical corpus: one line-delimited file, deduplicated by `id`.
//!
//! Reads are strict. A missing corpus is the valid initial state; a corrupt
//! line aborts the operation before anything is written.

use crate::domain::models::{entry_id, Entry, MergeCounts};
use crate::services::storage::{append_jsonl, encode_jsonl, read_jsonl_strict, write_atomic};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub fn load_entries(path: &Path) -> anyhow::Result<Vec<Entry>> {
    read_jsonl_strict(path)
}

pub fn load_ids(path: &Path) -> anyhow::Result<HashSet<String>> {
    Ok(load_entries(path)?
        .iter()
        .map(entry_id)
        .filter(|id| !id.is_empty())
        .collect())
}

/// Split `incoming` into entries to append and a count of duplicates. An id
/// seen earlier in the same batch counts as present. Entries without an id
/// are always kept.
pub fn partition_new(existing: &mut HashSet<String>, incoming: &[Entry]) -> (Vec<Entry>, usize) {
    let mut fresh = Vec::new();
    let mut skipped = 0;
    for e in incoming {
        let id = entry_id(e);
        if !id.is_empty() && !existing.insert(id) {
            skipped += 1;
            continue;
        }
        fresh.push(e.clone());
    }
    (fresh, skipped)
}

/// Entries of a batch that are not yet in the corpus.
pub struct MergePlan {
    pub fresh: Vec<Entry>,
    pub skipped: usize,
}

/// Read the corpus and work out which entries of `incoming` are new. Nothing
/// is written, so a corrupt corpus fails here before any side effect.
pub fn plan_merge(path: &Path, incoming: &[Entry]) -> anyhow::Result<MergePlan> {
    let mut ids = load_ids(path)?;
    let (fresh, skipped) = partition_new(&mut ids, incoming);
    Ok(MergePlan { fresh, skipped })
}

/// Append a planned batch. Existing content is never rewritten.
pub fn apply_merge(path: &Path, plan: MergePlan) -> anyhow::Result<MergeCounts> {
    append_jsonl(path, &plan.fresh)?;
    tracing::info!(corpus = %path.display(), merged = plan.fresh.len(), skipped = plan.skipped, "merged into canonical corpus");
    Ok(MergeCounts {
        merged: plan.fresh.len(),
        skipped: plan.skipped,
    })
}

pub struct Rewrite {
    pub previous_size: usize,
    pub final_size: usize,
    pub backup: Option<PathBuf>,
}

pub fn backup_path(path: &Path) -> PathBuf {
    let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S_%3f");
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".backup_{}", stamp));
    PathBuf::from(name)
}

/// Rewrite the corpus as its current content followed by `additions`.
///
/// The current file is first copied to a timestamped backup, which is the
/// recovery point. The new content is written beside the corpus and renamed
/// over it, so the corpus path is never observed half-written.
pub fn rewrite_with(path: &Path, additions: &[Entry]) -> anyhow::Result<Rewrite> {
    let mut all = load_entries(path)?;
    let previous_size = all.len();

    let backup = if path.exists() {
        let b = backup_path(path);
        std::fs::copy(path, &b)?;
        tracing::info!(backup = %b.display(), "corpus backup created");
        Some(b)
    } else {
        None
    };

    all.extend(additions.iter().cloned());
    write_atomic(path, encode_jsonl(&all)?.as_bytes())?;
    tracing::info!(
        corpus = %path.display(),
        previous_size,
        final_size = all.len(),
        "corpus rewritten"
    );
    Ok(Rewrite {
        previous_size,
        final_size: all.len(),
        backup,
    })
}
