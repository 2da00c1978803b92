//! Per-round storage in two synchronized representations.
//!
//! - pretty: `nyaya_corpus_<round>_pretty.json`, an indented JSON array for
//!   reviewers;
//! - clean: `nyaya_corpus_<round>_clean.jsonl`, one object per line for
//!   processing.
//!
//! Record N of the array is always line N+1 of the clean file. Every mutation
//! writes both files from the same ordered sequence, pretty first.
//!
//! Reads are tolerant: a missing or malformed round file reads as empty (with a
//! warning) so a half-written round never wedges the pipeline. `sync` rebuilds
//! one representation from the other after a crash between the two writes.

use crate::domain::errors::CurateError;
use crate::domain::models::{entry_id, ConvertReport, Entry, IndexMapping};
use crate::services::storage::{
    append_jsonl, read_jsonl_strict, read_jsonl_tolerant, read_pretty_strict,
    read_pretty_tolerant, write_jsonl, write_pretty,
};
use anyhow::Context;
use clap::ValueEnum;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const VERDICT_FILE_NAME: &str = "validation_result.json";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    Pretty,
    Clean,
}

impl Representation {
    pub fn as_str(self) -> &'static str {
        match self {
            Representation::Pretty => "pretty",
            Representation::Clean => "clean",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IndexBase {
    Zero,
    One,
}

impl IndexBase {
    pub fn as_str(self) -> &'static str {
        match self {
            IndexBase::Zero => "zero",
            IndexBase::One => "one",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoundStore {
    round: String,
    dir: PathBuf,
}

impl RoundStore {
    pub fn open(rounds_dir: &Path, round: &str) -> Self {
        Self {
            round: round.to_string(),
            dir: rounds_dir.join(round),
        }
    }

    pub fn round(&self) -> &str {
        &self.round
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn pretty_path(&self) -> PathBuf {
        self.dir
            .join(format!("nyaya_corpus_{}_pretty.json", self.round))
    }

    pub fn clean_path(&self) -> PathBuf {
        self.dir
            .join(format!("nyaya_corpus_{}_clean.jsonl", self.round))
    }

    pub fn verdict_path(&self) -> PathBuf {
        self.dir.join(VERDICT_FILE_NAME)
    }

    pub fn exists(&self) -> bool {
        self.pretty_path().exists() || self.clean_path().exists()
    }

    pub fn read_pretty(&self) -> Vec<Entry> {
        read_pretty_tolerant(&self.pretty_path())
    }

    pub fn read_clean(&self) -> Vec<Entry> {
        read_jsonl_tolerant(&self.clean_path())
    }

    /// The round's records, from the clean file, or from the array when the
    /// clean file has not been written yet.
    pub fn read(&self) -> Vec<Entry> {
        if self.clean_path().exists() {
            return self.read_clean();
        }
        self.read_pretty()
    }

    /// Records to carry over when the pretty file is rewritten. Unlike
    /// [`RoundStore::read`] this is strict: a corrupt pretty file fails the
    /// write instead of being replaced by the new records alone.
    fn current_for_rewrite(&self) -> anyhow::Result<Vec<Entry>> {
        let pretty = self.pretty_path();
        if pretty.exists() {
            return read_pretty_strict(&pretty)
                .with_context(|| format!("refusing to rewrite round {}", self.round));
        }
        read_jsonl_strict(&self.clean_path())
    }

    pub fn append(&self, entries: &[Entry]) -> anyhow::Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut arr = self.current_for_rewrite()?;
        arr.extend(entries.iter().cloned());
        write_pretty(&self.pretty_path(), &arr)?;
        append_jsonl(&self.clean_path(), entries)?;
        tracing::info!(round = %self.round, added = entries.len(), total = arr.len(), "appended to round");
        Ok(())
    }

    /// Rewrite both representations from one sequence.
    pub fn replace(&self, entries: &[Entry]) -> anyhow::Result<()> {
        write_pretty(&self.pretty_path(), entries)?;
        write_jsonl(&self.clean_path(), entries)?;
        tracing::info!(round = %self.round, dir = %self.dir().display(), total = entries.len(), "rewrote round");
        Ok(())
    }

    /// Rebuild the other representation from `from`. Returns the record count.
    pub fn sync(&self, from: Representation) -> anyhow::Result<usize> {
        if !self.exists() {
            return Err(CurateError::RoundNotFound {
                round: self.round.clone(),
            }
            .into());
        }
        let entries = match from {
            Representation::Pretty => {
                let items = read_pretty_strict(&self.pretty_path())?;
                write_jsonl(&self.clean_path(), &items)?;
                items
            }
            Representation::Clean => {
                let items = read_jsonl_strict(&self.clean_path())?;
                write_pretty(&self.pretty_path(), &items)?;
                items
            }
        };
        tracing::info!(round = %self.round, from = from.as_str(), total = entries.len(), "synced round");
        Ok(entries.len())
    }
}

pub fn to_pretty(input: &Path, output: &Path) -> anyhow::Result<ConvertReport> {
    if !input.exists() {
        anyhow::bail!("input not found: {}", input.display());
    }
    let items = read_jsonl_strict(input)?;
    write_pretty(output, &items)?;
    Ok(ConvertReport {
        input: input.display().to_string(),
        output: output.display().to_string(),
        records: items.len(),
    })
}

pub fn to_clean(input: &Path, output: &Path) -> anyhow::Result<ConvertReport> {
    let items = read_pretty_strict(input)?;
    write_jsonl(output, &items)?;
    Ok(ConvertReport {
        input: input.display().to_string(),
        output: output.display().to_string(),
        records: items.len(),
    })
}

/// Map an array index to its 1-based line in the clean file.
pub fn map_index(
    pretty: &Path,
    clean: &Path,
    index: usize,
    base: IndexBase,
) -> anyhow::Result<IndexMapping> {
    let items = read_pretty_strict(pretty)?;
    let len = items.len();
    let normalized = match base {
        IndexBase::Zero if index < len => Some(index),
        IndexBase::One if index >= 1 && index <= len => Some(index - 1),
        _ => None,
    };
    let Some(idx) = normalized else {
        return Err(CurateError::IndexOutOfRange {
            index,
            len,
            base: base.as_str(),
        }
        .into());
    };

    let ids_match = if clean.exists() {
        let lines = read_jsonl_strict(clean)?;
        Some(
            lines
                .get(idx)
                .map(|l| entry_id(l) == entry_id(&items[idx]))
                .unwrap_or(false),
        )
    } else {
        None
    };

    Ok(IndexMapping {
        pretty_index_input: index,
        base: base.as_str().to_string(),
        normalized_index: idx,
        mapped_clean_line: idx + 1,
        total: len,
        ids_match,
    })
}
