//! Runtime configuration.
//!
//! Resolution order: command-line flag, environment variable (both handled by
//! clap), `curate.toml`, compiled defaults. Every path is explicit so that a
//! run can be pointed at an isolated data root.

use crate::domain::errors::CurateError;
use crate::domain::models::{IntegrationProfile, Thresholds};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "curate.toml";
pub const DEFAULT_MAX_VIOLATIONS: usize = 50;

#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub rounds_dir: PathBuf,
    pub approved_dir: PathBuf,
    pub canonical_corpus: PathBuf,
    pub global_staging: PathBuf,
    pub audit_log: PathBuf,
    pub require_verdict: bool,
    pub max_violations: usize,
    pub thresholds: Thresholds,
    pub integration: IntegrationProfile,
}

/// On-disk shape of `curate.toml`. Everything is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    rounds_dir: Option<PathBuf>,
    approved_dir: Option<PathBuf>,
    canonical_corpus: Option<PathBuf>,
    global_staging: Option<PathBuf>,
    audit_log: Option<PathBuf>,
    require_verdict: Option<bool>,
    max_violations: Option<usize>,
    thresholds: Option<Thresholds>,
    integration: Option<IntegrationProfile>,
}

impl Config {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            rounds_dir: root.join("Datasets").join("rounds"),
            approved_dir: root.join("Datasets").join("approved"),
            canonical_corpus: root.join("nyaya_corpus_clean.jsonl"),
            global_staging: root.join("nyaya_corpus_staging.jsonl"),
            audit_log: root.join("audit.jsonl"),
            require_verdict: false,
            max_violations: DEFAULT_MAX_VIOLATIONS,
            thresholds: Thresholds::default(),
            integration: IntegrationProfile::default(),
            root,
        }
    }

    /// Load config for `root`. An explicit `config_path` must exist; otherwise
    /// `<root>/curate.toml` is used when present.
    pub fn load(root: &Path, config_path: Option<&Path>) -> anyhow::Result<Self> {
        let mut cfg = Self::with_root(root);
        let path = match config_path {
            Some(p) if !p.exists() => {
                return Err(CurateError::Config(format!(
                    "config file not found: {}",
                    p.display()
                ))
                .into())
            }
            Some(p) => Some(p.to_path_buf()),
            None => Some(root.join(CONFIG_FILE_NAME)).filter(|p| p.exists()),
        };
        if let Some(path) = path {
            let raw = std::fs::read_to_string(&path)?;
            let file: ConfigFile = toml::from_str(&raw).map_err(|e| {
                CurateError::Config(format!("{}: {}", path.display(), e))
            })?;
            cfg.apply(file);
            tracing::debug!(path = %path.display(), "loaded config file");
        }
        cfg.check()?;
        Ok(cfg)
    }

    fn apply(&mut self, file: ConfigFile) {
        let resolve = |root: &Path, p: PathBuf| if p.is_absolute() { p } else { root.join(p) };
        if let Some(p) = file.rounds_dir {
            self.rounds_dir = resolve(&self.root, p);
        }
        if let Some(p) = file.approved_dir {
            self.approved_dir = resolve(&self.root, p);
        }
        if let Some(p) = file.canonical_corpus {
            self.canonical_corpus = resolve(&self.root, p);
        }
        if let Some(p) = file.global_staging {
            self.global_staging = resolve(&self.root, p);
        }
        if let Some(p) = file.audit_log {
            self.audit_log = resolve(&self.root, p);
        }
        if let Some(v) = file.require_verdict {
            self.require_verdict = v;
        }
        if let Some(v) = file.max_violations {
            self.max_violations = v;
        }
        if let Some(t) = file.thresholds {
            self.thresholds = t;
        }
        if let Some(i) = file.integration {
            self.integration = i;
        }
    }

    /// Apply CLI threshold overrides and re-check them.
    pub fn override_thresholds(
        &mut self,
        non_western: Option<f64>,
        specificity: Option<f64>,
    ) -> anyhow::Result<()> {
        if let Some(v) = non_western {
            self.thresholds.non_western_share = v;
        }
        if let Some(v) = specificity {
            self.thresholds.specificity_share = v;
        }
        self.check()
    }

    fn check(&self) -> anyhow::Result<()> {
        for (name, v) in [
            ("non_western_share", self.thresholds.non_western_share),
            ("specificity_share", self.thresholds.specificity_share),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(CurateError::Config(format!(
                    "threshold {} must be within [0, 1], got {}",
                    name, v
                ))
                .into());
            }
        }
        Ok(())
    }
}
