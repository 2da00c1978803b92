use crate::services::round_store::{IndexBase, Representation};
use crate::services::staging::{DEFAULT_MIN_CHECKS, DEFAULT_STAGING_ROUND};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub const DEFAULT_ROOT: &str = "nyaya";
pub const DEFAULT_ROUND: &str = "staging_round_0001";

#[derive(Parser, Debug)]
#[command(name = "nyaya", version, about = "Nyaya corpus curation CLI")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "NYAYA_ROOT",
        default_value = DEFAULT_ROOT,
        help = "Data root holding the staging log, rounds, approved snapshots and corpus"
    )]
    pub root: PathBuf,
    #[arg(
        long,
        global = true,
        env = "NYAYA_CONFIG",
        help = "TOML config file (defaults to <root>/curate.toml when present)"
    )]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate records and append them to the staging log and a round
    Submit {
        #[arg(long, help = "JSON array or JSONL file; reads stdin when omitted")]
        input: Option<PathBuf>,
        #[arg(long, default_value = DEFAULT_ROUND)]
        round: String,
        #[arg(long, default_value_t = false, help = "Validate only, no writes")]
        dry_run: bool,
    },
    /// Compute and persist the verdict for a round
    Validate {
        #[arg(long, default_value = DEFAULT_ROUND)]
        round: String,
        #[arg(long)]
        non_western_threshold: Option<f64>,
        #[arg(long)]
        specificity_threshold: Option<f64>,
        #[arg(long, help = "Verdict path; defaults to the round directory, the only place finalize reads it from")]
        output: Option<PathBuf>,
    },
    /// Write an approved snapshot of a round and optionally merge it
    Finalize {
        #[arg(long)]
        round: String,
        #[arg(long, help = "Snapshot file name (defaults to approved_YYYYMMDD_<round>.jsonl)")]
        output: Option<String>,
        #[arg(long, default_value_t = false, help = "Append unseen records to the canonical corpus")]
        merge: bool,
        #[arg(long, default_value_t = false, help = "Proceed even if the verdict fails")]
        force: bool,
    },
    /// Convert between round file formats
    Convert {
        #[command(subcommand)]
        command: ConvertCommands,
    },
    /// Rebuild one round representation from the other
    Sync {
        #[arg(long)]
        round: String,
        #[arg(long, value_enum)]
        from: Representation,
    },
    /// Tag traditions and add default citations across a round
    Enrich {
        #[arg(long)]
        round: String,
        #[arg(long, default_value_t = false)]
        tag_non_western: bool,
        #[arg(long, default_value_t = false)]
        add_urls: bool,
    },
    /// Fill missing cultural traditions and batch ids
    Label {
        #[command(flatten)]
        target: LabelTarget,
    },
    /// Summarize the global staging log
    Status,
    /// Integrate a staged batch straight into the canonical corpus
    Integrate {
        #[arg(long)]
        batch: String,
        #[arg(long, default_value_t = DEFAULT_MIN_CHECKS)]
        min_checks: usize,
        #[arg(long, default_value_t = DEFAULT_STAGING_ROUND)]
        staging_round: u32,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct LabelTarget {
    #[arg(long)]
    pub round: Option<String>,
    #[arg(long)]
    pub staging: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConvertCommands {
    /// Line-delimited file to indented JSON array
    ToPretty {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Indented JSON array to line-delimited file
    ToClean {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Map an array index to its line in the clean file
    MapIndex {
        #[arg(long)]
        pretty: PathBuf,
        #[arg(long)]
        clean: PathBuf,
        #[arg(long)]
        index: usize,
        #[arg(long, value_enum, default_value_t = IndexBase::One)]
        base: IndexBase,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}
