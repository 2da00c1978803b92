use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::domain::errors::CurateError;
use crate::domain::models::{Entry, SubmitError, SubmitSummary};
use crate::services::finalizer::{finalize, FinalizeOptions};
use crate::services::output::print_one;
use crate::services::record_validator::{parse_payload, validate_batch};
use crate::services::round_store::RoundStore;
use crate::services::round_validator::{save_verdict, validate_round};
use crate::services::storage::{append_jsonl, audit};
use anyhow::Context;
use std::io::Read;
use std::path::Path;

fn read_input_text(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("reading input {}", p.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn submit(cfg: &Config, text: &str, round: &str, dry_run: bool) -> anyhow::Result<SubmitSummary> {
    let raw_items = parse_payload(text)?;
    let outcome = validate_batch(&raw_items);
    let store = RoundStore::open(&cfg.rounds_dir, round);

    let valid: Vec<Entry> = outcome
        .valid
        .iter()
        .map(|r| r.to_entry())
        .collect::<anyhow::Result<_>>()?;

    if !dry_run {
        store.append(&valid)?;
        append_jsonl(&cfg.global_staging, &valid)?;
    }

    Ok(SubmitSummary {
        round: round.to_string(),
        input_items: raw_items.len(),
        validated: valid.len(),
        errors: outcome
            .errors
            .into_iter()
            .map(|e| SubmitError {
                message: e.to_string(),
                index: e.index,
                missing: e.missing,
            })
            .collect(),
        global_staging: cfg.global_staging.display().to_string(),
        round_pretty: store.pretty_path().display().to_string(),
        round_clean: store.clean_path().display().to_string(),
        dry_run,
    })
}

pub fn handle_curation_commands(cli: &Cli, cfg: &mut Config) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Submit {
            input,
            round,
            dry_run,
        } => {
            let text = read_input_text(input.as_deref())?;
            let summary = submit(cfg, &text, round, *dry_run)?;
            if !dry_run {
                audit(
                    &cfg.audit_log,
                    "submit",
                    serde_json::json!({"round": summary.round, "validated": summary.validated, "errors": summary.errors.len()}),
                );
            }
            print_one(cli.format, summary, |s| {
                let mut lines = vec![format!(
                    "round {}: {}/{} records valid{}",
                    s.round,
                    s.validated,
                    s.input_items,
                    if s.dry_run { " (dry run)" } else { "" }
                )];
                lines.extend(s.errors.iter().map(|e| e.message.clone()));
                lines.join("\n")
            })?;
        }
        Commands::Validate {
            round,
            non_western_threshold,
            specificity_threshold,
            output,
        } => {
            cfg.override_thresholds(*non_western_threshold, *specificity_threshold)?;
            let store = RoundStore::open(&cfg.rounds_dir, round);
            if !store.exists() {
                return Err(CurateError::RoundNotFound {
                    round: round.clone(),
                }
                .into());
            }
            let verdict = validate_round(
                round,
                &store.clean_path(),
                &store.read(),
                &cfg.thresholds,
                cfg.max_violations,
            );
            let out = output.clone().unwrap_or_else(|| store.verdict_path());
            if out != store.verdict_path() {
                tracing::warn!(
                    round = %round,
                    verdict = %out.display(),
                    "verdict written outside the round directory; finalize will not see it"
                );
            }
            save_verdict(&out, &verdict)?;
            audit(
                &cfg.audit_log,
                "validate",
                serde_json::json!({"round": round, "passes": verdict.passes, "verdict": out.display().to_string()}),
            );
            print_one(cli.format, verdict, |v| {
                format!(
                    "round {}: total={} schema_ok={} non_western_share={} specificity_share={} passes={}",
                    v.round, v.total, v.schema_ok, v.non_western_share, v.specificity_share, v.passes
                )
            })?;
        }
        Commands::Finalize {
            round,
            output,
            merge,
            force,
        } => {
            let opts = FinalizeOptions {
                output: output.clone(),
                merge: *merge,
                force: *force,
            };
            let summary = finalize(cfg, round, &opts)?;
            audit(
                &cfg.audit_log,
                "finalize",
                serde_json::to_value(&summary)?,
            );
            print_one(cli.format, summary, |s| {
                format!(
                    "approved {} records -> {} (merged {}, skipped {})",
                    s.snapshot_count, s.approved_snapshot, s.merged_into_clean, s.skipped_existing
                )
            })?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}
