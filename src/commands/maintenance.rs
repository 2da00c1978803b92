use crate::cli::{Cli, Commands, ConvertCommands};
use crate::config::Config;
use crate::domain::errors::CurateError;
use crate::domain::models::{EnrichReport, SyncReport};
use crate::services::enrich::{enrich_entries, EnrichOptions};
use crate::services::labeling::{label_entries, staging_status, KeywordLabeler};
use crate::services::output::print_one;
use crate::services::round_store::{map_index, to_clean, to_pretty, RoundStore};
use crate::services::staging::{integrate, IntegrateOptions};
use crate::services::storage::{audit, read_jsonl_strict, write_jsonl};

fn open_existing(cfg: &Config, round: &str) -> anyhow::Result<RoundStore> {
    let store = RoundStore::open(&cfg.rounds_dir, round);
    if !store.exists() {
        return Err(CurateError::RoundNotFound {
            round: round.to_string(),
        }
        .into());
    }
    Ok(store)
}

pub fn handle_maintenance_commands(cli: &Cli, cfg: &Config) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Convert { command } => match command {
            ConvertCommands::ToPretty { input, output } => {
                let r = to_pretty(input, output)?;
                print_one(cli.format, r, |r| {
                    format!("wrote pretty JSON array ({} records): {}", r.records, r.output)
                })?;
            }
            ConvertCommands::ToClean { input, output } => {
                let r = to_clean(input, output)?;
                print_one(cli.format, r, |r| {
                    format!("wrote clean JSONL ({} records): {}", r.records, r.output)
                })?;
            }
            ConvertCommands::MapIndex {
                pretty,
                clean,
                index,
                base,
            } => {
                let m = map_index(pretty, clean, *index, *base)?;
                print_one(cli.format, m, |m| {
                    format!(
                        "index {} ({}-based) -> clean line {}",
                        m.pretty_index_input, m.base, m.mapped_clean_line
                    )
                })?;
            }
        },
        Commands::Sync { round, from } => {
            let store = RoundStore::open(&cfg.rounds_dir, round);
            let records = store.sync(*from)?;
            let report = SyncReport {
                round: round.clone(),
                from: from.as_str().to_string(),
                records,
                file_pretty: store.pretty_path().display().to_string(),
                file_clean: store.clean_path().display().to_string(),
            };
            print_one(cli.format, report, |r| {
                format!("synced {} records from {}", r.records, r.from)
            })?;
        }
        Commands::Enrich {
            round,
            tag_non_western,
            add_urls,
        } => {
            let store = open_existing(cfg, round)?;
            let mut entries = store.read();
            let accessed = chrono::Utc::now().format("%Y-%m-%d").to_string();
            let opts = EnrichOptions {
                tag_non_western: *tag_non_western,
                add_urls: *add_urls,
            };
            let changed = enrich_entries(&mut entries, opts, &accessed);
            if changed > 0 {
                store.replace(&entries)?;
                audit(
                    &cfg.audit_log,
                    "enrich",
                    serde_json::json!({"round": round, "changed": changed}),
                );
            }
            let report = EnrichReport {
                round: round.clone(),
                changed,
                total: entries.len(),
                file_pretty: store.pretty_path().display().to_string(),
                file_clean: store.clean_path().display().to_string(),
            };
            print_one(cli.format, report, |r| {
                format!("enriched {}/{} records in {}", r.changed, r.total, r.round)
            })?;
        }
        Commands::Label { target } => {
            let labeler = KeywordLabeler::default();
            let today = chrono::Utc::now().date_naive();
            let report = match &target.round {
                Some(round) => {
                    let store = open_existing(cfg, round)?;
                    let mut entries = store.read();
                    let report = label_entries(round, &mut entries, &labeler, today);
                    if report.classified + report.batched > 0 {
                        store.replace(&entries)?;
                    }
                    report
                }
                None => {
                    let path = &cfg.global_staging;
                    let mut entries = read_jsonl_strict(path)?;
                    let report = label_entries(
                        &path.display().to_string(),
                        &mut entries,
                        &labeler,
                        today,
                    );
                    if report.classified + report.batched > 0 {
                        write_jsonl(path, &entries)?;
                    }
                    report
                }
            };
            audit(
                &cfg.audit_log,
                "label",
                serde_json::json!({"target": report.target, "classified": report.classified, "batched": report.batched}),
            );
            print_one(cli.format, report, |r| {
                format!(
                    "labeled {}: classified {}, batched {} of {}",
                    r.target, r.classified, r.batched, r.total
                )
            })?;
        }
        Commands::Status => {
            let entries = read_jsonl_strict(&cfg.global_staging)?;
            let status = staging_status(&cfg.global_staging.display().to_string(), &entries);
            print_one(cli.format, status, |s| {
                format!(
                    "total {}\tunclassified {}\tunbatched {}",
                    s.total, s.unclassified, s.unbatched
                )
            })?;
        }
        Commands::Integrate {
            batch,
            min_checks,
            staging_round,
        } => {
            let opts = IntegrateOptions {
                batch: batch.clone(),
                min_checks: *min_checks,
                staging_round: *staging_round,
            };
            let report = integrate(
                &cfg.global_staging,
                &cfg.canonical_corpus,
                &cfg.integration,
                &opts,
            )?;
            audit(
                &cfg.audit_log,
                "integrate",
                serde_json::json!({
                    "batch": report.batch,
                    "approved": report.approved,
                    "final_size": report.final_size,
                    "backup": report.backup,
                }),
            );
            print_one(cli.format, report, |r| {
                format!(
                    "batch {}: approved {}/{}; corpus {} -> {}",
                    r.batch, r.approved, r.processed, r.previous_size, r.final_size
                )
            })?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}
