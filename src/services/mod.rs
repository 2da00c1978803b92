//! Service layer containing curation logic and side-effect helpers.
//!
//! ## Service map
//! - `record_validator.rs` — per-record schema check, normalization, id minting.
//! - `round_store.rs` — pretty/clean round files, conversion, index mapping.
//! - `round_validator.rs` — round metrics, pass/fail verdict, verdict file.
//! - `finalizer.rs` — verdict gate, approved snapshot, optional merge.
//! - `corpus.rs` — canonical corpus reads, dedup append, backup + rewrite.
//! - `staging.rs` — batch integration from the global staging log.
//! - `labeling.rs` — tradition labeler trait, batch assignment, staging status.
//! - `enrich.rs` — tradition tagging and default citations for a round.
//! - `storage.rs` — JSON/JSONL file helpers, atomic writes, audit log.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod corpus;
pub mod enrich;
pub mod finalizer;
pub mod labeling;
pub mod output;
pub mod record_validator;
pub mod round_store;
pub mod round_validator;
pub mod staging;
pub mod storage;
