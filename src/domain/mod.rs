//! Shared data model layer (structs/constants only).
//!
//! ## Files
//! - `models.rs` — records, verdicts, report/output structs.
//! - `errors.rs` — the curation error taxonomy.
//!
//! Domain types are data-only: no filesystem side effects.
//!
//! ## Compatibility note
//! These structs are the `--format json` output. Schema-impacting changes must
//! be mirrored in `docs/contracts/*`.

pub mod errors;
pub mod models;
