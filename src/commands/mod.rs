//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `curation.rs` — submit/validate/finalize, the round lifecycle.
//! - `maintenance.rs` — convert/sync/enrich/label/status/integrate.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod curation;
pub mod maintenance;

pub use curation::handle_curation_commands;
pub use maintenance::handle_maintenance_commands;
