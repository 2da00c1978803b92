use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod config;
mod domain;
mod services;

use cli::Cli;
use config::Config;
use domain::errors::CurateError;
use services::output::print_error;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("NYAYA_LOG")
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut cfg = Config::load(&cli.root, cli.config.as_deref())?;
    tracing::debug!(root = %cfg.root.display(), "configuration resolved");

    if commands::handle_curation_commands(cli, &mut cfg)? {
        return Ok(());
    }
    if commands::handle_maintenance_commands(cli, &cfg)? {
        return Ok(());
    }
    anyhow::bail!("unhandled command")
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        let (kind, code) = match err.downcast_ref::<CurateError>() {
            Some(e) => (e.kind(), e.exit_code()),
            None => ("error", 1),
        };
        tracing::error!(kind, "{:#}", err);
        print_error(cli.format, kind, &format!("{:#}", err));
        std::process::exit(code);
    }
}
