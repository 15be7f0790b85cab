//! Folio command-line frontend.

mod cli;
mod render;
mod scenario;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use folio_config::Config;
use tracing::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	let config = Config::load_or_default(cli.config.as_deref()).context("failed to load configuration")?;

	setup_tracing(cli.verbose, &config.log.filter);
	debug!(config = ?config, "configuration resolved");

	match cli.command {
		Command::Render { block, base_url } => render::render(&block, base_url, &config).await,
		Command::Path { block } => {
			render::print_path(&block, &config);
			Ok(())
		}
		Command::Schedule { scenario: path } => {
			let scenario = scenario::Scenario::load(&path)?;
			for line in scenario::replay(&scenario, config.scheduler.threshold)? {
				println!("{line}");
			}
			Ok(())
		}
	}
}

fn setup_tracing(verbose: bool, default_filter: &str) {
	use std::fs::OpenOptions;

	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("folio=trace,folio_render=trace,folio_visibility=trace,debug")
		} else {
			EnvFilter::new(default_filter)
		}
	});

	// FOLIO_LOG_DIR sends logs to a per-process file instead of stderr.
	if let Some(log_dir) = std::env::var("FOLIO_LOG_DIR").ok().map(PathBuf::from) {
		if std::fs::create_dir_all(&log_dir).is_ok() {
			let log_path = log_dir.join(format!("folio.{}.log", std::process::id()));
			if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
				let file_layer = tracing_subscriber::fmt::layer()
					.with_writer(file)
					.with_ansi(false)
					.with_target(true);
				tracing_subscriber::registry().with(filter).with(file_layer).init();
				tracing::info!(path = ?log_path, "tracing initialized");
				return;
			}
		}
	}

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
