mod cli;
mod output;

use clap::Parser;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use quickconnect::{Client, ClientConfig, Error, ServerKind};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	// RUST_LOG wins over the verbosity flag
	let default_level = if cli.verbose { "debug" } else { "warn" };
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(default_level));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();

	// Build client config
	let server_kind: ServerKind = cli.kind.parse()?;
	let mut config = ClientConfig {
		timeout: Duration::from_millis(cli.timeout),
		server_kind,
		accept_invalid_certs: cli.insecure,
		..Default::default()
	};
	if let Some(url) = &cli.server_url {
		config.server_url = url.clone();
	}

	if cli.verbose {
		output::print_config_summary(&cli.id, &config);
	}

	let client = Client::new(config)?;

	// Ctrl-C cancels the resolution; in-flight probes are drained first
	let cancel = CancellationToken::new();
	let trigger = cancel.clone();
	tokio::spawn(async move {
		if tokio::signal::ctrl_c().await.is_ok() {
			trigger.cancel();
		}
	});

	if !cli.all && cli.output.is_none() {
		let urls = client.resolve(&cli.id, &cancel).await?;
		output::print_urls(&urls);
		return Ok(());
	}

	let mut info = client.get_info(&cli.id, &cancel).await?;
	let summary = client.update_state(&mut info, &cancel).await?;

	// Write CSV if requested
	if let Some(path) = &cli.output {
		output::write_csv(path, &info)?;
	}

	if cli.all {
		output::print_records_table(&info, &summary);
		return Ok(());
	}

	let urls = info.reachable_urls();
	if urls.is_empty() {
		return Err(Error::CannotAccess.into());
	}
	output::print_urls(&urls);

	Ok(())
}
