use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL};

use anyhow::Result;

use quickconnect::{ClientConfig, Info, ProbeSummary};

/// Print a summary of the client configuration before running.
pub fn print_config_summary(id: &str, config: &ClientConfig) {
	println!("QuickConnect Resolve");
	println!("====================");
	println!("ID:             {}", id);
	println!("Directory:      {}", config.server_url);
	println!("Service:        {}", config.server_kind);
	println!("Timeout:        {} ms", config.timeout.as_millis());
	let insecure_label = if config.accept_invalid_certs { "yes" } else { "no" };
	println!("Accept invalid: {}", insecure_label);
	println!();
}

/// Print every candidate record with its probe state as a table.
pub fn print_records_table(info: &Info, summary: &ProbeSummary) {
	let mut table = Table::new();
	table.load_preset(UTF8_FULL);
	table.set_content_arrangement(ContentArrangement::Dynamic);
	table.set_header(vec!["Priority", "Type", "URL", "State"]);

	for r in info.records() {
		table.add_row(vec![
			format!("{}", r.addr_type.ordinal()),
			r.addr_type.to_string(),
			r.url.clone(),
			r.state.to_string(),
		]);
	}

	println!("Candidates for server {}", info.server_id);
	println!("{table}");
	let timeout_label = if summary.timed_out { " (timed out)" } else { "" };
	println!(
		"{}/{} probes reported{}",
		summary.reported, summary.dispatched, timeout_label,
	);
}

/// Print reachable URLs, most preferred first.
pub fn print_urls(urls: &[String]) {
	for url in urls {
		println!("{}", url);
	}
}

/// Write the probed candidate records to a CSV file.
pub fn write_csv(path: &str, info: &Info) -> Result<()> {
	let mut writer = csv::Writer::from_path(path)?;

	writer.write_record(["priority", "type", "url", "state", "server_id"])?;

	for r in info.records() {
		writer.write_record([
			r.addr_type.ordinal().to_string(),
			r.addr_type.to_string(),
			r.url.clone(),
			r.state.to_string(),
			info.server_id.clone(),
		])?;
	}

	writer.flush()?;
	eprintln!("Results written to: {}", path);
	Ok(())
}
