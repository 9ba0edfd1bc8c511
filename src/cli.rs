use clap::Parser;

/// QuickConnect resolver
#[derive(Parser, Debug)]
#[command(name = "qc-resolve")]
#[command(about = "Resolve a QuickConnect ID into verified, reachable URLs")]
pub struct Cli {
	/// QuickConnect ID of the device
	pub id: String,

	/// Probe phase timeout in milliseconds
	#[arg(short = 't', long = "timeout", default_value = "2000")]
	pub timeout: u64,

	/// Directory server URL
	#[arg(long = "server-url")]
	pub server_url: Option<String>,

	/// Service to locate (dsm or photo)
	#[arg(long = "kind", default_value = "dsm")]
	pub kind: String,

	/// Accept self-signed or otherwise invalid TLS certificates
	#[arg(short = 'k', long = "insecure")]
	pub insecure: bool,

	/// Show every candidate with its probe state instead of only reachable URLs
	#[arg(short = 'a', long = "all")]
	pub all: bool,

	/// Output CSV file path for the probed candidates
	#[arg(short = 'o', long = "output")]
	pub output: Option<String>,

	/// Enable debug logging on stderr
	#[arg(short = 'v', long = "verbose")]
	pub verbose: bool,
}
