use std::path::PathBuf;

use clap::Parser;

/// Drives the wallet extension UI on behalf of a conformance-test harness.
#[derive(Parser, Debug)]
#[command(name = "wallet-glue")]
#[command(about = "Wallet extension UI driver for conformance harnesses")]
#[command(version)]
pub struct Cli {
	/// WebDriver endpoint to attach to.
	#[arg(long, value_name = "URL", default_value = "http://localhost:9515")]
	pub webdriver: String,

	/// Packed wallet extension (.crx) to install.
	#[arg(long, value_name = "FILE")]
	pub extension: Option<PathBuf>,

	/// Pin the browser version the driver provisions.
	#[arg(long, value_name = "VERSION")]
	pub browser_version: Option<String>,

	/// Dapp page to open and connect once wallet setup finishes.
	#[arg(long, value_name = "URL")]
	pub url: Option<String>,

	/// Window discovery poll interval in milliseconds.
	#[arg(long, value_name = "MS", default_value_t = 500)]
	pub poll_interval_ms: u64,

	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,
}

#[cfg(test)]
mod tests {
	use clap::Parser;

	use super::Cli;

	#[test]
	fn defaults_are_usable() {
		let cli = Cli::parse_from(["wallet-glue"]);
		assert_eq!(cli.webdriver, "http://localhost:9515");
		assert_eq!(cli.poll_interval_ms, 500);
		assert!(cli.extension.is_none());
		assert_eq!(cli.verbose, 0);
	}

	#[test]
	fn flags_parse() {
		let cli = Cli::parse_from([
			"wallet-glue",
			"--webdriver",
			"http://localhost:4444",
			"--extension",
			"/tmp/wallet.crx",
			"--url",
			"http://localhost:3000/tests",
			"-vv",
		]);
		assert_eq!(cli.webdriver, "http://localhost:4444");
		assert_eq!(cli.extension.as_deref(), Some(std::path::Path::new("/tmp/wallet.crx")));
		assert_eq!(cli.url.as_deref(), Some("http://localhost:3000/tests"));
		assert_eq!(cli.verbose, 2);
	}
}
