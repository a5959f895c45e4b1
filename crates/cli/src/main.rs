use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use glue::config::DriverConfig;
use glue::driver::WalletDriver;
use glue::webdriver::{ConnectOptions, WebDriverSession};
use glue_cli::{cli::Cli, logging, relay};
use tokio::io::BufReader;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Cli::parse();
	logging::init_logging(args.verbose);

	let options = ConnectOptions {
		extension: args.extension.clone(),
		browser_version: args.browser_version.clone(),
	};
	let session = WebDriverSession::connect(&args.webdriver, &options)
		.await
		.context("webdriver session failed")?;

	let config = DriverConfig {
		poll_interval: Duration::from_millis(args.poll_interval_ms),
		..DriverConfig::default()
	};
	let (driver, channels) = WalletDriver::start(session, config);

	driver.setup().await.context("wallet setup failed")?;
	info!(target: "glue", "wallet imported and unlocked");

	if let Some(url) = &args.url {
		driver.launch(url).await.context("dapp launch failed")?;
		info!(target: "glue", %url, "dapp connected");
	}

	let stdin = BufReader::new(tokio::io::stdin());
	let stdout = tokio::io::stdout();
	let report = relay::serve(&driver, channels, stdin, stdout).await?;

	// Final line on stdout is the report payload itself.
	println!("{report}");
	Ok(())
}
