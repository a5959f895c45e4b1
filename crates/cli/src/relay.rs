//! NDJSON relay between the harness and the driver.
//!
//! One [`WalletCommand`] per input line, dispatched in arrival order; every
//! line gets an ack object on the output stream. Domain events are pumped
//! out as they arrive. The relay ends when the driver's completion signal
//! resolves, returning the final report payload.

use anyhow::Result;
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use glue::driver::{DriverChannels, WalletDriver};
use glue::session::Session;
use glue_protocol::WalletCommand;

pub async fn serve<S, R, W>(
	driver: &WalletDriver<S>,
	channels: DriverChannels,
	reader: R,
	mut writer: W,
) -> Result<Value>
where
	S: Session,
	R: AsyncBufRead + Unpin,
	W: AsyncWrite + Unpin,
{
	let DriverChannels {
		events: mut events_rx,
		done: mut done_rx,
	} = channels;
	let mut lines = reader.lines();
	let mut events_open = true;
	let mut input_open = true;

	loop {
		tokio::select! {
			event = events_rx.recv(), if events_open => match event {
				Some(event) => {
					write_line(&mut writer, &serde_json::to_value(&event)?).await?;
				}
				None => events_open = false,
			},
			line = lines.next_line(), if input_open => match line? {
				Some(line) => {
					if line.trim().is_empty() {
						continue;
					}
					let ack = handle_line(driver, &line).await;
					write_line(&mut writer, &ack).await?;
				}
				// Input closing is not the end of the run; the harness may
				// still be waiting for the report it already requested.
				None => input_open = false,
			},
			report = &mut done_rx => {
				return Ok(report?);
			}
		}
	}
}

async fn handle_line<S: Session>(driver: &WalletDriver<S>, line: &str) -> Value {
	let command = match serde_json::from_str::<WalletCommand>(line) {
		Ok(command) => command,
		Err(err) => {
			warn!(target: "glue", error = %err, "malformed command line");
			return json!({ "ok": false, "error": format!("malformed command: {err}") });
		}
	};

	debug!(target: "glue", ?command, "dispatching command");
	match dispatch(driver, command).await {
		Ok(()) => json!({ "ok": true }),
		Err(err) => json!({ "ok": false, "error": err.to_string() }),
	}
}

async fn dispatch<S: Session>(driver: &WalletDriver<S>, command: WalletCommand) -> glue::Result<()> {
	match command {
		WalletCommand::ActivateChain(cmd) => driver.activate_chain(&cmd).await,
		WalletCommand::RequestAccounts(cmd) => driver.request_accounts(&cmd).await,
		WalletCommand::SignMessage(cmd) => driver.sign_message(&cmd).await,
		WalletCommand::SendTransaction(cmd) => driver.send_transaction(&cmd).await,
		WalletCommand::SignTransaction(cmd) => driver.sign_transaction(&cmd).await,
		WalletCommand::SwitchEthereumChain(cmd) => driver.switch_ethereum_chain(&cmd.chain_id).await,
		WalletCommand::Report(report) => driver.report(report.value).await,
	}
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, value: &Value) -> Result<()> {
	let mut line = serde_json::to_vec(value)?;
	line.push(b'\n');
	writer.write_all(&line).await?;
	writer.flush().await?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use serde_json::{Value, json};
	use tokio::io::BufReader;

	use glue::config::DriverConfig;
	use glue::driver::WalletDriver;
	use glue::selectors;
	use glue::testing::{FakeSession, FakeWindow};

	use super::serve;

	fn relay_config() -> DriverConfig {
		DriverConfig {
			poll_interval: Duration::from_secs(3600),
			ui_timeout: Duration::from_millis(100),
			unlock_timeout: Duration::from_millis(100),
			post_unlock_delay: Duration::ZERO,
			..DriverConfig::default()
		}
	}

	fn output_lines(bytes: &[u8]) -> Vec<Value> {
		String::from_utf8(bytes.to_vec())
			.unwrap()
			.lines()
			.map(|line| serde_json::from_str(line).unwrap())
			.collect()
	}

	#[tokio::test]
	async fn commands_are_acked_and_report_ends_the_relay() {
		let session = FakeSession::new();
		session.add_window("home", FakeWindow::with_url("http://dapp.test/"));
		session.add_window(
			"popup",
			FakeWindow::with_url("chrome-extension://wallet/index.html")
				.element(selectors::AUTHORIZE_ALLOW, "")
				.element(selectors::AUTHORIZE_DENY, ""),
		);
		session.focus("home");

		let (driver, channels) = WalletDriver::start(session.clone(), relay_config());

		let input = concat!(
			r#"{"method":"requestAccounts","params":{"id":"popup","action":"approve"}}"#,
			"\n",
			"not json at all\n",
			r#"{"method":"report","params":{"value":{"complete":true}}}"#,
			"\n",
		);
		let mut output = Vec::new();

		let report = serve(&driver, channels, BufReader::new(input.as_bytes()), &mut output)
			.await
			.unwrap();
		assert_eq!(report, json!({ "complete": true }));

		let lines = output_lines(&output);
		assert_eq!(lines.len(), 3);
		assert_eq!(lines[0], json!({ "ok": true }));
		assert_eq!(lines[1]["ok"], false);
		assert_eq!(lines[2], json!({ "ok": true }));

		assert_eq!(session.clicks().len(), 1);
		assert!(session.is_closed());
	}

	#[tokio::test]
	async fn unimplemented_families_surface_in_the_ack() {
		let session = FakeSession::new();
		session.add_window("home", FakeWindow::with_url("http://dapp.test/"));
		session.focus("home");

		let (driver, channels) = WalletDriver::start(session.clone(), relay_config());

		let input = concat!(
			r#"{"method":"signTransaction","params":{"id":"popup","action":"approve"}}"#,
			"\n",
			r#"{"method":"report","params":{"value":null}}"#,
			"\n",
		);
		let mut output = Vec::new();

		serve(&driver, channels, BufReader::new(input.as_bytes()), &mut output)
			.await
			.unwrap();

		let lines = output_lines(&output);
		assert_eq!(lines[0]["ok"], false);
		assert!(lines[0]["error"].as_str().unwrap().contains("not implemented"));
	}
}
