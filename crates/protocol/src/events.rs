use serde::{Deserialize, Serialize};

/// Wallet-initiated notification toward the harness.
///
/// Exactly one event is emitted per classified wallet window. The `id` field
/// of the payload is the window handle the harness must echo back in the
/// corresponding response command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "params", rename_all = "lowercase")]
pub enum WalletEvent {
	RequestAccounts(RequestAccountsEvent),
	SignMessage(SignMessageEvent),
	SendTransaction(SendTransactionEvent),
}

impl WalletEvent {
	/// Correlation id (window handle) carried by the payload.
	pub fn id(&self) -> &str {
		match self {
			Self::RequestAccounts(ev) => &ev.id,
			Self::SignMessage(ev) => &ev.id,
			Self::SendTransaction(ev) => &ev.id,
		}
	}
}

/// The wallet asks to connect accounts to a dapp.
///
/// The wallet UI does not reveal the selected accounts before approval, so
/// `accounts` is an empty placeholder list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestAccountsEvent {
	pub id: String,
	pub accounts: Vec<String>,
}

/// The wallet asks to sign a plain message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignMessageEvent {
	pub id: String,
	pub message: String,
}

/// The wallet asks to sign or send a transaction.
///
/// `value` is the amount in base units as a decimal string; `data` is the
/// calldata (always `0x`, the confirmation surface does not expose it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendTransactionEvent {
	pub id: String,
	pub from: String,
	pub to: String,
	pub data: String,
	pub value: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn request_accounts_wire_shape() {
		let event = WalletEvent::RequestAccounts(RequestAccountsEvent {
			id: "CDwindow-1".into(),
			accounts: Vec::new(),
		});
		let json = serde_json::to_value(&event).unwrap();
		assert_eq!(
			json,
			serde_json::json!({
				"event": "requestaccounts",
				"params": { "id": "CDwindow-1", "accounts": [] },
			})
		);
	}

	#[test]
	fn send_transaction_round_trips() {
		let event = WalletEvent::SendTransaction(SendTransactionEvent {
			id: "CDwindow-7".into(),
			from: "0xaaaa".into(),
			to: "0xbbbb".into(),
			data: "0x".into(),
			value: "1500000000000000000".into(),
		});
		let json = serde_json::to_string(&event).unwrap();
		let back: WalletEvent = serde_json::from_str(&json).unwrap();
		assert_eq!(back, event);
		assert_eq!(back.id(), "CDwindow-7");
	}
}
