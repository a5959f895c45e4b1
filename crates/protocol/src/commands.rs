use serde::{Deserialize, Serialize};

/// Harness-issued instruction.
///
/// `signTransaction` and `switchEthereumChain` are part of the harness
/// vocabulary and must parse, even though the driver rejects them as
/// unimplemented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "camelCase")]
pub enum WalletCommand {
	ActivateChain(ActivateChain),
	RequestAccounts(Respond),
	SignMessage(Respond),
	SendTransaction(Respond),
	SignTransaction(Respond),
	SwitchEthereumChain(SwitchEthereumChain),
	Report(Report),
}

/// Add-custom-network instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateChain {
	pub chain_id: String,
	pub rpc_url: String,
}

/// Approve/reject answer to a pending wallet window, correlated by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Respond {
	pub id: String,
	pub action: RespondAction,
}

/// Restricted action vocabulary. Anything else is rejected at
/// deserialization, before any UI interaction happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RespondAction {
	Approve,
	Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchEthereumChain {
	pub chain_id: String,
}

/// Terminal report; the payload is forwarded verbatim through the
/// completion signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
	#[serde(default)]
	pub value: serde_json::Value,
}
