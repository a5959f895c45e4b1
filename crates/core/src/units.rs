//! Decimal-amount parsing for transaction values.

use alloy_primitives::U256;
use alloy_primitives::utils::parse_units;

use crate::error::Result;

/// Parses a human-readable decimal amount into base units.
///
/// Empty or blank input yields zero instead of an error; the wallet UI
/// sometimes renders no amount at all, and that must not abort
/// classification.
pub fn parse_base_units(text: &str, decimals: u8) -> Result<U256> {
	let trimmed = text.trim();
	if trimmed.is_empty() {
		return Ok(U256::ZERO);
	}
	Ok(parse_units(trimmed, decimals)?.get_absolute())
}

/// First contiguous run of ASCII digits and dots in `text`.
///
/// The transaction surface renders amounts like `"0.5 ETH"`; a failed
/// extraction degrades to the empty string, which parses to zero.
pub fn extract_decimal(text: &str) -> &str {
	let Some(start) = text.find(|c: char| c.is_ascii_digit()) else {
		return "";
	};
	let rest = &text[start..];
	let end = rest
		.find(|c: char| !c.is_ascii_digit() && c != '.')
		.unwrap_or(rest.len());
	&rest[..end]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_fractional_ether() {
		let value = parse_base_units("1.5", 18).unwrap();
		assert_eq!(value, U256::from(1_500_000_000_000_000_000u64));
	}

	#[test]
	fn empty_input_is_zero() {
		assert_eq!(parse_base_units("", 18).unwrap(), U256::ZERO);
		assert_eq!(parse_base_units("   ", 18).unwrap(), U256::ZERO);
	}

	#[test]
	fn whole_amounts_scale() {
		let value = parse_base_units("2", 6).unwrap();
		assert_eq!(value, U256::from(2_000_000u64));
	}

	#[test]
	fn extracts_amount_from_labelled_text() {
		assert_eq!(extract_decimal("0.5 ETH"), "0.5");
		assert_eq!(extract_decimal("Total: 12.25 ETH"), "12.25");
		assert_eq!(extract_decimal("no amount here"), "");
	}

	#[test]
	fn labelled_text_round_trips_through_parse() {
		let value = parse_base_units(extract_decimal("0.5 ETH"), 18).unwrap();
		assert_eq!(value, U256::from(500_000_000_000_000_000u64));
	}
}
