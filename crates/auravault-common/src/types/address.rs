//! EVM address parsing and formatting

use std::str::FromStr;

pub use ethereum_types::Address;

use crate::error::AuraVaultError;

/// Parse a `0x`-prefixed, 20-byte hex address
pub fn parse_address(input: &str) -> Result<Address, AuraVaultError> {
    let trimmed = input.trim();
    let hex_part = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| AuraVaultError::InvalidInput(format!("address {:?} must start with 0x", input)))?;

    if hex_part.len() != 40 {
        return Err(AuraVaultError::InvalidInput(format!(
            "address {:?} must have 40 hex digits",
            input
        )));
    }

    Address::from_str(hex_part)
        .map_err(|e| AuraVaultError::InvalidInput(format!("address {:?}: {}", input, e)))
}

/// Lowercase `0x`-prefixed hex
pub fn format_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        let input = "0x00000000000000000000000000000000000000aA";
        let address = parse_address(input).unwrap();
        assert_eq!(format_address(&address), input.to_lowercase());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_address("00000000000000000000000000000000000000aa").is_err());
        assert!(parse_address("0x1234").is_err());
        assert!(parse_address("0xzz000000000000000000000000000000000000aa").is_err());
    }
}
