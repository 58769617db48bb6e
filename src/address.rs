//! Address parsing and canonicalization.
//!
//! Raw address text is trimmed and parsed under standard IPv4/IPv6 rules. The
//! resulting `IpAddr` is the canonical form: equivalent spellings (compressed
//! vs expanded IPv6, leading/trailing whitespace) parse to the same value and
//! print identically.

use std::net::IpAddr;

use thiserror::Error;

use crate::config::{EMPTY_ADDRESS_ERROR, INVALID_ADDRESS_ERROR};

/// Reasons raw text is not a usable address.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Cell was empty or whitespace only.
    #[error("address is empty")]
    Empty,

    /// Text does not parse as IPv4 or IPv6.
    #[error("invalid address format: {0:?}")]
    Invalid(String),
}

impl AddressError {
    /// Fixed message placed in the error column of a batch row.
    pub fn row_message(&self) -> &'static str {
        match self {
            AddressError::Empty => EMPTY_ADDRESS_ERROR,
            AddressError::Invalid(_) => INVALID_ADDRESS_ERROR,
        }
    }
}

/// Parses raw text into a canonical address.
pub fn canonicalize(raw: &str) -> Result<IpAddr, AddressError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AddressError::Empty);
    }
    trimmed
        .parse::<IpAddr>()
        .map_err(|_| AddressError::Invalid(trimmed.to_string()))
}

/// Canonical text form of raw input, if it parses.
pub fn canonical_text(raw: &str) -> Result<String, AddressError> {
    canonicalize(raw).map(|ip| ip.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_ipv4() {
        let ip = canonicalize("8.8.8.8").expect("valid IPv4");
        assert!(ip.is_ipv4());
        assert_eq!(ip.to_string(), "8.8.8.8");
    }

    #[test]
    fn test_canonicalize_trims_whitespace() {
        assert_eq!(canonical_text("  1.1.1.1\t").unwrap(), "1.1.1.1");
        assert_eq!(canonical_text("\n2001:db8::1 ").unwrap(), "2001:db8::1");
    }

    #[test]
    fn test_expanded_and_compressed_ipv6_are_equal() {
        let compressed = canonicalize("2001:4860:4860::8888").unwrap();
        let expanded = canonicalize("2001:4860:4860:0000:0000:0000:0000:8888").unwrap();
        assert_eq!(compressed, expanded);
        assert_eq!(expanded.to_string(), "2001:4860:4860::8888");
    }

    #[test]
    fn test_uppercase_ipv6_canonicalizes_to_lowercase() {
        assert_eq!(
            canonical_text("2001:DB8:85A3::8A2E:370:7334").unwrap(),
            "2001:db8:85a3::8a2e:370:7334"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(canonicalize(""), Err(AddressError::Empty));
        assert_eq!(canonicalize("   "), Err(AddressError::Empty));
        assert_eq!(AddressError::Empty.row_message(), "address is empty");
    }

    #[test]
    fn test_invalid_input() {
        for raw in [
            "not-an-ip",
            "256.1.1.1",
            "1.1.1",
            "1.1.1.1.1",
            "999.999.999.999",
            "2001:::1",
            "8.8.8.8\0",
        ] {
            let err = canonicalize(raw).unwrap_err();
            assert!(
                matches!(err, AddressError::Invalid(_)),
                "{:?} should be invalid",
                raw
            );
            assert_eq!(err.row_message(), "invalid address format");
        }
    }

    #[test]
    fn test_very_long_string_is_invalid() {
        let long_string = "A".repeat(10000);
        assert!(matches!(
            canonicalize(&long_string),
            Err(AddressError::Invalid(_))
        ));
    }
}
