//! Core address types for netspan
//!
//! This crate provides the foundational types used throughout the netspan workspace:
//! - [`Address`] - a single IPv4 or IPv6 address in canonical byte form
//! - [`AddressInput`] - the closed set of inputs an [`Address`] can be parsed from
//! - [`NetspanError`] - Error types
//!
//! ```
//! use netspan_core::{Address, Version};
//!
//! let addr = Address::parse("127.000.000.001").unwrap();
//! assert_eq!(addr.to_string(), "127.0.0.1");
//! assert_eq!(addr.version(), Version::V4);
//! assert_eq!(addr.to_hex(), "7f000001");
//! ```

use thiserror::Error;

pub mod address;
pub mod format;
pub mod input;

pub use address::{Address, Decimal, Version};
pub use input::{AddressInput, InputKind};

/// Error types for netspan operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetspanError {
    /// Input matched none of the recognized address encodings
    #[error("Input '{value}' of type [{kind}] could not be converted into an IP address")]
    InvalidAddress {
        /// The rejected value, rendered as text
        value: String,
        /// The detected type of the rejected value
        kind: InputKind,
    },

    /// Prefix length outside `0..=width`
    #[error("Prefix length {prefix} exceeds the maximum value of {max}")]
    InvalidPrefix {
        /// The requested prefix length
        prefix: u32,
        /// The address width of the network
        max: u8,
    },

    /// Two addresses of different families were combined
    #[error("The provided IP addresses do not have the same version ({left} and {right})")]
    VersionMismatch {
        /// Version of the left-hand operand
        left: Version,
        /// Version of the right-hand operand
        right: Version,
    },
}

impl NetspanError {
    pub(crate) fn invalid_address(input: &AddressInput<'_>) -> Self {
        NetspanError::InvalidAddress {
            value: input.to_string(),
            kind: input.kind(),
        }
    }
}

/// Result type alias for netspan operations
pub type Result<T> = std::result::Result<T, NetspanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NetspanError::InvalidAddress {
            value: "-3.14".to_string(),
            kind: InputKind::Text,
        };
        assert_eq!(
            format!("{}", err),
            "Input '-3.14' of type [text] could not be converted into an IP address"
        );

        let err = NetspanError::InvalidPrefix { prefix: 64, max: 32 };
        assert_eq!(
            format!("{}", err),
            "Prefix length 64 exceeds the maximum value of 32"
        );
    }

    #[test]
    fn test_version_mismatch_display() {
        let err = NetspanError::VersionMismatch {
            left: Version::V4,
            right: Version::V6,
        };
        assert!(err.to_string().contains("same version"));
        assert!(err.to_string().contains("IPv4"));
        assert!(err.to_string().contains("IPv6"));
    }

    #[test]
    fn test_invalid_bytes_report_kind() {
        let err = Address::parse(&[1u8, 2, 3][..]).unwrap_err();
        match err {
            NetspanError::InvalidAddress { value, kind } => {
                assert_eq!(kind, InputKind::Bytes);
                assert_eq!(value, "0x010203");
            }
            other => panic!("Expected InvalidAddress, got {:?}", other),
        }
    }

    #[test]
    fn test_result_type() {
        fn returns_result() -> Result<Address> {
            Address::parse("10.0.0.1")
        }

        let result = returns_result();
        assert!(result.is_ok());
        assert_eq!(result.unwrap().to_string(), "10.0.0.1");
    }
}
