//! Canonical IPv4 / IPv6 address value
//!
//! An [`Address`] is exactly 4 or 16 bytes in network byte order. Every other
//! representation (text, bit string, hex, decimal) is derived from the bytes.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use tracing::trace;

use crate::format::{self, Recognized};
use crate::{AddressInput, NetspanError, Result};

/// IP protocol version, derived from the address length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Version {
    /// 4-byte addresses
    V4,
    /// 16-byte addresses
    V6,
}

impl Version {
    /// Address width in bits (32 or 128)
    pub fn width(self) -> u8 {
        match self {
            Version::V4 => 32,
            Version::V6 => 128,
        }
    }

    /// Protocol number (4 or 6)
    pub fn number(self) -> u8 {
        match self {
            Version::V4 => 4,
            Version::V6 => 6,
        }
    }

    /// Largest value an address of this version can hold
    pub fn max_value(self) -> u128 {
        match self {
            Version::V4 => u128::from(u32::MAX),
            Version::V6 => u128::MAX,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IPv{}", self.number())
    }
}

/// A single IP address in canonical fixed-width form
///
/// Equality compares bytes, so addresses of different versions are never
/// equal. Ordering is only defined between addresses of the same version:
/// `partial_cmp` returns `None` across versions.
///
/// # Examples
///
/// ```
/// use netspan_core::Address;
///
/// let a = Address::parse("192.168.9.103").unwrap();
/// assert_eq!(a.next().to_string(), "192.168.9.104");
/// assert_eq!(a.to_decimal().to_string(), "3232237927");
///
/// let b = Address::parse("0xc0a80967").unwrap();
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Address {
    /// IPv4 address bytes
    V4([u8; 4]),
    /// IPv6 address bytes
    V6([u8; 16]),
}

impl Address {
    /// Parse any supported input into an address.
    ///
    /// Text is checked against the encodings in [`crate::format`]; integers
    /// below 2^32 are IPv4 and all larger integers are IPv6; raw bytes must be
    /// exactly 4 or 16 long.
    ///
    /// # Examples
    ///
    /// ```
    /// use netspan_core::{Address, Version};
    ///
    /// assert_eq!(Address::parse(197394567u32).unwrap().version(), Version::V4);
    /// assert_eq!(Address::parse("197394567").unwrap().version(), Version::V6);
    /// assert_eq!(Address::parse(4294967297u64).unwrap().version(), Version::V6);
    /// ```
    pub fn parse<'a>(input: impl Into<AddressInput<'a>>) -> Result<Self> {
        let input = input.into();
        let parsed = match &input {
            AddressInput::Address(addr) => Some(*addr),
            AddressInput::Text(text) => Self::from_text(text),
            AddressInput::Integer(value) => Some(Self::from_integer(*value)),
            AddressInput::Bytes(bytes) => Self::from_slice(bytes),
        };

        parsed.ok_or_else(|| NetspanError::invalid_address(&input))
    }

    /// Address from a numeric value; below 2^32 it is IPv4, otherwise IPv6.
    pub fn from_integer(value: u128) -> Self {
        match u32::try_from(value) {
            Ok(v4) => Address::V4(v4.to_be_bytes()),
            Err(_) => Address::V6(value.to_be_bytes()),
        }
    }

    /// Address of the given version holding `value`.
    ///
    /// Bits above the version's width are discarded.
    pub fn from_u128(version: Version, value: u128) -> Self {
        match version {
            Version::V4 => Address::V4((value as u32).to_be_bytes()),
            Version::V6 => Address::V6(value.to_be_bytes()),
        }
    }

    /// Address from raw canonical bytes (length 4 or 16).
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if let Ok(v4) = <[u8; 4]>::try_from(bytes) {
            return Some(Address::V4(v4));
        }
        <[u8; 16]>::try_from(bytes).ok().map(Address::V6)
    }

    fn from_text(text: &str) -> Option<Self> {
        let recognized = format::recognize(text)?;
        trace!(input = text, format = ?recognized.format(), "recognized address text");

        match recognized {
            Recognized::DottedQuad(ip) => Some(ip.into()),
            Recognized::Literal(ip) => Some(ip.into()),
            Recognized::Binary(bits) => {
                let bytes: Vec<u8> = bits
                    .as_bytes()
                    .chunks(8)
                    .map(|chunk| {
                        chunk
                            .iter()
                            .fold(0u8, |acc, bit| (acc << 1) | (bit - b'0'))
                    })
                    .collect();
                Self::from_slice(&bytes)
            }
            Recognized::Hex(digits) => {
                let bytes = (0..digits.len())
                    .step_by(2)
                    .map(|i| u8::from_str_radix(&digits[i..i + 2], 16).ok())
                    .collect::<Option<Vec<u8>>>()?;
                Self::from_slice(&bytes)
            }
            Recognized::Decimal(digits) => digits
                .parse::<u128>()
                .ok()
                .map(|value| Address::V6(value.to_be_bytes())),
        }
    }

    /// Smallest address of a version (all zero bits)
    pub fn min_value(version: Version) -> Self {
        Self::from_u128(version, 0)
    }

    /// Largest address of a version (all one bits)
    pub fn max_value(version: Version) -> Self {
        Self::from_u128(version, version.max_value())
    }

    /// Version derived from the byte length
    pub fn version(&self) -> Version {
        match self {
            Address::V4(_) => Version::V4,
            Address::V6(_) => Version::V6,
        }
    }

    /// Width in bits (32 or 128)
    pub fn width(&self) -> u8 {
        self.version().width()
    }

    /// Raw bytes, most significant first
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Address::V4(bytes) => bytes,
            Address::V6(bytes) => bytes,
        }
    }

    /// Big-endian numeric value, widened to 128 bits
    pub fn to_u128(&self) -> u128 {
        match self {
            Address::V4(bytes) => u128::from(u32::from_be_bytes(*bytes)),
            Address::V6(bytes) => u128::from_be_bytes(*bytes),
        }
    }

    /// Convert to the standard library representation
    pub fn to_ip_addr(&self) -> IpAddr {
        match self {
            Address::V4(bytes) => IpAddr::V4(Ipv4Addr::from(*bytes)),
            Address::V6(bytes) => IpAddr::V6(Ipv6Addr::from(*bytes)),
        }
    }

    /// Each byte as 8 binary digits, most significant bit first
    pub fn to_binary_string(&self) -> String {
        self.as_bytes().iter().map(|b| format!("{:08b}", b)).collect()
    }

    /// Lower-case hex, two digits per byte
    pub fn to_hex(&self) -> String {
        self.as_bytes().iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Base-10 value of the big-endian bytes
    ///
    /// IPv4 stays numeric and IPv6 becomes a digit string, so parsing the
    /// result yields this address again.
    pub fn to_decimal(&self) -> Decimal {
        match self {
            Address::V4(bytes) => Decimal::V4(u32::from_be_bytes(*bytes)),
            Address::V6(bytes) => Decimal::V6(
                bytes
                    .iter()
                    .fold(0u128, |acc, byte| (acc << 8) | u128::from(*byte))
                    .to_string(),
            ),
        }
    }

    /// Compare two addresses of the same version.
    ///
    /// Fails with [`NetspanError::VersionMismatch`] across versions.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering> {
        self.partial_cmp(other)
            .ok_or(NetspanError::VersionMismatch {
                left: self.version(),
                right: other.version(),
            })
    }

    /// Same version and strictly greater
    pub fn greater_than(&self, other: &Self) -> bool {
        self > other
    }

    /// Same version and strictly smaller
    pub fn less_than(&self, other: &Self) -> bool {
        self < other
    }

    /// The following address; the maximum address wraps to zero.
    pub fn next(&self) -> Self {
        Self::from_u128(self.version(), self.to_u128().wrapping_add(1))
    }

    /// The preceding address; zero wraps to the maximum address.
    pub fn prev(&self) -> Self {
        Self::from_u128(self.version(), self.to_u128().wrapping_sub(1))
    }

    /// Number of trailing zero bits, bounded by the width
    pub fn trailing_zeros(&self) -> u32 {
        match self {
            Address::V4(bytes) => u32::from_be_bytes(*bytes).trailing_zeros(),
            Address::V6(bytes) => u128::from_be_bytes(*bytes).trailing_zeros(),
        }
    }
}

impl PartialOrd for Address {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Address::V4(a), Address::V4(b)) => Some(a.cmp(b)),
            (Address::V6(a), Address::V6(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Decimal form of an [`Address`]
///
/// A bare digit string always parses as IPv6, so IPv4 values are kept as
/// integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Decimal {
    V4(u32),
    V6(String),
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decimal::V4(value) => write!(f, "{}", value),
            Decimal::V6(digits) => f.write_str(digits),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ip_addr())
    }
}

impl FromStr for Address {
    type Err = NetspanError;

    fn from_str(s: &str) -> Result<Self> {
        Address::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = NetspanError;

    fn try_from(value: String) -> Result<Self> {
        Address::parse(value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_string()
    }
}

impl From<Ipv4Addr> for Address {
    fn from(value: Ipv4Addr) -> Self {
        Address::V4(value.octets())
    }
}

impl From<Ipv6Addr> for Address {
    fn from(value: Ipv6Addr) -> Self {
        Address::V6(value.octets())
    }
}

impl From<IpAddr> for Address {
    fn from(value: IpAddr) -> Self {
        match value {
            IpAddr::V4(v4) => v4.into(),
            IpAddr::V6(v6) => v6.into(),
        }
    }
}

impl From<Address> for IpAddr {
    fn from(value: Address) -> Self {
        value.to_ip_addr()
    }
}
