//! Inputs accepted by the address parser
//!
//! [`AddressInput`] replaces "accept anything" constructors with a closed set
//! of typed variants. Any [`fmt::Display`] value can be turned into text input
//! with [`AddressInput::display`].

use std::borrow::Cow;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::{Address, Decimal};

/// Something an [`Address`] can be parsed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressInput<'a> {
    /// An already parsed address, copied as is
    Address(Address),
    /// Any of the textual encodings (literal, binary, hex, decimal)
    Text(Cow<'a, str>),
    /// A numeric value; below 2^32 it denotes IPv4, otherwise IPv6
    Integer(u128),
    /// Raw 4- or 16-byte canonical form
    Bytes(Cow<'a, [u8]>),
}

/// The detected type of an input, reported in parse errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    Address,
    Text,
    Integer,
    Bytes,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputKind::Address => "address",
            InputKind::Text => "text",
            InputKind::Integer => "integer",
            InputKind::Bytes => "bytes",
        };
        f.write_str(name)
    }
}

impl AddressInput<'_> {
    /// Render any displayable value once and use the result as text input.
    ///
    /// ```
    /// use netspan_core::{Address, AddressInput};
    ///
    /// struct Host(&'static str);
    ///
    /// impl std::fmt::Display for Host {
    ///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    ///         f.write_str(self.0)
    ///     }
    /// }
    ///
    /// let addr = Address::parse(AddressInput::display(&Host("192.168.65.174"))).unwrap();
    /// assert_eq!(addr.to_string(), "192.168.65.174");
    /// ```
    pub fn display<T: fmt::Display + ?Sized>(value: &T) -> AddressInput<'static> {
        AddressInput::Text(Cow::Owned(value.to_string()))
    }

    /// The detected type of this input
    pub fn kind(&self) -> InputKind {
        match self {
            AddressInput::Address(_) => InputKind::Address,
            AddressInput::Text(_) => InputKind::Text,
            AddressInput::Integer(_) => InputKind::Integer,
            AddressInput::Bytes(_) => InputKind::Bytes,
        }
    }

    /// The text of a [`AddressInput::Text`] input
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AddressInput::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for AddressInput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressInput::Address(addr) => write!(f, "{}", addr),
            AddressInput::Text(text) => f.write_str(text),
            AddressInput::Integer(value) => write!(f, "{}", value),
            AddressInput::Bytes(bytes) => {
                f.write_str("0x")?;
                for byte in bytes.iter() {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
        }
    }
}

impl From<Address> for AddressInput<'_> {
    fn from(value: Address) -> Self {
        AddressInput::Address(value)
    }
}

impl From<&Address> for AddressInput<'_> {
    fn from(value: &Address) -> Self {
        AddressInput::Address(*value)
    }
}

impl<'a> From<&'a str> for AddressInput<'a> {
    fn from(value: &'a str) -> Self {
        AddressInput::Text(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for AddressInput<'a> {
    fn from(value: &'a String) -> Self {
        AddressInput::Text(Cow::Borrowed(value.as_str()))
    }
}

impl From<String> for AddressInput<'_> {
    fn from(value: String) -> Self {
        AddressInput::Text(Cow::Owned(value))
    }
}

impl From<u32> for AddressInput<'_> {
    fn from(value: u32) -> Self {
        AddressInput::Integer(u128::from(value))
    }
}

impl From<u64> for AddressInput<'_> {
    fn from(value: u64) -> Self {
        AddressInput::Integer(u128::from(value))
    }
}

impl From<u128> for AddressInput<'_> {
    fn from(value: u128) -> Self {
        AddressInput::Integer(value)
    }
}

impl From<Decimal> for AddressInput<'_> {
    fn from(value: Decimal) -> Self {
        match value {
            Decimal::V4(value) => AddressInput::Integer(u128::from(value)),
            Decimal::V6(digits) => AddressInput::Text(Cow::Owned(digits)),
        }
    }
}

impl<'a> From<&'a Decimal> for AddressInput<'a> {
    fn from(value: &'a Decimal) -> Self {
        match value {
            Decimal::V4(value) => AddressInput::Integer(u128::from(*value)),
            Decimal::V6(digits) => AddressInput::Text(Cow::Borrowed(digits.as_str())),
        }
    }
}

impl<'a> From<&'a [u8]> for AddressInput<'a> {
    fn from(value: &'a [u8]) -> Self {
        AddressInput::Bytes(Cow::Borrowed(value))
    }
}

impl From<Vec<u8>> for AddressInput<'_> {
    fn from(value: Vec<u8>) -> Self {
        AddressInput::Bytes(Cow::Owned(value))
    }
}

impl From<[u8; 4]> for AddressInput<'_> {
    fn from(value: [u8; 4]) -> Self {
        AddressInput::Address(Address::V4(value))
    }
}

impl From<[u8; 16]> for AddressInput<'_> {
    fn from(value: [u8; 16]) -> Self {
        AddressInput::Address(Address::V6(value))
    }
}

impl From<Ipv4Addr> for AddressInput<'_> {
    fn from(value: Ipv4Addr) -> Self {
        AddressInput::Address(value.into())
    }
}

impl From<Ipv6Addr> for AddressInput<'_> {
    fn from(value: Ipv6Addr) -> Self {
        AddressInput::Address(value.into())
    }
}

impl From<IpAddr> for AddressInput<'_> {
    fn from(value: IpAddr) -> Self {
        AddressInput::Address(value.into())
    }
}
