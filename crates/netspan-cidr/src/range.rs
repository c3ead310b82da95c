use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

use netspan_core::format;

use crate::{host_mask, Address, AddressInput, AddressSpan, NetspanError, Network, Result};

/// Inclusive interval of same-version addresses
///
/// `first <= last` always holds; constructors swap reversed endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RangeBounds", into = "RangeBounds")]
pub struct Range {
    first: Address,
    last: Address,
}

/// Serialized form of a [`Range`]: `{"first": "...", "last": "..."}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeBounds {
    pub first: Address,
    pub last: Address,
}

impl Range {
    /// Parse a range expression
    ///
    /// Accepts `"A - B"`, a CIDR literal (expanded to its first and last
    /// address) or a single address (a one-address range).
    ///
    /// # Examples
    ///
    /// ```
    /// use netspan_cidr::Range;
    ///
    /// let range = Range::parse("192.168.35.193 - 192.168.31.240").unwrap();
    /// assert_eq!(range.to_string(), "192.168.31.240 - 192.168.35.193");
    ///
    /// let range = Range::parse("192.168.49.3/29").unwrap();
    /// assert_eq!(range.count().to_string(), "8");
    /// ```
    pub fn parse<'a>(input: impl Into<AddressInput<'a>>) -> Result<Self> {
        let input = input.into();

        if let Some(text) = input.as_text() {
            if let Some((first, last)) = format::split_range(text) {
                return Self::new(first, last);
            }
            if format::split_cidr(text).is_some() {
                return Network::parse(text).map(Range::from);
            }
        }

        let address = Address::parse(input)?;
        Ok(Self::from_ordered(address, address))
    }

    /// Range between two addresses, in either order
    ///
    /// Fails with [`NetspanError::VersionMismatch`] when the addresses are of
    /// different versions.
    pub fn new<'a, 'b>(
        first: impl Into<AddressInput<'a>>,
        last: impl Into<AddressInput<'b>>,
    ) -> Result<Self> {
        Self::from_addresses(Address::parse(first)?, Address::parse(last)?)
    }

    /// Range between two parsed addresses, in either order
    pub fn from_addresses(first: Address, last: Address) -> Result<Self> {
        match first.try_cmp(&last)? {
            Ordering::Greater => Ok(Self::from_ordered(last, first)),
            _ => Ok(Self::from_ordered(first, last)),
        }
    }

    pub(crate) fn from_ordered(first: Address, last: Address) -> Self {
        debug_assert!(first <= last);
        Self { first, last }
    }

    /// Start address of the range
    pub fn first(&self) -> Address {
        self.first
    }

    /// End address of the range
    pub fn last(&self) -> Address {
        self.last
    }

    /// Number of addresses in the range
    pub fn count(&self) -> BigUint {
        BigUint::from(self.last.to_u128() - self.first.to_u128()) + 1u32
    }

    /// Test if an address, network or range lies within this range
    ///
    /// A span of the other IP version is never contained.
    pub fn contains<S: AddressSpan + ?Sized>(&self, other: &S) -> bool {
        other.first() >= self.first && other.last() <= self.last
    }

    /// Parse `input` as a range expression and test containment
    ///
    /// Parse errors propagate; a version mismatch with `self` yields `false`.
    pub fn contains_input<'a>(&self, input: impl Into<AddressInput<'a>>) -> Result<bool> {
        Range::parse(input).map(|other| self.contains(&other))
    }

    /// Smallest single CIDR block that contains the whole range
    ///
    /// The prefix is the number of leading bits `first` and `last` share.
    pub fn span_network(&self) -> Network {
        let width = self.first.width();
        let diff = self.first.to_u128() ^ self.last.to_u128();
        // to_u128 widens IPv4 values, so discount the unused high bits
        let shared = diff.leading_zeros() - (128 - u32::from(width));

        Network::from_parts(self.first, shared as u8)
    }

    /// Minimal ordered list of CIDR blocks whose union is exactly this range
    ///
    /// # Examples
    ///
    /// ```
    /// use netspan_cidr::Range;
    ///
    /// let range = Range::new("10.0.0.1", "10.0.0.6").unwrap();
    /// let cidrs: Vec<String> = range.networks().iter().map(|n| n.to_string()).collect();
    /// assert_eq!(cidrs, ["10.0.0.1/32", "10.0.0.2/31", "10.0.0.4/31", "10.0.0.6/32"]);
    /// ```
    pub fn networks(&self) -> Vec<Network> {
        let version = self.first.version();
        let width = version.width();
        let span_prefix = self.span_network().prefix_len();
        let last = self.last.to_u128();

        let mut out = Vec::new();
        let mut cursor = self.first;

        loop {
            let start = cursor.to_u128();
            let mut prefix = span_prefix.max(width - cursor.trailing_zeros() as u8);

            while start | host_mask(width, prefix) > last {
                prefix += 1;
            }

            let block_last = start | host_mask(width, prefix);
            let block = Network::from_parts(cursor, prefix);
            trace!(block = %block, "emitting block");
            out.push(block);

            // block_last never exceeds last, and the top of the space is
            // always a range's last address
            if block_last == last {
                break;
            }
            cursor = Address::from_u128(version, block_last + 1);
        }

        debug!(range = %self, blocks = out.len(), "decomposed range");
        out
    }

    /// Iterate over every address in the range
    ///
    /// Note: IPv6 ranges can be far too large to walk.
    pub fn addresses(&self) -> AddressIter {
        AddressIter::new(self.first, self.last)
    }
}

impl AddressSpan for Range {
    fn first(&self) -> Address {
        self.first
    }

    fn last(&self) -> Address {
        self.last
    }

    fn networks(&self) -> Vec<Network> {
        Range::networks(self)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.first, self.last)
    }
}

impl FromStr for Range {
    type Err = NetspanError;

    fn from_str(s: &str) -> Result<Self> {
        Range::parse(s)
    }
}

impl From<Network> for Range {
    fn from(value: Network) -> Self {
        Range::from_ordered(value.first(), value.last())
    }
}

impl From<Address> for Range {
    fn from(value: Address) -> Self {
        Range::from_ordered(value, value)
    }
}

impl TryFrom<RangeBounds> for Range {
    type Error = NetspanError;

    fn try_from(value: RangeBounds) -> Result<Self> {
        Range::from_addresses(value.first, value.last)
    }
}

impl From<Range> for RangeBounds {
    fn from(value: Range) -> Self {
        RangeBounds {
            first: value.first,
            last: value.last,
        }
    }
}

/// Iterator over consecutive addresses, both ends inclusive
#[derive(Debug, Clone)]
pub struct AddressIter {
    current: Option<Address>,
    end: Address,
}

impl AddressIter {
    pub(crate) fn new(start: Address, end: Address) -> Self {
        Self {
            current: Some(start),
            end,
        }
    }
}

impl Iterator for AddressIter {
    type Item = Address;

    fn next(&mut self) -> Option<Self::Item> {
        let ip = self.current?;
        self.current = if ip == self.end { None } else { Some(ip.next()) };
        Some(ip)
    }
}
