//! CIDR networks and address ranges
//!
//! Provides the two span types built on [`netspan_core::Address`]:
//! - [`Network`] - a CIDR block (base address + prefix length)
//! - [`Range`] - an arbitrary inclusive interval of addresses
//! - minimal CIDR decomposition of a range ([`Range::networks`])
//! - the smallest single block covering a range ([`Range::span_network`])
//!
//! # Examples
//!
//! ```
//! use netspan_cidr::{Network, Range};
//!
//! let net = Network::parse("192.168.49.3/29").unwrap();
//! assert_eq!(net.to_string(), "192.168.49.0/29");
//! assert_eq!(net.broadcast().to_string(), "192.168.49.7");
//!
//! let range = Range::parse("192.168.31.240 - 192.168.35.193").unwrap();
//! assert_eq!(range.networks().len(), 6);
//! assert_eq!(range.span_network().to_string(), "192.168.0.0/18");
//! assert!(range.contains(&Range::parse("192.168.32.94 - 192.168.33.43").unwrap()));
//! ```

use num_bigint::BigUint;

pub use netspan_core::{Address, AddressInput, Decimal, NetspanError, Result, Version};

mod network;
mod range;

pub use network::Network;
pub use range::{AddressIter, Range, RangeBounds};

/// Anything that covers a contiguous, same-version run of addresses
///
/// Implemented by [`Address`] (a one-address span), [`Network`] and [`Range`].
pub trait AddressSpan {
    /// Lowest address of the span
    fn first(&self) -> Address;

    /// Highest address of the span
    fn last(&self) -> Address;

    /// CIDR blocks that exactly tile the span
    fn networks(&self) -> Vec<Network>;

    /// Number of addresses in the span
    fn count(&self) -> BigUint {
        BigUint::from(self.last().to_u128() - self.first().to_u128()) + 1u32
    }

    /// The span as a plain [`Range`]
    fn to_range(&self) -> Range {
        Range::from_ordered(self.first(), self.last())
    }
}

impl AddressSpan for Address {
    fn first(&self) -> Address {
        *self
    }

    fn last(&self) -> Address {
        *self
    }

    fn networks(&self) -> Vec<Network> {
        vec![Network::from_parts(*self, self.width())]
    }
}

/// Mask with the low `width - prefix` bits set
pub(crate) fn host_mask(width: u8, prefix: u8) -> u128 {
    debug_assert!(prefix <= width);
    let host_bits = u32::from(width - prefix);
    u128::MAX.checked_shr(128 - host_bits).unwrap_or(0)
}

/// Mask with the high `prefix` bits of a `width`-bit value set
pub(crate) fn prefix_mask(width: u8, prefix: u8) -> u128 {
    let all = u128::MAX.checked_shr(128 - u32::from(width)).unwrap_or(0);
    all & !host_mask(width, prefix)
}
