use num_bigint::BigUint;
use num_traits::One;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use netspan_core::format;

use crate::range::AddressIter;
use crate::{
    host_mask, prefix_mask, Address, AddressInput, AddressSpan, NetspanError, Range, Result,
};

/// CIDR block representation
///
/// The base address never has host bits set and the netmask is always a run
/// of one bits followed by zero bits of the same version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Network {
    /// Network address (base IP)
    network: Address,
    /// Prefix length (0-32 or 0-128)
    prefix_len: u8,
    /// Network mask
    netmask: Address,
}

impl Network {
    /// Parse a CIDR literal or a bare address
    ///
    /// A bare address implies a single-address network (/32 or /128). Host
    /// bits in a CIDR literal are cleared rather than rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use netspan_cidr::Network;
    ///
    /// let net = Network::parse("10.0.0.7/8").unwrap();
    /// assert_eq!(net.prefix_len(), 8);
    /// assert_eq!(net.cidr(), "10.0.0.0/8");
    ///
    /// let host = Network::parse("2001:db8::1").unwrap();
    /// assert_eq!(host.prefix_len(), 128);
    /// ```
    pub fn parse<'a>(input: impl Into<AddressInput<'a>>) -> Result<Self> {
        let input = input.into();

        if let Some((addr, prefix)) = input.as_text().and_then(format::split_cidr) {
            let address = Address::parse(addr)?;
            // digits only, so overflow is the only failure
            let prefix = prefix.parse::<u32>().unwrap_or(u32::MAX);
            return Self::new(address, prefix);
        }

        let address = Address::parse(input)?;
        Ok(Self::from_parts(address, address.width()))
    }

    /// Create new CIDR from an address and prefix length
    ///
    /// # Arguments
    ///
    /// * `address` - Any address inside the block
    /// * `prefix_len` - Prefix length (0-32 for IPv4, 0-128 for IPv6)
    pub fn new(address: Address, prefix_len: u32) -> Result<Self> {
        let max = address.width();
        match u8::try_from(prefix_len) {
            Ok(prefix) if prefix <= max => Ok(Self::from_parts(address, prefix)),
            _ => Err(NetspanError::InvalidPrefix {
                prefix: prefix_len,
                max,
            }),
        }
    }

    pub(crate) fn from_parts(address: Address, prefix_len: u8) -> Self {
        debug_assert!(prefix_len <= address.width());
        let version = address.version();
        let mask = prefix_mask(version.width(), prefix_len);

        Self {
            network: Address::from_u128(version, address.to_u128() & mask),
            prefix_len,
            netmask: Address::from_u128(version, mask),
        }
    }

    /// Get network address
    pub fn network(&self) -> Address {
        self.network
    }

    /// Get network mask
    pub fn netmask(&self) -> Address {
        self.netmask
    }

    /// Get prefix length
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Get broadcast (last) address
    pub fn broadcast(&self) -> Address {
        let host = host_mask(self.network.width(), self.prefix_len);
        Address::from_u128(self.network.version(), self.network.to_u128() | host)
    }

    /// First address of the block, same as [`Network::network`]
    pub fn first(&self) -> Address {
        self.network
    }

    /// Last address of the block, same as [`Network::broadcast`]
    pub fn last(&self) -> Address {
        self.broadcast()
    }

    /// `<network>/<prefix>`
    pub fn cidr(&self) -> String {
        self.to_string()
    }

    /// Get total number of addresses in this block
    pub fn count(&self) -> BigUint {
        let host_bits = self.network.width() - self.prefix_len;
        match self.network {
            Address::V4(_) => BigUint::from(1u64 << host_bits),
            Address::V6(_) => BigUint::one() << usize::from(host_bits),
        }
    }

    /// Usable host addresses
    ///
    /// IPv4 blocks with more than two addresses exclude the network and
    /// broadcast addresses. A /31 keeps both addresses and a /32 its single
    /// address. IPv6 blocks are returned whole.
    pub fn hosts(&self) -> Range {
        let first = self.first();
        let last = self.last();

        match self.network {
            Address::V4(_) if self.prefix_len < 31 => {
                Range::from_ordered(first.next(), last.prev())
            }
            _ => Range::from_ordered(first, last),
        }
    }

    /// Single-element tiling containing this block
    pub fn networks(&self) -> Vec<Network> {
        vec![*self]
    }

    /// Check if an address is in this block
    ///
    /// Addresses of the other version are never contained.
    pub fn contains_address(&self, address: &Address) -> bool {
        address.version() == self.network.version()
            && address.to_u128() & self.netmask.to_u128() == self.network.to_u128()
    }

    /// Iterate over every address in the block
    ///
    /// Note: for large blocks (e.g., an IPv6 /64) this never realistically
    /// finishes; prefer [`Network::contains_address`] or [`Network::count`].
    pub fn iter(&self) -> AddressIter {
        AddressIter::new(self.first(), self.last())
    }
}

impl AddressSpan for Network {
    fn first(&self) -> Address {
        Network::first(self)
    }

    fn last(&self) -> Address {
        Network::last(self)
    }

    fn networks(&self) -> Vec<Network> {
        Network::networks(self)
    }

    fn count(&self) -> BigUint {
        Network::count(self)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix_len)
    }
}

impl FromStr for Network {
    type Err = NetspanError;

    fn from_str(s: &str) -> Result<Self> {
        Network::parse(s)
    }
}

impl TryFrom<String> for Network {
    type Error = NetspanError;

    fn try_from(value: String) -> Result<Self> {
        Network::parse(value)
    }
}

impl From<Network> for String {
    fn from(value: Network) -> Self {
        value.to_string()
    }
}

impl From<Address> for Network {
    fn from(value: Address) -> Self {
        Network::from_parts(value, value.width())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_network_from_cidr() {
        let net = Network::parse("192.168.49.3/29").unwrap();

        assert_eq!(net.count(), BigUint::from(8u32));
        assert_eq!(net.prefix_len(), 29);
        assert_eq!(net.cidr(), "192.168.49.0/29");
        assert_eq!(net.network().to_string(), "192.168.49.0");
        assert_eq!(net.broadcast().to_string(), "192.168.49.7");
        assert_eq!(net.netmask().to_string(), "255.255.255.248");
    }

    #[test]
    fn test_ipv6_network_from_cidr() {
        let net = Network::parse("2001:0db8:85a3:08d3:1319:8a2e:0370:7347/64").unwrap();

        assert_eq!(net.count().to_string(), "18446744073709551616");
        assert_eq!(net.prefix_len(), 64);
        assert_eq!(net.cidr(), "2001:db8:85a3:8d3::/64");
        assert_eq!(net.network().to_string(), "2001:db8:85a3:8d3::");
        assert_eq!(
            net.broadcast().to_string(),
            "2001:db8:85a3:8d3:ffff:ffff:ffff:ffff"
        );
        assert_eq!(net.netmask().to_string(), "ffff:ffff:ffff:ffff::");
    }

    #[test]
    fn test_network_from_ipv4() {
        let net = Network::parse("192.168.2.1").unwrap();

        assert_eq!(net.count(), BigUint::from(1u32));
        assert_eq!(net.prefix_len(), 32);
        assert_eq!(net.cidr(), "192.168.2.1/32");
        assert_eq!(net.broadcast().to_string(), "192.168.2.1");
        assert_eq!(net.netmask().to_string(), "255.255.255.255");
    }

    #[test]
    fn test_network_from_ipv6() {
        let net = Network::parse("2001:0db8:85a3:08d3:1319:8a2e:0370:7347").unwrap();

        assert_eq!(net.count(), BigUint::from(1u32));
        assert_eq!(net.prefix_len(), 128);
        assert_eq!(net.cidr(), "2001:db8:85a3:8d3:1319:8a2e:370:7347/128");
        assert_eq!(
            net.netmask().to_string(),
            "ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff"
        );
    }

    #[test]
    fn test_peer_network() {
        let net = Network::parse("192.168.2.1/31").unwrap();

        assert_eq!(net.count(), BigUint::from(2u32));
        assert_eq!(net.cidr(), "192.168.2.0/31");
        assert_eq!(net.broadcast().to_string(), "192.168.2.1");
        assert_eq!(net.netmask().to_string(), "255.255.255.254");

        let hosts = net.hosts();
        assert_eq!(hosts.count(), BigUint::from(2u32));
        assert_eq!(hosts.first().to_string(), "192.168.2.0");
        assert_eq!(hosts.last().to_string(), "192.168.2.1");
    }

    #[test]
    fn test_hosts_for_single_address() {
        let hosts = Network::parse("192.168.2.1/32").unwrap().hosts();
        assert_eq!(hosts.count(), BigUint::from(1u32));
        assert_eq!(hosts.first(), hosts.last());
    }

    #[test]
    fn test_ipv4_hosts() {
        let hosts = Network::parse("192.168.49.3/29").unwrap().hosts();

        assert_eq!(hosts.count(), BigUint::from(6u32));
        assert_eq!(hosts.first().to_string(), "192.168.49.1");
        assert_eq!(hosts.last().to_string(), "192.168.49.6");
    }

    #[test]
    fn test_ipv6_hosts() {
        let hosts = Network::parse("2001:db8:85a3:8d3::/64").unwrap().hosts();

        assert_eq!(hosts.count().to_string(), "18446744073709551616");
        assert_eq!(hosts.first().to_string(), "2001:db8:85a3:8d3::");
        assert_eq!(
            hosts.last().to_string(),
            "2001:db8:85a3:8d3:ffff:ffff:ffff:ffff"
        );
    }

    #[test]
    fn test_copy_and_display_input() {
        let src = Network::parse("192.168.49.3/29").unwrap();
        let copy = src;
        assert_eq!(copy.cidr(), "192.168.49.0/29");

        let reparsed = Network::parse(AddressInput::display(&src)).unwrap();
        assert_eq!(reparsed, src);
    }

    #[test]
    fn test_invalid_networks_fail() {
        assert!(matches!(
            Network::parse("192.168.31.240 - 192.168.35.193"),
            Err(NetspanError::InvalidAddress { .. })
        ));
        assert_eq!(
            Network::parse("192.168.49.3/64"),
            Err(NetspanError::InvalidPrefix { prefix: 64, max: 32 })
        );
        assert_eq!(
            Network::parse("::1/129"),
            Err(NetspanError::InvalidPrefix {
                prefix: 129,
                max: 128
            })
        );
        assert!(Network::parse("10.0.0.0/99999999999").is_err());
    }

    #[test]
    fn test_networks_is_self() {
        let net = Network::parse("192.168.49.3/29").unwrap();
        let list = net.networks();

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].to_string(), "192.168.49.0/29");
    }

    #[test]
    fn test_zero_prefix() {
        let net = Network::parse("10.1.2.3/0").unwrap();
        assert_eq!(net.cidr(), "0.0.0.0/0");
        assert_eq!(net.count(), BigUint::from(1u64 << 32));
        assert_eq!(net.broadcast().to_string(), "255.255.255.255");

        let net = Network::parse("::/0").unwrap();
        assert_eq!(
            net.count().to_string(),
            "340282366920938463463374607431768211456"
        );
    }

    #[test]
    fn test_mask_invariants() {
        for prefix in 0..=32u32 {
            let net = Network::new(Address::parse("203.0.113.77").unwrap(), prefix).unwrap();
            let network = net.network().to_u128();
            let mask = net.netmask().to_u128();
            assert_eq!(network & mask, network);
            assert_eq!(mask.count_ones(), prefix);
            assert_eq!(
                net.netmask().to_binary_string().trim_end_matches('0').len(),
                prefix as usize
            );
        }
    }

    #[test]
    fn test_contains_address() {
        let net = Network::parse("192.168.1.0/24").unwrap();
        assert!(net.contains_address(&Address::parse("192.168.1.0").unwrap()));
        assert!(net.contains_address(&Address::parse("192.168.1.255").unwrap()));
        assert!(!net.contains_address(&Address::parse("192.168.0.1").unwrap()));
        assert!(!net.contains_address(&Address::parse("::c0a8:101").unwrap()));
    }

    #[test]
    fn test_iterator_small() {
        let net = Network::parse("192.168.1.0/30").unwrap();
        let ips: Vec<String> = net.iter().map(|ip| ip.to_string()).collect();
        assert_eq!(
            ips,
            ["192.168.1.0", "192.168.1.1", "192.168.1.2", "192.168.1.3"]
        );
    }

    #[test]
    fn test_serde_as_cidr() {
        let net = Network::parse("192.168.49.3/29").unwrap();
        let json = serde_json::to_string(&net).expect("serialization failed");
        assert_eq!(json, "\"192.168.49.0/29\"");

        let back: Network = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(back, net);
    }
}
