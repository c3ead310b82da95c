use netspan_cidr::{Address, AddressSpan, Network, Range, Version};
use num_bigint::BigUint;

/// Deterministic pseudo-random values (64-bit LCG)
struct Lcg(u64);

impl Lcg {
    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn next_u128(&mut self) -> u128 {
        (u128::from(self.next_u64()) << 64) | u128::from(self.next_u64())
    }
}

/// Reference tiling: repeatedly take the largest aligned block that fits.
fn reference_tiling(first: u128, last: u128, width: u8) -> Vec<(u128, u8)> {
    let mut out = Vec::new();
    let mut start = first;

    loop {
        let mut prefix = width;
        while prefix > 0 {
            let host_bits = u32::from(width - prefix + 1);
            let size_mask = u128::MAX.checked_shr(128 - host_bits).unwrap_or(0);
            if start & size_mask != 0 || start | size_mask > last {
                break;
            }
            prefix -= 1;
        }

        let host_bits = u32::from(width - prefix);
        let end = start | u128::MAX.checked_shr(128 - host_bits).unwrap_or(0);
        out.push((start, prefix));
        if end == last {
            break;
        }
        start = end + 1;
    }

    out
}

fn assert_exact_tiling(range: &Range) {
    let nets = range.networks();
    let version = range.first().version();
    let width = version.width();

    // contiguous, in order, starting and ending on the range bounds
    assert_eq!(nets[0].first(), range.first(), "{}", range);
    assert_eq!(nets[nets.len() - 1].last(), range.last(), "{}", range);
    for pair in nets.windows(2) {
        assert_eq!(pair[0].last().next(), pair[1].first(), "{}", range);
    }

    // counts add up
    let total = nets
        .iter()
        .fold(BigUint::from(0u32), |acc, net| acc + net.count());
    assert_eq!(total, range.count(), "{}", range);

    // every block is inside the span network
    let span = range.span_network();
    for net in &nets {
        assert!(span.contains_address(&net.first()), "{} in {}", net, span);
        assert!(span.contains_address(&net.last()), "{} in {}", net, span);
    }

    // same blocks as the reference construction
    let (first, last) = (range.first().to_u128(), range.last().to_u128());
    let expected: Vec<Network> = reference_tiling(first, last, width)
        .into_iter()
        .map(|(start, prefix)| {
            Network::new(Address::from_u128(version, start), u32::from(prefix)).unwrap()
        })
        .collect();
    assert_eq!(nets, expected, "{}", range);
}

#[test]
fn test_documented_decomposition() {
    let range = Range::parse("192.168.31.240 - 192.168.35.193").unwrap();
    let cidrs: Vec<String> = range.networks().iter().map(|n| n.cidr()).collect();

    assert_eq!(
        cidrs,
        [
            "192.168.31.240/28",
            "192.168.32.0/23",
            "192.168.34.0/24",
            "192.168.35.0/25",
            "192.168.35.128/26",
            "192.168.35.192/31",
        ]
    );
    assert_exact_tiling(&range);
}

#[test]
fn test_random_ipv4_ranges_tile_exactly() {
    let mut rng = Lcg(0x5eed);

    for _ in 0..500 {
        let a = rng.next_u64() as u32;
        let b = rng.next_u64() as u32;
        let range = Range::new(a, b).unwrap();
        assert_exact_tiling(&range);
    }
}

#[test]
fn test_small_ipv4_ranges_tile_exactly() {
    let mut rng = Lcg(42);

    for _ in 0..500 {
        let a = rng.next_u64() as u32;
        let len = (rng.next_u64() % 1024) as u32;
        let range = Range::new(a, a.saturating_add(len)).unwrap();
        assert_exact_tiling(&range);
    }
}

#[test]
fn test_random_ipv6_ranges_tile_exactly() {
    let mut rng = Lcg(0xfeed);

    for _ in 0..200 {
        let a = Address::from_u128(Version::V6, rng.next_u128());
        let b = Address::from_u128(Version::V6, rng.next_u128());
        let range = Range::from_addresses(a, b).unwrap();
        assert_exact_tiling(&range);
    }
}

#[test]
fn test_network_ranges_tile_as_themselves() {
    for cidr in ["10.0.0.0/8", "192.168.49.3/29", "2001:db8::/32", "0.0.0.0/0", "::/0"] {
        let net = Network::parse(cidr).unwrap();
        let range = Range::from(net);
        assert_eq!(range.networks(), vec![net]);
        assert_eq!(range.span_network(), net);
    }
}

#[test]
fn test_address_round_trips() {
    let mut rng = Lcg(7);

    for _ in 0..200 {
        let v4 = Address::from_u128(Version::V4, u128::from(rng.next_u64() as u32));
        let v6 = Address::from_u128(Version::V6, rng.next_u128());

        for addr in [v4, v6] {
            assert_eq!(Address::parse(addr.to_string()).unwrap(), addr);
            assert_eq!(Address::parse(addr.to_binary_string()).unwrap(), addr);
            assert_eq!(Address::parse(addr.to_hex()).unwrap(), addr);
            assert_eq!(Address::parse(addr.as_bytes()).unwrap(), addr);
            assert_eq!(Address::parse(addr.to_decimal()).unwrap(), addr);
        }
    }
}

#[test]
fn test_ordering_is_total_per_version() {
    let mut rng = Lcg(99);

    for _ in 0..200 {
        let a = Address::from_u128(Version::V6, rng.next_u128());
        let b = Address::from_u128(Version::V6, rng.next_u128());
        let c = Address::from_u128(Version::V6, rng.next_u128());

        let holds = [a.less_than(&b), a == b, a.greater_than(&b)];
        assert_eq!(holds.iter().filter(|h| **h).count(), 1);
        assert_eq!(a.less_than(&b), a.to_u128() < b.to_u128());

        if a.less_than(&b) && b.less_than(&c) {
            assert!(a.less_than(&c));
        }

        assert_eq!(a.next().prev(), a);
        assert_eq!(a.prev().next(), a);
    }
}

#[test]
fn test_hosts_are_contained_in_network() {
    for cidr in ["192.168.49.3/29", "192.168.2.1/31", "192.168.2.1/32", "2001:db8::/64"] {
        let net = Network::parse(cidr).unwrap();
        let hosts = net.hosts();
        assert!(net.to_range().contains(&hosts), "{}", cidr);
    }
}
