//! CIDR operations example
//!
//! Run with: cargo run -p netspan-cidr --example cidr_operations

use netspan_cidr::{Address, Network, Range};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("netspan - CIDR Operations Example\n");

    let net = Network::parse("192.168.49.3/29")?;

    println!("CIDR: {}", "192.168.49.3/29");
    println!("─────────────────────────────");
    println!("Network:       {}", net.network());
    println!("Netmask:       {}", net.netmask());
    println!("Broadcast:     {}", net.broadcast());
    println!("Hosts:         {}", net.hosts());
    println!("Total IPs:     {}", net.count());
    println!("Prefix length: /{}", net.prefix_len());

    println!("\nChecking IP containment:");
    let inside = Address::parse("192.168.49.5")?;
    let outside = Address::parse("192.168.50.1")?;
    println!("{} in network? {}", inside, net.contains_address(&inside));
    println!("{} in network? {}", outside, net.contains_address(&outside));

    println!("\nFirst 5 IPs in network:");
    for (i, ip) in net.iter().take(5).enumerate() {
        println!("  {}: {}", i + 1, ip);
    }

    let range = Range::parse("192.168.31.240 - 192.168.35.193")?;
    println!("\nRange: {}", range);
    println!("─────────────────────────────");
    println!("Addresses:     {}", range.count());
    println!("Span network:  {}", range.span_network());
    println!("CIDR blocks:");
    for block in range.networks() {
        println!("  {}", block);
    }

    Ok(())
}
