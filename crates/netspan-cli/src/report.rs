//! Serializable command results and their human / CSV renderings

use colored::Colorize;
use netspan_cidr::{Address, Network, Range};
use serde::Serialize;

/// A command result that every output format can render
pub trait Report: Serialize {
    /// Column names for CSV output
    fn csv_header() -> &'static [&'static str];

    /// One CSV record, in [`Report::csv_header`] order
    fn csv_record(&self) -> Vec<String>;

    /// Human-readable rendering to stdout
    fn print_human(&self);
}

fn field(name: &str, value: impl std::fmt::Display) {
    println!("{:>15}: {}", name.bold(), value);
}

fn title(text: &str) {
    println!();
    println!("{}", text.bold().cyan());
    println!("{}", "─".repeat(50).dimmed());
}

/// Every representation of a single address
#[derive(Debug, Clone, Serialize)]
pub struct AddressReport {
    pub input: String,
    pub version: String,
    pub address: Address,
    pub binary: String,
    pub hex: String,
    pub decimal: String,
}

impl AddressReport {
    pub fn new(input: &str, address: Address) -> Self {
        Self {
            input: input.to_string(),
            version: address.version().to_string(),
            address,
            binary: address.to_binary_string(),
            hex: address.to_hex(),
            decimal: address.to_decimal().to_string(),
        }
    }
}

impl Report for AddressReport {
    fn csv_header() -> &'static [&'static str] {
        &["input", "version", "address", "binary", "hex", "decimal"]
    }

    fn csv_record(&self) -> Vec<String> {
        vec![
            self.input.clone(),
            self.version.clone(),
            self.address.to_string(),
            self.binary.clone(),
            self.hex.clone(),
            self.decimal.clone(),
        ]
    }

    fn print_human(&self) {
        title("Address");
        field("Input", &self.input);
        field("Version", &self.version);
        field("Address", self.address.to_string().green());
        field("Binary", &self.binary);
        field("Hex", &self.hex);
        field("Decimal", &self.decimal);
        println!();
    }
}

/// Properties of a CIDR block
#[derive(Debug, Clone, Serialize)]
pub struct NetworkReport {
    pub cidr: Network,
    pub version: String,
    pub network: Address,
    pub netmask: Address,
    pub broadcast: Address,
    pub prefix_len: u8,
    pub count: String,
    pub hosts: Range,
}

impl From<Network> for NetworkReport {
    fn from(net: Network) -> Self {
        Self {
            cidr: net,
            version: net.network().version().to_string(),
            network: net.network(),
            netmask: net.netmask(),
            broadcast: net.broadcast(),
            prefix_len: net.prefix_len(),
            count: net.count().to_string(),
            hosts: net.hosts(),
        }
    }
}

impl Report for NetworkReport {
    fn csv_header() -> &'static [&'static str] {
        &[
            "cidr",
            "version",
            "network",
            "netmask",
            "broadcast",
            "prefix_len",
            "count",
            "hosts",
        ]
    }

    fn csv_record(&self) -> Vec<String> {
        vec![
            self.cidr.to_string(),
            self.version.clone(),
            self.network.to_string(),
            self.netmask.to_string(),
            self.broadcast.to_string(),
            self.prefix_len.to_string(),
            self.count.clone(),
            self.hosts.to_string(),
        ]
    }

    fn print_human(&self) {
        title("Network");
        field("CIDR", self.cidr.to_string().green());
        field("Version", &self.version);
        field("Network", self.network);
        field("Netmask", self.netmask);
        field("Broadcast", self.broadcast);
        field("Prefix length", format!("/{}", self.prefix_len));
        field("Addresses", &self.count);
        field("Hosts", self.hosts);
        println!();
    }
}

/// Bounds, size and CIDR tiling of a range
#[derive(Debug, Clone, Serialize)]
pub struct RangeReport {
    pub first: Address,
    pub last: Address,
    pub version: String,
    pub count: String,
    pub span: Network,
    pub networks: Vec<Network>,
}

impl From<Range> for RangeReport {
    fn from(range: Range) -> Self {
        Self {
            first: range.first(),
            last: range.last(),
            version: range.first().version().to_string(),
            count: range.count().to_string(),
            span: range.span_network(),
            networks: range.networks(),
        }
    }
}

impl RangeReport {
    fn networks_joined(&self) -> String {
        self.networks
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Report for RangeReport {
    fn csv_header() -> &'static [&'static str] {
        &["first", "last", "version", "count", "span", "networks"]
    }

    fn csv_record(&self) -> Vec<String> {
        vec![
            self.first.to_string(),
            self.last.to_string(),
            self.version.clone(),
            self.count.clone(),
            self.span.to_string(),
            self.networks_joined(),
        ]
    }

    fn print_human(&self) {
        title("Range");
        field("First", self.first.to_string().green());
        field("Last", self.last.to_string().green());
        field("Version", &self.version);
        field("Addresses", &self.count);
        field("Span network", self.span);
        field("Blocks", self.networks.len());
        for net in &self.networks {
            println!("{:>15}  {}", "", net);
        }
        println!();
    }
}

/// Outcome of a containment test
#[derive(Debug, Clone, Serialize)]
pub struct ContainsReport {
    pub range: Range,
    pub other: String,
    pub contained: bool,
}

impl Report for ContainsReport {
    fn csv_header() -> &'static [&'static str] {
        &["range", "other", "contained"]
    }

    fn csv_record(&self) -> Vec<String> {
        vec![
            self.range.to_string(),
            self.other.clone(),
            self.contained.to_string(),
        ]
    }

    fn print_human(&self) {
        let verdict = if self.contained {
            "yes".green()
        } else {
            "no".red()
        };
        title("Containment");
        field("Range", self.range);
        field("Other", &self.other);
        field("Contained", verdict);
        println!();
    }
}

/// One line of batch output: the decomposed range or the line's error
#[derive(Debug, Clone, Serialize)]
pub struct BatchRow {
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Report for BatchRow {
    fn csv_header() -> &'static [&'static str] {
        &["input", "first", "last", "count", "span", "networks", "error"]
    }

    fn csv_record(&self) -> Vec<String> {
        match &self.range {
            Some(r) => vec![
                self.input.clone(),
                r.first.to_string(),
                r.last.to_string(),
                r.count.clone(),
                r.span.to_string(),
                r.networks_joined(),
                String::new(),
            ],
            None => vec![
                self.input.clone(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                self.error.clone().unwrap_or_default(),
            ],
        }
    }

    fn print_human(&self) {
        match (&self.range, &self.error) {
            (Some(r), _) => println!("{} {} => {}", "✓".green(), self.input, r.networks_joined()),
            (None, Some(e)) => println!("{} {}: {}", "✗".red(), self.input, e.red()),
            (None, None) => println!("{} {}", "?".yellow(), self.input),
        }
    }
}
