//! Recognition of textual address encodings
//!
//! [`recognize`] only classifies a string and captures the part that carries
//! the value. Turning the captured digits into bytes is done by
//! [`Address`](crate::Address). Rules are tried in a fixed order and the
//! first match wins:
//!
//! 1. dotted quad with zero-padded octets (`127.000.000.001`)
//! 2. standard IPv4 or IPv6 literal
//! 3. 32 or 128 binary digits, optional `0b` prefix
//! 4. 8 or 32 hex digits, optional `0x` prefix
//! 5. up to 39 decimal digits (an IPv6 numeric value)

use once_cell::sync::Lazy;
use regex::Regex;
use std::net::{IpAddr, Ipv4Addr};

static DOTTED_QUAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(?:\.[0-9]+){3}$").expect("Invalid Regex?"));

static BINARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:0[bB])?([01]{32}(?:[01]{96})?)$").expect("Invalid Regex?"));

static HEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:0[xX])?([0-9a-fA-F]{8}(?:[0-9a-fA-F]{24})?)$").expect("Invalid Regex?")
});

static DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{1,39}$").expect("Invalid Regex?"));

static CIDR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9a-fA-F:.]+)/([0-9]+)$").expect("Invalid Regex?"));

/// Encodings a text input can be recognized as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    /// Dotted quad, possibly with zero-padded octets
    DottedQuad,
    /// Standard IPv4 or IPv6 literal
    Literal,
    /// Bit string, most significant bit first
    Binary,
    /// Hex string, two digits per byte
    Hex,
    /// Decimal digits of an IPv6 numeric value
    Decimal,
}

/// A recognized text input together with its value-carrying part
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recognized<'a> {
    /// Dotted quad normalized to a standard IPv4 literal
    DottedQuad(Ipv4Addr),
    /// Standard literal
    Literal(IpAddr),
    /// Binary digits without the `0b` prefix
    Binary(&'a str),
    /// Hex digits without the `0x` prefix
    Hex(&'a str),
    /// Decimal digits
    Decimal(&'a str),
}

impl Recognized<'_> {
    /// The rule that matched
    pub fn format(&self) -> TextFormat {
        match self {
            Recognized::DottedQuad(_) => TextFormat::DottedQuad,
            Recognized::Literal(_) => TextFormat::Literal,
            Recognized::Binary(_) => TextFormat::Binary,
            Recognized::Hex(_) => TextFormat::Hex,
            Recognized::Decimal(_) => TextFormat::Decimal,
        }
    }
}

/// Classify `input` against the address encodings, first match wins.
///
/// Returns `None` when no rule matches. A dotted quad whose octets exceed
/// 255 after zero-stripping matches nothing.
pub fn recognize(input: &str) -> Option<Recognized<'_>> {
    if DOTTED_QUAD.is_match(input) {
        return unpad_dotted_quad(input).map(Recognized::DottedQuad);
    }

    if let Ok(ip) = input.parse::<IpAddr>() {
        return Some(Recognized::Literal(ip));
    }

    if let Some(caps) = BINARY.captures(input) {
        return caps.get(1).map(|m| Recognized::Binary(m.as_str()));
    }

    if let Some(caps) = HEX.captures(input) {
        return caps.get(1).map(|m| Recognized::Hex(m.as_str()));
    }

    if DECIMAL.is_match(input) {
        return Some(Recognized::Decimal(input));
    }

    None
}

/// Split a CIDR literal (`addr/prefix`) into its address and prefix parts.
///
/// Only the shape is checked here; the address part still has to parse.
pub fn split_cidr(input: &str) -> Option<(&str, &str)> {
    let caps = CIDR.captures(input)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Split a range literal (`first - last`) on its first dash.
///
/// A dash at position 0 does not count as a separator. Both halves are
/// trimmed.
pub fn split_range(input: &str) -> Option<(&str, &str)> {
    match input.find('-') {
        Some(0) | None => None,
        Some(pos) => Some((input[..pos].trim(), input[pos + 1..].trim())),
    }
}

fn unpad_dotted_quad(input: &str) -> Option<Ipv4Addr> {
    let unpadded: Vec<&str> = input
        .split('.')
        .map(|octet| match octet.trim_start_matches('0') {
            "" => "0",
            digits => digits,
        })
        .collect();

    unpadded.join(".").parse().ok()
}
