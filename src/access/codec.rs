//! Canonical binary address encoding
//!
//! Converts human-readable IPv4/IPv6 address text into a fixed-width,
//! totally-ordered 128-bit key so that both families can be compared
//! uniformly. Encoding is total: unparseable input maps to the all-zeros
//! sentinel instead of failing, which keeps range containment a total
//! function for the decision engine.

use std::net::IpAddr;

/// A 128-bit comparable address key.
///
/// IPv4 addresses occupy the low 4 bytes with the upper 12 bytes zeroed.
/// This is deliberately NOT the IPv4-mapped IPv6 layout (`::ffff:a.b.c.d`):
/// keys are only comparable against keys produced by this codec, and the
/// zero-extension keeps the two families in disjoint, consistently ordered
/// regions of the key space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AddrKey([u8; 16]);

/// The sentinel key produced for unparseable input (`::`, all zeros).
pub const UNSPECIFIED: AddrKey = AddrKey([0u8; 16]);

/// Encode address text into its canonical 128-bit key.
///
/// Accepts IPv4 dotted-quad and IPv6 textual forms (including RFC 5952
/// compressed forms). Never fails: anything that does not parse as a
/// complete address, including truncated dotted-quads like `"10.0.0"`,
/// yields [`UNSPECIFIED`]. Two calls with the same text always produce
/// the same key.
pub fn encode(text: &str) -> AddrKey {
    match text.trim().parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => {
            let mut bytes = [0u8; 16];
            bytes[12..].copy_from_slice(&v4.octets());
            AddrKey(bytes)
        }
        Ok(IpAddr::V6(v6)) => AddrKey(v6.octets()),
        Err(_) => UNSPECIFIED,
    }
}

/// Check whether `addr` lies in the closed interval `[low, high]`.
///
/// Ordering is the 128-bit unsigned big-endian byte order, which the
/// derived `Ord` on the byte array provides directly.
pub fn in_range(addr: AddrKey, low: AddrKey, high: AddrKey) -> bool {
    low <= addr && addr <= high
}
