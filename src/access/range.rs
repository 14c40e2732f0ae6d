//! Range specifications and named-range expansion
//!
//! A range spec is either a literal `"<low>-<high>"` address pair or one of
//! the symbolic names `private`, `loopback`, `link-local`, which expand to
//! fixed unions of literal ranges per RFC 6890/4193/4291. Expansion happens
//! on every test rather than being cached: evaluation runs once per request
//! and literal ranges are cheap to construct.

use tracing::warn;

use crate::access::codec::{self, AddrKey};

/// Literal expansion of the `private` named range (RFC 6890 + RFC 4193).
const PRIVATE: &[&str] = &[
    "10.0.0.0-10.255.255.255",
    "172.16.0.0-172.31.255.255",
    "192.168.0.0-192.168.255.255",
    "fc00::-fdff:ffff:ffff:ffff:ffff:ffff:ffff:ffff",
];

/// Literal expansion of the `loopback` named range.
const LOOPBACK: &[&str] = &["127.0.0.1-127.255.255.255", "::1-::1"];

/// Literal expansion of the `link-local` named range (RFC 6890 + RFC 4291).
const LINK_LOCAL: &[&str] = &[
    "169.254.0.0-169.254.255.255",
    "fe80::-febf:ffff:ffff:ffff:ffff:ffff:ffff:ffff",
];

/// Resolve a symbolic range name to its literal expansion.
pub fn expand_named(name: &str) -> Option<&'static [&'static str]> {
    match name {
        "private" => Some(PRIVATE),
        "loopback" => Some(LOOPBACK),
        "link-local" => Some(LINK_LOCAL),
        _ => None,
    }
}

/// Test whether an encoded address falls inside a range spec.
///
/// Named specs recurse over their literal expansion (depth is fixed at one
/// level since expansions only contain literal ranges). A literal spec must
/// contain exactly one `-`; both endpoints are encoded with the address
/// codec and tested as a closed interval. A malformed spec never fails the
/// request: it is logged and treated as "no match", since specs come from
/// trusted configuration and a typo there must not break page rendering.
pub fn is_in_range(addr: AddrKey, spec: &str) -> bool {
    if let Some(expansion) = expand_named(spec) {
        return expansion.iter().any(|literal| is_in_range(addr, literal));
    }

    let mut parts = spec.split('-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(low), Some(high), None) => {
            codec::in_range(addr, codec::encode(low), codec::encode(high))
        }
        _ => {
            warn!("ignoring malformed blocked range spec {spec:?}");
            false
        }
    }
}
