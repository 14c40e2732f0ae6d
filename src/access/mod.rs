//! IP-based access control for tracking-script injection
//!
//! This module decides, once per page render, whether tracking script may
//! be emitted for a client. It combines exact-match block lists, literal
//! and named IP ranges, and request-level gating signals (admin mode,
//! missing tracking id, opt-out cookie) into a single allow/deny decision
//! with a human-readable reason.

pub mod codec;
pub mod engine;
pub mod range;

// Re-export commonly used types
pub use codec::AddrKey;
pub use engine::{evaluate, Decision, EvalContext};
pub use range::{expand_named, is_in_range};
