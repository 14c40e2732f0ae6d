//! Access decision engine
//!
//! Runs the ordered gating pipeline for a single page render: request-level
//! signals first (admin mode, missing tracking id, opt-out cookie), then the
//! exact-match block list, then the blocked ranges. The first rule that
//! fires decides the outcome; its reason names the triggering value so
//! operators can see exactly why a client was denied.

use serde::Serialize;
use tracing::debug;

use crate::access::{codec, range};

/// Outcome of one access evaluation.
///
/// `Deny` carries a short human-readable reason identifying the rule that
/// fired; the host surfaces it as a diagnostic comment in place of the
/// tracking script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum Decision {
    Allow,
    Deny { reason: String },
}

impl Decision {
    fn deny(reason: impl Into<String>) -> Self {
        Decision::Deny {
            reason: reason.into(),
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// The denial reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Decision::Allow => None,
            Decision::Deny { reason } => Some(reason),
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Allow => write!(f, "allow"),
            Decision::Deny { reason } => write!(f, "deny: {reason}"),
        }
    }
}

/// Immutable per-request snapshot the engine evaluates against.
///
/// The caller assembles this from its configuration plus request facts
/// before invoking [`evaluate`]; nothing here is read from ambient state,
/// so concurrent evaluations need no coordination.
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    /// The admin plugin is handling this render.
    pub admin_active: bool,

    /// Tracking id, already trimmed and env-resolved by the caller.
    pub tracking_id: String,

    /// Name of the opt-out cookie, iff it was present on the request.
    pub blocking_cookie: Option<String>,

    /// Exact-match block list, compared as raw strings against the client
    /// address text (not canonicalized: `"127.000.000.001"` only blocks
    /// clients that arrive spelled exactly that way).
    pub blocked_ips: Vec<String>,

    /// Blocked range specs, tested in configured order.
    pub blocked_ranges: Vec<String>,
}

/// Evaluate the gating pipeline for one client address.
///
/// Checks run in a fixed order and stop at the first match: context-only
/// signals before anything that touches the address, exact matches before
/// ranges, ranges in configured order. Total function; malformed input on
/// any path degrades to "no match" rather than an error.
pub fn evaluate(client_addr: &str, ctx: &EvalContext) -> Decision {
    let decision = run_pipeline(client_addr, ctx);
    debug!(client_addr, %decision, "access evaluated");
    decision
}

fn run_pipeline(client_addr: &str, ctx: &EvalContext) -> Decision {
    if ctx.admin_active {
        return Decision::deny("admin plugin active");
    }

    if ctx.tracking_id.trim().is_empty() {
        return Decision::deny("trackingId not configured");
    }

    if let Some(name) = &ctx.blocking_cookie {
        return Decision::deny(format!("blocking cookie \"{name}\" is set"));
    }

    if ctx.blocked_ips.iter().any(|ip| ip == client_addr) {
        return Decision::deny(format!("client ip {client_addr} is in blockedIps"));
    }

    // Encode once; every range test reuses the key
    let key = codec::encode(client_addr);
    for spec in &ctx.blocked_ranges {
        if range::is_in_range(key, spec) {
            return Decision::deny(format!(
                "client ip {client_addr} is in range \"{spec}\""
            ));
        }
    }

    Decision::Allow
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow_all_context() -> EvalContext {
        EvalContext {
            admin_active: false,
            tracking_id: "UA-1".to_string(),
            blocking_cookie: None,
            blocked_ips: vec![],
            blocked_ranges: vec![],
        }
    }

    #[test]
    fn test_allow_by_default() {
        let ctx = allow_all_context();
        assert_eq!(evaluate("93.184.216.34", &ctx), Decision::Allow);
    }

    #[test]
    fn test_admin_short_circuits_everything() {
        let ctx = EvalContext {
            admin_active: true,
            ..allow_all_context()
        };
        assert_eq!(
            evaluate("93.184.216.34", &ctx),
            Decision::deny("admin plugin active")
        );
    }

    #[test]
    fn test_missing_tracking_id() {
        let ctx = EvalContext {
            tracking_id: String::new(),
            ..allow_all_context()
        };
        assert_eq!(
            evaluate("93.184.216.34", &ctx),
            Decision::deny("trackingId not configured")
        );

        // Whitespace-only counts as unconfigured
        let ctx = EvalContext {
            tracking_id: "   ".to_string(),
            ..allow_all_context()
        };
        assert!(!evaluate("93.184.216.34", &ctx).is_allow());
    }

    #[test]
    fn test_blocking_cookie() {
        let ctx = EvalContext {
            blocking_cookie: Some("ga-opt-out".to_string()),
            ..allow_all_context()
        };
        assert_eq!(
            evaluate("93.184.216.34", &ctx),
            Decision::deny("blocking cookie \"ga-opt-out\" is set")
        );
    }

    #[test]
    fn test_exact_match_is_raw_string_equality() {
        let ctx = EvalContext {
            blocked_ips: vec!["127.0.0.1".to_string()],
            ..allow_all_context()
        };
        assert_eq!(
            evaluate("127.0.0.1", &ctx),
            Decision::deny("client ip 127.0.0.1 is in blockedIps")
        );
        // Equivalent but differently-written address does not hit the
        // exact-match list
        assert_eq!(evaluate("127.000.000.001", &ctx), Decision::Allow);
    }

    #[test]
    fn test_exact_match_precedes_ranges() {
        let ctx = EvalContext {
            blocked_ips: vec!["10.1.2.3".to_string()],
            blocked_ranges: vec!["10.0.0.0-10.255.255.255".to_string()],
            ..allow_all_context()
        };
        assert_eq!(
            evaluate("10.1.2.3", &ctx),
            Decision::deny("client ip 10.1.2.3 is in blockedIps")
        );
    }

    #[test]
    fn test_range_match_reports_spec() {
        let ctx = EvalContext {
            blocked_ranges: vec!["loopback".to_string()],
            ..allow_all_context()
        };
        assert_eq!(
            evaluate("127.0.0.1", &ctx),
            Decision::deny("client ip 127.0.0.1 is in range \"loopback\"")
        );
        assert_eq!(evaluate("93.184.216.34", &ctx), Decision::Allow);
    }

    #[test]
    fn test_first_matching_range_wins() {
        let ctx = EvalContext {
            blocked_ranges: vec![
                "private".to_string(),
                "10.0.0.0-10.255.255.255".to_string(),
            ],
            ..allow_all_context()
        };
        assert_eq!(
            evaluate("10.0.0.1", &ctx),
            Decision::deny("client ip 10.0.0.1 is in range \"private\"")
        );
    }

    #[test]
    fn test_malformed_range_is_skipped() {
        let ctx = EvalContext {
            blocked_ranges: vec!["bogus".to_string(), "loopback".to_string()],
            ..allow_all_context()
        };
        assert_eq!(
            evaluate("::1", &ctx),
            Decision::deny("client ip ::1 is in range \"loopback\"")
        );
    }

    #[test]
    fn test_unparseable_client_address_can_still_allow() {
        let ctx = EvalContext {
            blocked_ranges: vec!["private".to_string()],
            ..allow_all_context()
        };
        assert_eq!(evaluate("not-an-address", &ctx), Decision::Allow);
    }

    #[test]
    fn test_decision_json_shape() {
        let allow = serde_json::to_value(Decision::Allow).unwrap();
        assert_eq!(allow["decision"], "allow");

        let deny = serde_json::to_value(Decision::deny("admin plugin active")).unwrap();
        assert_eq!(deny["decision"], "deny");
        assert_eq!(deny["reason"], "admin plugin active");
    }
}
