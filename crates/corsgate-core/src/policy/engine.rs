//! CORS decision engine.
//!
//! Evaluation order:
//! 1. No `Origin` -> `PassThrough`.
//! 2. Classify preflight vs. actual, then pick the tier.
//! 3. Run the tier's checks; first failure wins.

use super::allowlist::list_contains_token;
use super::config::PolicyConfig;
use super::request::{AllowHeaders, CorsRequest, Decision, RequestKind, Tier, X_REQUESTED_WITH};

/// Methods advertised by the open tier. Published baseline, independent of
/// the admission gate.
pub const OPEN_ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE";

/// Origin value returned by the open tier.
pub const WILDCARD_ORIGIN: &str = "*";

/// Stateless evaluator over one compiled policy.
/// Construct once at startup, then share via Arc.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    policy: PolicyConfig,
    // open-tier Allow-Headers, rendered once
    open_headers: String,
}

impl DecisionEngine {
    pub fn new(policy: PolicyConfig) -> Self {
        let open_headers = policy
            .allowed_headers()
            .iter()
            .filter(|h| !h.eq_ignore_ascii_case(X_REQUESTED_WITH))
            .collect::<Vec<_>>()
            .join(", ");
        Self { policy, open_headers }
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Evaluate one request. Pure: same input, same decision.
    pub fn evaluate(&self, req: &CorsRequest) -> Decision {
        let Some(origin) = req.origin.as_deref() else {
            return Decision::PassThrough;
        };

        let kind = classify_kind(req);
        let tier = classify_tier(req, kind);
        tier.evaluate(self, req, kind, origin)
    }
}

/// `OPTIONS` with `Access-Control-Request-Method` is a preflight.
pub fn classify_kind(req: &CorsRequest) -> RequestKind {
    if req.method == "OPTIONS" && req.request_method.is_some() {
        RequestKind::Preflight
    } else {
        RequestKind::Actual
    }
}

/// XHR signaling selects the restricted tier.
///
/// Preflights signal through the requested-header list only. Actual requests
/// signal through the header itself; an `OPTIONS` request without a request
/// method may also signal through its requested-header list.
pub fn classify_tier(req: &CorsRequest, kind: RequestKind) -> Tier {
    let listed = req
        .request_headers
        .as_deref()
        .is_some_and(|h| list_contains_token(h, X_REQUESTED_WITH));

    let xhr = match kind {
        RequestKind::Preflight => listed,
        RequestKind::Actual => req.x_requested_with || (req.method == "OPTIONS" && listed),
    };

    if xhr {
        Tier::Restricted
    } else {
        Tier::Open
    }
}

/// Method under test: the requested method for preflights, else the own one.
fn effective_method(req: &CorsRequest, kind: RequestKind) -> &str {
    match (kind, req.request_method.as_deref()) {
        (RequestKind::Preflight, Some(m)) => m,
        _ => &req.method,
    }
}

impl Tier {
    fn evaluate(
        self,
        engine: &DecisionEngine,
        req: &CorsRequest,
        kind: RequestKind,
        origin: &str,
    ) -> Decision {
        match self {
            Tier::Restricted => evaluate_restricted(engine.policy(), req, kind, origin),
            Tier::Open => evaluate_open(engine, req, kind),
        }
    }
}

fn evaluate_restricted(
    policy: &PolicyConfig,
    req: &CorsRequest,
    kind: RequestKind,
    origin: &str,
) -> Decision {
    if !policy.xhr_allowed_uris().is_allowed(&req.path) {
        return Decision::Forbidden;
    }

    let method = effective_method(req, kind);
    if !policy.allows_method(method) {
        return Decision::MethodNotAllowed;
    }

    if !policy.xhr_allowed_origins().is_allowed(origin) {
        return Decision::Forbidden;
    }

    let headers = match kind {
        RequestKind::Preflight => {
            let requested = req.request_headers.as_deref().unwrap_or_default();
            let unknown = requested
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case(X_REQUESTED_WITH))
                .any(|t| !policy.allows_header(t));
            if unknown {
                return Decision::HeadersNotAllowed;
            }
            req.request_headers.clone()
        }
        RequestKind::Actual => None,
    };

    Decision::Allow(AllowHeaders {
        kind,
        tier: Tier::Restricted,
        origin: origin.to_string(),
        methods: method.to_string(),
        headers,
        max_age: policy.max_age().to_string(),
    })
}

fn evaluate_open(engine: &DecisionEngine, req: &CorsRequest, kind: RequestKind) -> Decision {
    let policy = engine.policy();
    if !policy.allows_method(effective_method(req, kind)) {
        return Decision::MethodNotAllowed;
    }

    Decision::Allow(AllowHeaders {
        kind,
        tier: Tier::Open,
        origin: WILDCARD_ORIGIN.to_string(),
        methods: OPEN_ALLOWED_METHODS.to_string(),
        headers: Some(engine.open_headers.clone()),
        max_age: policy.max_age().to_string(),
    })
}
