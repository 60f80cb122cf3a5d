//! Request descriptor and decision types exchanged with the HTTP layer.

/// Header a client sets to signal programmatic (XHR) intent.
pub const X_REQUESTED_WITH: &str = "X-Requested-With";

/// Normalized request metadata; the engine never sees the live exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsRequest {
    /// HTTP method as sent (case preserved).
    pub method: String,
    /// Request path without query string.
    pub path: String,
    /// `Origin` header, if any.
    pub origin: Option<String>,
    /// Whether `X-Requested-With` was present.
    pub x_requested_with: bool,
    /// `Access-Control-Request-Method` (preflight).
    pub request_method: Option<String>,
    /// `Access-Control-Request-Headers` (preflight), comma-separated.
    pub request_headers: Option<String>,
}

impl CorsRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_x_requested_with(mut self) -> Self {
        self.x_requested_with = true;
        self
    }

    pub fn with_request_method(mut self, method: impl Into<String>) -> Self {
        self.request_method = Some(method.into());
        self
    }

    pub fn with_request_headers(mut self, headers: impl Into<String>) -> Self {
        self.request_headers = Some(headers.into());
        self
    }
}

/// Preflight vs. actual request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Preflight,
    Actual,
}

impl RequestKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestKind::Preflight => "preflight",
            RequestKind::Actual => "actual",
        }
    }
}

/// Policy tier applied to a cross-origin request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Baseline posture: any origin, fixed advertised methods.
    Open,
    /// XHR posture: URI and origin whitelists enforced.
    Restricted,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Open => "open",
            Tier::Restricted => "restricted",
        }
    }
}

/// Response header values synthesized for an allowed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowHeaders {
    pub kind: RequestKind,
    pub tier: Tier,
    /// `Access-Control-Allow-Origin`.
    pub origin: String,
    /// `Access-Control-Allow-Methods`.
    pub methods: String,
    /// `Access-Control-Allow-Headers`; `None` when nothing should be sent.
    pub headers: Option<String>,
    /// `Access-Control-Max-Age` as a decimal string.
    pub max_age: String,
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// No `Origin`: not cross-origin, forward untouched.
    PassThrough,
    Allow(AllowHeaders),
    Forbidden,
    MethodNotAllowed,
    HeadersNotAllowed,
}

impl Decision {
    /// Status the HTTP layer must answer with, or `None` when the downstream
    /// handler decides.
    pub fn status(&self) -> Option<u16> {
        match self {
            Decision::PassThrough => None,
            Decision::Allow(a) => match a.kind {
                RequestKind::Preflight => Some(200),
                RequestKind::Actual => None,
            },
            Decision::Forbidden | Decision::HeadersNotAllowed => Some(403),
            Decision::MethodNotAllowed => Some(405),
        }
    }

    /// Stable label for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Decision::PassThrough => "pass_through",
            Decision::Allow(_) => "allow",
            Decision::Forbidden => "forbidden",
            Decision::MethodNotAllowed => "method_not_allowed",
            Decision::HeadersNotAllowed => "headers_not_allowed",
        }
    }
}
