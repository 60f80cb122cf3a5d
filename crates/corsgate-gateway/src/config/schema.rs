use std::borrow::Cow;
use std::net::SocketAddr;

use corsgate_core::error::{CorsGateError, Result};
use corsgate_core::PolicyConfig;
use serde::Deserialize;

/// Whitelist entry that matches only the empty string (default deny).
pub const DENY_ALL_PATTERN: &str = "^$";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub cors: CorsSection,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(CorsGateError::UnsupportedVersion);
        }

        self.gateway.validate()?;
        self.cors.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            CorsGateError::BadConfig(format!(
                "gateway.listen must be a valid SocketAddr (got {:?})",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}

/// Raw CORS policy lists, compiled by [`CorsSection::to_policy`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsSection {
    #[serde(default = "default_deny_patterns")]
    pub xhr_allowed_uris: Vec<String>,

    #[serde(default = "default_deny_patterns")]
    pub xhr_allowed_origins: Vec<String>,

    #[serde(default = "default_allowed_headers")]
    pub allowed_headers: Vec<String>,

    #[serde(default = "default_allowed_methods")]
    pub allowed_methods: Vec<String>,

    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,
}

impl Default for CorsSection {
    fn default() -> Self {
        Self {
            xhr_allowed_uris: default_deny_patterns(),
            xhr_allowed_origins: default_deny_patterns(),
            allowed_headers: default_allowed_headers(),
            allowed_methods: default_allowed_methods(),
            max_age_secs: default_max_age_secs(),
        }
    }
}

impl CorsSection {
    pub fn validate(&self) -> Result<()> {
        if self.allowed_methods.is_empty() {
            return Err(CorsGateError::BadConfig(
                "cors.allowed_methods must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Compile into an immutable policy. Empty whitelists fall back to the
    /// deny-all sentinel.
    pub fn to_policy(&self) -> Result<PolicyConfig> {
        let uris = or_deny_all("cors.xhr_allowed_uris", &self.xhr_allowed_uris);
        let origins = or_deny_all("cors.xhr_allowed_origins", &self.xhr_allowed_origins);

        PolicyConfig::new(
            &*uris,
            &*origins,
            self.allowed_headers.as_slice(),
            self.allowed_methods.as_slice(),
            self.max_age_secs,
        )
    }
}

fn or_deny_all<'a>(field: &str, patterns: &'a [String]) -> Cow<'a, [String]> {
    if patterns.is_empty() {
        tracing::warn!(field, "empty whitelist, falling back to deny-all");
        return Cow::Owned(default_deny_patterns());
    }
    Cow::Borrowed(patterns)
}

fn default_deny_patterns() -> Vec<String> {
    vec![DENY_ALL_PATTERN.into()]
}
fn default_allowed_headers() -> Vec<String> {
    vec!["Authorization".into()]
}
fn default_allowed_methods() -> Vec<String> {
    vec!["GET".into(), "OPTIONS".into()]
}
fn default_max_age_secs() -> u64 {
    1_728_000
}
