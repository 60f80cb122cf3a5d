//! Compiled, immutable CORS policy.

use super::allowlist::{Allowlist, HeaderSet, MethodSet, PatternList};
use crate::error::Result;

/// Policy compiled from raw configuration lists.
/// Construct once at startup, then share read-only.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    xhr_allowed_uris: Allowlist,
    xhr_allowed_origins: Allowlist,
    allowed_headers: HeaderSet,
    allowed_methods: MethodSet,
    max_age_secs: u64,
    max_age: String,
}

impl PolicyConfig {
    /// Compile whitelists and normalize header/method sets.
    ///
    /// Fails on the first pattern that does not compile, on an empty pattern
    /// list, or on a method entry that is not an HTTP token. Callers wanting
    /// the default-deny posture pass the `^$` sentinel explicitly.
    pub fn new<S: AsRef<str>>(
        uri_patterns: &[S],
        origin_patterns: &[S],
        allowed_headers: &[S],
        allowed_methods: &[S],
        max_age_secs: u64,
    ) -> Result<Self> {
        let xhr_allowed_uris = Allowlist::compile(PatternList::Uri, uri_patterns)?;
        let xhr_allowed_origins = Allowlist::compile(PatternList::Origin, origin_patterns)?;
        let allowed_headers = HeaderSet::new(allowed_headers);
        let allowed_methods = MethodSet::new(allowed_methods)?;

        tracing::debug!(
            uri_patterns = xhr_allowed_uris.len(),
            origin_patterns = xhr_allowed_origins.len(),
            headers = allowed_headers.len(),
            methods = allowed_methods.len(),
            max_age_secs,
            "cors policy compiled"
        );

        Ok(Self {
            xhr_allowed_uris,
            xhr_allowed_origins,
            allowed_headers,
            allowed_methods,
            max_age_secs,
            max_age: max_age_secs.to_string(),
        })
    }

    pub fn xhr_allowed_uris(&self) -> &Allowlist {
        &self.xhr_allowed_uris
    }

    pub fn xhr_allowed_origins(&self) -> &Allowlist {
        &self.xhr_allowed_origins
    }

    pub fn allowed_headers(&self) -> &HeaderSet {
        &self.allowed_headers
    }

    pub fn allows_header(&self, name: &str) -> bool {
        self.allowed_headers.contains(name)
    }

    pub fn allows_method(&self, method: &str) -> bool {
        self.allowed_methods.contains(method)
    }

    pub fn max_age_secs(&self) -> u64 {
        self.max_age_secs
    }

    /// Max-age rendered as a decimal string.
    pub fn max_age(&self) -> &str {
        &self.max_age
    }
}
