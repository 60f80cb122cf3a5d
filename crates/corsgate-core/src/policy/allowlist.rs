//! Allowlist compilation and matching utilities.
//!
//! URI and origin whitelists are regular expressions compiled once. Matching
//! uses search semantics, so anchored patterns (`^/path$`) behave as exact
//! matches and unanchored ones (`example\.com$`) match a suffix.

use std::collections::HashSet;
use std::fmt;

use regex::Regex;

use crate::error::{CorsGateError, Result};

/// Which whitelist a pattern belongs to (used in error reports).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternList {
    Uri,
    Origin,
}

impl PatternList {
    pub fn as_str(self) -> &'static str {
        match self {
            PatternList::Uri => "xhr_allowed_uris",
            PatternList::Origin => "xhr_allowed_origins",
        }
    }
}

impl fmt::Display for PatternList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compiled, ordered regex whitelist.
#[derive(Debug, Clone)]
pub struct Allowlist {
    patterns: Vec<Regex>,
}

impl Allowlist {
    /// Compile every entry; the first bad pattern aborts with its index.
    pub fn compile<S: AsRef<str>>(list: PatternList, raw: &[S]) -> Result<Self> {
        if raw.is_empty() {
            return Err(CorsGateError::EmptyPatternList(list));
        }

        let mut patterns = Vec::with_capacity(raw.len());
        for (index, s) in raw.iter().enumerate() {
            let pattern = s.as_ref();
            let re = Regex::new(pattern).map_err(|source| CorsGateError::InvalidPattern {
                list,
                index,
                pattern: pattern.to_string(),
                source,
            })?;
            patterns.push(re);
        }
        Ok(Self { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Source text of each compiled pattern, in configuration order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Regex::as_str)
    }

    pub fn is_allowed(&self, candidate: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(candidate))
    }
}

/// Header names: case-insensitive membership, configuration order kept for
/// rendering.
#[derive(Debug, Clone, Default)]
pub struct HeaderSet {
    ordered: Vec<String>,
    lookup: HashSet<String>,
}

impl HeaderSet {
    pub fn new<S: AsRef<str>>(raw: &[S]) -> Self {
        let mut set = Self::default();
        for s in raw {
            let name = s.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            // first spelling wins; later case variants are duplicates
            if set.lookup.insert(name.to_ascii_lowercase()) {
                set.ordered.push(name.to_string());
            }
        }
        set
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains(&name.trim().to_ascii_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// HTTP method tokens, compared case-sensitively.
#[derive(Debug, Clone, Default)]
pub struct MethodSet {
    methods: HashSet<String>,
}

impl MethodSet {
    pub fn new<S: AsRef<str>>(raw: &[S]) -> Result<Self> {
        let mut methods = HashSet::with_capacity(raw.len());
        for s in raw {
            let m = s.as_ref().trim();
            if !is_token(m) {
                return Err(CorsGateError::InvalidMethod(s.as_ref().to_string()));
            }
            methods.insert(m.to_string());
        }
        Ok(Self { methods })
    }

    pub fn contains(&self, method: &str) -> bool {
        self.methods.contains(method)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

/// RFC 9110 `token`.
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^'
                        | b'_' | b'`' | b'|' | b'~'
                )
        })
}

/// True when the comma-separated `list` names `token` (case-insensitive).
pub fn list_contains_token(list: &str, token: &str) -> bool {
    list.split(',').any(|t| t.trim().eq_ignore_ascii_case(token))
}
