//! Dotted scope patterns (`account.update`, `account.*`, `*`).
//!
//! Matching is segment-aware:
//! - a literal pattern matches itself and its dotted descendants
//!   (`account.update` matches `account.update.user`, not `account.updateX`);
//! - a segment ending in `*` matches any segment with that prefix, so a final
//!   `*` matches one or more remaining segments and `*` alone matches anything;
//! - `account.*` matches neither `account` nor `account2.update`.

use std::fmt;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Glob(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw.strip_suffix('*') {
            Some(prefix) => Self::Glob(prefix.to_string()),
            None => Self::Literal(raw.to_string()),
        }
    }

    fn accepts(&self, part: &str) -> bool {
        match self {
            Self::Literal(literal) => part == literal,
            Self::Glob(prefix) => part.starts_with(prefix.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct ScopePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl ScopePattern {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let segments = if raw.is_empty() {
            Vec::new()
        } else {
            raw.split('.').map(Segment::parse).collect()
        };
        Self { raw, segments }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True when `target` is covered by this pattern (itself or a descendant).
    pub fn matches(&self, target: &str) -> bool {
        if self.segments.is_empty() {
            return false;
        }
        let mut parts = target.split('.');
        self.segments
            .iter()
            .all(|segment| parts.next().is_some_and(|part| segment.accepts(part)))
    }

    /// True when some strict descendant of `path` could match without `path` itself matching.
    pub fn reaches_below(&self, path: &str) -> bool {
        let parts: Vec<&str> = path.split('.').collect();
        self.segments.len() > parts.len()
            && parts
                .iter()
                .zip(&self.segments)
                .all(|(part, segment)| segment.accepts(part))
    }
}

impl From<String> for ScopePattern {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for ScopePattern {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for ScopePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// First-match scan; an empty grant list never matches.
pub fn any_matches(patterns: &[ScopePattern], target: &str) -> bool {
    patterns.iter().any(|pattern| pattern.matches(target))
}
