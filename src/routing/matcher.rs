//! Context matching logic.
//!
//! # Responsibilities
//! - Match the connector a request arrived on (virtual hosts)
//! - Match the request path against a context prefix
//!
//! # Design Decisions
//! - Connector matching is exact, case-sensitive string set membership
//! - Empty virtual host set = reachable from every connector (wildcard)
//! - Path matching is case-sensitive and respects segment boundaries
//! - No regex to guarantee O(n) matching

use std::collections::BTreeSet;

use crate::routing::Context;

/// Set of connector names a context is reachable from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualHosts {
    connectors: BTreeSet<String>,
}

impl VirtualHosts {
    /// Reachable from every connector.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn only<I, S>(connectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            connectors: connectors.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_any(&self) -> bool {
        self.connectors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.connectors.iter().map(String::as_str)
    }

    /// True iff the set is empty or names `connector_name`.
    pub fn allows(&self, connector_name: &str) -> bool {
        self.connectors.is_empty() || self.connectors.contains(connector_name)
    }
}

/// Whether `context` is reachable from the connector named `connector_name`.
pub fn matches(context: &Context, connector_name: &str) -> bool {
    context.virtual_hosts().allows(connector_name)
}

/// Matches request paths under a context prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher. A trailing `/` is ignored except
    /// for the root prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let trimmed = prefix.trim_end_matches('/');
        Self {
            prefix: if trimmed.is_empty() {
                "/".to_string()
            } else {
                trimmed.to_string()
            },
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// `/test1` matches `/test1` and `/test1/...`, not `/test10`.
    pub fn matches(&self, path: &str) -> bool {
        if self.prefix == "/" {
            return true;
        }
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}
