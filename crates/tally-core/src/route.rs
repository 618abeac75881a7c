//! Route table: exact-match paths, one wildcard, base-path stripping.

use core::fmt;
use std::collections::HashMap;

use crate::lifecycle::ViewKind;

/// Canonical counter paths: both activate the root handler when no
/// exact entry matches.
const ROOT_PATH: &str = "/";
const COUNTER_PATH: &str = "/counter";

/// No exact match, no canonical fallback, and no wildcard registered.
///
/// Logged, never fatal: dispatch becomes a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteUnhandled {
    path: String,
}

impl RouteUnhandled {
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for RouteUnhandled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no route handler for {}", self.path)
    }
}

impl std::error::Error for RouteUnhandled {}

/// A resolved dispatch: the stripped path plus the view to activate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// Location path with any deployment base prefix removed.
    pub path: String,
    pub view: ViewKind,
}

/// Path-to-view mapping. Populated once at startup, immutable after.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    base_path: Option<String>,
    exact: HashMap<String, ViewKind>,
    wildcard: Option<ViewKind>,
}

impl RouteTable {
    #[must_use]
    pub fn new(base_path: Option<String>) -> Self {
        Self {
            base_path: base_path.filter(|base| !base.is_empty()),
            exact: HashMap::new(),
            wildcard: None,
        }
    }

    /// Register a route. The literal path `*` registers the wildcard.
    pub fn register(&mut self, path: &str, view: ViewKind) {
        if path == "*" {
            self.wildcard = Some(view);
        } else {
            self.exact.insert(path.to_owned(), view);
        }
    }

    /// Strip the configured base prefix off a raw location path. An
    /// empty remainder normalizes to `/`.
    #[must_use]
    pub fn strip_base<'a>(&self, location_path: &'a str) -> &'a str {
        let stripped = match &self.base_path {
            Some(base) => location_path.strip_prefix(base).unwrap_or(location_path),
            None => location_path,
        };
        if stripped.is_empty() { ROOT_PATH } else { stripped }
    }

    /// Prepend the base prefix when constructing an outgoing path.
    #[must_use]
    pub fn with_base(&self, path: &str) -> String {
        match &self.base_path {
            Some(base) => format!("{base}{path}"),
            None => path.to_owned(),
        }
    }

    /// Exact lookup, then the root fallback for canonical counter
    /// paths, then the wildcard.
    pub fn resolve(&self, location_path: &str) -> Result<ResolvedRoute, RouteUnhandled> {
        let path = self.strip_base(location_path);

        let view = self.exact.get(path).copied().or_else(|| {
            if path == ROOT_PATH || path == COUNTER_PATH {
                self.exact.get(ROOT_PATH).copied()
            } else {
                self.wildcard
            }
        });

        match view {
            Some(view) => Ok(ResolvedRoute {
                path: path.to_owned(),
                view,
            }),
            None => {
                #[cfg(feature = "tracing")]
                tracing::warn!(path, "route dispatch unhandled");
                Err(RouteUnhandled {
                    path: path.to_owned(),
                })
            }
        }
    }
}
