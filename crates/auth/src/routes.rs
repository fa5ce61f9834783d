//! Static route table and request-path classification.
//!
//! A path with no matching rule is implicitly public. Rules are matched on
//! whole path segments, most specific prefix first, after an optional locale
//! segment has been stripped.

use thiserror::Error;

use crate::Role;

/// Locales the portals ship under; only these are stripped from paths.
pub const SUPPORTED_LOCALES: [&str; 2] = ["en", "vi"];

/// Entry page for every portal; authenticated visitors are dispatched from
/// here to their role's home.
pub const PORTAL_ROOT: &str = "/portal";

/// Login page; receives the original path+query as `returnTo`.
pub const LOGIN_PATH: &str = "/login";

/// Generic forbidden page.
pub const FORBIDDEN_PATH: &str = "/forbidden";

/// Grants a set of roles access to everything under a path prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRule {
    pub prefix: &'static str,
    pub allowed: &'static [Role],
}

const ALL_ROLES: &[Role] = &Role::ALL;

const STANDARD_RULES: &[RouteRule] = &[
    RouteRule { prefix: "/portal", allowed: ALL_ROLES },
    RouteRule { prefix: "/portal/admin", allowed: &[Role::Admin] },
    RouteRule { prefix: "/portal/accounting", allowed: &[Role::Admin, Role::StaffAccountant] },
    RouteRule { prefix: "/portal/staff", allowed: &[Role::Admin, Role::StaffManager] },
    RouteRule { prefix: "/portal/teacher", allowed: &[Role::Admin, Role::Teacher] },
    RouteRule { prefix: "/portal/student", allowed: &[Role::Student] },
    RouteRule { prefix: "/portal/parent", allowed: &[Role::Parent] },
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("duplicate route prefix: {0}")]
    DuplicatePrefix(String),

    #[error("route prefix must start with '/': {0}")]
    RelativePrefix(String),

    #[error("route rule for {0} allows no roles")]
    EmptyAllowSet(String),
}

/// Immutable, startup-validated route table.
///
/// Rules are held longest-prefix first (ties broken lexicographically), so
/// the first match is always the most specific one and matching order is
/// deterministic.
#[derive(Debug, Clone)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    /// The portal's standard table. Its validity is pinned by a test, so the
    /// expect cannot fire at runtime.
    pub fn standard() -> Self {
        Self::new(STANDARD_RULES.to_vec()).expect("standard route table")
    }

    /// Validate and order a rule set. Fails fast on configuration errors so
    /// a bad table never reaches request time.
    pub fn new(mut rules: Vec<RouteRule>) -> Result<Self, RouteTableError> {
        for rule in &rules {
            if !rule.prefix.starts_with('/') {
                return Err(RouteTableError::RelativePrefix(rule.prefix.to_string()));
            }
            if rule.allowed.is_empty() {
                return Err(RouteTableError::EmptyAllowSet(rule.prefix.to_string()));
            }
        }

        rules.sort_by(|a, b| {
            b.prefix
                .len()
                .cmp(&a.prefix.len())
                .then_with(|| a.prefix.cmp(b.prefix))
        });

        if let Some(pair) = rules.windows(2).find(|w| w[0].prefix == w[1].prefix) {
            return Err(RouteTableError::DuplicatePrefix(pair[0].prefix.to_string()));
        }

        Ok(Self { rules })
    }

    /// Rules in matching order (most specific first).
    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    /// Classify a raw request path (locale prefix intact, no query string).
    pub fn classify(&self, raw_path: &str) -> Classification {
        let (locale, path) = split_locale(raw_path);
        let rule = self.match_rule(&path).copied();
        let bare_portal_root = path.trim_end_matches('/') == PORTAL_ROOT;

        Classification {
            locale,
            path,
            rule,
            bare_portal_root,
        }
    }

    fn match_rule(&self, path: &str) -> Option<&RouteRule> {
        self.rules.iter().find(|r| prefix_matches(r.prefix, path))
    }
}

/// Outcome of classifying one request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Stripped locale segment, when the path carried one.
    pub locale: Option<String>,

    /// Path with the locale segment removed; rules match on this.
    pub path: String,

    /// Most specific matching rule; `None` means the path is public.
    pub rule: Option<RouteRule>,

    /// True when `path` is exactly the portal root.
    pub bare_portal_root: bool,
}

/// Segment-wise prefix match: `/portal` covers `/portal` and `/portal/x`,
/// never `/portals`.
fn prefix_matches(prefix: &str, path: &str) -> bool {
    path == prefix
        || (path.starts_with(prefix) && path.as_bytes().get(prefix.len()) == Some(&b'/'))
}

fn split_locale(path: &str) -> (Option<String>, String) {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let (first, rest) = match trimmed.split_once('/') {
        Some((first, rest)) => (first, Some(rest)),
        None => (trimmed, None),
    };

    if !SUPPORTED_LOCALES.contains(&first) {
        return (None, path.to_string());
    }

    let remainder = match rest {
        Some(rest) if !rest.is_empty() => format!("/{rest}"),
        _ => "/".to_string(),
    };
    (Some(first.to_string()), remainder)
}
