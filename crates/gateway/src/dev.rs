//! Development-only identity fabrication.
//!
//! Compiled only under the `dev-bypass` cargo feature; release artifacts
//! built without the feature contain none of this code. Even when compiled
//! in, the resolver stays inert unless both env flags are set and the
//! deployment environment is not production.

use std::env;

use eduhub_auth::{Classification, PORTAL_ROOT, Role};

/// Dev/preview identity override for running portals without a real login.
#[derive(Debug, Clone, Default)]
pub struct DevBypass {
    enabled: bool,
    fallback: Option<Role>,
}

impl DevBypass {
    /// Build from the process environment: `EDUHUB_DEV_BYPASS` and
    /// `EDUHUB_PREVIEW` must both be truthy, `EDUHUB_ENV` must not be
    /// production, and `EDUHUB_DEV_ROLE` optionally names the fallback role.
    pub fn from_env() -> Self {
        Self::new(
            flag("EDUHUB_DEV_BYPASS"),
            flag("EDUHUB_PREVIEW"),
            crate::config::Environment::from_env().is_production(),
            env::var("EDUHUB_DEV_ROLE").ok().as_deref().map(Role::normalize),
        )
    }

    pub fn new(bypass: bool, preview: bool, production: bool, fallback: Option<Role>) -> Self {
        Self {
            enabled: bypass && preview && !production,
            fallback,
        }
    }

    /// Fabricate a role for a portal request with no real session: first
    /// from the portal path segment, else the configured fallback.
    pub fn resolve(&self, class: &Classification) -> Option<Role> {
        if !self.enabled {
            return None;
        }
        path_role(&class.path).or(self.fallback)
    }
}

fn flag(name: &str) -> bool {
    matches!(
        env::var(name).as_deref().map(str::trim),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Infer the role from `/portal/<segment>/...`.
fn path_role(path: &str) -> Option<Role> {
    let rest = path.strip_prefix(PORTAL_ROOT)?.strip_prefix('/')?;
    let segment = rest.split('/').next()?;
    Role::from_portal_segment(segment)
}
