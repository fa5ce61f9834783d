use crate::{Classification, Role};

/// Outcome of the gateway for one request.
///
/// The decision is total: every (classification, identity) pair maps to
/// exactly one variant. Produced fresh per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Let the request through.
    Allow,

    /// No usable identity on a protected path. `return_to` carries the
    /// original path+query verbatim so the login flow can restore it.
    RedirectToLogin { return_to: String },

    /// Identity present but the role is outside the rule's allow set.
    RedirectToForbidden,

    /// Authenticated caller on the bare portal root; forward to the role's
    /// configured home.
    RedirectToRoleHome { role: Role },
}

/// Decide the fate of one request.
///
/// - No IO
/// - No panics
/// - Pure: same inputs, same decision
///
/// `identity` is the caller's canonical role when a credential verified (or
/// a dev bypass fabricated one); `original` is the request's path+query as
/// received, before locale stripping.
pub fn decide(class: &Classification, identity: Option<Role>, original: &str) -> AccessDecision {
    let Some(rule) = class.rule else {
        return AccessDecision::Allow;
    };

    let Some(role) = identity else {
        return AccessDecision::RedirectToLogin {
            return_to: original.to_string(),
        };
    };

    if !rule.allowed.contains(&role) {
        return AccessDecision::RedirectToForbidden;
    }

    if class.bare_portal_root {
        return AccessDecision::RedirectToRoleHome { role };
    }

    AccessDecision::Allow
}
