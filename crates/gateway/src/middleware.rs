use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::Uri,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;

use eduhub_auth::{
    AccessDecision, FORBIDDEN_PATH, LOGIN_PATH, Role, RouteTable, TokenVerifier, decide,
};

use crate::context::PrincipalContext;
use crate::extract;

/// State shared by every request passing the gateway.
#[derive(Clone)]
pub struct GatewayState {
    pub verifier: Arc<dyn TokenVerifier>,
    pub routes: Arc<RouteTable>,
    #[cfg(feature = "dev-bypass")]
    pub dev_bypass: crate::dev::DevBypass,
}

/// The gateway itself: classify the path, resolve identity, decide, and
/// either pass the request through (with the locale prefix stripped from
/// the URI and the principal attached) or redirect.
pub async fn access_middleware(
    State(state): State<GatewayState>,
    mut req: Request,
    next: Next,
) -> Response {
    let original = original_path_and_query(req.uri());
    let class = state.routes.classify(req.uri().path());

    let mut principal = extract::extract_token(req.headers())
        .and_then(|token| match state.verifier.verify(&token, Utc::now()) {
            Ok(claims) => Some(claims),
            Err(err) => {
                // Malformed, unverifiable, and expired all collapse to
                // "absent identity"; the caller just sees the login page.
                tracing::debug!(%err, path = %original, "credential rejected");
                None
            }
        })
        .map(|claims| {
            let role = Role::normalize(&claims.role);
            PrincipalContext::new(claims.sub, role, claims.email)
        });

    #[cfg(feature = "dev-bypass")]
    if principal.is_none() {
        if let Some(role) = state.dev_bypass.resolve(&class) {
            tracing::warn!(%role, path = %original, "dev bypass fabricated identity");
            principal = Some(PrincipalContext::new("dev-bypass".to_string(), role, None));
        }
    }

    match decide(&class, principal.as_ref().map(|p| p.role()), &original) {
        AccessDecision::Allow => {
            if class.locale.is_some() {
                rewrite_path(&mut req, &class.path);
            }
            if let Some(principal) = principal {
                req.extensions_mut().insert(principal);
            }
            next.run(req).await
        }
        AccessDecision::RedirectToLogin { return_to } => {
            let target = format!("{LOGIN_PATH}?returnTo={}", urlencoding::encode(&return_to));
            Redirect::temporary(&target).into_response()
        }
        AccessDecision::RedirectToForbidden => Redirect::temporary(FORBIDDEN_PATH).into_response(),
        AccessDecision::RedirectToRoleHome { role } => {
            let target = match &class.locale {
                Some(locale) => format!("/{locale}{}", role.home_path()),
                None => role.home_path().to_string(),
            };
            Redirect::temporary(&target).into_response()
        }
    }
}

fn original_path_and_query(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

/// Swap the request path so downstream routing is locale-agnostic; the
/// query string is kept as-is.
fn rewrite_path(req: &mut Request, path: &str) {
    let rewritten = match req.uri().query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };
    if let Ok(uri) = rewritten.parse::<Uri>() {
        *req.uri_mut() = uri;
    }
}
