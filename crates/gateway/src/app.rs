//! Router wiring and the portal-facing handlers.
//!
//! The handlers here are deliberately thin: real portal content lives in the
//! backend and the UI layer. What they demonstrate is that the principal
//! context is derived exactly once, at the gateway boundary, and read from
//! request extensions everywhere else.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;

use eduhub_auth::{Hs256Verifier, RouteTable};

use crate::context::PrincipalContext;
use crate::errors::json_error;
use crate::{middleware, session};

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(jwt_secret: &str) -> Router {
    let state = middleware::GatewayState {
        verifier: Arc::new(Hs256Verifier::new(jwt_secret.as_bytes())),
        routes: Arc::new(RouteTable::standard()),
        #[cfg(feature = "dev-bypass")]
        dev_bypass: crate::dev::DevBypass::from_env(),
    };

    Router::new()
        .route("/health", get(health))
        .route("/login", get(login_page))
        .route("/forbidden", get(forbidden_page))
        .route("/auth/login", post(session::login))
        .route("/auth/logout", get(session::logout).post(session::logout))
        .route("/whoami", get(whoami))
        .merge(portal_routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::access_middleware,
        ))
        .with_state(state)
}

/// The gateway middleware rewrites locale-prefixed paths before routing, so
/// every portal is registered once, locale-free.
fn portal_routes() -> Router<middleware::GatewayState> {
    Router::new()
        .route("/portal/admin", get(admin_portal))
        .route("/portal/admin/*section", get(admin_portal))
        .route("/portal/accounting", get(accounting_portal))
        .route("/portal/accounting/*section", get(accounting_portal))
        .route("/portal/staff", get(staff_portal))
        .route("/portal/staff/*section", get(staff_portal))
        .route("/portal/teacher", get(teacher_portal))
        .route("/portal/teacher/*section", get(teacher_portal))
        .route("/portal/student", get(student_portal))
        .route("/portal/student/*section", get(student_portal))
        .route("/portal/parent", get(parent_portal))
        .route("/portal/parent/*section", get(parent_portal))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Deserialize)]
struct LoginPageQuery {
    #[serde(rename = "returnTo")]
    return_to: Option<String>,
}

async fn login_page(Query(query): Query<LoginPageQuery>) -> impl IntoResponse {
    Json(json!({
        "page": "login",
        "return_to": query.return_to,
    }))
}

async fn forbidden_page() -> impl IntoResponse {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": "you do not have access to this area",
        })),
    )
}

async fn whoami(principal: Option<Extension<PrincipalContext>>) -> Response {
    match principal {
        Some(Extension(principal)) => Json(json!({
            "subject": principal.subject(),
            "role": principal.role().as_str(),
            "email": principal.email(),
        }))
        .into_response(),
        None => json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "please sign in"),
    }
}

async fn admin_portal(Extension(principal): Extension<PrincipalContext>) -> Response {
    portal_payload("admin", &principal)
}

async fn accounting_portal(Extension(principal): Extension<PrincipalContext>) -> Response {
    portal_payload("accounting", &principal)
}

async fn staff_portal(Extension(principal): Extension<PrincipalContext>) -> Response {
    portal_payload("staff", &principal)
}

async fn teacher_portal(Extension(principal): Extension<PrincipalContext>) -> Response {
    portal_payload("teacher", &principal)
}

async fn student_portal(Extension(principal): Extension<PrincipalContext>) -> Response {
    portal_payload("student", &principal)
}

async fn parent_portal(Extension(principal): Extension<PrincipalContext>) -> Response {
    portal_payload("parent", &principal)
}

fn portal_payload(portal: &'static str, principal: &PrincipalContext) -> Response {
    Json(json!({
        "portal": portal,
        "subject": principal.subject(),
        "role": principal.role().as_str(),
    }))
    .into_response()
}
