//! Browser-held session cookies.
//!
//! The access-token cookie is the credential the gateway actually checks.
//! The hint cookies (role, display name, avatar) exist so layouts can paint
//! a friendly header before the authoritative check completes; they are
//! trivially forgeable and must never gate access.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use eduhub_auth::Role;

use crate::errors::json_error;
use crate::middleware::GatewayState;

/// Credential cookie checked by the gateway (HttpOnly).
pub const ACCESS_TOKEN_COOKIE: &str = "eduhub_token";
/// Hint cookie: canonical role spelling.
pub const ROLE_COOKIE: &str = "eduhub_role";
/// Hint cookie: display name (URL-encoded).
pub const DISPLAY_NAME_COOKIE: &str = "eduhub_display_name";
/// Hint cookie: avatar URL (URL-encoded).
pub const AVATAR_COOKIE: &str = "eduhub_avatar";

const SESSION_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 7;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub token: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Verify the presented token, then hand the browser the credential cookie
/// plus the UI hint cookies.
pub async fn login(State(state): State<GatewayState>, Json(body): Json<LoginRequest>) -> Response {
    let claims = match state.verifier.verify(&body.token, Utc::now()) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!(%err, "login rejected");
            return json_error(StatusCode::UNAUTHORIZED, "invalid_token", "please sign in again");
        }
    };

    let role = Role::normalize(&claims.role);

    let mut headers = HeaderMap::new();
    append_cookie(&mut headers, auth_cookie(&body.token));
    append_cookie(&mut headers, hint_cookie(ROLE_COOKIE, role.as_str()));
    if let Some(name) = &body.display_name {
        append_cookie(&mut headers, hint_cookie(DISPLAY_NAME_COOKIE, &urlencoding::encode(name)));
    }
    if let Some(url) = &body.avatar_url {
        append_cookie(&mut headers, hint_cookie(AVATAR_COOKIE, &urlencoding::encode(url)));
    }

    (
        headers,
        Json(json!({
            "subject": claims.sub,
            "role": role.as_str(),
            "home": role.home_path(),
        })),
    )
        .into_response()
}

/// Expire every session cookie. Routed for both GET and POST.
pub async fn logout() -> Response {
    let mut headers = HeaderMap::new();
    for name in [ACCESS_TOKEN_COOKIE, ROLE_COOKIE, DISPLAY_NAME_COOKIE, AVATAR_COOKIE] {
        append_cookie(&mut headers, expired_cookie(name));
    }

    (headers, Json(json!({ "logged_out": true }))).into_response()
}

fn auth_cookie(token: &str) -> String {
    format!(
        "{ACCESS_TOKEN_COOKIE}={token}; Path=/; Max-Age={SESSION_MAX_AGE_SECS}; HttpOnly; SameSite=Lax"
    )
}

fn hint_cookie(name: &str, value: &str) -> String {
    // Readable by page scripts: hints are presentation data, not secrets.
    format!("{name}={value}; Path=/; Max-Age={SESSION_MAX_AGE_SECS}; SameSite=Lax")
}

fn expired_cookie(name: &str) -> String {
    format!("{name}=; Path=/; Max-Age=0; SameSite=Lax")
}

fn append_cookie(headers: &mut HeaderMap, cookie: String) {
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        headers.append(SET_COOKIE, value);
    }
}
