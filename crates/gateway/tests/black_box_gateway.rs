use chrono::{Duration as ChronoDuration, Utc};
use eduhub_auth::{Claims, Role};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(jwt_secret: &str) -> Self {
        // Build the same router as prod, but bind to an ephemeral port.
        let app = eduhub_gateway::app::build_app(jwt_secret);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Client that surfaces redirects instead of following them.
fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn mint_token(jwt_secret: &str, role: &str, ttl: ChronoDuration) -> String {
    let claims = Claims {
        sub: "user-1".to_string(),
        role: role.to_string(),
        email: Some("user1@example.com".to_string()),
        exp: Some((Utc::now() + ttl).timestamp()),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn location(res: &reqwest::Response) -> String {
    res.headers()
        .get("location")
        .expect("redirect must carry a Location header")
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn("test-secret").await;

    let res = client()
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_path_without_credential_redirects_to_login() {
    let srv = TestServer::spawn("test-secret").await;

    let res = client()
        .get(format!("{}/portal/admin", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    let loc = location(&res);
    assert_eq!(loc, "/login?returnTo=%2Fportal%2Fadmin");

    // returnTo must round-trip verbatim.
    let encoded = loc.strip_prefix("/login?returnTo=").unwrap();
    assert_eq!(urlencoding::decode(encoded).unwrap(), "/portal/admin");
}

#[tokio::test]
async fn return_to_preserves_query_string() {
    let srv = TestServer::spawn("test-secret").await;

    let res = client()
        .get(format!("{}/portal/admin?tab=staff&page=2", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    let encoded = location(&res);
    let encoded = encoded.strip_prefix("/login?returnTo=").unwrap();
    assert_eq!(
        urlencoding::decode(encoded).unwrap(),
        "/portal/admin?tab=staff&page=2"
    );
}

#[tokio::test]
async fn wrong_role_is_redirected_to_forbidden() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_token(jwt_secret, "student", ChronoDuration::minutes(10));

    let res = client()
        .get(format!("{}/portal/admin", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res), "/forbidden");

    // The forbidden page itself answers 403.
    let res = client()
        .get(format!("{}/forbidden", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn bare_portal_root_dispatches_each_role_home() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;

    for role in Role::ALL {
        let token = mint_token(jwt_secret, role.as_str(), ChronoDuration::minutes(10));

        let res = client()
            .get(format!("{}/portal", srv.base_url))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT, "role {role}");
        assert_eq!(location(&res), role.home_path(), "role {role}");
    }
}

#[tokio::test]
async fn locale_prefixed_portal_root_keeps_locale_on_redirect() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_token(jwt_secret, "teacher", ChronoDuration::minutes(10));

    let res = client()
        .get(format!("{}/vi/portal", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res), "/vi/portal/teacher");
}

#[tokio::test]
async fn expired_credential_behaves_like_no_credential() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_token(jwt_secret, "admin", ChronoDuration::minutes(-10));

    let res = client()
        .get(format!("{}/portal/admin", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res), "/login?returnTo=%2Fportal%2Fadmin");
}

#[tokio::test]
async fn tampered_credential_behaves_like_no_credential() {
    let srv = TestServer::spawn("test-secret").await;
    let token = mint_token("attacker-secret", "admin", ChronoDuration::minutes(10));

    let res = client()
        .get(format!("{}/portal/admin", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res), "/login?returnTo=%2Fportal%2Fadmin");
}

#[tokio::test]
async fn locale_stripping_matches_unprefixed_route() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_token(jwt_secret, "manager", ChronoDuration::minutes(10));

    // Scenario pin: /vi/portal/staff/management with a StaffManager credential.
    let res = client()
        .get(format!("{}/vi/portal/staff/management", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["portal"], "staff");
    assert_eq!(body["role"], "staff_manager");

    // Same remaining path, no locale: identical outcome.
    let res = client()
        .get(format!("{}/portal/staff/management", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let unprefixed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(unprefixed, body);
}

#[tokio::test]
async fn login_sets_session_cookies_and_cookie_authenticates() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_token(jwt_secret, "teacher", ChronoDuration::minutes(10));

    let res = client()
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "token": token, "display_name": "Ms. Lan" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let cookies: Vec<String> = res
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert!(cookies.iter().any(|c| c.starts_with("eduhub_token=") && c.contains("HttpOnly")));
    assert!(cookies.iter().any(|c| c.starts_with("eduhub_role=teacher")));
    assert!(cookies.iter().any(|c| c.starts_with("eduhub_display_name=")));

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["role"], "teacher");
    assert_eq!(body["home"], "/portal/teacher");

    // The credential cookie alone authenticates a portal request.
    let res = client()
        .get(format!("{}/portal/teacher", srv.base_url))
        .header("cookie", format!("eduhub_token={}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_with_invalid_token_is_unauthorized() {
    let srv = TestServer::spawn("test-secret").await;

    let res = client()
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "token": "not.a.jwt" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_expires_all_session_cookies() {
    let srv = TestServer::spawn("test-secret").await;

    for method in ["GET", "POST"] {
        let req = match method {
            "GET" => client().get(format!("{}/auth/logout", srv.base_url)),
            _ => client().post(format!("{}/auth/logout", srv.base_url)),
        };
        let res = req.send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK, "method {method}");

        let cookies: Vec<String> = res
            .headers()
            .get_all("set-cookie")
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        for name in ["eduhub_token", "eduhub_role", "eduhub_display_name", "eduhub_avatar"] {
            assert!(
                cookies.iter().any(|c| c.starts_with(&format!("{name}=;")) && c.contains("Max-Age=0")),
                "cookie {name} not expired via {method}"
            );
        }
    }
}

#[tokio::test]
async fn whoami_reports_the_request_scoped_principal() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;

    // Alias spelling in the token; canonical role in the context.
    let token = mint_token(jwt_secret, "GUARDIAN", ChronoDuration::minutes(10));

    let res = client()
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["subject"], "user-1");
    assert_eq!(body["role"], "parent");
    assert_eq!(body["email"], "user1@example.com");
}

#[tokio::test]
async fn whoami_without_identity_is_unauthorized() {
    let srv = TestServer::spawn("test-secret").await;

    let res = client()
        .get(format!("{}/whoami", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
