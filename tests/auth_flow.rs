//! End-to-end authorization flow — real router, mock Discord endpoints on
//! an ephemeral listener.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::extract::Json;
use axum::http::{Request, StatusCode, header};
use axum::routing::{get, post};
use chrono::{DateTime, Duration, Utc};
use forms_backend::api::{self, ApiConfig};
use forms_backend::store::MemoryFormStore;
use forms_backend::{DiscordClient, DiscordConfig, SessionCodec, SessionPayload};
use tower::ServiceExt;

const SECRET: &[u8] = b"test-secret";

/// Mock Discord: configurable token and profile endpoints. Returns the
/// base URL and a log of the form bodies posted to the token endpoint.
async fn spawn_provider(
    token_status: StatusCode,
    token_body: serde_json::Value,
    user_status: StatusCode,
    user_body: serde_json::Value,
) -> (String, Arc<Mutex<Vec<String>>>) {
    let exchanges: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new()
        .route(
            "/oauth2/token",
            post({
                let exchanges = exchanges.clone();
                move |body: String| {
                    let token_body = token_body.clone();
                    exchanges.lock().unwrap().push(body);
                    async move { (token_status, Json(token_body)) }
                }
            }),
        )
        .route(
            "/users/@me",
            get({
                move || {
                    let user_body = user_body.clone();
                    async move { (user_status, Json(user_body)) }
                }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), exchanges)
}

fn bearer_json(access: &str) -> serde_json::Value {
    serde_json::json!({
        "access_token": access,
        "refresh_token": "refresh-1",
        "expires_in": 3600,
        "token_type": "Bearer",
    })
}

fn profile_json() -> serde_json::Value {
    serde_json::json!({
        "id": "80351110224678912",
        "username": "nelly",
        "global_name": "Nelly",
    })
}

fn test_app(provider_base: &str, store: Arc<MemoryFormStore>) -> Router {
    let discord = DiscordConfig::new("client-id", "client-secret")
        .with_token_url(format!("{provider_base}/oauth2/token").parse().unwrap())
        .with_user_url(format!("{provider_base}/users/@me").parse().unwrap());
    let config = ApiConfig::new(DiscordClient::new(discord), "test-secret");
    api::router(config, store)
}

fn authorize_request() -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/authorize")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::from(r#"{"token":"auth-code"}"#))
        .unwrap()
}

async fn body_json(body: Body) -> serde_json::Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Pull the signed JWT back out of a Set-Cookie header value.
fn cookie_jwt(set_cookie: &str) -> &str {
    let value = set_cookie
        .strip_prefix("token=JWT ")
        .expect("session cookie with scheme tag");
    value.split(';').next().unwrap()
}

fn session_cookie(refresh: &str, expiry: DateTime<Utc>) -> String {
    let payload = SessionPayload {
        token: "old-access".into(),
        refresh: refresh.into(),
        user_details: serde_json::from_value(profile_json()).unwrap(),
        expiry,
    };
    let jwt = SessionCodec::new(SECRET).encode(&payload).unwrap();
    format!("token=JWT {jwt}")
}

#[tokio::test]
async fn authorize_issues_session() {
    let (provider, exchanges) = spawn_provider(
        StatusCode::OK,
        bearer_json("access-1"),
        StatusCode::OK,
        profile_json(),
    )
    .await;
    let app = test_app(&provider, Arc::new(MemoryFormStore::new()));

    let before = Utc::now();
    let resp = app.oneshot(authorize_request()).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie set")
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.contains("HttpOnly"), "cookie: {set_cookie}");
    assert!(set_cookie.contains("SameSite=Strict"), "cookie: {set_cookie}");
    assert!(set_cookie.contains("Max-Age=3600"), "cookie: {set_cookie}");
    assert!(!set_cookie.contains("Domain="), "cookie: {set_cookie}");

    // The cookie decodes back to the exchanged credentials.
    let payload = SessionCodec::new(SECRET)
        .decode(cookie_jwt(&set_cookie))
        .unwrap();
    assert_eq!(payload.token, "access-1");
    assert_eq!(payload.refresh, "refresh-1");
    assert_eq!(payload.user_details.username, "nelly");

    let body = body_json(resp.into_body()).await;
    assert_eq!(body["username"], "Nelly");

    // Expiry is issuance time plus expires_in, to the second.
    let expiry: DateTime<Utc> = body["expiry"].as_str().unwrap().parse().unwrap();
    let offset = (expiry - before).num_seconds();
    assert!((3600..=3605).contains(&offset), "unexpected expiry offset {offset}");
    assert_eq!(payload.expiry, expiry);

    // The exchange posted an authorization-code grant with the origin's
    // callback as redirect URI.
    let posted = exchanges.lock().unwrap().join("&");
    assert!(posted.contains("grant_type=authorization_code"), "posted: {posted}");
    assert!(posted.contains("code=auth-code"), "posted: {posted}");
    assert!(posted.contains("callback"), "posted: {posted}");
}

#[tokio::test]
async fn authorize_exchange_failure_is_uniform() {
    let (provider, _) = spawn_provider(
        StatusCode::BAD_REQUEST,
        serde_json::json!({ "error": "invalid_grant" }),
        StatusCode::OK,
        profile_json(),
    )
    .await;
    let app = test_app(&provider, Arc::new(MemoryFormStore::new()));

    let resp = app.oneshot(authorize_request()).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    // No cookie mutation on exchange failure.
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(
        body_json(resp.into_body()).await,
        serde_json::json!({ "error": "auth_failure" })
    );
}

#[tokio::test]
async fn authorize_profile_failure_clears_cookie() {
    let (provider, _) = spawn_provider(
        StatusCode::OK,
        bearer_json("access-1"),
        StatusCode::UNAUTHORIZED,
        serde_json::json!({ "message": "401: Unauthorized" }),
    )
    .await;
    let app = test_app(&provider, Arc::new(MemoryFormStore::new()));

    let resp = app.oneshot(authorize_request()).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("removal cookie")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("token="), "cookie: {set_cookie}");
    assert!(set_cookie.contains("Max-Age=0"), "cookie: {set_cookie}");

    assert_eq!(
        body_json(resp.into_body()).await,
        serde_json::json!({ "error": "auth_failure" })
    );
}

#[tokio::test]
async fn refresh_renews_session() {
    let (provider, exchanges) = spawn_provider(
        StatusCode::OK,
        bearer_json("access-2"),
        StatusCode::OK,
        profile_json(),
    )
    .await;
    let app = test_app(&provider, Arc::new(MemoryFormStore::new()));

    let cookie = session_cookie("refresh-old", Utc::now() + Duration::seconds(600));
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/refresh")
                .header(header::COOKIE, cookie)
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("renewed cookie")
        .to_str()
        .unwrap()
        .to_string();
    let payload = SessionCodec::new(SECRET)
        .decode(cookie_jwt(&set_cookie))
        .unwrap();
    assert_eq!(payload.token, "access-2");

    let body = body_json(resp.into_body()).await;
    assert_eq!(body["username"], "Nelly");

    // The embedded refresh credential was exchanged with the refresh grant.
    let posted = exchanges.lock().unwrap().join("&");
    assert!(posted.contains("grant_type=refresh_token"), "posted: {posted}");
    assert!(posted.contains("refresh_token=refresh-old"), "posted: {posted}");
}

#[tokio::test]
async fn refresh_without_cookie_is_unauthenticated() {
    let (provider, _) = spawn_provider(
        StatusCode::OK,
        bearer_json("access-2"),
        StatusCode::OK,
        profile_json(),
    )
    .await;
    let app = test_app(&provider, Arc::new(MemoryFormStore::new()));

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/refresh")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(resp.into_body()).await,
        serde_json::json!({ "error": "auth_failure" })
    );
}

#[tokio::test]
async fn refresh_with_expired_session_is_unauthenticated() {
    let (provider, exchanges) = spawn_provider(
        StatusCode::OK,
        bearer_json("access-2"),
        StatusCode::OK,
        profile_json(),
    )
    .await;
    let app = test_app(&provider, Arc::new(MemoryFormStore::new()));

    let cookie = session_cookie("refresh-old", Utc::now() - Duration::seconds(60));
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/refresh")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    // An expired session never reaches the provider.
    assert!(exchanges.lock().unwrap().is_empty());
}

#[tokio::test]
async fn tampered_cookie_is_unauthenticated() {
    let (provider, _) = spawn_provider(
        StatusCode::OK,
        bearer_json("access-2"),
        StatusCode::OK,
        profile_json(),
    )
    .await;
    let app = test_app(&provider, Arc::new(MemoryFormStore::new()));

    let payload = SessionPayload {
        token: "old-access".into(),
        refresh: "refresh-old".into(),
        user_details: serde_json::from_value(profile_json()).unwrap(),
        expiry: Utc::now() + Duration::seconds(600),
    };
    let jwt = SessionCodec::new(b"some-other-key").encode(&payload).unwrap();

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/refresh")
                .header(header::COOKIE, format!("token=JWT {jwt}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
