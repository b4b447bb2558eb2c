//! Router setup and request helpers shared by the HTTP tests.

use axum::{
    body::Body,
    http::{
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        Request, Response, StatusCode,
    },
    Router,
};
use http_body_util::BodyExt;
use linkdex::server::{config::Config, model::app::AppState, router::routes};
use linkdex_test_utils::{fixtures::user::subject_for_email, prelude::*};
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

/// The application router backed by the context's database, mock server and an in-memory
/// session store.
pub fn app(test: &TestContext) -> Router {
    let server_url = test.server_url();
    let config = Config::from_lookup(|key| test_env_var(key, &server_url))
        .expect("test configuration provides every required variable");
    let state = AppState::from_config(test.db.clone(), &config).expect("application state builds");

    routes()
        .with_state(state)
        .layer(SessionManagerLayer::new(MemoryStore::default()).with_secure(false))
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }

    builder.body(Body::empty()).unwrap()
}

pub fn json_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// `name=value` pair of the session cookie set by `response`, if any.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Runs the login flow for `email` against a mocked token endpoint.
///
/// Returns the session cookie of the logged in user.
pub async fn login(
    app: &Router,
    test: &mut TestContext,
    email: &str,
) -> Result<String, TestError> {
    let response = send(app, get("/api/auth/login", None)).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let cookie = session_cookie(&response).expect("login sets a session cookie");
    let authorize_url = reqwest::Url::parse(&location(&response)).unwrap();
    let state = authorize_url
        .query_pairs()
        .find(|(key, _)| key == "state")
        .map(|(_, value)| value.into_owned())
        .expect("authorize URL carries a state");

    let token_endpoint = test
        .auth()
        .create_token_endpoint(&subject_for_email(email), email, 1)?;

    let response = send(
        app,
        get(
            &format!("/api/auth/callback?code=test-code&state={}", state),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/dashboard");
    token_endpoint.assert();

    Ok(session_cookie(&response).unwrap_or(cookie))
}
