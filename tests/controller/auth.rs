use axum::http::StatusCode;
use linkdex_test_utils::prelude::*;

use crate::util::{app, body_json, get, location, login, send, session_cookie};

/// Expect a redirect to the auth provider carrying a CSRF state
#[tokio::test]
async fn login_redirects_to_provider() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let app = app(&test);

    let response = send(&app, get("/api/auth/login", None)).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert!(session_cookie(&response).is_some());
    let location = location(&response);
    assert!(location.starts_with(&format!("{}/auth/v1/authorize", test.server_url())));
    assert!(location.contains("state="));

    Ok(())
}

/// Expect the logged in user to be returned after the callback
#[tokio::test]
async fn logs_in_and_returns_user() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_tables().build().await?;
    let app = app(&test);

    let cookie = login(&app, &mut test, "user@example.org").await?;
    let response = send(&app, get("/api/auth/user", Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let user = body_json(response).await;
    assert_eq!(user["email"], "user@example.org");
    assert_eq!(user["admin_level"], "none");

    Ok(())
}

/// Expect configured super admin emails to log in as super admins
#[tokio::test]
async fn promotes_super_admin_email() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_tables().build().await?;
    let app = app(&test);

    let cookie = login(&app, &mut test, TEST_SUPER_ADMIN_EMAIL).await?;
    let response = send(&app, get("/api/auth/user", Some(&cookie))).await;

    assert_eq!(body_json(response).await["admin_level"], "super");

    Ok(())
}

/// Expect 401 without a logged in user
#[tokio::test]
async fn returns_unauthorized_without_session() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let app = app(&test);

    let response = send(&app, get("/api/auth/user", None)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// Expect 400 when the callback state does not match the stored one
#[tokio::test]
async fn rejects_mismatched_state() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let app = app(&test);

    let response = send(&app, get("/api/auth/login", None)).await;
    let cookie = session_cookie(&response).unwrap();

    let response = send(
        &app,
        get(
            "/api/auth/callback?code=test-code&state=forged",
            Some(&cookie),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

/// Expect logout to end the session
#[tokio::test]
async fn logout_clears_session() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_tables().build().await?;
    let app = app(&test);
    let cookie = login(&app, &mut test, "user@example.org").await?;

    let response = send(&app, get("/api/auth/logout", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/");

    let response = send(&app, get("/api/auth/user", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}
