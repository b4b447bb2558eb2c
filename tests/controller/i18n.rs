use axum::{
    body::Body,
    http::{header::ACCEPT_LANGUAGE, Request, StatusCode},
};
use linkdex_test_utils::prelude::*;

use crate::util::{app, body_json, get, send};

/// Expect the locale to be negotiated from Accept-Language
#[tokio::test]
async fn negotiates_locale_from_header() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let app = app(&test);
    let request = Request::builder()
        .uri("/api/i18n")
        .header(ACCEPT_LANGUAGE, "fr;q=0.9, de-AT;q=0.8")
        .body(Body::empty())
        .unwrap();

    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let locales = body_json(response).await;
    assert_eq!(locales["locale"], "de");
    assert_eq!(locales["default_locale"], "en");
    assert_eq!(locales["locales"].as_array().map(Vec::len), Some(3));

    Ok(())
}

/// Expect an explicit locale parameter to win over the header
#[tokio::test]
async fn prefers_query_locale() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let app = app(&test);

    let response = send(&app, get("/api/i18n?locale=es", None)).await;

    assert_eq!(body_json(response).await["locale"], "es");

    Ok(())
}

/// Expect a message catalog for supported locales and 404 otherwise
#[tokio::test]
async fn serves_message_catalogs() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let app = app(&test);

    let response = send(&app, get("/api/i18n/es", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let catalog = body_json(response).await;
    assert_eq!(catalog["locale"], "es");
    assert!(catalog["messages"].as_object().is_some_and(|m| !m.is_empty()));

    let response = send(&app, get("/api/i18n/xx", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}
