use axum::http::StatusCode;
use linkdex_test_utils::prelude::*;

use crate::util::{app, body_json, body_text, get, send};

/// Expect 200 with an ok status when the database is reachable
#[tokio::test]
async fn reports_healthy() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let app = app(&test);

    let response = send(&app, get("/api/health", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");

    Ok(())
}

/// Expect the OpenAPI document to describe the API
#[tokio::test]
async fn serves_openapi_document() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let app = app(&test);

    let response = send(&app, get("/api/docs/openapi.json", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let document = body_text(response).await;
    assert!(document.contains("/api/listings"));
    assert!(document.contains("/api/webhooks/stripe"));

    Ok(())
}
