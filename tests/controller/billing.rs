use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
};
use linkdex_test_utils::{fixtures::billing::signed_webhook_header, prelude::*};
use serde_json::json;

use crate::util::{app, body_json, json_request, login, send};

fn webhook_request(payload: &str, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/webhooks/stripe")
        .header(CONTENT_TYPE, "application/json");
    if let Some(signature) = signature {
        builder = builder.header("stripe-signature", signature);
    }

    builder.body(Body::from(payload.to_string())).unwrap()
}

/// Expect 400 when the signature header is missing
#[tokio::test]
async fn rejects_unsigned_webhook() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let app = app(&test);
    let payload = billing_factory::mock_event("evt_1", "customer.created", json!({}));

    let response = send(&app, webhook_request(&payload, None)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

/// Expect 400 when the payload was signed with another secret
#[tokio::test]
async fn rejects_tampered_webhook() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let app = app(&test);
    let payload = billing_factory::mock_event("evt_1", "customer.created", json!({}));
    let signature = signed_webhook_header(&payload);
    let tampered = payload.replace("evt_1", "evt_2");

    let response = send(&app, webhook_request(&tampered, Some(&signature))).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

/// Expect a signed event to be acknowledged once and flagged as duplicate afterwards
#[tokio::test]
async fn acknowledges_signed_webhook() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let app = app(&test);
    let payload = billing_factory::mock_event("evt_1", "customer.created", json!({}));
    let signature = signed_webhook_header(&payload);

    let response = send(&app, webhook_request(&payload, Some(&signature))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "received": true, "duplicate": false })
    );

    let response = send(&app, webhook_request(&payload, Some(&signature))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["duplicate"], true);

    Ok(())
}

/// Expect 401 when starting checkout without logging in
#[tokio::test]
async fn requires_login_for_checkout() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let app = app(&test);

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/billing/checkout",
            None,
            json!({ "listing_id": 1, "plan": "pro" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// Expect the portal to fail for a user who never checked out
#[tokio::test]
async fn rejects_portal_without_customer() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_tables().build().await?;
    let app = app(&test);
    let cookie = login(&app, &mut test, "user@example.org").await?;

    let response = send(
        &app,
        json_request("POST", "/api/billing/portal", Some(&cookie), json!({})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}
