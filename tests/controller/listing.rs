use axum::http::StatusCode;
use linkdex_test_utils::prelude::*;
use serde_json::json;

use crate::util::{app, body_json, get, json_request, login, send};

fn listing_body() -> serde_json::Value {
    json!({
        "name": "Rust Lang",
        "url": "https://www.rust-lang.org",
        "description": "A language empowering everyone to build reliable software.",
        "category": "tools",
        "tags": ["Rust", "languages"]
    })
}

/// Expect a submitted listing to be pending and hidden from the public index
#[tokio::test]
async fn submits_pending_listing() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_tables()
        .with_category("tools")
        .with_email_endpoint(2)
        .build()
        .await?;
    let app = app(&test);
    let cookie = login(&app, &mut test, "user@example.org").await?;

    let response = send(
        &app,
        json_request("POST", "/api/listings", Some(&cookie), listing_body()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let listing = body_json(response).await;
    assert_eq!(listing["status"], "pending");
    assert_eq!(listing["slug"], "rust-lang");
    assert_eq!(listing["category"], "tools");
    assert_eq!(listing["tags"], json!(["rust", "languages"]));

    let response = send(&app, get("/api/listings/rust-lang", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, get("/api/user/listings", Some(&cookie))).await;
    assert_eq!(body_json(response).await.as_array().map(Vec::len), Some(1));

    test.assert_mocks();

    Ok(())
}

/// Expect 401 when submitting without logging in
#[tokio::test]
async fn rejects_anonymous_submission() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let app = app(&test);

    let response = send(
        &app,
        json_request("POST", "/api/listings", None, listing_body()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// Expect 400 for a description that is too short
#[tokio::test]
async fn rejects_invalid_listing() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_tables()
        .with_category("tools")
        .build()
        .await?;
    let app = app(&test);
    let cookie = login(&app, &mut test, "user@example.org").await?;
    let mut body = listing_body();
    body["description"] = json!("Too short");

    let response = send(
        &app,
        json_request("POST", "/api/listings", Some(&cookie), body),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());

    Ok(())
}

/// Expect approved listings in the paginated public index
#[tokio::test]
async fn lists_visible_listings() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_tables().build().await?;
    let owner = test.user().insert_profile("owner@example.org").await?;
    test.listing().insert_approved_listing(owner.id, "Alpha").await?;
    test.listing().insert_approved_listing(owner.id, "Beta").await?;
    test.listing()
        .insert_listing(owner.id, "Gamma", entity::sea_orm_active_enums::ListingStatus::Pending)
        .await?;
    let app = app(&test);

    let response = send(&app, get("/api/listings?sort=name&per_page=1", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["total"], 2);
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["items"][0]["name"], "Alpha");

    let response = send(&app, get("/api/listings/beta", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

/// Expect 403 when deleting another user's listing
#[tokio::test]
async fn forbids_deleting_foreign_listing() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_tables().build().await?;
    let owner = test.user().insert_profile("owner@example.org").await?;
    let listing = test.listing().insert_approved_listing(owner.id, "Alpha").await?;
    let app = app(&test);
    let cookie = login(&app, &mut test, "intruder@example.org").await?;

    let response = send(
        &app,
        json_request(
            "DELETE",
            &format!("/api/listings/id/{}", listing.id),
            Some(&cookie),
            json!({}),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    Ok(())
}

/// Expect an empty page instead of a failure for a page number far past the end
#[tokio::test]
async fn returns_empty_page_for_huge_page_number() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_tables().build().await?;
    let owner = test.user().insert_profile("owner@example.org").await?;
    test.listing().insert_approved_listing(owner.id, "Alpha").await?;
    let app = app(&test);

    let response = send(&app, get("/api/listings?page=18446744073709551615", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["items"], json!([]));
    assert_eq!(page["total"], 1);

    Ok(())
}
