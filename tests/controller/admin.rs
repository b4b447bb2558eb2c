use axum::http::StatusCode;
use entity::sea_orm_active_enums::ListingStatus;
use linkdex_test_utils::prelude::*;
use serde_json::json;

use crate::util::{app, body_json, get, json_request, login, send};

/// Expect 403 for users without an admin level
#[tokio::test]
async fn forbids_regular_users() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_tables().build().await?;
    let app = app(&test);
    let cookie = login(&app, &mut test, "user@example.org").await?;

    let response = send(&app, get("/api/admin/listings", Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    Ok(())
}

/// Expect the pending queue, approval and the listing becoming public
#[tokio::test]
async fn approves_pending_listing() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_tables()
        .with_email_endpoint(1)
        .build()
        .await?;
    let owner = test.user().insert_profile("owner@example.org").await?;
    let listing = test
        .listing()
        .insert_listing(owner.id, "Alpha", ListingStatus::Pending)
        .await?;
    let app = app(&test);
    let cookie = login(&app, &mut test, TEST_SUPER_ADMIN_EMAIL).await?;

    let response = send(&app, get("/api/admin/listings", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["total"], 1);

    let response = send(
        &app,
        json_request(
            "POST",
            &format!("/api/admin/listings/{}/approve", listing.id),
            Some(&cookie),
            json!({}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "approved");

    let response = send(&app, get("/api/listings/alpha", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    test.assert_mocks();

    Ok(())
}

/// Expect 409 when approving an already approved listing
#[tokio::test]
async fn conflicts_on_repeated_approval() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_tables().build().await?;
    let owner = test.user().insert_profile("owner@example.org").await?;
    let listing = test.listing().insert_approved_listing(owner.id, "Alpha").await?;
    let app = app(&test);
    let cookie = login(&app, &mut test, TEST_SUPER_ADMIN_EMAIL).await?;

    let response = send(
        &app,
        json_request(
            "POST",
            &format!("/api/admin/listings/{}/approve", listing.id),
            Some(&cookie),
            json!({}),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);

    Ok(())
}

/// Expect super admins to grant basic admin to another user
#[tokio::test]
async fn sets_admin_level() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_tables().build().await?;
    let target = test.user().insert_profile("mod@example.org").await?;
    let app = app(&test);
    let cookie = login(&app, &mut test, TEST_SUPER_ADMIN_EMAIL).await?;

    let response = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/admin/users/{}/admin-level", target.id),
            Some(&cookie),
            json!({ "admin_level": "basic" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["admin_level"], "basic");

    let response = send(&app, get("/api/admin/users", Some(&cookie))).await;
    assert_eq!(body_json(response).await["total"], 2);

    Ok(())
}

/// Expect basic admins to manage categories
#[tokio::test]
async fn creates_category() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_tables().build().await?;
    let app = app(&test);
    let cookie = login(&app, &mut test, TEST_SUPER_ADMIN_EMAIL).await?;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/admin/categories",
            Some(&cookie),
            json!({ "name": "Developer Tools" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&app, get("/api/categories", None)).await;
    let categories = body_json(response).await;
    assert_eq!(categories[0]["slug"], "developer-tools");

    Ok(())
}

/// Expect admin pages to tolerate page numbers far past the end
#[tokio::test]
async fn returns_empty_admin_pages_for_huge_page_number() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_tables().build().await?;
    let app = app(&test);
    let cookie = login(&app, &mut test, TEST_SUPER_ADMIN_EMAIL).await?;

    for uri in [
        "/api/admin/listings?page=18446744073709551615",
        "/api/admin/users?page=18446744073709551615&per_page=100",
    ] {
        let response = send(&app, get(uri, Some(&cookie))).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["items"], json!([]));
    }

    Ok(())
}
