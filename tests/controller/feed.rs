use axum::http::{header::CONTENT_TYPE, StatusCode};
use linkdex_test_utils::prelude::*;

use crate::util::{app, body_text, get, send};

fn content_type(response: &axum::http::Response<axum::body::Body>) -> String {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Expect the sitemap to list pages, categories and visible listings
#[tokio::test]
async fn serves_sitemap() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_tables()
        .with_category("tools")
        .build()
        .await?;
    let owner = test.user().insert_profile("owner@example.org").await?;
    test.listing().insert_approved_listing(owner.id, "Alpha").await?;
    let app = app(&test);

    let response = send(&app, get("/sitemap.xml", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("application/xml"));
    let xml = body_text(response).await;
    assert!(xml.contains(&format!("<loc>{}/category/tools</loc>", TEST_SITE_URL)));
    assert!(xml.contains(&format!("<loc>{}/listing/alpha</loc>", TEST_SITE_URL)));

    Ok(())
}

/// Expect approved listings as RSS items and pending listings left out
#[tokio::test]
async fn serves_rss() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_tables().build().await?;
    let owner = test.user().insert_profile("owner@example.org").await?;
    test.listing().insert_approved_listing(owner.id, "Alpha").await?;
    test.listing()
        .insert_listing(owner.id, "Beta", entity::sea_orm_active_enums::ListingStatus::Pending)
        .await?;
    let app = app(&test);

    let response = send(&app, get("/rss.xml", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("application/rss+xml"));
    let xml = body_text(response).await;
    assert!(xml.contains("<title>Alpha</title>"));
    assert!(!xml.contains("<title>Beta</title>"));

    Ok(())
}

/// Expect a plain text summary headed by the site name
#[tokio::test]
async fn serves_llms_txt() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let app = app(&test);

    let response = send(&app, get("/llms.txt", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("text/plain"));
    let text = body_text(response).await;
    assert!(text.starts_with(&format!("# {}", TEST_SITE_NAME)));
    assert!(text.contains("No listings yet."));

    Ok(())
}
