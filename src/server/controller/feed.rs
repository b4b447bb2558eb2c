//! Sitemap, RSS and llms.txt endpoints.

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
};

use crate::server::{error::Error, model::app::AppState, service::feed::FeedService};

/// OpenAPI tag for feed endpoints.
pub static FEED_TAG: &str = "feed";

/// XML sitemap of localized pages, categories and visible listings
#[utoipa::path(
    get,
    path = "/sitemap.xml",
    tag = FEED_TAG,
    responses(
        (status = 200, description = "Sitemap", body = String, content_type = "application/xml"),
        (status = 500, description = "Internal server error")
    ),
)]
pub async fn sitemap(State(state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let xml = FeedService::new(&state.db, &state.settings).sitemap().await?;

    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, "application/xml; charset=utf-8")],
        xml,
    ))
}

/// RSS 2.0 channel of recently approved listings
#[utoipa::path(
    get,
    path = "/rss.xml",
    tag = FEED_TAG,
    responses(
        (status = 200, description = "RSS channel", body = String, content_type = "application/rss+xml"),
        (status = 500, description = "Internal server error")
    ),
)]
pub async fn rss(State(state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let xml = FeedService::new(&state.db, &state.settings).rss().await?;

    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, "application/rss+xml; charset=utf-8")],
        xml,
    ))
}

/// Markdown summary of the directory for language models
#[utoipa::path(
    get,
    path = "/llms.txt",
    tag = FEED_TAG,
    responses(
        (status = 200, description = "Site summary", body = String, content_type = "text/plain"),
        (status = 500, description = "Internal server error")
    ),
)]
pub async fn llms_txt(State(state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let text = FeedService::new(&state.db, &state.settings)
        .llms_txt()
        .await?;

    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        text,
    ))
}
