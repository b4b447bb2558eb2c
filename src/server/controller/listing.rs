//! Public listing and owner listing endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, PageDto},
        listing::{ListingDto, ListingInputDto, ListingQuery, ManagedListingDto},
    },
    server::{
        controller::util::get_user::get_user_from_session,
        error::Error,
        model::app::AppState,
        service::{listing::ListingService, notification::Notifier},
    },
};

/// OpenAPI tag for listing endpoints.
pub static LISTING_TAG: &str = "listing";

/// Browse publicly visible listings
#[utoipa::path(
    get,
    path = "/api/listings",
    tag = LISTING_TAG,
    params(ListingQuery),
    responses(
        (status = 200, description = "Page of visible listings", body = PageDto<ListingDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_listings(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<impl IntoResponse, Error> {
    let page = ListingService::new(&state.db).list_public(query).await?;

    Ok((StatusCode::OK, Json(page)))
}

/// Submit a listing for moderation
#[utoipa::path(
    post,
    path = "/api/listings",
    tag = LISTING_TAG,
    request_body = ListingInputDto,
    responses(
        (status = 201, description = "Listing submitted and pending review", body = ManagedListingDto),
        (status = 400, description = "Invalid listing", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Category not found", body = ErrorDto),
        (status = 409, description = "URL already listed", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn submit_listing(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<ListingInputDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;
    let notifier = Notifier::new(&state.mailer, &state.settings);

    let listing = ListingService::new(&state.db)
        .submit(&user, input, &notifier)
        .await?;

    Ok((StatusCode::CREATED, Json(listing)))
}

/// Get a publicly visible listing by slug
#[utoipa::path(
    get,
    path = "/api/listings/{slug}",
    tag = LISTING_TAG,
    params(("slug" = String, Path, description = "Listing slug")),
    responses(
        (status = 200, description = "Visible listing", body = ListingDto),
        (status = 404, description = "Listing not found or not visible", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_listing(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let listing = ListingService::new(&state.db).get_public(&slug).await?;

    Ok((StatusCode::OK, Json(listing)))
}

/// Edit an owned listing, sending it back to moderation
#[utoipa::path(
    put,
    path = "/api/listings/id/{id}",
    tag = LISTING_TAG,
    params(("id" = i32, Path, description = "Listing ID")),
    request_body = ListingInputDto,
    responses(
        (status = 200, description = "Updated listing", body = ManagedListingDto),
        (status = 400, description = "Invalid listing", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Listing owned by another user", body = ErrorDto),
        (status = 404, description = "Listing not found", body = ErrorDto),
        (status = 409, description = "URL already listed", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_listing(
    State(state): State<AppState>,
    session: Session,
    Path(listing_id): Path<i32>,
    Json(input): Json<ListingInputDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let listing = ListingService::new(&state.db)
        .update(&user, listing_id, input)
        .await?;

    Ok((StatusCode::OK, Json(listing)))
}

/// Delete a listing owned by the user, or any listing as a super admin
#[utoipa::path(
    delete,
    path = "/api/listings/id/{id}",
    tag = LISTING_TAG,
    params(("id" = i32, Path, description = "Listing ID")),
    responses(
        (status = 204, description = "Listing deleted"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Listing owned by another user", body = ErrorDto),
        (status = 404, description = "Listing not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_listing(
    State(state): State<AppState>,
    session: Session,
    Path(listing_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    ListingService::new(&state.db)
        .delete(&user, listing_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
