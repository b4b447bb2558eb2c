//! Moderation and user administration endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use entity::sea_orm_active_enums::{AdminLevel, ListingStatus};
use tower_sessions::Session;

use crate::{
    model::{
        ai::ContentAnalysisDto,
        api::{ErrorDto, PageDto, PageParams},
        listing::{ManagedListingDto, ModerationQuery, RejectListingDto},
        user::{SetAdminLevelDto, UserDto},
    },
    server::{
        controller::util::get_user::get_admin_from_session,
        error::Error,
        model::app::AppState,
        service::{
            ai::AiService, moderation::ModerationService, notification::Notifier,
            user::UserService,
        },
    },
};

/// OpenAPI tag for admin endpoints.
pub static ADMIN_TAG: &str = "admin";

/// Moderation queue: listings in a status, oldest first
///
/// Defaults to pending listings when no status is given.
#[utoipa::path(
    get,
    path = "/api/admin/listings",
    tag = ADMIN_TAG,
    params(ModerationQuery),
    responses(
        (status = 200, description = "Page of listings in the status", body = PageDto<ManagedListingDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Insufficient permissions", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_listings_by_status(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ModerationQuery>,
) -> Result<impl IntoResponse, Error> {
    get_admin_from_session(&state, &session, AdminLevel::Basic).await?;

    let status = query
        .status
        .map(ListingStatus::from)
        .unwrap_or(ListingStatus::Pending);
    let params = PageParams {
        page: query.page,
        per_page: query.per_page,
    };

    let page = ModerationService::new(&state.db, &state.settings)
        .list_by_status(status, &params)
        .await?;

    Ok((StatusCode::OK, Json(page)))
}

/// Approve a pending or rejected listing
#[utoipa::path(
    post,
    path = "/api/admin/listings/{id}/approve",
    tag = ADMIN_TAG,
    params(("id" = i32, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Approved listing", body = ManagedListingDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Insufficient permissions", body = ErrorDto),
        (status = 404, description = "Listing not found", body = ErrorDto),
        (status = 409, description = "Listing already approved", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn approve_listing(
    State(state): State<AppState>,
    session: Session,
    Path(listing_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    get_admin_from_session(&state, &session, AdminLevel::Basic).await?;
    let notifier = Notifier::new(&state.mailer, &state.settings);

    let listing = ModerationService::new(&state.db, &state.settings)
        .approve(listing_id, &notifier)
        .await?;

    Ok((StatusCode::OK, Json(listing)))
}

/// Reject a pending or approved listing with a reason shown to its owner
#[utoipa::path(
    post,
    path = "/api/admin/listings/{id}/reject",
    tag = ADMIN_TAG,
    params(("id" = i32, Path, description = "Listing ID")),
    request_body = RejectListingDto,
    responses(
        (status = 200, description = "Rejected listing", body = ManagedListingDto),
        (status = 400, description = "Missing or overlong reason", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Insufficient permissions", body = ErrorDto),
        (status = 404, description = "Listing not found", body = ErrorDto),
        (status = 409, description = "Listing already rejected", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn reject_listing(
    State(state): State<AppState>,
    session: Session,
    Path(listing_id): Path<i32>,
    Json(body): Json<RejectListingDto>,
) -> Result<impl IntoResponse, Error> {
    get_admin_from_session(&state, &session, AdminLevel::Basic).await?;
    let notifier = Notifier::new(&state.mailer, &state.settings);

    let listing = ModerationService::new(&state.db, &state.settings)
        .reject(listing_id, &body.reason, &notifier)
        .await?;

    Ok((StatusCode::OK, Json(listing)))
}

/// AI content analysis of a listing
#[utoipa::path(
    post,
    path = "/api/admin/listings/{id}/analyze",
    tag = ADMIN_TAG,
    params(("id" = i32, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Content analysis", body = ContentAnalysisDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Insufficient permissions", body = ErrorDto),
        (status = 404, description = "Listing not found", body = ErrorDto),
        (status = 502, description = "AI provider failed or replied without JSON", body = ErrorDto),
        (status = 503, description = "AI features are disabled", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn analyze_listing(
    State(state): State<AppState>,
    session: Session,
    Path(listing_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    get_admin_from_session(&state, &session, AdminLevel::Basic).await?;

    let analysis = AiService::new(&state.db, &state.ai)
        .analyze(listing_id)
        .await?;

    Ok((StatusCode::OK, Json(analysis)))
}

/// List registered users
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = ADMIN_TAG,
    params(PageParams),
    responses(
        (status = 200, description = "Page of users", body = PageDto<UserDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Insufficient permissions", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_users(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, Error> {
    get_admin_from_session(&state, &session, AdminLevel::Basic).await?;

    let page = UserService::new(&state.db).list_users(&params).await?;

    Ok((StatusCode::OK, Json(page)))
}

/// Change another user's admin level
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/admin-level",
    tag = ADMIN_TAG,
    params(("id" = i32, Path, description = "User ID")),
    request_body = SetAdminLevelDto,
    responses(
        (status = 200, description = "Updated user", body = UserDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Only super admins may change admin levels", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 409, description = "Cannot change your own admin level", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn set_admin_level(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
    Json(body): Json<SetAdminLevelDto>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_admin_from_session(&state, &session, AdminLevel::Super).await?;

    let user = UserService::new(&state.db)
        .set_admin_level(&actor, user_id, AdminLevel::from(body.admin_level))
        .await?;

    Ok((StatusCode::OK, Json(user)))
}
