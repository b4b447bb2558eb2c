//! Category endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use entity::sea_orm_active_enums::AdminLevel;
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        category::{CategoryDto, CategoryInputDto},
    },
    server::{
        controller::util::get_user::get_admin_from_session, error::Error, model::app::AppState,
        service::category::CategoryService,
    },
};

/// OpenAPI tag for category endpoints.
pub static CATEGORY_TAG: &str = "category";

/// List every category
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = CATEGORY_TAG,
    responses(
        (status = 200, description = "All categories by name", body = Vec<CategoryDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let categories = CategoryService::new(&state.db).list().await?;

    Ok((StatusCode::OK, Json(categories)))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/api/admin/categories",
    tag = CATEGORY_TAG,
    request_body = CategoryInputDto,
    responses(
        (status = 201, description = "Created category", body = CategoryDto),
        (status = 400, description = "Invalid category", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Insufficient permissions", body = ErrorDto),
        (status = 409, description = "Slug already in use", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_category(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<CategoryInputDto>,
) -> Result<impl IntoResponse, Error> {
    get_admin_from_session(&state, &session, AdminLevel::Basic).await?;

    let category = CategoryService::new(&state.db).create(input).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Replace a category's slug, name and description
#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    tag = CATEGORY_TAG,
    params(("id" = i32, Path, description = "Category ID")),
    request_body = CategoryInputDto,
    responses(
        (status = 200, description = "Updated category", body = CategoryDto),
        (status = 400, description = "Invalid category", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Insufficient permissions", body = ErrorDto),
        (status = 404, description = "Category not found", body = ErrorDto),
        (status = 409, description = "Slug already in use", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_category(
    State(state): State<AppState>,
    session: Session,
    Path(category_id): Path<i32>,
    Json(input): Json<CategoryInputDto>,
) -> Result<impl IntoResponse, Error> {
    get_admin_from_session(&state, &session, AdminLevel::Basic).await?;

    let category = CategoryService::new(&state.db)
        .update(category_id, input)
        .await?;

    Ok((StatusCode::OK, Json(category)))
}

/// Delete a category, leaving its listings uncategorized
#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    tag = CATEGORY_TAG,
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Insufficient permissions", body = ErrorDto),
        (status = 404, description = "Category not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_category(
    State(state): State<AppState>,
    session: Session,
    Path(category_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    get_admin_from_session(&state, &session, AdminLevel::Basic).await?;

    CategoryService::new(&state.db).delete(category_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
