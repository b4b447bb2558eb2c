//! Endpoints for the logged in user.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::{api::ErrorDto, listing::ManagedListingDto},
    server::{
        controller::util::get_user::get_user_from_session, error::Error, model::app::AppState,
        service::listing::ListingService,
    },
};

/// OpenAPI tag for user endpoints.
pub static USER_TAG: &str = "user";

/// Get every listing owned by the logged in user, in any status
#[utoipa::path(
    get,
    path = "/api/user/listings",
    tag = USER_TAG,
    responses(
        (status = 200, description = "Listings owned by the user", body = Vec<ManagedListingDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_user_listings(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let listings = ListingService::new(&state.db).list_own(&user).await?;

    Ok((StatusCode::OK, Json(listings)))
}
