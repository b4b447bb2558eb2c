//! AI assisted submission endpoints.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use entity::sea_orm_active_enums::AdminLevel;
use tower_sessions::Session;

use crate::{
    model::{
        ai::{ListingSuggestionDto, SuggestRequestDto, TranslateRequestDto, TranslationDto},
        api::ErrorDto,
    },
    server::{
        controller::util::get_user::{get_admin_from_session, get_user_from_session},
        error::Error,
        model::app::AppState,
        service::ai::AiService,
    },
};

/// OpenAPI tag for AI endpoints.
pub static AI_TAG: &str = "ai";

/// Suggest listing metadata for a website URL
#[utoipa::path(
    post,
    path = "/api/ai/suggest",
    tag = AI_TAG,
    request_body = SuggestRequestDto,
    responses(
        (status = 200, description = "Suggested name, description, category and tags", body = ListingSuggestionDto),
        (status = 400, description = "Invalid URL", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 422, description = "Website could not be fetched", body = ErrorDto),
        (status = 502, description = "AI provider failed or replied without JSON", body = ErrorDto),
        (status = 503, description = "AI features are disabled", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn suggest(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<SuggestRequestDto>,
) -> Result<impl IntoResponse, Error> {
    get_user_from_session(&state, &session).await?;

    let suggestion = AiService::new(&state.db, &state.ai)
        .suggest(&request.url)
        .await?;

    Ok((StatusCode::OK, Json(suggestion)))
}

/// Translate text into a supported locale
#[utoipa::path(
    post,
    path = "/api/ai/translate",
    tag = AI_TAG,
    request_body = TranslateRequestDto,
    responses(
        (status = 200, description = "Translated text", body = TranslationDto),
        (status = 400, description = "Empty or overlong text, or unsupported locale", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Insufficient permissions", body = ErrorDto),
        (status = 502, description = "AI provider failed", body = ErrorDto),
        (status = 503, description = "AI features are disabled", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn translate(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<TranslateRequestDto>,
) -> Result<impl IntoResponse, Error> {
    get_admin_from_session(&state, &session, AdminLevel::Basic).await?;

    let translation = AiService::new(&state.db, &state.ai)
        .translate(&request.text, &request.locale)
        .await?;

    Ok((StatusCode::OK, Json(translation)))
}
