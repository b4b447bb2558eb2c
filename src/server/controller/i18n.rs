//! Locale and message catalog endpoints.

use axum::{
    extract::{Path, Query},
    http::{header::ACCEPT_LANGUAGE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    model::{
        api::ErrorDto,
        i18n::{LocaleQuery, LocalesDto, MessagesDto},
    },
    server::{
        error::error_response,
        util::i18n::{self, DEFAULT_LOCALE, SUPPORTED_LOCALES},
    },
};

/// OpenAPI tag for locale endpoints.
pub static I18N_TAG: &str = "i18n";

/// Supported locales and the locale negotiated for this request
#[utoipa::path(
    get,
    path = "/api/i18n",
    tag = I18N_TAG,
    params(LocaleQuery),
    responses(
        (status = 200, description = "Supported and negotiated locales", body = LocalesDto)
    ),
)]
pub async fn get_locales(
    headers: HeaderMap,
    Query(query): Query<LocaleQuery>,
) -> impl IntoResponse {
    let accept_language = headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());

    let locale = i18n::negotiate(query.locale.as_deref(), accept_language);

    Json(LocalesDto {
        default_locale: DEFAULT_LOCALE.to_string(),
        locales: SUPPORTED_LOCALES.iter().map(|l| l.to_string()).collect(),
        locale: locale.to_string(),
    })
}

/// Message catalog for a locale
#[utoipa::path(
    get,
    path = "/api/i18n/{locale}",
    tag = I18N_TAG,
    params(("locale" = String, Path, description = "Locale code such as en or de")),
    responses(
        (status = 200, description = "Messages for the locale", body = MessagesDto),
        (status = 404, description = "Locale not supported", body = ErrorDto)
    ),
)]
pub async fn get_messages(Path(locale): Path<String>) -> Response {
    let Some(supported) = i18n::supported_locale(&locale) else {
        tracing::debug!("Requested unsupported locale {:?}", locale);

        return error_response(StatusCode::NOT_FOUND, "Locale not supported");
    };
    let messages = i18n::messages(supported).unwrap_or_default();

    (
        StatusCode::OK,
        Json(MessagesDto {
            locale: supported.to_string(),
            messages,
        }),
    )
        .into_response()
}
