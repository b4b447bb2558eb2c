//! HTTP routing and OpenAPI documentation configuration.
//!
//! Every API endpoint is registered here with its OpenAPI specification, and Swagger UI is
//! served at `/api/docs` for interactive API documentation.

use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{controller, model::app::AppState};

/// Builds the application's HTTP router with all API endpoints, feeds and Swagger UI.
///
/// The OpenAPI specification is available at `/api/docs/openapi.json`. The router still needs
/// its state and a session layer before it can serve requests.
///
/// # Example
/// ```ignore
/// let router = routes().with_state(app_state).layer(session_layer);
/// ```
pub fn routes() -> Router<AppState> {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Linkdex", description = "Linkdex link directory API"),
        tags(
            (name = controller::health::HEALTH_TAG, description = "Service health"),
            (name = controller::auth::AUTH_TAG, description = "Authentication API routes"),
            (name = controller::user::USER_TAG, description = "Logged in user routes"),
            (name = controller::listing::LISTING_TAG, description = "Listing submission and browsing"),
            (name = controller::category::CATEGORY_TAG, description = "Listing categories"),
            (name = controller::admin::ADMIN_TAG, description = "Moderation and user administration"),
            (name = controller::billing::BILLING_TAG, description = "Subscription billing"),
            (name = controller::ai::AI_TAG, description = "AI assisted metadata and translation"),
            (name = controller::i18n::I18N_TAG, description = "Localized message catalogs"),
            (name = controller::feed::FEED_TAG, description = "Sitemap, RSS and llms.txt feeds"),
        )
    )]
    struct ApiDoc;

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(controller::health::health))
        .routes(routes!(controller::auth::login))
        .routes(routes!(controller::auth::callback))
        .routes(routes!(controller::auth::logout))
        .routes(routes!(controller::auth::get_user))
        .routes(routes!(controller::user::get_user_listings))
        .routes(routes!(
            controller::listing::list_listings,
            controller::listing::submit_listing
        ))
        .routes(routes!(controller::listing::get_listing))
        .routes(routes!(
            controller::listing::update_listing,
            controller::listing::delete_listing
        ))
        .routes(routes!(controller::category::list_categories))
        .routes(routes!(controller::category::create_category))
        .routes(routes!(
            controller::category::update_category,
            controller::category::delete_category
        ))
        .routes(routes!(controller::admin::list_listings_by_status))
        .routes(routes!(controller::admin::approve_listing))
        .routes(routes!(controller::admin::reject_listing))
        .routes(routes!(controller::admin::analyze_listing))
        .routes(routes!(controller::admin::list_users))
        .routes(routes!(controller::admin::set_admin_level))
        .routes(routes!(controller::billing::checkout))
        .routes(routes!(controller::billing::portal))
        .routes(routes!(controller::billing::stripe_webhook))
        .routes(routes!(controller::ai::suggest))
        .routes(routes!(controller::ai::translate))
        .routes(routes!(controller::i18n::get_locales))
        .routes(routes!(controller::i18n::get_messages))
        .routes(routes!(controller::feed::sitemap))
        .routes(routes!(controller::feed::rss))
        .routes(routes!(controller::feed::llms_txt))
        .split_for_parts();

    routes
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
        .layer(TraceLayer::new_for_http())
}
