//! # API Route Configuration
//!
//! This module sets up all the HTTP routes for the API.

use actix_web::{error, web, HttpRequest, HttpResponse};

use super::handlers;
use crate::models::ApiResponse;

/// Configure all API routes.
///
/// This function is called from main.rs to set up
/// all the endpoint routes.
///
/// ## Route Structure
///
/// ```text
/// /
/// ├── /health                  GET - Health check
/// └── /api/camps               GET - List, POST - Create
///     ├── /search              GET - By event date
///     └── /{moniker}           GET, PUT, DELETE
/// ```
///
/// `/search` is registered before `/{moniker}` so it is not taken for a
/// moniker.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Root endpoint - API information
        .route("/", web::get().to(handlers::api_info))

        // Health check endpoint
        .route("/health", web::get().to(handlers::health_check))

        // Camp endpoints
        .service(
            web::scope("/api/camps")
                .app_data(json_config())
                .app_data(query_config())

                // List / create
                .route("", web::get().to(handlers::get_camps))
                .route("", web::post().to(handlers::create_camp))

                // Search by event date
                .route("/search", web::get().to(handlers::search_by_date))

                // Single camp
                .route("/{moniker}", web::get().to(handlers::get_camp))
                .route("/{moniker}", web::put().to(handlers::update_camp))
                .route("/{moniker}", web::delete().to(handlers::delete_camp))
        );
}

/// Malformed JSON bodies become a 400 in the standard envelope.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: error::JsonPayloadError, _req: &HttpRequest| {
        let message = err.to_string();
        error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(ApiResponse::<()>::error("INVALID_BODY", &message)),
        )
        .into()
    })
}

/// Malformed query strings become a 400 in the standard envelope.
fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: error::QueryPayloadError, _req: &HttpRequest| {
        let message = err.to_string();
        error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(ApiResponse::<()>::error("INVALID_QUERY", &message)),
        )
        .into()
    })
}
