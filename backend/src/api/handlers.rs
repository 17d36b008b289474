//! # API Request Handlers
//!
//! This module contains the handler functions for each API endpoint.
//! Each handler:
//! 1. Extracts path, query and body
//! 2. Calls the camp manager
//! 3. Maps the outcome to a status code and body
//!
//! ## Error Handling
//!
//! | `CampError` | Status | Code |
//! |-------------|--------|------|
//! | `NotFound`, `NoCampsOnDate` | 404 | `CAMP_NOT_FOUND` |
//! | `MonikerInUse` | 400 | `MONIKER_IN_USE` |
//! | `InvalidMoniker` | 400 | `INVALID_MONIKER` |
//! | `InvalidInput` | 400 | `INVALID_INPUT` |
//! | `SaveFailed` | 400 | `SAVE_FAILED` |
//! | `Database` | 500 | `DATABASE_FAILURE` |

use std::sync::Arc;
use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;
use tracing::{error, info, warn};

use crate::AppState;
use crate::models::{ApiResponse, CampModel, CampsQuery, HealthResponse, SearchQuery};
use crate::services::CampError;
use crate::utils::parse_event_date;

/// Message returned for every data-layer failure.
const DATABASE_FAILURE: &str = "Database Failure";

/// Turn a camp error into its HTTP response.
///
/// Data-layer errors are logged with `context` and answered without
/// detail.
fn camp_error_response(context: &str, e: &CampError) -> HttpResponse {
    let (status, code, message) = match e {
        CampError::NotFound(_) | CampError::NoCampsOnDate(_) => {
            (StatusCode::NOT_FOUND, "CAMP_NOT_FOUND", e.to_string())
        }
        CampError::MonikerInUse(_) => (StatusCode::BAD_REQUEST, "MONIKER_IN_USE", e.to_string()),
        CampError::InvalidMoniker(_) => (StatusCode::BAD_REQUEST, "INVALID_MONIKER", e.to_string()),
        CampError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT", e.to_string()),
        CampError::SaveFailed(_) => (StatusCode::BAD_REQUEST, "SAVE_FAILED", e.to_string()),
        CampError::Database(db_err) => {
            error!("{} failed: {}", context, db_err);
            return HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("DATABASE_FAILURE", DATABASE_FAILURE));
        }
    };

    warn!("{} rejected: {}", context, e);
    HttpResponse::build(status).json(ApiResponse::<()>::error(code, &message))
}

/// API information endpoint (root).
///
/// ## Endpoint
///
/// `GET /`
pub async fn api_info() -> HttpResponse {
    let info = json!({
        "name": "Code Camp API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Camps, their talks and speakers",
        "endpoints": {
            "health": { "method": "GET", "path": "/health" },
            "camps": {
                "list": { "method": "GET", "path": "/api/camps?includeTalks={bool}" },
                "get": { "method": "GET", "path": "/api/camps/{moniker}?includeTalks={bool}" },
                "search": { "method": "GET", "path": "/api/camps/search?theDate={date}&includeTalks={bool}" },
                "create": { "method": "POST", "path": "/api/camps" },
                "update": { "method": "PUT", "path": "/api/camps/{moniker}" },
                "delete": { "method": "DELETE", "path": "/api/camps/{moniker}" }
            }
        }
    });

    HttpResponse::Ok().json(ApiResponse::success(info))
}

/// Health check endpoint.
///
/// ## Endpoint
///
/// `GET /health`
///
/// ## Response
///
/// ```json
/// {
///     "success": true,
///     "data": {
///         "status": "healthy",
///         "database": true,
///         "version": "0.1.0",
///         "timestamp": "2026-10-16T12:00:00Z"
///     }
/// }
/// ```
pub async fn health_check(
    state: web::Data<Arc<AppState>>,
) -> HttpResponse {
    let db_healthy = state.camp_manager.is_store_healthy().await;

    let response = HealthResponse {
        status: if db_healthy { "healthy" } else { "unhealthy" }.to_string(),
        database: db_healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    };

    let status_code = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    HttpResponse::build(status_code)
        .json(ApiResponse::success(response))
}

/// List camps.
///
/// ## Endpoint
///
/// `GET /api/camps?includeTalks=true`
///
/// ## Example
///
/// ```bash
/// curl "http://127.0.0.1:8080/api/camps?includeTalks=true"
/// ```
pub async fn get_camps(
    state: web::Data<Arc<AppState>>,
    query: web::Query<CampsQuery>,
) -> HttpResponse {
    match state.camp_manager.list_camps(query.include_talks).await {
        Ok(camps) => HttpResponse::Ok().json(camps),
        Err(e) => camp_error_response("List camps", &e),
    }
}

/// Get one camp.
///
/// ## Endpoint
///
/// `GET /api/camps/{moniker}?includeTalks=true`
///
/// ## Errors
///
/// - `CAMP_NOT_FOUND` (404) - No camp with this moniker
pub async fn get_camp(
    state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
    query: web::Query<CampsQuery>,
) -> HttpResponse {
    let moniker = path.into_inner();

    match state.camp_manager.get_camp(&moniker, query.include_talks).await {
        Ok(camp) => HttpResponse::Ok().json(camp),
        Err(e) => camp_error_response("Get camp", &e),
    }
}

/// Search camps by event date.
///
/// ## Endpoint
///
/// `GET /api/camps/search?theDate=2023-10-14&includeTalks=false`
///
/// ## Errors
///
/// - `INVALID_DATE` (400) - `theDate` missing or unparseable
/// - `CAMP_NOT_FOUND` (404) - No camp starts on that date
pub async fn search_by_date(
    state: web::Data<Arc<AppState>>,
    query: web::Query<SearchQuery>,
) -> HttpResponse {
    let query = query.into_inner();

    let date = match query.the_date.as_deref().map(parse_event_date) {
        Some(Ok(date)) => date,
        Some(Err(message)) => {
            return HttpResponse::BadRequest()
                .json(ApiResponse::<()>::error("INVALID_DATE", &message));
        }
        None => {
            return HttpResponse::BadRequest()
                .json(ApiResponse::<()>::error("INVALID_DATE", "theDate is required"));
        }
    };

    match state.camp_manager.search_by_date(date, query.include_talks).await {
        Ok(camps) => HttpResponse::Ok().json(camps),
        Err(e) => camp_error_response("Search camps", &e),
    }
}

/// Create a camp.
///
/// ## Endpoint
///
/// `POST /api/camps`
///
/// ## Example
///
/// ```bash
/// curl -X POST http://127.0.0.1:8080/api/camps \
///   -H "Content-Type: application/json" \
///   -d '{
///     "moniker": "atl2023",
///     "name": "Atlanta Code Camp",
///     "venue": "Tech Square"
///   }'
/// ```
///
/// **Response:** `201 Created`, `Location: /api/camps/atl2023`, body is the
/// stored camp.
///
/// ## Errors
///
/// - `MONIKER_IN_USE` (400)
/// - `INVALID_MONIKER` (400) - Moniker cannot form a URL
/// - `INVALID_INPUT` (400) - Moniker or name missing
/// - `SAVE_FAILED` (400) - The store refused the camp
pub async fn create_camp(
    state: web::Data<Arc<AppState>>,
    body: web::Json<CampModel>,
) -> HttpResponse {
    info!("Create camp request: {:?}", body.moniker);

    match state.camp_manager.create_camp(body.into_inner()).await {
        Ok(created) => HttpResponse::Created()
            .insert_header((header::LOCATION, created.location))
            .json(created.camp),
        Err(e) => camp_error_response("Create camp", &e),
    }
}

/// Update a camp.
///
/// Only the fields present in the body change; talks are never touched.
///
/// ## Endpoint
///
/// `PUT /api/camps/{moniker}`
///
/// ```bash
/// curl -X PUT http://127.0.0.1:8080/api/camps/atl2023 \
///   -H "Content-Type: application/json" \
///   -d '{ "name": "ATL Code Camp" }'
/// ```
pub async fn update_camp(
    state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
    body: web::Json<CampModel>,
) -> HttpResponse {
    let moniker = path.into_inner();
    info!("Update camp request: {}", moniker);

    match state.camp_manager.update_camp(&moniker, body.into_inner()).await {
        Ok(camp) => HttpResponse::Ok().json(camp),
        Err(e) => camp_error_response("Update camp", &e),
    }
}

/// Delete a camp and its talks.
///
/// ## Endpoint
///
/// `DELETE /api/camps/{moniker}`
pub async fn delete_camp(
    state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> HttpResponse {
    let moniker = path.into_inner();
    info!("Delete camp request: {}", moniker);

    match state.camp_manager.delete_camp(&moniker).await {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(e) => camp_error_response("Delete camp", &e),
    }
}
