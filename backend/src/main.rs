//! # Code Camp Backend Service
//!
//! This is the main entry point for the Code Camp API. It provides:
//!
//! - REST API for camps (list, get, search by date, create, update, delete)
//! - Mapping between stored entities and the JSON models clients see
//! - PostgreSQL storage, or an in-memory store when no database is configured
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        BACKEND SERVICE                           │
//! │                                                                  │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │  REST API (Actix)                                          │  │
//! │  │  /api/camps  /api/camps/search  /api/camps/{moniker}       │  │
//! │  └───────────────────────────┬───────────────────────────────┘  │
//! │                              │                                   │
//! │  ┌───────────────────────────┴───────────────────────────────┐  │
//! │  │  CampManager  ──── mapping (entity ↔ model)                │  │
//! │  └───────────────────────────┬───────────────────────────────┘  │
//! │                              │                                   │
//! │              ┌───────────────┴───────────────┐                   │
//! │       ┌──────┴──────┐                 ┌──────┴──────┐            │
//! │       │  PostgreSQL │                 │  In-memory  │            │
//! │       └─────────────┘                 └─────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! 1. Copy `.env.example` to `.env` and configure
//! 2. Start the server: `cargo run`
//!
//! The schema is applied on startup. Without `DATABASE_URL` the service
//! runs on the in-memory store.

use std::sync::Arc;
use actix_web::{web, App, HttpServer, middleware};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod db;
mod mapping;
mod models;
mod services;
mod utils;

use config::AppConfig;
use db::{CampRepository, Database, InMemoryCampRepository};
use services::CampManager;

/// Application state shared across all handlers.
pub struct AppState {
    /// Camp service used by every `/api/camps` handler
    pub camp_manager: CampManager,

    /// Application configuration
    pub config: AppConfig,
}

/// Main entry point for the backend service.
///
/// This function:
/// 1. Sets up logging
/// 2. Loads configuration from environment
/// 3. Opens the camp store (PostgreSQL or in-memory)
/// 4. Optionally seeds demo data
/// 5. Launches the HTTP server
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // =========================================
    // STEP 1: Initialize Logging
    // =========================================
    // RUST_LOG overrides the default filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("🚀 Starting Code Camp Backend Service");

    // =========================================
    // STEP 2: Load Configuration
    // =========================================
    dotenvy::dotenv().ok(); // It's okay if .env doesn't exist

    let config = AppConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    info!("📋 Configuration loaded");

    // =========================================
    // STEP 3: Open the Camp Store
    // =========================================
    let repository: Arc<dyn CampRepository> = match &config.database_url {
        Some(url) => {
            let db = Database::connect(url, config.db_pool_max_size)
                .await
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string()))?;

            info!("🗄️  Database connected");

            db.run_migrations()
                .await
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

            info!("📦 Database migrations complete");
            Arc::new(db)
        }
        None => {
            warn!("DATABASE_URL not set, using the in-memory camp store");
            Arc::new(InMemoryCampRepository::new())
        }
    };

    let camp_manager = CampManager::new(repository);

    // =========================================
    // STEP 4: Seed Demo Data
    // =========================================
    if config.seed_demo_data {
        match camp_manager.seed_demo_data().await {
            Ok(true) => info!("🌱 Demo camp seeded"),
            Ok(false) => info!("🌱 Store not empty, demo camp skipped"),
            Err(e) => warn!("Failed to seed demo camp: {}", e),
        }
    }

    // =========================================
    // STEP 5: Create Application State
    // =========================================
    let app_state = Arc::new(AppState {
        camp_manager,
        config: config.clone(),
    });

    // =========================================
    // STEP 6: Start HTTP Server
    // =========================================
    let server_host = app_state.config.server_host.clone();
    let server_port = app_state.config.server_port;

    info!("🌐 Starting HTTP server on {}:{}", server_host, server_port);

    HttpServer::new(move || {
        App::new()
            // Attach shared application state
            .app_data(web::Data::new(app_state.clone()))

            // Add logging middleware
            .wrap(middleware::Logger::default())

            // Configure API routes
            .configure(api::configure_routes)
    })
    .bind((server_host, server_port))?
    .run()
    .await
}
