//! # REST API Module
//!
//! This module defines all HTTP endpoints for the Code Camp API.
//!
//! ## Endpoint Overview
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/api/camps?includeTalks=` | List camps |
//! | GET | `/api/camps/search?theDate=&includeTalks=` | Camps starting on a date |
//! | GET | `/api/camps/{moniker}?includeTalks=` | One camp |
//! | POST | `/api/camps` | Create camp |
//! | PUT | `/api/camps/{moniker}` | Update camp (partial overlay) |
//! | DELETE | `/api/camps/{moniker}` | Delete camp |
//! | GET | `/health` | Health check |
//!
//! ## Request/Response Format
//!
//! Camp endpoints take and return `CampModel` JSON directly. Failures use
//! the standard envelope:
//!
//! ```json
//! {
//!     "success": false,
//!     "data": null,
//!     "error": {
//!         "code": "ERROR_CODE",
//!         "message": "Human readable message"
//!     }
//! }
//! ```
//!
//! Data-layer failures are always `500` with the message
//! `Database Failure`; details only go to the log.

pub mod routes;
pub mod handlers;

pub use routes::configure_routes;
