//! # API Models
//!
//! This module defines the transport structures for the REST API.
//! These are separate from database entities; `crate::mapping` converts
//! between the two.
//!
//! ## Organization
//!
//! - `camp.rs` - Camp, talk and speaker models (request and response bodies)
//! - `requests.rs` - Query-string parameters
//! - `responses.rs` - Error envelope and ancillary responses
//!
//! ## Serialization
//!
//! All models use Serde for JSON serialization/deserialization.
//! Field names are converted to camelCase for JavaScript clients.

pub mod camp;
pub mod requests;
pub mod responses;

pub use camp::*;
pub use requests::*;
pub use responses::*;
