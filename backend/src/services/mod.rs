//! # Services Module
//!
//! Business logic between the HTTP handlers and the camp store.
//!
//! ## Services Overview
//!
//! | Service | Responsibility |
//! |---------|---------------|
//! | `CampManager` | Camp lookups, search, create/update/delete |
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    CampManager                           │
//! │  • list_camps()   • get_camp()     • search_by_date()    │
//! │  • create_camp()  • update_camp()  • delete_camp()       │
//! └────────────────────────────┬─────────────────────────────┘
//!                              │
//!              ┌───────────────┴───────────────┐
//!              ▼                               ▼
//!      ┌──────────────┐               ┌──────────────────┐
//!      │   mapping    │               │ dyn CampRepository│
//!      │ entity↔model │               │                  │
//!      └──────────────┘               └──────────────────┘
//! ```

pub mod camp_manager;

pub use camp_manager::{CampError, CampManager, CreatedCamp};
