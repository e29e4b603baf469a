//! # Mokai API
//!
//! HTTP boundary for the Essential Eight compliance tracker.
//!
//! This crate contains:
//! - The application context (dependency wiring)
//! - axum route handlers for the boundary operations
//! - Error-to-status mapping
//!
//! The handlers are thin: every operation delegates to the compliance
//! service and reflects its result as JSON.

pub mod context;
pub mod error;
pub mod routes;

pub use context::AppContext;
pub use routes::router;
