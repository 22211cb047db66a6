//! Axum HTTP server, routing, and handlers.
//!
//! # Responsibilities
//! - Define the Axum router with all routes and shared middleware.
//! - Translate job outcomes into HTTP status codes and JSON bodies.
//! - Inject shared application state (`AppState`) into handlers.

pub mod handlers;
pub mod router;
pub mod state;
