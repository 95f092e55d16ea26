//! Gateway: the HTTP server in front of the analysis repository.
//!
//! Lifecycle:
//! 1. Open the SQLite database and ensure the `analyses` table
//! 2. Build the router (`/analyze`, `/health`, plus host-supplied routes)
//! 3. Serve until Ctrl-C
//!
//! Request validation lives in [`validation`]; every failure leaves the
//! handlers as an [`error::ApiError`].

pub mod analyze_routes;
pub mod error;
pub mod server;
pub mod validation;
