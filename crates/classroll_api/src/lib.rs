//! HTTP surface for the class roll registry.
//!
//! # Responsibility
//! - Parse requests, invoke exactly one registry operation, and render the
//!   JSON response envelope.
//! - Own process bootstrap: configuration, logging, store opening, and the
//!   server lifecycle.
//!
//! # Invariants
//! - Registry semantics live in `classroll_core`; this crate never decides
//!   uniqueness or referential integrity itself.
//! - The store connection is opened once and shared behind a mutex.

pub mod config;
pub mod error;
pub mod handler;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use handler::routes::{create_router, App};
pub use handler::ApiResponse;
pub use server::Server;
pub use state::AppState;
