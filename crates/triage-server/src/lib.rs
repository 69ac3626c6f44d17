//! HTTP surface for the triage pipeline.

pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod server;

pub use config::ServerConfig;
pub use error::ApiError;
pub use server::{build_router, start, AppState, ServerHandle};
