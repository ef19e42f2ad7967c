//! FraudScan Server
//!
//! HTTP API for job-posting fraud predictions.

pub mod config;
pub mod routes;
pub mod smoke;
pub mod state;

pub use config::{ConfigOverrides, ServerConfig};
pub use routes::{cors_layer, create_router};
pub use state::AppState;
