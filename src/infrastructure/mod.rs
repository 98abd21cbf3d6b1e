//! Infrastructure layer - external adapters (HTTP API, filesystem).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod api_client;
pub mod auth_context;
pub mod config;
#[cfg(test)]
pub mod mock_api;
pub mod token_store;

pub use api_client::ApiClient;
pub use auth_context::AuthContext;
pub use config::{ensure_config_exists, load_config, save_config};
pub use token_store::{FileTokenStore, TokenStore};
