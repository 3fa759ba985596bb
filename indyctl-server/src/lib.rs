//! indyctl-server: mock REST backend for the indyctl console
//!
//! Serves canned store listings, single stores and disable timeouts
//! under the same paths as the real repository manager, so the client
//! and CLI can be developed and tested without one.

pub mod fixtures;
pub mod http;
pub mod state;

pub use fixtures::Fixtures;
pub use http::{build_router, run_server, ServerConfig, ServerError};
pub use state::AppState;
