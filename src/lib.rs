//! Personal task board backend: user accounts, JWT sessions and
//! per-user task CRUD over axum.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;
pub mod token;

pub use routes::routes;
pub use state::AppState;
