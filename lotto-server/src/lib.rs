//! HTTP service around the lotto game generator, with account management.

pub mod auth;
pub mod config;
pub mod rest;

pub use auth::{AuthError, AuthPolicy, AuthService};
pub use config::ServerConfig;
pub use rest::{router, AppContext};
