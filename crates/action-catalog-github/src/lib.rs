//! GitHub transport for the action catalog
//!
//! Provides [`GithubClient`], a `reqwest`-based implementation of the
//! core crate's `Transport` and `RepositoryEnumerator` traits, together with
//! its configuration and error types.

pub mod client;
pub mod config;
pub mod error;
mod payload;

pub use client::GithubClient;
pub use config::{GithubConfig, API_VERSION, PUBLIC_API_URL};
pub use error::GithubError;

/// Result type for GitHub client operations
pub type Result<T> = std::result::Result<T, GithubError>;
