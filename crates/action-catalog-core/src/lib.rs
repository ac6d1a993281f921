//! Action Catalog Core
//!
//! Discovers `action.yml` / `action.yaml` manifests across a set of
//! repositories, extracts normalized metadata from each one and assembles
//! an ordered catalog.
//!
//! ## Pipeline
//!
//! - [`locator::ManifestLocator`]: root `action.yml`, root `action.yaml`,
//!   then a repository-scoped code search
//! - [`rate_limit::RateLimitGovernor`]: waits out the search quota window
//! - [`manifest::parse_manifest`]: tolerant YAML parsing into a
//!   [`model::ManifestRecord`]
//! - [`sanitize::sanitize`]: allow-list cleanup of free-text fields
//! - [`orchestrator::CatalogBuilder`]: visibility gating and per-repository
//!   failure isolation

pub mod config;
pub mod error;
pub mod fakes;
pub mod locator;
pub mod manifest;
pub mod model;
pub mod orchestrator;
pub mod output;
pub mod rate_limit;
pub mod redact;
pub mod sanitize;
pub mod telemetry;
pub mod transport;

pub use config::ScanConfig;
pub use error::{CatalogError, Result, TransportError, TransportResult};
pub use locator::{search_query, ManifestLocator, ROOT_MANIFESTS};
pub use manifest::parse_manifest;
pub use model::{
    ActionStep, CatalogEntry, ManifestLocation, ManifestRecord, RepositoryRef, Steps, Visibility,
    UNDEFINED,
};
pub use orchestrator::{CatalogBuilder, CatalogReport, RepoFailure, RepoOutcome, SkipReason};
pub use output::{format_last_updated, CatalogOutput};
pub use rate_limit::{RateLimitGovernor, RateLimitPolicy, SearchQuota};
pub use redact::remove_token;
pub use sanitize::sanitize;
pub use telemetry::init_tracing;
pub use transport::{
    AccessLevel, FileMeta, RepositoryEnumerator, RepositoryInfo, SearchHit, Transport,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
