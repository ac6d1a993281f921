//! Network seams used by the pipeline.
//!
//! Implement [`Transport`] and [`RepositoryEnumerator`] to plug in a real
//! provider client, or use [`crate::fakes::MemoryTransport`] in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TransportResult;
use crate::model::RepositoryRef;
use crate::rate_limit::SearchQuota;

/// Metadata for a single file in a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    pub path: String,
    pub download_url: Option<String>,
}

/// One code-search match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub path: String,
}

/// Workflow access setting of an internal repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    None,
    User,
    Organization,
    Enterprise,
}

impl AccessLevel {
    /// Whether other repositories may use actions from this one.
    pub fn allows_use(&self) -> bool {
        !matches!(self, AccessLevel::None)
    }
}

/// Repository attributes resolved once per scanned repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    /// `owner/name` of the parent when the repository is a fork.
    pub parent_full_name: Option<String>,
}

/// Every network operation the pipeline performs.
#[async_trait]
pub trait Transport: Send + Sync {
    /// File metadata at `path`, or `None` when nothing is there.
    async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> TransportResult<Option<FileMeta>>;

    /// Run a code search and return the matching paths.
    async fn search_code(&self, query: &str) -> TransportResult<Vec<SearchHit>>;

    async fn get_workflow_access_level(&self, owner: &str, repo: &str)
        -> TransportResult<AccessLevel>;

    /// Current search quota.
    async fn get_rate_limit_status(&self) -> TransportResult<SearchQuota>;

    /// Download a file body by URL.
    async fn fetch_raw(&self, url: &str) -> TransportResult<String>;

    async fn get_repository(&self, owner: &str, repo: &str) -> TransportResult<RepositoryInfo>;

    /// Download URL of the repository README, if it has one.
    async fn get_readme_url(&self, owner: &str, repo: &str) -> TransportResult<Option<String>>;
}

/// Lists the repositories to scan for a user or organization.
#[async_trait]
pub trait RepositoryEnumerator: Send + Sync {
    async fn list_repositories(
        &self,
        user: &str,
        organization: &str,
    ) -> TransportResult<Vec<RepositoryRef>>;
}
