//! In-memory fakes for the transport traits (testing only)
//!
//! [`MemoryTransport`] serves canned files, search hits and settings, and
//! records every call so tests can assert on strategy ordering.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{TransportError, TransportResult};
use crate::model::RepositoryRef;
use crate::rate_limit::SearchQuota;
use crate::transport::{
    AccessLevel, FileMeta, RepositoryEnumerator, RepositoryInfo, SearchHit, Transport,
};

/// Base of the synthetic download URLs handed out by [`MemoryTransport`].
pub const RAW_BASE: &str = "https://raw.example.test";

/// Canned provider backed by hash maps.
#[derive(Debug)]
pub struct MemoryTransport {
    repositories: Vec<RepositoryRef>,
    files: HashMap<String, TransportResult<FileMeta>>,
    bodies: HashMap<String, TransportResult<String>>,
    searches: HashMap<String, Vec<SearchHit>>,
    access: HashMap<String, TransportResult<AccessLevel>>,
    parents: HashMap<String, String>,
    readmes: HashMap<String, String>,
    quota: SearchQuota,
    calls: Mutex<Vec<String>>,
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self {
            repositories: Vec::new(),
            files: HashMap::new(),
            bodies: HashMap::new(),
            searches: HashMap::new(),
            access: HashMap::new(),
            parents: HashMap::new(),
            readmes: HashMap::new(),
            quota: SearchQuota {
                remaining: 30,
                reset_epoch_seconds: 0,
            },
            calls: Mutex::new(Vec::new()),
        }
    }
}

fn file_key(owner: &str, repo: &str, path: &str) -> String {
    format!("{owner}/{repo}/{path}")
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a repository to the enumerator listing.
    pub fn with_repository(mut self, repo: RepositoryRef) -> Self {
        self.repositories.push(repo);
        self
    }

    /// Serve a manifest at `path` with a download URL returning `body`.
    pub fn with_manifest(mut self, repo: &RepositoryRef, path: &str, body: &str) -> Self {
        let key = file_key(&repo.owner, &repo.name, path);
        let url = format!("{RAW_BASE}/{key}");
        self.files.insert(
            key,
            Ok(FileMeta {
                name: path.rsplit('/').next().unwrap_or(path).to_string(),
                path: path.to_string(),
                download_url: Some(url.clone()),
            }),
        );
        self.bodies.insert(url, Ok(body.to_string()));
        self
    }

    /// Serve file metadata without a download URL.
    pub fn with_undownloadable_file(mut self, repo: &RepositoryRef, path: &str) -> Self {
        self.files.insert(
            file_key(&repo.owner, &repo.name, path),
            Ok(FileMeta {
                name: path.rsplit('/').next().unwrap_or(path).to_string(),
                path: path.to_string(),
                download_url: None,
            }),
        );
        self
    }

    /// Fail the metadata lookup of `path` with `error`.
    pub fn with_content_error(
        mut self,
        repo: &RepositoryRef,
        path: &str,
        error: TransportError,
    ) -> Self {
        self.files
            .insert(file_key(&repo.owner, &repo.name, path), Err(error));
        self
    }

    /// Fail the raw download of the manifest at `path` with `error`.
    pub fn with_download_error(
        mut self,
        repo: &RepositoryRef,
        path: &str,
        error: TransportError,
    ) -> Self {
        let url = format!("{RAW_BASE}/{}", file_key(&repo.owner, &repo.name, path));
        self.bodies.insert(url, Err(error));
        self
    }

    pub fn with_search_hits(mut self, query: &str, paths: &[&str]) -> Self {
        self.searches.insert(
            query.to_string(),
            paths
                .iter()
                .map(|p| SearchHit {
                    path: p.to_string(),
                })
                .collect(),
        );
        self
    }

    pub fn with_access_level(mut self, repo: &RepositoryRef, level: AccessLevel) -> Self {
        self.access.insert(repo.full_name(), Ok(level));
        self
    }

    pub fn with_access_error(mut self, repo: &RepositoryRef, error: TransportError) -> Self {
        self.access.insert(repo.full_name(), Err(error));
        self
    }

    pub fn with_parent(mut self, repo: &RepositoryRef, parent: &str) -> Self {
        self.parents.insert(repo.full_name(), parent.to_string());
        self
    }

    pub fn with_readme(mut self, repo: &RepositoryRef, url: &str) -> Self {
        self.readmes.insert(repo.full_name(), url.to_string());
        self
    }

    pub fn with_quota(mut self, quota: SearchQuota) -> Self {
        self.quota = quota;
        self
    }

    /// Calls made so far, e.g. `content:owner/repo/action.yml`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> TransportResult<Option<FileMeta>> {
        let key = file_key(owner, repo, path);
        self.record(format!("content:{key}"));
        self.files.get(&key).cloned().transpose()
    }

    async fn search_code(&self, query: &str) -> TransportResult<Vec<SearchHit>> {
        self.record(format!("search:{query}"));
        Ok(self.searches.get(query).cloned().unwrap_or_default())
    }

    async fn get_workflow_access_level(
        &self,
        owner: &str,
        repo: &str,
    ) -> TransportResult<AccessLevel> {
        let key = format!("{owner}/{repo}");
        self.record(format!("access:{key}"));
        self.access
            .get(&key)
            .cloned()
            .unwrap_or(Ok(AccessLevel::Organization))
    }

    async fn get_rate_limit_status(&self) -> TransportResult<SearchQuota> {
        self.record("rate_limit".to_string());
        Ok(self.quota)
    }

    async fn fetch_raw(&self, url: &str) -> TransportResult<String> {
        self.record(format!("raw:{url}"));
        self.bodies.get(url).cloned().unwrap_or_else(|| {
            Err(TransportError::Http {
                status: 404,
                message: format!("no body for {url}"),
            })
        })
    }

    async fn get_repository(&self, owner: &str, repo: &str) -> TransportResult<RepositoryInfo> {
        let key = format!("{owner}/{repo}");
        self.record(format!("repo:{key}"));
        Ok(RepositoryInfo {
            parent_full_name: self.parents.get(&key).cloned(),
        })
    }

    async fn get_readme_url(&self, owner: &str, repo: &str) -> TransportResult<Option<String>> {
        let key = format!("{owner}/{repo}");
        self.record(format!("readme:{key}"));
        Ok(self.readmes.get(&key).cloned())
    }
}

#[async_trait]
impl RepositoryEnumerator for MemoryTransport {
    async fn list_repositories(
        &self,
        _user: &str,
        _organization: &str,
    ) -> TransportResult<Vec<RepositoryRef>> {
        self.record("list_repositories".to_string());
        Ok(self.repositories.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Visibility;

    #[tokio::test]
    async fn test_manifest_served_with_download_url() {
        let repo = RepositoryRef::new("octo", "tools", Visibility::Public);
        let transport = MemoryTransport::new().with_manifest(&repo, "sub/action.yml", "name: x");

        let meta = transport
            .get_file_content("octo", "tools", "sub/action.yml")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(meta.name, "action.yml");

        let body = transport
            .fetch_raw(meta.download_url.as_deref().unwrap())
            .await
            .unwrap();
        assert_eq!(body, "name: x");
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let transport = MemoryTransport::new();
        let meta = transport
            .get_file_content("octo", "tools", "action.yml")
            .await
            .unwrap();
        assert!(meta.is_none());
        assert_eq!(transport.calls(), vec!["content:octo/tools/action.yml"]);
    }
}
