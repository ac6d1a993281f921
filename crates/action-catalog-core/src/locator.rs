//! Per-repository manifest discovery.
//!
//! Strategies run in order and stop at the first hit:
//! 1. root `action.yml`
//! 2. root `action.yaml`
//! 3. repository-scoped code search (quota checked on the public endpoint only)

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::TransportResult;
use crate::model::{ManifestLocation, RepositoryRef};
use crate::rate_limit::RateLimitGovernor;
use crate::transport::{FileMeta, SearchHit, Transport};

/// Manifest file names accepted at the repository root, in lookup order.
pub const ROOT_MANIFESTS: [&str; 2] = ["action.yml", "action.yaml"];

/// Code-search query used when no root manifest exists.
pub fn search_query(repo: &RepositoryRef) -> String {
    format!(
        "filename:action language:YAML repo:{}/{}",
        repo.owner, repo.name
    )
}

/// Finds the manifest of a single repository.
pub struct ManifestLocator {
    transport: Arc<dyn Transport>,
    governor: Arc<Mutex<RateLimitGovernor>>,
    enterprise: bool,
}

impl ManifestLocator {
    /// On `enterprise` endpoints the search quota is not read and search
    /// runs without waiting.
    pub fn new(
        transport: Arc<dyn Transport>,
        governor: Arc<Mutex<RateLimitGovernor>>,
        enterprise: bool,
    ) -> Self {
        Self {
            transport,
            governor,
            enterprise,
        }
    }

    /// Locate the manifest of `repo`.
    ///
    /// Not-found lookups fall through to the next strategy; any other
    /// transport error is returned to the caller.
    pub async fn locate(
        &self,
        repo: &RepositoryRef,
        forked_from: Option<&str>,
    ) -> TransportResult<Option<ManifestLocation>> {
        for file in ROOT_MANIFESTS {
            match self
                .transport
                .get_file_content(&repo.owner, &repo.name, file)
                .await?
            {
                Some(meta) if !meta.name.is_empty() => {
                    return Ok(Some(to_location(repo, meta, forked_from)));
                }
                _ => debug!("No {} file found in repository: {}", file, repo.name),
            }
        }

        info!("No actions found at root level in repository: {}", repo.name);
        info!("Checking subdirectories in repository: {}", repo.name);

        let mut found = None;
        for hit in self.search(repo).await? {
            // Every match that resolves overwrites the previous one.
            if let Some(meta) = self
                .transport
                .get_file_content(&repo.owner, &repo.name, &hit.path)
                .await?
            {
                if !meta.name.is_empty() {
                    found = Some(to_location(repo, meta, forked_from));
                }
            }
        }

        if found.is_none() {
            info!("No actions found in repository: {}", repo.name);
        }
        Ok(found)
    }

    /// Quota check, wait and search run under the governor lock so search
    /// calls never overlap.
    async fn search(&self, repo: &RepositoryRef) -> TransportResult<Vec<SearchHit>> {
        let governor = self.governor.lock().await;
        if !self.enterprise {
            let quota = self.transport.get_rate_limit_status().await?;
            governor.await_quota(&quota).await;
        }
        self.transport.search_code(&search_query(repo)).await
    }
}

fn to_location(repo: &RepositoryRef, meta: FileMeta, forked_from: Option<&str>) -> ManifestLocation {
    ManifestLocation {
        repo: repo.clone(),
        file_name: meta.name,
        path: meta.path,
        download_url: meta.download_url,
        forked_from: forked_from.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::fakes::MemoryTransport;
    use crate::model::Visibility;

    fn repo() -> RepositoryRef {
        RepositoryRef::new("octo", "tools", Visibility::Public)
    }

    fn locator(transport: Arc<MemoryTransport>, enterprise: bool) -> ManifestLocator {
        ManifestLocator::new(
            transport,
            Arc::new(Mutex::new(RateLimitGovernor::default())),
            enterprise,
        )
    }

    #[test]
    fn test_search_query_scoped_to_repo() {
        assert_eq!(
            search_query(&repo()),
            "filename:action language:YAML repo:octo/tools"
        );
    }

    #[tokio::test]
    async fn test_root_action_yml_short_circuits() {
        let transport = Arc::new(
            MemoryTransport::new()
                .with_manifest(&repo(), "action.yml", "name: a")
                .with_manifest(&repo(), "action.yaml", "name: b"),
        );
        let found = locator(transport.clone(), false)
            .locate(&repo(), None)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.path, "action.yml");
        assert_eq!(transport.calls(), vec!["content:octo/tools/action.yml"]);
    }

    #[tokio::test]
    async fn test_falls_back_to_action_yaml() {
        let transport =
            Arc::new(MemoryTransport::new().with_manifest(&repo(), "action.yaml", "name: b"));
        let found = locator(transport.clone(), false)
            .locate(&repo(), Some("upstream/tools"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.path, "action.yaml");
        assert_eq!(found.forked_from.as_deref(), Some("upstream/tools"));
        assert!(!transport.calls().iter().any(|c| c.starts_with("search:")));
    }

    #[tokio::test]
    async fn test_search_last_match_wins() {
        let transport = Arc::new(
            MemoryTransport::new()
                .with_manifest(&repo(), "first/action.yml", "name: first")
                .with_manifest(&repo(), "second/action.yml", "name: second")
                .with_search_hits(
                    &search_query(&repo()),
                    &["first/action.yml", "missing/action.yml", "second/action.yml"],
                ),
        );
        let found = locator(transport.clone(), false)
            .locate(&repo(), None)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.path, "second/action.yml");
        let calls = transport.calls();
        let rate = calls.iter().position(|c| c == "rate_limit").unwrap();
        let search = calls.iter().position(|c| c.starts_with("search:")).unwrap();
        assert!(rate < search);
    }

    #[tokio::test]
    async fn test_nothing_found_returns_none() {
        let transport = Arc::new(MemoryTransport::new());
        let found = locator(transport, false).locate(&repo(), None).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_enterprise_searches_without_quota_check() {
        let transport = Arc::new(
            MemoryTransport::new()
                .with_manifest(&repo(), "nested/action.yml", "name: nested")
                .with_search_hits(&search_query(&repo()), &["nested/action.yml"]),
        );
        let found = locator(transport.clone(), true)
            .locate(&repo(), None)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.path, "nested/action.yml");
        let calls = transport.calls();
        assert!(calls.iter().any(|c| c.starts_with("search:")));
        assert!(!calls.iter().any(|c| c == "rate_limit"));
    }

    #[tokio::test]
    async fn test_unexpected_transport_error_propagates() {
        let transport = Arc::new(MemoryTransport::new().with_content_error(
            &repo(),
            "action.yml",
            TransportError::Http {
                status: 500,
                message: "server error".to_string(),
            },
        ));
        let err = locator(transport, false)
            .locate(&repo(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Http { status: 500, .. }));
    }
}
