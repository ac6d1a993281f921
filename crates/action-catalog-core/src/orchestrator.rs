//! Catalog assembly across a list of repositories.
//!
//! [`CatalogBuilder`] runs the locator and parser over each repository,
//! applies visibility gating and collects a [`CatalogReport`]. A transport
//! failure in one repository is recorded and scanning moves on; only an
//! authentication failure aborts the run.

use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::config::ScanConfig;
use crate::error::{Result, TransportError, TransportResult};
use crate::locator::ManifestLocator;
use crate::manifest::parse_manifest;
use crate::model::{CatalogEntry, ManifestRecord, RepositoryRef, Visibility};
use crate::rate_limit::RateLimitGovernor;
use crate::redact::remove_token;
use crate::transport::{RepositoryEnumerator, Transport};

/// Why a repository with a manifest was left out of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Private,
    /// Workflow access level is `none`.
    AccessDisabled,
    /// The access level could not be determined.
    AccessUnknown { error: String },
}

/// Result of scanning a single repository.
#[derive(Debug, Clone, PartialEq)]
pub enum RepoOutcome {
    Cataloged(Box<CatalogEntry>),
    NotFound,
    Skipped(SkipReason),
    Failed(TransportError),
}

/// A repository whose scan was aborted by a transport error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoFailure {
    pub repo: String,
    pub error: String,
}

/// Everything a run produced.
#[derive(Debug, Clone, Default)]
pub struct CatalogReport {
    /// Catalog entries in input order.
    pub entries: Vec<CatalogEntry>,
    pub failures: Vec<RepoFailure>,
    pub skipped: usize,
    pub not_found: usize,
    pub repositories_scanned: usize,
}

impl CatalogReport {
    fn from_outcomes(repos: &[RepositoryRef], outcomes: Vec<RepoOutcome>) -> Self {
        let mut report = CatalogReport {
            repositories_scanned: repos.len(),
            ..Default::default()
        };
        for (repo, outcome) in repos.iter().zip(outcomes) {
            match outcome {
                RepoOutcome::Cataloged(entry) => report.entries.push(*entry),
                RepoOutcome::NotFound => report.not_found += 1,
                RepoOutcome::Skipped(_) => report.skipped += 1,
                RepoOutcome::Failed(err) => report.failures.push(RepoFailure {
                    repo: repo.full_name(),
                    error: err.to_string(),
                }),
            }
        }
        report
    }

    /// `true` when every repository was scanned to completion.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drives discovery and parsing over a repository list.
pub struct CatalogBuilder {
    transport: Arc<dyn Transport>,
    locator: ManifestLocator,
    config: ScanConfig,
}

impl CatalogBuilder {
    pub fn new(transport: Arc<dyn Transport>, config: ScanConfig) -> Self {
        let governor = Arc::new(Mutex::new(RateLimitGovernor::new(config.rate_limit)));
        let locator = ManifestLocator::new(Arc::clone(&transport), governor, config.enterprise);
        Self {
            transport,
            locator,
            config,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Enumerate the account's repositories, then build the catalog.
    pub async fn scan_account(
        &self,
        enumerator: &dyn RepositoryEnumerator,
        user: &str,
        organization: &str,
    ) -> Result<CatalogReport> {
        let repos = enumerator.list_repositories(user, organization).await?;
        info!("Found [{}] repositories", repos.len());
        self.build_catalog(&repos).await
    }

    /// Scan `repos` and collect the catalog in input order.
    pub async fn build_catalog(&self, repos: &[RepositoryRef]) -> Result<CatalogReport> {
        let outcomes: Vec<RepoOutcome> = stream::iter(repos)
            .map(|repo| self.process(repo))
            .buffered(self.config.concurrency.max(1))
            .try_collect()
            .await?;

        let report = CatalogReport::from_outcomes(repos, outcomes);
        info!(
            "Found [{}] actions in [{}] repos",
            report.entries.len(),
            report.repositories_scanned
        );
        if !report.is_complete() {
            warn!(
                failed = report.failures.len(),
                "Some repositories could not be scanned"
            );
        }
        Ok(report)
    }

    /// Scan one repository. Only fatal transport errors escape.
    pub async fn process(&self, repo: &RepositoryRef) -> Result<RepoOutcome> {
        let span = info_span!("catalog.repo", repo = %repo.full_name());
        match self.scan(repo).instrument(span).await {
            Ok(outcome) => Ok(outcome),
            Err(err) if err.is_fatal() => Err(err.into()),
            Err(err) => {
                warn!(
                    repo = %repo.full_name(),
                    error = %err,
                    "Error scanning repository, continuing with the next one"
                );
                Ok(RepoOutcome::Failed(err))
            }
        }
    }

    async fn scan(&self, repo: &RepositoryRef) -> TransportResult<RepoOutcome> {
        debug!("Searching repository for actions: {}", repo.name);

        if repo.visibility == Visibility::Private {
            debug!("[{}] is private repo, skipping.", repo.full_name());
            return Ok(RepoOutcome::Skipped(SkipReason::Private));
        }

        let info = self.transport.get_repository(&repo.owner, &repo.name).await?;
        let Some(location) = self
            .locator
            .locate(repo, info.parent_full_name.as_deref())
            .await?
        else {
            return Ok(RepoOutcome::NotFound);
        };

        info!(
            "Found action file in repository: [{}] with filename [{}] download url [{}]. Visibility of repo is [{}]",
            repo.name,
            location.file_name,
            location.download_url.as_deref().unwrap_or("none"),
            repo.visibility
        );

        if repo.visibility == Visibility::Internal {
            if let Some(reason) = self.gate_internal(repo).await {
                return Ok(RepoOutcome::Skipped(reason));
            }
        }

        let record = match location.download_url.as_deref() {
            Some(url) => {
                let raw = self.transport.fetch_raw(url).await?;
                parse_manifest(&location.path, Some(&repo.full_name()), &raw)
            }
            None => {
                debug!("No download url for [{}], keeping defaults", location.path);
                ManifestRecord::default()
            }
        };

        let mut entry = CatalogEntry::from_parts(location, record);
        self.post_process(repo, &mut entry).await;
        Ok(RepoOutcome::Cataloged(Box::new(entry)))
    }

    async fn gate_internal(&self, repo: &RepositoryRef) -> Option<SkipReason> {
        debug!("Get access settings for repository [{}]", repo.full_name());
        match self
            .transport
            .get_workflow_access_level(&repo.owner, &repo.name)
            .await
        {
            Ok(level) if level.allows_use() => None,
            Ok(_) => {
                info!("Access to use action [{}] is disabled", repo.full_name());
                Some(SkipReason::AccessDisabled)
            }
            Err(err) => {
                info!(
                    "Error retrieving access level for the action(s) in [{}]. Make sure the Access Token used has the 'Administration: read' scope. Error: {}",
                    repo.full_name(),
                    err
                );
                Some(SkipReason::AccessUnknown {
                    error: err.to_string(),
                })
            }
        }
    }

    async fn post_process(&self, repo: &RepositoryRef, entry: &mut CatalogEntry) {
        if self.config.remove_token {
            remove_token(entry);
        }

        if self.config.fetch_readmes {
            match self.transport.get_readme_url(&repo.owner, &repo.name).await {
                Ok(Some(url)) => entry.readme = Some(url),
                Ok(None) => debug!("No readme found in repository: {}", repo.name),
                Err(err) => warn!(repo = %repo.full_name(), error = %err, "Could not load readme"),
            }
        }
    }
}
