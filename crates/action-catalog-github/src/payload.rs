//! Response bodies of the GitHub REST endpoints the client calls.
//!
//! Only the fields the catalog needs are modeled.

use action_catalog_core::{
    AccessLevel, FileMeta, RepositoryInfo, RepositoryRef, SearchHit, SearchQuota, Visibility,
};
use serde::Deserialize;

/// `GET /repos/{owner}/{repo}/contents/{path}`: an object for files, an
/// array for directories.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ContentResponse {
    Entry(ContentEntry),
    Directory(Vec<serde_json::Value>),
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentEntry {
    pub name: String,
    pub path: String,
    pub download_url: Option<String>,
}

impl ContentResponse {
    pub fn into_file_meta(self) -> Option<FileMeta> {
        match self {
            ContentResponse::Entry(entry) => Some(FileMeta {
                name: entry.name,
                path: entry.path,
                download_url: entry.download_url,
            }),
            ContentResponse::Directory(_) => None,
        }
    }
}

/// `GET /search/code`
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchItem {
    pub path: String,
}

impl From<SearchResponse> for Vec<SearchHit> {
    fn from(response: SearchResponse) -> Self {
        response
            .items
            .into_iter()
            .map(|item| SearchHit { path: item.path })
            .collect()
    }
}

/// `GET /rate_limit`
#[derive(Debug, Deserialize)]
pub(crate) struct RateLimitResponse {
    pub resources: RateLimitResources,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RateLimitResources {
    pub search: RateLimitBucket,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RateLimitBucket {
    pub remaining: u32,
    pub reset: i64,
}

impl From<RateLimitResponse> for SearchQuota {
    fn from(response: RateLimitResponse) -> Self {
        SearchQuota {
            remaining: response.resources.search.remaining,
            reset_epoch_seconds: response.resources.search.reset,
        }
    }
}

/// `GET /repos/{owner}/{repo}`
#[derive(Debug, Deserialize)]
pub(crate) struct RepoResponse {
    pub parent: Option<ParentRepo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ParentRepo {
    pub full_name: String,
}

impl From<RepoResponse> for RepositoryInfo {
    fn from(response: RepoResponse) -> Self {
        RepositoryInfo {
            parent_full_name: response.parent.map(|p| p.full_name),
        }
    }
}

/// `GET /repos/{owner}/{repo}/actions/permissions/access`
#[derive(Debug, Deserialize)]
pub(crate) struct WorkflowAccessResponse {
    pub access_level: AccessLevel,
}

/// `GET /repos/{owner}/{repo}/readme`
#[derive(Debug, Deserialize)]
pub(crate) struct ReadmeResponse {
    pub download_url: Option<String>,
}

/// One item of `GET /orgs/{org}/repos` or `GET /users/{user}/repos`.
#[derive(Debug, Deserialize)]
pub(crate) struct RepoListItem {
    pub name: String,
    pub owner: RepoOwner,
    #[serde(default)]
    pub private: bool,
    pub visibility: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RepoOwner {
    pub login: String,
}

impl From<RepoListItem> for RepositoryRef {
    fn from(item: RepoListItem) -> Self {
        let fallback = if item.private {
            Visibility::Private
        } else {
            Visibility::Public
        };
        let visibility = item
            .visibility
            .as_deref()
            .and_then(|v| v.parse().ok())
            .unwrap_or(fallback);
        RepositoryRef::new(item.owner.login, item.name, visibility)
    }
}
