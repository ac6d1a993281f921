//! GitHub REST client
//!
//! Implements the catalog's [`Transport`] and [`RepositoryEnumerator`]
//! seams on top of `reqwest`.

use action_catalog_core::{
    AccessLevel, FileMeta, RepositoryEnumerator, RepositoryInfo, RepositoryRef, SearchHit,
    SearchQuota, Transport, TransportResult,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::{GithubConfig, API_VERSION};
use crate::error::GithubError;
use crate::payload::{
    ContentResponse, RateLimitResponse, ReadmeResponse, RepoListItem, RepoResponse,
    SearchResponse, WorkflowAccessResponse,
};
use crate::Result;

/// GitHub client for catalog operations
pub struct GithubClient {
    config: GithubConfig,
    base: Url,
    http_client: reqwest::Client,
}

impl GithubClient {
    /// Create a new GitHub client
    pub fn new(config: GithubConfig) -> Result<Self> {
        let base = Url::parse(&config.api_url)
            .map_err(|e| GithubError::Config(format!("invalid API URL {}: {e}", config.api_url)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));

        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()?;

        Ok(GithubClient {
            config,
            base,
            http_client,
        })
    }

    /// Create client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(GithubConfig::from_env())
    }

    pub fn config(&self) -> &GithubConfig {
        &self.config
    }

    /// API URL for the given path segments; each segment is percent-encoded.
    pub fn endpoint<'a, I>(&self, segments: I) -> Result<Url>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| GithubError::Config(format!("API URL cannot be a base: {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, url: Url, query: &[(&str, String)]) -> Result<reqwest::Response> {
        debug!(url = %url, "GET");
        let mut request = self.http_client.get(url).query(query);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }
        Ok(request.send().await?)
    }

    /// GET and decode; `None` on 404.
    async fn get_optional<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<Option<T>> {
        let response = self.send(url, query).await?;
        let status = response.status();
        let body = response.text().await?;
        match classify(status, &body)? {
            Some(()) => Ok(Some(serde_json::from_str(&body)?)),
            None => Ok(None),
        }
    }

    /// GET and decode; 404 is an error.
    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T> {
        let missing = url.to_string();
        self.get_optional(url, query).await?.ok_or(GithubError::Status {
            status: StatusCode::NOT_FOUND.as_u16(),
            body: format!("not found: {missing}"),
        })
    }

    async fn list_page(&self, url: &Url, page: u32) -> Result<Vec<RepositoryRef>> {
        let query = [
            ("type", "all".to_string()),
            ("per_page", self.config.per_page.to_string()),
            ("page", page.to_string()),
        ];
        let items: Vec<RepoListItem> = self.get_json(url.clone(), &query).await?;
        Ok(items.into_iter().map(Into::into).collect())
    }
}

/// `Ok(Some(()))` for success, `Ok(None)` for 404, an error otherwise.
pub(crate) fn classify(status: StatusCode, body: &str) -> Result<Option<()>> {
    if status.is_success() {
        Ok(Some(()))
    } else if status == StatusCode::NOT_FOUND {
        Ok(None)
    } else if status == StatusCode::UNAUTHORIZED {
        Err(GithubError::Unauthorized(body.to_string()))
    } else {
        Err(GithubError::Status {
            status: status.as_u16(),
            body: body.to_string(),
        })
    }
}

#[async_trait]
impl Transport for GithubClient {
    async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> TransportResult<Option<FileMeta>> {
        let url = self.endpoint(
            ["repos", owner, repo, "contents"]
                .into_iter()
                .chain(path.split('/').filter(|s| !s.is_empty())),
        )?;
        let response: Option<ContentResponse> = self.get_optional(url, &[]).await?;
        Ok(response.and_then(ContentResponse::into_file_meta))
    }

    async fn search_code(&self, query: &str) -> TransportResult<Vec<SearchHit>> {
        let url = self.endpoint(["search", "code"])?;
        let params = [
            ("q", query.to_string()),
            ("per_page", self.config.per_page.to_string()),
        ];
        let response: SearchResponse = self.get_json(url, &params).await?;
        Ok(response.into())
    }

    async fn get_workflow_access_level(
        &self,
        owner: &str,
        repo: &str,
    ) -> TransportResult<AccessLevel> {
        let url = self.endpoint(["repos", owner, repo, "actions", "permissions", "access"])?;
        let response: WorkflowAccessResponse = self.get_json(url, &[]).await?;
        Ok(response.access_level)
    }

    async fn get_rate_limit_status(&self) -> TransportResult<SearchQuota> {
        let url = self.endpoint(["rate_limit"])?;
        let response: RateLimitResponse = self.get_json(url, &[]).await?;
        Ok(response.into())
    }

    async fn fetch_raw(&self, url: &str) -> TransportResult<String> {
        let url = Url::parse(url).map_err(|e| GithubError::Config(format!("invalid URL {url}: {e}")))?;
        let missing = url.to_string();
        let response = self.send(url, &[]).await?;
        let status = response.status();
        let body = response.text().await.map_err(GithubError::from)?;
        match classify(status, &body)? {
            Some(()) => Ok(body),
            None => Err(GithubError::Status {
                status: status.as_u16(),
                body: format!("not found: {missing}"),
            }
            .into()),
        }
    }

    async fn get_repository(&self, owner: &str, repo: &str) -> TransportResult<RepositoryInfo> {
        let url = self.endpoint(["repos", owner, repo])?;
        let response: RepoResponse = self.get_json(url, &[]).await?;
        Ok(response.into())
    }

    async fn get_readme_url(&self, owner: &str, repo: &str) -> TransportResult<Option<String>> {
        let url = self.endpoint(["repos", owner, repo, "readme"])?;
        let response: Option<ReadmeResponse> = self.get_optional(url, &[]).await?;
        Ok(response.and_then(|r| r.download_url))
    }
}

#[async_trait]
impl RepositoryEnumerator for GithubClient {
    /// Organization repositories when `organization` is set, otherwise the
    /// user's repositories. Pages are fetched until a short page arrives.
    async fn list_repositories(
        &self,
        user: &str,
        organization: &str,
    ) -> TransportResult<Vec<RepositoryRef>> {
        let url = if organization.is_empty() {
            self.endpoint(["users", user, "repos"])?
        } else {
            self.endpoint(["orgs", organization, "repos"])?
        };

        let mut repos = Vec::new();
        let mut page = 1;
        loop {
            let batch = self.list_page(&url, page).await?;
            let count = batch.len();
            repos.extend(batch);
            if count < self.config.per_page as usize {
                break;
            }
            page += 1;
        }
        debug!(count = repos.len(), "listed repositories");
        Ok(repos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_url: &str) -> GithubClient {
        GithubClient::new(GithubConfig::new(api_url).with_token("test-token")).unwrap()
    }

    #[test]
    fn test_endpoint_public() {
        let url = client("https://api.github.com")
            .endpoint(["repos", "octo", "tools", "contents", "action.yml"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/octo/tools/contents/action.yml"
        );
    }

    #[test]
    fn test_endpoint_enterprise_prefix_kept() {
        let url = client("https://github.example.com/api/v3/")
            .endpoint(["rate_limit"])
            .unwrap();
        assert_eq!(url.as_str(), "https://github.example.com/api/v3/rate_limit");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let url = client("https://api.github.com")
            .endpoint(["repos", "octo", "tools", "contents", "my dir", "action.yml"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/octo/tools/contents/my%20dir/action.yml"
        );
    }

    #[test]
    fn test_invalid_api_url_rejected() {
        let result = GithubClient::new(GithubConfig::new("not a url"));
        assert!(matches!(result, Err(GithubError::Config(_))));
    }

    #[test]
    fn test_classify_statuses() {
        assert!(matches!(classify(StatusCode::OK, ""), Ok(Some(()))));
        assert!(matches!(classify(StatusCode::NOT_FOUND, ""), Ok(None)));
        assert!(matches!(
            classify(StatusCode::UNAUTHORIZED, "Bad credentials"),
            Err(GithubError::Unauthorized(_))
        ));
        assert!(matches!(
            classify(StatusCode::FORBIDDEN, "rate limited"),
            Err(GithubError::Status { status: 403, .. })
        ));
    }
}
