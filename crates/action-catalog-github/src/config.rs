//! GitHub client configuration

use serde::{Deserialize, Serialize};

/// Public GitHub API endpoint; anything else is treated as an enterprise server.
pub const PUBLIC_API_URL: &str = "https://api.github.com";

/// REST API version sent with every request.
pub const API_VERSION: &str = "2022-11-28";

/// GitHub client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// API base URL
    pub api_url: String,
    /// Personal access token
    pub token: Option<String>,
    pub user_agent: String,
    /// Page size for repository listings and searches (max 100)
    pub per_page: u32,
}

impl Default for GithubConfig {
    fn default() -> Self {
        GithubConfig {
            api_url: std::env::var("GITHUB_API_URL").unwrap_or_else(|_| PUBLIC_API_URL.to_string()),
            token: std::env::var("PAT").ok().filter(|t| !t.is_empty()),
            user_agent: format!("action-catalog/{}", env!("CARGO_PKG_VERSION")),
            per_page: 100,
        }
    }
}

impl GithubConfig {
    /// Create a new config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create config for a specific API endpoint
    pub fn new(api_url: &str) -> Self {
        GithubConfig {
            api_url: api_url.trim_end_matches('/').to_string(),
            token: None,
            ..Self::default()
        }
    }

    /// Set authentication token
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.clamp(1, 100);
        self
    }

    /// Whether the endpoint is a self-hosted GitHub Enterprise Server.
    pub fn is_enterprise(&self) -> bool {
        self.api_url.trim_end_matches('/') != PUBLIC_API_URL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_endpoint_is_not_enterprise() {
        let config = GithubConfig::new("https://api.github.com/");
        assert_eq!(config.api_url, PUBLIC_API_URL);
        assert!(!config.is_enterprise());
    }

    #[test]
    fn test_custom_endpoint_is_enterprise() {
        let config = GithubConfig::new("https://github.example.com/api/v3");
        assert!(config.is_enterprise());
    }

    #[test]
    fn test_with_token() {
        let config = GithubConfig::new(PUBLIC_API_URL).with_token("ghp_secret");
        assert_eq!(config.token.as_deref(), Some("ghp_secret"));
    }

    #[test]
    fn test_per_page_clamped() {
        assert_eq!(GithubConfig::new(PUBLIC_API_URL).with_per_page(500).per_page, 100);
        assert_eq!(GithubConfig::new(PUBLIC_API_URL).with_per_page(0).per_page, 1);
    }
}
