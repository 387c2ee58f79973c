// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP retrieval of `MANIFEST.toml` from GitHub and GitLab.

use std::time::Duration;

use async_trait::async_trait;
use picreg_config::model::FetchConfig;
use picreg_core::{MANIFEST_FILE_NAME, Manifest, ManifestFetcher, RegistryError};
use reqwest::Url;
use tracing::debug;

/// Fetches manifests over HTTPS from the hosting provider's raw file endpoint.
///
/// A single attempt is made per call with a fixed timeout; there is no retry.
#[derive(Debug, Clone)]
pub struct HttpManifestFetcher {
    client: reqwest::Client,
}

impl HttpManifestFetcher {
    /// Creates a fetcher with the given request timeout and User-Agent.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| RegistryError::Fetch {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client })
    }

    /// Creates a fetcher from the `[fetch]` config section.
    ///
    /// Settings the HTTP client refuses, such as a User-Agent that is not a
    /// valid header value, are reported as `Config` errors.
    pub fn from_config(config: &FetchConfig) -> Result<Self, RegistryError> {
        Self::new(Duration::from_secs(config.timeout_secs), &config.user_agent).map_err(|e| {
            RegistryError::Config(format!("unusable [fetch] settings: {e}"))
        })
    }

    async fn fetch_url(&self, url: &str) -> Result<Manifest, RegistryError> {
        debug!(%url, "fetching manifest");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RegistryError::Fetch {
                message: format!("request to {url} failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Fetch {
                message: format!("{url} returned HTTP {}", status.as_u16()),
                source: None,
            });
        }

        let body = response.text().await.map_err(|e| RegistryError::Fetch {
            message: format!("failed to read response from {url}: {e}"),
            source: Some(Box::new(e)),
        })?;

        Manifest::from_toml_str(&body).map_err(|e| RegistryError::Fetch {
            message: format!("invalid TOML in {url}: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

#[async_trait]
impl ManifestFetcher for HttpManifestFetcher {
    async fn fetch(&self, git_url: &str, git_ref: &str) -> Result<Manifest, RegistryError> {
        let url = manifest_url(git_url, git_ref)?;
        self.fetch_url(&url).await
    }
}

/// Builds the raw-file URL of a repository's manifest at `git_ref`.
///
/// GitHub repositories are served from `raw.githubusercontent.com`; GitLab
/// repositories from the project's `/-/raw/` endpoint. Other hosts are rejected.
pub fn manifest_url(git_url: &str, git_ref: &str) -> Result<String, RegistryError> {
    let trimmed = git_url.trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    let unsupported = || RegistryError::Fetch {
        message: format!("Only GitHub and GitLab URLs are supported: {git_url}"),
        source: None,
    };

    let parsed = Url::parse(trimmed).map_err(|_| unsupported())?;
    let path = parsed.path().trim_end_matches('/');
    match parsed.host_str() {
        Some("github.com" | "www.github.com") => Ok(format!(
            "https://raw.githubusercontent.com{path}/{git_ref}/{MANIFEST_FILE_NAME}"
        )),
        Some("gitlab.com" | "www.gitlab.com") => Ok(format!(
            "https://gitlab.com{path}/-/raw/{git_ref}/{MANIFEST_FILE_NAME}"
        )),
        _ => Err(unsupported()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MANIFEST: &str = r#"
uuid = "12345678-1234-4234-8234-123456789abc"
name = "Test Plugin"
version = "1.0.0"
description = "A test plugin"
api = ["3.0"]
"#;

    fn fetcher() -> HttpManifestFetcher {
        HttpManifestFetcher::new(Duration::from_secs(5), "picreg-test").unwrap()
    }

    #[test]
    fn from_config_rejects_bad_user_agent() {
        let config = FetchConfig {
            timeout_secs: 5,
            user_agent: "picreg\nbroken".to_string(),
        };
        let err = HttpManifestFetcher::from_config(&config).unwrap_err();
        assert!(matches!(err, RegistryError::Config(_)));
        assert!(err.to_string().starts_with("configuration error: unusable [fetch] settings"));

        let config = FetchConfig {
            timeout_secs: 5,
            user_agent: "picreg-test".to_string(),
        };
        assert!(HttpManifestFetcher::from_config(&config).is_ok());
    }

    #[test]
    fn github_url_maps_to_raw_host() {
        let url = manifest_url("https://github.com/user/plugin", "main").unwrap();
        assert_eq!(
            url,
            "https://raw.githubusercontent.com/user/plugin/main/MANIFEST.toml"
        );
    }

    #[test]
    fn git_suffix_and_trailing_slash_are_stripped() {
        let url = manifest_url("https://github.com/user/plugin.git", "v2").unwrap();
        assert!(url.contains("/user/plugin/v2/"));
        assert!(!url.contains("plugin.git"));

        let url = manifest_url("https://github.com/user/plugin/", "main").unwrap();
        assert!(url.contains("plugin/main/MANIFEST.toml"));
    }

    #[test]
    fn gitlab_url_uses_raw_endpoint() {
        let url = manifest_url("https://gitlab.com/user/plugin", "main").unwrap();
        assert_eq!(url, "https://gitlab.com/user/plugin/-/raw/main/MANIFEST.toml");
    }

    #[test]
    fn other_hosts_are_rejected() {
        let err = manifest_url("https://bitbucket.org/user/plugin", "main").unwrap_err();
        assert!(matches!(err, RegistryError::Fetch { .. }));
        assert!(err.to_string().contains("Only GitHub and GitLab URLs are supported"));

        assert!(manifest_url("not a url", "main").is_err());
    }

    #[tokio::test]
    async fn fetch_parses_manifest() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/plugin/main/MANIFEST.toml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(MANIFEST))
            .mount(&server)
            .await;

        let url = format!("{}/user/plugin/main/MANIFEST.toml", server.uri());
        let manifest = fetcher().fetch_url(&url).await.unwrap();
        assert_eq!(
            manifest.str_field("uuid"),
            Some("12345678-1234-4234-8234-123456789abc")
        );
        assert_eq!(manifest.str_field("name"), Some("Test Plugin"));
    }

    #[tokio::test]
    async fn fetch_reports_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/user/missing/main/MANIFEST.toml", server.uri());
        let err = fetcher().fetch_url(&url).await.unwrap_err();
        assert!(matches!(err, RegistryError::Fetch { .. }));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn fetch_rejects_invalid_toml() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("name = "))
            .mount(&server)
            .await;

        let url = format!("{}/user/broken/main/MANIFEST.toml", server.uri());
        let err = fetcher().fetch_url(&url).await.unwrap_err();
        assert!(err.to_string().contains("invalid TOML"));
    }
}
