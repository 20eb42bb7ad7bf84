// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Repository Data Source: trait seam and the GitHub REST client

use crate::config::Config;
use crate::error::SourceError;
use crate::types::{Entry, RepoInfo, RepoRef};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A flat listing of one branch
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Listing {
    /// Entries, directories before their contents
    pub entries: Vec<Entry>,
    /// The provider cut the listing short
    pub truncated: bool,
}

/// Anything that can list a repository and describe it
pub trait RepoSource: Send + Sync {
    /// Repository metadata
    fn fetch_repo_info(
        &self,
        repo: &RepoRef,
    ) -> impl Future<Output = Result<RepoInfo, SourceError>> + Send;

    /// Recursive listing of `git_ref`
    fn fetch_tree(
        &self,
        repo: &RepoRef,
        git_ref: &str,
    ) -> impl Future<Output = Result<Listing, SourceError>> + Send;

    /// Branch or ref to list for a repository
    fn listing_ref<'a>(&'a self, info: &'a RepoInfo) -> &'a str {
        &info.default_branch
    }

    /// Recursive listing of the default branch
    fn fetch_repo_structure(
        &self,
        repo: &RepoRef,
    ) -> impl Future<Output = Result<Listing, SourceError>> + Send {
        async move {
            let info = self.fetch_repo_info(repo).await?;
            self.fetch_tree(repo, self.listing_ref(&info)).await
        }
    }
}

#[derive(Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Vec<Entry>,
    #[serde(default)]
    truncated: bool,
}

/// Client for the GitHub REST API
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
    branch: Option<String>,
}

impl GitHubClient {
    /// Build a client from settings
    pub fn new(config: &Config) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );

        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| SourceError::Network(format!("client setup failed: {e}")))?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|t| !t.is_empty()),
            branch: config.branch.clone(),
        })
    }

    /// Override the branch picked by [`RepoSource::listing_ref`]
    #[must_use]
    pub fn with_branch(mut self, branch: Option<String>) -> Self {
        self.branch = branch;
        self
    }

    fn repo_url(&self, repo: &RepoRef) -> String {
        format!("{}/repos/{}/{}", self.api_url, repo.owner, repo.name)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T, SourceError> {
        debug!("GET {}", url);
        let mut request = self.http.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let remaining = response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let err = classify_status(status, remaining.as_deref(), what);
            warn!("GET {} failed with {}: {}", url, status, err);
            return Err(err);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SourceError::Network(format!("invalid response: {e}")))
    }
}

impl RepoSource for GitHubClient {
    async fn fetch_repo_info(&self, repo: &RepoRef) -> Result<RepoInfo, SourceError> {
        info!("Fetching repository info for {}", repo);
        self.get_json(&self.repo_url(repo), &repo.slug()).await
    }

    async fn fetch_tree(&self, repo: &RepoRef, git_ref: &str) -> Result<Listing, SourceError> {
        info!("Fetching tree {} of {}", git_ref, repo);
        let url = format!("{}/git/trees/{}?recursive=1", self.repo_url(repo), git_ref);
        let response: TreeResponse = self
            .get_json(&url, &format!("{}@{}", repo.slug(), git_ref))
            .await?;

        if response.truncated {
            warn!(
                "Listing of {} was truncated after {} entries",
                repo,
                response.tree.len()
            );
        }
        Ok(Listing {
            entries: response.tree,
            truncated: response.truncated,
        })
    }

    fn listing_ref<'a>(&'a self, info: &'a RepoInfo) -> &'a str {
        self.branch.as_deref().unwrap_or(&info.default_branch)
    }
}

/// In-memory source serving fixed snapshots
///
/// Used for offline runs and tests; unknown repositories are `NotFound`.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    repos: HashMap<RepoRef, (RepoInfo, Listing)>,
}

impl MemorySource {
    /// Empty source
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a repository
    #[must_use]
    pub fn with_repo(mut self, repo: RepoRef, info: RepoInfo, entries: Vec<Entry>) -> Self {
        self.repos.insert(
            repo,
            (
                info,
                Listing {
                    entries,
                    truncated: false,
                },
            ),
        );
        self
    }
}

impl RepoSource for MemorySource {
    async fn fetch_repo_info(&self, repo: &RepoRef) -> Result<RepoInfo, SourceError> {
        self.repos
            .get(repo)
            .map(|(info, _)| info.clone())
            .ok_or_else(|| SourceError::NotFound(repo.slug()))
    }

    async fn fetch_tree(&self, repo: &RepoRef, git_ref: &str) -> Result<Listing, SourceError> {
        match self.repos.get(repo) {
            Some((info, listing)) if info.default_branch == git_ref => Ok(listing.clone()),
            _ => Err(SourceError::NotFound(format!("{}@{}", repo.slug(), git_ref))),
        }
    }
}

/// Map a failed HTTP status onto the error taxonomy
#[must_use]
pub fn classify_status(
    status: StatusCode,
    ratelimit_remaining: Option<&str>,
    what: &str,
) -> SourceError {
    match status {
        StatusCode::NOT_FOUND | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            SourceError::NotFound(what.to_string())
        }
        StatusCode::TOO_MANY_REQUESTS => SourceError::RateLimited,
        StatusCode::FORBIDDEN if ratelimit_remaining == Some("0") => SourceError::RateLimited,
        other => SourceError::Network(format!("unexpected status {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntryKind;

    #[test]
    fn test_classify_status() {
        assert_eq!(
            classify_status(StatusCode::NOT_FOUND, None, "a/b"),
            SourceError::NotFound("a/b".into())
        );
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, None, "a/b"),
            SourceError::RateLimited
        );
        assert_eq!(
            classify_status(StatusCode::FORBIDDEN, Some("0"), "a/b"),
            SourceError::RateLimited
        );
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, Some("12"), "a/b"),
            SourceError::Network(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, None, "a/b"),
            SourceError::Network(_)
        ));
    }

    #[test]
    fn test_decode_tree_response() {
        let body = r#"{
            "sha": "abc",
            "truncated": false,
            "tree": [
                {"path": "src", "mode": "040000", "type": "tree", "sha": "1"},
                {"path": "src/lib.rs", "mode": "100644", "type": "blob", "sha": "2", "size": 120},
                {"path": "vendor/dep", "mode": "160000", "type": "commit", "sha": "3"}
            ]
        }"#;
        let response: TreeResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.tree.len(), 3);
        assert_eq!(response.tree[0].kind, EntryKind::Tree);
        assert_eq!(response.tree[1].size, Some(120));
        assert_eq!(response.tree[2].kind, EntryKind::Commit);
        assert!(!response.truncated);
    }

    #[test]
    fn test_entry_without_path_decodes_empty() {
        let response: TreeResponse =
            serde_json::from_str(r#"{"tree": [{"type": "blob"}]}"#).unwrap();
        assert_eq!(response.tree[0].path, "");
    }

    #[test]
    fn test_decode_repo_info() {
        let body = r#"{
            "name": "repograph",
            "owner": {"login": "hyperpolymath", "id": 1},
            "stargazers_count": 42,
            "forks_count": 7,
            "description": null,
            "default_branch": "trunk",
            "updated_at": "2025-01-01T00:00:00Z"
        }"#;
        let info: RepoInfo = serde_json::from_str(body).unwrap();

        assert_eq!(info.owner.login, "hyperpolymath");
        assert_eq!(info.stargazers_count, 42);
        assert_eq!(info.description, None);
        assert_eq!(info.default_branch, "trunk");
        assert!(info.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_memory_source() {
        let repo = RepoRef::new("octo", "hello");
        let info: RepoInfo = serde_json::from_str(
            r#"{"name": "hello", "owner": {"login": "octo"}, "default_branch": "dev"}"#,
        )
        .unwrap();
        let source = MemorySource::new().with_repo(repo.clone(), info, vec![Entry::tree("src")]);

        let listing = source.fetch_repo_structure(&repo).await.unwrap();
        assert_eq!(listing.entries, vec![Entry::tree("src")]);
        assert!(matches!(
            source.fetch_tree(&repo, "main").await,
            Err(SourceError::NotFound(_))
        ));
        assert!(matches!(
            source.fetch_repo_info(&RepoRef::new("octo", "absent")).await,
            Err(SourceError::NotFound(_))
        ));
    }

    #[test]
    fn test_client_trims_api_url() {
        let config = Config {
            api_url: "http://localhost:1234/".into(),
            ..Config::default()
        };
        let client = GitHubClient::new(&config).unwrap();
        assert_eq!(
            client.repo_url(&RepoRef::new("o", "r")),
            "http://localhost:1234/repos/o/r"
        );
    }
}
