//! Remote release listings.

use crate::config::VERSION;
use crate::error::FeedError;
use async_trait::async_trait;
use serde::Deserialize;

/// Default GitHub API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Number of releases requested per page.
pub const PAGE_SIZE: u32 = 25;

/// One entry of a release listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    pub tag_name: String,
    pub html_url: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
}

impl Release {
    /// Neither a draft nor a pre-release.
    pub fn is_eligible(&self) -> bool {
        !self.draft && !self.prerelease
    }
}

/// First eligible release in feed order.
pub fn latest_eligible(releases: &[Release]) -> Option<&Release> {
    releases.iter().find(|release| release.is_eligible())
}

/// A source of release listings, most recent first.
#[async_trait]
pub trait ReleaseFeed: Send + Sync {
    async fn list_releases(&self) -> Result<Vec<Release>, FeedError>;
}

/// Release feed backed by the GitHub releases API.
#[derive(Debug, Clone)]
pub struct GithubReleaseFeed {
    client: reqwest::Client,
    api_base: String,
    owner: String,
    repo: String,
}

impl GithubReleaseFeed {
    /// Feed for `lando/cli` on api.github.com.
    pub fn new() -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .user_agent(format!("lando-bootstrap/{VERSION}"))
            .build()?;

        Ok(Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            owner: "lando".to_string(),
            repo: "cli".to_string(),
        })
    }

    /// Point the feed at a different API root (GitHub Enterprise, tests).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_repo(mut self, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        self.owner = owner.into();
        self.repo = repo.into();
        self
    }

    pub fn releases_url(&self) -> String {
        format!("{}/repos/{}/{}/releases", self.api_base, self.owner, self.repo)
    }
}

#[async_trait]
impl ReleaseFeed for GithubReleaseFeed {
    async fn list_releases(&self) -> Result<Vec<Release>, FeedError> {
        let response = self
            .client
            .get(self.releases_url())
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .query(&[("per_page", PAGE_SIZE), ("page", 1)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FeedError::Status {
                status: response.status().as_u16(),
            });
        }

        Ok(response.json::<Vec<Release>>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(tag: &str, draft: bool, prerelease: bool) -> Release {
        Release {
            tag_name: tag.to_string(),
            html_url: format!("https://github.com/lando/cli/releases/tag/{tag}"),
            draft,
            prerelease,
        }
    }

    #[test]
    fn test_latest_eligible_skips_drafts_and_prereleases() {
        let releases = vec![
            release("v3.2.0", true, false),
            release("v3.2.0-beta.1", false, true),
            release("v3.1.0", false, false),
            release("v3.0.0", false, false),
        ];
        assert_eq!(latest_eligible(&releases).map(|r| r.tag_name.as_str()), Some("v3.1.0"));
    }

    #[test]
    fn test_latest_eligible_none() {
        assert!(latest_eligible(&[]).is_none());
        assert!(latest_eligible(&[release("v1.0.0", true, true)]).is_none());
    }

    #[test]
    fn test_release_deserializes_github_shape() {
        let json = r#"[{"tag_name":"v3.1.0","html_url":"https://x/r","draft":false,"prerelease":false,"id":7}]"#;
        let releases: Vec<Release> = serde_json::from_str(json).unwrap();
        assert_eq!(releases[0], release_with_url("v3.1.0", "https://x/r"));
    }

    fn release_with_url(tag: &str, url: &str) -> Release {
        Release {
            tag_name: tag.to_string(),
            html_url: url.to_string(),
            draft: false,
            prerelease: false,
        }
    }

    #[test]
    fn test_releases_url_trims_trailing_slash() {
        let feed = GithubReleaseFeed::new()
            .unwrap()
            .with_api_base("http://127.0.0.1:9999/")
            .with_repo("acme", "tool");
        assert_eq!(feed.releases_url(), "http://127.0.0.1:9999/repos/acme/tool/releases");
    }
}
