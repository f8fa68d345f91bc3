//! Self-update availability checks.
//!
//! A cached [`UpdateRecord`] stays fresh for 24 hours. Once stale, the
//! [`UpdateChecker`] asks a [`ReleaseFeed`] for the newest eligible release.
//! Any feed failure yields a record built from the running version, so the
//! caller always has something to cache.

mod cache;
mod feed;

pub use cache::UpdateCache;
pub use feed::{
    DEFAULT_API_BASE, GithubReleaseFeed, PAGE_SIZE, Release, ReleaseFeed, latest_eligible,
};

use crate::error::FeedError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// How long a fetched record stays fresh, in milliseconds.
pub const FRESHNESS_WINDOW_MS: i64 = 86_400_000;

/// Default overall timeout for a feed request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Latest known release, with its cache expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRecord {
    /// Version without a leading `v`.
    pub version: String,
    /// Release page URL; empty when unknown.
    pub url: String,
    /// Expiry as epoch milliseconds.
    pub expires: i64,
}

impl UpdateRecord {
    fn from_release(release: &Release, now: i64) -> Self {
        Self {
            version: strip_v(&release.tag_name).to_string(),
            url: release.html_url.clone(),
            expires: now + FRESHNESS_WINDOW_MS,
        }
    }

    fn fallback(current_version: &str, now: i64) -> Self {
        Self {
            version: strip_v(current_version).to_string(),
            url: String::new(),
            expires: now + FRESHNESS_WINDOW_MS,
        }
    }

    /// Whether the record is still within its freshness window at `now`.
    pub fn is_fresh_at(&self, now: i64) -> bool {
        now < self.expires
    }
}

/// Current time as epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn strip_v(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}

/// True when `current` is strictly older than `candidate` by semver precedence.
///
/// A leading `v` is accepted on either side. Build metadata is ignored.
/// Unparsable versions never report an update.
pub fn update_available(current: &str, candidate: &str) -> bool {
    let parse = |v: &str| semver::Version::parse(strip_v(v.trim()));
    match (parse(current), parse(candidate)) {
        (Ok(current), Ok(candidate)) => {
            (current.major, current.minor, current.patch, &current.pre)
                < (candidate.major, candidate.minor, candidate.patch, &candidate.pre)
        }
        (current_result, candidate_result) => {
            debug!(
                current,
                candidate,
                current_ok = current_result.is_ok(),
                candidate_ok = candidate_result.is_ok(),
                "unparsable version in update comparison"
            );
            false
        }
    }
}

/// Whether `cached` needs refreshing at `now`.
pub fn needs_refresh_at(cached: Option<&UpdateRecord>, now: i64) -> bool {
    match cached {
        None => true,
        Some(record) => !record.is_fresh_at(now),
    }
}

/// Whether `cached` needs refreshing, using a single clock read.
pub fn needs_refresh(cached: Option<&UpdateRecord>) -> bool {
    needs_refresh_at(cached, now_millis())
}

/// Result of [`UpdateChecker::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub record: UpdateRecord,
    /// True when the feed was queried and the record should be persisted.
    pub refreshed: bool,
}

/// Fetches update records from a release feed.
#[derive(Debug, Clone)]
pub struct UpdateChecker<F> {
    feed: F,
    timeout: Duration,
}

impl<F: ReleaseFeed> UpdateChecker<F> {
    pub fn new(feed: F) -> Self {
        Self {
            feed,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    /// Fetch the newest eligible release and build a fresh record.
    ///
    /// Never fails: network errors, bad payloads and timeouts all produce a
    /// record for `current_version` with an empty URL.
    pub async fn refresh(&self, current_version: &str) -> UpdateRecord {
        let releases = match tokio::time::timeout(self.timeout, self.feed.list_releases()).await {
            Ok(Ok(releases)) => Ok(releases),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(FeedError::Timeout(self.timeout)),
        };
        let now = now_millis();

        match releases {
            Ok(releases) => match latest_eligible(&releases) {
                Some(release) => {
                    debug!(tag = %release.tag_name, "found latest release");
                    UpdateRecord::from_release(release, now)
                }
                None => {
                    debug!(count = releases.len(), "no eligible release in feed");
                    UpdateRecord::fallback(current_version, now)
                }
            },
            Err(err) => {
                debug!(error = %err, "update check failed, assuming no update");
                UpdateRecord::fallback(current_version, now)
            }
        }
    }

    /// Return `cached` while fresh, otherwise refresh.
    pub async fn check(&self, cached: Option<UpdateRecord>, current_version: &str) -> CheckOutcome {
        match cached {
            Some(record) if !needs_refresh(Some(&record)) => CheckOutcome {
                record,
                refreshed: false,
            },
            _ => CheckOutcome {
                record: self.refresh(current_version).await,
                refreshed: true,
            },
        }
    }
}
