// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Normalized records returned by the analytics operations.
//!
//! Every record is a plain value built per call and owned by the caller.
//! Field names follow the JSON keys exposed to tool callers.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Repository visibility reduced to the two states callers care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(rename_all = "lowercase")]
pub enum Visibility
{
    Public,
    Private,
}

impl Visibility
{
    /// Normalizes the upstream visibility.
    ///
    /// Only the exact value `public` maps to [`Visibility::Public`]; any other
    /// reported value (`private`, `internal`, ...) is treated as private. When
    /// the upstream omits the field, the `private` flag decides.
    ///
    /// # Examples
    ///
    /// ```
    /// use repo_insight::Visibility;
    ///
    /// assert_eq!(Visibility::from_upstream(Some("internal"), false), Visibility::Private);
    /// assert_eq!(Visibility::from_upstream(None, false), Visibility::Public);
    /// ```
    pub fn from_upstream(visibility: Option<&str,>, private: bool,) -> Self
    {
        match visibility {
            Some("public",) => Self::Public,
            Some(_,) => Self::Private,
            None if private => Self::Private,
            None => Self::Public,
        }
    }
}

/// Summary of the account owning a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct OwnerSummary
{
    pub login:      String,
    pub avatar_url: String,
    pub html_url:   String,
}

/// Static and aggregate attributes of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct RepositoryInfo
{
    pub name:           String,
    pub full_name:      String,
    pub description:    Option<String,>,
    pub owner:          OwnerSummary,
    pub html_url:       String,
    pub api_url:        String,
    pub stars:          u64,
    pub forks:          u64,
    pub watchers:       u64,
    pub open_issues:    u64,
    pub language:       Option<String,>,
    pub license:        Option<String,>,
    pub created_at:     DateTime<Utc,>,
    pub updated_at:     DateTime<Utc,>,
    pub pushed_at:      Option<DateTime<Utc,>,>,
    pub visibility:     Visibility,
    pub default_branch: String,
    pub topics:         Vec<String,>,
}

/// State of a single issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(rename_all = "lowercase")]
pub enum IssueState
{
    Open,
    Closed,
}

/// State filter accepted by the issue and pull request listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,)]
#[serde(rename_all = "lowercase")]
pub enum StateFilter
{
    #[default]
    Open,
    Closed,
    All,
}

impl StateFilter
{
    /// Query-string value understood by the upstream service.
    pub fn as_str(self,) -> &'static str
    {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }

    /// Returns `true` when an item in `state` passes the filter.
    pub fn accepts(self, state: IssueState,) -> bool
    {
        match self {
            Self::All => true,
            Self::Open => state == IssueState::Open,
            Self::Closed => state == IssueState::Closed,
        }
    }
}

impl std::str::FromStr for StateFilter
{
    type Err = Error;

    fn from_str(value: &str,) -> Result<Self, Self::Err,>
    {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open,),
            "closed" => Ok(Self::Closed,),
            "all" => Ok(Self::All,),
            other => Err(Error::invalid_argument(format!(
                "state must be one of 'open', 'closed' or 'all', got '{other}'"
            ),),),
        }
    }
}

impl std::fmt::Display for StateFilter
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_,>,) -> std::fmt::Result
    {
        f.write_str(self.as_str(),)
    }
}

/// Issue as returned by [`IssueLister`](crate::IssueLister).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct Issue
{
    pub number:     u64,
    pub title:      String,
    pub state:      IssueState,
    pub created_at: DateTime<Utc,>,
    pub updated_at: DateTime<Utc,>,
    pub closed_at:  Option<DateTime<Utc,>,>,
    /// Login of the author, `None` when the account was deleted.
    pub author:     Option<String,>,
    pub labels:     Vec<String,>,
    pub comments:   u64,
    pub html_url:   String,
    /// Body preview, truncated to 500 characters plus `...`.
    pub body:       Option<String,>,
}

/// Decoded README of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct ReadmeContent
{
    pub content: String,
    pub path:    String,
    /// Raw download URL.
    pub url:     Option<String,>,
    pub size:    u64,
    pub name:    String,
}

/// Line-level change statistics of a commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,)]
pub struct CommitStats
{
    pub additions: u64,
    pub deletions: u64,
    pub total:     u64,
}

impl CommitStats
{
    /// Builds statistics with `total` derived from the two counters.
    pub fn new(additions: u64, deletions: u64,) -> Self
    {
        Self {
            additions,
            deletions,
            total: additions.saturating_add(deletions,),
        }
    }
}

/// Commit as returned by [`CommitHistoryReader`](crate::CommitHistoryReader).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct Commit
{
    pub sha:          String,
    pub message:      String,
    /// Author display name recorded in the commit.
    pub author:       String,
    /// Login of the linked account, if the author email maps to one.
    pub author_login: Option<String,>,
    /// Authored timestamp in the offset recorded by the upstream service.
    pub date:         DateTime<FixedOffset,>,
    pub html_url:     String,
    pub stats:        CommitStats,
}

/// Windowed activity counts of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct ActivityMetrics
{
    pub commit_count:        u64,
    pub open_issues_count:   u64,
    pub closed_issues_count: u64,
    /// Currently open pull requests, regardless of the window.
    pub open_prs_count:      u64,
    /// Merged pull requests over the repository lifetime.
    pub merged_prs_count:    u64,
    pub contributor_count:   u64,
    pub top_contributors:    Vec<String,>,
    pub time_period_days:    u32,
}

/// Number of commits authored on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,)]
pub struct DailyBucket
{
    pub date:  NaiveDate,
    pub count: u64,
}

/// Contiguous, zero-filled daily commit counts in ascending date order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize,)]
pub struct DailyCommitHistogram
{
    pub buckets: Vec<DailyBucket,>,
}

impl DailyCommitHistogram
{
    /// Number of buckets.
    pub fn len(&self,) -> usize
    {
        self.buckets.len()
    }

    /// Returns `true` when the histogram has no buckets.
    pub fn is_empty(&self,) -> bool
    {
        self.buckets.is_empty()
    }

    /// Sum of all bucket counts.
    pub fn total(&self,) -> u64
    {
        self.buckets.iter().map(|bucket| bucket.count,).sum()
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn visibility_maps_non_public_values_to_private()
    {
        assert_eq!(Visibility::from_upstream(Some("public"), true), Visibility::Public);
        assert_eq!(Visibility::from_upstream(Some("private"), false), Visibility::Private);
        assert_eq!(Visibility::from_upstream(Some("internal"), false), Visibility::Private);
        assert_eq!(Visibility::from_upstream(Some("Public"), false), Visibility::Private);
        assert_eq!(Visibility::from_upstream(None, true), Visibility::Private);
    }

    #[test]
    fn state_filter_parses_case_insensitively()
    {
        assert_eq!("Closed".parse::<StateFilter>().expect("valid state"), StateFilter::Closed);
        assert_eq!(" all ".parse::<StateFilter>().expect("valid state"), StateFilter::All);
        assert!("merged".parse::<StateFilter>().is_err());
    }

    #[test]
    fn state_filter_accepts_matching_states()
    {
        assert!(StateFilter::All.accepts(IssueState::Closed));
        assert!(StateFilter::Open.accepts(IssueState::Open));
        assert!(!StateFilter::Open.accepts(IssueState::Closed));
    }

    #[test]
    fn commit_stats_total_is_sum()
    {
        let stats = CommitStats::new(12, 30,);
        assert_eq!(stats.total, 42);
    }

    #[test]
    fn visibility_serializes_lowercase()
    {
        let json = serde_json::to_string(&Visibility::Private,).expect("serialization failed",);
        assert_eq!(json, "\"private\"");
    }
}
