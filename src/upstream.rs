// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Contract between the analytics components and the hosting service.
///
/// The raw record types mirror the JSON payloads of the GitHub REST API so
/// that implementations can deserialize responses directly. Components never
/// expose these types; they normalize them into the records of
/// [`crate::models`].
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;

use crate::{error::UpstreamFailure, identifier::RepositoryIdentifier, models::StateFilter};

/// One page of a listing.
#[derive(Debug, Clone,)]
pub struct Page<T,>
{
    /// Items of the page in upstream order.
    pub items:    Vec<T,>,
    /// Whether the upstream service has more items after this page.
    pub has_next: bool,
}

/// Position and size of a requested page. Page numbers start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
pub struct PageRequest
{
    pub number: u32,
    pub size:   u8,
}

/// Server-side filters of the issue listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
pub struct IssueQuery
{
    /// State filter applied by the upstream service.
    pub state: StateFilter,
    /// Only issues updated at or after this instant.
    pub since: Option<DateTime<Utc,>,>,
}

#[derive(Debug, Clone, Deserialize,)]
pub struct RawOwner
{
    pub login:      String,
    pub avatar_url: String,
    pub html_url:   String,
}

#[derive(Debug, Clone, Deserialize,)]
pub struct RawLicense
{
    pub name: String,
}

#[derive(Debug, Clone, Deserialize,)]
pub struct RawRepository
{
    pub name:              String,
    pub full_name:         String,
    pub description:       Option<String,>,
    pub owner:             RawOwner,
    pub html_url:          String,
    pub url:               String,
    #[serde(default)]
    pub stargazers_count:  u64,
    #[serde(default)]
    pub forks_count:       u64,
    #[serde(default)]
    pub watchers_count:    u64,
    #[serde(default)]
    pub open_issues_count: u64,
    pub language:          Option<String,>,
    pub license:           Option<RawLicense,>,
    pub created_at:        DateTime<Utc,>,
    pub updated_at:        DateTime<Utc,>,
    pub pushed_at:         Option<DateTime<Utc,>,>,
    #[serde(default)]
    pub visibility:        Option<String,>,
    #[serde(default)]
    pub private:           bool,
    #[serde(default)]
    pub default_branch:    String,
}

#[derive(Debug, Clone, Deserialize,)]
pub struct RawUser
{
    pub login: String,
}

#[derive(Debug, Clone, Deserialize,)]
pub struct RawLabel
{
    pub name: String,
}

#[derive(Debug, Clone, Deserialize,)]
pub struct RawIssue
{
    pub number:     u64,
    pub title:      String,
    pub state:      String,
    pub created_at: DateTime<Utc,>,
    pub updated_at: DateTime<Utc,>,
    pub closed_at:  Option<DateTime<Utc,>,>,
    pub user:       Option<RawUser,>,
    #[serde(default)]
    pub labels:     Vec<RawLabel,>,
    #[serde(default)]
    pub comments:   u64,
    pub html_url:   String,
    pub body:       Option<String,>,
}

#[derive(Debug, Clone, Deserialize,)]
pub struct RawReadme
{
    pub name:         String,
    pub path:         String,
    pub size:         u64,
    /// Base64 payload, possibly wrapped over several lines.
    pub content:      String,
    #[serde(default)]
    pub encoding:     Option<String,>,
    pub download_url: Option<String,>,
}

#[derive(Debug, Clone, Deserialize,)]
pub struct RawSignature
{
    pub name: String,
    pub date: DateTime<FixedOffset,>,
}

#[derive(Debug, Clone, Deserialize,)]
pub struct RawCommitBody
{
    pub message:   String,
    pub author:    Option<RawSignature,>,
    #[serde(default)]
    pub committer: Option<RawSignature,>,
}

/// Commit as returned by the commit listing, without line statistics.
#[derive(Debug, Clone, Deserialize,)]
pub struct RawCommit
{
    pub sha:      String,
    pub html_url: String,
    pub commit:   RawCommitBody,
    pub author:   Option<RawUser,>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize,)]
pub struct RawCommitStats
{
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub total:     u64,
}

/// Single commit lookup result carrying line statistics.
#[derive(Debug, Clone, Deserialize,)]
pub struct RawCommitDetail
{
    pub sha:   String,
    #[serde(default)]
    pub stats: Option<RawCommitStats,>,
}

#[derive(Debug, Clone, Deserialize,)]
pub struct RawPull
{
    pub number:    u64,
    pub state:     String,
    pub merged_at: Option<DateTime<Utc,>,>,
}

#[derive(Debug, Clone, Deserialize,)]
pub struct RawContributor
{
    pub login:         String,
    #[serde(default)]
    pub contributions: u64,
}

/// Read-only view of the hosting service.
///
/// Implementations perform exactly one upstream request per call and report
/// failures verbatim as [`UpstreamFailure`]; classification into the crate
/// error taxonomy happens in the calling component.
#[async_trait]
pub trait Upstream: Send + Sync
{
    /// Looks up a repository by identifier.
    async fn repository(
        &self,
        id: &RepositoryIdentifier,
    ) -> Result<RawRepository, UpstreamFailure,>;

    /// Lists the topics attached to a repository.
    async fn topics(&self, id: &RepositoryIdentifier,) -> Result<Vec<String,>, UpstreamFailure,>;

    /// Lists one page of issues matching `query`.
    async fn issues(
        &self,
        id: &RepositoryIdentifier,
        query: &IssueQuery,
        page: PageRequest,
    ) -> Result<Page<RawIssue,>, UpstreamFailure,>;

    /// Fetches the README at the default location.
    async fn readme(&self, id: &RepositoryIdentifier,) -> Result<RawReadme, UpstreamFailure,>;

    /// Lists one page of commits authored at or after `since`.
    async fn commits(
        &self,
        id: &RepositoryIdentifier,
        since: DateTime<Utc,>,
        page: PageRequest,
    ) -> Result<Page<RawCommit,>, UpstreamFailure,>;

    /// Fetches a single commit including its line statistics.
    async fn commit(
        &self,
        id: &RepositoryIdentifier,
        sha: &str,
    ) -> Result<RawCommitDetail, UpstreamFailure,>;

    /// Lists one page of pull requests in the given state.
    async fn pulls(
        &self,
        id: &RepositoryIdentifier,
        state: StateFilter,
        page: PageRequest,
    ) -> Result<Page<RawPull,>, UpstreamFailure,>;

    /// Lists one page of contributors in upstream ranking order.
    async fn contributors(
        &self,
        id: &RepositoryIdentifier,
        page: PageRequest,
    ) -> Result<Page<RawContributor,>, UpstreamFailure,>;
}
