// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// [`Upstream`] implementation backed by the GitHub REST API.
///
/// Every call issues exactly one request through [`Octocrab`] and
/// deserializes the payload into the raw records of [`crate::upstream`].
/// Pagination is driven by the caller; a page shorter than the requested size
/// is the last one.
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use octocrab::Octocrab;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    config::SessionConfig,
    error::{Error, UpstreamFailure},
    identifier::RepositoryIdentifier,
    models::StateFilter,
    upstream::{
        IssueQuery, Page, PageRequest, RawCommit, RawCommitDetail, RawContributor, RawIssue,
        RawPull, RawReadme, RawRepository, Upstream,
    },
};

/// GitHub client holding the session credential.
#[derive(Clone,)]
pub struct GitHubUpstream
{
    octocrab: Octocrab,
}

impl GitHubUpstream
{
    /// Builds an authenticated client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the base URL is malformed or the HTTP
    /// client cannot be constructed.
    pub fn new(config: &SessionConfig,) -> Result<Self, Error,>
    {
        let mut builder = Octocrab::builder().personal_token(config.token().to_owned(),);
        if let Some(base_url,) = config.api_base_url() {
            builder = builder
                .base_uri(base_url,)
                .map_err(|e| Error::config(format!("invalid API base URL '{base_url}': {e}"),),)?;
        }
        let octocrab =
            builder.build().map_err(|e| Error::config(format!("failed to build octocrab: {e}"),),)?;

        Ok(Self {
            octocrab,
        },)
    }

    async fn fetch<T, P,>(&self, route: String, params: Option<&P,>,) -> Result<T, UpstreamFailure,>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        debug!("GET {}", route);
        self.octocrab.get(route, params,).await.map_err(failure_from,)
    }

    async fn fetch_page<T, P,>(
        &self,
        route: String,
        params: &P,
        page: PageRequest,
    ) -> Result<Page<T,>, UpstreamFailure,>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let items: Vec<T,> = self
            .fetch(
                route,
                Some(&Paged {
                    filters:  params,
                    per_page: page.size,
                    page:     page.number,
                },),
            )
            .await?;
        let has_next = items.len() >= usize::from(page.size,);
        Ok(Page {
            items,
            has_next,
        },)
    }
}

#[derive(Serialize,)]
struct Paged<'a, P: ?Sized,>
{
    #[serde(flatten)]
    filters:  &'a P,
    per_page: u8,
    page:     u32,
}

#[derive(Serialize,)]
struct NoFilters {}

#[derive(Serialize,)]
struct IssueFilters
{
    state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    since: Option<String,>,
}

#[derive(Serialize,)]
struct SinceFilter
{
    since: String,
}

#[derive(Serialize,)]
struct StateFilterParam
{
    state: &'static str,
}

#[derive(Deserialize,)]
struct Topics
{
    #[serde(default)]
    names: Vec<String,>,
}

fn timestamp(value: DateTime<Utc,>,) -> String
{
    value.to_rfc3339_opts(SecondsFormat::Secs, true,)
}

fn repo_route(id: &RepositoryIdentifier, suffix: &str,) -> String
{
    format!("/repos/{}/{}{suffix}", id.owner(), id.name())
}

/// Converts an octocrab error into an [`UpstreamFailure`], keeping the HTTP
/// status and message of API errors.
fn failure_from(error: octocrab::Error,) -> UpstreamFailure
{
    match error {
        octocrab::Error::GitHub { source, .. } => {
            UpstreamFailure::new(source.status_code.as_u16(), source.message,)
        }
        other => UpstreamFailure::transport(other.to_string(),),
    }
}

#[async_trait]
impl Upstream for GitHubUpstream
{
    async fn repository(&self, id: &RepositoryIdentifier,) -> Result<RawRepository, UpstreamFailure,>
    {
        self.fetch(repo_route(id, "",), None::<&(),>,).await
    }

    async fn topics(&self, id: &RepositoryIdentifier,) -> Result<Vec<String,>, UpstreamFailure,>
    {
        let topics: Topics = self.fetch(repo_route(id, "/topics",), None::<&(),>,).await?;
        Ok(topics.names,)
    }

    async fn issues(
        &self,
        id: &RepositoryIdentifier,
        query: &IssueQuery,
        page: PageRequest,
    ) -> Result<Page<RawIssue,>, UpstreamFailure,>
    {
        let filters = IssueFilters {
            state: query.state.as_str(),
            since: query.since.map(timestamp,),
        };
        self.fetch_page(repo_route(id, "/issues",), &filters, page,).await
    }

    async fn readme(&self, id: &RepositoryIdentifier,) -> Result<RawReadme, UpstreamFailure,>
    {
        self.fetch(repo_route(id, "/readme",), None::<&(),>,).await
    }

    async fn commits(
        &self,
        id: &RepositoryIdentifier,
        since: DateTime<Utc,>,
        page: PageRequest,
    ) -> Result<Page<RawCommit,>, UpstreamFailure,>
    {
        let filters = SinceFilter {
            since: timestamp(since,),
        };
        self.fetch_page(repo_route(id, "/commits",), &filters, page,).await
    }

    async fn commit(
        &self,
        id: &RepositoryIdentifier,
        sha: &str,
    ) -> Result<RawCommitDetail, UpstreamFailure,>
    {
        self.fetch(repo_route(id, &format!("/commits/{sha}"),), None::<&(),>,).await
    }

    async fn pulls(
        &self,
        id: &RepositoryIdentifier,
        state: StateFilter,
        page: PageRequest,
    ) -> Result<Page<RawPull,>, UpstreamFailure,>
    {
        let filters = StateFilterParam {
            state: state.as_str(),
        };
        self.fetch_page(repo_route(id, "/pulls",), &filters, page,).await
    }

    async fn contributors(
        &self,
        id: &RepositoryIdentifier,
        page: PageRequest,
    ) -> Result<Page<RawContributor,>, UpstreamFailure,>
    {
        self.fetch_page(repo_route(id, "/contributors",), &NoFilters {}, page,).await
    }
}

#[cfg(test)]
mod tests
{
    use chrono::TimeZone;

    use super::*;

    fn demo() -> RepositoryIdentifier
    {
        RepositoryIdentifier::parse("octo/demo",).unwrap()
    }

    #[test]
    fn routes_target_the_repository()
    {
        assert_eq!(repo_route(&demo(), ""), "/repos/octo/demo");
        assert_eq!(repo_route(&demo(), "/commits/abc"), "/repos/octo/demo/commits/abc");
    }

    #[test]
    fn since_is_sent_as_utc_seconds()
    {
        let instant = Utc.with_ymd_and_hms(2024, 3, 3, 15, 42, 7,).unwrap();
        assert_eq!(timestamp(instant), "2024-03-03T15:42:07Z");
    }

    #[test]
    fn paged_issue_filters_are_flattened()
    {
        let filters = IssueFilters {
            state: "closed",
            since: None,
        };
        let query = serde_json::to_value(Paged {
            filters:  &filters,
            per_page: 50,
            page:     3,
        },)
        .expect("serialization failed",);
        assert_eq!(query, serde_json::json!({"state": "closed", "per_page": 50, "page": 3}));
    }

    #[test]
    fn topics_payload_is_read()
    {
        let topics: Topics =
            serde_json::from_str(r#"{"names":["rust","analytics"]}"#,).expect("valid payload",);
        assert_eq!(topics.names, vec!["rust".to_owned(), "analytics".to_owned()]);
    }

    #[test]
    fn commit_detail_payload_is_read()
    {
        let detail: RawCommitDetail = serde_json::from_str(
            r#"{"sha":"abc","stats":{"additions":3,"deletions":1,"total":4},"files":[]}"#,
        )
        .expect("valid payload",);
        let stats = detail.stats.expect("stats present",);
        assert_eq!((stats.additions, stats.deletions, stats.total), (3, 1, 4));
    }

    #[test]
    fn invalid_base_url_is_a_config_error()
    {
        let config = SessionConfig::new("token",)
            .expect("valid token",)
            .with_api_base_url("not a url with spaces",);
        assert!(matches!(GitHubUpstream::new(&config), Err(Error::Config { .. })));
    }
}
