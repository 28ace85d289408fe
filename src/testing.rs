// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! In-memory upstream used by the unit tests.
//!
//! The fixture honours the server-side filters of the real service (state,
//! since) and its pagination, records every call and can be told to fail
//! specific endpoints or pages.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};

use crate::{
    error::UpstreamFailure,
    identifier::RepositoryIdentifier,
    models::{IssueState, StateFilter},
    session::Session,
    upstream::{
        IssueQuery, Page, PageRequest, RawCommit, RawCommitBody, RawCommitDetail, RawCommitStats,
        RawContributor, RawIssue, RawLabel, RawLicense, RawOwner, RawPull, RawReadme,
        RawRepository, RawSignature, RawUser, Upstream,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
pub(crate) enum Endpoint
{
    Repository,
    Topics,
    Issues,
    Readme,
    Commits,
    Commit,
    Pulls,
    Contributors,
}

#[derive(Debug, Clone, PartialEq, Eq,)]
pub(crate) struct Call
{
    pub endpoint: Endpoint,
    pub page:     Option<u32,>,
}

#[derive(Debug, Clone,)]
pub(crate) struct FixtureCommit
{
    pub summary: RawCommit,
    pub stats:   Option<RawCommitStats,>,
}

#[derive(Debug, Clone,)]
struct PlannedFailure
{
    endpoint: Endpoint,
    page:     Option<u32,>,
    failure:  UpstreamFailure,
}

#[derive(Debug, Clone, Default,)]
pub(crate) struct FixtureUpstream
{
    repository:   Option<RawRepository,>,
    topics:       Vec<String,>,
    issues:       Vec<RawIssue,>,
    readme:       Option<RawReadme,>,
    commits:      Vec<FixtureCommit,>,
    pulls:        Vec<RawPull,>,
    contributors: Vec<RawContributor,>,
    failures:     Vec<PlannedFailure,>,
    per_page:     Option<u8,>,
    calls:        Arc<Mutex<Vec<Call,>,>,>,
}

impl FixtureUpstream
{
    /// Upstream without any repository.
    pub fn empty() -> Self
    {
        Self::default()
    }

    /// Upstream serving the public `octo/demo` repository.
    pub fn demo() -> Self
    {
        Self::empty()
            .with_repository(repository("octo/demo", Some("public",),),)
            .with_topics(&["analytics", "rust",],)
    }

    pub fn with_repository(mut self, repository: RawRepository,) -> Self
    {
        self.repository = Some(repository,);
        self
    }

    pub fn with_topics(mut self, topics: &[&str],) -> Self
    {
        self.topics = topics.iter().map(|topic| (*topic).to_owned(),).collect();
        self
    }

    pub fn with_issues(mut self, issues: Vec<RawIssue,>,) -> Self
    {
        self.issues = issues;
        self
    }

    pub fn with_readme(mut self, readme: RawReadme,) -> Self
    {
        self.readme = Some(readme,);
        self
    }

    pub fn with_commits(mut self, commits: Vec<FixtureCommit,>,) -> Self
    {
        self.commits = commits;
        self
    }

    /// Drops the line statistics of the commit created from `seed`.
    pub fn without_stats(mut self, seed: u32,) -> Self
    {
        let sha = format!("{seed:040x}");
        for commit in self.commits.iter_mut().filter(|commit| commit.summary.sha == sha,) {
            commit.stats = None;
        }
        self
    }

    pub fn with_pulls(mut self, pulls: Vec<RawPull,>,) -> Self
    {
        self.pulls = pulls;
        self
    }

    pub fn with_contributors(mut self, logins: &[&str],) -> Self
    {
        self.contributors = logins
            .iter()
            .enumerate()
            .map(|(rank, login,)| RawContributor {
                login:         (*login).to_owned(),
                contributions: (logins.len() - rank) as u64,
            },)
            .collect();
        self
    }

    pub fn with_per_page(mut self, per_page: u8,) -> Self
    {
        self.per_page = Some(per_page,);
        self
    }

    /// Fails every call to `endpoint`.
    pub fn failing(mut self, endpoint: Endpoint, failure: UpstreamFailure,) -> Self
    {
        self.failures.push(PlannedFailure {
            endpoint,
            page: None,
            failure,
        },);
        self
    }

    /// Fails only the given page of a listing endpoint.
    pub fn failing_on_page(mut self, endpoint: Endpoint, page: u32, failure: UpstreamFailure,) -> Self
    {
        self.failures.push(PlannedFailure {
            endpoint,
            page: Some(page,),
            failure,
        },);
        self
    }

    /// Session backed by a clone of the fixture sharing its call log.
    pub fn session(&self,) -> Session
    {
        Session::with_upstream(Arc::new(self.clone(),), self.per_page.unwrap_or(100,),)
    }

    pub fn calls(&self,) -> Vec<Call,>
    {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, endpoint: Endpoint,) -> usize
    {
        self.calls.lock().unwrap().iter().filter(|call| call.endpoint == endpoint,).count()
    }

    fn record(&self, endpoint: Endpoint, page: Option<u32,>,) -> Result<(), UpstreamFailure,>
    {
        self.calls.lock().unwrap().push(Call {
            endpoint,
            page,
        },);

        let planned = self.failures.iter().find(|planned| {
            planned.endpoint == endpoint && (planned.page.is_none() || planned.page == page)
        },);
        match planned {
            Some(planned,) => Err(planned.failure.clone(),),
            None => Ok((),),
        }
    }
}

fn paginate<T: Clone,>(items: &[T], request: PageRequest,) -> Page<T,>
{
    let size = usize::from(request.size,);
    let start = (request.number as usize - 1) * size;
    let end = (start + size).min(items.len(),);
    Page {
        items:    items.get(start..end,).map(<[T]>::to_vec,).unwrap_or_default(),
        has_next: end < items.len(),
    }
}

fn not_found() -> UpstreamFailure
{
    UpstreamFailure::new(404, "Not Found",)
}

fn state_of(raw: &str,) -> IssueState
{
    if raw == "closed" { IssueState::Closed } else { IssueState::Open }
}

#[async_trait]
impl Upstream for FixtureUpstream
{
    async fn repository(
        &self,
        _id: &RepositoryIdentifier,
    ) -> Result<RawRepository, UpstreamFailure,>
    {
        self.record(Endpoint::Repository, None,)?;
        self.repository.clone().ok_or_else(not_found,)
    }

    async fn topics(&self, _id: &RepositoryIdentifier,) -> Result<Vec<String,>, UpstreamFailure,>
    {
        self.record(Endpoint::Topics, None,)?;
        Ok(self.topics.clone(),)
    }

    async fn issues(
        &self,
        _id: &RepositoryIdentifier,
        query: &IssueQuery,
        page: PageRequest,
    ) -> Result<Page<RawIssue,>, UpstreamFailure,>
    {
        self.record(Endpoint::Issues, Some(page.number,),)?;
        let matching: Vec<RawIssue,> = self
            .issues
            .iter()
            .filter(|issue| query.state.accepts(state_of(&issue.state,),),)
            .filter(|issue| query.since.is_none_or(|since| issue.updated_at >= since,),)
            .cloned()
            .collect();
        Ok(paginate(&matching, page,),)
    }

    async fn readme(&self, _id: &RepositoryIdentifier,) -> Result<RawReadme, UpstreamFailure,>
    {
        self.record(Endpoint::Readme, None,)?;
        self.readme.clone().ok_or_else(not_found,)
    }

    async fn commits(
        &self,
        _id: &RepositoryIdentifier,
        since: DateTime<Utc,>,
        page: PageRequest,
    ) -> Result<Page<RawCommit,>, UpstreamFailure,>
    {
        self.record(Endpoint::Commits, Some(page.number,),)?;
        let matching: Vec<RawCommit,> = self
            .commits
            .iter()
            .filter(|commit| {
                let body = &commit.summary.commit;
                body.author
                    .as_ref()
                    .or(body.committer.as_ref(),)
                    .is_some_and(|signature| signature.date.with_timezone(&Utc,) >= since,)
            },)
            .map(|commit| commit.summary.clone(),)
            .collect();
        Ok(paginate(&matching, page,),)
    }

    async fn commit(
        &self,
        _id: &RepositoryIdentifier,
        sha: &str,
    ) -> Result<RawCommitDetail, UpstreamFailure,>
    {
        self.record(Endpoint::Commit, None,)?;
        self.commits
            .iter()
            .find(|commit| commit.summary.sha == sha,)
            .map(|commit| RawCommitDetail {
                sha:   commit.summary.sha.clone(),
                stats: commit.stats,
            },)
            .ok_or_else(not_found,)
    }

    async fn pulls(
        &self,
        _id: &RepositoryIdentifier,
        state: StateFilter,
        page: PageRequest,
    ) -> Result<Page<RawPull,>, UpstreamFailure,>
    {
        self.record(Endpoint::Pulls, Some(page.number,),)?;
        let matching: Vec<RawPull,> =
            self.pulls.iter().filter(|pull| state.accepts(state_of(&pull.state,),),).cloned().collect();
        Ok(paginate(&matching, page,),)
    }

    async fn contributors(
        &self,
        _id: &RepositoryIdentifier,
        page: PageRequest,
    ) -> Result<Page<RawContributor,>, UpstreamFailure,>
    {
        self.record(Endpoint::Contributors, Some(page.number,),)?;
        Ok(paginate(&self.contributors, page,),)
    }
}

pub(crate) fn timestamp(year: i32, month: u32, day: u32,) -> DateTime<Utc,>
{
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0,).unwrap()
}

pub(crate) fn repository(full_name: &str, visibility: Option<&str,>,) -> RawRepository
{
    let (owner, name,) = full_name.split_once('/',).unwrap();
    RawRepository {
        name:              name.to_owned(),
        full_name:         full_name.to_owned(),
        description:       Some("Demo repository".to_owned(),),
        owner:             RawOwner {
            login:      owner.to_owned(),
            avatar_url: format!("https://avatars.example.com/{owner}.png"),
            html_url:   format!("https://github.com/{owner}"),
        },
        html_url:          format!("https://github.com/{full_name}"),
        url:               format!("https://api.github.com/repos/{full_name}"),
        stargazers_count:  42,
        forks_count:       7,
        watchers_count:    42,
        open_issues_count: 3,
        language:          Some("Rust".to_owned(),),
        license:           Some(RawLicense {
            name: "MIT License".to_owned(),
        },),
        created_at:        timestamp(2020, 1, 1,),
        updated_at:        timestamp(2024, 6, 1,),
        pushed_at:         Some(timestamp(2024, 6, 2,),),
        visibility:        visibility.map(str::to_owned,),
        private:           false,
        default_branch:    "main".to_owned(),
    }
}

pub(crate) fn issue(
    number: u64,
    state: &str,
    updated_at: DateTime<Utc,>,
    body: Option<String,>,
) -> RawIssue
{
    RawIssue {
        number,
        title: format!("Issue {number}"),
        state: state.to_owned(),
        created_at: updated_at,
        updated_at,
        closed_at: (state == "closed").then_some(updated_at,),
        user: Some(RawUser {
            login: "reporter".to_owned(),
        },),
        labels: vec![
            RawLabel {
                name: "bug".to_owned(),
            },
            RawLabel {
                name: "triage".to_owned(),
            },
        ],
        comments: number % 5,
        html_url: format!("https://github.com/octo/demo/issues/{number}"),
        body,
    }
}

pub(crate) fn commit(
    seed: u32,
    date: DateTime<FixedOffset,>,
    additions: u64,
    deletions: u64,
) -> FixtureCommit
{
    let sha = format!("{seed:040x}");
    FixtureCommit {
        summary: RawCommit {
            sha:      sha.clone(),
            html_url: format!("https://github.com/octo/demo/commit/{sha}"),
            commit:   RawCommitBody {
                message:   format!("Change {seed}"),
                author:    Some(RawSignature {
                    name: "Octo Cat".to_owned(),
                    date,
                },),
                committer: None,
            },
            author:   (seed % 2 == 0).then(|| RawUser {
                login: "octocat".to_owned(),
            },),
        },
        stats:   Some(RawCommitStats {
            additions,
            deletions,
            total: additions + deletions,
        },),
    }
}

/// Moves the author signature of `commit` to the committer slot.
pub(crate) fn committer_only(mut commit: FixtureCommit,) -> FixtureCommit
{
    let body = &mut commit.summary.commit;
    body.committer = body.author.take();
    commit
}

pub(crate) fn pull(number: u64, state: &str, merged: bool,) -> RawPull
{
    RawPull {
        number,
        state: state.to_owned(),
        merged_at: merged.then(|| timestamp(2024, 5, 1,),),
    }
}

/// README payload encoded the way the upstream service does, wrapped at 60
/// characters per line.
pub(crate) fn readme(text: &str,) -> RawReadme
{
    let encoded = STANDARD.encode(text.as_bytes(),);
    let wrapped = encoded
        .as_bytes()
        .chunks(60,)
        .map(|chunk| String::from_utf8_lossy(chunk,).into_owned(),)
        .collect::<Vec<_,>>()
        .join("\n",);
    RawReadme {
        name:         "README.md".to_owned(),
        path:         "README.md".to_owned(),
        size:         text.len() as u64,
        content:      wrapped,
        encoding:     Some("base64".to_owned(),),
        download_url: Some("https://raw.githubusercontent.com/octo/demo/main/README.md".to_owned(),),
    }
}
