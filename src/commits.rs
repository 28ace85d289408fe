// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Time-windowed commit history with per-commit line statistics.
use tracing::{debug, info};

use crate::{
    error::{Error, Lookup, classify},
    identifier::RepositoryIdentifier,
    models::{Commit, CommitStats},
    paging,
    resolver::RepositoryResolver,
    session::Session,
    upstream::{RawCommit, RawSignature},
    window::Window,
};

/// Default look-back used by the commit-based operations.
pub const DEFAULT_DAYS: u32 = 30;
/// Default number of commits returned by
/// [`CommitHistoryReader::list_commits`].
pub const DEFAULT_MAX_COMMITS: u32 = 50;

/// Lists recent commits of a repository.
#[derive(Debug, Clone, Copy,)]
pub struct CommitHistoryReader<'s,>
{
    session: &'s Session,
}

impl<'s,> CommitHistoryReader<'s,>
{
    pub fn new(session: &'s Session,) -> Self
    {
        Self {
            session,
        }
    }

    /// Returns at most `max_commits` commits authored in the last `days`
    /// days, in upstream order (newest first).
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidArgument`] when `days` or `max_commits` is zero.
    /// * The resolver taxonomy, including [`Error::RateLimited`] raised while
    ///   paging or while fetching per-commit statistics.
    pub async fn list_commits(
        &self,
        identifier: &str,
        days: u32,
        max_commits: u32,
    ) -> Result<Vec<Commit,>, Error,>
    {
        RepositoryIdentifier::parse(identifier,)?;
        self.list_commits_in(identifier, Window::ending_now(days,)?, max_commits,).await
    }

    /// Same as [`list_commits`](Self::list_commits) for an explicit window.
    ///
    /// # Errors
    ///
    /// See [`list_commits`](Self::list_commits).
    pub async fn list_commits_in(
        &self,
        identifier: &str,
        window: Window,
        max_commits: u32,
    ) -> Result<Vec<Commit,>, Error,>
    {
        RepositoryIdentifier::parse(identifier,)?;
        if max_commits == 0 {
            return Err(Error::invalid_argument("max_commits must be a positive integer",),);
        }

        let resolved = RepositoryResolver::new(self.session,).resolve(identifier,).await?;
        let id = resolved.identifier();
        debug!(
            "Listing commits for {} since {} (max: {})",
            id,
            window.since().to_rfc3339(),
            max_commits
        );

        let summaries = commits_since(self.session, id, window, Some(max_commits as usize,),).await?;

        let mut commits = Vec::with_capacity(summaries.len(),);
        for summary in summaries {
            let detail = self
                .session
                .upstream()
                .commit(id, &summary.sha,)
                .await
                .map_err(|failure| classify(failure, &id.to_string(), Lookup::Listing,),)?;
            let stats = detail
                .stats
                .map(|stats| CommitStats::new(stats.additions, stats.deletions,),)
                .ok_or_else(|| {
                    Error::upstream_data(format!("commit {} has no line statistics", summary.sha),)
                },)?;
            commits.push(normalize_commit(summary, stats,)?,);
        }

        info!("Retrieved {} commits for {} (last {} days)", commits.len(), id, window.days());
        Ok(commits,)
    }
}

/// Lists commit summaries authored inside `window`, up to `limit` items.
pub(crate) async fn commits_since(
    session: &Session,
    id: &RepositoryIdentifier,
    window: Window,
    limit: Option<usize,>,
) -> Result<Vec<RawCommit,>, Error,>
{
    let upstream = session.upstream();
    let since = window.since();
    paging::collect(session.per_page(), limit, |page| upstream.commits(id, since, page,),)
        .await
        .map_err(|failure| classify(failure, &id.to_string(), Lookup::Listing,),)
}

/// Author signature of `raw`, or the committer's when the author is absent.
pub(crate) fn signature(raw: &RawCommit,) -> Result<&RawSignature, Error,>
{
    raw.commit.author.as_ref().or(raw.commit.committer.as_ref(),).ok_or_else(|| {
        Error::upstream_data(format!("commit {} has neither author nor committer", raw.sha),)
    },)
}

fn normalize_commit(raw: RawCommit, stats: CommitStats,) -> Result<Commit, Error,>
{
    let RawSignature {
        name,
        date,
    } = signature(&raw,)?.clone();

    Ok(Commit {
        sha: raw.sha,
        message: raw.commit.message,
        author: name,
        author_login: raw.author.map(|user| user.login,),
        date,
        html_url: raw.html_url,
        stats,
    },)
}
