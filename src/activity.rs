// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Windowed activity aggregation for a repository.
///
/// Commits and issues are counted inside the look-back window. Pull requests
/// and contributors are not, since the upstream listings offer no date filter
/// for them. The first failing query aborts the aggregation.
use tracing::{debug, info};

use crate::{
    error::{Error, Lookup, classify},
    identifier::RepositoryIdentifier,
    models::{ActivityMetrics, StateFilter},
    paging,
    resolver::RepositoryResolver,
    session::Session,
    upstream::IssueQuery,
    window::Window,
};

/// Number of contributor logins reported in
/// [`ActivityMetrics::top_contributors`].
pub const TOP_CONTRIBUTORS: usize = 10;

/// Computes [`ActivityMetrics`] for a repository.
#[derive(Debug, Clone, Copy,)]
pub struct ActivityAggregator<'s,>
{
    session: &'s Session,
}

impl<'s,> ActivityAggregator<'s,>
{
    pub fn new(session: &'s Session,) -> Self
    {
        Self {
            session,
        }
    }

    /// Aggregates activity of the last `days` days.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidArgument`] when `days` is zero.
    /// * The resolver taxonomy; a failure of any sub-query, including
    ///   [`Error::RateLimited`], discards every partial count.
    pub async fn get_metrics(&self, identifier: &str, days: u32,) -> Result<ActivityMetrics, Error,>
    {
        RepositoryIdentifier::parse(identifier,)?;
        self.get_metrics_in(identifier, Window::ending_now(days,)?,).await
    }

    /// Same as [`get_metrics`](Self::get_metrics) for an explicit window.
    ///
    /// # Errors
    ///
    /// See [`get_metrics`](Self::get_metrics).
    pub async fn get_metrics_in(
        &self,
        identifier: &str,
        window: Window,
    ) -> Result<ActivityMetrics, Error,>
    {
        let resolved = RepositoryResolver::new(self.session,).resolve(identifier,).await?;
        let id = resolved.identifier();
        let fail = |failure| classify(failure, &id.to_string(), Lookup::Listing,);
        let upstream = self.session.upstream();
        let per_page = self.session.per_page();
        let since = window.since();

        debug!("Counting commits for {} since {}", id, since.to_rfc3339());
        let commit_count =
            paging::count(per_page, |page| upstream.commits(id, since, page,), |_| true,)
                .await
                .map_err(fail,)?;

        let open_issues_count = self.count_issues(id, StateFilter::Open, window,).await?;
        let closed_issues_count = self.count_issues(id, StateFilter::Closed, window,).await?;

        debug!("Counting pull requests for {}", id);
        let open_prs_count =
            paging::count(per_page, |page| upstream.pulls(id, StateFilter::Open, page,), |_| true,)
                .await
                .map_err(fail,)?;
        let merged_prs_count = paging::count(
            per_page,
            |page| upstream.pulls(id, StateFilter::Closed, page,),
            |pull| pull.merged_at.is_some(),
        )
        .await
        .map_err(fail,)?;

        debug!("Listing contributors for {}", id);
        let contributors =
            paging::collect(per_page, None, |page| upstream.contributors(id, page,),)
                .await
                .map_err(fail,)?;
        let contributor_count = contributors.len() as u64;
        let top_contributors = contributors
            .into_iter()
            .take(TOP_CONTRIBUTORS,)
            .map(|contributor| contributor.login,)
            .collect();

        info!(
            "Computed activity metrics for {} (last {} days): {} commits, {} contributors",
            id,
            window.days(),
            commit_count,
            contributor_count
        );

        Ok(ActivityMetrics {
            commit_count,
            open_issues_count,
            closed_issues_count,
            open_prs_count,
            merged_prs_count,
            contributor_count,
            top_contributors,
            time_period_days: window.days(),
        },)
    }

    async fn count_issues(
        &self,
        id: &RepositoryIdentifier,
        state: StateFilter,
        window: Window,
    ) -> Result<u64, Error,>
    {
        debug!("Counting {} issues for {} updated since {}", state, id, window.since().to_rfc3339());
        let upstream = self.session.upstream();
        let query = &IssueQuery {
            state,
            since: Some(window.since(),),
        };
        paging::count(self.session.per_page(), |page| upstream.issues(id, query, page,), |_| true,)
            .await
            .map_err(|failure| classify(failure, &id.to_string(), Lookup::Listing,),)
    }
}
