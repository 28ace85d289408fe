// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Daily commit histograms and the chart built from them.
///
/// Commits are bucketed by the calendar date of their authored timestamp in
/// the offset reported upstream. The histogram always spans every day from the
/// window start to the window end, zero-filled. A local date that falls one
/// day past either end of the UTC window is counted in the edge bucket, so
/// every listed commit is counted exactly once.
use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::{
    chart::{ChartRenderer, ChartRequest, RenderedChart},
    commits::{commits_since, signature},
    error::Error,
    identifier::RepositoryIdentifier,
    models::{DailyBucket, DailyCommitHistogram},
    resolver::RepositoryResolver,
    session::Session,
    window::Window,
};

/// Bucket count above which axis labels are thinned.
pub const MAX_DENSE_LABELS: usize = 14;

/// Histogram together with the chart rendered from it.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct ActivityChart
{
    pub histogram:  DailyCommitHistogram,
    pub label_step: usize,
    pub chart:      RenderedChart,
}

/// Builds commit-per-day histograms for a repository.
#[derive(Debug, Clone, Copy,)]
pub struct HistogramBuilder<'s,>
{
    session: &'s Session,
}

impl<'s,> HistogramBuilder<'s,>
{
    pub fn new(session: &'s Session,) -> Self
    {
        Self {
            session,
        }
    }

    /// Counts the commits authored on each day of the last `days` days.
    ///
    /// The result holds one bucket per calendar day from the window start to
    /// today inclusive, so a 30-day window yields 31 buckets.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidArgument`] when `days` is zero.
    /// * The resolver taxonomy, including [`Error::RateLimited`] raised on any
    ///   page of the commit listing.
    pub async fn build_daily_histogram(
        &self,
        identifier: &str,
        days: u32,
    ) -> Result<DailyCommitHistogram, Error,>
    {
        RepositoryIdentifier::parse(identifier,)?;
        self.build_in(identifier, Window::ending_now(days,)?,).await
    }

    /// Same as [`build_daily_histogram`](Self::build_daily_histogram) for an
    /// explicit window.
    ///
    /// # Errors
    ///
    /// See [`build_daily_histogram`](Self::build_daily_histogram).
    pub async fn build_in(
        &self,
        identifier: &str,
        window: Window,
    ) -> Result<DailyCommitHistogram, Error,>
    {
        let resolved = RepositoryResolver::new(self.session,).resolve(identifier,).await?;
        let id = resolved.identifier();
        debug!("Bucketing commits for {} since {}", id, window.since().to_rfc3339());

        let (first, last,) = (window.first_date(), window.last_date(),);
        let commits = commits_since(self.session, id, window, None,).await?;
        let dates = commits
            .iter()
            .map(|commit| signature(commit,).map(|signed| signed.date.date_naive().clamp(first, last,),),)
            .collect::<Result<Vec<NaiveDate,>, Error,>>()?;
        let histogram = bucket_commit_dates(dates, first, last,);

        info!(
            "Built {}-day histogram for {}: {} commits in {} buckets",
            window.days(),
            id,
            histogram.total(),
            histogram.len()
        );
        Ok(histogram,)
    }

    /// Builds the histogram of the last `days` days and renders it.
    ///
    /// # Errors
    ///
    /// Propagates failures of
    /// [`build_daily_histogram`](Self::build_daily_histogram) and of the
    /// renderer.
    pub async fn render_activity_chart<R,>(
        &self,
        identifier: &str,
        days: u32,
        renderer: &R,
    ) -> Result<ActivityChart, Error,>
    where
        R: ChartRenderer + ?Sized,
    {
        let id = RepositoryIdentifier::parse(identifier,)?;
        let window = Window::ending_now(days,)?;
        let histogram = self.build_in(identifier, window,).await?;
        let label_step = label_step(histogram.len(),);

        let title = format!("Commit Activity for {id} (Last {days} Days)");
        let chart = renderer.render(&ChartRequest {
            title: &title,
            x_label: "Date",
            y_label: "Number of Commits",
            histogram: &histogram,
            label_step,
        },)?;

        Ok(ActivityChart {
            histogram,
            label_step,
            chart,
        },)
    }
}

/// Counts `dates` into one bucket per day of `[first, last]`.
///
/// Days without commits get a zero bucket; dates outside the range are
/// ignored. An inverted range yields an empty histogram.
pub fn bucket_commit_dates<I,>(dates: I, first: NaiveDate, last: NaiveDate,) -> DailyCommitHistogram
where
    I: IntoIterator<Item = NaiveDate,>,
{
    let mut counts: BTreeMap<NaiveDate, u64,> = BTreeMap::new();
    let mut skipped = 0usize;
    for date in dates {
        if date < first || date > last {
            skipped += 1;
            continue;
        }
        *counts.entry(date,).or_default() += 1;
    }
    if skipped > 0 {
        debug!("Ignored {} commit dates outside {}..={}", skipped, first, last);
    }

    let buckets = first
        .iter_days()
        .take_while(|date| *date <= last,)
        .map(|date| DailyBucket {
            date,
            count: counts.get(&date,).copied().unwrap_or(0,),
        },)
        .collect();

    DailyCommitHistogram {
        buckets,
    }
}

/// Distance between labelled x-axis ticks for `bucket_count` bars.
///
/// Up to 14 buckets every tick is labelled; beyond that every
/// `bucket_count / 14 + 1`-th tick is.
pub fn label_step(bucket_count: usize,) -> usize
{
    if bucket_count > MAX_DENSE_LABELS { bucket_count / MAX_DENSE_LABELS + 1 } else { 1 }
}

/// Indices of the labelled ticks: `0, step, 2 * step, ...` below `bucket_count`.
pub fn labeled_indices(bucket_count: usize,) -> impl Iterator<Item = usize,>
{
    (0..bucket_count).step_by(label_step(bucket_count,),)
}

#[cfg(test)]
mod tests
{
    use chrono::{Duration, FixedOffset, TimeZone, Utc};
    use proptest::prelude::*;

    use super::*;
    use crate::{
        chart::SvgBarChart,
        commits::CommitHistoryReader,
        error::UpstreamFailure,
        testing::{Endpoint, FixtureCommit, FixtureUpstream, commit, committer_only},
    };

    fn date(year: i32, month: u32, day: u32,) -> NaiveDate
    {
        NaiveDate::from_ymd_opt(year, month, day,).unwrap()
    }

    fn spread_commits(now: chrono::DateTime<Utc,>,) -> Vec<FixtureCommit,>
    {
        (0..40u32)
            .map(|seed| {
                let age = Duration::hours(i64::from(seed,) * 19,);
                commit(seed, (now - age).fixed_offset(), 1, 0,)
            },)
            .collect()
    }

    proptest! {
        #[test]
        fn labelled_ticks_cover_the_axis(bucket_count in 1usize..400) {
            let step = label_step(bucket_count);
            let labelled = labeled_indices(bucket_count).count();
            if bucket_count > MAX_DENSE_LABELS {
                prop_assert_eq!(step, bucket_count / 14 + 1);
                prop_assert_eq!(labelled, bucket_count.div_ceil(step));
            } else {
                prop_assert_eq!(step, 1);
                prop_assert_eq!(labelled, bucket_count);
            }
        }

        #[test]
        fn bucketing_keeps_every_in_range_date(offsets in proptest::collection::vec(0u64..31, 0..200)) {
            let first = date(2024, 1, 1);
            let last = date(2024, 1, 31);
            let dates: Vec<NaiveDate> =
                offsets.iter().map(|offset| first + chrono::Days::new(*offset)).collect();

            let histogram = bucket_commit_dates(dates.clone(), first, last);
            prop_assert_eq!(histogram.len(), 31);
            prop_assert_eq!(histogram.total(), dates.len() as u64);
            prop_assert!(histogram.buckets.windows(2).all(|pair| pair[0].date < pair[1].date));
        }
    }

    #[test]
    fn thirty_one_buckets_label_every_third_tick()
    {
        assert_eq!(label_step(31), 3);
        assert_eq!(labeled_indices(31,).collect::<Vec<_>>(), vec![
            0, 3, 6, 9, 12, 15, 18, 21, 24, 27, 30
        ]);
        assert_eq!(label_step(14), 1);
        assert_eq!(label_step(15), 2);
    }

    #[test]
    fn out_of_range_dates_are_ignored()
    {
        let histogram = bucket_commit_dates(
            [date(2023, 12, 31,), date(2024, 1, 2,), date(2024, 1, 2,), date(2024, 1, 5,)],
            date(2024, 1, 1,),
            date(2024, 1, 3,),
        );
        let counts: Vec<u64,> = histogram.buckets.iter().map(|bucket| bucket.count,).collect();
        assert_eq!(counts, vec![0, 2, 0]);
    }

    #[test]
    fn inverted_range_is_empty()
    {
        let histogram = bucket_commit_dates([date(2024, 1, 2,)], date(2024, 1, 3,), date(2024, 1, 1,),);
        assert!(histogram.is_empty());
    }

    #[test]
    fn authored_offset_decides_the_calendar_day()
    {
        let tokyo = FixedOffset::east_opt(9 * 3600,).unwrap();
        let authored = tokyo.with_ymd_and_hms(2024, 1, 2, 1, 30, 0,).unwrap();
        assert_eq!(authored.with_timezone(&Utc,).date_naive(), date(2024, 1, 1));

        let histogram =
            bucket_commit_dates([authored.date_naive()], date(2024, 1, 1,), date(2024, 1, 2,),);
        assert_eq!(histogram.buckets[1].count, 1);
    }

    #[tokio::test]
    async fn commits_across_the_date_line_land_in_the_edge_buckets()
    {
        let until = Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0,).unwrap();
        let window = Window::ending_at(until, 7,).expect("valid window",);
        let kiritimati = FixedOffset::east_opt(14 * 3600,).unwrap();
        let baker = FixedOffset::west_opt(12 * 3600,).unwrap();

        let late = Utc.with_ymd_and_hms(2024, 1, 1, 10, 30, 0,).unwrap().with_timezone(&kiritimati,);
        let early = Utc.with_ymd_and_hms(2023, 12, 25, 11, 30, 0,).unwrap().with_timezone(&baker,);
        assert_eq!(late.date_naive(), date(2024, 1, 2));
        assert_eq!(early.date_naive(), date(2023, 12, 24));

        let fixture = FixtureUpstream::demo()
            .with_commits(vec![commit(1, late, 1, 0,), committer_only(commit(2, early, 1, 0,))],);
        let session = fixture.session();

        let histogram =
            HistogramBuilder::new(&session,).build_in("octo/demo", window,).await.expect("histogram",);
        let listed = CommitHistoryReader::new(&session,)
            .list_commits_in("octo/demo", window, u32::MAX,)
            .await
            .expect("commits",);

        assert_eq!(listed.len(), 2);
        assert_eq!(histogram.total(), 2);
        assert_eq!(histogram.len(), 8);
        assert_eq!(histogram.buckets[0].count, 1);
        assert_eq!(histogram.buckets[7].count, 1);
    }

    #[tokio::test]
    async fn malformed_identifier_is_rejected_before_any_call()
    {
        let fixture = FixtureUpstream::demo().with_commits(spread_commits(Utc::now(),),);
        let session = fixture.session();
        let builder = HistogramBuilder::new(&session,);

        assert!(matches!(
            builder.build_daily_histogram("octo-demo", 0).await,
            Err(Error::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            builder.render_activity_chart("octo//demo", 30, &SvgBarChart::default()).await,
            Err(Error::InvalidIdentifier { .. })
        ));
        assert!(fixture.calls().is_empty());
    }

    #[tokio::test]
    async fn histogram_spans_the_window_and_matches_the_listing()
    {
        let now = Utc::now();
        let fixture = FixtureUpstream::demo().with_commits(spread_commits(now,),).with_per_page(7,);
        let session = fixture.session();
        let window = Window::ending_now(30,).expect("valid window",);

        let histogram =
            HistogramBuilder::new(&session,).build_in("octo/demo", window,).await.expect("histogram",);
        assert_eq!(histogram.len(), 31);
        assert_eq!(histogram.buckets[0].date, window.first_date());
        assert_eq!(histogram.buckets[30].date, window.last_date());

        let listed = CommitHistoryReader::new(&session,)
            .list_commits_in("octo/demo", window, u32::MAX,)
            .await
            .expect("commits",);
        assert_eq!(histogram.total(), listed.len() as u64);
    }

    #[tokio::test]
    async fn empty_history_is_zero_filled()
    {
        let fixture = FixtureUpstream::demo();
        let session = fixture.session();

        let histogram = HistogramBuilder::new(&session,)
            .build_daily_histogram("octo/demo", 7,)
            .await
            .expect("histogram",);
        assert_eq!(histogram.len(), 8);
        assert_eq!(histogram.total(), 0);
    }

    #[tokio::test]
    async fn rate_limited_page_fails_the_histogram()
    {
        let fixture = FixtureUpstream::demo()
            .with_commits(spread_commits(Utc::now(),),)
            .with_per_page(5,)
            .failing_on_page(Endpoint::Commits, 2, UpstreamFailure::new(403, "API rate limit exceeded",),);
        let session = fixture.session();

        let error = HistogramBuilder::new(&session,)
            .build_daily_histogram("octo/demo", 30,)
            .await
            .expect_err("second page must fail",);
        assert!(matches!(error, Error::RateLimited { .. }));
    }

    #[tokio::test]
    async fn chart_carries_title_and_thinned_labels()
    {
        let fixture = FixtureUpstream::demo().with_commits(spread_commits(Utc::now(),),);
        let session = fixture.session();

        let chart = HistogramBuilder::new(&session,)
            .render_activity_chart("octo/demo", 30, &SvgBarChart::default(),)
            .await
            .expect("chart",);
        assert_eq!(chart.label_step, 3);
        assert_eq!(chart.chart.media_type, "image/svg+xml");

        let svg = String::from_utf8(chart.chart.data,).expect("svg is text",);
        assert!(svg.contains("Commit Activity for octo/demo (Last 30 Days)"));
        assert!(svg.contains("Number of Commits"));
        assert!(svg.contains("#0366d6"));
    }
}
