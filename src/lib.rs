// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Read-only analytics for GitHub repositories.
//!
//! The library resolves `owner/name` identifiers against the GitHub REST API
//! and exposes one component per question: repository metadata, bounded issue
//! listings, README retrieval, windowed commit history, aggregate activity
//! metrics and daily commit histograms rendered as charts. Every component
//! borrows an immutable [`Session`] that holds the single access token.
//!
//! Upstream failures are classified into a small taxonomy ([`ErrorKind`]):
//! malformed identifiers, missing repositories or READMEs, exhausted rate
//! limits and pass-through upstream errors. Nothing is retried.
//!
//! # Example
//!
//! ```no_run
//! use repo_insight::{IssueLister, Session, SessionConfig, StateFilter};
//!
//! # async fn example() -> Result<(), repo_insight::Error> {
//! let session = Session::connect(&SessionConfig::new("ghp_token",)?,)?;
//! let issues = IssueLister::new(&session,).list_issues("rust-lang/rust", StateFilter::Open, 10,).await?;
//! for issue in issues {
//!     println!("#{} {}", issue.number, issue.title);
//! }
//! # Ok(())
//! # }
//! ```

mod activity;
mod chart;
mod commits;
mod config;
mod error;
mod github;
mod histogram;
mod identifier;
mod issues;
mod metadata;
pub mod models;
mod paging;
mod readme;
mod resolver;
mod session;
#[cfg(test)]
mod testing;
mod tools;
pub mod upstream;
mod window;

pub use activity::{ActivityAggregator, TOP_CONTRIBUTORS};
pub use chart::{ChartRenderer, ChartRequest, RenderedChart, SVG_MEDIA_TYPE, SvgBarChart};
pub use commits::{CommitHistoryReader, DEFAULT_DAYS, DEFAULT_MAX_COMMITS};
pub use config::{
    API_URL_ENV, ConfigFile, ConfigOverrides, DEFAULT_PER_PAGE, SessionConfig, TOKEN_ENV,
    load_config_file, parse_config, resolve_config,
};
pub use error::{Error, ErrorKind, Lookup, UpstreamFailure, classify, io_error, is_rate_limited};
pub use github::GitHubUpstream;
pub use histogram::{
    ActivityChart, HistogramBuilder, MAX_DENSE_LABELS, bucket_commit_dates, label_step,
    labeled_indices,
};
pub use identifier::RepositoryIdentifier;
pub use issues::{BODY_PREVIEW_CHARS, DEFAULT_MAX_ISSUES, IssueLister, truncate_body};
pub use metadata::MetadataReader;
pub use models::{
    ActivityMetrics, Commit, CommitStats, DailyBucket, DailyCommitHistogram, Issue, IssueState,
    OwnerSummary, ReadmeContent, RepositoryInfo, StateFilter, Visibility,
};
pub use readme::ReadmeFetcher;
pub use resolver::{RepositoryResolver, ResolvedRepository};
pub use session::Session;
pub use tools::{
    ActivityChartResource, TOOL_NAMES, ToolCall, ToolInvoker, ToolOutput, error_envelope,
    readme_resource,
};
pub use upstream::Upstream;
pub use window::Window;
