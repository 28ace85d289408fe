// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Named tool surface over the analytics operations.
//!
//! Each tool maps one-to-one onto a component operation. Calls arrive as
//! `{"tool": "...", "arguments": {...}}` documents with the argument defaults
//! of the public tool catalogue; results and failures leave as JSON values.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::{
    activity::ActivityAggregator,
    chart::ChartRenderer,
    commits::{CommitHistoryReader, DEFAULT_DAYS, DEFAULT_MAX_COMMITS},
    error::Error,
    histogram::{ActivityChart, HistogramBuilder},
    issues::{DEFAULT_MAX_ISSUES, IssueLister},
    metadata::MetadataReader,
    models::{
        ActivityMetrics, Commit, DailyCommitHistogram, Issue, ReadmeContent, RepositoryInfo,
        StateFilter,
    },
    readme::ReadmeFetcher,
    session::Session,
};

/// One invocation of a named tool with its arguments.
///
/// # Examples
///
/// ```
/// use repo_insight::{StateFilter, ToolCall};
///
/// let call = ToolCall::from_name(
///     "get_repository_issues",
///     serde_json::json!({"repo_name": "octo/demo", "state": "closed"}),
/// )
/// .expect("valid call",);
/// assert_eq!(call, ToolCall::GetRepositoryIssues {
///     repo_name:  "octo/demo".to_owned(),
///     state:      StateFilter::Closed,
///     max_issues: 30,
/// });
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(tag = "tool", content = "arguments", rename_all = "snake_case")]
pub enum ToolCall
{
    GetRepositoryInfo
    {
        repo_name: String,
    },
    GetRepositoryIssues
    {
        repo_name:  String,
        #[serde(default)]
        state:      StateFilter,
        #[serde(default = "default_max_issues")]
        max_issues: u32,
    },
    GetReadme
    {
        repo_name: String,
    },
    GetCommitHistory
    {
        repo_name:   String,
        #[serde(default = "default_days")]
        days:        u32,
        #[serde(default = "default_max_commits")]
        max_commits: u32,
    },
    GetActivityMetrics
    {
        repo_name: String,
        #[serde(default = "default_days")]
        days:      u32,
    },
    GenerateActivityChart
    {
        repo_name: String,
        #[serde(default = "default_days")]
        days:      u32,
    },
}

fn default_days() -> u32
{
    DEFAULT_DAYS
}

fn default_max_issues() -> u32
{
    DEFAULT_MAX_ISSUES
}

fn default_max_commits() -> u32
{
    DEFAULT_MAX_COMMITS
}

/// Names of every tool, in catalogue order.
pub const TOOL_NAMES: [&str; 6] = [
    "get_repository_info",
    "get_repository_issues",
    "get_readme",
    "get_commit_history",
    "get_activity_metrics",
    "generate_activity_chart",
];

impl ToolCall
{
    /// Builds a call from a tool name and its JSON arguments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for unknown tools, missing
    /// `repo_name` or ill-typed arguments.
    pub fn from_name(name: &str, arguments: Value,) -> Result<Self, Error,>
    {
        if !TOOL_NAMES.contains(&name,) {
            return Err(Error::invalid_argument(format!("unknown tool '{name}'"),),);
        }
        serde_json::from_value(json!({ "tool": name, "arguments": arguments }),)
            .map_err(|e| Error::invalid_argument(format!("invalid arguments for {name}: {e}"),),)
    }

    /// Name of the invoked tool.
    pub fn name(&self,) -> &'static str
    {
        match self {
            Self::GetRepositoryInfo { .. } => TOOL_NAMES[0],
            Self::GetRepositoryIssues { .. } => TOOL_NAMES[1],
            Self::GetReadme { .. } => TOOL_NAMES[2],
            Self::GetCommitHistory { .. } => TOOL_NAMES[3],
            Self::GetActivityMetrics { .. } => TOOL_NAMES[4],
            Self::GenerateActivityChart { .. } => TOOL_NAMES[5],
        }
    }
}

/// Chart result as exposed by `generate_activity_chart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct ActivityChartResource
{
    pub uri:         String,
    pub mime_type:   String,
    pub description: String,
    pub histogram:   DailyCommitHistogram,
    pub label_step:  usize,
    /// Base64 encoded image.
    pub data:        String,
}

impl ActivityChartResource
{
    fn new(repo_name: &str, days: u32, chart: ActivityChart,) -> Self
    {
        Self {
            uri:         format!("chart://{repo_name}/activity"),
            mime_type:   chart.chart.media_type,
            description: format!("Commit activity chart for {repo_name} (last {days} days)"),
            histogram:   chart.histogram,
            label_step:  chart.label_step,
            data:        STANDARD.encode(&chart.chart.data,),
        }
    }

    /// Decodes [`data`](Self::data) back into image bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when `data` is not valid base64.
    pub fn image(&self,) -> Result<Vec<u8,>, Error,>
    {
        STANDARD
            .decode(&self.data,)
            .map_err(|e| Error::invalid_argument(format!("chart data is not base64: {e}"),),)
    }
}

/// Result of a tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
#[serde(untagged)]
pub enum ToolOutput
{
    Repository(RepositoryInfo,),
    Issues(Vec<Issue,>,),
    Readme(ReadmeContent,),
    Commits(Vec<Commit,>,),
    Metrics(ActivityMetrics,),
    Chart(ActivityChartResource,),
}

/// Dispatches [`ToolCall`]s to the analytics components of one session.
#[derive(Debug,)]
pub struct ToolInvoker<'s, R,>
{
    session:  &'s Session,
    renderer: R,
}

impl<'s, R,> ToolInvoker<'s, R,>
where
    R: ChartRenderer,
{
    pub fn new(session: &'s Session, renderer: R,) -> Self
    {
        Self {
            session,
            renderer,
        }
    }

    /// Runs `call` and returns its typed output.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying operation unchanged.
    pub async fn invoke(&self, call: &ToolCall,) -> Result<ToolOutput, Error,>
    {
        let session = self.session;
        match call {
            ToolCall::GetRepositoryInfo {
                repo_name,
            } => {
                info!("Retrieving repository information for {}", repo_name);
                let info = MetadataReader::new(session,).get_info(repo_name,).await?;
                Ok(ToolOutput::Repository(info,),)
            }
            ToolCall::GetRepositoryIssues {
                repo_name,
                state,
                max_issues,
            } => {
                info!("Retrieving {} issues for {} (max: {})", state, repo_name, max_issues);
                let issues =
                    IssueLister::new(session,).list_issues(repo_name, *state, *max_issues,).await?;
                Ok(ToolOutput::Issues(issues,),)
            }
            ToolCall::GetReadme {
                repo_name,
            } => {
                info!("Retrieving README for {}", repo_name);
                let readme = ReadmeFetcher::new(session,).get_readme(repo_name,).await?;
                Ok(ToolOutput::Readme(readme,),)
            }
            ToolCall::GetCommitHistory {
                repo_name,
                days,
                max_commits,
            } => {
                info!(
                    "Retrieving commit history for {} (last {} days, max: {})",
                    repo_name, days, max_commits
                );
                let commits = CommitHistoryReader::new(session,)
                    .list_commits(repo_name, *days, *max_commits,)
                    .await?;
                Ok(ToolOutput::Commits(commits,),)
            }
            ToolCall::GetActivityMetrics {
                repo_name,
                days,
            } => {
                info!("Calculating activity metrics for {} (last {} days)", repo_name, days);
                let metrics = ActivityAggregator::new(session,).get_metrics(repo_name, *days,).await?;
                Ok(ToolOutput::Metrics(metrics,),)
            }
            ToolCall::GenerateActivityChart {
                repo_name,
                days,
            } => {
                info!("Generating activity chart for {} (last {} days)", repo_name, days);
                let chart = HistogramBuilder::new(session,)
                    .render_activity_chart(repo_name, *days, &self.renderer,)
                    .await?;
                Ok(ToolOutput::Chart(ActivityChartResource::new(repo_name.trim(), *days, chart,),),)
            }
        }
    }

    /// Runs `call` and renders the outcome as JSON.
    ///
    /// Failures become an [`error_envelope`] and are logged at `warn`.
    pub async fn invoke_json(&self, call: &ToolCall,) -> Value
    {
        let outcome = match self.invoke(call,).await {
            Ok(output,) => serde_json::to_value(&output,).map_err(Error::from,),
            Err(error,) => Err(error,),
        };

        outcome.unwrap_or_else(|error| {
            warn!("{} failed: {}", call.name(), error);
            error_envelope(&error,)
        },)
    }
}

/// JSON shape of a failed invocation:
/// `{"error": {"kind": "...", "message": "..."}}`.
pub fn error_envelope(error: &Error,) -> Value
{
    json!({
        "error": {
            "kind": error.kind(),
            "message": error.to_display_string(),
        }
    })
}

/// Text of the `readme://{repo_name}` resource: the decoded README only.
///
/// # Errors
///
/// Same as [`ReadmeFetcher::get_readme`].
pub async fn readme_resource(session: &Session, repo_name: &str,) -> Result<String, Error,>
{
    info!("Serving readme://{}", repo_name.trim());
    Ok(ReadmeFetcher::new(session,).get_readme(repo_name,).await?.content,)
}
