// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Command-line interface for the repo-insight binary.
//!
//! Each subcommand runs one analytics tool against the GitHub API and prints
//! its result as JSON on stdout. Logs and progress go to stderr.

use std::{fs, io, path::PathBuf, process, time::Duration};

use clap::{ArgAction, Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use repo_insight::{
    ConfigFile, ConfigOverrides, DEFAULT_DAYS, DEFAULT_MAX_COMMITS, DEFAULT_MAX_ISSUES, Error,
    Session, StateFilter, SvgBarChart, ToolCall, ToolInvoker, ToolOutput, io_error,
    load_config_file, readme_resource, resolve_config,
};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Command line interface for repository analytics.
#[derive(Debug, Parser,)]
#[command(name = "repo-insight", version, about = "Read-only GitHub repository analytics")]
struct Cli
{
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Default,)]
struct GlobalArgs
{
    /// YAML configuration file with token, API URL and page size.
    #[arg(long = "config", value_name = "PATH", global = true)]
    config: Option<PathBuf,>,

    /// GitHub access token.
    #[arg(long = "token", env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    token: Option<String,>,

    /// Base URL of a GitHub Enterprise API endpoint.
    #[arg(long = "api-url", value_name = "URL", env = "GITHUB_API_URL", global = true)]
    api_url: Option<String,>,

    /// Items requested per listing page (1-100).
    #[arg(long = "per-page", value_name = "N", global = true)]
    per_page: Option<u8,>,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue, global = true)]
    pretty: bool,

    /// Log filter, e.g. `debug` or `repo_insight=trace`; defaults to `RUST_LOG`.
    #[arg(long = "log-level", value_name = "FILTER", global = true)]
    log_level: Option<String,>,
}

#[derive(Debug, Subcommand,)]
enum Command
{
    /// Show repository metadata.
    Info(RepoArgs,),
    /// List issues of a repository.
    Issues(IssuesArgs,),
    /// Print the decoded README.
    Readme(ReadmeArgs,),
    /// List recent commits with line statistics.
    Commits(CommitsArgs,),
    /// Aggregate commit, issue, pull request and contributor activity.
    Metrics(WindowArgs,),
    /// Render the daily commit activity chart.
    Chart(ChartArgs,),
}

#[derive(Debug, Args,)]
struct RepoArgs
{
    /// Repository as `owner/name`.
    #[arg(value_name = "OWNER/NAME")]
    repo: String,
}

#[derive(Debug, Args,)]
struct IssuesArgs
{
    #[command(flatten)]
    repo: RepoArgs,

    /// Issue state: open, closed or all.
    #[arg(long = "state", default_value_t = StateFilter::Open)]
    state: StateFilter,

    /// Maximum number of issues to return.
    #[arg(long = "max", default_value_t = DEFAULT_MAX_ISSUES)]
    max_issues: u32,
}

#[derive(Debug, Args,)]
struct ReadmeArgs
{
    #[command(flatten)]
    repo: RepoArgs,

    /// Print only the README text instead of the JSON record.
    #[arg(long = "raw", action = ArgAction::SetTrue)]
    raw: bool,
}

#[derive(Debug, Args,)]
struct WindowArgs
{
    #[command(flatten)]
    repo: RepoArgs,

    /// Look-back window in days.
    #[arg(long = "days", default_value_t = DEFAULT_DAYS)]
    days: u32,
}

#[derive(Debug, Args,)]
struct CommitsArgs
{
    #[command(flatten)]
    window: WindowArgs,

    /// Maximum number of commits to return.
    #[arg(long = "max", default_value_t = DEFAULT_MAX_COMMITS)]
    max_commits: u32,
}

#[derive(Debug, Args,)]
struct ChartArgs
{
    #[command(flatten)]
    window: WindowArgs,

    /// File that receives the SVG image.
    #[arg(long = "output", value_name = "PATH")]
    output: Option<PathBuf,>,
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main]
async fn main()
{
    if let Err(error,) = run().await {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates configuration, upstream and output errors.
async fn run() -> Result<(), Error,>
{
    let cli = Cli::parse();
    init_tracing(cli.global.log_level.as_deref(),)?;

    let session = open_session(&cli.global,)?;

    if let Command::Readme(args,) = &cli.command
        && args.raw
    {
        let text = readme_resource(&session, &args.repo.repo,).await?;
        print!("{text}");
        return Ok((),);
    }

    let call = tool_call(&cli.command,);
    let invoker = ToolInvoker::new(&session, SvgBarChart::default(),);

    let progress = needs_spinner(&call,).then(|| spinner(&call,),);
    let outcome = invoker.invoke(&call,).await;
    if let Some(progress,) = progress {
        progress.finish_and_clear();
    }
    let output = outcome?;

    if let (Command::Chart(args,), ToolOutput::Chart(resource,),) = (&cli.command, &output,)
        && let Some(path,) = &args.output
    {
        fs::write(path, resource.image()?,).map_err(|source| io_error(path, source,),)?;
        info!("Wrote activity chart to {}", path.display());
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, &output, cli.global.pretty,)
}

fn init_tracing(level: Option<&str,>,) -> Result<(), Error,>
{
    let filter = match level {
        Some(directive,) => EnvFilter::try_new(directive,)
            .map_err(|e| Error::config(format!("invalid log level '{directive}': {e}"),),)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info",),),
    };

    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt().with_env_filter(filter,).with_writer(io::stderr,).try_init();
    Ok((),)
}

fn open_session(global: &GlobalArgs,) -> Result<Session, Error,>
{
    let file = match &global.config {
        Some(path,) => {
            debug!("Loading configuration from {}", path.display());
            load_config_file(path,)?
        }
        None => ConfigFile::default(),
    };
    let config = resolve_config(file, overrides(global,),)?;
    Session::connect(&config,)
}

fn overrides(global: &GlobalArgs,) -> ConfigOverrides
{
    ConfigOverrides {
        token:        global.token.clone(),
        api_base_url: global.api_url.clone(),
        per_page:     global.per_page,
    }
}

fn tool_call(command: &Command,) -> ToolCall
{
    match command {
        Command::Info(args,) => ToolCall::GetRepositoryInfo {
            repo_name: args.repo.clone(),
        },
        Command::Issues(args,) => ToolCall::GetRepositoryIssues {
            repo_name:  args.repo.repo.clone(),
            state:      args.state,
            max_issues: args.max_issues,
        },
        Command::Readme(args,) => ToolCall::GetReadme {
            repo_name: args.repo.repo.clone(),
        },
        Command::Commits(args,) => ToolCall::GetCommitHistory {
            repo_name:   args.window.repo.repo.clone(),
            days:        args.window.days,
            max_commits: args.max_commits,
        },
        Command::Metrics(args,) => ToolCall::GetActivityMetrics {
            repo_name: args.repo.repo.clone(),
            days:      args.days,
        },
        Command::Chart(args,) => ToolCall::GenerateActivityChart {
            repo_name: args.window.repo.repo.clone(),
            days:      args.window.days,
        },
    }
}

fn needs_spinner(call: &ToolCall,) -> bool
{
    matches!(call, ToolCall::GetActivityMetrics { .. } | ToolCall::GenerateActivityChart { .. })
}

fn spinner(call: &ToolCall,) -> ProgressBar
{
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.yellow} [{elapsed_precise}] {msg}",)
            .expect("valid template",),
    );
    pb.set_message(format!("Running {}...", call.name()),);
    pb.enable_steady_tick(Duration::from_millis(120,),);
    pb
}

fn write_json<W, T,>(writer: &mut W, value: &T, pretty: bool,) -> Result<(), Error,>
where
    W: io::Write,
    T: Serialize + ?Sized,
{
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, value,)?;
    } else {
        serde_json::to_writer(&mut *writer, value,)?;
    }
    writeln!(writer).map_err(|source| io_error(std::path::Path::new("<stdout>",), source,),)
}
