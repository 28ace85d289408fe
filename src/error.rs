#![allow(non_shorthand_field_patterns)]
#![doc = "Error taxonomy shared by every repository analytics operation."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.
//!
//! Upstream failures never leave the crate as raw transport errors. They are
//! captured as [`UpstreamFailure`] values and funnelled through [`classify`],
//! which is the only place that knows how the hosting service signals a
//! missing resource or an exhausted quota.

use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Status reported by the upstream service for missing resources.
const STATUS_NOT_FOUND: u16 = 404;
/// Status reported by the upstream service for forbidden requests, which
/// includes quota exhaustion.
const STATUS_FORBIDDEN: u16 = 403;

static RATE_LIMIT_PATTERN: LazyLock<Regex,> =
    LazyLock::new(|| Regex::new(r"(?i)rate limit",).expect("valid rate limit pattern",),);

/// Unified error type returned by every operation of the crate.
///
/// The first five variants form the stable taxonomy surfaced to callers of
/// the analytics operations. The remaining variants cover local concerns such
/// as argument validation and configuration loading.
#[derive(Debug, masterror::Error,)]
pub enum Error
{
    /// The identifier is not of the form `owner/name`.
    #[error("invalid repository name: {identifier}. Format should be 'owner/repository'")]
    InvalidIdentifier
    {
        /// Identifier exactly as supplied by the caller.
        identifier: String,
    },
    /// The upstream service reported that the repository does not exist.
    #[error("repository not found: {identifier}")]
    RepositoryNotFound
    {
        /// Identifier of the missing repository.
        identifier: String,
    },
    /// The repository exists but has no README at the default location.
    #[error("README not found in repository: {identifier}")]
    ReadmeNotFound
    {
        /// Identifier of the repository without a README.
        identifier: String,
    },
    /// The credential's request quota is exhausted.
    #[error("GitHub API rate limit exceeded. Please try again later ({message})")]
    RateLimited
    {
        /// Message reported by the upstream service.
        message: String,
    },
    /// Any other upstream failure, passed through for diagnostics.
    #[error("upstream request failed: {message}")]
    Upstream
    {
        /// HTTP status reported by the upstream service, when one exists.
        status:  Option<u16,>,
        /// Message reported by the upstream service.
        message: String,
    },
    /// An operation argument is outside of its accepted range.
    #[error("invalid argument: {message}")]
    InvalidArgument
    {
        /// Human readable description of the rejected argument.
        message: String,
    },
    /// The session configuration is incomplete or inconsistent.
    #[error("invalid configuration: {message}")]
    Config
    {
        /// Human readable description of the configuration problem.
        message: String,
    },
    /// Wraps I/O errors raised while reading configuration or writing charts.
    #[error("failed to access {path:?}: {source}")]
    Io
    {
        /// File that triggered the error.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse configuration: {source}")]
    Parse
    {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error,
    },
    /// Wraps serialization errors when encoding operation output.
    #[error("failed to serialize output: {source}")]
    Serialize
    {
        /// Underlying serialization error.
        source: serde_json::Error,
    },
}

/// Stable, serializable tag naming the category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind
{
    InvalidIdentifier,
    RepositoryNotFound,
    ReadmeNotFound,
    RateLimited,
    UpstreamError,
    InvalidArgument,
    Config,
    Io,
    Serialize,
}

impl Error
{
    /// Constructs an [`Error::InvalidArgument`] from the provided message.
    pub fn invalid_argument<M,>(message: M,) -> Self
    where
        M: Into<String,>,
    {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Constructs an [`Error::Config`] from the provided message.
    pub fn config<M,>(message: M,) -> Self
    where
        M: Into<String,>,
    {
        Self::Config {
            message: message.into(),
        }
    }

    /// Constructs an [`Error::Upstream`] that carries no HTTP status, used
    /// for payloads that arrived intact but could not be interpreted.
    pub fn upstream_data<M,>(message: M,) -> Self
    where
        M: Into<String,>,
    {
        Self::Upstream {
            status:  None,
            message: message.into(),
        }
    }

    /// Returns the category of the error.
    pub fn kind(&self,) -> ErrorKind
    {
        match self {
            Self::InvalidIdentifier { .. } => ErrorKind::InvalidIdentifier,
            Self::RepositoryNotFound { .. } => ErrorKind::RepositoryNotFound,
            Self::ReadmeNotFound { .. } => ErrorKind::ReadmeNotFound,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::Upstream { .. } => ErrorKind::UpstreamError,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::Config { .. } | Self::Parse { .. } => ErrorKind::Config,
            Self::Io { .. } => ErrorKind::Io,
            Self::Serialize { .. } => ErrorKind::Serialize,
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// The returned string matches the [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self,) -> String
    {
        format!("{self}")
    }
}

impl From<serde_yaml::Error,> for Error
{
    fn from(source: serde_yaml::Error,) -> Self
    {
        Self::Parse {
            source,
        }
    }
}

impl From<serde_json::Error,> for Error
{
    fn from(source: serde_json::Error,) -> Self
    {
        Self::Serialize {
            source,
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - File that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error,) -> Error
{
    Error::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Raw failure reported by an [`Upstream`](crate::Upstream) implementation.
///
/// `status` is `None` when the request never produced an HTTP response, for
/// example on connection or decoding failures.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct UpstreamFailure
{
    /// HTTP status code of the failed response.
    pub status:  Option<u16,>,
    /// Message reported by the upstream service.
    pub message: String,
}

impl UpstreamFailure
{
    /// Creates a failure with an HTTP status.
    pub fn new<M,>(status: u16, message: M,) -> Self
    where
        M: Into<String,>,
    {
        Self {
            status:  Some(status,),
            message: message.into(),
        }
    }

    /// Creates a failure that happened before any HTTP response was seen.
    pub fn transport<M,>(message: M,) -> Self
    where
        M: Into<String,>,
    {
        Self {
            status:  None,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for UpstreamFailure
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_,>,) -> std::fmt::Result
    {
        match self.status {
            Some(status,) => write!(f, "{status}: {}", self.message),
            None => f.write_str(&self.message,),
        }
    }
}

/// Which lookup produced an upstream failure.
///
/// A not-found status means different things depending on what was being
/// looked up, so [`classify`] needs to know the origin of the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
pub enum Lookup
{
    /// Repository resolution.
    Repository,
    /// README lookup on an already resolved repository.
    Readme,
    /// Any listing or detail query on an already resolved repository.
    Listing,
}

/// Returns `true` when the failure signals an exhausted request quota.
///
/// The upstream service has no dedicated status for this condition: it
/// answers `403` and mentions the rate limit in its message.
pub fn is_rate_limited(failure: &UpstreamFailure,) -> bool
{
    failure.status == Some(STATUS_FORBIDDEN,) && RATE_LIMIT_PATTERN.is_match(&failure.message,)
}

/// Maps an upstream failure onto the crate error taxonomy.
///
/// # Parameters
///
/// * `failure` - Failure reported by the upstream service.
/// * `identifier` - Repository the failing request was about.
/// * `lookup` - Kind of request that failed.
pub fn classify(failure: UpstreamFailure, identifier: &str, lookup: Lookup,) -> Error
{
    if is_rate_limited(&failure,) {
        return Error::RateLimited {
            message: failure.message,
        };
    }

    match (failure.status, lookup,) {
        (Some(STATUS_NOT_FOUND,), Lookup::Repository,) => Error::RepositoryNotFound {
            identifier: identifier.to_owned(),
        },
        (Some(STATUS_NOT_FOUND,), Lookup::Readme,) => Error::ReadmeNotFound {
            identifier: identifier.to_owned(),
        },
        _ => Error::Upstream {
            status:  failure.status,
            message: failure.message,
        },
    }
}
