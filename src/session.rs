// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Authenticated handle shared by every analytics component.
use std::{fmt, sync::Arc};

use tracing::debug;

use crate::{config::SessionConfig, error::Error, github::GitHubUpstream, upstream::Upstream};

/// Immutable session holding the single credential-bearing upstream handle.
///
/// Cloning is cheap and every clone talks to the same upstream handle. The
/// session keeps no state between calls, so it can be shared freely across
/// concurrent tasks.
#[derive(Clone,)]
pub struct Session
{
    upstream: Arc<dyn Upstream,>,
    per_page: u8,
}

impl Session
{
    /// Builds a session backed by the GitHub REST API.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the HTTP client cannot be initialized,
    /// for example because the configured base URL is malformed.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use repo_insight::{Session, SessionConfig};
    ///
    /// # fn example() -> Result<(), repo_insight::Error> {
    /// let config = SessionConfig::new("ghp_token",)?;
    /// let session = Session::connect(&config,)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn connect(config: &SessionConfig,) -> Result<Self, Error,>
    {
        debug!("Initializing GitHub session for {}", config.api_base_url().unwrap_or("api.github.com"));
        let upstream = GitHubUpstream::new(config,)?;
        Ok(Self::with_upstream(Arc::new(upstream,), config.per_page(),),)
    }

    /// Builds a session around an arbitrary upstream implementation.
    pub fn with_upstream(upstream: Arc<dyn Upstream,>, per_page: u8,) -> Self
    {
        Self {
            upstream,
            per_page: per_page.max(1,),
        }
    }

    /// Upstream handle used for every request.
    pub fn upstream(&self,) -> &dyn Upstream
    {
        self.upstream.as_ref()
    }

    /// Page size used for listings.
    pub fn per_page(&self,) -> u8
    {
        self.per_page
    }
}

impl fmt::Debug for Session
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.debug_struct("Session",).field("per_page", &self.per_page,).finish_non_exhaustive()
    }
}
