// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Resolution of `owner/name` identifiers into upstream repositories.
///
/// Every analytics operation starts here, so malformed identifiers are
/// rejected before any request leaves the process.
use tracing::debug;

use crate::{
    error::{Error, Lookup, classify},
    identifier::RepositoryIdentifier,
    session::Session,
    upstream::RawRepository,
};

/// Repository confirmed to exist upstream.
#[derive(Debug, Clone,)]
pub struct ResolvedRepository
{
    identifier: RepositoryIdentifier,
    repository: RawRepository,
}

impl ResolvedRepository
{
    /// Validated identifier of the repository.
    pub fn identifier(&self,) -> &RepositoryIdentifier
    {
        &self.identifier
    }

    /// Repository payload returned by the lookup.
    pub fn repository(&self,) -> &RawRepository
    {
        &self.repository
    }

    pub(crate) fn into_parts(self,) -> (RepositoryIdentifier, RawRepository,)
    {
        (self.identifier, self.repository,)
    }
}

/// Validates identifiers and looks them up upstream.
#[derive(Debug, Clone, Copy,)]
pub struct RepositoryResolver<'s,>
{
    session: &'s Session,
}

impl<'s,> RepositoryResolver<'s,>
{
    pub fn new(session: &'s Session,) -> Self
    {
        Self {
            session,
        }
    }

    /// Resolves `identifier` to an upstream repository.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidIdentifier`] when the identifier is not `owner/name`;
    ///   no request is issued in that case.
    /// * [`Error::RepositoryNotFound`] when the upstream reports a 404.
    /// * [`Error::RateLimited`] when the request quota is exhausted.
    /// * [`Error::Upstream`] for every other upstream failure.
    pub async fn resolve(&self, identifier: &str,) -> Result<ResolvedRepository, Error,>
    {
        let identifier = RepositoryIdentifier::parse(identifier,)?;
        debug!("Resolving repository {}", identifier);

        let repository = self
            .session
            .upstream()
            .repository(&identifier,)
            .await
            .map_err(|failure| classify(failure, &identifier.to_string(), Lookup::Repository,),)?;

        Ok(ResolvedRepository {
            identifier,
            repository,
        },)
    }
}
