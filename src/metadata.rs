// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Static and aggregate repository attributes.
use tracing::info;

use crate::{
    error::{Error, Lookup, classify},
    models::{OwnerSummary, RepositoryInfo, Visibility},
    resolver::RepositoryResolver,
    session::Session,
    upstream::RawRepository,
};

/// Reads repository metadata: one lookup plus one topic-list fetch.
#[derive(Debug, Clone, Copy,)]
pub struct MetadataReader<'s,>
{
    session: &'s Session,
}

impl<'s,> MetadataReader<'s,>
{
    pub fn new(session: &'s Session,) -> Self
    {
        Self {
            session,
        }
    }

    /// Returns the metadata of `identifier`.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`RepositoryResolver::resolve`]; the topic fetch
    /// shares those failure modes.
    pub async fn get_info(&self, identifier: &str,) -> Result<RepositoryInfo, Error,>
    {
        let (identifier, repository,) =
            RepositoryResolver::new(self.session,).resolve(identifier,).await?.into_parts();

        let topics = self
            .session
            .upstream()
            .topics(&identifier,)
            .await
            .map_err(|failure| classify(failure, &identifier.to_string(), Lookup::Repository,),)?;

        info!("Retrieved repository information for {}", identifier);
        Ok(normalize_repository(repository, topics,),)
    }
}

fn normalize_repository(repository: RawRepository, topics: Vec<String,>,) -> RepositoryInfo
{
    let visibility = Visibility::from_upstream(repository.visibility.as_deref(), repository.private,);

    RepositoryInfo {
        name: repository.name,
        full_name: repository.full_name,
        description: repository.description,
        owner: OwnerSummary {
            login:      repository.owner.login,
            avatar_url: repository.owner.avatar_url,
            html_url:   repository.owner.html_url,
        },
        html_url: repository.html_url,
        api_url: repository.url,
        stars: repository.stargazers_count,
        forks: repository.forks_count,
        watchers: repository.watchers_count,
        open_issues: repository.open_issues_count,
        language: repository.language,
        license: repository.license.map(|license| license.name,),
        created_at: repository.created_at,
        updated_at: repository.updated_at,
        pushed_at: repository.pushed_at,
        visibility,
        default_branch: repository.default_branch,
        topics,
    }
}
