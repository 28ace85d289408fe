// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Retrieval and decoding of repository READMEs.
///
/// The upstream service returns README files as base64 payloads wrapped over
/// several lines. The fetcher strips the line breaks, decodes the payload and
/// requires the result to be valid UTF-8.
use base64::{Engine as _, engine::general_purpose::STANDARD};
use tracing::{debug, info};

use crate::{
    error::{Error, Lookup, classify},
    models::ReadmeContent,
    resolver::RepositoryResolver,
    session::Session,
    upstream::RawReadme,
};

const BASE64_ENCODING: &str = "base64";

/// Fetches the README at the default location of a repository.
#[derive(Debug, Clone, Copy,)]
pub struct ReadmeFetcher<'s,>
{
    session: &'s Session,
}

impl<'s,> ReadmeFetcher<'s,>
{
    pub fn new(session: &'s Session,) -> Self
    {
        Self {
            session,
        }
    }

    /// Returns the decoded README of `identifier`.
    ///
    /// # Errors
    ///
    /// * [`Error::ReadmeNotFound`] when the repository has no README.
    /// * [`Error::Upstream`] when the payload is not valid base64 or UTF-8.
    /// * The resolver taxonomy otherwise.
    pub async fn get_readme(&self, identifier: &str,) -> Result<ReadmeContent, Error,>
    {
        let resolved = RepositoryResolver::new(self.session,).resolve(identifier,).await?;
        let id = resolved.identifier();
        debug!("Fetching README for {}", id);

        let raw = self
            .session
            .upstream()
            .readme(id,)
            .await
            .map_err(|failure| classify(failure, &id.to_string(), Lookup::Readme,),)?;

        let readme = decode_readme(raw,)?;
        info!("Retrieved {} ({} bytes) for {}", readme.path, readme.size, id);
        Ok(readme,)
    }
}

fn decode_readme(raw: RawReadme,) -> Result<ReadmeContent, Error,>
{
    if let Some(encoding,) = raw.encoding.as_deref().filter(|value| *value != BASE64_ENCODING,) {
        return Err(Error::upstream_data(format!(
            "README {} uses unsupported encoding '{encoding}'",
            raw.path
        ),),);
    }

    let compact: String = raw.content.chars().filter(|ch| !ch.is_ascii_whitespace(),).collect();
    let bytes = STANDARD.decode(compact.as_bytes(),).map_err(|error| {
        Error::upstream_data(format!("README {} is not valid base64: {error}", raw.path),)
    },)?;
    let content = String::from_utf8(bytes,).map_err(|error| {
        Error::upstream_data(format!("README {} is not valid UTF-8: {error}", raw.path),)
    },)?;

    Ok(ReadmeContent {
        content,
        path: raw.path,
        url: raw.download_url,
        size: raw.size,
        name: raw.name,
    },)
}
