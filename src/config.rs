// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Session configuration.
//!
//! Settings come from three layers, each overriding the previous one: an
//! optional YAML document, the environment (`GITHUB_TOKEN`,
//! `GITHUB_API_URL`) and command-line flags. The binary reads the last two
//! through `clap` and hands them over as [`ConfigOverrides`].

use std::{fmt, fs, path::Path};

use serde::Deserialize;

use crate::error::{self, Error};

/// Environment variable holding the access token.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";
/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "GITHUB_API_URL";
/// Page size used when none is configured; also the upstream maximum.
pub const DEFAULT_PER_PAGE: u8 = 100;

/// Configuration document as read from YAML.
///
/// # Examples
///
/// ```
/// use repo_insight::parse_config;
///
/// let yaml = r#"
/// token: ghp_example
/// api_base_url: https://github.example.com/api/v3
/// per_page: 50
/// "#;
/// let file = parse_config(yaml,).expect("valid configuration",);
/// assert_eq!(file.per_page, Some(50));
/// ```
#[derive(Default, Deserialize, Clone, PartialEq, Eq,)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile
{
    /// Access token; usually left to the environment instead.
    #[serde(default)]
    pub token: Option<String,>,

    /// Base URL of a GitHub Enterprise API endpoint.
    #[serde(default, alias = "api_url", alias = "api-url")]
    pub api_base_url: Option<String,>,

    /// Items requested per listing page.
    #[serde(default, alias = "per-page", deserialize_with = "deserialize_optional_per_page")]
    pub per_page: Option<u8,>,
}

impl fmt::Debug for ConfigFile
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.debug_struct("ConfigFile",)
            .field("token", &self.token.as_ref().map(|_| REDACTED,),)
            .field("api_base_url", &self.api_base_url,)
            .field("per_page", &self.per_page,)
            .finish()
    }
}

/// Values supplied by the environment or the command line.
#[derive(Default, Clone, PartialEq, Eq,)]
pub struct ConfigOverrides
{
    pub token:        Option<String,>,
    pub api_base_url: Option<String,>,
    pub per_page:     Option<u8,>,
}

impl fmt::Debug for ConfigOverrides
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.debug_struct("ConfigOverrides",)
            .field("token", &self.token.as_ref().map(|_| REDACTED,),)
            .field("api_base_url", &self.api_base_url,)
            .field("per_page", &self.per_page,)
            .finish()
    }
}

/// Validated settings used to open a [`Session`](crate::Session).
#[derive(Clone, PartialEq, Eq,)]
pub struct SessionConfig
{
    token:        String,
    api_base_url: Option<String,>,
    per_page:     u8,
}

const REDACTED: &str = "<redacted>";

impl SessionConfig
{
    /// Creates a configuration for the public API with the default page size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when `token` is blank.
    pub fn new<T,>(token: T,) -> Result<Self, Error,>
    where
        T: Into<String,>,
    {
        let token = token.into().trim().to_owned();
        if token.is_empty() {
            return Err(Error::config(format!("access token must not be empty (set {TOKEN_ENV})"),),);
        }

        Ok(Self {
            token,
            api_base_url: None,
            per_page: DEFAULT_PER_PAGE,
        },)
    }

    /// Targets a different API endpoint, such as GitHub Enterprise.
    pub fn with_api_base_url<U,>(mut self, url: U,) -> Self
    where
        U: Into<String,>,
    {
        self.api_base_url = Some(url.into(),);
        self
    }

    /// Changes the listing page size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] unless `per_page` is within `1..=100`.
    pub fn with_per_page(mut self, per_page: u8,) -> Result<Self, Error,>
    {
        validate_per_page(per_page,).map_err(Error::config,)?;
        self.per_page = per_page;
        Ok(self,)
    }

    /// Access token sent with every request.
    pub fn token(&self,) -> &str
    {
        &self.token
    }

    /// Custom API base URL, `None` for the public API.
    pub fn api_base_url(&self,) -> Option<&str,>
    {
        self.api_base_url.as_deref()
    }

    /// Listing page size.
    pub fn per_page(&self,) -> u8
    {
        self.per_page
    }
}

impl fmt::Debug for SessionConfig
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.debug_struct("SessionConfig",)
            .field("token", &REDACTED,)
            .field("api_base_url", &self.api_base_url,)
            .field("per_page", &self.per_page,)
            .finish()
    }
}

/// Reads a configuration document from disk.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read and [`Error::Parse`]
/// when it is not a valid document.
pub fn load_config_file(path: &Path,) -> Result<ConfigFile, Error,>
{
    let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
    parse_config(&contents,)
}

/// Parses a configuration document. An empty document yields defaults.
///
/// # Errors
///
/// Returns [`Error::Parse`] on malformed YAML, unknown keys or an
/// out-of-range `per_page`.
pub fn parse_config(contents: &str,) -> Result<ConfigFile, Error,>
{
    if contents.trim().is_empty() {
        return Ok(ConfigFile::default(),);
    }
    Ok(serde_yaml::from_str(contents,)?,)
}

/// Merges the file layer with the overrides and validates the result.
///
/// Blank override values count as absent.
///
/// # Errors
///
/// Returns [`Error::Config`] when no token is available, the base URL is
/// blank or the page size is outside `1..=100`.
pub fn resolve_config(file: ConfigFile, overrides: ConfigOverrides,) -> Result<SessionConfig, Error,>
{
    let token = non_blank(overrides.token,)
        .or_else(|| non_blank(file.token,),)
        .ok_or_else(|| {
            Error::config(format!(
                "no access token configured; set {TOKEN_ENV}, pass --token or add `token` to the configuration file"
            ),)
        },)?;

    let mut config = SessionConfig::new(token,)?;

    if let Some(url,) = non_blank(overrides.api_base_url,).or(file.api_base_url,) {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::config("api_base_url must not be empty",),);
        }
        config = config.with_api_base_url(url.trim_end_matches('/',),);
    }

    if let Some(per_page,) = overrides.per_page.or(file.per_page,) {
        config = config.with_per_page(per_page,)?;
    }

    Ok(config,)
}

fn non_blank(value: Option<String,>,) -> Option<String,>
{
    value.filter(|value| !value.trim().is_empty(),)
}

fn validate_per_page(per_page: u8,) -> Result<(), &'static str,>
{
    if per_page == 0 || per_page > DEFAULT_PER_PAGE {
        return Err("per_page must be between 1 and 100",);
    }
    Ok((),)
}

fn deserialize_optional_per_page<'de, D,>(deserializer: D,) -> Result<Option<u8,>, D::Error,>
where
    D: serde::Deserializer<'de,>,
{
    let value: Option<u8,> = Option::deserialize(deserializer,)?;
    if let Some(per_page,) = value
        && let Err(message,) = validate_per_page(per_page,)
    {
        return Err(serde::de::Error::custom(message,),);
    }
    Ok(value,)
}
