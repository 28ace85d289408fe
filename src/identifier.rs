// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Validated `owner/name` repository identifiers.
//!
//! Validation is purely local: an identifier that fails here never reaches
//! the upstream service.

use std::fmt;

use serde::Serialize;

use crate::error::Error;

/// Repository identifier of the form `owner/name`.
///
/// Instances can only be obtained through [`RepositoryIdentifier::parse`],
/// which guarantees exactly one `/` separating two non-empty segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize,)]
#[serde(into = "String")]
pub struct RepositoryIdentifier
{
    owner: String,
    name:  String,
}

impl RepositoryIdentifier
{
    /// Parses and validates an identifier.
    ///
    /// Leading and trailing whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] when the input does not consist of
    /// exactly two non-empty segments separated by a single `/`.
    ///
    /// # Examples
    ///
    /// ```
    /// use repo_insight::RepositoryIdentifier;
    ///
    /// let id = RepositoryIdentifier::parse(" octo/demo ",)?;
    /// assert_eq!(id.owner(), "octo");
    /// assert_eq!(id.name(), "demo");
    /// assert!(RepositoryIdentifier::parse("octo/demo/extra").is_err());
    /// # Ok::<(), repo_insight::Error>(())
    /// ```
    pub fn parse(input: &str,) -> Result<Self, Error,>
    {
        let trimmed = input.trim();
        let invalid = || Error::InvalidIdentifier {
            identifier: input.to_owned(),
        };

        let (owner, name,) = trimmed.split_once('/',).ok_or_else(invalid,)?;
        if owner.is_empty() || name.is_empty() || name.contains('/',) {
            return Err(invalid(),);
        }

        Ok(Self {
            owner: owner.to_owned(),
            name:  name.to_owned(),
        },)
    }

    /// Account that owns the repository.
    pub fn owner(&self,) -> &str
    {
        &self.owner
    }

    /// Repository name within the owner's namespace.
    pub fn name(&self,) -> &str
    {
        &self.name
    }
}

impl fmt::Display for RepositoryIdentifier
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl From<RepositoryIdentifier,> for String
{
    fn from(identifier: RepositoryIdentifier,) -> Self
    {
        identifier.to_string()
    }
}

impl std::str::FromStr for RepositoryIdentifier
{
    type Err = Error;

    fn from_str(input: &str,) -> Result<Self, Self::Err,>
    {
        Self::parse(input,)
    }
}

#[cfg(test)]
mod tests
{
    use proptest::prelude::*;

    use super::RepositoryIdentifier;
    use crate::error::Error;

    proptest! {
        #[test]
        fn well_formed_identifiers_round_trip(owner in "[A-Za-z0-9_.-]{1,20}", name in "[A-Za-z0-9_.-]{1,20}") {
            let raw = format!("{owner}/{name}");
            let id = RepositoryIdentifier::parse(&raw).expect("valid identifier");
            prop_assert_eq!(id.owner(), owner.as_str());
            prop_assert_eq!(id.name(), name.as_str());
            prop_assert_eq!(id.to_string(), raw);
        }

        #[test]
        fn identifiers_without_separator_are_rejected(raw in "[A-Za-z0-9_.-]{0,40}") {
            prop_assert!(RepositoryIdentifier::parse(&raw).is_err());
        }
    }

    #[test]
    fn rejects_malformed_shapes()
    {
        for raw in ["", "/", "octo/", "/demo", "octo/demo/extra", "octo//demo", "   "] {
            match RepositoryIdentifier::parse(raw,) {
                Err(Error::InvalidIdentifier {
                    identifier,
                },) => assert_eq!(identifier, raw),
                other => panic!("expected invalid identifier for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn trims_surrounding_whitespace()
    {
        let id = RepositoryIdentifier::parse("  rust-lang/rust\n",).expect("valid identifier",);
        assert_eq!(id.to_string(), "rust-lang/rust");
    }

    #[test]
    fn serializes_as_plain_string()
    {
        let id: RepositoryIdentifier = "octo/demo".parse().expect("valid identifier",);
        let json = serde_json::to_string(&id,).expect("serialization failed",);
        assert_eq!(json, "\"octo/demo\"");
    }
}
