// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Bounded issue listing with body previews.
use tracing::{debug, info};

use crate::{
    error::{Error, Lookup, classify},
    identifier::RepositoryIdentifier,
    models::{Issue, IssueState, StateFilter},
    paging,
    resolver::RepositoryResolver,
    session::Session,
    upstream::{IssueQuery, RawIssue},
};

/// Default number of issues returned by [`IssueLister::list_issues`].
pub const DEFAULT_MAX_ISSUES: u32 = 30;
/// Number of body characters kept before the ellipsis marker.
pub const BODY_PREVIEW_CHARS: usize = 500;
const ELLIPSIS: &str = "...";

/// Lists issues of a repository in upstream order.
#[derive(Debug, Clone, Copy,)]
pub struct IssueLister<'s,>
{
    session: &'s Session,
}

impl<'s,> IssueLister<'s,>
{
    pub fn new(session: &'s Session,) -> Self
    {
        Self {
            session,
        }
    }

    /// Returns at most `max_issues` issues in `state`, in upstream order.
    ///
    /// Page requests stop as soon as `max_issues` issues were produced.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidArgument`] when `max_issues` is zero.
    /// * The resolver taxonomy, including [`Error::RateLimited`] raised by
    ///   any page after the first.
    pub async fn list_issues(
        &self,
        identifier: &str,
        state: StateFilter,
        max_issues: u32,
    ) -> Result<Vec<Issue,>, Error,>
    {
        RepositoryIdentifier::parse(identifier,)?;
        if max_issues == 0 {
            return Err(Error::invalid_argument("max_issues must be a positive integer",),);
        }

        let resolved = RepositoryResolver::new(self.session,).resolve(identifier,).await?;
        let id = resolved.identifier();
        let query = &IssueQuery {
            state,
            since: None,
        };
        debug!("Listing {} issues for {} (max: {})", state, id, max_issues);

        let upstream = self.session.upstream();
        let raw = paging::collect(
            self.session.per_page(),
            Some(max_issues as usize,),
            |page| upstream.issues(id, query, page,),
        )
        .await
        .map_err(|failure| classify(failure, &id.to_string(), Lookup::Listing,),)?;

        let issues = raw.into_iter().map(normalize_issue,).collect::<Result<Vec<_,>, _,>>()?;
        info!("Retrieved {} {} issues for {}", issues.len(), state, id);
        Ok(issues,)
    }
}

/// Shortens an issue body to a preview.
///
/// Bodies longer than 500 characters keep their first 500 characters
/// followed by `...`; shorter bodies and `None` pass through unchanged.
/// Characters are Unicode scalar values, so multi-byte text is never split.
///
/// # Examples
///
/// ```
/// use repo_insight::truncate_body;
///
/// let long = "x".repeat(600,);
/// let preview = truncate_body(Some(long,),).expect("body present",);
/// assert_eq!(preview.chars().count(), 503);
/// assert!(preview.ends_with("..."));
/// assert_eq!(truncate_body(None), None);
/// ```
pub fn truncate_body(body: Option<String,>,) -> Option<String,>
{
    body.map(|text| match text.char_indices().nth(BODY_PREVIEW_CHARS,) {
        Some((cut, _,),) => {
            let mut preview = String::with_capacity(cut + ELLIPSIS.len(),);
            preview.push_str(&text[..cut],);
            preview.push_str(ELLIPSIS,);
            preview
        }
        None => text,
    },)
}

fn normalize_issue(raw: RawIssue,) -> Result<Issue, Error,>
{
    let state = match raw.state.as_str() {
        "open" => IssueState::Open,
        "closed" => IssueState::Closed,
        other => {
            return Err(Error::upstream_data(format!(
                "issue #{} has unknown state '{other}'",
                raw.number
            ),),);
        }
    };

    Ok(Issue {
        number: raw.number,
        title: raw.title,
        state,
        created_at: raw.created_at,
        updated_at: raw.updated_at,
        closed_at: raw.closed_at,
        author: raw.user.map(|user| user.login,),
        labels: raw.labels.into_iter().map(|label| label.name,).collect(),
        comments: raw.comments,
        html_url: raw.html_url,
        body: truncate_body(raw.body,),
    },)
}
