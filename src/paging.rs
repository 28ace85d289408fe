// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Sequential page iteration over upstream listings.
///
/// Pages are requested one at a time. Bounded collection stops issuing
/// requests as soon as the requested number of items has been produced.
use std::future::Future;

use tracing::debug;

use crate::{
    error::UpstreamFailure,
    upstream::{Page, PageRequest},
};

/// Collects items from consecutive pages until `limit` items were produced
/// or the listing is exhausted. `None` collects the whole listing.
///
/// # Errors
///
/// Returns the first [`UpstreamFailure`] reported by `fetch`; items gathered
/// from earlier pages are discarded.
pub(crate) async fn collect<T, F, Fut,>(
    per_page: u8,
    limit: Option<usize,>,
    mut fetch: F,
) -> Result<Vec<T,>, UpstreamFailure,>
where
    F: FnMut(PageRequest,) -> Fut,
    Fut: Future<Output = Result<Page<T,>, UpstreamFailure,>,>,
{
    let size = match limit {
        Some(limit,) => per_page.min(u8::try_from(limit,).unwrap_or(u8::MAX,),).max(1,),
        None => per_page.max(1,),
    };

    let mut items = Vec::new();
    let mut number = 1u32;

    if limit == Some(0,) {
        return Ok(items,);
    }

    loop {
        let page = fetch(PageRequest {
            number,
            size,
        },)
        .await?;
        debug!("Fetched page {} with {} items", number, page.items.len());

        let has_next = page.has_next;
        for item in page.items {
            items.push(item,);
            if limit.is_some_and(|limit| items.len() >= limit,) {
                return Ok(items,);
            }
        }

        if !has_next {
            return Ok(items,);
        }

        number += 1;
    }
}

/// Counts the items of a whole listing that satisfy `predicate`.
///
/// # Errors
///
/// Returns the first [`UpstreamFailure`] reported by `fetch`.
pub(crate) async fn count<T, F, Fut, P,>(
    per_page: u8,
    mut fetch: F,
    predicate: P,
) -> Result<u64, UpstreamFailure,>
where
    F: FnMut(PageRequest,) -> Fut,
    Fut: Future<Output = Result<Page<T,>, UpstreamFailure,>,>,
    P: Fn(&T,) -> bool,
{
    let size = per_page.max(1,);
    let mut total = 0u64;
    let mut number = 1u32;

    loop {
        let page = fetch(PageRequest {
            number,
            size,
        },)
        .await?;
        debug!("Counting page {} with {} items", number, page.items.len());

        total += page.items.iter().filter(|item| predicate(item,),).count() as u64;

        if !page.has_next {
            return Ok(total,);
        }

        number += 1;
    }
}
