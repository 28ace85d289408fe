// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Look-back windows measured in whole days from a reference instant.
use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::error::Error;

/// Time range `[until - days, until]`.
///
/// The lower bound is not aligned to midnight: a 7-day window ending at
/// 15:42 starts at 15:42 seven days earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
pub struct Window
{
    since: DateTime<Utc,>,
    until: DateTime<Utc,>,
    days:  u32,
}

impl Window
{
    /// Window of `days` days ending at the current wall-clock time.
    ///
    /// # Errors
    ///
    /// See [`Window::ending_at`].
    pub fn ending_now(days: u32,) -> Result<Self, Error,>
    {
        Self::ending_at(Utc::now(), days,)
    }

    /// Window of `days` days ending at `until`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when `days` is zero or reaches
    /// before the earliest representable date.
    pub fn ending_at(until: DateTime<Utc,>, days: u32,) -> Result<Self, Error,>
    {
        if days == 0 {
            return Err(Error::invalid_argument("days must be a positive integer",),);
        }

        let since = Duration::try_days(i64::from(days,),)
            .and_then(|span| until.checked_sub_signed(span,),)
            .ok_or_else(|| Error::invalid_argument(format!("days {days} is out of range"),),)?;

        Ok(Self {
            since,
            until,
            days,
        },)
    }

    /// Start of the window.
    pub fn since(&self,) -> DateTime<Utc,>
    {
        self.since
    }

    /// End of the window.
    pub fn until(&self,) -> DateTime<Utc,>
    {
        self.until
    }

    /// Length of the window in days.
    pub fn days(&self,) -> u32
    {
        self.days
    }

    /// Calendar date of the window start.
    pub fn first_date(&self,) -> NaiveDate
    {
        self.since.date_naive()
    }

    /// Calendar date of the window end.
    pub fn last_date(&self,) -> NaiveDate
    {
        self.until.date_naive()
    }
}
