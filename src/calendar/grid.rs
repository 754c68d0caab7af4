use super::OutOfTimeError;
use serde::Deserialize;
use std::iter::successors;
use std::slice::ChunksExact;
use time::{Date, Month, Weekday};

pub(crate) const DAYS_IN_WEEK: usize = 7;

/// Which day is shown in the leftmost column of the calendar
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub(crate) fn first_weekday(self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sunday,
            WeekStart::Monday => Weekday::Monday,
        }
    }

    /// Column of `wd` in a week beginning on `self`, counting from zero
    pub(crate) fn column(self, wd: Weekday) -> usize {
        let n = match self {
            WeekStart::Sunday => wd.number_days_from_sunday(),
            WeekStart::Monday => wd.number_days_from_monday(),
        };
        usize::from(n)
    }

    /// The days of the week in column order
    pub(crate) fn weekdays(self) -> impl Iterator<Item = Weekday> {
        successors(Some(self.first_weekday()), |wd| Some(wd.next())).take(DAYS_IN_WEEK)
    }
}

/// The dates shown on the calendar for one month: whole weeks from the one
/// containing the first of the month to the one containing its last day
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthGrid {
    year: i32,
    month: Month,
    week_start: WeekStart,
    // Invariant: nonempty, length a multiple of DAYS_IN_WEEK, consecutive
    // ascending days
    days: Vec<Date>,
}

impl MonthGrid {
    /// Build the grid for the month containing `reference`.  Fails if the
    /// leading or trailing days of the grid fall outside the range of
    /// representable dates.
    pub(crate) fn new(reference: Date, week_start: WeekStart) -> Result<MonthGrid, OutOfTimeError> {
        let first = first_of_month(reference);
        let last = last_of_month(reference);
        let lead = week_start.column(first.weekday());
        let trail = DAYS_IN_WEEK - 1 - week_start.column(last.weekday());
        let start = nth_day_before(first, lead).ok_or(OutOfTimeError)?;
        let end = nth_day_after(last, trail).ok_or(OutOfTimeError)?;
        let days = successors(Some(start), |&d| d.next_day().filter(|&next| next <= end))
            .collect::<Vec<_>>();
        debug_assert_eq!(
            days.len() % DAYS_IN_WEEK,
            0,
            "grid should consist of whole weeks"
        );
        Ok(MonthGrid {
            year: reference.year(),
            month: reference.month(),
            week_start,
            days,
        })
    }

    pub(crate) fn year(&self) -> i32 {
        self.year
    }

    pub(crate) fn month(&self) -> Month {
        self.month
    }

    pub(crate) fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub(crate) fn days(&self) -> &[Date] {
        &self.days
    }

    pub(crate) fn weeks(&self) -> ChunksExact<'_, Date> {
        self.days.chunks_exact(DAYS_IN_WEEK)
    }

    pub(crate) fn week_count(&self) -> usize {
        self.days.len() / DAYS_IN_WEEK
    }

    pub(crate) fn in_month(&self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

pub(super) fn first_of_month(date: Date) -> Date {
    nth_day_before(date, usize::from(date.day() - 1)).unwrap_or(date)
}

pub(super) fn last_of_month(date: Date) -> Date {
    successors(Some(date), |d| d.next_day())
        .take_while(|d| d.month() == date.month())
        .last()
        .unwrap_or(date)
}

/// Returns the date `n` days before `date`, or `None` if there is no such
/// date
fn nth_day_before(date: Date, n: usize) -> Option<Date> {
    successors(Some(date), |d| d.previous_day()).nth(n)
}

fn nth_day_after(date: Date, n: usize) -> Option<Date> {
    successors(Some(date), |d| d.next_day()).nth(n)
}
