use super::grid::{first_of_month, last_of_month, MonthGrid, WeekStart};
use super::OutOfTimeError;
use crate::overflow::OverflowLayout;
use log::debug;
use std::collections::HashMap;
use time::{Date, Duration};

/// Navigation state of the calendar: which month is displayed and which day
/// is selected
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthView {
    today: Date,
    selected: Date,
    grid: MonthGrid,
    // Per-day overflow layouts for the displayed grid; discarded whenever
    // the grid changes
    layouts: HashMap<Date, OverflowLayout>,
}

impl MonthView {
    pub(crate) fn new(today: Date, week_start: WeekStart) -> Result<Self, OutOfTimeError> {
        Ok(MonthView {
            today,
            selected: today,
            grid: MonthGrid::new(today, week_start)?,
            layouts: HashMap::new(),
        })
    }

    pub(crate) fn start_date(mut self, date: Date) -> Result<Self, OutOfTimeError> {
        self.select(date)?;
        Ok(self)
    }

    pub(crate) fn today(&self) -> Date {
        self.today
    }

    pub(crate) fn selected(&self) -> Date {
        self.selected
    }

    pub(crate) fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    pub(crate) fn layout_mut(&mut self, date: Date) -> &mut OverflowLayout {
        self.layouts.entry(date).or_default()
    }

    /// Select `date`, switching to its month if necessary.  On error, nothing
    /// changes.
    pub(crate) fn select(&mut self, date: Date) -> Result<(), OutOfTimeError> {
        if !self.grid.in_month(date) {
            self.grid = MonthGrid::new(date, self.grid.week_start())?;
            self.layouts.clear();
            debug!("Showing {} {}", self.grid.month(), self.grid.year());
        }
        self.selected = date;
        Ok(())
    }

    pub(crate) fn jump_to_today(&mut self) -> Result<(), OutOfTimeError> {
        self.select(self.today)
    }

    pub(crate) fn move_days(&mut self, days: i64) -> Result<(), OutOfTimeError> {
        let date = self
            .selected
            .checked_add(Duration::days(days))
            .ok_or(OutOfTimeError)?;
        self.select(date)
    }

    /// Move to the same day of the following month, or to that month's last
    /// day if it is shorter
    pub(crate) fn next_month(&mut self) -> Result<(), OutOfTimeError> {
        let first = last_of_month(self.selected)
            .next_day()
            .ok_or(OutOfTimeError)?;
        self.select(same_day_in_month(self.selected, first))
    }

    pub(crate) fn previous_month(&mut self) -> Result<(), OutOfTimeError> {
        let first = first_of_month(self.selected)
            .previous_day()
            .map(first_of_month)
            .ok_or(OutOfTimeError)?;
        self.select(same_day_in_month(self.selected, first))
    }
}

/// Returns the day in the month beginning at `first` with the same day of the
/// month as `date`, clamped to the month's length
fn same_day_in_month(date: Date, first: Date) -> Date {
    let last = last_of_month(first);
    last.replace_day(date.day().min(last.day()))
        .unwrap_or(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_start_date() {
        let view = MonthView::new(date!(2025 - 01 - 22), WeekStart::Sunday)
            .unwrap()
            .start_date(date!(2024 - 05 - 01))
            .unwrap();
        assert_eq!(view.today(), date!(2025 - 01 - 22));
        assert_eq!(view.selected(), date!(2024 - 05 - 01));
        assert_eq!(view.grid().month(), time::Month::May);
        assert_eq!(view.grid().year(), 2024);
    }

    #[test]
    fn test_move_within_month_keeps_grid() {
        let mut view = MonthView::new(date!(2024 - 05 - 15), WeekStart::Sunday).unwrap();
        let grid = view.grid().clone();
        view.move_days(7).unwrap();
        assert_eq!(view.selected(), date!(2024 - 05 - 22));
        assert_eq!(view.grid(), &grid);
        view.move_days(-1).unwrap();
        assert_eq!(view.selected(), date!(2024 - 05 - 21));
    }

    #[test]
    fn test_move_across_month() {
        let mut view = MonthView::new(date!(2024 - 05 - 29), WeekStart::Sunday).unwrap();
        view.move_days(7).unwrap();
        assert_eq!(view.selected(), date!(2024 - 06 - 05));
        assert_eq!(view.grid().month(), time::Month::June);
    }

    #[test]
    fn test_next_month_clamps() {
        let mut view = MonthView::new(date!(2024 - 01 - 31), WeekStart::Sunday).unwrap();
        view.next_month().unwrap();
        assert_eq!(view.selected(), date!(2024 - 02 - 29));
        view.next_month().unwrap();
        assert_eq!(view.selected(), date!(2024 - 03 - 29));
    }

    #[test]
    fn test_previous_month_across_year() {
        let mut view = MonthView::new(date!(2025 - 01 - 22), WeekStart::Monday).unwrap();
        view.previous_month().unwrap();
        assert_eq!(view.selected(), date!(2024 - 12 - 22));
        assert_eq!(view.grid().year(), 2024);
        view.jump_to_today().unwrap();
        assert_eq!(view.selected(), date!(2025 - 01 - 22));
        assert_eq!(view.grid().year(), 2025);
    }

    #[test]
    fn test_failed_navigation_changes_nothing() {
        let mut view = MonthView::new(date!(9999 - 11 - 15), WeekStart::Sunday).unwrap();
        let before = view.clone();
        assert_eq!(view.next_month(), Err(OutOfTimeError));
        assert_eq!(view, before);
    }

    #[test]
    fn test_layouts_reset_on_month_change() {
        let mut view = MonthView::new(date!(2024 - 05 - 15), WeekStart::Sunday).unwrap();
        view.layout_mut(date!(2024 - 05 - 15));
        assert_eq!(view.layouts.len(), 1);
        view.move_days(1).unwrap();
        assert_eq!(view.layouts.len(), 1);
        view.next_month().unwrap();
        assert!(view.layouts.is_empty());
    }
}
