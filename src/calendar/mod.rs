mod grid;
mod view;
mod widget;
pub(crate) use self::grid::WeekStart;
pub(crate) use self::view::MonthView;
pub(crate) use self::widget::Calendar;
use thiserror::Error;

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;
