use crate::event::StartTime;
use serde::Deserialize;
use time::{
    format_description::BorrowedFormatItem, macros::format_description, Date, Time, Weekday,
};

static SHORT_DATE_FMT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

static TIME_24H_FMT: &[BorrowedFormatItem<'_>] = format_description!("[hour]:[minute]");

static TIME_12H_FMT: &[BorrowedFormatItem<'_>] =
    format_description!("[hour repr:12 padding:none]:[minute][period case:lower]");

/// Turns dates and times into display strings
pub(crate) trait DateFormat {
    /// Abbreviated weekday name, for the calendar header
    fn weekday_short(&self, wd: Weekday) -> String;

    /// Title for the calendar page showing the month containing `date`
    fn month_year(&self, date: Date) -> String;

    fn short_date(&self, date: Date) -> String;

    fn time_of_day(&self, time: StartTime) -> String;
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
pub(crate) enum TimeFormat {
    #[default]
    #[serde(rename = "24h")]
    TwentyFourHour,
    #[serde(rename = "12h")]
    TwelveHour,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct PlainFormat {
    time_format: TimeFormat,
}

impl PlainFormat {
    pub(crate) fn new(time_format: TimeFormat) -> PlainFormat {
        PlainFormat { time_format }
    }
}

impl DateFormat for PlainFormat {
    fn weekday_short(&self, wd: Weekday) -> String {
        wd.to_string().chars().take(3).collect()
    }

    fn month_year(&self, date: Date) -> String {
        format!("{} {}", date.month(), date.year())
    }

    fn short_date(&self, date: Date) -> String {
        date.format(SHORT_DATE_FMT)
            .unwrap_or_else(|_| date.to_string())
    }

    fn time_of_day(&self, time: StartTime) -> String {
        let fmt = match self.time_format {
            TimeFormat::TwentyFourHour => TIME_24H_FMT,
            TimeFormat::TwelveHour => TIME_12H_FMT,
        };
        let t: Time = time.as_time();
        t.format(fmt).unwrap_or_else(|_| time.to_string())
    }
}
