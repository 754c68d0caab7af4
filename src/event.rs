use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::{Date, Time};
use uuid::Uuid;

/// Identifier assigned to an event by the store when it is added
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct EventId(Uuid);

impl EventId {
    pub(crate) fn random() -> EventId {
        EventId(Uuid::new_v4())
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) enum EventColor {
    #[default]
    Blue,
    Red,
    Green,
}

impl EventColor {
    /// The fixed palette, in display order.  The first entry is the default
    /// for new events.
    pub(crate) const PALETTE: [EventColor; 3] =
        [EventColor::Blue, EventColor::Red, EventColor::Green];

    pub(crate) fn name(self) -> &'static str {
        match self {
            EventColor::Blue => "blue",
            EventColor::Red => "red",
            EventColor::Green => "green",
        }
    }

    pub(crate) fn next(self) -> EventColor {
        match self {
            EventColor::Blue => EventColor::Red,
            EventColor::Red => EventColor::Green,
            EventColor::Green => EventColor::Blue,
        }
    }

    pub(crate) fn previous(self) -> EventColor {
        match self {
            EventColor::Blue => EventColor::Green,
            EventColor::Red => EventColor::Blue,
            EventColor::Green => EventColor::Red,
        }
    }
}

impl fmt::Display for EventColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Free-form categorical label attached to an event.  Nothing in the calendar
/// interprets it.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(transparent)]
pub(crate) struct TaskType(String);

impl TaskType {
    pub(crate) fn new<S: Into<String>>(label: S) -> TaskType {
        TaskType(label.into())
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fields of an event other than its ID
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct EventDraft {
    pub(crate) name: String,
    pub(crate) desc: String,
    pub(crate) date: Date,
    /// "HH:MM", or empty if the event has no start time
    pub(crate) start_time: String,
    pub(crate) color: EventColor,
    pub(crate) task_type: TaskType,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Event {
    pub(crate) id: EventId,
    pub(crate) name: String,
    pub(crate) desc: String,
    pub(crate) date: Date,
    pub(crate) start_time: String,
    pub(crate) color: EventColor,
    pub(crate) task_type: TaskType,
}

impl Event {
    pub(crate) fn new(id: EventId, draft: EventDraft) -> Event {
        let EventDraft {
            name,
            desc,
            date,
            start_time,
            color,
            task_type,
        } = draft;
        Event {
            id,
            name,
            desc,
            date,
            start_time,
            color,
            task_type,
        }
    }

    /// Returns `None` if the start time is empty or malformed
    pub(crate) fn start_time(&self) -> Option<StartTime> {
        self.start_time.parse().ok()
    }

    pub(crate) fn to_draft(&self) -> EventDraft {
        EventDraft {
            name: self.name.clone(),
            desc: self.desc.clone(),
            date: self.date,
            start_time: self.start_time.clone(),
            color: self.color,
            task_type: self.task_type.clone(),
        }
    }
}

/// A time of day with minute precision, parsed from `H[H]:M[M]`
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct StartTime(Time);

impl StartTime {
    pub(crate) fn minutes_since_midnight(self) -> u16 {
        u16::from(self.0.hour()) * 60 + u16::from(self.0.minute())
    }

    pub(crate) fn as_time(self) -> Time {
        self.0
    }
}

impl FromStr for StartTime {
    type Err = StartTimeError;

    fn from_str(s: &str) -> Result<StartTime, StartTimeError> {
        let (hour, minute) = s.trim().split_once(':').ok_or(StartTimeError::Format)?;
        let hour = parse_component(hour)?;
        let minute = parse_component(minute)?;
        Time::from_hms(hour, minute, 0)
            .map(StartTime)
            .map_err(|_| StartTimeError::OutOfRange { hour, minute })
    }
}

impl fmt::Display for StartTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

fn parse_component(s: &str) -> Result<u8, StartTimeError> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(StartTimeError::Format);
    }
    s.parse::<u8>().map_err(|_| StartTimeError::Format)
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum StartTimeError {
    #[error("start time must be of the form HH:MM")]
    Format,
    #[error("{hour}:{minute:02} is not a valid time of day")]
    OutOfRange { hour: u8, minute: u8 },
}
