use crate::event::{Event, StartTime};
use std::collections::BTreeMap;
use time::Date;

/// Returns the events on `day`, ordered by start time.
///
/// Events without a usable start time come first.  Events with equal start
/// times keep their relative order from `events`.
pub(crate) fn events_on(events: &[Event], day: Date) -> Vec<&Event> {
    let mut binned = events.iter().filter(|ev| ev.date == day).collect::<Vec<_>>();
    sort_by_start_time(&mut binned);
    binned
}

/// Groups the events falling on any of `days` by date, each group ordered as
/// by [`events_on()`].  Days without events are omitted.
pub(crate) fn bin_by_day<'a>(events: &'a [Event], days: &[Date]) -> BTreeMap<Date, Vec<&'a Event>> {
    let mut bins = BTreeMap::<Date, Vec<&'a Event>>::new();
    for ev in events {
        if days.contains(&ev.date) {
            bins.entry(ev.date).or_default().push(ev);
        }
    }
    for bin in bins.values_mut() {
        sort_by_start_time(bin);
    }
    bins
}

fn sort_by_start_time(events: &mut [&Event]) {
    events.sort_by_key(|ev| ev.start_time().map(StartTime::minutes_since_midnight));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventColor, EventDraft, TaskType};
    use crate::store::EventStore;
    use time::macros::date;

    fn draft(name: &str, date: Date, start_time: &str) -> EventDraft {
        EventDraft {
            name: name.into(),
            desc: String::new(),
            date,
            start_time: start_time.into(),
            color: EventColor::Blue,
            task_type: TaskType::new("Write an email to a colleague"),
        }
    }

    fn names(events: &[&Event]) -> Vec<String> {
        events.iter().map(|ev| ev.name.clone()).collect()
    }

    #[test]
    fn test_standup_and_lunch() {
        let mut store = EventStore::new();
        store.add(draft("Standup", date!(2024 - 05 - 01), "09:00"));
        store.add(draft("Lunch", date!(2024 - 05 - 01), "12:30"));
        let day = events_on(store.list(), date!(2024 - 05 - 01));
        assert_eq!(names(&day), ["Standup", "Lunch"]);
    }

    #[test]
    fn test_filters_by_day() {
        let mut store = EventStore::new();
        store.add(draft("Before", date!(2024 - 04 - 30), "10:00"));
        store.add(draft("On", date!(2024 - 05 - 01), "10:00"));
        store.add(draft("After", date!(2024 - 05 - 02), "10:00"));
        let day = events_on(store.list(), date!(2024 - 05 - 01));
        assert_eq!(names(&day), ["On"]);
        assert!(events_on(store.list(), date!(2024 - 05 - 03)).is_empty());
    }

    #[test]
    fn test_minute_accurate_order() {
        let mut store = EventStore::new();
        let day = date!(2024 - 05 - 01);
        store.add(draft("Ten", day, "10:00"));
        store.add(draft("NineFifty", day, "9:50"));
        store.add(draft("NineFive", day, "9:5"));
        store.add(draft("NineThirty", day, "09:30"));
        let binned = events_on(store.list(), day);
        assert_eq!(names(&binned), ["NineFive", "NineThirty", "NineFifty", "Ten"]);
    }

    #[test]
    fn test_ties_keep_order() {
        let mut store = EventStore::new();
        let day = date!(2024 - 05 - 01);
        store.add(draft("First", day, "08:00"));
        store.add(draft("Early", day, "07:00"));
        store.add(draft("Second", day, "8:00"));
        store.add(draft("Third", day, "08:00"));
        let binned = events_on(store.list(), day);
        assert_eq!(names(&binned), ["Early", "First", "Second", "Third"]);
    }

    #[test]
    fn test_untimed_and_malformed_first() {
        let mut store = EventStore::new();
        let day = date!(2024 - 05 - 01);
        store.add(draft("Timed", day, "00:00"));
        store.add(draft("Untimed", day, ""));
        store.add(draft("Garbage", day, "noonish"));
        let binned = events_on(store.list(), day);
        assert_eq!(names(&binned), ["Untimed", "Garbage", "Timed"]);
    }

    #[test]
    fn test_bin_by_day() {
        let mut store = EventStore::new();
        store.add(draft("Lunch", date!(2024 - 05 - 01), "12:30"));
        store.add(draft("Outside", date!(2024 - 07 - 01), "12:30"));
        store.add(draft("Standup", date!(2024 - 05 - 01), "09:00"));
        store.add(draft("Review", date!(2024 - 05 - 03), "15:00"));
        let days = [
            date!(2024 - 05 - 01),
            date!(2024 - 05 - 02),
            date!(2024 - 05 - 03),
        ];
        let bins = bin_by_day(store.list(), &days);
        assert_eq!(bins.len(), 2);
        assert_eq!(names(&bins[&date!(2024 - 05 - 01)]), ["Standup", "Lunch"]);
        assert_eq!(names(&bins[&date!(2024 - 05 - 03)]), ["Review"]);
        for day in days {
            assert_eq!(
                bins.get(&day).cloned().unwrap_or_default(),
                events_on(store.list(), day)
            );
        }
    }
}
