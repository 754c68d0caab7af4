use crate::event::{Event, EventDraft, EventId};
use log::{debug, info};
use std::fmt;
use thiserror::Error;

/// Callback invoked after every store mutation with the change and the new
/// snapshot of all events
pub(crate) type Listener = Box<dyn FnMut(&StoreChange, &[Event])>;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum StoreChange {
    Added(Event),
    /// The event as it is after the update
    Updated(Event),
    Deleted(Event),
}

impl StoreChange {
    pub(crate) fn event(&self) -> &Event {
        match self {
            StoreChange::Added(ev) | StoreChange::Updated(ev) | StoreChange::Deleted(ev) => ev,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct SubscriptionId(usize);

/// In-memory collection of events.  All changes to events go through here.
#[derive(Default)]
pub(crate) struct EventStore {
    events: Vec<Event>,
    revision: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: usize,
}

impl EventStore {
    pub(crate) fn new() -> EventStore {
        EventStore::default()
    }

    /// All events currently stored, in no particular order
    pub(crate) fn list(&self) -> &[Event] {
        &self.events
    }

    pub(crate) fn get(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|ev| ev.id == id)
    }

    /// Counter that increases with every mutation
    pub(crate) fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn add(&mut self, draft: EventDraft) -> Event {
        let mut id = EventId::random();
        while self.get(id).is_some() {
            id = EventId::random();
        }
        let event = Event::new(id, draft);
        info!(
            "Added event {} {:?} on {} at {:?}",
            event.id, event.name, event.date, event.start_time
        );
        self.events.push(event.clone());
        self.notify(StoreChange::Added(event.clone()));
        event
    }

    pub(crate) fn update(&mut self, id: EventId, draft: EventDraft) -> Result<(), EventNotFound> {
        let Some(slot) = self.events.iter_mut().find(|ev| ev.id == id) else {
            debug!("Update of unknown event {id} ignored");
            return Err(EventNotFound(id));
        };
        *slot = Event::new(id, draft);
        let event = slot.clone();
        info!(
            "Updated event {} {:?} on {} at {:?}",
            event.id, event.name, event.date, event.start_time
        );
        self.notify(StoreChange::Updated(event));
        Ok(())
    }

    /// Removes the event with the given ID and returns it.  Deleting an
    /// absent ID does nothing and returns `None`.
    pub(crate) fn delete(&mut self, id: EventId) -> Option<Event> {
        let Some(pos) = self.events.iter().position(|ev| ev.id == id) else {
            debug!("Delete of unknown event {id} ignored");
            return None;
        };
        let event = self.events.remove(pos);
        info!("Deleted event {} {:?} on {}", event.id, event.name, event.date);
        self.notify(StoreChange::Deleted(event.clone()));
        Some(event)
    }

    pub(crate) fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Returns `false` if there was no such subscription
    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, change: StoreChange) {
        self.revision += 1;
        for (_, listener) in &mut self.listeners {
            listener(&change, &self.events);
        }
    }
}

impl fmt::Debug for EventStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStore")
            .field("events", &self.events)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("no event with ID {0}")]
pub(crate) struct EventNotFound(pub(crate) EventId);
