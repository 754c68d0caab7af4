use crate::binning::events_on;
use crate::event::Event;
use crate::format::DateFormat;
use crate::store::EventStore;
use crate::theme::{
    daylist::{HIGHLIGHT_STYLE, TASK_TYPE_STYLE},
    event_dot_style,
    form::HINT_STYLE,
    BASE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Margin, Rect},
    text::{Line, Span},
    widgets::{Block, Clear, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};
use time::Date;

const MAX_WIDTH: u16 = 64;

/// Lines around the list: borders, a blank line, and the key hints
const CHROME_LINES: u16 = 4;

const HINTS: &str = "Enter: edit  a: add  Esc: close";

/// State of the modal listing every event on a single day
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DayListState {
    date: Date,
    list: ListState,
}

impl DayListState {
    pub(crate) fn new(date: Date) -> DayListState {
        DayListState {
            date,
            list: ListState::default().with_selected(Some(0)),
        }
    }

    pub(crate) fn date(&self) -> Date {
        self.date
    }

    /// Move the highlight down one entry in a list of `len` events.  Returns
    /// `false` if already at the bottom.
    pub(crate) fn select_next(&mut self, len: usize) -> bool {
        match self.list.selected() {
            Some(i) if i + 1 < len => {
                self.list.select(Some(i + 1));
                true
            }
            _ => false,
        }
    }

    pub(crate) fn select_previous(&mut self) -> bool {
        match self.list.selected() {
            Some(i) if i > 0 => {
                self.list.select(Some(i - 1));
                true
            }
            _ => false,
        }
    }

    /// The highlighted event, looked up in the current store contents
    pub(crate) fn selected_event<'a>(&self, store: &'a EventStore) -> Option<&'a Event> {
        let i = self.list.selected()?;
        events_on(store.list(), self.date).get(i).copied()
    }
}

/// Modal dialog listing all events on a day, in start-time order
#[derive(Debug)]
pub(crate) struct DayList<'a, F> {
    store: &'a EventStore,
    format: &'a F,
}

impl<'a, F: DateFormat> DayList<'a, F> {
    pub(crate) fn new(store: &'a EventStore, format: &'a F) -> Self {
        DayList { store, format }
    }

    fn item(&self, ev: &Event) -> ListItem<'static> {
        let time = match ev.start_time() {
            Some(t) => self.format.time_of_day(t),
            None => String::from("all day"),
        };
        ListItem::new(Line::from(vec![
            Span::styled("● ", event_dot_style(ev.color)),
            Span::styled(format!("{time:<8}"), BASE_STYLE),
            Span::styled(ev.name.clone(), BASE_STYLE),
            Span::styled(format!("  {}", ev.task_type), TASK_TYPE_STYLE),
        ]))
    }
}

impl<F: DateFormat> StatefulWidget for DayList<'_, F> {
    type State = DayListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let events = events_on(self.store.list(), state.date);
        if let Some(i) = state.list.selected() {
            if i >= events.len() {
                state.list.select(events.len().checked_sub(1));
            }
        } else if !events.is_empty() {
            state.list.select(Some(0));
        }
        let rows = u16::try_from(events.len().max(1)).unwrap_or(u16::MAX);
        let height = rows.saturating_add(CHROME_LINES).min(area.height);
        let width = MAX_WIDTH.min(area.width);
        let [outer_area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [outer_area] = Layout::vertical([height])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        let title = format!(
            " {} · {} event{} ",
            self.format.short_date(state.date),
            events.len(),
            if events.len() == 1 { "" } else { "s" }
        );
        let block = Block::bordered()
            .title(title)
            .title_alignment(Alignment::Center)
            .style(BASE_STYLE);
        let inner = block.inner(outer_area).inner(Margin::new(1, 0));
        block.render(outer_area, buf);
        let [list_area, _, hint_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);
        if events.is_empty() {
            Paragraph::new(Line::styled("No events", HINT_STYLE)).render(list_area, buf);
        } else {
            let items = events.iter().map(|ev| self.item(ev)).collect::<Vec<_>>();
            let list = List::new(items)
                .style(BASE_STYLE)
                .highlight_style(HIGHLIGHT_STYLE);
            StatefulWidget::render(list, list_area, buf, &mut state.list);
        }
        Paragraph::new(Line::styled(HINTS, HINT_STYLE)).render(hint_area, buf);
    }
}
