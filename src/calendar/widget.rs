use super::grid::DAYS_IN_WEEK;
use super::view::MonthView;
use crate::binning::bin_by_day;
use crate::event::Event;
use crate::format::DateFormat;
use crate::overflow::Fit;
use crate::store::EventStore;
use crate::theme::{
    calendar::{
        BORDER_STYLE, DAY_STYLE, MORE_STYLE, OTHER_MONTH_STYLE, PAST_DAY_STYLE,
        SELECTED_BORDER_STYLE, TODAY_STYLE,
    },
    event_dot_style, BASE_STYLE, MONTH_STYLE, WEEKDAY_STYLE,
};
use ratatui::{prelude::*, widgets::*};
use std::iter::zip;
use std::rc::Rc;
use time::Date;

/// Columns left blank between adjacent days
const DAY_GAP: u16 = 1;

/// Every event takes up one line of its day's cell
const EVENT_LINES: u16 = 1;

/// Month grid with each day's events listed in its cell.  Days with more
/// events than fit show the number left out in the top right of the cell.
#[derive(Debug)]
pub(crate) struct Calendar<'a, F> {
    store: &'a EventStore,
    format: &'a F,
}

impl<'a, F: DateFormat> Calendar<'a, F> {
    pub(crate) fn new(store: &'a EventStore, format: &'a F) -> Self {
        Calendar { store, format }
    }

    fn columns(area: Rect) -> Rc<[Rect]> {
        Layout::horizontal([Constraint::Fill(1); DAYS_IN_WEEK])
            .spacing(DAY_GAP)
            .split(area)
    }

    fn render_day(
        &self,
        date: Date,
        events: &[&Event],
        area: Rect,
        buf: &mut Buffer,
        state: &mut MonthView,
    ) {
        let in_month = state.grid().in_month(date);
        let plain_label = date.day().to_string();
        let (label, label_style, text_style) = if date == state.today() {
            (format!("[{plain_label}]"), TODAY_STYLE, BASE_STYLE)
        } else if !in_month {
            (plain_label.clone(), OTHER_MONTH_STYLE, OTHER_MONTH_STYLE)
        } else if date < state.today() {
            (plain_label.clone(), PAST_DAY_STYLE, PAST_DAY_STYLE)
        } else {
            (plain_label.clone(), DAY_STYLE, BASE_STYLE)
        };
        let border_style = if date == state.selected() {
            SELECTED_BORDER_STYLE
        } else {
            BORDER_STYLE
        };
        let mut block = Block::new()
            .borders(Borders::TOP)
            .border_style(border_style)
            .style(BASE_STYLE);
        let inner = block.inner(area);
        let fit = state.layout_mut(date).ensure(
            inner.height,
            self.store.revision(),
            events,
            |_| EVENT_LINES,
        );
        let (label, more) = header_titles(label, plain_label, fit, area.width);
        if !label.is_empty() {
            block = block.title_top(Line::styled(label, label_style));
        }
        if let Some(more) = more {
            block = block.title_top(Line::styled(more, MORE_STYLE).right_aligned());
        }
        block.render(area, buf);
        let lines = fit
            .visible(events)
            .iter()
            .map(|ev| self.event_line(ev, text_style))
            .collect::<Vec<_>>();
        Paragraph::new(lines).render(inner, buf);
    }

    fn event_line(&self, ev: &Event, style: Style) -> Line<'static> {
        let mut spans = vec![Span::styled("●", event_dot_style(ev.color)), Span::raw(" ")];
        if let Some(t) = ev.start_time() {
            spans.push(Span::styled(
                format!("{} ", self.format.time_of_day(t)),
                style,
            ));
        }
        spans.push(Span::styled(ev.name.clone(), style));
        Line::from(spans)
    }
}

/// Pick the day label and hidden-count titles for a cell header `width`
/// columns wide.  Both titles share one line, so they are shortened until
/// they fit side by side; the digits of the count are never cut off.
fn header_titles(
    label: String,
    plain_label: String,
    fit: Fit,
    width: u16,
) -> (String, Option<String>) {
    let Some(more) = fit.more_label() else {
        return (label, None);
    };
    let count = format!("+{}", fit.hidden);
    let room = usize::from(width);
    [
        (label.clone(), more),
        (label, count.clone()),
        (plain_label, count.clone()),
    ]
    .into_iter()
    .find(|(left, right)| left.len() + 1 + right.len() <= room)
    .map_or_else(
        || (String::new(), Some(count)),
        |(left, right)| (left, Some(right)),
    )
}

impl<F: DateFormat> StatefulWidget for Calendar<'_, F> {
    type State = MonthView;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let grid = state.grid().clone();
        let [title_area, header_area, weeks_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);
        Paragraph::new(Line::styled(
            self.format.month_year(state.selected()),
            MONTH_STYLE,
        ))
        .alignment(Alignment::Center)
        .render(title_area, buf);
        for (wd, &col) in zip(grid.week_start().weekdays(), Self::columns(header_area).iter()) {
            Paragraph::new(Line::styled(self.format.weekday_short(wd), WEEKDAY_STYLE))
                .render(col, buf);
        }
        let week_count = u32::try_from(grid.week_count()).unwrap_or(u32::MAX);
        let rows = Layout::vertical((0..week_count).map(|_| Constraint::Ratio(1, week_count)))
            .split(weeks_area);
        let bins = bin_by_day(self.store.list(), grid.days());
        for (week, &row) in zip(grid.weeks(), rows.iter()) {
            for (&date, &cell) in zip(week, Self::columns(row).iter()) {
                let events = bins.get(&date).map_or(&[][..], Vec::as_slice);
                self.render_day(date, events, cell, buf, state);
            }
        }
    }
}
