use crate::binning::events_on;
use crate::calendar::{Calendar, MonthView};
use crate::daylist::{DayList, DayListState};
use crate::event::{Event, TaskType};
use crate::form::{
    EditEventRequest, EventForm, EventFormModal, FormInput, FormOutput, NewEventRequest,
};
use crate::format::DateFormat;
use crate::help::Help;
use crate::store::{EventStore, StoreChange, SubscriptionId};
use crate::theme::{BASE_STYLE, STATUS_STYLE};
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use log::{debug, warn};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Paragraph, StatefulWidget, Widget},
    DefaultTerminal,
};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

const STATUS_HINT: &str = "a: add  Enter: show day  ?: help  q: quit";

#[derive(Debug)]
pub(crate) struct App<F> {
    view: MonthView,
    store: EventStore,
    format: F,
    task_types: Vec<TaskType>,
    state: AppState,
    // Written by the store subscription until the next key press
    status: Rc<RefCell<Option<String>>>,
    status_listener: SubscriptionId,
}

impl<F: DateFormat> App<F> {
    pub(crate) fn new(view: MonthView, format: F, task_types: Vec<TaskType>) -> App<F> {
        let status = Rc::new(RefCell::new(None));
        let mut store = EventStore::new();
        let sink = Rc::clone(&status);
        let status_listener =
            store.subscribe(Box::new(move |change: &StoreChange, events: &[Event]| {
                *sink.borrow_mut() = Some(describe_change(change, events.len()));
            }));
        App {
            view,
            store,
            format,
            task_types,
            state: AppState::Calendar,
            status,
            status_listener,
        }
    }

    pub(crate) fn run(mut self, mut terminal: DefaultTerminal) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if let Some(key) = read()?.as_key_press_event() {
            if !self.handle_key_event(key) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the key was not valid in the current state
    fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        let KeyEvent {
            code, modifiers, ..
        } = key;
        *self.status.borrow_mut() = None;
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if modifiers == KeyModifiers::CONTROL {
            match code {
                KeyCode::Char('c') => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('d') if matches!(self.state, AppState::Form(_)) => {
                    self.handle_form_input(FormInput::Delete)
                }
                _ => false,
            }
        } else if normal_modifiers.contains(modifiers) {
            self.handle_key(code)
        } else {
            false
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.navigate(|v| v.move_days(-1)),
                KeyCode::Char('l') | KeyCode::Right => self.navigate(|v| v.move_days(1)),
                KeyCode::Char('k') | KeyCode::Up => self.navigate(|v| v.move_days(-7)),
                KeyCode::Char('j') | KeyCode::Down => self.navigate(|v| v.move_days(7)),
                KeyCode::Char('n') | KeyCode::PageDown => self.navigate(MonthView::next_month),
                KeyCode::Char('p') | KeyCode::PageUp => self.navigate(MonthView::previous_month),
                KeyCode::Char('0' | 't') | KeyCode::Home => {
                    self.navigate(MonthView::jump_to_today)
                }
                KeyCode::Char('a') => {
                    self.open_new_form();
                    true
                }
                KeyCode::Enter => {
                    self.state = AppState::DayList(DayListState::new(self.view.selected()));
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::DayList(list) => match key {
                KeyCode::Char('k') | KeyCode::Up => list.select_previous(),
                KeyCode::Char('j') | KeyCode::Down => {
                    let len = events_on(self.store.list(), list.date()).len();
                    list.select_next(len)
                }
                KeyCode::Enter => match list.selected_event(&self.store) {
                    Some(ev) => {
                        let form = EventForm::edit(
                            EditEventRequest { event: ev.clone() },
                            &self.task_types,
                        );
                        self.state = AppState::Form(form);
                        true
                    }
                    None => false,
                },
                KeyCode::Char('a') => {
                    self.open_new_form();
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Calendar;
                    true
                }
                _ => false,
            },
            AppState::Form(_) => {
                let input = match key {
                    KeyCode::Tab | KeyCode::Down => FormInput::NextField,
                    KeyCode::BackTab | KeyCode::Up => FormInput::PreviousField,
                    KeyCode::Left => FormInput::Left,
                    KeyCode::Right => FormInput::Right,
                    KeyCode::Backspace => FormInput::Backspace,
                    KeyCode::Enter => FormInput::Submit,
                    KeyCode::Esc => FormInput::Cancel,
                    KeyCode::Char(ch) => FormInput::Char(ch),
                    _ => return false,
                };
                self.handle_form_input(input)
            }
            AppState::Quitting => false,
        }
    }

    fn handle_form_input(&mut self, input: FormInput) -> bool {
        let AppState::Form(form) = &mut self.state else {
            return false;
        };
        match form.handle_input(input) {
            FormOutput::Ok => true,
            FormOutput::Invalid => false,
            FormOutput::Create(draft) => {
                self.store.add(draft);
                self.state = AppState::Calendar;
                true
            }
            FormOutput::Update(id, draft) => {
                let r = self.store.update(id, draft);
                self.state = AppState::Calendar;
                match r {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("Could not save event: {e}");
                        *self.status.borrow_mut() = Some(format!("Could not save event: {e}"));
                        false
                    }
                }
            }
            FormOutput::Delete(id) => {
                self.store.delete(id);
                self.state = AppState::Calendar;
                true
            }
            FormOutput::Cancel => {
                self.state = AppState::Calendar;
                true
            }
        }
    }

    fn open_new_form(&mut self) {
        let date = match &self.state {
            AppState::DayList(list) => list.date(),
            _ => self.view.selected(),
        };
        self.state = AppState::Form(EventForm::new(NewEventRequest { date }, &self.task_types));
    }

    fn navigate<N, E>(&mut self, nav: N) -> bool
    where
        N: FnOnce(&mut MonthView) -> Result<(), E>,
        E: std::fmt::Display,
    {
        match nav(&mut self.view) {
            Ok(()) => true,
            Err(e) => {
                debug!("Navigation from {} failed: {e}", self.view.selected());
                false
            }
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        matches!(self.state, AppState::Quitting)
    }
}

impl<F: DateFormat> Widget for &mut App<F> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [main_area, status_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        Calendar::new(&self.store, &self.format).render(main_area, buf, &mut self.view);
        match &mut self.state {
            AppState::Helping => Help(BASE_STYLE).render(main_area, buf),
            AppState::DayList(list) => {
                DayList::new(&self.store, &self.format).render(main_area, buf, list);
            }
            AppState::Form(form) => EventFormModal::new(&self.format).render(main_area, buf, form),
            AppState::Calendar | AppState::Quitting => (),
        }
        let status = self
            .status
            .borrow()
            .clone()
            .unwrap_or_else(|| String::from(STATUS_HINT));
        Paragraph::new(Line::styled(status, STATUS_STYLE)).render(status_area, buf);
    }
}

impl<F> Drop for App<F> {
    fn drop(&mut self) {
        self.store.unsubscribe(self.status_listener);
    }
}

fn describe_change(change: &StoreChange, total: usize) -> String {
    let verb = match change {
        StoreChange::Added(_) => "Added",
        StoreChange::Updated(_) => "Updated",
        StoreChange::Deleted(_) => "Deleted",
    };
    let ev = change.event();
    format!(
        "{verb} {:?} on {} ({total} event{} in calendar)",
        ev.name,
        ev.date,
        if total == 1 { "" } else { "s" }
    )
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    DayList(DayListState),
    Form(EventForm),
    Quitting,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::WeekStart;
    use crate::event::{EventColor, EventDraft};
    use crate::format::PlainFormat;
    use time::macros::date;
    use time::Date;

    fn app() -> App<PlainFormat> {
        let view = MonthView::new(date!(2024 - 05 - 15), WeekStart::Sunday).unwrap();
        App::new(
            view,
            PlainFormat::default(),
            vec![
                TaskType::new("Write an email to a colleague"),
                TaskType::new("Update the database"),
            ],
        )
    }

    fn press(app: &mut App<PlainFormat>, code: KeyCode) -> bool {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut App<PlainFormat>, s: &str) {
        for ch in s.chars() {
            assert!(press(app, KeyCode::Char(ch)));
        }
    }

    fn draft(name: &str, date: Date, start_time: &str) -> EventDraft {
        EventDraft {
            name: name.into(),
            desc: String::new(),
            date,
            start_time: start_time.into(),
            color: EventColor::Red,
            task_type: TaskType::new("Update the database"),
        }
    }

    fn render(app: &mut App<PlainFormat>) -> Vec<String> {
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn test_navigation() {
        let mut app = app();
        assert!(press(&mut app, KeyCode::Right));
        assert_eq!(app.view.selected(), date!(2024 - 05 - 16));
        assert!(press(&mut app, KeyCode::Char('j')));
        assert_eq!(app.view.selected(), date!(2024 - 05 - 23));
        assert!(press(&mut app, KeyCode::PageDown));
        assert_eq!(app.view.selected(), date!(2024 - 06 - 23));
        assert_eq!(app.view.grid().month(), time::Month::June);
        assert!(press(&mut app, KeyCode::Char('p')));
        assert!(press(&mut app, KeyCode::Char('p')));
        assert_eq!(app.view.selected(), date!(2024 - 04 - 23));
        assert!(press(&mut app, KeyCode::Char('t')));
        assert_eq!(app.view.selected(), date!(2024 - 05 - 15));
        assert!(!press(&mut app, KeyCode::Char('x')));
        assert!(!app.handle_key_event(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::ALT)));
        assert_eq!(app.view.selected(), date!(2024 - 05 - 15));
    }

    #[test]
    fn test_help_and_quit() {
        let mut app = app();
        assert!(press(&mut app, KeyCode::Char('?')));
        assert_eq!(app.state, AppState::Helping);
        assert!(render(&mut app).iter().any(|r| r.contains(" Keys ")));
        assert!(press(&mut app, KeyCode::Char('x')));
        assert_eq!(app.state, AppState::Calendar);
        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(app.quitting());
    }

    #[test]
    fn test_ctrl_c_quits_anywhere() {
        let mut app = app();
        assert!(press(&mut app, KeyCode::Char('a')));
        assert!(app.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(app.quitting());
    }

    #[test]
    fn test_add_event() {
        let mut app = app();
        assert!(press(&mut app, KeyCode::Char('a')));
        type_str(&mut app, "Standup");
        for _ in 0..3 {
            assert!(press(&mut app, KeyCode::Tab));
        }
        type_str(&mut app, "9:00");
        assert!(press(&mut app, KeyCode::Enter));
        assert_eq!(app.state, AppState::Calendar);
        let events = app.store.list();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "Standup");
        assert_eq!(events[0].date, date!(2024 - 05 - 15));
        assert_eq!(events[0].start_time, "09:00");
        assert_eq!(
            events[0].task_type,
            TaskType::new("Write an email to a colleague")
        );
        let rows = render(&mut app);
        assert!(rows[23].starts_with("Added \"Standup\" on 2024-05-15 (1 event in calendar)"));
        assert!(rows.iter().any(|r| r.contains("● 09:00 S")));
    }

    #[test]
    fn test_invalid_submit_keeps_form_open() {
        let mut app = app();
        assert!(press(&mut app, KeyCode::Char('a')));
        assert!(!press(&mut app, KeyCode::Enter));
        assert!(matches!(app.state, AppState::Form(_)));
        assert!(app.store.list().is_empty());
        assert!(press(&mut app, KeyCode::Esc));
        assert_eq!(app.state, AppState::Calendar);
        assert!(app.store.list().is_empty());
        let rows = render(&mut app);
        assert!(rows[23].starts_with(STATUS_HINT));
    }

    #[test]
    fn test_day_list_edit_and_delete() {
        let mut app = app();
        app.store.add(draft("Lunch", date!(2024 - 05 - 15), "12:00"));
        let standup = app.store.add(draft("Standup", date!(2024 - 05 - 15), "09:00"));
        assert!(press(&mut app, KeyCode::Enter));
        assert!(matches!(app.state, AppState::DayList(_)));
        let rows = render(&mut app);
        assert!(rows.iter().any(|r| r.contains(" 2024-05-15 · 2 events ")));
        assert!(!press(&mut app, KeyCode::Up));
        assert!(press(&mut app, KeyCode::Enter));
        let AppState::Form(form) = &app.state else {
            panic!("edit form should be open");
        };
        assert!(!form.is_new());
        type_str(&mut app, "!");
        assert!(press(&mut app, KeyCode::Enter));
        assert_eq!(app.store.get(standup.id).unwrap().name, "Standup!");
        assert_eq!(app.store.list().len(), 2);

        assert!(press(&mut app, KeyCode::Enter));
        assert!(press(&mut app, KeyCode::Enter));
        assert!(app.handle_key_event(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL)));
        assert_eq!(app.state, AppState::Calendar);
        assert_eq!(app.store.get(standup.id), None);
        assert_eq!(app.store.list().len(), 1);
        assert!(render(&mut app)[23].starts_with("Deleted \"Standup!\""));
    }

    #[test]
    fn test_ctrl_d_in_new_form_is_invalid() {
        let mut app = app();
        assert!(press(&mut app, KeyCode::Char('a')));
        assert!(!app.handle_key_event(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL)));
        assert!(matches!(app.state, AppState::Form(_)));
    }

    #[test]
    fn test_add_from_day_list_uses_its_date() {
        let mut app = app();
        assert!(press(&mut app, KeyCode::Enter));
        assert!(!press(&mut app, KeyCode::Enter));
        assert!(press(&mut app, KeyCode::Char('a')));
        type_str(&mut app, "Errand");
        assert!(press(&mut app, KeyCode::Enter));
        assert_eq!(app.store.list()[0].date, date!(2024 - 05 - 15));
    }

    #[test]
    fn test_overflowing_day() {
        let mut app = app();
        for i in 0..12 {
            app.store.add(draft(&format!("E{i}"), date!(2024 - 05 - 08), ""));
        }
        let rows = render(&mut app);
        let shown = rows.iter().filter(|r| r.contains('●')).count();
        assert!(shown > 0);
        assert!(rows
            .iter()
            .any(|r| r.contains(&format!("+{} more", 12 - shown))));
        app.view.select(date!(2024 - 05 - 08)).unwrap();
        assert!(press(&mut app, KeyCode::Enter));
        let rows = render(&mut app);
        assert!(rows.iter().any(|r| r.contains(" 2024-05-08 · 12 events ")));
        for i in 0..12 {
            assert!(rows.iter().any(|r| r.contains(&format!("● all day E{i} "))));
        }
    }

    #[test]
    fn test_status_resets_on_next_key() {
        let mut app = app();
        assert!(press(&mut app, KeyCode::Char('a')));
        type_str(&mut app, "Standup");
        assert!(press(&mut app, KeyCode::Enter));
        assert!(render(&mut app)[23].starts_with("Added \"Standup\""));
        assert!(press(&mut app, KeyCode::Right));
        assert!(render(&mut app)[23].starts_with(STATUS_HINT));
    }

    #[test]
    fn test_drop_releases_status_listener() {
        let app = app();
        let status = Rc::downgrade(&app.status);
        assert_eq!(status.strong_count(), 2);
        drop(app);
        assert!(status.upgrade().is_none());
    }
}
