use crate::event::{Event, EventColor, EventDraft, EventId, StartTime, TaskType};
use crate::format::DateFormat;
use crate::theme::{
    event_dot_style,
    form::{CURSOR_STYLE, FOCUS_STYLE, HINT_STYLE, UNFILLED_STYLE},
    BASE_STYLE,
};
use log::debug;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph, StatefulWidget, Widget},
};
use time::Date;

const OUTER_WIDTH: u16 = 60;
const OUTER_HEIGHT: u16 = 12;

/// Width of the column of field labels
const LABEL_WIDTH: usize = 14;

/// "HH:MM"
const MAX_START_TIME_LEN: usize = 5;

/// Request to create an event on a given day
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct NewEventRequest {
    pub(crate) date: Date,
}

/// Request to edit (or delete) an existing event
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct EditEventRequest {
    pub(crate) event: Event,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum FormMode {
    New(NewEventRequest),
    Edit(EditEventRequest),
}

impl FormMode {
    /// The day the submitted event will be on.  Editing never moves an event
    /// to another day.
    pub(crate) fn date(&self) -> Date {
        match self {
            FormMode::New(req) => req.date,
            FormMode::Edit(req) => req.event.date,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Field {
    Name,
    Description,
    TaskType,
    StartTime,
    Color,
}

impl Field {
    const ALL: [Field; 5] = [
        Field::Name,
        Field::Description,
        Field::TaskType,
        Field::StartTime,
        Field::Color,
    ];

    fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Description => "Description",
            Field::TaskType => "Task type",
            Field::StartTime => "Start",
            Field::Color => "Color",
        }
    }

    fn next(self) -> Field {
        match self {
            Field::Name => Field::Description,
            Field::Description => Field::TaskType,
            Field::TaskType => Field::StartTime,
            Field::StartTime => Field::Color,
            Field::Color => Field::Name,
        }
    }

    fn previous(self) -> Field {
        match self {
            Field::Name => Field::Color,
            Field::Description => Field::Name,
            Field::TaskType => Field::Description,
            Field::StartTime => Field::TaskType,
            Field::Color => Field::StartTime,
        }
    }
}

/// Form state for creating or editing an event
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct EventForm {
    mode: FormMode,
    name: String,
    desc: String,
    start_time: String,
    color: EventColor,
    task_types: Vec<TaskType>,
    // Index into `task_types`
    task_type: usize,
    focus: Field,
}

impl EventForm {
    pub(crate) fn new(request: NewEventRequest, task_types: &[TaskType]) -> EventForm {
        EventForm {
            mode: FormMode::New(request),
            name: String::new(),
            desc: String::new(),
            start_time: String::new(),
            color: EventColor::PALETTE[0],
            task_types: task_types.to_vec(),
            task_type: 0,
            focus: Field::Name,
        }
    }

    pub(crate) fn edit(request: EditEventRequest, task_types: &[TaskType]) -> EventForm {
        let EventDraft {
            name,
            desc,
            start_time,
            color,
            task_type,
            ..
        } = request.event.to_draft();
        let mut task_types = task_types.to_vec();
        // An event may carry a task type that is no longer configured; keep
        // it selectable so that saving does not change it
        let task_type = match task_types.iter().position(|tt| tt == &task_type) {
            Some(i) => i,
            None => {
                task_types.push(task_type);
                task_types.len() - 1
            }
        };
        EventForm {
            mode: FormMode::Edit(request),
            name,
            desc,
            start_time,
            color,
            task_types,
            task_type,
            focus: Field::Name,
        }
    }

    pub(crate) fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub(crate) fn is_new(&self) -> bool {
        matches!(self.mode, FormMode::New(_))
    }

    pub(crate) fn focus(&self) -> Field {
        self.focus
    }

    pub(crate) fn handle_input(&mut self, input: FormInput) -> FormOutput {
        match input {
            FormInput::NextField => {
                self.focus = self.focus.next();
                FormOutput::Ok
            }
            FormInput::PreviousField => {
                self.focus = self.focus.previous();
                FormOutput::Ok
            }
            FormInput::Char(ch) => self.insert(ch),
            FormInput::Backspace => match self.text_mut().and_then(String::pop) {
                Some(_) => FormOutput::Ok,
                None => FormOutput::Invalid,
            },
            FormInput::Left => self.cycle(false),
            FormInput::Right => self.cycle(true),
            FormInput::Submit => self.submit(),
            FormInput::Delete => match &self.mode {
                FormMode::Edit(req) => FormOutput::Delete(req.event.id),
                FormMode::New(_) => FormOutput::Invalid,
            },
            FormInput::Cancel => FormOutput::Cancel,
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::Name => Some(&mut self.name),
            Field::Description => Some(&mut self.desc),
            Field::StartTime => Some(&mut self.start_time),
            Field::TaskType | Field::Color => None,
        }
    }

    fn insert(&mut self, ch: char) -> FormOutput {
        if ch.is_control() {
            return FormOutput::Invalid;
        }
        let is_start_time = self.focus == Field::StartTime;
        let Some(text) = self.text_mut() else {
            return FormOutput::Invalid;
        };
        if is_start_time
            && (!(ch.is_ascii_digit() || ch == ':') || text.len() >= MAX_START_TIME_LEN)
        {
            return FormOutput::Invalid;
        }
        text.push(ch);
        FormOutput::Ok
    }

    fn cycle(&mut self, forwards: bool) -> FormOutput {
        match self.focus {
            Field::Color => {
                self.color = if forwards {
                    self.color.next()
                } else {
                    self.color.previous()
                };
                FormOutput::Ok
            }
            Field::TaskType if !self.task_types.is_empty() => {
                let qty = self.task_types.len();
                self.task_type = if forwards {
                    (self.task_type + 1) % qty
                } else {
                    (self.task_type + qty - 1) % qty
                };
                FormOutput::Ok
            }
            _ => FormOutput::Invalid,
        }
    }

    fn task_type(&self) -> TaskType {
        self.task_types
            .get(self.task_type)
            .cloned()
            .unwrap_or_default()
    }

    fn submit(&self) -> FormOutput {
        let name = self.name.trim();
        if name.is_empty() {
            debug!("Event form submitted without a name");
            return FormOutput::Invalid;
        }
        let start_time = match self.start_time.trim() {
            "" => String::new(),
            s => match s.parse::<StartTime>() {
                Ok(t) => t.to_string(),
                Err(e) => {
                    debug!("Event form submitted with bad start time {s:?}: {e}");
                    return FormOutput::Invalid;
                }
            },
        };
        let draft = EventDraft {
            name: name.to_owned(),
            desc: self.desc.trim().to_owned(),
            date: self.mode.date(),
            start_time,
            color: self.color,
            task_type: self.task_type(),
        };
        match &self.mode {
            FormMode::New(_) => FormOutput::Create(draft),
            FormMode::Edit(req) => FormOutput::Update(req.event.id, draft),
        }
    }

    fn to_text(&self) -> Text<'static> {
        let mut lines = vec![Line::default()];
        for field in Field::ALL {
            let focused = field == self.focus();
            let mut spans = vec![Span::styled(
                format!("{:<LABEL_WIDTH$}", field.label()),
                if focused { FOCUS_STYLE } else { BASE_STYLE },
            )];
            match field {
                Field::Name => spans.extend(text_spans(&self.name, "", focused)),
                Field::Description => spans.extend(text_spans(&self.desc, "", focused)),
                Field::StartTime => spans.extend(text_spans(&self.start_time, "HH:MM", focused)),
                Field::TaskType => {
                    let label = self.task_type().to_string();
                    if focused {
                        spans.push(Span::styled(format!("< {label} >"), BASE_STYLE));
                    } else {
                        spans.push(Span::styled(format!("  {label}"), BASE_STYLE));
                    }
                }
                Field::Color => {
                    for color in EventColor::PALETTE {
                        let dot = if color == self.color { "●" } else { "○" };
                        spans.push(Span::styled(dot, event_dot_style(color)));
                        spans.push(Span::styled(format!(" {color}  "), BASE_STYLE));
                    }
                }
            }
            lines.push(Line::from(spans));
        }
        lines.push(Line::default());
        let mut hints = String::from("Enter: save  Tab: next field  Esc: cancel");
        if !self.is_new() {
            hints.push_str("  ^D: delete");
        }
        lines.push(Line::styled(hints, HINT_STYLE));
        Text::from(lines)
    }
}

fn text_spans(value: &str, placeholder: &'static str, focused: bool) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(2);
    if value.is_empty() && !focused {
        spans.push(Span::styled(placeholder, UNFILLED_STYLE));
    } else {
        spans.push(Span::styled(value.to_owned(), BASE_STYLE));
    }
    if focused {
        spans.push(Span::styled("_", CURSOR_STYLE));
    }
    spans
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum FormInput {
    Char(char),
    Backspace,
    NextField,
    PreviousField,
    Left,
    Right,
    Submit,
    Delete,
    Cancel,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum FormOutput {
    Ok,
    Invalid,
    Create(EventDraft),
    Update(EventId, EventDraft),
    Delete(EventId),
    Cancel,
}

/// Modal dialog displaying an [`EventForm`]
#[derive(Debug)]
pub(crate) struct EventFormModal<'a, F> {
    format: &'a F,
}

impl<'a, F> EventFormModal<'a, F> {
    pub(crate) fn new(format: &'a F) -> Self {
        EventFormModal { format }
    }
}

impl<F: DateFormat> StatefulWidget for EventFormModal<'_, F> {
    type State = EventForm;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [outer_area] = Layout::horizontal([OUTER_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([OUTER_HEIGHT])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        let title = format!(
            " {} · {} ",
            if state.is_new() { "New event" } else { "Edit event" },
            self.format.short_date(state.mode().date())
        );
        let block = Block::bordered()
            .title(title)
            .title_alignment(Alignment::Center)
            .style(BASE_STYLE);
        let text_area = block.inner(block_area).inner(Margin::new(1, 0));
        block.render(block_area, buf);
        Paragraph::new(state.to_text()).render(text_area, buf);
    }
}
