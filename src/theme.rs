use crate::event::EventColor;
use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const MONTH_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const STATUS_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub(crate) mod calendar {
    use super::*;

    pub(crate) const DAY_STYLE: Style = BASE_STYLE;

    /// Leading and trailing days belonging to the adjacent months
    pub(crate) const OTHER_MONTH_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    /// In-month days that are already over
    pub(crate) const PAST_DAY_STYLE: Style = BASE_STYLE.fg(Color::Gray);

    pub(crate) const TODAY_STYLE: Style =
        BASE_STYLE.fg(Color::LightYellow).add_modifier(Modifier::BOLD);

    pub(crate) const BORDER_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const SELECTED_BORDER_STYLE: Style =
        BASE_STYLE.fg(Color::LightCyan).add_modifier(Modifier::BOLD);

    pub(crate) const MORE_STYLE: Style =
        BASE_STYLE.fg(Color::Gray).add_modifier(Modifier::ITALIC);
}

pub(crate) mod form {
    use super::*;

    pub(crate) const FOCUS_STYLE: Style =
        BASE_STYLE.add_modifier(Modifier::BOLD.union(Modifier::UNDERLINED));

    pub(crate) const UNFILLED_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const CURSOR_STYLE: Style = BASE_STYLE.add_modifier(Modifier::SLOW_BLINK);

    pub(crate) const HINT_STYLE: Style = BASE_STYLE.fg(Color::Gray);
}

pub(crate) mod help {
    use super::*;

    pub(crate) const KEY_STYLE: Style = BASE_STYLE.fg(Color::LightCyan);

    pub(crate) const ACTION_STYLE: Style = BASE_STYLE;
}

pub(crate) mod daylist {
    use super::*;

    pub(crate) const HIGHLIGHT_STYLE: Style = BASE_STYLE.add_modifier(Modifier::REVERSED);

    pub(crate) const TASK_TYPE_STYLE: Style = BASE_STYLE.fg(Color::Gray);
}

pub(crate) fn event_color(color: EventColor) -> Color {
    match color {
        EventColor::Blue => Color::LightBlue,
        EventColor::Red => Color::LightRed,
        EventColor::Green => Color::LightGreen,
    }
}

/// Style for the colored dot marking an event
pub(crate) fn event_dot_style(color: EventColor) -> Style {
    BASE_STYLE.fg(event_color(color))
}
