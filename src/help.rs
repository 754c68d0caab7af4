use crate::theme::help::{ACTION_STYLE, KEY_STYLE};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph, Widget},
};

/// Width of the column of keys, including the gap before the action
const KEY_COLUMN: usize = 16;

/// Keys accepted on the calendar and what they do
static KEYS: &[(&str, &str)] = &[
    ("h, j, k, l", "Move the selection by a day or a week"),
    ("ARROW KEYS", "Move the selection by a day or a week"),
    ("n, PAGE DOWN", "Next month"),
    ("p, PAGE UP", "Previous month"),
    ("0, t, HOME", "Jump to today"),
    ("a", "Add an event on the selected day"),
    ("ENTER", "Show all events on the selected day"),
    ("?", "Show this help"),
    ("q, ESC", "Quit"),
];

static DISMISS: &str = "Press any key to dismiss.";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help(pub(crate) Style);

impl Help {
    fn text() -> Text<'static> {
        let mut lines = KEYS
            .iter()
            .map(|&(keys, action)| {
                Line::from(vec![
                    Span::styled(keys, KEY_STYLE),
                    Span::raw(" ".repeat(KEY_COLUMN.saturating_sub(keys.len()))),
                    Span::styled(action, ACTION_STYLE),
                ])
            })
            .collect::<Vec<_>>();
        lines.push(Line::default());
        lines.push(Line::raw(DISMISS));
        Text::from(lines)
    }
}

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = Self::text();
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .min(area.height)
            .saturating_add(2);
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .min(area.width)
            .saturating_add(2);
        let para = Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Keys ")
                    .title_alignment(Alignment::Center),
            )
            .style(self.0);
        let [help_area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [help_area] = Layout::vertical([height])
            .flex(Flex::Center)
            .areas(help_area);
        let outer_area = Rect {
            x: help_area.x.saturating_sub(1),
            y: help_area.y,
            width: help_area.width.saturating_add(2),
            height: help_area.height,
        };
        Clear.render(outer_area, buf);
        Block::new().style(self.0).render(outer_area, buf);
        para.render(help_area, buf);
    }
}
