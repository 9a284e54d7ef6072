pub mod board;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        screen::current_screen(self.session().status()).render(self, area, buf);
    }
}

fn title() -> Paragraph<'static> {
    Paragraph::new(Span::styled(
        "TERMO",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
}

fn message(text: &str) -> Paragraph<'_> {
    Paragraph::new(Span::styled(
        text,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
}

fn legend(text: &str) -> Paragraph<'_> {
    Paragraph::new(Span::styled(
        text,
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
}

/// Lines a wrapped message needs inside the margins.
fn message_height(text: &str, area_width: u16) -> u16 {
    let max_chars_per_line = area_width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    if text.is_empty() {
        return 1;
    }
    (text.width() as f64 / max_chars_per_line as f64).ceil() as u16
}
