use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::evaluator::LetterStatus;
use crate::game::{GameSession, SecretWord};
use crate::session::SessionStatus;

const EMPTY_TILE: char = '·';

/// Tile colors: green in place, yellow elsewhere, gray absent
pub fn status_style(status: LetterStatus) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match status {
        LetterStatus::Correct => bold.fg(Color::Black).bg(Color::Green),
        LetterStatus::Present => bold.fg(Color::Black).bg(Color::Yellow),
        LetterStatus::Absent => bold.fg(Color::White).bg(Color::DarkGray),
    }
}

fn tile(c: Option<char>, style: Style) -> Span<'static> {
    let shown = c
        .map(|c| c.to_uppercase().collect::<String>())
        .unwrap_or_else(|| EMPTY_TILE.to_string());
    Span::styled(format!(" {shown} "), style)
}

fn row(tiles: Vec<Span<'static>>) -> Line<'static> {
    let mut spans = Vec::with_capacity(tiles.len() * 2);
    for (idx, t) in tiles.into_iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(t);
    }
    Line::from(spans)
}

/// One line per allowed attempt: scored guesses, then the row being typed,
/// then empty rows.
pub fn board_lines(session: &GameSession) -> Vec<Line<'static>> {
    let width = session.secret().map_or(0, SecretWord::len);
    let attempts = session.attempts();
    let typing = session.status() == SessionStatus::Playing;
    let dim = Style::default().add_modifier(Modifier::DIM);
    let pending = Style::default()
        .add_modifier(Modifier::BOLD)
        .add_modifier(Modifier::UNDERLINED);

    (0..session.config().max_attempts)
        .map(|idx| {
            if let Some(attempt) = attempts.get(idx) {
                row(attempt
                    .guess()
                    .chars()
                    .zip(attempt.statuses())
                    .map(|(c, s)| tile(Some(c), status_style(*s)))
                    .collect())
            } else if typing && idx == attempts.len() {
                let mut typed = session.guess_input().chars();
                row((0..width).map(|_| match typed.next() {
                    Some(c) => tile(Some(c), pending),
                    None => tile(None, dim),
                })
                .collect())
            } else {
                row((0..width).map(|_| tile(None, dim)).collect())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionConfig;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn empty_board_before_the_word_loads() {
        let session = GameSession::new(SessionConfig::default());
        let lines = board_lines(&session);
        assert_eq!(lines.len(), 6);
        assert!(lines.iter().all(|l| text(l).is_empty()));
    }

    #[test]
    fn scored_rows_then_typing_row() {
        let mut session = GameSession::new(SessionConfig::default());
        session.word_loaded("termo").unwrap();
        session.start().unwrap();
        session.set_guess_input("metro");
        session.submit_guess().unwrap();
        session.set_guess_input("te");

        let lines = board_lines(&session);
        assert_eq!(text(&lines[0]), " M   E   T   R   O ");
        assert_eq!(text(&lines[1]), " T   E   ·   ·   · ");
        assert_eq!(text(&lines[2]), " ·   ·   ·   ·   · ");
        assert_eq!(lines[0].spans[2].style, status_style(LetterStatus::Correct));
    }
}
