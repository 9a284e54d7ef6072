use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::{app::App, session::SessionStatus};

use super::{board::board_lines, message_height, HORIZONTAL_MARGIN, VERTICAL_MARGIN};

fn board_height(board: &[Line<'_>]) -> u16 {
    u16::try_from(board.len()).unwrap_or(u16::MAX).saturating_add(1)
}

/// A UI Screen boundary: one per session status
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

pub struct WaitingScreen;

impl Screen for WaitingScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let session = app.session();
        let (status_line, legend) = if session.secret().is_some() {
            (
                "A palavra do dia foi carregada.",
                "(enter) estou pronto! / (esc) sair",
            )
        } else if app.is_fetching() {
            ("Carregando a palavra do dia...", "(esc) sair")
        } else {
            (
                "A palavra do dia não está disponível.",
                "(r) tentar novamente / (esc) sair",
            )
        };
        let message = session.message().unwrap_or_default();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(message_height(message, area.width)),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        super::title().render(chunks[0], buf);
        Paragraph::new(status_line)
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
        super::message(message).render(chunks[2], buf);
        super::legend(legend).render(chunks[4], buf);
    }
}

pub struct PlayingScreen;

impl Screen for PlayingScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let session = app.session();
        let board = board_lines(session);
        let message = session.message().unwrap_or_default();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(board_height(&board)),
                Constraint::Length(2),
                Constraint::Length(message_height(message, area.width)),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        super::title().render(chunks[0], buf);
        Paragraph::new(board)
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let stats = format!(
            "Tempo: {}s   Tentativas: {}/{}",
            session.elapsed_secs(),
            session.attempts().len(),
            session.config().max_attempts
        );
        Paragraph::new(Span::styled(
            stats,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

        super::message(message).render(chunks[3], buf);
        super::legend("(enter) enviar / (backspace) apagar / (esc) sair").render(chunks[5], buf);
    }
}

pub struct FinishedScreen;

impl Screen for FinishedScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let session = app.session();
        let board = board_lines(session);
        let message = session.message().unwrap_or_default();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(board_height(&board)),
                Constraint::Length(message_height(message, area.width).saturating_add(1)),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        super::title().render(chunks[0], buf);
        Paragraph::new(board)
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
        super::message(message).render(chunks[2], buf);

        let legend = if session.is_won() {
            let bold = Style::default().add_modifier(Modifier::BOLD);
            let cursor = if session.is_submitting() { "" } else { "_" };
            Paragraph::new(Line::from(vec![
                Span::raw("Nome: "),
                Span::styled(format!("{}{cursor}", session.name_input()), bold),
                Span::styled(
                    format!("   ({} tentativas, {}s)", session.attempts().len(), session.elapsed_secs()),
                    Style::default().add_modifier(Modifier::DIM),
                ),
            ]))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

            if session.is_submitting() {
                "enviando... / (esc) sair"
            } else {
                "(enter) registrar / (tab) jogar novamente / (esc) sair"
            }
        } else {
            "(enter) jogar novamente / (esc) sair"
        };
        super::legend(legend).render(chunks[5], buf);
    }
}

/// Helper to construct the appropriate screen for the current status
pub fn current_screen(status: SessionStatus) -> Box<dyn Screen> {
    match status {
        SessionStatus::Waiting => Box::new(WaitingScreen),
        SessionStatus::Playing => Box::new(PlayingScreen),
        SessionStatus::Finished => Box::new(FinishedScreen),
    }
}
