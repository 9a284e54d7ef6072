use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, info, warn};

use crate::client::TermoApi;
use crate::game::GameSession;
use crate::runtime::{EventSender, GameEvent};
use crate::session::{SessionConfig, SessionStatus};
use crate::timer::SecondTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Binds input and network completions to the game session.
///
/// Owns the session and the play timer. Network calls run as tasks and
/// report back through the event channel, so every mutation happens in
/// `handle_event`.
pub struct App {
    session: GameSession,
    api: Arc<dyn TermoApi>,
    events: EventSender,
    timer: SecondTimer,
    fetching: bool,
}

impl App {
    pub fn new(config: SessionConfig, api: Arc<dyn TermoApi>, events: EventSender) -> Self {
        Self {
            session: GameSession::new(config),
            api,
            events,
            timer: SecondTimer::new(),
            fetching: false,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Requests the word of the day in the background.
    pub fn fetch_word(&mut self) {
        if self.fetching {
            return;
        }
        self.fetching = true;
        info!("fetching word of the day");

        let api = Arc::clone(&self.api);
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = api.fetch_word().await;
            let _ = tx.send(GameEvent::WordFetched(result));
        });
    }

    pub fn handle_event(&mut self, event: GameEvent) -> Flow {
        match event {
            GameEvent::Key(key) => return self.on_key(key),
            GameEvent::Resize => {}
            GameEvent::Tick { epoch } => {
                if self.timer.is_current(epoch) {
                    self.session.tick();
                } else {
                    debug!(epoch, "stale tick dropped");
                }
            }
            GameEvent::WordFetched(result) => {
                self.fetching = false;
                match result {
                    Ok(word) => {
                        let _ = self.session.word_loaded(&word);
                    }
                    Err(e) => {
                        warn!(error = %e, "word fetch failed");
                        self.session.word_failed(&e);
                    }
                }
            }
            GameEvent::ResultSubmitted(result) => match result {
                Ok(ack) => {
                    info!(%ack, "result acknowledged");
                    self.session.submission_succeeded();
                }
                Err(e) => {
                    warn!(error = %e, "result submission failed");
                    self.session.submission_failed(&e);
                }
            },
        }
        self.sync_timer();
        Flow::Continue
    }

    fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.kind == KeyEventKind::Release {
            return Flow::Continue;
        }
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return Flow::Quit;
        }

        match self.session.status() {
            SessionStatus::Waiting => match key.code {
                KeyCode::Enter => self.start_game(),
                KeyCode::Char('r') | KeyCode::Char('R') if self.session.secret().is_none() => {
                    self.fetch_word()
                }
                _ => {}
            },
            SessionStatus::Playing => match key.code {
                KeyCode::Enter => {
                    let _ = self.session.submit_guess();
                }
                KeyCode::Backspace => self.session.pop_char(),
                KeyCode::Char(c) => self.session.push_char(c),
                _ => {}
            },
            SessionStatus::Finished if self.session.is_won() => match key.code {
                KeyCode::Enter => self.submit_result(),
                KeyCode::Tab => {
                    let _ = self.session.restart();
                }
                KeyCode::Backspace => self.session.pop_char(),
                KeyCode::Char(c) => self.session.push_char(c),
                _ => {}
            },
            SessionStatus::Finished => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R')) {
                    let _ = self.session.restart();
                }
            }
        }

        self.sync_timer();
        Flow::Continue
    }

    fn start_game(&mut self) {
        if self.session.start().is_ok() {
            self.timer.start(self.events.clone());
        }
    }

    fn submit_result(&mut self) {
        let Ok(record) = self.session.begin_submission() else {
            return;
        };
        info!(attempts = record.attempts, elapsed_secs = record.elapsed_secs, "submitting result");

        let api = Arc::clone(&self.api);
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = api.submit_result(&record).await;
            let _ = tx.send(GameEvent::ResultSubmitted(result));
        });
    }

    // The timer lives exactly as long as the Playing state.
    fn sync_timer(&mut self) {
        if self.session.status() != SessionStatus::Playing && self.timer.is_running() {
            self.timer.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ResultRecord;
    use crate::error::ApiError;
    use crate::runtime::Runner;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeApi {
        word: Result<String, ApiError>,
        ack: Result<String, ApiError>,
        submitted: Mutex<Vec<ResultRecord>>,
    }

    impl FakeApi {
        fn new(word: &str) -> Self {
            Self {
                word: Ok(word.to_string()),
                ack: Ok("ok".to_string()),
                submitted: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl TermoApi for FakeApi {
        async fn fetch_word(&self) -> Result<String, ApiError> {
            self.word.clone()
        }

        async fn submit_result(&self, record: &ResultRecord) -> Result<String, ApiError> {
            self.submitted.lock().unwrap().push(record.clone());
            self.ack.clone()
        }
    }

    fn key(code: KeyCode) -> GameEvent {
        GameEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_event(key(KeyCode::Char(c)));
        }
    }

    async fn loaded_app(api: Arc<FakeApi>) -> (App, Runner) {
        let mut runner = Runner::new();
        let mut app = App::new(SessionConfig::default(), api, runner.sender());
        app.fetch_word();
        assert!(app.is_fetching());
        let event = runner.step().await.unwrap();
        app.handle_event(event);
        (app, runner)
    }

    #[tokio::test]
    async fn word_fetch_loads_secret() {
        let (app, _runner) = loaded_app(Arc::new(FakeApi::new("TERMO"))).await;
        assert!(!app.is_fetching());
        assert_eq!(app.session().secret().unwrap().as_str(), "termo");
        assert_eq!(app.session().status(), SessionStatus::Waiting);
    }

    #[tokio::test]
    async fn failed_fetch_can_be_retried_with_r() {
        let api = Arc::new(FakeApi {
            word: Err(ApiError::Transport {
                message: "refused".into(),
            }),
            ..FakeApi::new("")
        });
        let (mut app, mut runner) = loaded_app(api).await;
        assert_eq!(app.session().message(), Some("Erro ao carregar palavra"));

        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.session().status(), SessionStatus::Waiting);
        assert!(!app.timer_running());

        app.handle_event(key(KeyCode::Char('r')));
        assert!(app.is_fetching());
        let event = runner.step().await.unwrap();
        assert!(matches!(event, GameEvent::WordFetched(Err(_))));
    }

    #[tokio::test]
    async fn enter_starts_the_game_and_timer() {
        let (mut app, _runner) = loaded_app(Arc::new(FakeApi::new("termo"))).await;
        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.session().status(), SessionStatus::Playing);
        assert!(app.timer_running());
    }

    #[tokio::test]
    async fn winning_stops_the_timer_and_submits() {
        let api = Arc::new(FakeApi::new("termo"));
        let (mut app, mut runner) = loaded_app(Arc::clone(&api)).await;
        app.handle_event(key(KeyCode::Enter));

        type_text(&mut app, "termo");
        app.handle_event(key(KeyCode::Enter));
        assert!(app.session().is_won());
        assert!(!app.timer_running());

        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.session().message(), Some("Por favor, digite seu nome."));

        type_text(&mut app, "Ana");
        app.handle_event(key(KeyCode::Enter));
        assert!(app.session().is_submitting());

        let event = runner.step().await.unwrap();
        app.handle_event(event);
        assert_eq!(app.session().status(), SessionStatus::Waiting);
        assert_eq!(
            api.submitted.lock().unwrap().as_slice(),
            &[ResultRecord {
                name: "Ana".into(),
                attempts: 1,
                elapsed_secs: 0,
            }]
        );
    }

    #[tokio::test]
    async fn rejected_submission_keeps_finished() {
        let api = Arc::new(FakeApi {
            ack: Err(ApiError::Service {
                message: "Nome inválido".into(),
            }),
            ..FakeApi::new("termo")
        });
        let (mut app, mut runner) = loaded_app(api).await;
        app.handle_event(key(KeyCode::Enter));
        type_text(&mut app, "termo");
        app.handle_event(key(KeyCode::Enter));
        type_text(&mut app, "x");
        app.handle_event(key(KeyCode::Enter));

        let event = runner.step().await.unwrap();
        app.handle_event(event);
        assert!(app.session().is_won());
        assert_eq!(app.session().message(), Some("Nome inválido"));
    }

    #[tokio::test]
    async fn stale_ticks_are_ignored() {
        let (mut app, _runner) = loaded_app(Arc::new(FakeApi::new("termo"))).await;
        app.handle_event(key(KeyCode::Enter));
        let current = app.timer.epoch();

        app.handle_event(GameEvent::Tick { epoch: current });
        app.handle_event(GameEvent::Tick { epoch: current + 1 });
        app.handle_event(GameEvent::Tick {
            epoch: current.wrapping_sub(1),
        });
        assert_eq!(app.session().elapsed_secs(), 1);
    }

    #[tokio::test]
    async fn loss_then_restart_returns_to_waiting() {
        let (mut app, _runner) = loaded_app(Arc::new(FakeApi::new("termo"))).await;
        app.handle_event(key(KeyCode::Enter));
        for _ in 0..6 {
            type_text(&mut app, "metro");
            app.handle_event(key(KeyCode::Enter));
        }
        assert!(app.session().is_lost());
        assert!(!app.timer_running());

        // typing after a loss goes nowhere
        type_text(&mut app, "abc");
        assert_eq!(app.session().name_input(), "");

        app.handle_event(key(KeyCode::Char('r')));
        assert_eq!(app.session().status(), SessionStatus::Waiting);

        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.session().status(), SessionStatus::Playing);
        assert!(app.session().attempts().is_empty());
    }

    #[tokio::test]
    async fn tab_after_win_plays_again_without_submitting() {
        let api = Arc::new(FakeApi::new("termo"));
        let (mut app, _runner) = loaded_app(api.clone()).await;
        app.handle_event(key(KeyCode::Enter));
        type_text(&mut app, "termo");
        app.handle_event(key(KeyCode::Enter));
        assert!(app.session().is_won());

        // 'r' is part of a name, not a restart
        type_text(&mut app, "Rui");
        assert_eq!(app.session().name_input(), "Rui");

        app.handle_event(key(KeyCode::Tab));
        assert_eq!(app.session().status(), SessionStatus::Waiting);
        assert_eq!(app.session().name_input(), "");

        tokio::task::yield_now().await;
        assert!(api.submitted.lock().unwrap().is_empty());

        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.session().status(), SessionStatus::Playing);
        assert!(app.timer_running());
    }

    #[tokio::test]
    async fn escape_and_ctrl_c_quit() {
        let (mut app, _runner) = loaded_app(Arc::new(FakeApi::new("termo"))).await;
        assert_eq!(app.handle_event(key(KeyCode::Esc)), Flow::Quit);
        assert_eq!(
            app.handle_event(GameEvent::Key(KeyEvent::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL
            ))),
            Flow::Quit
        );
        assert_eq!(app.handle_event(GameEvent::Resize), Flow::Continue);
    }
}
