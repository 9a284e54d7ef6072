use crossterm::event::{self, Event as CtEvent, KeyEvent};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::error::ApiError;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum GameEvent {
    Key(KeyEvent),
    Resize,
    /// One second of play time from the timer started at `epoch`
    Tick { epoch: u64 },
    WordFetched(Result<String, ApiError>),
    ResultSubmitted(Result<String, ApiError>),
}

pub type EventSender = UnboundedSender<GameEvent>;

/// Forwards terminal input into the event channel from a dedicated thread.
///
/// crossterm's `read` blocks, so it stays off the async runtime.
pub fn spawn_terminal_reader(tx: EventSender) {
    std::thread::spawn(move || loop {
        let event = match event::read() {
            Ok(CtEvent::Key(key)) => GameEvent::Key(key),
            Ok(CtEvent::Resize(_, _)) => GameEvent::Resize,
            Ok(_) => continue,
            Err(_) => break,
        };
        if tx.send(event).is_err() {
            break;
        }
    });
}

/// Single consumer of every event the game reacts to
pub struct Runner {
    tx: EventSender,
    rx: UnboundedReceiver<GameEvent>,
}

impl Runner {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// Handle for producers: terminal reader, timer, network tasks
    pub fn sender(&self) -> EventSender {
        self.tx.clone()
    }

    /// Waits for the next event.
    pub async fn step(&mut self) -> Option<GameEvent> {
        self.rx.recv().await
    }

    /// Returns an already queued event without waiting.
    pub fn try_step(&mut self) -> Option<GameEvent> {
        self.rx.try_recv().ok()
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}
