use crate::evaluator::{DuplicateRule, LetterStatus};

pub const DEFAULT_MAX_ATTEMPTS: usize = 6;
/// Upper bound on guesses per game; the board has one row per guess.
pub const MAX_ATTEMPTS_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub max_attempts: usize,
    pub duplicate_rule: DuplicateRule,
}

impl SessionConfig {
    /// Keeps `max_attempts` within `1..=MAX_ATTEMPTS_LIMIT`.
    pub fn clamped(self) -> Self {
        Self {
            max_attempts: self.max_attempts.clamp(1, MAX_ATTEMPTS_LIMIT),
            ..self
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            duplicate_rule: DuplicateRule::Simplified,
        }
    }
}

/// Lifecycle of a single play-through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum SessionStatus {
    #[default]
    Waiting,
    Playing,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

/// One submitted guess and its per-letter feedback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    guess: String,
    statuses: Vec<LetterStatus>,
}

impl Attempt {
    pub fn new(guess: String, statuses: Vec<LetterStatus>) -> Self {
        Self { guess, statuses }
    }

    pub fn guess(&self) -> &str {
        &self.guess
    }

    pub fn statuses(&self) -> &[LetterStatus] {
        &self.statuses
    }

    pub fn is_solved(&self) -> bool {
        self.statuses.iter().all(|s| *s == LetterStatus::Correct)
    }
}
