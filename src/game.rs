use tracing::{debug, info};

use crate::client::ResultRecord;
use crate::error::{ApiError, GameError};
use crate::evaluator::evaluate;
use crate::session::{Attempt, Outcome, SessionConfig, SessionStatus};

pub const MAX_NAME_LEN: usize = 32;

pub const WIN_MESSAGE: &str = "Você acertou! Digite seu nome para registrar.";
pub const WORD_LOAD_FAILED: &str = "Erro ao carregar palavra";
pub const RESULT_SAVED: &str = "Resultado salvo! Obrigado por jogar.";
pub const RESULT_SENDING: &str = "Enviando resultado...";
const SUBMIT_TRANSPORT_FAILED: &str = "Erro ao registrar resultado.";
const SUBMIT_REJECTED: &str = "Erro ao salvar resultado.";

/// The word of the day, lowercased and never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretWord(String);

impl SecretWord {
    pub fn new(raw: &str) -> Result<Self, GameError> {
        let word = raw.trim().to_lowercase();
        if word.is_empty() {
            return Err(GameError::EmptyWord);
        }
        Ok(Self(word))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// length in characters
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// represents one play-through from the waiting screen to a result
#[derive(Debug, Default)]
pub struct GameSession {
    config: SessionConfig,
    secret: Option<SecretWord>,
    status: SessionStatus,
    outcome: Option<Outcome>,
    attempts: Vec<Attempt>,
    elapsed_secs: u64,
    guess_input: String,
    name_input: String,
    message: Option<String>,
    submitting: bool,
}

impl GameSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config: config.clamped(),
            ..Default::default()
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn secret(&self) -> Option<&SecretWord> {
        self.secret.as_ref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn guess_input(&self) -> &str {
        &self.guess_input
    }

    pub fn name_input(&self) -> &str {
        &self.name_input
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_won(&self) -> bool {
        self.status == SessionStatus::Finished && self.outcome == Some(Outcome::Won)
    }

    pub fn is_lost(&self) -> bool {
        self.status == SessionStatus::Finished && self.outcome == Some(Outcome::Lost)
    }

    fn reject<T>(&mut self, err: GameError) -> Result<T, GameError> {
        debug!(error = %err, status = %self.status, "action rejected");
        self.message = Some(err.to_string());
        Err(err)
    }

    /// Accepts the word of the day. Ignored once a game is under way.
    pub fn word_loaded(&mut self, raw: &str) -> Result<(), GameError> {
        if self.status != SessionStatus::Waiting {
            debug!(status = %self.status, "word arrived outside of waiting, ignoring");
            return Ok(());
        }
        match SecretWord::new(raw) {
            Ok(word) => {
                info!(length = word.len(), "secret word ready");
                self.secret = Some(word);
                self.message = None;
                Ok(())
            }
            Err(err) => self.reject(err),
        }
    }

    pub fn word_failed(&mut self, err: &ApiError) {
        info!(error = %err, "word of the day unavailable");
        self.message = Some(WORD_LOAD_FAILED.to_string());
    }

    pub fn start(&mut self) -> Result<(), GameError> {
        if self.status != SessionStatus::Waiting {
            return self.reject(GameError::NotWaiting);
        }
        if self.secret.is_none() {
            return self.reject(GameError::WordUnavailable);
        }

        self.status = SessionStatus::Playing;
        self.outcome = None;
        self.attempts.clear();
        self.guess_input.clear();
        self.name_input.clear();
        self.message = None;
        self.elapsed_secs = 0;
        self.submitting = false;
        info!("game started");
        Ok(())
    }

    /// Adds a second of play time. No-op outside of `Playing`.
    pub fn tick(&mut self) {
        if self.status == SessionStatus::Playing {
            self.elapsed_secs += 1;
        }
    }

    /// Types into whichever field is active.
    pub fn push_char(&mut self, c: char) {
        match self.status {
            SessionStatus::Playing => {
                let limit = self.secret.as_ref().map_or(0, SecretWord::len);
                if c.is_alphabetic() && self.guess_input.chars().count() < limit {
                    self.guess_input.extend(c.to_lowercase());
                }
            }
            SessionStatus::Finished if self.is_won() && !self.submitting => {
                if !c.is_control() && self.name_input.chars().count() < MAX_NAME_LEN {
                    self.name_input.push(c);
                }
            }
            _ => {}
        }
    }

    pub fn pop_char(&mut self) {
        match self.status {
            SessionStatus::Playing => {
                self.guess_input.pop();
            }
            SessionStatus::Finished if self.is_won() && !self.submitting => {
                self.name_input.pop();
            }
            _ => {}
        }
    }

    pub fn set_guess_input(&mut self, guess: &str) {
        self.guess_input = guess.to_string();
    }

    pub fn set_name_input(&mut self, name: &str) {
        self.name_input = name.to_string();
    }

    /// Scores the current guess input.
    ///
    /// Returns the outcome when the guess ends the game.
    pub fn submit_guess(&mut self) -> Result<Option<Outcome>, GameError> {
        if self.status != SessionStatus::Playing {
            return self.reject(GameError::NotPlaying);
        }
        let Some(secret) = self.secret.clone() else {
            return self.reject(GameError::WordUnavailable);
        };

        let guess = self.guess_input.trim().to_lowercase();
        let statuses = match evaluate(secret.as_str(), &guess, self.config.duplicate_rule) {
            Ok(statuses) => statuses,
            Err(err) => return self.reject(err),
        };

        let attempt = Attempt::new(guess, statuses);
        let solved = attempt.is_solved();
        self.attempts.push(attempt);
        self.guess_input.clear();
        self.message = None;
        debug!(attempt = self.attempts.len(), solved, "guess recorded");

        if solved {
            self.finish(Outcome::Won, WIN_MESSAGE.to_string());
            Ok(Some(Outcome::Won))
        } else if self.attempts.len() >= self.config.max_attempts {
            let message = format!("Você perdeu! A palavra era \"{}\".", secret.as_str());
            self.finish(Outcome::Lost, message);
            Ok(Some(Outcome::Lost))
        } else {
            Ok(None)
        }
    }

    fn finish(&mut self, outcome: Outcome, message: String) {
        self.status = SessionStatus::Finished;
        self.outcome = Some(outcome);
        self.message = Some(message);
        info!(
            ?outcome,
            attempts = self.attempts.len(),
            elapsed_secs = self.elapsed_secs,
            "game finished"
        );
    }

    /// Validates the name and produces the record to post.
    ///
    /// Marks a submission as in flight until one of `submission_succeeded`
    /// or `submission_failed` is called.
    pub fn begin_submission(&mut self) -> Result<ResultRecord, GameError> {
        if !self.is_won() {
            return self.reject(GameError::NotWon);
        }
        if self.submitting {
            return self.reject(GameError::SubmissionPending);
        }
        let name = self.name_input.trim();
        if name.is_empty() {
            return self.reject(GameError::EmptyName);
        }

        let record = ResultRecord {
            name: name.to_string(),
            attempts: self.attempts.len(),
            elapsed_secs: self.elapsed_secs,
        };
        self.submitting = true;
        self.message = Some(RESULT_SENDING.to_string());
        Ok(record)
    }

    pub fn submission_succeeded(&mut self) {
        if !self.submitting {
            debug!("acknowledgement without a pending submission, ignoring");
            return;
        }
        self.reset_to_waiting();
        self.message = Some(RESULT_SAVED.to_string());
    }

    pub fn submission_failed(&mut self, err: &ApiError) {
        self.submitting = false;
        self.message = Some(match err {
            ApiError::Service { message } => message.clone(),
            ApiError::Transport { .. } => SUBMIT_TRANSPORT_FAILED.to_string(),
            ApiError::Malformed { .. } | ApiError::MissingWord => SUBMIT_REJECTED.to_string(),
        });
    }

    /// Back to the waiting screen from a finished game. A win may be left
    /// unregistered, but not while its submission is in flight.
    pub fn restart(&mut self) -> Result<(), GameError> {
        if self.status != SessionStatus::Finished {
            return self.reject(GameError::NotPlaying);
        }
        if self.submitting {
            return self.reject(GameError::SubmissionPending);
        }
        self.reset_to_waiting();
        Ok(())
    }

    fn reset_to_waiting(&mut self) {
        self.status = SessionStatus::Waiting;
        self.outcome = None;
        self.attempts.clear();
        self.guess_input.clear();
        self.name_input.clear();
        self.message = None;
        self.elapsed_secs = 0;
        self.submitting = false;
        info!("back to waiting");
    }
}
