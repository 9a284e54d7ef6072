//! Error types for the game and the remote services.

use derive_more::{Display, Error};

/// Rejected player actions.
///
/// The display text is the message shown to the player. None of these
/// change the session state.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum GameError {
    /// Guess length differs from the secret word length.
    #[display("A palavra deve ter {expected} letras.")]
    WrongLength { expected: usize },
    /// Name submitted empty or blank.
    #[display("Por favor, digite seu nome.")]
    EmptyName,
    /// The word of the day has not been loaded.
    #[display("A palavra do dia ainda não foi carregada.")]
    WordUnavailable,
    /// The word service returned an empty word.
    #[display("A palavra do dia está vazia.")]
    EmptyWord,
    /// Start requested while a game is running or finished.
    #[display("O jogo já foi iniciado.")]
    NotWaiting,
    /// A guess arrived outside of a running game.
    #[display("O jogo não está em andamento.")]
    NotPlaying,
    /// Result submission is only offered after a win.
    #[display("Só é possível registrar o resultado após acertar a palavra.")]
    NotWon,
    /// A result submission is already waiting for the service.
    #[display("Enviando resultado, aguarde.")]
    SubmissionPending,
}

/// Failures talking to the word or result service.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[display("transport error: {message}")]
    Transport { message: String },
    /// The service answered with an `erro` field.
    #[display("service error: {message}")]
    Service { message: String },
    /// The body was not the JSON shape we expected.
    #[display("malformed response: {message}")]
    Malformed { message: String },
    /// `/palavra` answered without a usable word.
    #[display("response did not contain a word")]
    MissingWord,
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Malformed {
                message: err.to_string(),
            }
        } else {
            Self::Transport {
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed {
            message: err.to_string(),
        }
    }
}
