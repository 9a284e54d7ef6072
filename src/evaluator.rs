use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Feedback for one letter of a guess
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LetterStatus {
    /// same letter at the same position
    Correct,
    /// letter occurs elsewhere in the secret word
    Present,
    /// letter does not occur in the secret word
    Absent,
}

/// How repeated letters in a guess are scored.
///
/// `Simplified` marks a letter `Present` whenever the secret contains it
/// anywhere, even if every occurrence is already accounted for by another
/// position. `Standard` is the two-pass scoring most word games use.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateRule {
    #[default]
    Simplified,
    Standard,
}

fn normalize(word: &str) -> Vec<char> {
    word.to_lowercase().chars().collect()
}

fn score_simplified(secret: &[char], guess: &[char]) -> Vec<LetterStatus> {
    guess
        .iter()
        .zip(secret)
        .map(|(g, s)| {
            if g == s {
                LetterStatus::Correct
            } else if secret.contains(g) {
                LetterStatus::Present
            } else {
                LetterStatus::Absent
            }
        })
        .collect()
}

fn score_standard(secret: &[char], guess: &[char]) -> Vec<LetterStatus> {
    let mut statuses = vec![LetterStatus::Absent; guess.len()];
    // secret letters not consumed by an exact match
    let mut unmatched: Vec<Option<char>> = Vec::with_capacity(secret.len());

    for (idx, (g, s)) in guess.iter().zip(secret).enumerate() {
        if g == s {
            statuses[idx] = LetterStatus::Correct;
            unmatched.push(None);
        } else {
            unmatched.push(Some(*s));
        }
    }

    for (idx, g) in guess.iter().enumerate() {
        if statuses[idx] == LetterStatus::Correct {
            continue;
        }
        if let Some(slot) = unmatched.iter_mut().find(|slot| **slot == Some(*g)) {
            *slot = None;
            statuses[idx] = LetterStatus::Present;
        }
    }

    statuses
}

/// Scores `guess` against `secret`, one status per letter.
///
/// Comparison is case-insensitive. Lengths are counted in characters, so
/// accented letters count once.
pub fn evaluate(
    secret: &str,
    guess: &str,
    rule: DuplicateRule,
) -> Result<Vec<LetterStatus>, GameError> {
    let secret = normalize(secret);
    let guess = normalize(guess);

    if secret.len() != guess.len() {
        return Err(GameError::WrongLength {
            expected: secret.len(),
        });
    }

    Ok(match rule {
        DuplicateRule::Simplified => score_simplified(&secret, &guess),
        DuplicateRule::Standard => score_standard(&secret, &guess),
    })
}
