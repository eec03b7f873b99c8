//! A single player's round: the secret, the attempts made against it, and the
//! state machine `InProgress -> {Won, Lost, Abandoned, TimedOut}`.

use std::{
    collections::BTreeSet,
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, trace};

use super::{
    config::{Alphabet, WordleConfig},
    evaluator::{TileStatus, evaluate, is_solved},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    InProgress,
    Won,
    Lost,
    Abandoned,
    TimedOut,
}

impl RoundState {
    pub fn is_terminal(self) -> bool {
        self != RoundState::InProgress
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GuessError {
    #[error("the round is already over ({0:?})")]
    RoundOver(RoundState),
    #[error("the round ran out of time")]
    Expired,
    #[error("guess must be {expected} characters long, got {actual}")]
    WrongLength { expected: usize, actual: usize },
}

/// What a chat message means to a running round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerInput {
    Quit,
    Guess(String),
    WrongLength { expected: usize },
    /// Right length, but with characters outside the alphabet. Ignored.
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub guess: String,
    pub statuses: Vec<TileStatus>,
}

#[derive(Debug)]
pub struct Round {
    secret: String,
    secret_chars: Vec<char>,
    attempts: Vec<Attempt>,
    max_attempts: usize,
    discarded: BTreeSet<char>,
    state: RoundState,
    alphabet: Alphabet,
    quit_phrase: String,
    deadline: Instant,
    ends_at: DateTime<Utc>,
}

impl Round {
    /// Starts a round. The secret is trimmed and upper-cased.
    pub fn new(secret: &str, config: &WordleConfig) -> Self {
        let secret = secret.trim().to_uppercase();
        let secret_chars: Vec<char> = secret.chars().collect();
        let max_attempts = config.max_attempts_for(secret_chars.len());
        let window = config.clamped_round_duration();
        let now = Instant::now();
        let deadline = now.checked_add(window).unwrap_or(now);
        let ends_at = chrono::Duration::from_std(deadline - now)
            .ok()
            .and_then(|d| Utc::now().checked_add_signed(d))
            .unwrap_or_else(Utc::now);
        debug!(
            length = secret_chars.len(),
            max_attempts = max_attempts,
            "Starting round"
        );
        Self {
            secret,
            secret_chars,
            attempts: Vec::new(),
            max_attempts,
            discarded: BTreeSet::new(),
            state: RoundState::InProgress,
            alphabet: config.alphabet.clone(),
            quit_phrase: config.quit_phrase.to_uppercase(),
            deadline,
            ends_at,
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn len(&self) -> usize {
        self.secret_chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secret_chars.is_empty()
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn remaining_attempts(&self) -> usize {
        self.max_attempts.saturating_sub(self.attempts.len())
    }

    /// Guessed characters that do not occur in the secret, in sorted order.
    pub fn discarded(&self) -> impl Iterator<Item = char> + '_ {
        self.discarded.iter().copied()
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    pub fn time_left(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Classifies a raw chat message.
    pub fn interpret(&self, raw: &str) -> PlayerInput {
        let content = raw.trim().to_uppercase();
        if content == self.quit_phrase {
            return PlayerInput::Quit;
        }
        if content.chars().count() != self.len() {
            return PlayerInput::WrongLength {
                expected: self.len(),
            };
        }
        if !self.alphabet.allows(&content) {
            return PlayerInput::Invalid;
        }
        PlayerInput::Guess(content)
    }

    /// Evaluates and records a guess, then advances the state machine.
    pub fn submit_guess(&mut self, guess: &str) -> Result<&Attempt, GuessError> {
        if self.is_over() {
            return Err(GuessError::RoundOver(self.state));
        }
        if self.is_expired() {
            self.time_out();
            return Err(GuessError::Expired);
        }

        let guess_chars: Vec<char> = guess.chars().collect();
        if guess_chars.len() != self.len() {
            return Err(GuessError::WrongLength {
                expected: self.len(),
                actual: guess_chars.len(),
            });
        }

        let statuses = evaluate(&self.secret_chars, &guess_chars);
        for c in &guess_chars {
            if !c.is_whitespace() && !self.secret_chars.contains(c) {
                self.discarded.insert(*c);
            }
        }

        let attempt_number = self.attempts.len() + 1;
        if is_solved(&statuses) {
            self.state = RoundState::Won;
        } else if attempt_number >= self.max_attempts {
            self.state = RoundState::Lost;
        }
        trace!(
            attempt = attempt_number,
            state = ?self.state,
            "Guess evaluated"
        );

        self.attempts.push(Attempt {
            guess: guess_chars.into_iter().collect(),
            statuses,
        });
        Ok(&self.attempts[attempt_number - 1])
    }

    pub fn abandon(&mut self) {
        self.finish(RoundState::Abandoned);
    }

    pub fn time_out(&mut self) {
        self.finish(RoundState::TimedOut);
    }

    fn finish(&mut self, state: RoundState) {
        if !self.is_over() {
            debug!(state = ?state, "Round finished");
            self.state = state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordle::{
        config::MAX_ROUND_DURATION,
        evaluator::TileStatus::{Absent, Exact, Present},
    };

    fn round(secret: &str) -> Round {
        Round::new(secret, &WordleConfig::default())
    }

    #[test]
    fn secret_is_normalized() {
        let round = round("  raptor ");
        assert_eq!(round.secret(), "RAPTOR");
        assert_eq!(round.len(), 6);
        assert_eq!(round.max_attempts(), 6);
        assert_eq!(round.state(), RoundState::InProgress);
    }

    #[test]
    fn interpret_classifies_messages() {
        let round = round("RAPTOR");
        assert_eq!(round.interpret(" end game "), PlayerInput::Quit);
        assert_eq!(round.interpret("raptors"), PlayerInput::WrongLength { expected: 6 });
        assert_eq!(round.interpret("rapt0r"), PlayerInput::Invalid);
        assert_eq!(round.interpret(" parrot "), PlayerInput::Guess("PARROT".into()));
    }

    #[test]
    fn winning_guess_ends_round() {
        let mut round = round("ALLOW");
        let attempt = round.submit_guess("LOLLY").unwrap();
        assert_eq!(attempt.statuses, vec![Present, Present, Exact, Absent, Absent]);
        assert_eq!(round.state(), RoundState::InProgress);
        assert_eq!(round.remaining_attempts(), 5);

        round.submit_guess("ALLOW").unwrap();
        assert_eq!(round.state(), RoundState::Won);
        assert_eq!(
            round.submit_guess("ALLOW"),
            Err(GuessError::RoundOver(RoundState::Won))
        );
    }

    #[test]
    fn running_out_of_attempts_loses() {
        let mut round = Round::new(
            "CRANE",
            &WordleConfig {
                max_attempts: Some(2),
                ..Default::default()
            },
        );
        round.submit_guess("SLATE").unwrap();
        assert_eq!(round.state(), RoundState::InProgress);
        round.submit_guess("BLIMP").unwrap();
        assert_eq!(round.state(), RoundState::Lost);
        assert_eq!(round.remaining_attempts(), 0);
        assert_eq!(round.attempts().len(), 2);
    }

    #[test]
    fn discarded_letters_are_sorted_and_unique() {
        let mut round = round("CRANE");
        round.submit_guess("SLATE").unwrap();
        round.submit_guess("TOAST").unwrap();
        let discarded: String = round.discarded().collect();
        assert_eq!(discarded, "LOST");
    }

    #[test]
    fn wrong_length_is_rejected_without_consuming_an_attempt() {
        let mut round = round("CRANE");
        assert_eq!(
            round.submit_guess("CRANES").unwrap_err(),
            GuessError::WrongLength {
                expected: 5,
                actual: 6
            }
        );
        assert!(round.attempts().is_empty());
    }

    #[test]
    fn abandon_and_timeout_are_terminal() {
        let mut round = round("CRANE");
        round.abandon();
        assert_eq!(round.state(), RoundState::Abandoned);
        round.time_out();
        assert_eq!(round.state(), RoundState::Abandoned);
        assert_eq!(
            round.submit_guess("CRANE"),
            Err(GuessError::RoundOver(RoundState::Abandoned))
        );
    }

    #[test]
    fn expired_round_times_out_on_next_guess() {
        let mut round = Round::new(
            "CRANE",
            &WordleConfig {
                round_duration: Duration::ZERO,
                ..Default::default()
            },
        );
        assert!(round.is_expired());
        assert_eq!(round.time_left(), Duration::ZERO);
        assert_eq!(round.submit_guess("CRANE"), Err(GuessError::Expired));
        assert_eq!(round.state(), RoundState::TimedOut);
    }

    #[test]
    fn oversized_window_is_capped() {
        for secs in [u64::MAX, 10_000_000_000_000] {
            let round = Round::new(
                "CRANE",
                &WordleConfig {
                    round_duration: Duration::from_secs(secs),
                    ..Default::default()
                },
            );
            assert!(!round.is_expired());
            assert!(round.time_left() <= MAX_ROUND_DURATION);

            let shown = (round.ends_at() - Utc::now()).num_seconds();
            assert!(shown > 0);
            assert!(shown <= MAX_ROUND_DURATION.as_secs() as i64);
        }
    }

    #[test]
    fn multi_word_secrets_with_wide_alphabet() {
        let config = WordleConfig {
            alphabet: Alphabet::new("A-Z ").unwrap(),
            ..Default::default()
        };
        let mut round = Round::new("Ian Malcolm", &config);
        assert_eq!(round.len(), 11);
        assert_eq!(round.max_attempts(), 7);
        let input = round.interpret("ian malcolm");
        let PlayerInput::Guess(guess) = input else {
            panic!("expected a guess, got {input:?}");
        };
        round.submit_guess(&guess).unwrap();
        assert_eq!(round.state(), RoundState::Won);
        assert_eq!(round.discarded().count(), 0);
    }
}
