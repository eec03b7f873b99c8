use std::time::Duration;

use anyhow::Context as _;
use regex::Regex;
use thiserror::Error;
use tracing::info;

use crate::infrastructure::environment::{self, parse_env_var};

pub const DEFAULT_ALPHABET: &str = "A-Z";
pub const DEFAULT_ROUND_DURATION: Duration = Duration::from_secs(600);
/// Interaction tokens expire after 15 minutes; the round must end before that so
/// the closing follow-up can still be sent.
pub const MAX_ROUND_DURATION: Duration = Duration::from_secs(14 * 60);
pub const DEFAULT_QUIT_PHRASE: &str = "END GAME";
pub const DEFAULT_WARNING_LIFETIME: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum AlphabetError {
    #[error("alphabet character class is empty")]
    Empty,
    #[error("alphabet character class `{class}` is not valid")]
    Invalid {
        class: String,
        #[source]
        source: regex::Error,
    },
}

/// The set of characters a guess may contain, written as a regex character class
/// body such as `A-Z` or `A-Z0-9 \-`.
///
/// Matching is done against upper-cased text.
#[derive(Debug, Clone)]
pub struct Alphabet {
    class: String,
    word: Regex,
}

impl Alphabet {
    pub fn new(class: &str) -> Result<Self, AlphabetError> {
        if class.is_empty() {
            return Err(AlphabetError::Empty);
        }
        let word = Regex::new(&format!("^[{class}]+$")).map_err(|source| {
            AlphabetError::Invalid {
                class: class.to_string(),
                source,
            }
        })?;
        Ok(Self {
            class: class.to_string(),
            word,
        })
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    /// True when `text` is non-empty and made only of alphabet characters.
    pub fn allows(&self, text: &str) -> bool {
        self.word.is_match(text)
    }

    pub fn allows_char(&self, c: char) -> bool {
        let mut buf = [0u8; 4];
        self.word.is_match(c.encode_utf8(&mut buf))
    }

    /// Lower-cases `raw` and drops every character outside the alphabet.
    /// Used for words entering the word bank.
    pub fn normalize(&self, raw: &str) -> String {
        raw.trim()
            .to_uppercase()
            .chars()
            .filter(|c| self.allows_char(*c))
            .collect::<String>()
            .trim()
            .to_lowercase()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHABET).expect("default alphabet is a valid character class")
    }
}

/// Settings shared by every round.
#[derive(Debug, Clone)]
pub struct WordleConfig {
    pub alphabet: Alphabet,
    pub round_duration: Duration,
    /// Fixed number of attempts. When unset, the count depends on the secret's length.
    pub max_attempts: Option<usize>,
    pub quit_phrase: String,
    /// How long the "wrong length" warning stays visible.
    pub warning_lifetime: Duration,
}

impl Default for WordleConfig {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::default(),
            round_duration: DEFAULT_ROUND_DURATION,
            max_attempts: None,
            quit_phrase: DEFAULT_QUIT_PHRASE.to_string(),
            warning_lifetime: DEFAULT_WARNING_LIFETIME,
        }
    }
}

impl WordleConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(class) = parse_env_var::<String>(environment::WORDLE_ALPHABET)? {
            config.alphabet = Alphabet::new(&class)
                .with_context(|| format!("Invalid {}", environment::WORDLE_ALPHABET))?;
        }
        if let Some(secs) = parse_env_var::<u64>(environment::WORDLE_DURATION_SECS)? {
            config.round_duration = round_duration_from_secs(secs)?;
        }
        if let Some(attempts) = parse_env_var::<usize>(environment::WORDLE_MAX_ATTEMPTS)? {
            anyhow::ensure!(
                attempts > 0,
                "{} must be at least 1",
                environment::WORDLE_MAX_ATTEMPTS
            );
            config.max_attempts = Some(attempts);
        }

        info!(
            alphabet = config.alphabet.class(),
            duration = ?config.round_duration,
            max_attempts = ?config.max_attempts,
            "Loaded wordle configuration"
        );
        Ok(config)
    }

    /// The round window, capped at [`MAX_ROUND_DURATION`].
    pub fn clamped_round_duration(&self) -> Duration {
        self.round_duration.min(MAX_ROUND_DURATION)
    }

    /// Attempts allowed for a secret of `len` characters.
    pub fn max_attempts_for(&self, len: usize) -> usize {
        if let Some(fixed) = self.max_attempts {
            return fixed;
        }
        match len {
            12.. => 8,
            8..=11 => 7,
            _ => 6,
        }
    }
}

fn round_duration_from_secs(secs: u64) -> anyhow::Result<Duration> {
    let duration = Duration::from_secs(secs);
    anyhow::ensure!(
        secs > 0,
        "{} must be at least 1",
        environment::WORDLE_DURATION_SECS
    );
    anyhow::ensure!(
        duration <= MAX_ROUND_DURATION,
        "{} must be at most {}",
        environment::WORDLE_DURATION_SECS,
        MAX_ROUND_DURATION.as_secs()
    );
    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_alphabet_is_letters_only() {
        let alphabet = Alphabet::default();
        assert!(alphabet.allows("RAPTOR"));
        assert!(!alphabet.allows("T REX"));
        assert!(!alphabet.allows("R2D2"));
        assert!(!alphabet.allows(""));
        assert!(!alphabet.allows_char('-'));
    }

    #[test]
    fn alphabet_can_be_widened() {
        let alphabet = Alphabet::new(r"A-Z0-9 \-").unwrap();
        assert!(alphabet.allows("T REX"));
        assert!(alphabet.allows("JP-3"));
        assert!(!alphabet.allows("T.REX"));
    }

    #[test]
    fn invalid_alphabet_is_rejected() {
        assert!(matches!(Alphabet::new(""), Err(AlphabetError::Empty)));
        assert!(matches!(
            Alphabet::new("Z-A"),
            Err(AlphabetError::Invalid { .. })
        ));
    }

    #[test]
    fn normalize_strips_foreign_characters() {
        let alphabet = Alphabet::default();
        assert_eq!(alphabet.normalize("  Tyranno-saurus! "), "tyrannosaurus");
        assert_eq!(alphabet.normalize("123"), "");

        let spaced = Alphabet::new("A-Z ").unwrap();
        assert_eq!(spaced.normalize(" Ian Malcolm. "), "ian malcolm");
    }

    #[test]
    fn attempts_scale_with_length() {
        let config = WordleConfig::default();
        assert_eq!(config.max_attempts_for(5), 6);
        assert_eq!(config.max_attempts_for(7), 6);
        assert_eq!(config.max_attempts_for(8), 7);
        assert_eq!(config.max_attempts_for(11), 7);
        assert_eq!(config.max_attempts_for(12), 8);
        assert_eq!(config.max_attempts_for(20), 8);
    }

    #[test]
    fn fixed_attempts_override_length() {
        let config = WordleConfig {
            max_attempts: Some(3),
            ..Default::default()
        };
        assert_eq!(config.max_attempts_for(12), 3);
    }

    #[test]
    fn round_duration_is_bounded() {
        assert_eq!(
            round_duration_from_secs(600).unwrap(),
            Duration::from_secs(600)
        );
        assert_eq!(round_duration_from_secs(840).unwrap(), MAX_ROUND_DURATION);
        assert!(round_duration_from_secs(0).is_err());
        assert!(round_duration_from_secs(841).is_err());
        assert!(round_duration_from_secs(u64::MAX).is_err());
    }

    #[test]
    fn oversized_durations_are_clamped() {
        let config = WordleConfig {
            round_duration: Duration::from_secs(u64::MAX),
            ..Default::default()
        };
        assert_eq!(config.clamped_round_duration(), MAX_ROUND_DURATION);
        assert_eq!(
            WordleConfig::default().clamped_round_duration(),
            DEFAULT_ROUND_DURATION
        );
    }
}
