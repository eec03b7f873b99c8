//! Guess evaluation for a single Wordle turn.
//!
//! A guess is compared against the secret in two passes over a frequency map of
//! the secret's characters:
//! 1. Exact pass: same character in the same position. The character's count is
//!    consumed so it cannot be credited again.
//! 2. Present pass: for the remaining positions, left to right, the character is
//!    present if the secret still has an unconsumed occurrence of it.
//!
//! Duplicate characters are therefore never credited more often than they occur
//! in the secret.

use std::collections::HashMap;

/// Verdict for one position of a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileStatus {
    /// Right character in the right position.
    Exact,
    /// Character occurs elsewhere in the secret.
    Present,
    /// Character does not occur in what is left of the secret.
    Absent,
}

impl TileStatus {
    pub fn is_exact(self) -> bool {
        self == TileStatus::Exact
    }
}

/// Evaluates `guess` against `secret`.
///
/// Both slices must have the same length; the caller rejects mismatched guesses
/// before getting here.
#[must_use]
pub fn evaluate(secret: &[char], guess: &[char]) -> Vec<TileStatus> {
    debug_assert_eq!(
        secret.len(),
        guess.len(),
        "guess length must be validated by the caller"
    );

    let mut remaining: HashMap<char, usize> = HashMap::new();
    for &c in secret {
        *remaining.entry(c).or_default() += 1;
    }

    let mut statuses = vec![TileStatus::Absent; guess.len()];

    for (i, (&g, &s)) in guess.iter().zip(secret).enumerate() {
        if g == s {
            statuses[i] = TileStatus::Exact;
            if let Some(count) = remaining.get_mut(&g) {
                *count = count.saturating_sub(1);
            }
        }
    }

    for (i, &g) in guess.iter().enumerate() {
        if statuses[i].is_exact() {
            continue;
        }
        if let Some(count) = remaining.get_mut(&g)
            && *count > 0
        {
            *count -= 1;
            statuses[i] = TileStatus::Present;
        }
    }

    statuses
}

/// [`evaluate`] over string slices, comparing by `char`.
#[must_use]
pub fn evaluate_words(secret: &str, guess: &str) -> Vec<TileStatus> {
    let secret: Vec<char> = secret.chars().collect();
    let guess: Vec<char> = guess.chars().collect();
    evaluate(&secret, &guess)
}

/// A guess is solved when every tile is exact.
pub fn is_solved(statuses: &[TileStatus]) -> bool {
    !statuses.is_empty() && statuses.iter().all(|s| s.is_exact())
}

#[cfg(test)]
mod tests {
    use super::*;
    use TileStatus::{Absent, Exact, Present};

    const PAIRS: &[(&str, &str)] = &[
        ("ALLOW", "LOLLY"),
        ("REACT", "TRACE"),
        ("ABBA", "BABA"),
        ("SPEED", "ERASE"),
        ("CRANE", "SLATE"),
        ("AAAAA", "ABAAB"),
        ("HELLO", "LLAMA"),
        ("VELOCIRAPTOR", "RAPTORVELOCI"),
        ("T REX", "TREX "),
    ];

    fn count(s: &str, c: char) -> usize {
        s.chars().filter(|&x| x == c).count()
    }

    #[test]
    fn duplicate_guess_letters_are_capped_by_secret() {
        assert_eq!(
            evaluate_words("ALLOW", "LOLLY"),
            vec![Present, Present, Exact, Absent, Absent]
        );
    }

    #[test]
    fn swapped_letters_are_present() {
        assert_eq!(
            evaluate_words("REACT", "TRACE"),
            vec![Present, Present, Exact, Exact, Present]
        );
        assert_eq!(
            evaluate_words("ABBA", "BABA"),
            vec![Present, Present, Exact, Exact]
        );
    }

    #[test]
    fn exact_match_consumes_before_present() {
        // The trailing E is exact, leaving one E for the first guessed E.
        assert_eq!(
            evaluate_words("THEME", "EERIE"),
            vec![Present, Absent, Absent, Absent, Exact]
        );
        assert_eq!(
            evaluate_words("SPEED", "ERASE"),
            vec![Present, Absent, Absent, Present, Present]
        );
        assert_eq!(
            evaluate_words("CRANE", "SLATE"),
            vec![Absent, Absent, Exact, Absent, Exact]
        );
    }

    #[test]
    fn correct_guess_is_all_exact() {
        for (secret, _) in PAIRS {
            let statuses = evaluate_words(secret, secret);
            assert!(statuses.iter().all(|s| *s == Exact), "{secret}");
            assert!(is_solved(&statuses));
        }
    }

    #[test]
    fn disjoint_guess_is_all_absent() {
        let statuses = evaluate_words("RAPTOR", "SKYBEL");
        assert_eq!(statuses, vec![Absent; 6]);
        assert!(!is_solved(&statuses));
    }

    #[test]
    fn exact_count_matches_positional_equality() {
        for (secret, guess) in PAIRS {
            let expected = secret
                .chars()
                .zip(guess.chars())
                .filter(|(s, g)| s == g)
                .count();
            let exact = evaluate_words(secret, guess)
                .iter()
                .filter(|s| s.is_exact())
                .count();
            assert_eq!(exact, expected, "{secret}/{guess}");
        }
    }

    #[test]
    fn credited_letters_never_exceed_secret_occurrences() {
        for (secret, guess) in PAIRS {
            let statuses = evaluate_words(secret, guess);
            for c in guess.chars() {
                let credited = guess
                    .chars()
                    .zip(&statuses)
                    .filter(|(g, s)| *g == c && **s != Absent)
                    .count();
                assert!(
                    credited <= count(secret, c),
                    "{c} over-credited in {secret}/{guess}"
                );
            }
        }
    }

    #[test]
    fn spaces_are_compared_like_letters() {
        assert_eq!(
            evaluate_words("T REX", "TREX "),
            vec![Exact, Present, Present, Present, Present]
        );
    }

    #[test]
    fn evaluation_is_repeatable() {
        for (secret, guess) in PAIRS {
            assert_eq!(evaluate_words(secret, guess), evaluate_words(secret, guess));
        }
    }

    #[test]
    fn empty_input_is_not_solved() {
        assert!(evaluate_words("", "").is_empty());
        assert!(!is_solved(&[]));
    }
}
