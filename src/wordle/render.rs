//! Text rendering of rounds for Discord messages.

use chrono::{DateTime, Utc};

use super::{
    evaluator::TileStatus,
    round::{Attempt, Round},
};

pub const EXACT_TILE: &str = "🟩";
pub const PRESENT_TILE: &str = "🟨";
pub const ABSENT_TILE: &str = "⬜";
pub const EMPTY_TILE: &str = "⬜";

pub fn tile(status: TileStatus) -> &'static str {
    match status {
        TileStatus::Exact => EXACT_TILE,
        TileStatus::Present => PRESENT_TILE,
        TileStatus::Absent => ABSENT_TILE,
    }
}

pub fn row(statuses: &[TileStatus]) -> String {
    statuses.iter().map(|s| tile(*s)).collect()
}

pub fn empty_row(len: usize) -> String {
    EMPTY_TILE.repeat(len)
}

/// One line per attempt: the tiles followed by the guessed word.
pub fn board(attempts: &[Attempt]) -> String {
    attempts
        .iter()
        .map(|attempt| format!("{} `{}`", row(&attempt.statuses), attempt.guess))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn discarded_list(discarded: impl Iterator<Item = char>) -> String {
    let letters: Vec<String> = discarded.map(String::from).collect();
    if letters.is_empty() {
        "None".to_string()
    } else {
        letters.join(", ")
    }
}

/// Discord's relative timestamp markup, e.g. "in 10 minutes".
pub fn relative_timestamp(at: DateTime<Utc>) -> String {
    format!("<t:{}:R>", at.timestamp())
}

pub fn status_footer(round: &Round) -> String {
    format!(
        "-# {} guesses left | Discarded: {} | Ends {}",
        round.remaining_attempts(),
        discarded_list(round.discarded()),
        relative_timestamp(round.ends_at())
    )
}

pub fn intro(round: &Round, quit_phrase: &str) -> String {
    format!(
        "{}\n-# Length: {} letters | Chances: {} | Ends {}\n-# Type **'{}'** to give up.",
        empty_row(round.len()),
        round.len(),
        round.max_attempts(),
        relative_timestamp(round.ends_at()),
        quit_phrase.to_lowercase()
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::wordle::config::WordleConfig;

    #[test]
    fn rows_use_one_glyph_per_status() {
        use TileStatus::*;
        assert_eq!(row(&[Exact, Present, Absent]), "🟩🟨⬜");
        assert_eq!(empty_row(4), "⬜⬜⬜⬜");
        assert_eq!(row(&[]), "");
    }

    #[test]
    fn board_lists_each_attempt() {
        let mut round = Round::new("CRANE", &WordleConfig::default());
        round.submit_guess("SLATE").unwrap();
        round.submit_guess("CRANE").unwrap();
        assert_eq!(
            board(round.attempts()),
            "⬜⬜🟩⬜🟩 `SLATE`\n🟩🟩🟩🟩🟩 `CRANE`"
        );
    }

    #[test]
    fn discarded_list_falls_back_to_none() {
        assert_eq!(discarded_list("".chars()), "None");
        assert_eq!(discarded_list("LST".chars()), "L, S, T");
    }

    #[test]
    fn footer_reports_remaining_and_discarded() {
        let mut round = Round::new("CRANE", &WordleConfig::default());
        round.submit_guess("SLATE").unwrap();
        let footer = status_footer(&round);
        assert!(footer.starts_with("-# 5 guesses left | Discarded: L, S, T | Ends <t:"));
        assert!(footer.ends_with(":R>"));
    }

    #[test]
    fn intro_shows_length_and_chances() {
        let round = Round::new("VELOCIRAPTOR", &WordleConfig::default());
        let intro = intro(&round, "END GAME");
        assert!(intro.starts_with(&empty_row(12)));
        assert!(intro.contains("Length: 12 letters | Chances: 8"));
        assert!(intro.ends_with("Type **'end game'** to give up."));
    }

    #[test]
    fn timestamp_markup() {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(relative_timestamp(at), "<t:1767225600:R>");
    }
}
