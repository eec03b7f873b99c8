//! Storage for the secrets the game draws from.

use chrono::Utc;
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
    sea_query::{Expr, LikeExpr},
};
use thiserror::Error;
use tracing::{debug, warn};

use super::config::Alphabet;
use crate::{entities::wordle_word, lazy_regex};

lazy_regex! { WORD_SEPARATOR_REGEX, r"[,\n]+" }

#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum WordCategory {
    Creature,
    Human,
    Other,
}

impl WordCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            WordCategory::Creature => "creature",
            WordCategory::Human => "human",
            WordCategory::Other => "other",
        }
    }
}

#[derive(Debug, Error)]
pub enum WordBankError {
    #[error("`{0}` has no usable characters")]
    Empty(String),
    #[error("`{0}` is already in the word bank")]
    Duplicate(String),
    #[error("`{0}` is not in the word bank")]
    NotFound(String),
    #[error("a new word or a new category is required")]
    NothingToChange,
    #[error(transparent)]
    Database(#[from] DbErr),
}

fn map_write_error(word: &str, err: DbErr) -> WordBankError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => WordBankError::Duplicate(word.to_string()),
        _ => WordBankError::Database(err),
    }
}

async fn find_word(
    db: &DatabaseConnection,
    word: &str,
) -> Result<Option<wordle_word::Model>, DbErr> {
    wordle_word::Entity::find_by_id(word.to_string()).one(db).await
}

/// Picks a uniformly random word, or `None` when the bank is empty.
pub async fn random_word(db: &DatabaseConnection) -> Result<Option<String>, DbErr> {
    let count = wordle_word::Entity::find().count(db).await?;
    if count == 0 {
        return Ok(None);
    }
    let offset = rand::rng().random_range(0..count);
    debug!(count = count, offset = offset, "Drawing random word");
    let model = wordle_word::Entity::find()
        .order_by_asc(wordle_word::Column::Word)
        .offset(offset)
        .one(db)
        .await?;
    Ok(model.map(|m| m.word))
}

pub async fn add_word(
    db: &DatabaseConnection,
    alphabet: &Alphabet,
    raw: &str,
    category: WordCategory,
    added_by: &str,
) -> Result<wordle_word::Model, WordBankError> {
    let word = alphabet.normalize(raw);
    if word.is_empty() {
        return Err(WordBankError::Empty(raw.to_string()));
    }
    if find_word(db, &word).await?.is_some() {
        return Err(WordBankError::Duplicate(word));
    }

    wordle_word::ActiveModel {
        word: Set(word.clone()),
        category: Set(category.as_str().to_string()),
        added_by: Set(added_by.to_string()),
        created_on: Set(Utc::now()),
    }
    .insert(db)
    .await
    .map_err(|e| map_write_error(&word, e))
}

#[derive(Debug, Default)]
pub struct BulkAddReport {
    pub added: Vec<wordle_word::Model>,
    /// One entry per rejected word, e.g. `"trex (Duplicate)"`.
    pub errors: Vec<String>,
}

/// Adds every comma or newline separated word in `raw`. A failing word does not
/// stop the rest.
pub async fn add_words(
    db: &DatabaseConnection,
    alphabet: &Alphabet,
    raw: &str,
    category: WordCategory,
    added_by: &str,
) -> BulkAddReport {
    let mut report = BulkAddReport::default();
    let words: Vec<String> = WORD_SEPARATOR_REGEX
        .split(raw)
        .map(|w| alphabet.normalize(w))
        .filter(|w| !w.is_empty())
        .collect();

    for word in words {
        match add_word(db, alphabet, &word, category, added_by).await {
            Ok(model) => report.added.push(model),
            Err(WordBankError::Duplicate(w)) => report.errors.push(format!("{w} (Duplicate)")),
            Err(e) => {
                warn!(word = %word, "Failed to add word: {}", e);
                report.errors.push(format!("{word} (Error)"));
            }
        }
    }
    report
}

#[derive(Debug, Clone)]
pub struct WordEdit {
    pub before: wordle_word::Model,
    pub after: wordle_word::Model,
}

impl WordEdit {
    /// A `diff` code block body showing the changed fields.
    pub fn diff(&self) -> String {
        let mut body = String::new();
        let mut field = |name: &str, old: &str, new: &str| {
            if old == new {
                body.push_str(&format!("  \"{name}\": \"{old}\",\n"));
            } else {
                body.push_str(&format!("- \"{name}\": \"{old}\",\n+ \"{name}\": \"{new}\",\n"));
            }
        };
        field("word", &self.before.word, &self.after.word);
        field("category", &self.before.category, &self.after.category);
        body.push_str(&format!(
            "  \"added_by\": \"{}\",\n  \"created_on\": \"{}\"",
            self.before.added_by,
            self.before.created_on.to_rfc3339()
        ));
        format!("{{\n{body}\n}}")
    }
}

pub async fn edit_word(
    db: &DatabaseConnection,
    alphabet: &Alphabet,
    target: &str,
    new_word: Option<&str>,
    new_category: Option<WordCategory>,
) -> Result<WordEdit, WordBankError> {
    if new_word.is_none() && new_category.is_none() {
        return Err(WordBankError::NothingToChange);
    }
    let target = alphabet.normalize(target);
    let before = find_word(db, &target)
        .await?
        .ok_or_else(|| WordBankError::NotFound(target.clone()))?;

    let word = match new_word {
        Some(raw) => {
            let word = alphabet.normalize(raw);
            if word.is_empty() {
                return Err(WordBankError::Empty(raw.to_string()));
            }
            word
        }
        None => before.word.clone(),
    };
    let category = new_category
        .map(|c| c.as_str().to_string())
        .unwrap_or_else(|| before.category.clone());

    if word != before.word && find_word(db, &word).await?.is_some() {
        return Err(WordBankError::Duplicate(word));
    }

    // The word is the primary key, so a rename has to go through an UPDATE statement.
    wordle_word::Entity::update_many()
        .col_expr(wordle_word::Column::Word, Expr::value(word.clone()))
        .col_expr(wordle_word::Column::Category, Expr::value(category.clone()))
        .filter(wordle_word::Column::Word.eq(before.word.clone()))
        .exec(db)
        .await
        .map_err(|e| map_write_error(&word, e))?;

    let after = wordle_word::Model {
        word,
        category,
        ..before.clone()
    };
    Ok(WordEdit { before, after })
}

pub async fn remove_word(
    db: &DatabaseConnection,
    alphabet: &Alphabet,
    target: &str,
) -> Result<wordle_word::Model, WordBankError> {
    let target = alphabet.normalize(target);
    let model = find_word(db, &target)
        .await?
        .ok_or_else(|| WordBankError::NotFound(target.clone()))?;
    wordle_word::Entity::delete_by_id(model.word.clone())
        .exec(db)
        .await?;
    Ok(model)
}

/// Every word, newest first.
pub async fn export_words(db: &DatabaseConnection) -> Result<Vec<wordle_word::Model>, DbErr> {
    wordle_word::Entity::find()
        .order_by_desc(wordle_word::Column::CreatedOn)
        .order_by_asc(wordle_word::Column::Word)
        .all(db)
        .await
}

const LIKE_ESCAPE: char = '\\';

/// `partial` as a `LIKE` prefix pattern, with wildcards escaped so they match
/// literally.
fn prefix_pattern(partial: &str) -> String {
    let mut pattern = String::with_capacity(partial.len() + 1);
    for c in partial.trim().to_lowercase().chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Words starting with `partial`, for autocomplete.
pub async fn search_words(
    db: &DatabaseConnection,
    partial: &str,
    limit: u64,
) -> Result<Vec<String>, DbErr> {
    let models = wordle_word::Entity::find()
        .filter(
            wordle_word::Column::Word
                .like(LikeExpr::new(prefix_pattern(partial)).escape(LIKE_ESCAPE)),
        )
        .order_by_asc(wordle_word::Column::Word)
        .limit(limit)
        .all(db)
        .await?;
    Ok(models.into_iter().map(|m| m.word).collect())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn model(word: &str, category: &str) -> wordle_word::Model {
        wordle_word::Model {
            word: word.to_string(),
            category: category.to_string(),
            added_by: "42".to_string(),
            created_on: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn diff_marks_changed_fields() {
        let edit = WordEdit {
            before: model("trex", "creature"),
            after: model("tyrannosaurus", "creature"),
        };
        assert_eq!(
            edit.diff(),
            "{\n\
             - \"word\": \"trex\",\n\
             + \"word\": \"tyrannosaurus\",\n  \
             \"category\": \"creature\",\n  \
             \"added_by\": \"42\",\n  \
             \"created_on\": \"2026-01-01T00:00:00+00:00\"\n\
             }"
        );
    }

    #[test]
    fn category_names() {
        assert_eq!(WordCategory::Creature.as_str(), "creature");
        assert_eq!(WordCategory::Human.as_str(), "human");
        assert_eq!(WordCategory::Other.as_str(), "other");
    }

    #[test]
    fn prefix_pattern_escapes_wildcards() {
        assert_eq!(prefix_pattern(" Rex "), "rex%");
        assert_eq!(prefix_pattern("_"), "\\_%");
        assert_eq!(prefix_pattern("a%b\\"), "a\\%b\\\\%");
    }

    #[test]
    fn separator_splits_commas_and_newlines() {
        let parts: Vec<&str> = WORD_SEPARATOR_REGEX.split("a,b\n\nc,,d").collect();
        assert_eq!(parts, vec!["a", "b", "c", "d"]);
    }
}
