pub use super::wordle_word::Entity as WordleWord;
