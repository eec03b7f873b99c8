//! `SeaORM` Entity definitions for the tables created by the `migration` crate.

pub mod prelude;

pub mod wordle_word;
