//! The word guessing game.

pub mod config;
pub mod evaluator;
pub mod registry;
pub mod render;
pub mod round;
pub mod word_bank;

pub use config::{Alphabet, WordleConfig};
pub use evaluator::{TileStatus, evaluate};
pub use registry::SessionRegistry;
pub use round::{Round, RoundState};
