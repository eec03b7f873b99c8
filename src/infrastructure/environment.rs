use std::{path::PathBuf, str::FromStr};

use anyhow::Context;

macro_rules! const_str {
    ($name:ident) => {
        pub const $name: &str = stringify!($name);
    };
}

const_str!(DATA_DIRECTORY);
const_str!(DATABASE_URL);
const_str!(DISCORD_TOKEN);
const_str!(OWNERS);
const_str!(COMMAND_DISABLE_LIST);

const_str!(LOG_LEVEL);
const_str!(LOG_STYLE);
const_str!(LOG_PATH);

const_str!(WORDLE_ALPHABET);
const_str!(WORDLE_DURATION_SECS);
const_str!(WORDLE_MAX_ATTEMPTS);
const_str!(WORDLE_STAFF_ROLE);
const_str!(WORDLE_LOG_CHANNEL);

const DEFAULT_DATA_DIRECTORY: &str = "./data";

/// Reads a required environment variable, naming it in the error when missing.
pub fn env_var_with_context(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("missing environment variable {}", name))
}

/// Reads and parses an optional environment variable. Unset or empty yields `None`.
pub fn parse_env_var<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("invalid value for environment variable {}", name)),
        _ => Ok(None),
    }
}

pub fn get_data_directory() -> PathBuf {
    std::env::var(DATA_DIRECTORY)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIRECTORY))
}

pub fn get_log_directory() -> PathBuf {
    get_data_directory().join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_match_their_names() {
        assert_eq!(DISCORD_TOKEN, "DISCORD_TOKEN");
        assert_eq!(WORDLE_ALPHABET, "WORDLE_ALPHABET");
    }

    #[test]
    fn unset_optional_variable_is_none() {
        let value = parse_env_var::<u64>("JURASSICBOT_TEST_SURELY_UNSET").unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn missing_required_variable_names_itself() {
        let err = env_var_with_context("JURASSICBOT_TEST_SURELY_UNSET").unwrap_err();
        assert!(err.to_string().contains("JURASSICBOT_TEST_SURELY_UNSET"));
    }
}
